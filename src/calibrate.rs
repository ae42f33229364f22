use std::error::Error;
use std::time::Duration;

use clap::Parser;
use log::info;

use dial_clock::stepper::StepperActuator;
use dial_clock::{ClockConfig, PositionController};

/// Jog the dial so the hand can be lined up with midnight.
///
/// The clock treats wherever the hand sits at startup as 00:00, so run this
/// with small steps until the hand points at midnight, then start the clock.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Dial degrees to move; negative turns backwards
    #[arg(allow_hyphen_values = true)]
    degrees: f64,

    /// Dial turns per motor shaft turn
    #[arg(long)]
    gear_ratio: Option<f64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let defaults = ClockConfig::default();
    let config = ClockConfig {
        gear_ratio: args.gear_ratio.unwrap_or(defaults.gear_ratio),
        move_poll_interval: Duration::from_millis(50),
        ..defaults
    };
    config.validate()?;

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║     Dial Alignment Tool                              ║");
    println!("╚══════════════════════════════════════════════════════╝\n");

    let mut dial = PositionController::new(StepperActuator::new()?, &config)?;
    dial.calibrate_origin_here();

    info!("Jogging dial {:+.1}°", args.degrees);
    dial.set_position(args.degrees)?;

    println!("Dial moved {:.1}°.", dial.get_position());
    println!("Repeat until the hand points at midnight, then start the clock.");

    Ok(())
}
