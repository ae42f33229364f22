use std::error::Error;
use std::time::Duration;

use clap::Parser;
use log::info;

use dial_clock::config::STEPS_PER_REVOLUTION;
use dial_clock::gpio_input::{RemoteReceiver, ShutdownButton};
use dial_clock::hardware::{
    Indicator, PositionActuator, RemoteSource, ShutdownSignal, SpeechSink,
};
use dial_clock::leds::StatusLeds;
use dial_clock::sim::{SimActuator, SimLeds, SimRemote, SimShutdown, SimSpeech};
use dial_clock::speech::Espeak;
use dial_clock::stepper::StepperActuator;
use dial_clock::wall_clock::SystemClock;
use dial_clock::{ClockConfig, ControlLoop, PositionController};

/// 24-hour dial clock: one hand, one turn a day.
///
/// Line the hand up with midnight (see `calibrate`) before starting; the
/// position at startup is taken as the dial's zero.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Hours added to the system clock (-5 goes from GMT to Central Time)
    #[arg(long, allow_hyphen_values = true)]
    hour_offset: Option<i32>,

    /// Dial turns per motor shaft turn
    #[arg(long)]
    gear_ratio: Option<f64>,

    /// Minimum error in degrees before the dial is moved
    #[arg(long)]
    deadzone: Option<f64>,

    /// Give up on a move after this many seconds (waits forever if unset)
    #[arg(long)]
    move_timeout_secs: Option<u64>,

    /// Run against simulated hardware
    #[arg(long)]
    simulate: bool,
}

impl Args {
    fn config(&self) -> ClockConfig {
        let defaults = ClockConfig::default();
        ClockConfig {
            hour_offset: self.hour_offset.unwrap_or(defaults.hour_offset),
            gear_ratio: self.gear_ratio.unwrap_or(defaults.gear_ratio),
            deadzone: self.deadzone.unwrap_or(defaults.deadzone),
            ..defaults
        }
        .with_move_timeout(self.move_timeout_secs.map(Duration::from_secs))
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.config();
    config.validate()?;

    info!("Starting dial clock...");
    info!(
        "  Hour offset: {:+}h, gear ratio: {:.4}, deadzone: {}°",
        config.hour_offset, config.gear_ratio, config.deadzone
    );

    if args.simulate {
        info!("Using simulated hardware");
        start(
            SimLeds::new(),
            SimActuator::new(STEPS_PER_REVOLUTION),
            SimRemote::new(),
            SimShutdown::never(),
            SimSpeech::new(),
            config,
        )
    } else {
        start(
            StatusLeds::new()?,
            StepperActuator::new()?,
            RemoteReceiver::new()?,
            ShutdownButton::new()?,
            Espeak::new(),
            config,
        )
    }
}

fn start<L, A, R, P, S>(
    mut leds: L,
    actuator: A,
    remote: R,
    shutdown: P,
    speech: S,
    config: ClockConfig,
) -> Result<(), Box<dyn Error>>
where
    L: Indicator,
    A: PositionActuator,
    R: RemoteSource,
    P: ShutdownSignal,
    S: SpeechSink,
{
    leds.all_off()?;

    let mut dial = PositionController::new(actuator, &config)?;
    dial.calibrate_origin_here();
    info!("Dial calibrated: {}", dial.calibration());

    let mut clock = ControlLoop::new(dial, remote, shutdown, speech, SystemClock, config)?;
    clock.run()?;

    info!("Dial clock stopped.");
    Ok(())
}
