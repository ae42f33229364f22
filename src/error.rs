use thiserror::Error;

/// Faults raised by the dial clock.
#[derive(Debug, Error)]
pub enum ClockError {
    /// Counts per revolution must be positive
    #[error("counts per revolution must be positive, got {0}")]
    InvalidCountsPerRevolution(i64),
    /// Gear ratio must be positive and finite
    #[error("gear ratio must be positive, got {0}")]
    InvalidGearRatio(f64),
    /// Deadzone must be positive and finite
    #[error("deadzone must be positive, got {0} degrees")]
    InvalidDeadzone(f64),
    /// Actuator still busy after the configured number of polls
    #[error("actuator still busy moving to {target} counts after {polls} polls")]
    ActuatorTimeout { target: i64, polls: u32 },
    #[error("GPIO error: {0}")]
    Gpio(#[from] rppal::gpio::Error),
    /// Spawning the speech synthesizer or a worker thread failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
