//! Capabilities the clock needs from the hardware around it.
//!
//! The Raspberry Pi bindings live in `stepper`, `gpio_input`, `leds` and
//! `speech`; `sim` provides in-memory stand-ins.

use crate::error::ClockError;

/// A motor that knows its absolute shaft position.
pub trait PositionActuator {
    /// Encoder counts in one full shaft revolution.
    fn counts_per_revolution(&self) -> i64;

    /// Current absolute position in encoder counts.
    fn raw_position(&self) -> i64;

    /// True while a move is still in progress.
    fn is_busy(&self) -> bool;

    /// Start moving to `position` at `speed` counts per second. Returns without waiting.
    fn move_to_absolute(&mut self, position: i64, speed: u32) -> Result<(), ClockError>;
}

/// Snapshot of the four remote buttons.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RemoteButtons {
    pub red_up: bool,
    pub red_down: bool,
    pub blue_up: bool,
    pub blue_down: bool,
}

pub trait RemoteSource {
    fn is_connected(&self) -> bool;
    fn buttons(&self) -> RemoteButtons;
}

pub trait ShutdownSignal {
    fn is_requested(&self) -> bool;
}

pub trait SpeechSink {
    /// Start speaking `text` without waiting for it to finish.
    fn speak(&mut self, text: &str) -> Result<(), ClockError>;

    /// Speak `text` and return once playback is over.
    fn speak_blocking(&mut self, text: &str) -> Result<(), ClockError>;
}

pub trait Indicator {
    fn all_off(&mut self) -> Result<(), ClockError>;
}
