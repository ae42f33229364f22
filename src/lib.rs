pub mod announce;
pub mod config;
pub mod control_loop;
pub mod error;
pub mod gpio_input;
pub mod hardware;
pub mod hysteresis;
pub mod leds;
pub mod position;
pub mod projector;
pub mod sim;
pub mod speech;
pub mod stepper;
pub mod units;
pub mod wall_clock;

// Re-export commonly used types
pub use config::ClockConfig;
pub use control_loop::ControlLoop;
pub use error::ClockError;
pub use position::PositionController;

#[cfg(test)]
pub(crate) mod mocks;
