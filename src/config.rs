use std::time::Duration;

use crate::error::ClockError;

// ** DIAL CONFIGURATION ** //

/// Dial turns once for every three turns of the motor shaft.
pub const GEAR_RATIO: f64 = 1.0 / 3.0;
/// Hours added to the system clock before display.
/// Subtract 5 to go from GMT to Central Time.
pub const HOUR_OFFSET: i32 = -5;
/// The deadzone in degrees. The motor won't try to move if the current position is within it.
pub const DEADZONE_DEGREES: f64 = 5.0;

// ** STEPPER CONFIGURATION ** //

/// GPIO Pin assignments for the STEP/DIR driver
pub const GPIO_STEPPER_STEP: u8 = 20;
pub const GPIO_STEPPER_DIR: u8 = 21;
/// 200 full steps per turn, driver set to 1/8 microstepping
pub const STEPS_PER_REVOLUTION: i64 = 1600;
/// Cruise speed (steps per second) for every move.
pub const CRUISE_SPEED: u32 = 200;
/// Width of the high half of each step pulse.
pub const STEP_PULSE_US: u64 = 10;
/// How often a pending move is checked for completion.
pub const MOVE_POLL_INTERVAL_MS: u64 = 500;

// ** REMOTE & BUTTON CONFIGURATION ** //

/// 4-channel RF receiver: VT goes high while a paired remote is transmitting.
pub const GPIO_REMOTE_VT: u8 = 5;
pub const GPIO_REMOTE_D0: u8 = 6;
pub const GPIO_REMOTE_D1: u8 = 13;
pub const GPIO_REMOTE_D2: u8 = 19;
pub const GPIO_REMOTE_D3: u8 = 26;
/// Push button to ground, pulled up.
pub const GPIO_SHUTDOWN_BUTTON: u8 = 16;

// ** LED CONFIGURATION ** //

pub const GPIO_LED_LEFT: u8 = 23;
pub const GPIO_LED_RIGHT: u8 = 24;

// ** MAIN LOOP CONFIGURATION ** //

/// Each dwell phase is DWELL_TICKS * TICK_MS long (10 seconds).
pub const DWELL_TICKS: u32 = 100;
pub const TICK_MS: u64 = 100;

/// Runtime settings, fixed once the process has started.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockConfig {
    pub gear_ratio: f64,
    pub hour_offset: i32,
    pub deadzone: f64,
    pub cruise_speed: u32,
    pub move_poll_interval: Duration,
    /// None waits forever for the actuator to go idle.
    pub move_poll_limit: Option<u32>,
    pub dwell_ticks: u32,
    pub tick: Duration,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            gear_ratio: GEAR_RATIO,
            hour_offset: HOUR_OFFSET,
            deadzone: DEADZONE_DEGREES,
            cruise_speed: CRUISE_SPEED,
            move_poll_interval: Duration::from_millis(MOVE_POLL_INTERVAL_MS),
            move_poll_limit: None,
            dwell_ticks: DWELL_TICKS,
            tick: Duration::from_millis(TICK_MS),
        }
    }
}

impl ClockConfig {
    /// Reject settings that would only fail once the loop is running.
    pub fn validate(&self) -> Result<(), ClockError> {
        if !(self.gear_ratio.is_finite() && self.gear_ratio > 0.0) {
            return Err(ClockError::InvalidGearRatio(self.gear_ratio));
        }
        if !(self.deadzone.is_finite() && self.deadzone > 0.0) {
            return Err(ClockError::InvalidDeadzone(self.deadzone));
        }
        Ok(())
    }

    /// Convert a wall-time budget for a single move into a poll count.
    pub fn with_move_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.move_poll_limit = timeout.map(|t| {
            let interval = self.move_poll_interval.as_secs_f64();
            if interval <= 0.0 {
                1
            } else {
                (t.as_secs_f64() / interval).ceil().max(1.0) as u32
            }
        });
        self
    }

    /// Same timing with no sleeping, for driving the loop in tests.
    pub fn instantaneous(mut self) -> Self {
        self.move_poll_interval = Duration::ZERO;
        self.tick = Duration::ZERO;
        self
    }
}
