use std::fmt;
use std::thread;
use std::time::Duration;

use log::debug;

use crate::config::ClockConfig;
use crate::error::ClockError;
use crate::hardware::PositionActuator;
use crate::units::UnitConverter;

/// Zero reference and gearing between the motor shaft and the dial.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
    pub counts_per_revolution: i64,
    pub gear_ratio: f64,
    /// Shaft angle (before gearing) at which the dial reads zero.
    pub origin_degrees: f64,
}

impl fmt::Display for Calibration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "origin {:.2}° (gear ratio {:.4}, {} counts/rev)",
            self.origin_degrees, self.gear_ratio, self.counts_per_revolution
        )
    }
}

/// Logical dial position on top of a [`PositionActuator`].
///
/// Positions are in dial degrees: shaft degrees relative to the origin,
/// multiplied by the gear ratio. Nothing is cached, every read goes to the
/// actuator.
pub struct PositionController<A: PositionActuator> {
    actuator: A,
    units: UnitConverter,
    gear_ratio: f64,
    origin_degrees: f64,
    cruise_speed: u32,
    poll_interval: Duration,
    poll_limit: Option<u32>,
}

impl<A: PositionActuator> PositionController<A> {
    pub fn new(actuator: A, config: &ClockConfig) -> Result<Self, ClockError> {
        if !(config.gear_ratio.is_finite() && config.gear_ratio > 0.0) {
            return Err(ClockError::InvalidGearRatio(config.gear_ratio));
        }
        let units = UnitConverter::new(actuator.counts_per_revolution())?;

        Ok(Self {
            actuator,
            units,
            gear_ratio: config.gear_ratio,
            origin_degrees: 0.0,
            cruise_speed: config.cruise_speed,
            poll_interval: config.move_poll_interval,
            poll_limit: config.move_poll_limit,
        })
    }

    /// Treat the current shaft position as dial zero.
    ///
    /// Call once at startup before reading or setting the position; until
    /// then the origin is the actuator's own zero.
    pub fn calibrate_origin_here(&mut self) {
        self.origin_degrees = self.units.to_degrees(self.actuator.raw_position());
    }

    pub fn calibration(&self) -> Calibration {
        Calibration {
            counts_per_revolution: self.units.counts_per_revolution(),
            gear_ratio: self.gear_ratio,
            origin_degrees: self.origin_degrees,
        }
    }

    /// Dial position in degrees.
    pub fn get_position(&self) -> f64 {
        (self.units.to_degrees(self.actuator.raw_position()) - self.origin_degrees)
            * self.gear_ratio
    }

    /// Move the dial to `degrees` and wait until the actuator is idle.
    pub fn set_position(&mut self, degrees: f64) -> Result<(), ClockError> {
        let shaft_degrees = degrees / self.gear_ratio + self.origin_degrees;
        let target = self.units.to_counts(shaft_degrees).round() as i64;

        debug!(
            "Moving to {:.1}° (shaft {:.1}°, {} counts)",
            degrees, shaft_degrees, target
        );
        self.actuator.move_to_absolute(target, self.cruise_speed)?;
        self.wait_until_idle(target)
    }

    fn wait_until_idle(&self, target: i64) -> Result<(), ClockError> {
        let mut polls = 0;
        while self.actuator.is_busy() {
            if let Some(limit) = self.poll_limit
                && polls >= limit
            {
                return Err(ClockError::ActuatorTimeout { target, polls });
            }
            thread::sleep(self.poll_interval);
            polls += 1;
        }
        Ok(())
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }
}
