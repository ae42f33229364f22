use crate::error::ClockError;

/// Converts between actuator encoder counts and degrees of shaft rotation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitConverter {
    counts_per_revolution: i64,
}

impl UnitConverter {
    pub fn new(counts_per_revolution: i64) -> Result<Self, ClockError> {
        if counts_per_revolution <= 0 {
            return Err(ClockError::InvalidCountsPerRevolution(
                counts_per_revolution,
            ));
        }
        Ok(Self {
            counts_per_revolution,
        })
    }

    pub fn counts_per_revolution(&self) -> i64 {
        self.counts_per_revolution
    }

    /// The value in degrees of an encoder reading.
    pub fn to_degrees(&self, counts: i64) -> f64 {
        (counts as f64 / self.counts_per_revolution as f64) * 360.0
    }

    /// The value in encoder counts of an angle. Not rounded.
    pub fn to_counts(&self, degrees: f64) -> f64 {
        (degrees / 360.0) * self.counts_per_revolution as f64
    }
}
