// Use rppal in production
#[cfg(not(test))]
use rppal::gpio::{Gpio, OutputPin};

#[cfg(test)]
use crate::mocks::mock_gpio::{Gpio, OutputPin};

use crate::config::{GPIO_LED_LEFT, GPIO_LED_RIGHT};
use crate::error::ClockError;
use crate::hardware::Indicator;

/// Status lights. Purely cosmetic, the clock only ever turns them off.
pub struct StatusLeds {
    leds: Vec<OutputPin>,
}

impl StatusLeds {
    pub fn new() -> Result<Self, ClockError> {
        Self::with_pins(&[GPIO_LED_LEFT, GPIO_LED_RIGHT])
    }

    pub fn with_pins(pins: &[u8]) -> Result<Self, ClockError> {
        let gpio = Gpio::new()?;
        let leds = pins
            .iter()
            .map(|&pin| -> Result<OutputPin, ClockError> {
                Ok(gpio.get(pin)?.into_output_high())
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { leds })
    }
}

impl Indicator for StatusLeds {
    fn all_off(&mut self) -> Result<(), ClockError> {
        for led in &mut self.leds {
            led.set_low();
        }
        Ok(())
    }
}
