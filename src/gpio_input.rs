use std::thread;
use std::time::Duration;

// Use rppal in production
#[cfg(not(test))]
use rppal::gpio::{Gpio, InputPin, Level};

#[cfg(test)]
// This is only used in testing, not compiled in release.
use crate::mocks::mock_gpio::{Gpio, InputPin, Level};

use crate::config::{
    GPIO_REMOTE_D0, GPIO_REMOTE_D1, GPIO_REMOTE_D2, GPIO_REMOTE_D3, GPIO_REMOTE_VT,
    GPIO_SHUTDOWN_BUTTON,
};
use crate::error::ClockError;
use crate::hardware::{RemoteButtons, RemoteSource, ShutdownSignal};

/// 4-channel RF receiver (VT + D0..D3 outputs, active high).
pub struct RemoteReceiver {
    valid_transmission: InputPin,
    red_up: InputPin,
    red_down: InputPin,
    blue_up: InputPin,
    blue_down: InputPin,
}

impl RemoteReceiver {
    pub fn new() -> Result<Self, ClockError> {
        Self::with_pins(
            GPIO_REMOTE_VT,
            [GPIO_REMOTE_D0, GPIO_REMOTE_D1, GPIO_REMOTE_D2, GPIO_REMOTE_D3],
        )
    }

    /// Data pins in order: red up, red down, blue up, blue down.
    pub fn with_pins(vt_pin: u8, data_pins: [u8; 4]) -> Result<Self, ClockError> {
        let gpio = Gpio::new()?;

        let valid_transmission = gpio.get(vt_pin)?.into_input_pulldown();
        let red_up = gpio.get(data_pins[0])?.into_input_pulldown();
        let red_down = gpio.get(data_pins[1])?.into_input_pulldown();
        let blue_up = gpio.get(data_pins[2])?.into_input_pulldown();
        let blue_down = gpio.get(data_pins[3])?.into_input_pulldown();

        thread::sleep(Duration::from_millis(100));

        Ok(Self {
            valid_transmission,
            red_up,
            red_down,
            blue_up,
            blue_down,
        })
    }
}

impl RemoteSource for RemoteReceiver {
    fn is_connected(&self) -> bool {
        self.valid_transmission.read() == Level::High
    }

    fn buttons(&self) -> RemoteButtons {
        RemoteButtons {
            red_up: self.red_up.read() == Level::High,
            red_down: self.red_down.read() == Level::High,
            blue_up: self.blue_up.read() == Level::High,
            blue_down: self.blue_down.read() == Level::High,
        }
    }
}

/// Momentary push button wired to ground.
pub struct ShutdownButton {
    button: InputPin,
}

impl ShutdownButton {
    pub fn new() -> Result<Self, ClockError> {
        Self::with_pin(GPIO_SHUTDOWN_BUTTON)
    }

    pub fn with_pin(pin: u8) -> Result<Self, ClockError> {
        let gpio = Gpio::new()?;
        let button = gpio.get(pin)?.into_input_pullup();

        thread::sleep(Duration::from_millis(100));

        Ok(Self { button })
    }
}

impl ShutdownSignal for ShutdownButton {
    fn is_requested(&self) -> bool {
        self.button.read() == Level::Low
    }
}
