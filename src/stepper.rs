use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};

// Use rppal in production
#[cfg(not(test))]
use rppal::gpio::{Gpio, OutputPin};

// Mock GPIO for testing
#[cfg(test)]
use crate::mocks::mock_gpio::{Gpio, OutputPin};

use crate::config::{GPIO_STEPPER_DIR, GPIO_STEPPER_STEP, STEPS_PER_REVOLUTION, STEP_PULSE_US};
use crate::error::ClockError;
use crate::hardware::PositionActuator;

struct DriverPins {
    step: OutputPin,
    dir: OutputPin,
}

/// Stepper motor behind a STEP/DIR driver (A4988, DRV8825, ...).
///
/// There is no encoder: the step count since startup is the position.
/// Moves run on a worker thread so `move_to_absolute` returns immediately;
/// `is_busy` reports whether that thread is still stepping.
pub struct StepperActuator {
    pins: Arc<Mutex<DriverPins>>,
    position: Arc<AtomicI64>,
    busy: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    steps_per_revolution: i64,
}

impl StepperActuator {
    pub fn new() -> Result<Self, ClockError> {
        Self::with_pins(GPIO_STEPPER_STEP, GPIO_STEPPER_DIR, STEPS_PER_REVOLUTION)
    }

    pub fn with_pins(
        step_pin: u8,
        dir_pin: u8,
        steps_per_revolution: i64,
    ) -> Result<Self, ClockError> {
        let gpio = Gpio::new()?;
        let step = gpio.get(step_pin)?.into_output_low();
        let dir = gpio.get(dir_pin)?.into_output_low();

        Ok(Self {
            pins: Arc::new(Mutex::new(DriverPins { step, dir })),
            position: Arc::new(AtomicI64::new(0)),
            busy: Arc::new(AtomicBool::new(false)),
            worker: None,
            steps_per_revolution,
        })
    }

    fn join_worker(&mut self) {
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            warn!("Stepper worker panicked");
            self.busy.store(false, Ordering::SeqCst);
        }
    }
}

impl PositionActuator for StepperActuator {
    fn counts_per_revolution(&self) -> i64 {
        self.steps_per_revolution
    }

    fn raw_position(&self) -> i64 {
        self.position.load(Ordering::SeqCst)
    }

    fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    fn move_to_absolute(&mut self, position: i64, speed: u32) -> Result<(), ClockError> {
        self.join_worker();

        let period = Duration::from_secs_f64(1.0 / speed.max(1) as f64);
        let pulse = Duration::from_micros(STEP_PULSE_US).min(period);
        let pins = Arc::clone(&self.pins);
        let current = Arc::clone(&self.position);
        let busy = Arc::clone(&self.busy);

        debug!(
            "Stepping from {} to {} at {} steps/s",
            self.raw_position(),
            position,
            speed
        );
        busy.store(true, Ordering::SeqCst);

        let worker = thread::Builder::new()
            .name("stepper".into())
            .spawn(move || {
                let mut pins = pins.lock().unwrap_or_else(|e| e.into_inner());
                loop {
                    let here = current.load(Ordering::SeqCst);
                    if here == position {
                        break;
                    }
                    let forward = position > here;
                    if forward {
                        pins.dir.set_high();
                    } else {
                        pins.dir.set_low();
                    }

                    pins.step.set_high();
                    thread::sleep(pulse);
                    pins.step.set_low();
                    thread::sleep(period - pulse);

                    current.fetch_add(if forward { 1 } else { -1 }, Ordering::SeqCst);
                }
                busy.store(false, Ordering::SeqCst);
            });

        match worker {
            Ok(handle) => {
                self.worker = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.busy.store(false, Ordering::SeqCst);
                Err(e.into())
            }
        }
    }
}

impl Drop for StepperActuator {
    fn drop(&mut self) {
        // Let an in-flight move finish before the pins are released
        self.join_worker();
    }
}
