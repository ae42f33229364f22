//! In-memory hardware for `--simulate` runs and tests.
//!
//! Every simulator is a cheap handle around shared state, so a clone kept by
//! the caller observes what the clock did with the one it was given.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

use log::info;

use crate::error::ClockError;
use crate::hardware::{
    Indicator, PositionActuator, RemoteButtons, RemoteSource, ShutdownSignal, SpeechSink,
};
use crate::wall_clock::{WallClock, WallTime};

// region: ACTUATOR
#[derive(Debug, Default)]
struct ActuatorState {
    counts_per_revolution: i64,
    position: i64,
    settle_polls: u32,
    busy_remaining: u32,
    busy_reads: u32,
    moves: Vec<(i64, u32)>,
}

/// Reaches every target instantly, then reports busy for `settle_polls` reads.
#[derive(Clone, Debug)]
pub struct SimActuator {
    state: Rc<RefCell<ActuatorState>>,
}

impl SimActuator {
    pub fn new(counts_per_revolution: i64) -> Self {
        Self {
            state: Rc::new(RefCell::new(ActuatorState {
                counts_per_revolution,
                ..ActuatorState::default()
            })),
        }
    }

    pub fn with_settle_polls(self, polls: u32) -> Self {
        self.state.borrow_mut().settle_polls = polls;
        self
    }

    /// Turn the shaft by hand.
    pub fn set_raw_position(&self, position: i64) {
        self.state.borrow_mut().position = position;
    }

    pub fn moves(&self) -> Vec<(i64, u32)> {
        self.state.borrow().moves.clone()
    }

    pub fn last_move(&self) -> Option<(i64, u32)> {
        self.state.borrow().moves.last().copied()
    }

    pub fn busy_reads(&self) -> u32 {
        self.state.borrow().busy_reads
    }
}

impl PositionActuator for SimActuator {
    fn counts_per_revolution(&self) -> i64 {
        self.state.borrow().counts_per_revolution
    }

    fn raw_position(&self) -> i64 {
        self.state.borrow().position
    }

    fn is_busy(&self) -> bool {
        let mut state = self.state.borrow_mut();
        state.busy_reads += 1;
        if state.busy_remaining > 0 {
            state.busy_remaining -= 1;
            true
        } else {
            false
        }
    }

    fn move_to_absolute(&mut self, position: i64, speed: u32) -> Result<(), ClockError> {
        let mut state = self.state.borrow_mut();
        state.moves.push((position, speed));
        state.position = position;
        state.busy_remaining = state.settle_polls;
        state.busy_reads = 0;
        Ok(())
    }
}
// endregion: ACTUATOR

// region: REMOTE
#[derive(Debug, Default)]
struct RemoteState {
    connected: bool,
    presses: VecDeque<RemoteButtons>,
}

/// Plays back queued button snapshots, one per read, then reports nothing pressed.
#[derive(Clone, Debug, Default)]
pub struct SimRemote {
    state: Rc<RefCell<RemoteState>>,
}

impl SimRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_connected(&self, connected: bool) {
        self.state.borrow_mut().connected = connected;
    }

    pub fn push(&self, buttons: RemoteButtons) {
        self.state.borrow_mut().presses.push_back(buttons);
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().presses.len()
    }
}

impl RemoteSource for SimRemote {
    fn is_connected(&self) -> bool {
        self.state.borrow().connected
    }

    fn buttons(&self) -> RemoteButtons {
        self.state
            .borrow_mut()
            .presses
            .pop_front()
            .unwrap_or_default()
    }
}
// endregion: REMOTE

// region: SHUTDOWN
#[derive(Debug, Default)]
struct ShutdownState {
    checks: u32,
    trip_after: Option<u32>,
}

/// Reports a shutdown request once it has been checked `trip_after` times.
#[derive(Clone, Debug, Default)]
pub struct SimShutdown {
    state: Rc<RefCell<ShutdownState>>,
}

impl SimShutdown {
    pub fn never() -> Self {
        Self::default()
    }

    pub fn after(checks: u32) -> Self {
        let shutdown = Self::default();
        shutdown.state.borrow_mut().trip_after = Some(checks);
        shutdown
    }

    pub fn checks(&self) -> u32 {
        self.state.borrow().checks
    }
}

impl ShutdownSignal for SimShutdown {
    fn is_requested(&self) -> bool {
        let mut state = self.state.borrow_mut();
        let requested = state.trip_after.is_some_and(|n| state.checks >= n);
        state.checks += 1;
        requested
    }
}
// endregion: SHUTDOWN

// region: SPEECH
#[derive(Debug, Default)]
struct SpeechState {
    spoken: Vec<String>,
    blocking: u32,
    fail: bool,
}

/// Records announcements instead of playing them.
#[derive(Clone, Debug, Default)]
pub struct SimSpeech {
    state: Rc<RefCell<SpeechState>>,
}

impl SimSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every later call fails as if the synthesizer were missing.
    pub fn failing() -> Self {
        let speech = Self::default();
        speech.state.borrow_mut().fail = true;
        speech
    }

    pub fn spoken(&self) -> Vec<String> {
        self.state.borrow().spoken.clone()
    }

    pub fn blocking_count(&self) -> u32 {
        self.state.borrow().blocking
    }

    fn record(&self, text: &str) -> Result<(), ClockError> {
        let mut state = self.state.borrow_mut();
        if state.fail {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no synthesizer").into());
        }
        info!("[Sim speech] {}", text);
        state.spoken.push(text.to_string());
        Ok(())
    }
}

impl SpeechSink for SimSpeech {
    fn speak(&mut self, text: &str) -> Result<(), ClockError> {
        self.record(text)
    }

    fn speak_blocking(&mut self, text: &str) -> Result<(), ClockError> {
        self.record(text)?;
        self.state.borrow_mut().blocking += 1;
        Ok(())
    }
}
// endregion: SPEECH

// region: CLOCK
#[derive(Debug)]
struct ClockState {
    script: VecDeque<WallTime>,
    current: WallTime,
}

/// Returns queued times in order, then keeps repeating the last one.
#[derive(Clone, Debug)]
pub struct SimClock {
    state: Rc<RefCell<ClockState>>,
}

impl SimClock {
    pub fn new(start: WallTime) -> Self {
        Self {
            state: Rc::new(RefCell::new(ClockState {
                script: VecDeque::new(),
                current: start,
            })),
        }
    }

    pub fn then(self, time: WallTime) -> Self {
        self.state.borrow_mut().script.push_back(time);
        self
    }

    pub fn set(&self, time: WallTime) {
        let mut state = self.state.borrow_mut();
        state.script.clear();
        state.current = time;
    }
}

impl WallClock for SimClock {
    fn now(&self) -> WallTime {
        let mut state = self.state.borrow_mut();
        let now = state.current;
        if let Some(next) = state.script.pop_front() {
            state.current = next;
        }
        now
    }
}
// endregion: CLOCK

// region: LEDS
#[derive(Clone, Debug, Default)]
pub struct SimLeds {
    off_calls: Rc<RefCell<u32>>,
}

impl SimLeds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn off_calls(&self) -> u32 {
        *self.off_calls.borrow()
    }
}

impl Indicator for SimLeds {
    fn all_off(&mut self) -> Result<(), ClockError> {
        *self.off_calls.borrow_mut() += 1;
        Ok(())
    }
}
// endregion: LEDS

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_trips_after_checks() {
        let shutdown = SimShutdown::after(2);
        assert!(!shutdown.is_requested());
        assert!(!shutdown.is_requested());
        assert!(shutdown.is_requested());
        assert_eq!(shutdown.checks(), 3);

        let shutdown = SimShutdown::never();
        assert!((0..1000).all(|_| !shutdown.is_requested()));
    }

    #[test]
    fn test_clock_script() {
        let clock = SimClock::new(WallTime::new(23, 58)).then(WallTime::new(0, 2));
        assert_eq!(clock.now(), WallTime::new(23, 58));
        assert_eq!(clock.now(), WallTime::new(0, 2));
        assert_eq!(clock.now(), WallTime::new(0, 2));
    }

    #[test]
    fn test_remote_plays_back_presses() {
        let remote = SimRemote::new();
        remote.push(RemoteButtons {
            blue_up: true,
            ..RemoteButtons::default()
        });
        assert!(remote.buttons().blue_up);
        assert_eq!(remote.buttons(), RemoteButtons::default());
    }
}
