use std::thread;

use log::{debug, info, warn};

use crate::announce::say_time;
use crate::config::ClockConfig;
use crate::error::ClockError;
use crate::hardware::{PositionActuator, RemoteSource, ShutdownSignal, SpeechSink};
use crate::hysteresis::{quantize, should_move};
use crate::position::PositionController;
use crate::projector::{adjusted_hour, target_angle};
use crate::wall_clock::{WallClock, WallTime};

/// What a remote button asks for. Listed in dispatch priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoteCommand {
    AnnounceTime,
    SoundA,
    SoundB,
    SoundC,
}

impl RemoteCommand {
    /// Phrase for the fixed sound cues.
    pub fn phrase(&self) -> Option<&'static str> {
        match self {
            RemoteCommand::AnnounceTime => None,
            RemoteCommand::SoundA => Some("oink"),
            RemoteCommand::SoundB => Some("butter, do you know the way butter?"),
            RemoteCommand::SoundC => Some("I tell the time. What do you do?"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DwellOutcome {
    Elapsed,
    Shutdown,
}

/// Loop-owned bookkeeping carried from one cycle to the next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopState {
    /// Midnights seen so far. Only ever grows.
    pub day_wraps: u64,
    pub last_hour: Option<u32>,
    /// Adjusted time from the most recent cycle.
    pub last_time: Option<WallTime>,
}

impl LoopState {
    /// Record this cycle's hour, counting a day wrap when the hour went down.
    ///
    /// Only the hour value is compared, so a pause spanning several
    /// midnights still counts one.
    pub fn observe_hour(&mut self, hour: u32) {
        if let Some(last) = self.last_hour
            && last > hour
        {
            self.day_wraps += 1;
        }
        self.last_hour = Some(hour);
    }
}

pub struct ControlLoop<A, R, P, S, W>
where
    A: PositionActuator,
    R: RemoteSource,
    P: ShutdownSignal,
    S: SpeechSink,
    W: WallClock,
{
    dial: PositionController<A>,
    remote: R,
    shutdown: P,
    speech: S,
    clock: W,
    config: ClockConfig,
    state: LoopState,
}

impl<A, R, P, S, W> ControlLoop<A, R, P, S, W>
where
    A: PositionActuator,
    R: RemoteSource,
    P: ShutdownSignal,
    S: SpeechSink,
    W: WallClock,
{
    /// The dial must already be calibrated.
    pub fn new(
        dial: PositionController<A>,
        remote: R,
        shutdown: P,
        speech: S,
        clock: W,
        config: ClockConfig,
    ) -> Result<Self, ClockError> {
        config.validate()?;
        Ok(Self {
            dial,
            remote,
            shutdown,
            speech,
            clock,
            config,
            state: LoopState::default(),
        })
    }

    /// Keep the dial on time until the shutdown button is pressed.
    pub fn run(&mut self) -> Result<(), ClockError> {
        loop {
            self.update_dial()?;
            if self.dwell()? == DwellOutcome::Shutdown {
                info!("Shutdown requested");
                return Ok(());
            }
        }
    }

    /// Point the dial at the current time. Returns the new angle if it moved.
    pub fn update_dial(&mut self) -> Result<Option<f64>, ClockError> {
        let now = self.clock.now();
        let hour = adjusted_hour(now.hour, self.config.hour_offset);
        let minute = now.minute;

        self.state.observe_hour(hour);
        self.state.last_time = Some(WallTime::new(hour, minute));

        let target = quantize(
            target_angle(hour, minute, self.state.day_wraps),
            self.config.deadzone,
        );

        if !should_move(self.dial.get_position(), target, self.config.deadzone) {
            return Ok(None);
        }

        match self.dial.set_position(target) {
            Ok(()) => {
                info!("position: {}, hour: {}, minute: {}", target, hour, minute);
                Ok(Some(target))
            }
            Err(e @ ClockError::ActuatorTimeout { .. }) => {
                warn!("Dial move abandoned: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Wait out the rest of the cycle, serving the remote between ticks.
    pub fn dwell(&mut self) -> Result<DwellOutcome, ClockError> {
        for _ in 0..self.config.dwell_ticks {
            thread::sleep(self.config.tick);

            if self.shutdown.is_requested() {
                return Ok(DwellOutcome::Shutdown);
            }
            if let Some(command) = self.poll_remote() {
                self.dispatch(command);
            }
        }
        Ok(DwellOutcome::Elapsed)
    }

    /// Highest-priority pressed button, if the remote is connected.
    pub fn poll_remote(&self) -> Option<RemoteCommand> {
        if !self.remote.is_connected() {
            return None;
        }
        let buttons = self.remote.buttons();
        if buttons.red_up {
            Some(RemoteCommand::AnnounceTime)
        } else if buttons.red_down {
            Some(RemoteCommand::SoundA)
        } else if buttons.blue_up {
            Some(RemoteCommand::SoundB)
        } else if buttons.blue_down {
            Some(RemoteCommand::SoundC)
        } else {
            None
        }
    }

    /// Play a command to completion. Speech failures are logged, never fatal.
    pub fn dispatch(&mut self, command: RemoteCommand) {
        debug!("Remote command: {:?}", command);
        let result = match (command.phrase(), self.state.last_time) {
            (Some(phrase), _) => self.speech.speak_blocking(phrase),
            (None, Some(time)) => say_time(&mut self.speech, time.hour, time.minute),
            (None, None) => Ok(()),
        };
        if let Err(e) = result {
            warn!("Could not play {:?}: {}", command, e);
        }
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    pub fn dial(&self) -> &PositionController<A> {
        &self.dial
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::RemoteButtons;
    use crate::sim::{SimActuator, SimClock, SimRemote, SimShutdown, SimSpeech};

    type SimLoop = ControlLoop<SimActuator, SimRemote, SimShutdown, SimSpeech, SimClock>;

    struct Rig {
        actuator: SimActuator,
        remote: SimRemote,
        shutdown: SimShutdown,
        speech: SimSpeech,
        clock: SimClock,
    }

    impl Rig {
        fn new(start: WallTime) -> Self {
            Self {
                actuator: SimActuator::new(360),
                remote: SimRemote::new(),
                shutdown: SimShutdown::never(),
                speech: SimSpeech::new(),
                clock: SimClock::new(start),
            }
        }

        fn then_time(self, time: WallTime) -> Self {
            Self {
                clock: self.clock.then(time),
                ..self
            }
        }

        fn build(&self, config: ClockConfig) -> Result<SimLoop, ClockError> {
            let config = config.instantaneous();
            let mut dial = PositionController::new(self.actuator.clone(), &config)?;
            dial.calibrate_origin_here();
            ControlLoop::new(
                dial,
                self.remote.clone(),
                self.shutdown.clone(),
                self.speech.clone(),
                self.clock.clone(),
                config,
            )
        }
    }

    fn utc_config() -> ClockConfig {
        ClockConfig {
            hour_offset: 0,
            ..ClockConfig::default()
        }
    }

    // region: UNIT_TESTS
    #[test]
    fn test_day_wrap_counts_once() {
        let mut state = LoopState::default();
        state.observe_hour(23);
        state.observe_hour(0);
        assert_eq!(state.day_wraps, 1);
        state.observe_hour(0);
        state.observe_hour(1);
        assert_eq!(state.day_wraps, 1);
    }

    #[test]
    fn test_first_observation_never_wraps() {
        let mut state = LoopState::default();
        state.observe_hour(0);
        assert_eq!(state.day_wraps, 0);
        assert_eq!(state.last_hour, Some(0));
    }

    #[test]
    fn test_sound_phrases() {
        assert_eq!(RemoteCommand::AnnounceTime.phrase(), None);
        assert_eq!(RemoteCommand::SoundA.phrase(), Some("oink"));
    }
    // endregion: UNIT_TESTS

    // region: SIMULATED HARDWARE
    #[test]
    fn test_six_am_moves_dial_to_quarter_turn() -> Result<(), ClockError> {
        let rig = Rig::new(WallTime::new(6, 0));
        let mut clock = rig.build(utc_config())?;

        assert_eq!(clock.update_dial()?, Some(90.0));
        // 90° of dial is 270° of shaft
        assert_eq!(rig.actuator.last_move(), Some((270, 200)));

        // Nothing to do a minute later
        rig.clock.set(WallTime::new(6, 1));
        assert_eq!(clock.update_dial()?, None);
        assert_eq!(rig.actuator.moves().len(), 1);
        Ok(())
    }

    #[test]
    fn test_hour_offset_applied() -> Result<(), ClockError> {
        let rig = Rig::new(WallTime::new(11, 0));
        let mut clock = rig.build(ClockConfig::default())?;

        assert_eq!(clock.update_dial()?, Some(90.0));
        assert_eq!(clock.state().last_time, Some(WallTime::new(6, 0)));
        Ok(())
    }

    #[test]
    fn test_midnight_keeps_turning_forward() -> Result<(), ClockError> {
        let rig = Rig::new(WallTime::new(23, 59)).then_time(WallTime::new(0, 0));
        let mut clock = rig.build(utc_config())?;

        // 23:59 is 359.75°, snapped to 360°
        assert_eq!(clock.update_dial()?, Some(360.0));
        assert_eq!(clock.update_dial()?, None);
        assert_eq!(clock.state().day_wraps, 1);

        rig.clock.set(WallTime::new(0, 20));
        assert_eq!(clock.update_dial()?, Some(365.0));
        assert!(clock.dial().get_position() > 360.0);
        Ok(())
    }

    #[test]
    fn test_small_drift_is_ignored() -> Result<(), ClockError> {
        let rig = Rig::new(WallTime::new(6, 0));
        let mut clock = rig.build(utc_config())?;
        clock.update_dial()?;

        // Shaft knocked 6 counts (2° of dial)
        rig.actuator.set_raw_position(276);
        assert_eq!(clock.update_dial()?, None);

        // 18 counts is 6° of dial
        rig.actuator.set_raw_position(288);
        assert_eq!(clock.update_dial()?, Some(90.0));
        assert_eq!(rig.actuator.last_move(), Some((270, 200)));
        Ok(())
    }

    #[test]
    fn test_stuck_actuator_does_not_stop_loop() -> Result<(), ClockError> {
        let rig = Rig::new(WallTime::new(6, 0));
        let actuator = rig.actuator.clone().with_settle_polls(u32::MAX);
        let config = ClockConfig {
            move_poll_limit: Some(2),
            ..utc_config()
        };
        let mut clock = rig.build(config)?;

        assert_eq!(clock.update_dial()?, None);
        assert_eq!(actuator.moves().len(), 1);
        Ok(())
    }

    #[test]
    fn test_shutdown_mid_dwell() -> Result<(), ClockError> {
        let mut rig = Rig::new(WallTime::new(6, 0));
        rig.shutdown = SimShutdown::after(5);
        let mut clock = rig.build(utc_config())?;

        assert_eq!(clock.dwell()?, DwellOutcome::Shutdown);
        assert_eq!(rig.shutdown.checks(), 6);
        Ok(())
    }

    #[test]
    fn test_run_stops_before_next_update() -> Result<(), ClockError> {
        let mut rig = Rig::new(WallTime::new(6, 0)).then_time(WallTime::new(12, 0));
        // one full dwell, then stop partway through the second
        rig.shutdown = SimShutdown::after(100 + 10);
        let mut clock = rig.build(utc_config())?;

        clock.run()?;

        // 06:00 and 12:00 were shown, a third cycle never started
        assert_eq!(rig.actuator.moves(), vec![(270, 200), (540, 200)]);
        assert_eq!(rig.shutdown.checks(), 111);
        Ok(())
    }

    #[test]
    fn test_full_dwell_without_shutdown() -> Result<(), ClockError> {
        let rig = Rig::new(WallTime::new(6, 0));
        let mut clock = rig.build(utc_config())?;

        assert_eq!(clock.dwell()?, DwellOutcome::Elapsed);
        assert_eq!(rig.shutdown.checks(), 100);
        Ok(())
    }

    #[test]
    fn test_announce_time_from_remote() -> Result<(), ClockError> {
        let rig = Rig::new(WallTime::new(18, 5));
        rig.remote.set_connected(true);
        rig.remote.push(RemoteButtons {
            red_up: true,
            blue_down: true,
            ..RemoteButtons::default()
        });
        let mut clock = rig.build(ClockConfig::default())?;

        clock.update_dial()?;
        clock.dwell()?;

        assert_eq!(rig.speech.spoken(), vec!["1 , Oh 5 P M".to_string()]);
        assert_eq!(rig.speech.blocking_count(), 1);
        Ok(())
    }

    #[test]
    fn test_one_command_per_tick_in_priority_order() -> Result<(), ClockError> {
        let rig = Rig::new(WallTime::new(6, 0));
        rig.remote.set_connected(true);
        rig.remote.push(RemoteButtons {
            red_down: true,
            blue_up: true,
            ..RemoteButtons::default()
        });
        rig.remote.push(RemoteButtons::default());
        rig.remote.push(RemoteButtons {
            blue_up: true,
            blue_down: true,
            ..RemoteButtons::default()
        });
        let mut clock = rig.build(utc_config())?;

        clock.dwell()?;

        assert_eq!(
            rig.speech.spoken(),
            vec![
                "oink".to_string(),
                "butter, do you know the way butter?".to_string()
            ]
        );
        Ok(())
    }

    #[test]
    fn test_disconnected_remote_is_ignored() -> Result<(), ClockError> {
        let rig = Rig::new(WallTime::new(6, 0));
        rig.remote.push(RemoteButtons {
            red_down: true,
            ..RemoteButtons::default()
        });
        let mut clock = rig.build(utc_config())?;

        assert_eq!(clock.poll_remote(), None);
        clock.dwell()?;
        assert!(rig.speech.spoken().is_empty());
        // presses are never read while disconnected
        assert_eq!(rig.remote.pending(), 1);
        Ok(())
    }

    #[test]
    fn test_speech_failure_is_not_fatal() -> Result<(), ClockError> {
        let mut rig = Rig::new(WallTime::new(6, 0));
        rig.speech = SimSpeech::failing();
        rig.remote.set_connected(true);
        rig.remote.push(RemoteButtons {
            blue_down: true,
            ..RemoteButtons::default()
        });
        let mut clock = rig.build(utc_config())?;

        assert_eq!(clock.dwell()?, DwellOutcome::Elapsed);
        Ok(())
    }
    // endregion: SIMULATED HARDWARE
}
