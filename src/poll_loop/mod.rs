//! The fixed-rate joystick poll loop
//!
//! One [`PollLoop`] owns every piece of mutable state: the ADC, the player,
//! the last direction a sound was started for, and the gesture history.
//! [`PollLoop::tick`] is synchronous and takes the current time, so the
//! decision logic can be driven directly; [`PollLoop::run`] adds the sleeps
//! and shutdown checks around it.

use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, trace, warn};

use crate::audio::{Playback, SoundBank, SoundHandle};
use crate::config::AppConfig;
use crate::gesture::GestureDetector;
use crate::input::{classify, AnalogReader, Direction};
use crate::shutdown::ShutdownFlag;


/// Loop lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    ShuttingDown,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The ADC read failed; nothing else was touched
    ReadFailed,
    /// The waggle fired and the gesture sound started; a cooldown follows
    Gesture,
    /// Stick is centered; playback was stopped if it was running
    Centered,
    /// A new direction sound was started
    Played(Direction),
    /// Same direction as before, or no sound mapped for it
    Held(Direction),
}

/// Loop parameters taken from [`AppConfig`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopSettings {
    pub x_channel: u8,
    pub y_channel: u8,
    pub threshold: f32,
    pub tick_interval: Duration,
    pub gesture_window: Duration,
    pub gesture_cooldown: Duration,
    pub gesture_dedup: bool,
}

impl LoopSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            x_channel: config.x_channel,
            y_channel: config.y_channel,
            threshold: config.threshold,
            tick_interval: config.tick_interval(),
            gesture_window: config.gesture_window(),
            gesture_cooldown: config.gesture_cooldown(),
            gesture_dedup: config.gesture_dedup,
        }
    }
}

/// Poll loop context
pub struct PollLoop<R, P> {
    reader: R,
    player: P,
    sounds: SoundBank,
    detector: GestureDetector,
    settings: LoopSettings,
    /// Direction whose sound was last started; `None` after centering
    last_direction: Option<Direction>,
    shutdown: ShutdownFlag,
    state: LoopState,
}

impl<R: AnalogReader, P: Playback> PollLoop<R, P> {
    pub fn new(
        settings: LoopSettings,
        reader: R,
        player: P,
        sounds: SoundBank,
        shutdown: ShutdownFlag,
    ) -> Self {
        Self {
            reader,
            player,
            sounds,
            detector: GestureDetector::new(settings.gesture_window, settings.gesture_dedup),
            settings,
            last_direction: None,
            shutdown,
            state: LoopState::Running,
        }
    }

    /// Run one poll iteration at time `now`
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        let reading = match self
            .reader
            .read_axes(self.settings.x_channel, self.settings.y_channel)
        {
            Ok(reading) => reading,
            Err(e) => {
                warn!("Failed to read joystick: {}", e);
                return TickOutcome::ReadFailed;
            }
        };

        let axis = reading.normalize();
        let direction = classify(axis.x, axis.y, self.settings.threshold);
        trace!(
            "raw=({}, {}) normalized=({:+.2}, {:+.2}) -> {}",
            reading.x,
            reading.y,
            axis.x,
            axis.y,
            direction
        );

        if self.detector.update(direction, now) {
            if let Some(sound) = self.sounds.gesture().cloned() {
                info!("Gesture detected: waggle -> playing {}", sound.name());
                self.switch_to(&sound);
                self.last_direction = None;
                return TickOutcome::Gesture;
            }
            debug!("Gesture detected but no gesture sound is loaded");
        }

        if direction == Direction::Center {
            if self.player.is_busy() {
                self.player.stop();
                info!("Joystick centered -> stopping sound");
            }
            self.last_direction = None;
            return TickOutcome::Centered;
        }

        if self.last_direction != Some(direction) {
            if let Some(sound) = self.sounds.for_direction(direction).cloned() {
                info!("Playing {} sound", direction);
                self.switch_to(&sound);
                self.last_direction = Some(direction);
                return TickOutcome::Played(direction);
            }
        }

        TickOutcome::Held(direction)
    }

    /// Stop whatever is playing, then start `sound`
    fn switch_to(&mut self, sound: &SoundHandle) {
        if self.player.is_busy() {
            self.player.stop();
        }
        if let Err(e) = self.player.play(sound) {
            warn!("Failed to play '{}': {}", sound.name(), e);
        }
    }

    /// Poll until shutdown is requested, then clean up
    pub async fn run(&mut self) {
        info!("Joystick Sound Player started. Move joystick to play sounds.");
        info!("Press Ctrl+C to exit.");

        while !self.shutdown.is_requested() {
            let now = tokio::time::Instant::now().into_std();

            let pause = match self.tick(now) {
                TickOutcome::Gesture => {
                    debug!("Gesture cooldown for {:?}", self.settings.gesture_cooldown);
                    self.settings.gesture_cooldown
                }
                _ => self.settings.tick_interval,
            };

            if !self.wait(pause).await {
                break;
            }
        }

        self.finish();
    }

    /// Sleep for `total`, waking at least once per tick interval to check
    /// for shutdown
    ///
    /// Returns false if shutdown was requested before the time ran out.
    pub async fn wait(&self, total: Duration) -> bool {
        // `None` when `total` runs past what the clock can represent
        let deadline = tokio::time::Instant::now().checked_add(total);

        loop {
            if self.shutdown.is_requested() {
                return false;
            }

            let now = tokio::time::Instant::now();
            let step = match deadline {
                Some(deadline) if now >= deadline => return true,
                Some(deadline) => (deadline - now).min(self.settings.tick_interval),
                None => self.settings.tick_interval,
            };

            sleep(step).await;
        }
    }

    /// Stop playback and mark the loop as shut down
    pub fn finish(&mut self) {
        if self.state == LoopState::ShuttingDown {
            return;
        }
        self.state = LoopState::ShuttingDown;

        info!("Exiting...");
        if self.player.is_busy() {
            self.player.stop();
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn last_direction(&self) -> Option<Direction> {
        self.last_direction
    }

    pub fn gesture_history_len(&self) -> usize {
        self.detector.len()
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn settings(&self) -> &LoopSettings {
        &self.settings
    }
}
