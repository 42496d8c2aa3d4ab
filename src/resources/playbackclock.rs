//! Scene playback clock.
//!
//! The [`PlaybackClock`] resource is the single timing authority of a scene.
//! It holds the run/pause flag and the speed multiplier, and records the
//! scaled delta applied by the most recent tick so systems can read it.

use bevy_ecs::prelude::Resource;
use log::{debug, warn};

use crate::error::InvalidSpeedError;

/// Whether the clock lets time through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Running,
    Paused,
}

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct PlaybackClock {
    state: PlaybackState,
    speed: f32,
    /// Scaled delta of the current tick, in ticks.
    delta: f32,
    /// Scaled time accumulated since the clock was created, in ticks.
    elapsed: f64,
    frame_count: u64,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        PlaybackClock {
            state: PlaybackState::Running,
            speed: 1.0,
            delta: 0.0,
            elapsed: 0.0,
            frame_count: 0,
        }
    }
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a given speed factor.
    pub fn with_speed(mut self, factor: f32) -> Result<Self, InvalidSpeedError> {
        self.set_speed(factor)?;
        Ok(self)
    }

    /// Start paused instead of running.
    pub fn paused(mut self) -> Self {
        self.state = PlaybackState::Paused;
        self
    }

    pub fn pause(&mut self) {
        if self.state != PlaybackState::Paused {
            debug!("Playback paused");
            self.state = PlaybackState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state != PlaybackState::Running {
            debug!("Playback resumed");
            self.state = PlaybackState::Running;
        }
    }

    /// Replace the speed multiplier. Takes effect on the next tick.
    pub fn set_speed(&mut self, factor: f32) -> Result<(), InvalidSpeedError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(InvalidSpeedError { factor });
        }
        debug!("Playback speed {} -> {}", self.speed, factor);
        self.speed = factor;
        Ok(())
    }

    /// `dt` scaled by the speed factor, or zero while paused.
    pub fn scaled_delta(&self, dt: f32) -> f32 {
        match self.state {
            PlaybackState::Running => dt * self.speed,
            PlaybackState::Paused => 0.0,
        }
    }

    /// Record the start of a new tick of `dt` unscaled ticks.
    ///
    /// A scaled delta that overflows to a non-finite value counts as zero.
    pub(crate) fn advance(&mut self, dt: f32) {
        let mut scaled = self.scaled_delta(dt);
        if !scaled.is_finite() {
            warn!(
                "Ignoring tick: delta {} at speed {} overflows",
                dt, self.speed
            );
            scaled = 0.0;
        }
        self.delta = scaled;
        self.elapsed += f64::from(scaled);
        self.frame_count += 1;
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == PlaybackState::Paused
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn delta(&self) -> f32 {
        self.delta
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
