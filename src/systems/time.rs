//! Time update system.
//!
//! Updates the shared [`PlaybackClock`](crate::resources::playbackclock::PlaybackClock)
//! resource once per tick, applying pause and speed to the provided delta.
use bevy_ecs::prelude::*;
use log::warn;

use crate::resources::playbackclock::PlaybackClock;

/// Record the scaled delta for this tick on the `PlaybackClock` resource.
///
/// `dt` is the unscaled time since the previous tick, in animation ticks.
/// Negative or non-finite values are treated as zero.
pub fn update_playback_clock(world: &mut World, dt: f32) {
    let dt = if dt.is_finite() && dt >= 0.0 {
        dt
    } else {
        warn!("Ignoring invalid tick delta {dt}");
        0.0
    };
    world.resource_mut::<PlaybackClock>().advance(dt);
}
