//! Movement system.
//!
//! Integrates [`RigidBody`] velocity into [`MapPosition`] using the scaled
//! delta of the current tick, so pausing or slowing playback affects motion
//! exactly like it affects animation.

use bevy_ecs::prelude::*;
use log::warn;

use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::resources::playbackclock::PlaybackClock;

/// Apply `position += velocity * delta` once per tick.
pub fn movement(mut query: Query<(&mut MapPosition, &RigidBody)>, clock: Res<PlaybackClock>) {
    let delta = clock.delta();
    if delta <= 0.0 {
        return;
    }
    for (mut position, rigidbody) in query.iter_mut() {
        let next = position.pos + rigidbody.velocity * delta;
        if next.is_finite() {
            position.pos = next;
        } else {
            warn!("Ignoring movement to non-finite position {next}");
        }
    }
}
