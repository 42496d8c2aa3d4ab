//! Animation playback system.
//!
//! [`animation`] advances every [`Animation`] by the scaled delta recorded on
//! the [`PlaybackClock`] for the current tick.
//!
//! # Animation Flow
//!
//! 1. Pose sequences are defined in a shared
//!    [`SpriteTypeCatalog`](crate::resources::spritecatalog::SpriteTypeCatalog)
//! 2. Each sprite entity has an [`Animation`] pointing at a state of that catalog
//! 3. [`update_playback_clock`](crate::systems::time::update_playback_clock)
//!    records the scaled delta for the tick
//! 4. This system walks the pose sequence forward, looping at the end
//!
//! # Related
//!
//! - [`crate::components::animation::Animation`] – per-entity playback state
//! - [`crate::systems::movement`] – position integration driven by the same delta

use std::sync::Arc;

use bevy_ecs::prelude::*;
use log::warn;

use crate::components::animation::Animation;
use crate::resources::playbackclock::PlaybackClock;

/// Advance animation playback for every sprite.
///
/// Contract
/// - Reads the scaled delta from [`PlaybackClock`].
/// - Mutates [`Animation`] pose index and elapsed time only.
/// - Does nothing while the delta is zero (paused clock).
pub fn animation(mut query: Query<&mut Animation>, clock: Res<PlaybackClock>) {
    let delta = clock.delta();
    if delta <= 0.0 {
        return;
    }
    for mut anim in query.iter_mut() {
        advance(&mut anim, delta);
    }
}

/// Move `anim` forward by `delta` ticks.
///
/// Every pose boundary inside `delta` is crossed, so a large delta catches up
/// through several poses in one call. Whole loops of the sequence are dropped
/// first; a full loop always lands back on the same pose with the same
/// elapsed time, and dropping them keeps the work per call bounded by the
/// sequence length. Non-finite deltas are ignored.
pub fn advance(anim: &mut Animation, delta: f32) {
    if !delta.is_finite() || delta <= 0.0 {
        return;
    }
    let catalog = Arc::clone(anim.catalog());
    let sequence = catalog.sequence_at(anim.state_index);

    let elapsed = anim.elapsed + f64::from(delta);
    if !elapsed.is_finite() {
        warn!("Ignoring animation delta {delta}: elapsed time overflows");
        return;
    }
    anim.elapsed = elapsed;

    let loop_duration = sequence.total_duration() as f64;
    if anim.elapsed >= loop_duration {
        anim.elapsed %= loop_duration;
    }

    loop {
        let duration = sequence.pose_at(anim.pose_index).duration_ticks();
        if anim.elapsed < duration {
            break;
        }
        anim.elapsed -= duration;
        anim.pose_index = (anim.pose_index + 1) % sequence.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::spritecatalog::{
        AnimationState, ImageHandle, ImageId, Pose, SpriteTypeCatalog,
    };

    fn walking() -> Animation {
        let catalog = SpriteTypeCatalog::build(
            vec![(
                AnimationState::new("WALKING"),
                vec![Pose::new(1, 15), Pose::new(2, 5)],
            )],
            vec![
                (ImageId(1), ImageHandle::new("walk_1.png")),
                (ImageId(2), ImageHandle::new("walk_2.png")),
            ],
        )
        .unwrap();
        Animation::new(Arc::new(catalog), "WALKING").unwrap()
    }

    fn four_poses() -> Animation {
        let catalog = SpriteTypeCatalog::build(
            vec![(
                AnimationState::new("RUNNING"),
                vec![Pose::new(1, 4), Pose::new(2, 4), Pose::new(3, 4), Pose::new(4, 4)],
            )],
            (1..=4).map(|id| (ImageId(id), ImageHandle::new(format!("run_{id}.png")))),
        )
        .unwrap();
        Animation::new(Arc::new(catalog), "RUNNING").unwrap()
    }

    #[test]
    fn partial_delta_accumulates() {
        let mut anim = walking();
        advance(&mut anim, 10.0);
        assert_eq!(anim.pose_index(), 0);
        assert_eq!(anim.elapsed(), 10.0);
    }

    #[test]
    fn reaching_duration_moves_to_next_pose() {
        let mut anim = walking();
        advance(&mut anim, 15.0);
        assert_eq!(anim.pose_index(), 1);
        assert_eq!(anim.elapsed(), 0.0);
    }

    #[test]
    fn last_pose_wraps_to_first() {
        let mut anim = walking();
        advance(&mut anim, 15.0);
        advance(&mut anim, 5.0);
        assert_eq!(anim.pose_index(), 0);
        assert_eq!(anim.elapsed(), 0.0);
    }

    #[test]
    fn large_delta_catches_up_through_several_poses() {
        let mut anim = four_poses();
        advance(&mut anim, 12.0);
        assert_eq!(anim.pose_index(), 3);
        assert_eq!(anim.elapsed(), 0.0);
    }

    #[test]
    fn catch_up_carries_remainder() {
        let mut anim = walking();
        // 15 + 5 + 15 + 2
        advance(&mut anim, 37.0);
        assert_eq!(anim.pose_index(), 1);
        assert_eq!(anim.elapsed(), 2.0);
    }

    #[test]
    fn whole_loops_land_on_same_pose() {
        let mut anim = walking();
        advance(&mut anim, 17.0);
        assert_eq!((anim.pose_index(), anim.elapsed()), (1, 2.0));
        advance(&mut anim, 20.0 * 1000.0);
        assert_eq!((anim.pose_index(), anim.elapsed()), (1, 2.0));
    }

    #[test]
    fn zero_or_negative_delta_does_nothing() {
        let mut anim = walking();
        advance(&mut anim, 3.0);
        advance(&mut anim, 0.0);
        advance(&mut anim, -7.0);
        assert_eq!(anim.pose_index(), 0);
        assert_eq!(anim.elapsed(), 3.0);
    }

    #[test]
    fn fractional_deltas_keep_invariants() {
        let mut anim = four_poses();
        for _ in 0..1000 {
            advance(&mut anim, 0.37);
            let duration = anim.current_pose().duration_ticks();
            assert!(anim.pose_index() < anim.sequence().len());
            assert!(anim.elapsed() >= 0.0 && anim.elapsed() < duration);
        }
    }

    #[test]
    fn non_finite_delta_does_nothing() {
        let mut anim = walking();
        advance(&mut anim, 3.0);
        advance(&mut anim, f32::INFINITY);
        advance(&mut anim, f32::NAN);
        assert_eq!((anim.pose_index(), anim.elapsed()), (0, 3.0));
    }

    #[test]
    fn pose_longer_than_f32_precision_still_ends() {
        let catalog = SpriteTypeCatalog::build(
            vec![(
                AnimationState::new("SLEEPING"),
                vec![Pose::new(1, 20_000_000), Pose::new(2, 5)],
            )],
            vec![
                (ImageId(1), ImageHandle::new("sleep_1.png")),
                (ImageId(2), ImageHandle::new("sleep_2.png")),
            ],
        )
        .unwrap();
        let mut anim = Animation::new(Arc::new(catalog), "SLEEPING").unwrap();

        advance(&mut anim, 16_777_216.0);
        advance(&mut anim, 1.0);
        assert_eq!(anim.elapsed(), 16_777_217.0);

        for _ in 0..3_222_783 {
            advance(&mut anim, 1.0);
        }
        assert_eq!((anim.pose_index(), anim.elapsed()), (1, 0.0));
    }
}
