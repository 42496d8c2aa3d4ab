//! Scene management and tick loop.
//!
//! A [`SceneDirector`] owns the ECS [`World`] holding every live sprite and the
//! [`PlaybackClock`], plus the schedule that advances them. Hosts drive it
//! with three kinds of calls:
//!
//! 1. Spawn and remove sprites ([`SceneDirector::spawn`],
//!    [`SceneDirector::despawn`], [`SceneDirector::clear`]).
//! 2. Call [`SceneDirector::tick`] once per frame with the time elapsed since
//!    the previous call.
//! 3. Read [`SceneDirector::snapshot`] to draw, and forward user gestures as
//!    [`SceneCommand`]s through [`SceneDirector::dispatch`].
//!
//! Playback starts running unless the clock handed to
//! [`SceneDirector::with_clock`] is paused, and a freshly spawned sprite shows
//! up in the very next snapshot at the first pose of its state.
//!
//! Everything runs on the caller's thread. The schedule uses the
//! single-threaded executor and no call blocks or performs I/O.

use std::fmt;
use std::sync::Arc;

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use glam::Vec2;
use log::debug;
use serde::Serialize;

use crate::components::animation::Animation;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::components::zindex::ZIndex;
use crate::error::{InvalidSpeedError, SceneError, UnknownStateError};
use crate::events::scenecommand::SceneCommand;
use crate::resources::playbackclock::PlaybackClock;
use crate::resources::spritecatalog::{AnimationState, ImageHandle, SpriteTypeCatalog};
use crate::systems::animation::animation;
use crate::systems::movement::movement;
use crate::systems::time::update_playback_clock;

/// Handle to a sprite living in a [`SceneDirector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(Entity);

impl SpriteId {
    pub fn entity(&self) -> Entity {
        self.0
    }
}

impl fmt::Display for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything needed to put a sprite in the scene.
#[derive(Debug, Clone)]
pub struct SpriteSpawn {
    pub catalog: Arc<SpriteTypeCatalog>,
    pub state: AnimationState,
    pub position: Vec2,
    pub velocity: Vec2,
    pub z_index: i32,
}

impl SpriteSpawn {
    pub fn new(catalog: Arc<SpriteTypeCatalog>, state: impl Into<AnimationState>) -> Self {
        Self {
            catalog,
            state: state.into(),
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            z_index: 0,
        }
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position = Vec2::new(x, y);
        self
    }

    pub fn with_velocity(mut self, vx: f32, vy: f32) -> Self {
        self.velocity = Vec2::new(vx, vy);
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }
}

/// Read-only view of one sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceView {
    pub id: SpriteId,
    pub state: AnimationState,
    pub pose_index: usize,
    pub elapsed: f64,
    pub image: ImageHandle,
    pub position: Vec2,
    pub velocity: Vec2,
    pub z_index: i32,
}

/// One drawable entry of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpriteFrame {
    #[serde(skip)]
    pub id: SpriteId,
    pub image: ImageHandle,
    pub position: Vec2,
    pub z_index: i32,
}

/// What the user currently has selected.
///
/// Owned by the host and passed to [`SceneDirector::dispatch`] so commands
/// that target a sprite know which one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub sprite_type: Option<String>,
    pub sprite: Option<SpriteId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sprite(sprite: SpriteId) -> Self {
        Self {
            sprite_type: None,
            sprite: Some(sprite),
        }
    }
}

pub struct SceneDirector {
    world: World,
    schedule: Schedule,
    /// Live sprites in spawn order.
    sprites: Vec<SpriteId>,
}

impl Default for SceneDirector {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneDirector {
    /// Empty scene with a running clock at normal speed.
    pub fn new() -> Self {
        Self::with_clock(PlaybackClock::default())
    }

    pub fn with_clock(clock: PlaybackClock) -> Self {
        let mut world = World::new();
        world.insert_resource(clock);

        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems((animation, movement));

        Self {
            world,
            schedule,
            sprites: Vec::new(),
        }
    }

    // --------------- Instances ---------------

    /// Add a sprite playing `spawn.state` from its first pose.
    pub fn spawn(&mut self, spawn: SpriteSpawn) -> Result<SpriteId, UnknownStateError> {
        let animation = Animation::new(spawn.catalog, spawn.state.as_str())?;
        let entity = self
            .world
            .spawn((
                animation,
                MapPosition { pos: spawn.position },
                RigidBody {
                    velocity: spawn.velocity,
                },
                ZIndex(spawn.z_index),
            ))
            .id();
        let id = SpriteId(entity);
        self.sprites.push(id);
        debug!(
            "Spawned sprite {} in state '{}' at ({}, {})",
            id, spawn.state, spawn.position.x, spawn.position.y
        );
        Ok(id)
    }

    /// Remove a sprite from the scene.
    pub fn despawn(&mut self, id: SpriteId) -> Result<(), SceneError> {
        let index = self
            .sprites
            .iter()
            .position(|sprite| *sprite == id)
            .ok_or(SceneError::UnknownInstance(id))?;
        self.sprites.remove(index);
        self.world.despawn(id.0);
        debug!("Despawned sprite {}", id);
        Ok(())
    }

    /// Remove every sprite.
    pub fn clear(&mut self) {
        for id in self.sprites.drain(..) {
            self.world.despawn(id.0);
        }
        debug!("Cleared scene");
    }

    pub fn contains(&self, id: SpriteId) -> bool {
        self.sprites.contains(&id)
    }

    /// Live sprites in spawn order.
    pub fn ids(&self) -> &[SpriteId] {
        &self.sprites
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn instance(&self, id: SpriteId) -> Option<InstanceView> {
        if !self.contains(id) {
            return None;
        }
        let animation = self.world.get::<Animation>(id.0)?;
        let position = self.world.get::<MapPosition>(id.0)?;
        let rigidbody = self.world.get::<RigidBody>(id.0)?;
        let z_index = self.world.get::<ZIndex>(id.0)?;
        Some(InstanceView {
            id,
            state: animation.state().clone(),
            pose_index: animation.pose_index(),
            elapsed: animation.elapsed(),
            image: animation.current_image().clone(),
            position: position.pos,
            velocity: rigidbody.velocity,
            z_index: z_index.0,
        })
    }

    /// Switch a sprite to another state of its catalog, restarting at the
    /// first pose. Position, velocity and the clock are left alone.
    pub fn switch_state(&mut self, id: SpriteId, state: &str) -> Result<(), SceneError> {
        if !self.contains(id) {
            return Err(SceneError::UnknownInstance(id));
        }
        let mut animation = self
            .world
            .get_mut::<Animation>(id.0)
            .ok_or(SceneError::UnknownInstance(id))?;
        animation.switch_state(state)?;
        debug!("Sprite {} switched to state '{}'", id, state);
        Ok(())
    }

    pub fn set_velocity(&mut self, id: SpriteId, velocity: Vec2) -> Result<(), SceneError> {
        if !self.contains(id) {
            return Err(SceneError::UnknownInstance(id));
        }
        let mut rigidbody = self
            .world
            .get_mut::<RigidBody>(id.0)
            .ok_or(SceneError::UnknownInstance(id))?;
        rigidbody.velocity = velocity;
        Ok(())
    }

    pub fn set_position(&mut self, id: SpriteId, position: Vec2) -> Result<(), SceneError> {
        if !self.contains(id) {
            return Err(SceneError::UnknownInstance(id));
        }
        let mut map_position = self
            .world
            .get_mut::<MapPosition>(id.0)
            .ok_or(SceneError::UnknownInstance(id))?;
        map_position.pos = position;
        Ok(())
    }

    // --------------- Clock ---------------

    pub fn clock(&self) -> &PlaybackClock {
        self.world.resource::<PlaybackClock>()
    }

    pub fn pause(&mut self) {
        self.world.resource_mut::<PlaybackClock>().pause();
    }

    pub fn resume(&mut self) {
        self.world.resource_mut::<PlaybackClock>().resume();
    }

    pub fn set_speed(&mut self, factor: f32) -> Result<(), InvalidSpeedError> {
        self.world.resource_mut::<PlaybackClock>().set_speed(factor)
    }

    // --------------- Frame ---------------

    /// Advance every sprite by `dt` ticks of real time.
    pub fn tick(&mut self, dt: f32) {
        update_playback_clock(&mut self.world, dt);
        self.schedule.run(&mut self.world);
        self.world.clear_trackers();
    }

    /// Image and position of every sprite, lowest z-index first and spawn
    /// order within the same z-index.
    pub fn snapshot(&self) -> Vec<SpriteFrame> {
        let mut frames: Vec<SpriteFrame> = self
            .sprites
            .iter()
            .filter_map(|id| {
                let animation = self.world.get::<Animation>(id.0)?;
                let position = self.world.get::<MapPosition>(id.0)?;
                let z_index = self.world.get::<ZIndex>(id.0)?;
                Some(SpriteFrame {
                    id: *id,
                    image: animation.current_image().clone(),
                    position: position.pos,
                    z_index: z_index.0,
                })
            })
            .collect();
        frames.sort_by_key(|frame| frame.z_index);
        frames
    }

    // --------------- Commands ---------------

    /// Apply a user command. `selection` names the sprite targeted by
    /// [`SceneCommand::SwitchState`].
    pub fn dispatch(
        &mut self,
        selection: &Selection,
        command: SceneCommand,
    ) -> Result<(), SceneError> {
        match command {
            SceneCommand::Pause => {
                self.pause();
                Ok(())
            }
            SceneCommand::Resume => {
                self.resume();
                Ok(())
            }
            SceneCommand::SetSpeed(factor) => Ok(self.set_speed(factor)?),
            SceneCommand::SwitchState(state) => {
                let id = selection.sprite.ok_or(SceneError::NoSelection)?;
                self.switch_state(id, state.as_str())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::spritecatalog::{ImageId, Pose};

    fn catalog() -> Arc<SpriteTypeCatalog> {
        Arc::new(
            SpriteTypeCatalog::build(
                vec![
                    (
                        AnimationState::new("WALKING"),
                        vec![Pose::new(1, 15), Pose::new(2, 5)],
                    ),
                    (AnimationState::new("IDLE"), vec![Pose::new(3, 10)]),
                ],
                vec![
                    (ImageId(1), ImageHandle::new("walk_1.png")),
                    (ImageId(2), ImageHandle::new("walk_2.png")),
                    (ImageId(3), ImageHandle::new("idle_1.png")),
                ],
            )
            .unwrap(),
        )
    }

    #[test]
    fn spawned_sprite_is_visible_before_first_tick() {
        let mut director = SceneDirector::new();
        let id = director
            .spawn(SpriteSpawn::new(catalog(), "WALKING").at(250.0, 250.0))
            .unwrap();

        let frames = director.snapshot();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].id, id);
        assert_eq!(frames[0].image.as_str(), "walk_1.png");
        assert_eq!(frames[0].position, Vec2::new(250.0, 250.0));
    }

    #[test]
    fn spawn_with_unknown_state_adds_nothing() {
        let mut director = SceneDirector::new();
        assert!(director.spawn(SpriteSpawn::new(catalog(), "FLYING")).is_err());
        assert!(director.is_empty());
        assert!(director.snapshot().is_empty());
    }

    #[test]
    fn despawn_removes_sprite() {
        let mut director = SceneDirector::new();
        let a = director.spawn(SpriteSpawn::new(catalog(), "IDLE")).unwrap();
        let b = director.spawn(SpriteSpawn::new(catalog(), "IDLE")).unwrap();

        director.despawn(a).unwrap();
        assert_eq!(director.ids(), [b]);
        assert!(director.instance(a).is_none());
        assert_eq!(director.despawn(a), Err(SceneError::UnknownInstance(a)));
    }

    #[test]
    fn clear_removes_everything() {
        let mut director = SceneDirector::new();
        let a = director.spawn(SpriteSpawn::new(catalog(), "IDLE")).unwrap();
        director.spawn(SpriteSpawn::new(catalog(), "WALKING")).unwrap();
        director.clear();
        assert!(director.is_empty());
        assert!(!director.contains(a));
    }

    #[test]
    fn snapshot_orders_by_z_index_then_spawn_order() {
        let mut director = SceneDirector::new();
        let top = director
            .spawn(SpriteSpawn::new(catalog(), "IDLE").with_z_index(5))
            .unwrap();
        let first = director.spawn(SpriteSpawn::new(catalog(), "IDLE")).unwrap();
        let second = director
            .spawn(SpriteSpawn::new(catalog(), "WALKING"))
            .unwrap();

        let order: Vec<SpriteId> = director.snapshot().iter().map(|f| f.id).collect();
        assert_eq!(order, vec![first, second, top]);
    }

    #[test]
    fn dispatch_switch_state_needs_selection() {
        let mut director = SceneDirector::new();
        director.spawn(SpriteSpawn::new(catalog(), "WALKING")).unwrap();
        let result = director.dispatch(&Selection::new(), SceneCommand::switch_state("IDLE"));
        assert_eq!(result, Err(SceneError::NoSelection));
    }

    #[test]
    fn dispatch_applies_commands() {
        let mut director = SceneDirector::new();
        let id = director.spawn(SpriteSpawn::new(catalog(), "WALKING")).unwrap();
        let selection = Selection::with_sprite(id);

        director.dispatch(&selection, SceneCommand::Pause).unwrap();
        assert!(director.clock().is_paused());
        director.dispatch(&selection, SceneCommand::Resume).unwrap();
        assert!(!director.clock().is_paused());
        director
            .dispatch(&selection, SceneCommand::SetSpeed(3.0))
            .unwrap();
        assert_eq!(director.clock().speed(), 3.0);
        director
            .dispatch(&selection, SceneCommand::switch_state("IDLE"))
            .unwrap();
        assert_eq!(director.instance(id).unwrap().state.as_str(), "IDLE");
    }

    #[test]
    fn dispatch_rejects_bad_speed() {
        let mut director = SceneDirector::new();
        let result = director.dispatch(&Selection::new(), SceneCommand::SetSpeed(-1.0));
        assert!(matches!(result, Err(SceneError::InvalidSpeed(_))));
        assert_eq!(director.clock().speed(), 1.0);
    }

    #[test]
    fn set_velocity_and_position_update_instance() {
        let mut director = SceneDirector::new();
        let id = director.spawn(SpriteSpawn::new(catalog(), "IDLE")).unwrap();
        director.set_position(id, Vec2::new(1.0, 2.0)).unwrap();
        director.set_velocity(id, Vec2::new(3.0, 4.0)).unwrap();

        let view = director.instance(id).unwrap();
        assert_eq!(view.position, Vec2::new(1.0, 2.0));
        assert_eq!(view.velocity, Vec2::new(3.0, 4.0));
    }
}
