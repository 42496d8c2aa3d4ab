//! Single-sprite viewer session.
//!
//! [`SpriteViewer`] ties together everything a sprite viewer front-end needs:
//! the loaded sprite types, the scene, the playback configuration, the
//! current [`Selection`] and a [`CommandBridge`] for commands coming from
//! another thread.
//!
//! The flow mirrors a classic viewer window:
//!
//! 1. pick a sprite type from [`SpriteViewer::sprite_type_names`],
//! 2. pick one of its states returned by [`SpriteViewer::select_sprite_type`],
//! 3. [`SpriteViewer::select_state`] replaces the scene with one sprite of
//!    that type playing that state at the configured spawn point,
//! 4. start/stop/faster/slower buttons map onto [`SceneCommand`]s,
//!    [`SpriteViewer::speed_up`] and [`SpriteViewer::slow_down`].

use log::{debug, warn};

use crate::director::{SceneDirector, Selection, SpriteFrame, SpriteId, SpriteSpawn};
use crate::error::SceneError;
use crate::events::scenecommand::SceneCommand;
use crate::resources::commandbridge::{CommandBridge, CommandSender};
use crate::resources::playbackconfig::PlaybackConfig;
use crate::resources::spritecatalog::AnimationState;
use crate::resources::spritetypestore::SpriteTypeStore;

pub struct SpriteViewer {
    store: SpriteTypeStore,
    director: SceneDirector,
    selection: Selection,
    config: PlaybackConfig,
    bridge: CommandBridge,
}

impl SpriteViewer {
    pub fn new(store: SpriteTypeStore, config: PlaybackConfig) -> Self {
        let director = SceneDirector::with_clock(config.clock());
        Self {
            store,
            director,
            selection: Selection::new(),
            config,
            bridge: CommandBridge::new(),
        }
    }

    pub fn sprite_type_names(&self) -> &[String] {
        self.store.names()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn director(&self) -> &SceneDirector {
        &self.director
    }

    pub fn director_mut(&mut self) -> &mut SceneDirector {
        &mut self.director
    }

    /// Select a sprite type and return its states for the state picker.
    ///
    /// The state selection is cleared, so state commands fail with
    /// [`SceneError::NoSelection`] until [`Self::select_state`] is called.
    /// The sprite already shown keeps playing.
    pub fn select_sprite_type(&mut self, name: &str) -> Result<&[AnimationState], SceneError> {
        let catalog = self
            .store
            .get(name)
            .ok_or_else(|| SceneError::UnknownSpriteType(name.to_string()))?;
        self.selection.sprite_type = Some(name.to_string());
        self.selection.sprite = None;
        debug!("Selected sprite type '{}'", name);
        Ok(catalog.states())
    }

    /// Show one sprite of the selected type playing `state`.
    ///
    /// Any sprite already in the scene is removed. On failure the scene and
    /// the selection are unchanged.
    pub fn select_state(&mut self, state: &str) -> Result<SpriteId, SceneError> {
        let sprite_type = self
            .selection
            .sprite_type
            .as_deref()
            .ok_or(SceneError::NoSelection)?;
        let catalog = self
            .store
            .get(sprite_type)
            .cloned()
            .ok_or_else(|| SceneError::UnknownSpriteType(sprite_type.to_string()))?;
        let state = catalog.resolve(state)?;

        let spawn_point = self.config.spawn_point;
        self.director.clear();
        let id = self
            .director
            .spawn(SpriteSpawn::new(catalog, state).at(spawn_point.x, spawn_point.y))?;
        self.selection.sprite = Some(id);
        Ok(id)
    }

    /// Apply a command to the scene using the current selection.
    pub fn handle(&mut self, command: SceneCommand) -> Result<(), SceneError> {
        self.director.dispatch(&self.selection, command)
    }

    /// Multiply the speed by the configured "speed up" factor.
    pub fn speed_up(&mut self) -> Result<f32, SceneError> {
        let speed = self.config.faster(self.director.clock().speed());
        self.handle(SceneCommand::SetSpeed(speed))?;
        Ok(speed)
    }

    /// Multiply the speed by the configured "slow down" factor.
    pub fn slow_down(&mut self) -> Result<f32, SceneError> {
        let speed = self.config.slower(self.director.clock().speed());
        self.handle(SceneCommand::SetSpeed(speed))?;
        Ok(speed)
    }

    /// Sender for commands produced on other threads.
    pub fn command_sender(&self) -> CommandSender {
        self.bridge.sender()
    }

    /// Apply every queued command. Rejected commands are logged and skipped.
    ///
    /// Returns how many commands were applied.
    pub fn pump_commands(&mut self) -> usize {
        let mut applied = 0;
        for command in self.bridge.drain() {
            match self.handle(command.clone()) {
                Ok(()) => applied += 1,
                Err(e) => warn!("Rejected command {:?}: {}", command, e),
            }
        }
        applied
    }

    pub fn tick(&mut self, dt: f32) {
        self.director.tick(dt);
    }

    /// Advance by wall-clock seconds, converted with the configured tick rate.
    pub fn advance_seconds(&mut self, seconds: f32) {
        let dt = self.config.ticks_for(seconds);
        self.director.tick(dt);
    }

    pub fn snapshot(&self) -> Vec<SpriteFrame> {
        self.director.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::spritecatalog::{ImageHandle, ImageId, Pose, SpriteTypeCatalog};
    use glam::Vec2;

    fn store() -> SpriteTypeStore {
        let mut store = SpriteTypeStore::new();
        store.insert(
            "knight",
            SpriteTypeCatalog::build(
                vec![
                    (
                        AnimationState::new("IDLE"),
                        vec![Pose::new(1, 10), Pose::new(2, 10)],
                    ),
                    (AnimationState::new("WALKING"), vec![Pose::new(3, 5)]),
                ],
                vec![
                    (ImageId(1), ImageHandle::new("knight_idle_1.png")),
                    (ImageId(2), ImageHandle::new("knight_idle_2.png")),
                    (ImageId(3), ImageHandle::new("knight_walking_1.png")),
                ],
            )
            .unwrap(),
        );
        store
    }

    #[test]
    fn select_type_lists_states() {
        let mut viewer = SpriteViewer::new(store(), PlaybackConfig::new());
        let states: Vec<String> = viewer
            .select_sprite_type("knight")
            .unwrap()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(states, vec!["IDLE", "WALKING"]);
        assert_eq!(viewer.selection().sprite_type.as_deref(), Some("knight"));
    }

    #[test]
    fn select_unknown_type_fails() {
        let mut viewer = SpriteViewer::new(store(), PlaybackConfig::new());
        assert_eq!(
            viewer.select_sprite_type("dragon").unwrap_err(),
            SceneError::UnknownSpriteType("dragon".to_string())
        );
        assert_eq!(viewer.selection(), &Selection::new());
    }

    #[test]
    fn select_type_clears_state_selection() {
        let mut viewer = SpriteViewer::new(store(), PlaybackConfig::new());
        viewer.select_sprite_type("knight").unwrap();
        let id = viewer.select_state("IDLE").unwrap();

        viewer.select_sprite_type("knight").unwrap();
        assert_eq!(viewer.selection().sprite, None);
        assert_eq!(viewer.director().ids(), [id]);
        assert_eq!(
            viewer.handle(SceneCommand::switch_state("WALKING")),
            Err(SceneError::NoSelection)
        );
        assert_eq!(viewer.director().instance(id).unwrap().state.as_str(), "IDLE");
    }

    #[test]
    fn select_state_without_type_fails() {
        let mut viewer = SpriteViewer::new(store(), PlaybackConfig::new());
        assert_eq!(
            viewer.select_state("IDLE").unwrap_err(),
            SceneError::NoSelection
        );
    }

    #[test]
    fn select_state_replaces_scene_with_one_sprite() {
        let mut viewer = SpriteViewer::new(store(), PlaybackConfig::new());
        viewer.select_sprite_type("knight").unwrap();
        let first = viewer.select_state("IDLE").unwrap();
        let second = viewer.select_state("WALKING").unwrap();

        assert_eq!(viewer.director().ids(), [second]);
        assert!(!viewer.director().contains(first));
        assert_eq!(viewer.selection().sprite, Some(second));

        let frames = viewer.snapshot();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].image.as_str(), "knight_walking_1.png");
        assert_eq!(frames[0].position, Vec2::new(250.0, 250.0));
    }

    #[test]
    fn select_unknown_state_keeps_scene() {
        let mut viewer = SpriteViewer::new(store(), PlaybackConfig::new());
        viewer.select_sprite_type("knight").unwrap();
        let id = viewer.select_state("IDLE").unwrap();

        assert!(matches!(
            viewer.select_state("FLYING"),
            Err(SceneError::UnknownState(_))
        ));
        assert_eq!(viewer.director().ids(), [id]);
        assert_eq!(viewer.selection().sprite, Some(id));
    }

    #[test]
    fn speed_steps_use_config() {
        let mut config = PlaybackConfig::new();
        config.speed_up_factor = 2.0;
        config.slow_down_factor = 0.5;
        let mut viewer = SpriteViewer::new(store(), config);

        assert_eq!(viewer.speed_up().unwrap(), 2.0);
        assert_eq!(viewer.speed_up().unwrap(), 4.0);
        assert_eq!(viewer.slow_down().unwrap(), 2.0);
        assert_eq!(viewer.director().clock().speed(), 2.0);
    }

    #[test]
    fn advance_seconds_uses_tick_rate() {
        let mut viewer = SpriteViewer::new(store(), PlaybackConfig::new());
        viewer.select_sprite_type("knight").unwrap();
        let id = viewer.select_state("IDLE").unwrap();

        // 60 ticks per second: 0.25 s is 15 ticks, 10 + 5 into the sequence.
        viewer.advance_seconds(0.25);
        let view = viewer.director().instance(id).unwrap();
        assert_eq!(view.pose_index, 1);
        assert_eq!(view.elapsed, 5.0);
    }

    #[test]
    fn pump_applies_queued_commands_and_skips_rejected() {
        let mut viewer = SpriteViewer::new(store(), PlaybackConfig::new());
        viewer.select_sprite_type("knight").unwrap();
        viewer.select_state("IDLE").unwrap();

        let sender = viewer.command_sender();
        sender.send(SceneCommand::Pause).unwrap();
        sender.send(SceneCommand::SetSpeed(0.0)).unwrap();
        sender.send(SceneCommand::switch_state("WALKING")).unwrap();

        assert_eq!(viewer.pump_commands(), 2);
        assert!(viewer.director().clock().is_paused());
        assert_eq!(viewer.director().clock().speed(), 1.0);
        let frames = viewer.snapshot();
        assert_eq!(frames[0].image.as_str(), "knight_walking_1.png");
    }
}
