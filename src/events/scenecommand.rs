//! Playback commands.
//!
//! Every user gesture that controls playback maps onto one [`SceneCommand`].
//! Commands are applied with
//! [`SceneDirector::dispatch`](crate::director::SceneDirector::dispatch),
//! either directly or after travelling through a
//! [`CommandBridge`](crate::resources::commandbridge::CommandBridge).

use crate::resources::spritecatalog::AnimationState;

#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    /// Freeze every sprite.
    Pause,
    /// Let time flow again.
    Resume,
    /// Replace the speed factor.
    SetSpeed(f32),
    /// Switch the selected sprite to another animation state.
    SwitchState(AnimationState),
}

impl SceneCommand {
    pub fn switch_state(state: impl Into<AnimationState>) -> Self {
        SceneCommand::SwitchState(state.into())
    }
}
