//! Channel that carries playback commands into the tick loop.
//!
//! A presentation layer often runs on a different thread than the loop that
//! calls [`SceneDirector::tick`](crate::director::SceneDirector::tick). Such
//! threads hold a [`CommandSender`] and push [`SceneCommand`]s; the tick-loop
//! owner drains the [`CommandBridge`] between ticks, so commands never
//! interleave with a tick in progress.

use crossbeam_channel::{Receiver, Sender, TrySendError, unbounded};

use crate::events::scenecommand::SceneCommand;

/// Receiving end, owned by whoever drives the tick loop.
#[derive(Debug)]
pub struct CommandBridge {
    tx_cmd: Sender<SceneCommand>,
    rx_cmd: Receiver<SceneCommand>,
}

/// Clonable sending end handed to other threads.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx_cmd: Sender<SceneCommand>,
}

impl Default for CommandBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBridge {
    pub fn new() -> Self {
        let (tx_cmd, rx_cmd) = unbounded::<SceneCommand>();
        Self { tx_cmd, rx_cmd }
    }

    pub fn sender(&self) -> CommandSender {
        CommandSender {
            tx_cmd: self.tx_cmd.clone(),
        }
    }

    /// Take every command queued so far, oldest first.
    pub fn drain(&self) -> Vec<SceneCommand> {
        self.rx_cmd.try_iter().collect()
    }

    pub fn pending(&self) -> usize {
        self.rx_cmd.len()
    }
}

impl CommandSender {
    /// Queue a command for the next drain.
    ///
    /// Returns the command back if the bridge has been dropped.
    pub fn send(&self, command: SceneCommand) -> Result<(), SceneCommand> {
        self.tx_cmd.try_send(command).map_err(|e| match e {
            TrySendError::Full(cmd) | TrySendError::Disconnected(cmd) => cmd,
        })
    }
}
