//! Bridge between the world and the audio playback service.
//!
//! Playback is an opaque collaborator. [`setup_audio`] runs it on a
//! background thread fed through a crossbeam channel, and systems queue
//! [`AudioCmd`]s through the [`AudioBridge`] resource without ever waiting
//! on audio. Call [`shutdown_audio`] during teardown to stop the thread.

use std::thread::JoinHandle;

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, warn};

use crate::events::audio::AudioCmd;

/// Playback service driven by the audio thread.
pub trait AudioPlayer: Send + 'static {
    fn play(&mut self, id: &str);
    fn dispose(&mut self, id: &str);
}

#[derive(Resource)]
pub struct AudioBridge {
    pub tx_cmd: Sender<AudioCmd>,
    handle: Option<JoinHandle<()>>,
}

impl AudioBridge {
    /// Bridge with no thread behind it; the caller drains the receiver.
    pub fn channel() -> (Self, Receiver<AudioCmd>) {
        let (tx_cmd, rx_cmd) = unbounded();
        (
            Self {
                tx_cmd,
                handle: None,
            },
            rx_cmd,
        )
    }

    pub fn play(&self, id: &str) {
        self.send(AudioCmd::Play { id: id.to_string() });
    }

    pub fn dispose(&self, id: &str) {
        self.send(AudioCmd::Dispose { id: id.to_string() });
    }

    fn send(&self, cmd: AudioCmd) {
        if let Err(e) = self.tx_cmd.send(cmd) {
            warn!("Audio command dropped, playback service is gone: {:?}", e.0);
        }
    }
}

/// Forward commands to `player` until [`AudioCmd::Shutdown`] or until every
/// sender is gone.
pub fn audio_thread(rx_cmd: Receiver<AudioCmd>, mut player: impl AudioPlayer) {
    while let Ok(cmd) = rx_cmd.recv() {
        debug!("audio: {:?}", cmd);
        match cmd {
            AudioCmd::Play { id } => player.play(&id),
            AudioCmd::Dispose { id } => player.dispose(&id),
            AudioCmd::Shutdown => break,
        }
    }
}

/// Spawn the audio thread around `player` and insert the [`AudioBridge`].
pub fn setup_audio(world: &mut World, player: impl AudioPlayer) {
    let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
    let handle = std::thread::spawn(move || audio_thread(rx_cmd, player));
    world.insert_resource(AudioBridge {
        tx_cmd,
        handle: Some(handle),
    });
}

/// Request shutdown of the audio thread and join it.
pub fn shutdown_audio(world: &mut World) {
    if let Some(mut bridge) = world.remove_resource::<AudioBridge>() {
        let _ = bridge.tx_cmd.send(AudioCmd::Shutdown);
        if let Some(handle) = bridge.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl AudioPlayer for Recorder {
        fn play(&mut self, id: &str) {
            self.0.lock().unwrap().push(format!("play {id}"));
        }
        fn dispose(&mut self, id: &str) {
            self.0.lock().unwrap().push(format!("dispose {id}"));
        }
    }

    #[test]
    fn thread_forwards_commands_until_shutdown() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut world = World::new();
        setup_audio(&mut world, Recorder(log.clone()));
        world.resource::<AudioBridge>().play("click");
        world.resource::<AudioBridge>().dispose("click");
        shutdown_audio(&mut world);
        assert!(!world.contains_resource::<AudioBridge>());
        assert_eq!(*log.lock().unwrap(), vec!["play click", "dispose click"]);
    }
}
