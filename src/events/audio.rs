//! Commands sent to the audio collaborator.

/// Requests for the opaque playback service behind
/// [`AudioBridge`](crate::resources::audio::AudioBridge).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCmd {
    Play { id: String },
    Dispose { id: String },
    Shutdown,
}
