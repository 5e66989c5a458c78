//! Messages exchanged with the audio thread.

/// Commands sent *to* the audio thread.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCmd {
    LoadMusic { id: String, path: String },
    LoadFx { id: String, path: String },
    /// Pause whatever track is current, then play `id` from the start.
    PlayMusic { id: String, looped: bool },
    /// Pause the current track, if any.
    PauseMusic,
    /// Resume the current track if it is paused.
    ResumeMusic,
    PlayFx { id: String },
    Shutdown,
}

/// Messages sent *back* from the audio thread.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioMessage {
    /// The audio device could not be opened; the thread has exited.
    DeviceFailed { error: String },
    MusicLoaded { id: String },
    MusicLoadFailed { id: String, error: String },
    MusicPlayStarted { id: String },
    MusicPaused { id: String },
    MusicResumed { id: String },
    MusicFinished { id: String },
    FxLoaded { id: String },
    FxLoadFailed { id: String, error: String },
    FxMissing { id: String },
}
