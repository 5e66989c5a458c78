//! Bridge between the loop thread and the background audio thread.
//!
//! Use [`setup_audio`] once during initialization to spawn the audio thread.
//! Call [`shutdown_audio`] during teardown to gracefully stop the thread and
//! free audio resources.

use crate::events::audio::{AudioCmd, AudioMessage};
use crate::systems::audio::audio_thread;
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::warn;

/// Channels and join handle of the audio thread.
pub struct AudioBridge {
    /// Sender for [`AudioCmd`] messages (loop -> audio thread).
    pub tx_cmd: Sender<AudioCmd>,
    /// Receiver for [`AudioMessage`] messages (audio thread -> loop).
    pub rx_msg: Receiver<AudioMessage>,
    /// Join handle for the background audio thread.
    pub handle: std::thread::JoinHandle<()>,
}

/// Create the command/message channels and spawn [`audio_thread`].
pub fn setup_audio() -> AudioBridge {
    let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
    let (tx_msg, rx_msg) = unbounded::<AudioMessage>();

    let handle = std::thread::spawn(move || audio_thread(rx_cmd, tx_msg));

    AudioBridge {
        tx_cmd,
        rx_msg,
        handle,
    }
}

/// Send [`AudioCmd::Shutdown`] and wait for the thread to exit.
pub fn shutdown_audio(bridge: AudioBridge) {
    let _ = bridge.tx_cmd.send(AudioCmd::Shutdown);
    if bridge.handle.join().is_err() {
        warn!("audio thread panicked");
    }
}
