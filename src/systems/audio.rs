//! Audio playback driven by game events.
//!
//! - [`audio_thread`] runs on its own OS thread, owns the raylib audio
//!   device, and processes [`AudioCmd`] messages, answering with
//!   [`AudioMessage`]s.
//! - [`AudioSystem`] lives on the loop thread. It registers one bus observer
//!   per music or sound event; each observer only sends a command to the
//!   audio thread.
//!
//! Only one music track is current at a time. Starting a track pauses the
//! previous one; pause and resume act on the current track.
//!
//! See also: [`crate::events::audio`] and [`crate::resources::audio`].

use crate::events::audio::{AudioCmd, AudioMessage};
use crate::events::bus::{EventBus, ObserverId};
use crate::events::game::{GameEvent, GameEventType};
use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, info, warn};
use raylib::core::audio::{Music, RaylibAudio, Sound};
use rustc_hash::FxHashMap;
use std::path::Path;

pub const BG_MUSIC: &str = "bgmusic";
pub const MENU_MUSIC: &str = "menumusic";
pub const FX_CLICK: &str = "click";
pub const FX_SELECT: &str = "select";

struct Current {
    id: String,
    looped: bool,
    paused: bool,
    finished: bool,
}

/// Entry point of the dedicated audio thread.
///
/// Drains commands without blocking, pumps the current music stream and
/// sleeps briefly between iterations. Returns after [`AudioCmd::Shutdown`]
/// or when the command channel closes.
pub fn audio_thread(rx_cmd: Receiver<AudioCmd>, tx_msg: Sender<AudioMessage>) {
    let audio = match RaylibAudio::init_audio_device() {
        Ok(device) => device,
        Err(e) => {
            error!("[audio] failed to initialize audio device: {}", e);
            let _ = tx_msg.send(AudioMessage::DeviceFailed {
                error: e.to_string(),
            });
            return;
        }
    };

    debug!(
        "[audio] thread starting (id={:?})",
        std::thread::current().id()
    );

    let mut musics: FxHashMap<String, Music> = FxHashMap::default();
    let mut sounds: FxHashMap<String, Sound> = FxHashMap::default();
    let mut current: Option<Current> = None;

    'run: loop {
        // 1) Drain commands
        loop {
            let cmd = match rx_cmd.try_recv() {
                Ok(cmd) => cmd,
                Err(crossbeam_channel::TryRecvError::Empty) => break,
                Err(crossbeam_channel::TryRecvError::Disconnected) => break 'run,
            };
            match cmd {
                AudioCmd::LoadMusic { id, path } => match audio.new_music(&path) {
                    Ok(music) => {
                        debug!("[audio] loaded id='{}' path='{}'", id, path);
                        musics.insert(id.clone(), music);
                        let _ = tx_msg.send(AudioMessage::MusicLoaded { id });
                    }
                    Err(e) => {
                        let _ = tx_msg.send(AudioMessage::MusicLoadFailed {
                            id,
                            error: format!("{}: {}", path, e),
                        });
                    }
                },
                AudioCmd::LoadFx { id, path } => match audio.new_sound(&path) {
                    Ok(sound) => {
                        debug!("[audio] fx loaded id='{}' path='{}'", id, path);
                        sounds.insert(id.clone(), sound);
                        let _ = tx_msg.send(AudioMessage::FxLoaded { id });
                    }
                    Err(e) => {
                        let _ = tx_msg.send(AudioMessage::FxLoadFailed {
                            id,
                            error: format!("{}: {}", path, e),
                        });
                    }
                },
                AudioCmd::PlayMusic { id, looped } => {
                    let Some(music) = musics.get(&id) else {
                        warn!("[audio] play failed id='{}' reason='not loaded'", id);
                        continue;
                    };
                    if let Some(cur) = current.as_mut() {
                        if !cur.paused && !cur.finished {
                            if let Some(previous) = musics.get(&cur.id) {
                                previous.pause_stream();
                            }
                            let _ = tx_msg.send(AudioMessage::MusicPaused { id: cur.id.clone() });
                        }
                    }
                    music.seek_stream(0.0);
                    music.play_stream();
                    current = Some(Current {
                        id: id.clone(),
                        looped,
                        paused: false,
                        finished: false,
                    });
                    let _ = tx_msg.send(AudioMessage::MusicPlayStarted { id });
                }
                AudioCmd::PauseMusic => {
                    if let Some(cur) = current.as_mut() {
                        if !cur.paused && !cur.finished {
                            if let Some(music) = musics.get(&cur.id) {
                                music.pause_stream();
                            }
                            cur.paused = true;
                            let _ = tx_msg.send(AudioMessage::MusicPaused { id: cur.id.clone() });
                        }
                    }
                }
                AudioCmd::ResumeMusic => {
                    if let Some(cur) = current.as_mut() {
                        if cur.paused {
                            if let Some(music) = musics.get(&cur.id) {
                                music.resume_stream();
                            }
                            cur.paused = false;
                            let _ = tx_msg.send(AudioMessage::MusicResumed { id: cur.id.clone() });
                        }
                    }
                }
                AudioCmd::PlayFx { id } => match sounds.get(&id) {
                    Some(sound) => sound.play(),
                    None => {
                        let _ = tx_msg.send(AudioMessage::FxMissing { id });
                    }
                },
                AudioCmd::Shutdown => {
                    debug!("[audio] shutdown requested");
                    break 'run;
                }
            }
        }

        // 2) Pump the current stream and detect its end
        if let Some(cur) = current.as_mut() {
            if !cur.paused && !cur.finished {
                if let Some(music) = musics.get(&cur.id) {
                    if music.is_stream_playing() {
                        music.update_stream();
                    } else if music.get_time_played() >= music.get_time_length() - 0.01 {
                        if cur.looped {
                            music.seek_stream(0.0);
                            music.play_stream();
                        } else {
                            cur.finished = true;
                            let _ = tx_msg.send(AudioMessage::MusicFinished { id: cur.id.clone() });
                        }
                    }
                }
            }
        }
        std::thread::sleep(std::time::Duration::from_millis(10));
    } // 'run

    musics.clear();
    sounds.clear();
    debug!(
        "[audio] thread exiting (id={:?})",
        std::thread::current().id()
    );
    // musics and sounds drop before `audio`
}

/// Files played by the [`AudioSystem`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioTracks {
    pub bg_music: String,
    pub menu_music: String,
    pub click: String,
    pub select: String,
}

impl AudioTracks {
    /// Default track layout under `assets/sounds`.
    pub fn in_dir(assets: &Path) -> Self {
        let sound = |name: &str| assets.join("sounds").join(name).to_string_lossy().into_owned();
        Self {
            bg_music: sound("Dream_World_Theme_1.ogg"),
            menu_music: sound("Menu_Track_1.ogg"),
            click: sound("click.ogg"),
            select: sound("select.ogg"),
        }
    }
}

/// Bus observers that turn game events into audio commands.
pub struct AudioSystem {
    rx_msg: Receiver<AudioMessage>,
    observers: Vec<(GameEventType, ObserverId)>,
}

impl AudioSystem {
    /// Ask the audio thread to load every track, then observe the music and
    /// sound events on `bus`.
    pub fn register(
        tx_cmd: Sender<AudioCmd>,
        rx_msg: Receiver<AudioMessage>,
        tracks: &AudioTracks,
        bus: &mut EventBus<GameEvent>,
    ) -> Self {
        let loads = [
            AudioCmd::LoadMusic {
                id: BG_MUSIC.into(),
                path: tracks.bg_music.clone(),
            },
            AudioCmd::LoadMusic {
                id: MENU_MUSIC.into(),
                path: tracks.menu_music.clone(),
            },
            AudioCmd::LoadFx {
                id: FX_CLICK.into(),
                path: tracks.click.clone(),
            },
            AudioCmd::LoadFx {
                id: FX_SELECT.into(),
                path: tracks.select.clone(),
            },
        ];
        for cmd in loads {
            let _ = tx_cmd.send(cmd);
        }

        let bindings: [(GameEventType, AudioCmd); 6] = [
            (
                GameEventType::BgMusic,
                AudioCmd::PlayMusic {
                    id: BG_MUSIC.into(),
                    looped: true,
                },
            ),
            (
                GameEventType::MenuMusic,
                AudioCmd::PlayMusic {
                    id: MENU_MUSIC.into(),
                    looped: true,
                },
            ),
            (GameEventType::PauseMusic, AudioCmd::PauseMusic),
            (GameEventType::ResumeMusic, AudioCmd::ResumeMusic),
            (
                GameEventType::MenuSel,
                AudioCmd::PlayFx {
                    id: FX_SELECT.into(),
                },
            ),
            (
                GameEventType::MenuClick,
                AudioCmd::PlayFx {
                    id: FX_CLICK.into(),
                },
            ),
        ];
        let observers = bindings
            .into_iter()
            .map(|(kind, cmd)| {
                let tx = tx_cmd.clone();
                let id = bus.add_observer(kind, move |_| {
                    // Disconnected only after shutdown; nothing left to play.
                    let _ = tx.send(cmd.clone());
                });
                (kind, id)
            })
            .collect();

        Self { rx_msg, observers }
    }

    /// Log everything the audio thread reported since the last call.
    pub fn poll_messages(&self) -> usize {
        let mut count = 0;
        for msg in self.rx_msg.try_iter() {
            count += 1;
            match msg {
                AudioMessage::DeviceFailed { error } => error!("audio device failed: {}", error),
                AudioMessage::MusicLoadFailed { id, error } => {
                    error!("music '{}' failed to load: {}", id, error)
                }
                AudioMessage::FxLoadFailed { id, error } => {
                    error!("sound '{}' failed to load: {}", id, error)
                }
                AudioMessage::FxMissing { id } => warn!("sound '{}' is not loaded", id),
                AudioMessage::MusicFinished { id } => info!("music '{}' finished", id),
                other => debug!("audio: {:?}", other),
            }
        }
        count
    }

    /// Number of bus observers still registered.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Remove every observer from `bus`. Safe to call twice.
    pub fn dispose(&mut self, bus: &mut EventBus<GameEvent>) {
        for (kind, id) in self.observers.drain(..) {
            bus.remove_observer(kind, id);
        }
    }
}
