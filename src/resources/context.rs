//! Shared application state.
//!
//! [`SharedState`] is owned by the [`Application`](crate::app::Application)
//! and lent to layers and the loop each frame. Menu selections write it, the
//! loop and the layers read it.

use crate::menu::ValueCell;

#[derive(Debug)]
pub struct SharedState {
    /// Number of tiles the gameplay layer shows. Bound to the "Objects" menu.
    pub object_count: ValueCell,
    /// Set to stop the game loop after the current iteration.
    pub exit: bool,
    /// Requested display mode; the loop applies changes to the platform.
    pub fullscreen: bool,
    /// Extended debug overlay.
    pub debug: bool,
    /// The current track is paused. Cleared whenever a track is started.
    pub music_paused: bool,
}

impl SharedState {
    pub fn new(object_count: i32) -> Self {
        Self {
            object_count: ValueCell::new(object_count),
            exit: false,
            fullscreen: false,
            debug: false,
            music_paused: false,
        }
    }

    pub fn objects(&self) -> usize {
        self.object_count.get().max(0) as usize
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new(64)
    }
}
