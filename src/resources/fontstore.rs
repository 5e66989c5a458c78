//! Font store.
//!
//! Fonts loaded through the raylib platform keyed by string ids. Raylib
//! fonts must be used on the main thread only, like every other GPU handle.

use raylib::prelude::Font;
use rustc_hash::FxHashMap;

/// Map of font keys to loaded fonts.
pub struct FontStore {
    fonts: FxHashMap<String, Font>,
}

impl Default for FontStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FontStore {
    /// Create an empty font store.
    pub fn new() -> Self {
        Self {
            fonts: FxHashMap::default(),
        }
    }

    /// Add a font with the given key.
    pub fn add(&mut self, id: impl Into<String>, font: Font) {
        self.fonts.insert(id.into(), font);
    }

    /// Get a font by its key.
    pub fn get(&self, id: impl AsRef<str>) -> Option<&Font> {
        self.fonts.get(id.as_ref())
    }

    /// Check whether a font is loaded under `id`.
    pub fn contains(&self, id: impl AsRef<str>) -> bool {
        self.fonts.contains_key(id.as_ref())
    }
}
