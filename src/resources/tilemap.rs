//! Tilemap description.
//!
//! A level is a directory `<dir>/<name>` holding `<name>.txt` (Tilesetter
//! JSON export) and `<name>.png` (the tileset). Tile ids index the tileset
//! left-to-right, top-to-bottom.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Single tile placement within a layer.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct Tileposition {
    /// X coordinate in tiles.
    pub x: u32,
    /// Y coordinate in tiles.
    pub y: u32,
    /// Tile identifier (tileset-local).
    pub id: u32,
}

/// A named tile layer containing positions.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Tilelayer {
    pub name: String,
    pub positions: Vec<Tileposition>,
}

/// Tilemap metadata and layers.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Tilemap {
    /// Size of a tile in pixels.
    pub tile_size: u32,
    /// Map width in tiles.
    pub map_width: u32,
    /// Map height in tiles.
    pub map_height: u32,
    pub layers: Vec<Tilelayer>,
}

/// File paths of a level directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelFiles {
    pub json: PathBuf,
    pub texture: PathBuf,
}

impl LevelFiles {
    pub fn new(dir: &Path) -> Self {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            json: dir.join(format!("{}.txt", name)),
            texture: dir.join(format!("{}.png", name)),
        }
    }
}

impl Tilemap {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Layer by name.
    pub fn layer(&self, name: &str) -> Option<&Tilelayer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Pixel offset of tile `id` inside a tileset `texture_width` pixels wide.
    pub fn tile_offset(&self, id: u32, texture_width: i32) -> (f32, f32) {
        let tile_size = self.tile_size.max(1);
        let tiles_per_row = ((texture_width.max(0) as u32) / tile_size).max(1);
        let col = id % tiles_per_row;
        let row = id / tiles_per_row;
        ((col * tile_size) as f32, (row * tile_size) as f32)
    }
}
