//! Long-lived data shared by the loop and the layers.
//!
//! Overview
//! - `audio` – bridge and channels for the background audio thread
//! - `context` – [`SharedState`](context::SharedState) written by the menu, read everywhere
//! - `counter` – rolling frame time average
//! - `fontstore` – loaded fonts keyed by string ids
//! - `gameconfig` – INI configuration with safe defaults
//! - `objectcount` – number of tiles the gameplay world keeps
//! - `script` – Lua handlers triggered by gameplay input
//! - `spritesheet` – TexturePacker frame lookup
//! - `texturestore` – loaded textures keyed by string ids
//! - `tilemap` – level layout and tileset addressing
//! - `worldtime` – simulation time of the gameplay world
pub mod audio;
pub mod context;
pub mod counter;
pub mod fontstore;
pub mod gameconfig;
pub mod objectcount;
pub mod script;
pub mod spritesheet;
pub mod texturestore;
pub mod tilemap;
pub mod worldtime;
