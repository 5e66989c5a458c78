//! Error types.
//!
//! Construction-time failures (assets, scripts, configuration) and per-frame
//! render failures are both surfaced through these enums. The game loop treats
//! every [`AppError`] reaching it as fatal.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error returned by the application and the game loop.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Layer error: {0}")]
    Layer(#[from] LayerError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Failures while loading textures, fonts or text assets.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to load texture '{key}' from '{path}': {reason}")]
    Texture {
        key: String,
        path: PathBuf,
        reason: String,
    },

    #[error("Failed to load font '{key}' from '{path}': {reason}")]
    Font {
        key: String,
        path: PathBuf,
        reason: String,
    },
}

/// Failures raised by a canvas while drawing a frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Texture '{0}' is not loaded")]
    MissingTexture(String),

    #[error("Spritesheet frame '{0}' not found")]
    MissingFrame(String),

    #[error("Font '{0}' is not loaded")]
    MissingFont(String),
}

/// Lua script failure. Carries the interpreter's message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Script error: {0}")]
pub struct ScriptError(pub String);

#[cfg(feature = "lua")]
impl From<mlua::Error> for ScriptError {
    fn from(e: mlua::Error) -> Self {
        ScriptError(e.to_string())
    }
}

/// Failures while resetting (re)building a layer's resources.
#[derive(Error, Debug)]
pub enum LayerError {
    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Script(#[from] ScriptError),
}

/// Configuration file failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    Load(String),

    #[error("Failed to save config file: {0}")]
    Save(String),
}
