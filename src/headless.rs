//! Windowless platform.
//!
//! Runs the loop without a GPU: draws are recorded, textures and fonts are
//! accepted without decoding, and input is scripted per frame. Used by
//! `--headless` runs and by the integration tests.

use std::cell::Cell;
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::debug;
use raylib::prelude::{Color, Rectangle, Vector2};
use rustc_hash::FxHashMap;

use crate::error::{AssetError, RenderError};
use crate::events::input::InputEvent;
use crate::gameloop::{Clock, Platform};
use crate::render::{AssetLoader, Canvas, Pass, TextureInfo};

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    base: Instant,
    offset: Rc<Cell<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    /// Time advanced since creation.
    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.offset.get()
    }
}

/// One recorded canvas call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Bind(&'static str),
    Unbind(&'static str),
    Text {
        font: Option<String>,
        text: String,
        x: f32,
        y: f32,
    },
    Sprite {
        texture: String,
        x: f32,
        y: f32,
        rotation: f32,
    },
    Lines {
        points: usize,
    },
}

/// Canvas that records draw calls instead of drawing.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    ops: Vec<DrawOp>,
    size: (i32, i32),
    failing_texture: Option<String>,
}

impl RecordingCanvas {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            ops: Vec::new(),
            size: (width, height),
            failing_texture: None,
        }
    }

    /// Make sprite draws from `texture` fail as if it was never loaded.
    pub fn fail_texture(&mut self, texture: impl Into<String>) {
        self.failing_texture = Some(texture.into());
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Text drawn so far, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn sprite_count(&self, texture: &str) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Sprite { texture: t, .. } if t == texture))
            .count()
    }
}

impl Canvas for RecordingCanvas {
    fn bind(&mut self, pass: &Pass) -> Result<(), RenderError> {
        self.ops.push(DrawOp::Bind(pass.name()));
        Ok(())
    }

    fn unbind(&mut self, pass: &Pass) {
        self.ops.push(DrawOp::Unbind(pass.name()));
    }

    fn draw_text(
        &mut self,
        font: Option<&str>,
        text: &str,
        pos: Vector2,
        _size: f32,
        _color: Color,
    ) -> Result<(), RenderError> {
        self.ops.push(DrawOp::Text {
            font: font.map(str::to_string),
            text: text.to_string(),
            x: pos.x,
            y: pos.y,
        });
        Ok(())
    }

    fn draw_sprite(
        &mut self,
        texture: &str,
        _source: Rectangle,
        dest: Rectangle,
        rotation: f32,
        _tint: Color,
    ) -> Result<(), RenderError> {
        if self.failing_texture.as_deref() == Some(texture) {
            return Err(RenderError::MissingTexture(texture.to_string()));
        }
        self.ops.push(DrawOp::Sprite {
            texture: texture.to_string(),
            x: dest.x,
            y: dest.y,
            rotation,
        });
        Ok(())
    }

    fn draw_lines(&mut self, points: &[Vector2], _thickness: f32, _color: Color) {
        self.ops.push(DrawOp::Lines {
            points: points.len(),
        });
    }

    fn screen_size(&self) -> (i32, i32) {
        self.size
    }
}

/// Asset loader backed by in-memory text files.
///
/// Textures and fonts are never decoded: loads are recorded and every
/// texture reports the same size. Text lookups fall back to the filesystem
/// when created with [`MemoryAssets::from_disk`].
#[derive(Debug, Clone)]
pub struct MemoryAssets {
    files: FxHashMap<PathBuf, String>,
    read_disk: bool,
    texture_size: TextureInfo,
    failing: Option<PathBuf>,
    textures: Vec<String>,
    fonts: Vec<String>,
}

impl Default for MemoryAssets {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self {
            files: FxHashMap::default(),
            read_disk: false,
            texture_size: TextureInfo {
                width: 256,
                height: 256,
            },
            failing: None,
            textures: Vec::new(),
            fonts: Vec::new(),
        }
    }

    pub fn from_disk() -> Self {
        Self {
            read_disk: true,
            ..Self::new()
        }
    }

    pub fn insert_file(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> &mut Self {
        self.files.insert(path.into(), text.into());
        self
    }

    /// Make every load of `path` fail.
    pub fn fail_on(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.failing = Some(path.into());
        self
    }

    /// Keys of every texture load, in order.
    pub fn textures(&self) -> &[String] {
        &self.textures
    }

    /// Keys of every font load, in order.
    pub fn fonts(&self) -> &[String] {
        &self.fonts
    }

    fn check(&self, path: &Path) -> Result<(), String> {
        match self.failing.as_deref() {
            Some(failing) if failing == path => Err("load refused".to_string()),
            _ => Ok(()),
        }
    }
}

impl AssetLoader for MemoryAssets {
    fn load_texture(&mut self, key: &str, path: &Path) -> Result<TextureInfo, AssetError> {
        self.check(path).map_err(|reason| AssetError::Texture {
            key: key.to_string(),
            path: path.to_path_buf(),
            reason,
        })?;
        self.textures.push(key.to_string());
        Ok(self.texture_size)
    }

    fn load_font(&mut self, key: &str, path: &Path, _size: i32) -> Result<(), AssetError> {
        self.check(path).map_err(|reason| AssetError::Font {
            key: key.to_string(),
            path: path.to_path_buf(),
            reason,
        })?;
        self.fonts.push(key.to_string());
        Ok(())
    }

    fn read_text(&mut self, path: &Path) -> Result<String, AssetError> {
        let io_error = |source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        };
        if self.check(path).is_err() {
            return Err(io_error(io::Error::new(io::ErrorKind::PermissionDenied, "load refused")));
        }
        if let Some(text) = self.files.get(path) {
            return Ok(text.clone());
        }
        if self.read_disk {
            return fs::read_to_string(path).map_err(io_error);
        }
        Err(io_error(io::Error::from(io::ErrorKind::NotFound)))
    }
}

/// Platform without a window.
pub struct HeadlessPlatform {
    canvas: RecordingCanvas,
    assets: MemoryAssets,
    frame_limit: Option<u64>,
    frames: u64,
    input: VecDeque<Vec<InputEvent>>,
    fullscreen: bool,
    switches: u32,
    frame_time: Option<(ManualClock, Duration)>,
}

impl HeadlessPlatform {
    pub fn new(assets: MemoryAssets, width: i32, height: i32) -> Self {
        Self {
            canvas: RecordingCanvas::new(width, height),
            assets,
            frame_limit: None,
            frames: 0,
            input: VecDeque::new(),
            fullscreen: false,
            switches: 0,
            frame_time: None,
        }
    }

    /// Ask to close once `frames` frames were drawn.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    /// Advance `clock` by `per_frame` while each frame is drawn.
    pub fn with_frame_time(mut self, clock: ManualClock, per_frame: Duration) -> Self {
        self.frame_time = Some((clock, per_frame));
        self
    }

    /// Queue the input returned by one future `poll_input` call.
    pub fn push_input(&mut self, batch: Vec<InputEvent>) {
        self.input.push_back(batch);
    }

    /// Draw calls of the last frame.
    pub fn canvas(&self) -> &RecordingCanvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut RecordingCanvas {
        &mut self.canvas
    }

    pub fn memory_assets(&self) -> &MemoryAssets {
        &self.assets
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Number of display mode changes.
    pub fn switches(&self) -> u32 {
        self.switches
    }
}

impl Platform for HeadlessPlatform {
    fn should_close(&self) -> bool {
        self.frame_limit.is_some_and(|limit| self.frames >= limit)
    }

    fn draw_frame(
        &mut self,
        draw: &mut dyn FnMut(&mut dyn Canvas) -> Result<(), RenderError>,
    ) -> Result<(), RenderError> {
        self.canvas.clear();
        let result = draw(&mut self.canvas);
        self.frames += 1;
        if let Some((clock, per_frame)) = self.frame_time.as_ref() {
            clock.advance(*per_frame);
        }
        result
    }

    fn poll_input(&mut self, out: &mut Vec<InputEvent>) {
        if let Some(batch) = self.input.pop_front() {
            out.extend(batch);
        }
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        if self.fullscreen != fullscreen {
            debug!("headless fullscreen -> {}", fullscreen);
            self.fullscreen = fullscreen;
            self.switches += 1;
        }
    }

    fn assets(&mut self) -> &mut dyn AssetLoader {
        &mut self.assets
    }
}
