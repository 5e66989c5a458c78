//! Frame time overlay.

use std::path::PathBuf;
use std::time::Duration;

use raylib::prelude::{Color, KeyboardKey, Vector2};

use super::{Layer, LayerContext};
use crate::error::{LayerError, RenderError};
use crate::events::input::InputEvent;
use crate::render::{AssetLoader, Canvas, Pass, bind};
use crate::resources::context::SharedState;
use crate::resources::counter::FrameCounter;

pub const FONT_KEY: &str = "debug";
const FONT_SIZE: i32 = 32;
const DETAIL_SIZE: f32 = 16.0;
const FOREGROUND: Color = Color {
    r: 0,
    g: 255,
    b: 0,
    a: 255,
};

/// Draws the average frame time in the top-left corner. With the debug flag
/// set (F11) it adds the object count, display mode and frame total.
pub struct DebugLayer {
    counter: FrameCounter,
    font_path: PathBuf,
}

impl DebugLayer {
    pub fn new(font_path: impl Into<PathBuf>) -> Self {
        Self {
            counter: FrameCounter::new(),
            font_path: font_path.into(),
        }
    }

    pub fn counter(&self) -> &FrameCounter {
        &self.counter
    }
}

impl Layer for DebugLayer {
    fn name(&self) -> &str {
        "debug"
    }

    fn render(&mut self, canvas: &mut dyn Canvas, state: &SharedState) -> Result<(), RenderError> {
        self.counter.incr();
        let mut overlay = bind(canvas, Pass::Overlay)?;
        let (_, height) = overlay.screen_size();
        let fps_line = format!("{:3.3} ms/frame", self.counter.avg);
        overlay.draw_text(
            Some(FONT_KEY),
            &fps_line,
            Vector2::new(0.0, height as f32 - FONT_SIZE as f32),
            FONT_SIZE as f32,
            FOREGROUND,
        )?;
        if state.debug {
            let details = [
                format!("objects: {}", state.objects()),
                format!("fullscreen: {}", state.fullscreen),
                format!("frames: {}", self.counter.frames()),
            ];
            let top = height as f32 - FONT_SIZE as f32 - DETAIL_SIZE * details.len() as f32;
            for (i, line) in details.iter().enumerate() {
                let pos = Vector2::new(0.0, top + i as f32 * DETAIL_SIZE);
                overlay.draw_text(None, line, pos, DETAIL_SIZE, FOREGROUND)?;
            }
        }
        Ok(())
    }

    fn update(&mut self, _elapsed: Duration, _ctx: &mut LayerContext) {}

    fn handle_event(&mut self, event: &InputEvent, ctx: &mut LayerContext) -> bool {
        if event.pressed_key() == Some(KeyboardKey::KEY_F11) {
            ctx.state.debug = !ctx.state.debug;
            return true;
        }
        false
    }

    fn reset(&mut self, _ctx: &mut LayerContext, assets: &mut dyn AssetLoader) -> Result<(), LayerError> {
        assets.load_font(FONT_KEY, &self.font_path, FONT_SIZE)?;
        self.counter = FrameCounter::new();
        Ok(())
    }
}
