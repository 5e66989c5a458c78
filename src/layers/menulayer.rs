//! Modal settings menu drawn over the game.
//!
//! Hidden until `Escape` is pressed. While shown it consumes every input
//! event; while hidden it lets everything but the opening `Escape` through.

use std::path::PathBuf;
use std::time::Duration;

use log::{debug, info};
use raylib::prelude::{Color, KeyboardKey, Vector2};

use super::{Layer, LayerContext};
use crate::error::{LayerError, RenderError};
use crate::events::game::GameEvent;
use crate::events::input::{ButtonState, InputEvent};
use crate::menu::{MenuData, MenuItem, MenuTree, ValueCell};
use crate::render::{AssetLoader, Canvas, Pass, bind};
use crate::resources::context::SharedState;

/// Key of program actions.
pub const PROGRAM_CODE: i32 = 0;

/// Values reported under [`PROGRAM_CODE`], plus the object count key.
pub const RESTART_CODE: i32 = 0;
pub const EXIT_CODE: i32 = 1;
pub const FULLSCREEN_CODE: i32 = 2;
pub const OBJECT_COUNT_CODE: i32 = 3;

pub const OBJECT_COUNTS: [i32; 7] = [64, 128, 256, 512, 1024, 2048, 4096];

pub const FONT_KEY: &str = "menu";
pub const FONT_SIZE: i32 = 32;

const REGULAR: Color = Color {
    r: 200,
    g: 200,
    b: 200,
    a: 255,
};
const HIGHLIGHTED: Color = Color {
    r: 255,
    g: 240,
    b: 120,
    a: 255,
};
const ACTIVE: Color = Color {
    r: 200,
    g: 200,
    b: 255,
    a: 255,
};

/// The demo menu: object count choices, fullscreen toggle, exit.
pub fn build_menu(object_count: &ValueCell) -> MenuTree {
    let mut counts = vec![MenuItem::back("..")];
    counts.extend(
        OBJECT_COUNTS
            .iter()
            .map(|&n| MenuItem::bound(n.to_string(), OBJECT_COUNT_CODE, n, object_count)),
    );
    MenuTree::new(vec![
        MenuItem::parent("Objects", counts),
        MenuItem::leaf("Fullscreen", PROGRAM_CODE, FULLSCREEN_CODE),
        MenuItem::leaf("Exit", PROGRAM_CODE, EXIT_CODE),
    ])
}

pub struct MenuLayer {
    menu: MenuTree,
    visible: bool,
    font_path: PathBuf,
    line_height: f32,
}

impl MenuLayer {
    pub fn new(state: &SharedState, font_path: impl Into<PathBuf>) -> Self {
        Self {
            menu: build_menu(&state.object_count),
            visible: false,
            font_path: font_path.into(),
            line_height: FONT_SIZE as f32,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn menu(&self) -> &MenuTree {
        &self.menu
    }

    fn select(&mut self, ctx: &mut LayerContext) {
        if let Some(data) = self.menu.select() {
            apply_selection(data, ctx);
        }
        ctx.events.enqueue(GameEvent::MenuSel);
    }

    fn handle_visible(&mut self, event: &InputEvent, ctx: &mut LayerContext) {
        match *event {
            InputEvent::Key {
                state: ButtonState::Press,
                code,
            } => match code {
                KeyboardKey::KEY_ESCAPE => {
                    self.visible = false;
                    ctx.events.enqueue(GameEvent::MenuSel);
                    ctx.events.enqueue(GameEvent::BgMusic);
                    ctx.state.music_paused = false;
                }
                KeyboardKey::KEY_UP => {
                    self.menu.prev();
                    ctx.events.enqueue(GameEvent::MenuClick);
                }
                KeyboardKey::KEY_DOWN => {
                    self.menu.next();
                    ctx.events.enqueue(GameEvent::MenuClick);
                }
                KeyboardKey::KEY_ENTER => self.select(ctx),
                _ => {}
            },
            InputEvent::MouseButton {
                state: ButtonState::Press,
                ..
            } => self.select(ctx),
            InputEvent::MouseMove { y, .. } => {
                if y < 0.0 {
                    return;
                }
                let index = (y / self.line_height) as usize;
                if index != self.menu.highlighted_index() && self.menu.highlight_item(index) {
                    ctx.events.enqueue(GameEvent::MenuClick);
                }
            }
            _ => {}
        }
    }
}

/// Act on a reported selection.
fn apply_selection(data: MenuData, ctx: &mut LayerContext) {
    match (data.key, data.value) {
        (OBJECT_COUNT_CODE, value) => {
            ctx.state.object_count.set(value);
            info!("object count set to {}", value);
        }
        (PROGRAM_CODE, EXIT_CODE) => ctx.state.exit = true,
        (PROGRAM_CODE, FULLSCREEN_CODE) => ctx.state.fullscreen = !ctx.state.fullscreen,
        _ => ctx.events.enqueue(GameEvent::MenuAction(data)),
    }
}

impl Layer for MenuLayer {
    fn name(&self) -> &str {
        "menu"
    }

    fn render(&mut self, canvas: &mut dyn Canvas, _state: &SharedState) -> Result<(), RenderError> {
        if !self.visible {
            return Ok(());
        }
        let mut overlay = bind(canvas, Pass::Overlay)?;
        for view in self.menu.items() {
            let color = if view.highlighted {
                HIGHLIGHTED
            } else if view.active {
                ACTIVE
            } else {
                REGULAR
            };
            let pos = Vector2::new(0.0, view.index as f32 * self.line_height);
            overlay.draw_text(Some(FONT_KEY), view.label(), pos, self.line_height, color)?;
        }
        Ok(())
    }

    fn update(&mut self, _elapsed: Duration, _ctx: &mut LayerContext) {}

    fn handle_event(&mut self, event: &InputEvent, ctx: &mut LayerContext) -> bool {
        if self.visible {
            self.handle_visible(event, ctx);
            return true;
        }
        if event.pressed_key() == Some(KeyboardKey::KEY_ESCAPE) {
            debug!("menu opened");
            self.menu.reset();
            self.visible = true;
            ctx.events.enqueue(GameEvent::MenuSel);
            ctx.events.enqueue(GameEvent::MenuMusic);
            ctx.state.music_paused = false;
            return true;
        }
        false
    }

    fn reset(&mut self, _ctx: &mut LayerContext, assets: &mut dyn AssetLoader) -> Result<(), LayerError> {
        assets.load_font(FONT_KEY, &self.font_path, FONT_SIZE)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::bus::EventBus;
    use crate::events::input::InputEvent;

    fn open(layer: &mut MenuLayer, state: &mut SharedState, bus: &EventBus<GameEvent>) {
        let mut ctx = LayerContext { state, events: bus };
        assert!(layer.handle_event(&InputEvent::key_press(KeyboardKey::KEY_ESCAPE), &mut ctx));
    }

    #[test]
    fn test_hidden_menu_passes_input_through() {
        let mut state = SharedState::default();
        let bus = EventBus::new();
        let mut layer = MenuLayer::new(&state, "font.ttf");
        let mut ctx = LayerContext {
            state: &mut state,
            events: &bus,
        };
        assert!(!layer.handle_event(&InputEvent::key_press(KeyboardKey::KEY_UP), &mut ctx));
        assert!(!layer.handle_event(&InputEvent::mouse_move(10.0, 10.0), &mut ctx));
        assert!(!layer.is_visible());
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn test_escape_opens_and_closes() {
        let mut state = SharedState::default();
        let bus = EventBus::new();
        let mut layer = MenuLayer::new(&state, "font.ttf");
        open(&mut layer, &mut state, &bus);
        assert!(layer.is_visible());
        assert_eq!(bus.pending(), 2);
        open(&mut layer, &mut state, &bus);
        assert!(!layer.is_visible());
        assert_eq!(bus.pending(), 4);
    }

    #[test]
    fn test_exit_and_fullscreen_selections() {
        let mut state = SharedState::default();
        let bus = EventBus::new();
        let mut layer = MenuLayer::new(&state, "font.ttf");
        open(&mut layer, &mut state, &bus);
        let mut ctx = LayerContext {
            state: &mut state,
            events: &bus,
        };
        layer.handle_event(&InputEvent::key_press(KeyboardKey::KEY_DOWN), &mut ctx);
        layer.handle_event(&InputEvent::key_press(KeyboardKey::KEY_ENTER), &mut ctx);
        assert!(ctx.state.fullscreen);
        layer.handle_event(&InputEvent::key_press(KeyboardKey::KEY_DOWN), &mut ctx);
        layer.handle_event(&InputEvent::key_press(KeyboardKey::KEY_ENTER), &mut ctx);
        assert!(ctx.state.exit);
    }

    #[test]
    fn test_mouse_move_highlights_row() {
        let mut state = SharedState::default();
        let bus = EventBus::new();
        let mut layer = MenuLayer::new(&state, "font.ttf");
        open(&mut layer, &mut state, &bus);
        let before = bus.pending();
        let mut ctx = LayerContext {
            state: &mut state,
            events: &bus,
        };
        layer.handle_event(&InputEvent::mouse_move(5.0, 70.0), &mut ctx);
        assert_eq!(layer.menu().highlighted_index(), 2);
        // Same row, no click; below the last row, ignored.
        layer.handle_event(&InputEvent::mouse_move(5.0, 80.0), &mut ctx);
        layer.handle_event(&InputEvent::mouse_move(5.0, 500.0), &mut ctx);
        assert_eq!(layer.menu().highlighted_index(), 2);
        assert_eq!(bus.pending(), before + 1);
    }

    #[test]
    fn test_unknown_program_code_is_reported() {
        let mut state = SharedState::default();
        let bus = EventBus::new();
        let mut ctx = LayerContext {
            state: &mut state,
            events: &bus,
        };
        let data = MenuData {
            key: PROGRAM_CODE,
            value: RESTART_CODE,
        };
        apply_selection(data, &mut ctx);
        assert_eq!(bus.pending(), 1);
        assert!(!ctx.state.exit);
    }
}
