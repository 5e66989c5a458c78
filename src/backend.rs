//! raylib implementation of the platform, the canvas and the asset loader.
//!
//! All GPU handles live here and are only touched from the loop thread. The
//! world pass is drawn by transforming coordinates through the viewport
//! camera, so passes can be opened and closed independently instead of
//! through raylib's scoped mode handles.

use std::path::Path;

use log::{error, info};
use raylib::ffi;
use raylib::prelude::*;

use crate::error::{AssetError, RenderError};
use crate::events::input::{ButtonState, InputEvent};
use crate::gameloop::Platform;
use crate::render::{AssetLoader, Canvas, Pass, TextureInfo, Viewport};
use crate::resources::fontstore::FontStore;
use crate::resources::gameconfig::GameConfig;
use crate::resources::texturestore::TextureStore;

/// Keys turned into [`InputEvent::Key`] edges.
const WATCHED_KEYS: [KeyboardKey; 10] = [
    KeyboardKey::KEY_ESCAPE,
    KeyboardKey::KEY_UP,
    KeyboardKey::KEY_DOWN,
    KeyboardKey::KEY_LEFT,
    KeyboardKey::KEY_RIGHT,
    KeyboardKey::KEY_ENTER,
    KeyboardKey::KEY_SPACE,
    KeyboardKey::KEY_M,
    KeyboardKey::KEY_F10,
    KeyboardKey::KEY_F11,
];

const WATCHED_BUTTONS: [MouseButton; 2] = [MouseButton::MOUSE_BUTTON_LEFT, MouseButton::MOUSE_BUTTON_RIGHT];

pub struct RaylibPlatform {
    rl: RaylibHandle,
    thread: RaylibThread,
    textures: TextureStore,
    fonts: FontStore,
    window_size: (i32, i32),
    last_mouse: Option<(f32, f32)>,
}

impl RaylibPlatform {
    /// Open the window described by `config`.
    pub fn new(config: &GameConfig) -> Self {
        let (w, h) = config.window_size();
        let (mut rl, thread) = raylib::init()
            .size(w as i32, h as i32)
            .resizable()
            .title("twodee")
            .build();
        rl.set_target_fps(config.target_fps);
        // Escape opens the menu
        rl.set_exit_key(None);

        let mut platform = Self {
            rl,
            thread,
            textures: TextureStore::new(),
            fonts: FontStore::new(),
            window_size: (w as i32, h as i32),
            last_mouse: None,
        };
        if config.fullscreen {
            platform.set_fullscreen(true);
        }
        platform
    }
}

impl Platform for RaylibPlatform {
    fn should_close(&self) -> bool {
        self.rl.window_should_close()
    }

    fn draw_frame(
        &mut self,
        draw: &mut dyn FnMut(&mut dyn Canvas) -> Result<(), RenderError>,
    ) -> Result<(), RenderError> {
        let mut d = self.rl.begin_drawing(&self.thread);
        d.clear_background(Color::BLACK);
        let mut canvas = RaylibCanvas {
            d,
            textures: &self.textures,
            fonts: &self.fonts,
            view: None,
        };
        draw(&mut canvas)
        // EndDrawing runs when the draw handle drops
    }

    fn poll_input(&mut self, out: &mut Vec<InputEvent>) {
        let mouse = self.rl.get_mouse_position();
        if self.last_mouse != Some((mouse.x, mouse.y)) {
            self.last_mouse = Some((mouse.x, mouse.y));
            out.push(InputEvent::mouse_move(mouse.x, mouse.y));
        }
        for button in WATCHED_BUTTONS {
            if self.rl.is_mouse_button_pressed(button) {
                out.push(InputEvent::mouse_press(button));
            }
            if self.rl.is_mouse_button_released(button) {
                out.push(InputEvent::MouseButton {
                    state: ButtonState::Release,
                    button,
                });
            }
        }
        for key in WATCHED_KEYS {
            if self.rl.is_key_pressed(key) {
                out.push(InputEvent::key_press(key));
            }
            if self.rl.is_key_released(key) {
                out.push(InputEvent::key_release(key));
            }
        }
    }

    fn is_fullscreen(&self) -> bool {
        self.rl.is_window_fullscreen()
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        if fullscreen == self.rl.is_window_fullscreen() {
            return;
        }
        if fullscreen {
            let monitor = unsafe { ffi::GetCurrentMonitor() };
            let (mw, mh) = unsafe { (ffi::GetMonitorWidth(monitor), ffi::GetMonitorHeight(monitor)) };
            info!("Monitor dimensions: {}x{}", mw, mh);
            self.rl.set_window_size(mw, mh);
            self.rl.toggle_fullscreen();
        } else {
            self.rl.toggle_fullscreen();
            self.rl.set_window_size(self.window_size.0, self.window_size.1);
            self.rl.restore_window();
        }
        if self.rl.is_window_fullscreen() != fullscreen {
            error!("Failed to switch fullscreen to {}", fullscreen);
        }
    }

    fn assets(&mut self) -> &mut dyn AssetLoader {
        self
    }
}

impl AssetLoader for RaylibPlatform {
    fn load_texture(&mut self, key: &str, path: &Path) -> Result<TextureInfo, AssetError> {
        let texture = self
            .rl
            .load_texture(&self.thread, &path.to_string_lossy())
            .map_err(|e| AssetError::Texture {
                key: key.to_string(),
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        let info = TextureInfo {
            width: texture.width,
            height: texture.height,
        };
        info!("loaded texture '{}' {}x{} from {:?}", key, info.width, info.height, path);
        self.textures.insert(key, texture);
        Ok(info)
    }

    fn load_font(&mut self, key: &str, path: &Path, size: i32) -> Result<(), AssetError> {
        let font = self
            .rl
            .load_font_ex(&self.thread, &path.to_string_lossy(), size, None)
            .map_err(|e| AssetError::Font {
                key: key.to_string(),
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        self.fonts.add(key, font);
        Ok(())
    }
}

/// Canvas over one frame's draw handle.
struct RaylibCanvas<'a> {
    d: RaylibDrawHandle<'a>,
    textures: &'a TextureStore,
    fonts: &'a FontStore,
    /// Set while a world pass is bound.
    view: Option<Viewport>,
}

impl RaylibCanvas<'_> {
    /// Screen position of a canvas point, and the pixels per canvas unit.
    fn project(&self, p: Vector2) -> (Vector2, f32) {
        match self.view {
            Some(view) => {
                let camera = view.camera();
                let x = (p.x - camera.target.x) * camera.zoom + camera.offset.x;
                let y = (p.y - camera.target.y) * camera.zoom + camera.offset.y;
                (Vector2::new(x, y), camera.zoom)
            }
            None => (p, 1.0),
        }
    }
}

impl Canvas for RaylibCanvas<'_> {
    fn bind(&mut self, pass: &Pass) -> Result<(), RenderError> {
        match pass {
            Pass::World(view) => self.view = Some(*view),
            Pass::Glow => unsafe { ffi::BeginBlendMode(ffi::BlendMode::BLEND_ADDITIVE as i32) },
            Pass::Overlay => self.view = None,
        }
        Ok(())
    }

    fn unbind(&mut self, pass: &Pass) {
        match pass {
            Pass::World(_) => self.view = None,
            Pass::Glow => unsafe { ffi::EndBlendMode() },
            Pass::Overlay => {}
        }
    }

    fn draw_text(
        &mut self,
        font: Option<&str>,
        text: &str,
        pos: Vector2,
        size: f32,
        color: Color,
    ) -> Result<(), RenderError> {
        let (pos, scale) = self.project(pos);
        match font {
            Some(key) => {
                let font = self
                    .fonts
                    .get(key)
                    .ok_or_else(|| RenderError::MissingFont(key.to_string()))?;
                self.d.draw_text_ex(font, text, pos, size * scale, 1.0, color);
            }
            None => self.d.draw_text(text, pos.x as i32, pos.y as i32, (size * scale) as i32, color),
        }
        Ok(())
    }

    fn draw_sprite(
        &mut self,
        texture: &str,
        source: Rectangle,
        dest: Rectangle,
        rotation: f32,
        tint: Color,
    ) -> Result<(), RenderError> {
        let tex = self
            .textures
            .get(texture)
            .ok_or_else(|| RenderError::MissingTexture(texture.to_string()))?;
        let (centre, scale) = self.project(Vector2::new(dest.x, dest.y));
        let (w, h) = (dest.width * scale, dest.height * scale);
        self.d.draw_texture_pro(
            tex,
            source,
            Rectangle::new(centre.x, centre.y, w, h),
            Vector2::new(w * 0.5, h * 0.5),
            rotation,
            tint,
        );
        Ok(())
    }

    fn draw_lines(&mut self, points: &[Vector2], thickness: f32, color: Color) {
        for pair in points.windows(2) {
            let (a, scale) = self.project(pair[0]);
            let (b, _) = self.project(pair[1]);
            self.d.draw_line_ex(a, b, thickness * scale, color);
        }
    }

    fn screen_size(&self) -> (i32, i32) {
        (self.d.get_screen_width(), self.d.get_screen_height())
    }
}
