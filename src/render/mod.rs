//! Rendering and asset collaborators.
//!
//! Layers never talk to raylib directly. They draw through a [`Canvas`] and
//! load assets through an [`AssetLoader`]; the raylib backend and the headless
//! platform both implement these.
//!
//! Drawing happens inside passes. [`bind`] opens a pass and returns a
//! [`Bound`] guard that closes it when dropped, so every exit path of a render
//! function (including `?`) unbinds what it bound.

use std::fs;
use std::ops::{Deref, DerefMut};
use std::path::Path;

use raylib::prelude::{Camera2D, Color, Rectangle, Vector2};

use crate::error::{AssetError, RenderError};

/// Axis-aligned region of the world, Y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl WorldBounds {
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Move the region by `(dx, dy)` world units.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.min_x += dx;
        self.max_x += dx;
        self.min_y += dy;
        self.max_y += dy;
    }
}

/// Maps a [`WorldBounds`] region onto a screen of `screen_w` x `screen_h`
/// pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub world: WorldBounds,
    pub screen_w: f32,
    pub screen_h: f32,
}

impl Viewport {
    pub fn new(world: WorldBounds, screen_w: i32, screen_h: i32) -> Self {
        Self {
            world,
            screen_w: screen_w as f32,
            screen_h: screen_h as f32,
        }
    }

    /// World point under the screen pixel `(x, y)`.
    pub fn screen_to_world(&self, x: f32, y: f32) -> Vector2 {
        let w = self.world;
        Vector2::new(
            w.min_x + x / self.screen_w.max(1.0) * w.width(),
            w.max_y - y / self.screen_h.max(1.0) * w.height(),
        )
    }

    /// Position to draw the world point `(x, y)` at while the world pass is
    /// bound. Canvas space is Y down, so Y is mirrored.
    pub fn to_canvas(x: f32, y: f32) -> Vector2 {
        Vector2::new(x, -y)
    }

    /// Pixels per world unit, fitting the whole region on screen.
    pub fn zoom(&self) -> f32 {
        let w = self.world;
        (self.screen_w / w.width().max(f32::EPSILON)).min(self.screen_h / w.height().max(f32::EPSILON))
    }

    /// Camera showing the world region centred on the screen.
    pub fn camera(&self) -> Camera2D {
        let w = self.world;
        Camera2D {
            offset: Vector2::new(self.screen_w * 0.5, self.screen_h * 0.5),
            target: Viewport::to_canvas((w.min_x + w.max_x) * 0.5, (w.min_y + w.max_y) * 0.5),
            rotation: 0.0,
            zoom: self.zoom(),
        }
    }
}

/// Drawing state opened by [`Canvas::bind`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pass {
    /// World space through the viewport camera.
    World(Viewport),
    /// Additive blending, for glowing sprites. Nest inside a world pass.
    Glow,
    /// Screen space, pixels from the top-left corner.
    Overlay,
}

impl Pass {
    pub fn name(&self) -> &'static str {
        match self {
            Pass::World(_) => "world",
            Pass::Glow => "glow",
            Pass::Overlay => "overlay",
        }
    }
}

/// Renderer seen by layers for the duration of one frame.
pub trait Canvas {
    fn bind(&mut self, pass: &Pass) -> Result<(), RenderError>;
    fn unbind(&mut self, pass: &Pass);

    /// Draw `text` with its top-left corner at `pos`. `None` selects the
    /// built-in font.
    fn draw_text(
        &mut self,
        font: Option<&str>,
        text: &str,
        pos: Vector2,
        size: f32,
        color: Color,
    ) -> Result<(), RenderError>;

    /// Draw the `source` pixels of `texture` into `dest`, rotated by
    /// `rotation` degrees around the centre of `dest`. `dest.x`/`dest.y` is
    /// that centre.
    fn draw_sprite(
        &mut self,
        texture: &str,
        source: Rectangle,
        dest: Rectangle,
        rotation: f32,
        tint: Color,
    ) -> Result<(), RenderError>;

    /// Connected line segments through `points`.
    fn draw_lines(&mut self, points: &[Vector2], thickness: f32, color: Color);

    /// Framebuffer size in pixels.
    fn screen_size(&self) -> (i32, i32);
}

/// Open pass that unbinds on drop.
pub struct Bound<'a, C: Canvas + ?Sized> {
    canvas: &'a mut C,
    pass: Pass,
}

/// Bind `pass` on `canvas` and guard it.
pub fn bind<C: Canvas + ?Sized>(canvas: &mut C, pass: Pass) -> Result<Bound<'_, C>, RenderError> {
    canvas.bind(&pass)?;
    Ok(Bound { canvas, pass })
}

impl<C: Canvas + ?Sized> Deref for Bound<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.canvas
    }
}

impl<C: Canvas + ?Sized> DerefMut for Bound<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.canvas
    }
}

impl<C: Canvas + ?Sized> Drop for Bound<'_, C> {
    fn drop(&mut self) {
        self.canvas.unbind(&self.pass);
    }
}

/// Size of a loaded texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    pub width: i32,
    pub height: i32,
}

/// Loads GPU assets under string keys the canvas resolves later.
pub trait AssetLoader {
    /// Load (or replace) the texture `key`.
    fn load_texture(&mut self, key: &str, path: &Path) -> Result<TextureInfo, AssetError>;

    /// Load (or replace) the font `key` rasterized at `size` pixels.
    fn load_font(&mut self, key: &str, path: &Path, size: i32) -> Result<(), AssetError>;

    /// Read a text asset such as a map, a spritesheet or a script.
    fn read_text(&mut self, path: &Path) -> Result<String, AssetError> {
        fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{DrawOp, RecordingCanvas};

    fn draw_failing(canvas: &mut RecordingCanvas) -> Result<(), RenderError> {
        let mut world = bind(canvas, Pass::World(viewport()))?;
        let mut glow = bind(&mut *world, Pass::Glow)?;
        let rect = Rectangle::new(0.0, 0.0, 1.0, 1.0);
        let white = Color {
            r: 255,
            g: 255,
            b: 255,
            a: 255,
        };
        glow.draw_sprite("missing", rect, rect, 0.0, white)?;
        Ok(())
    }

    #[test]
    fn test_guards_unbind_on_error() {
        let mut canvas = RecordingCanvas::new(600, 600);
        canvas.fail_texture("missing");
        assert!(draw_failing(&mut canvas).is_err());
        assert_eq!(
            canvas.ops(),
            [
                DrawOp::Bind("world"),
                DrawOp::Bind("glow"),
                DrawOp::Unbind("glow"),
                DrawOp::Unbind("world"),
            ]
        );
    }

    fn viewport() -> Viewport {
        Viewport::new(WorldBounds::new(-10.0, -10.0, 10.0, 10.0), 600, 600)
    }

    #[test]
    fn test_screen_to_world_corners() {
        let vp = viewport();
        let top_left = vp.screen_to_world(0.0, 0.0);
        assert_eq!((top_left.x, top_left.y), (-10.0, 10.0));
        let bottom_right = vp.screen_to_world(600.0, 600.0);
        assert_eq!((bottom_right.x, bottom_right.y), (10.0, -10.0));
        let centre = vp.screen_to_world(300.0, 300.0);
        assert_eq!((centre.x, centre.y), (0.0, 0.0));
    }

    #[test]
    fn test_pan_moves_both_corners() {
        let mut bounds = WorldBounds::new(-10.0, -10.0, 10.0, 10.0);
        bounds.pan(0.5, -0.5);
        assert_eq!(bounds, WorldBounds::new(-9.5, -10.5, 10.5, 9.5));
        assert_eq!(bounds.width(), 20.0);
    }

    #[test]
    fn test_camera_centres_world() {
        let mut vp = viewport();
        vp.world.pan(2.0, 4.0);
        let camera = vp.camera();
        assert_eq!(camera.zoom, 30.0);
        assert_eq!((camera.target.x, camera.target.y), (2.0, -4.0));
        assert_eq!((camera.offset.x, camera.offset.y), (300.0, 300.0));
    }
}
