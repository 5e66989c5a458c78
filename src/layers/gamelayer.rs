//! The playfield: a tiled level, a ring of rotating numbered tiles and an
//! animated sprite that follows the pointer.
//!
//! World state lives in a bevy_ecs [`World`] advanced by a [`Schedule`] once
//! per fixed step. The level, the spritesheet and the Lua script are loaded on
//! every [`reset`](Layer::reset), since display changes invalidate textures.

use std::path::{Path, PathBuf};
use std::time::Duration;

use bevy_ecs::prelude::*;
use log::{debug, warn};
use raylib::prelude::{Color, KeyboardKey, Rectangle, Vector2};

use super::{Layer, LayerContext};
use crate::components::animation::Animation;
use crate::components::mapposition::MapPosition;
use crate::components::markers::{ObjectTile, Player};
use crate::components::rotation::Rotation;
use crate::components::sprite::{Sprite, numbered_square};
use crate::components::zindex::ZIndex;
use crate::error::{AssetError, LayerError, RenderError};
use crate::events::game::GameEvent;
use crate::events::input::{ButtonState, InputEvent};
use crate::render::{AssetLoader, Canvas, Pass, TextureInfo, Viewport, WorldBounds, bind};
use crate::resources::context::SharedState;
use crate::resources::objectcount::ObjectCount;
use crate::resources::script::{ScriptEngine, ScriptSubject};
use crate::resources::spritesheet::Spritesheet;
use crate::resources::tilemap::{LevelFiles, Tilemap};
use crate::resources::worldtime::WorldTime;
use crate::systems::animation::animation;
use crate::systems::objects::sync_objects;

pub const LEVEL_TEXTURE: &str = "level";
pub const SHEET_TEXTURE: &str = "spritesheet";

/// Pixels of a spritesheet or tileset per world unit.
pub const PX_PER_UNIT: f32 = 32.0;
/// World units the view moves per arrow key press.
pub const PAN_STEP: f32 = 0.2;
/// Script event raised by `Space`.
pub const SCRIPT_EVENT: &str = "foo";

const PLAYER_FRAMES: usize = 16;
const PLAYER_FPS: f32 = 10.0;
const OUTLINE_THICKNESS: f32 = 0.5;
const WHITE: Color = Color {
    r: 255,
    g: 255,
    b: 255,
    a: 255,
};

/// Asset locations read on reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamePaths {
    /// Level directory, see [`LevelFiles`].
    pub level_dir: PathBuf,
    /// TexturePacker JSON; its image is resolved next to it.
    pub spritesheet: PathBuf,
    pub script: PathBuf,
}

impl GamePaths {
    pub fn in_dir(assets: &Path) -> Self {
        Self {
            level_dir: assets.join("levels").join("level2"),
            spritesheet: assets.join("textures").join("spritesheet.json"),
            script: assets.join("scripts").join("main.lua"),
        }
    }
}

struct Level {
    map: Tilemap,
    texture: TextureInfo,
}

struct DrawItem {
    z: ZIndex,
    x: f32,
    y: f32,
    degrees: f32,
    frame: String,
}

pub struct GameLayer {
    world: World,
    schedule: Schedule,
    player: Entity,
    bounds: WorldBounds,
    screen: (i32, i32),
    paths: GamePaths,
    level: Option<Level>,
    sheet: Spritesheet,
    script: Option<ScriptEngine>,
}

impl GameLayer {
    /// Create the world with its player. Nothing is loaded until reset.
    pub fn new(paths: GamePaths, screen_w: i32, screen_h: i32) -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(ObjectCount::default());
        let frames = (1..=PLAYER_FRAMES).map(numbered_square).collect();
        let player = world
            .spawn((
                Player,
                MapPosition::new(0.0, 0.0),
                Sprite::new(numbered_square(1)),
                Animation::new(frames, PLAYER_FPS),
                ZIndex(1),
            ))
            .id();

        let mut schedule = Schedule::default();
        schedule.add_systems((sync_objects, animation));

        Self {
            world,
            schedule,
            player,
            bounds: WorldBounds::new(-10.0, -10.0, 10.0, 10.0),
            screen: (screen_w, screen_h),
            paths,
            level: None,
            sheet: Spritesheet::default(),
            script: None,
        }
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    pub fn player_position(&self) -> MapPosition {
        self.world
            .get::<MapPosition>(self.player)
            .copied()
            .unwrap_or_default()
    }

    /// Index of the player's visible animation frame.
    pub fn player_frame(&self) -> usize {
        self.world
            .get::<Animation>(self.player)
            .map(|a| a.frame_index)
            .unwrap_or(0)
    }

    pub fn object_count(&mut self) -> usize {
        let mut tiles = self.world.query_filtered::<(), With<ObjectTile>>();
        tiles.iter(&self.world).count()
    }

    pub fn world_time(&self) -> WorldTime {
        *self.world.resource::<WorldTime>()
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.bounds, self.screen.0, self.screen.1)
    }

    fn trigger_script(&self) {
        let Some(script) = self.script.as_ref() else {
            return;
        };
        let pos = self.player_position();
        let subject = ScriptSubject {
            x: pos.x,
            y: pos.y,
            frame: self.player_frame(),
        };
        match script.trigger_event(SCRIPT_EVENT, &subject) {
            Ok(n) => debug!("script event '{}' ran {} handler(s)", SCRIPT_EVENT, n),
            Err(e) => warn!("Problem triggering event: {}", e),
        }
    }

    fn load_level(&self, assets: &mut dyn AssetLoader) -> Result<Level, AssetError> {
        let files = LevelFiles::new(&self.paths.level_dir);
        let json = assets.read_text(&files.json)?;
        let map = Tilemap::from_json(&json).map_err(|source| AssetError::Parse {
            path: files.json.clone(),
            source,
        })?;
        let texture = assets.load_texture(LEVEL_TEXTURE, &files.texture)?;
        Ok(Level { map, texture })
    }

    fn load_spritesheet(&self, assets: &mut dyn AssetLoader) -> Result<Spritesheet, AssetError> {
        let path = &self.paths.spritesheet;
        let json = assets.read_text(path)?;
        let sheet = Spritesheet::from_json(&json, PX_PER_UNIT).map_err(|source| AssetError::Parse {
            path: path.clone(),
            source,
        })?;
        let image = path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&sheet.texture_path);
        assets.load_texture(SHEET_TEXTURE, &image)?;
        Ok(sheet)
    }

    fn load_script(&self, assets: &mut dyn AssetLoader) -> Result<ScriptEngine, LayerError> {
        let source = assets.read_text(&self.paths.script)?;
        let mut engine = ScriptEngine::new()?;
        let name = self.paths.script.to_string_lossy();
        engine.load_script(&name, &source)?;
        Ok(engine)
    }

    fn draw_level(&self, canvas: &mut dyn Canvas) -> Result<(), RenderError> {
        let Some(level) = self.level.as_ref() else {
            return Ok(());
        };
        let px = level.map.tile_size as f32;
        let unit = px / PX_PER_UNIT;
        for layer in level.map.layers.iter() {
            for tile in layer.positions.iter() {
                let (sx, sy) = level.map.tile_offset(tile.id, level.texture.width);
                let centre = Viewport::to_canvas(
                    tile.x as f32 * unit + unit * 0.5,
                    -(tile.y as f32 * unit + unit * 0.5),
                );
                canvas.draw_sprite(
                    LEVEL_TEXTURE,
                    Rectangle::new(sx, sy, px, px),
                    Rectangle::new(centre.x, centre.y, unit, unit),
                    0.0,
                    WHITE,
                )?;
            }
        }
        Ok(())
    }

    fn draw_frame(
        &self,
        canvas: &mut dyn Canvas,
        name: &str,
        x: f32,
        y: f32,
        degrees: f32,
    ) -> Result<(), RenderError> {
        let frame = self
            .sheet
            .frame(name)
            .ok_or_else(|| RenderError::MissingFrame(name.to_string()))?;
        let centre = Viewport::to_canvas(x, y);
        canvas.draw_sprite(
            SHEET_TEXTURE,
            Rectangle::new(frame.x, frame.y, frame.w, frame.h),
            Rectangle::new(centre.x, centre.y, frame.width, frame.height),
            // Canvas space is mirrored, so counter-clockwise world rotation
            // is clockwise there.
            -degrees,
            WHITE,
        )
    }

    fn sprites(&mut self) -> (Vec<DrawItem>, Option<DrawItem>) {
        let mut query = self
            .world
            .query::<(&MapPosition, Option<&Rotation>, &Sprite, &ZIndex, Has<Player>)>();
        let mut items = Vec::new();
        let mut player = None;
        for (pos, rot, sprite, z, is_player) in query.iter(&self.world) {
            let item = DrawItem {
                z: *z,
                x: pos.x,
                y: pos.y,
                degrees: rot.map(|r| r.degrees).unwrap_or(0.0),
                frame: sprite.frame.clone(),
            };
            if is_player {
                player = Some(item);
            } else {
                items.push(item);
            }
        }
        items.sort_by_key(|item| item.z);
        (items, player)
    }
}

/// Closed quadrilateral drawn over the level, in world units.
pub fn outline() -> Vec<Vector2> {
    let (scale, dx, dy) = (5.0, -2.0, 2.0);
    let corners = [(-1.0, -1.0), (1.0, -0.8), (1.0, 1.0), (-1.0, 1.0)];
    let mut points: Vec<Vector2> = corners
        .iter()
        .map(|&(x, y)| Viewport::to_canvas(x * scale + dx, y * scale + dy))
        .collect();
    if let Some(&first) = points.first() {
        points.push(first);
    }
    points
}

impl Layer for GameLayer {
    fn name(&self) -> &str {
        "game"
    }

    fn render(&mut self, canvas: &mut dyn Canvas, _state: &SharedState) -> Result<(), RenderError> {
        self.screen = canvas.screen_size();
        let viewport = self.viewport();
        let (tiles, player) = self.sprites();

        let mut world = bind(canvas, Pass::World(viewport))?;
        self.draw_level(&mut *world)?;

        if let Some(p) = player.as_ref() {
            let mut glow = bind(&mut *world, Pass::Glow)?;
            self.draw_frame(&mut *glow, &p.frame, p.x, p.y, p.degrees)?;
        }

        for item in tiles.iter() {
            self.draw_frame(&mut *world, &item.frame, item.x, item.y, item.degrees)?;
        }
        if let Some(p) = player.as_ref() {
            self.draw_frame(&mut *world, "numbered_squares_tall_07", p.x - 1.0, p.y - 2.0, 0.0)?;
            self.draw_frame(&mut *world, "numbered_squares_wide_14", 0.0, 0.0, 0.0)?;
            self.draw_frame(&mut *world, &p.frame, p.x, p.y, p.degrees)?;
        }

        world.draw_lines(&outline(), OUTLINE_THICKNESS, WHITE);
        Ok(())
    }

    fn update(&mut self, elapsed: Duration, ctx: &mut LayerContext) {
        self.world.resource_mut::<ObjectCount>().0 = ctx.state.objects();
        self.world.resource_mut::<WorldTime>().advance(elapsed.as_secs_f32());
        self.schedule.run(&mut self.world);
    }

    fn handle_event(&mut self, event: &InputEvent, ctx: &mut LayerContext) -> bool {
        match *event {
            InputEvent::MouseMove { x, y } => {
                let target = self.viewport().screen_to_world(x, y);
                if let Some(mut pos) = self.world.get_mut::<MapPosition>(self.player) {
                    pos.x = target.x;
                    pos.y = target.y;
                }
            }
            InputEvent::Key {
                state: ButtonState::Press,
                code,
            } => match code {
                KeyboardKey::KEY_LEFT => self.bounds.pan(-PAN_STEP, 0.0),
                KeyboardKey::KEY_RIGHT => self.bounds.pan(PAN_STEP, 0.0),
                KeyboardKey::KEY_UP => self.bounds.pan(0.0, PAN_STEP),
                KeyboardKey::KEY_DOWN => self.bounds.pan(0.0, -PAN_STEP),
                KeyboardKey::KEY_M => {
                    let event = if ctx.state.music_paused {
                        GameEvent::ResumeMusic
                    } else {
                        GameEvent::PauseMusic
                    };
                    ctx.state.music_paused = !ctx.state.music_paused;
                    ctx.events.enqueue(event);
                }
                KeyboardKey::KEY_SPACE => self.trigger_script(),
                _ => {}
            },
            _ => {}
        }
        false
    }

    fn reset(&mut self, ctx: &mut LayerContext, assets: &mut dyn AssetLoader) -> Result<(), LayerError> {
        self.level = Some(self.load_level(assets)?);
        self.sheet = self.load_spritesheet(assets)?;
        self.script = Some(self.load_script(assets)?);
        debug!("game layer loaded {} spritesheet frames", self.sheet.len());
        ctx.events.enqueue(GameEvent::BgMusic);
        ctx.state.music_paused = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_is_closed() {
        let points = outline();
        assert_eq!(points.len(), 5);
        assert_eq!((points[0].x, points[0].y), (points[4].x, points[4].y));
        assert_eq!((points[0].x, points[0].y), (-7.0, 3.0));
    }

    #[test]
    fn test_update_tracks_object_count() {
        let mut layer = GameLayer::new(GamePaths::in_dir(Path::new("assets")), 600, 600);
        let mut state = SharedState::new(128);
        let bus = crate::events::bus::EventBus::new();
        let mut ctx = LayerContext {
            state: &mut state,
            events: &bus,
        };
        layer.update(Duration::from_millis(100), &mut ctx);
        assert_eq!(layer.object_count(), 128);
        assert!((layer.world_time().elapsed - 0.1).abs() < 1e-6);
        ctx.state.object_count.set(64);
        layer.update(Duration::from_millis(100), &mut ctx);
        assert_eq!(layer.object_count(), 64);
    }
}
