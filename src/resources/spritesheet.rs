//! TexturePacker spritesheet description.
//!
//! Parses the "JSON (Array)" export of TexturePacker into named frames. Only
//! the frame rectangle and the image name are used; trimming and rotation
//! metadata is accepted and ignored.

use rustc_hash::FxHashMap;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RawRect {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

#[derive(Debug, Deserialize)]
struct RawFrame {
    filename: String,
    frame: RawRect,
}

#[derive(Debug, Deserialize)]
struct RawMeta {
    image: String,
}

#[derive(Debug, Deserialize)]
struct RawSheet {
    frames: Vec<RawFrame>,
    meta: RawMeta,
}

/// One named region of the sheet texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetFrame {
    /// Source rectangle in texture pixels.
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Size in world units.
    pub width: f32,
    pub height: f32,
}

/// Named frames plus the image file they come from.
#[derive(Debug, Clone, Default)]
pub struct Spritesheet {
    /// Image file name, relative to the JSON file.
    pub texture_path: String,
    frames: FxHashMap<String, SheetFrame>,
}

impl Spritesheet {
    /// Parse a TexturePacker JSON array export. `px_per_unit` converts pixel
    /// sizes to world units.
    pub fn from_json(json: &str, px_per_unit: f32) -> Result<Self, serde_json::Error> {
        let raw: RawSheet = serde_json::from_str(json)?;
        let frames = raw
            .frames
            .into_iter()
            .map(|f| {
                let r = f.frame;
                let frame = SheetFrame {
                    x: r.x,
                    y: r.y,
                    w: r.w,
                    h: r.h,
                    width: r.w / px_per_unit,
                    height: r.h / px_per_unit,
                };
                (strip_extension(&f.filename).to_string(), frame)
            })
            .collect();
        Ok(Self {
            texture_path: raw.meta.image,
            frames,
        })
    }

    /// Frame by name, with or without its image extension.
    pub fn frame(&self, name: &str) -> Option<&SheetFrame> {
        self.frames.get(strip_extension(name))
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = r#"{
        "frames": [
            {
                "filename": "numbered_squares_01.png",
                "frame": {"x": 0, "y": 0, "w": 32, "h": 32},
                "rotated": false,
                "trimmed": false,
                "spriteSourceSize": {"x": 0, "y": 0, "w": 32, "h": 32},
                "sourceSize": {"w": 32, "h": 32}
            },
            {
                "filename": "numbered_squares_wide_14.png",
                "frame": {"x": 32, "y": 0, "w": 64, "h": 32}
            }
        ],
        "meta": {"image": "spritesheet.png", "size": {"w": 96, "h": 32}}
    }"#;

    #[test]
    fn test_parse_frames() {
        let sheet = Spritesheet::from_json(SHEET, 32.0).unwrap();
        assert_eq!(sheet.texture_path, "spritesheet.png");
        assert_eq!(sheet.len(), 2);
        let wide = sheet.frame("numbered_squares_wide_14").unwrap();
        assert_eq!((wide.x, wide.w), (32.0, 64.0));
        assert_eq!((wide.width, wide.height), (2.0, 1.0));
        assert!(sheet.frame("numbered_squares_01.png").is_some());
        assert!(sheet.frame("numbered_squares_02").is_none());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Spritesheet::from_json("{\"frames\": 3}", 32.0).is_err());
    }
}
