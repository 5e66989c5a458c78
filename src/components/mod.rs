//! ECS components of the gameplay world.
//!
//! - `animation` – looping frame sequence driving a [`Sprite`](sprite::Sprite)
//! - `mapposition` – world-space position
//! - `markers` – [`Player`](markers::Player) and [`ObjectTile`](markers::ObjectTile) tags
//! - `rotation` – rotation in degrees
//! - `sprite` – spritesheet frame to draw
//! - `zindex` – draw order
pub mod animation;
pub mod mapposition;
pub mod markers;
pub mod rotation;
pub mod sprite;
pub mod zindex;
