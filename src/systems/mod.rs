//! Systems.
//!
//! Submodules overview
//! - [`animation`] – advance frame animations and update sprites
//! - [`audio`] – audio thread and the bus observers that feed it
//! - [`objects`] – keep the rotating tiles in sync with the object count

pub mod animation;
pub mod audio;
pub mod objects;
