//! twodee library.
//!
//! A small 2D application framework: a fixed-timestep [`gameloop`], a stack
//! of [`layers`] acting as a responder chain, a deferred [`events`] bus and a
//! hierarchical [`menu`], plus the demo layers built on top of them.
//!
//! The window, GPU and input sit behind [`gameloop::Platform`] and
//! [`render::Canvas`]; [`backend`] implements them with raylib and
//! [`headless`] without a window.

pub mod app;
pub mod backend;
pub mod components;
pub mod error;
pub mod events;
pub mod gameloop;
pub mod headless;
pub mod layers;
pub mod menu;
pub mod render;
pub mod resources;
pub mod systems;
