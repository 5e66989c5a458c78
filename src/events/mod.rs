//! Event types and the event bus.
//!
//! Submodules:
//! - [`bus`] – typed publish/subscribe queue with deferred delivery
//! - [`game`] – application events delivered through the bus
//! - [`input`] – platform input pushed through the layer responder chain
//! - [`audio`] – commands and messages for the background audio thread
pub mod audio;
pub mod bus;
pub mod game;
pub mod input;
