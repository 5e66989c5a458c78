//! Layers and the responder chain.
//!
//! A [`LayerStack`] owns layers in push order. Rendering walks the stack
//! bottom-up so later layers draw on top; input walks it top-down and stops
//! at the first layer that consumes the event.

pub mod debuglayer;
pub mod gamelayer;
pub mod menulayer;

use std::time::Duration;

use log::{debug, error};

use crate::error::{LayerError, RenderError};
use crate::events::bus::EventBus;
use crate::events::game::GameEvent;
use crate::events::input::InputEvent;
use crate::render::{AssetLoader, Canvas};
use crate::resources::context::SharedState;

/// What a layer may touch while updating or handling input.
pub struct LayerContext<'a> {
    pub state: &'a mut SharedState,
    /// Events raised here are delivered on the next bus poll.
    pub events: &'a EventBus<GameEvent>,
}

/// One slice of the application.
pub trait Layer {
    fn name(&self) -> &str;

    /// Draw the layer. Errors are fatal to the loop.
    fn render(&mut self, canvas: &mut dyn Canvas, state: &SharedState) -> Result<(), RenderError>;

    /// Advance by one fixed step.
    fn update(&mut self, elapsed: Duration, ctx: &mut LayerContext);

    /// Offer an input event. Return `true` to consume it, which hides it
    /// from every layer below.
    fn handle_event(&mut self, event: &InputEvent, ctx: &mut LayerContext) -> bool;

    /// (Re)create resources tied to the display, such as textures and fonts.
    fn reset(&mut self, _ctx: &mut LayerContext, _assets: &mut dyn AssetLoader) -> Result<(), LayerError> {
        Ok(())
    }

    /// Release whatever the layer holds outside itself.
    fn dispose(&mut self) {}
}

/// Ordered collection of layers. Index 0 is the bottom.
#[derive(Default)]
pub struct LayerStack {
    layers: Vec<Box<dyn Layer>>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `layer` on top of the stack.
    pub fn push(&mut self, layer: Box<dyn Layer>) {
        debug!("push layer '{}' at {}", layer.name(), self.layers.len());
        self.layers.push(layer);
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layer names, bottom first.
    pub fn names(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.name()).collect()
    }

    /// Render every layer bottom-up. Stops at the first failure.
    pub fn render(&mut self, canvas: &mut dyn Canvas, state: &SharedState) -> Result<(), RenderError> {
        for layer in self.layers.iter_mut() {
            layer.render(canvas, state)?;
        }
        Ok(())
    }

    /// Update every layer, bottom-up.
    pub fn update(&mut self, elapsed: Duration, ctx: &mut LayerContext) {
        for layer in self.layers.iter_mut() {
            layer.update(elapsed, ctx);
        }
    }

    /// Offer `event` to each layer from the top until one consumes it.
    pub fn handle_event(&mut self, event: &InputEvent, ctx: &mut LayerContext) -> bool {
        for layer in self.layers.iter_mut().rev() {
            if layer.handle_event(event, ctx) {
                return true;
            }
        }
        false
    }

    /// Reset every layer in push order. The first failure is returned and
    /// the remaining layers are not reset.
    pub fn reset(&mut self, ctx: &mut LayerContext, assets: &mut dyn AssetLoader) -> Result<(), LayerError> {
        for layer in self.layers.iter_mut() {
            if let Err(e) = layer.reset(ctx, assets) {
                error!("reset of layer '{}' failed: {}", layer.name(), e);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Dispose and drop every layer, top first. Calling it again does nothing.
    pub fn dispose(&mut self) {
        while let Some(mut layer) = self.layers.pop() {
            debug!("dispose layer '{}'", layer.name());
            layer.dispose();
        }
    }
}

impl Drop for LayerStack {
    fn drop(&mut self) {
        self.dispose();
    }
}
