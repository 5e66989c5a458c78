//! The object driven by the game loop.
//!
//! [`Application`] owns the layer stack, the shared state and the event bus.
//! It builds the demo's layers, lends the state and the bus to them each
//! frame, and wires the audio system onto the bus.

use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use log::{debug, info};

use crate::error::{AppError, RenderError};
use crate::events::audio::{AudioCmd, AudioMessage};
use crate::events::bus::{EventBus, ObserverId};
use crate::events::game::{GameEvent, GameEventType};
use crate::events::input::InputEvent;
use crate::gameloop::Platform;
use crate::layers::debuglayer::DebugLayer;
use crate::layers::gamelayer::{GameLayer, GamePaths};
use crate::layers::menulayer::MenuLayer;
use crate::layers::{LayerContext, LayerStack};
use crate::render::{AssetLoader, Canvas};
use crate::resources::context::SharedState;
use crate::resources::gameconfig::GameConfig;
use crate::systems::audio::{AudioSystem, AudioTracks};

/// Font used by the menu and the debug overlay, under the assets directory.
pub const FONT_PATH: &str = "fonts/slkscr.ttf";

pub struct Application {
    layers: LayerStack,
    state: SharedState,
    events: EventBus<GameEvent>,
    audio: Option<AudioSystem>,
    action_observer: Option<ObserverId>,
}

impl Application {
    /// Build the demo: game, debug overlay and menu layers, bottom to top.
    pub fn new(config: &GameConfig, assets: &mut dyn AssetLoader) -> Result<Self, AppError> {
        let mut state = SharedState::new(config.objects);
        state.fullscreen = config.fullscreen;

        let font = config.asset(FONT_PATH);
        let (w, h) = config.window_size();
        let mut layers = LayerStack::new();
        layers.push(Box::new(GameLayer::new(
            GamePaths::in_dir(&config.assets_dir),
            w as i32,
            h as i32,
        )));
        layers.push(Box::new(DebugLayer::new(font.clone())));
        layers.push(Box::new(MenuLayer::new(&state, font)));

        Self::from_parts(layers, state, assets)
    }

    /// Wrap an existing stack and reset every layer once.
    pub fn from_parts(
        layers: LayerStack,
        state: SharedState,
        assets: &mut dyn AssetLoader,
    ) -> Result<Self, AppError> {
        let mut events = EventBus::new();
        let action_observer = events.add_observer(GameEventType::MenuAction, |event| {
            if let GameEvent::MenuAction(data) = event {
                info!("Selected menu entry {:?}", data);
            }
        });
        let mut app = Self {
            layers,
            state,
            events,
            audio: None,
            action_observer: Some(action_observer),
        };
        app.reset_layers(assets)?;
        Ok(app)
    }

    fn reset_layers(&mut self, assets: &mut dyn AssetLoader) -> Result<(), AppError> {
        let mut ctx = LayerContext {
            state: &mut self.state,
            events: &self.events,
        };
        self.layers.reset(&mut ctx, assets)?;
        Ok(())
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SharedState {
        &mut self.state
    }

    pub fn events(&self) -> &EventBus<GameEvent> {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus<GameEvent> {
        &mut self.events
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    pub fn should_exit(&self) -> bool {
        self.state.exit
    }

    pub fn update(&mut self, step: Duration) {
        let mut ctx = LayerContext {
            state: &mut self.state,
            events: &self.events,
        };
        self.layers.update(step, &mut ctx);
    }

    pub fn render(&mut self, canvas: &mut dyn Canvas) -> Result<(), RenderError> {
        self.layers.render(canvas, &self.state)
    }

    /// Pass `event` down the responder chain.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        let mut ctx = LayerContext {
            state: &mut self.state,
            events: &self.events,
        };
        self.layers.handle_event(event, &mut ctx)
    }

    /// Deliver pending bus events.
    pub fn poll_events(&mut self) -> usize {
        self.events.poll()
    }

    /// Switch the platform's display mode if the shared flag asks for it,
    /// then reset every layer. Returns whether a switch happened.
    pub fn apply_display_settings(&mut self, platform: &mut dyn Platform) -> Result<bool, AppError> {
        if self.state.fullscreen == platform.is_fullscreen() {
            return Ok(false);
        }
        info!("switching fullscreen to {}", self.state.fullscreen);
        platform.set_fullscreen(self.state.fullscreen);
        self.reset_layers(platform.assets())?;
        Ok(true)
    }

    /// Register the audio observers on the bus.
    pub fn attach_audio(&mut self, tx_cmd: Sender<AudioCmd>, rx_msg: Receiver<AudioMessage>, tracks: &AudioTracks) {
        if let Some(mut previous) = self.audio.take() {
            previous.dispose(&mut self.events);
        }
        self.audio = Some(AudioSystem::register(tx_cmd, rx_msg, tracks, &mut self.events));
    }

    /// Log audio thread reports. Returns how many were drained.
    pub fn poll_audio(&mut self) -> usize {
        self.audio.as_ref().map(AudioSystem::poll_messages).unwrap_or(0)
    }

    /// Release layers and observers. Safe to call more than once.
    pub fn dispose(&mut self) {
        if let Some(mut audio) = self.audio.take() {
            audio.dispose(&mut self.events);
        }
        if let Some(id) = self.action_observer.take() {
            self.events.remove_observer(GameEventType::MenuAction, id);
        }
        self.layers.dispose();
        debug!("application disposed");
    }
}
