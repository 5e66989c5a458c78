//! Layer stack integration tests: ordering of render, update, input, reset
//! and dispose across stacked layers.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use raylib::prelude::KeyboardKey;

use twodee::error::{AssetError, LayerError, RenderError};
use twodee::events::bus::EventBus;
use twodee::events::game::{GameEvent, GameEventType};
use twodee::events::input::InputEvent;
use twodee::headless::{MemoryAssets, RecordingCanvas};
use twodee::layers::{Layer, LayerContext, LayerStack};
use twodee::render::{AssetLoader, Canvas};
use twodee::resources::context::SharedState;

type Log = Rc<RefCell<Vec<String>>>;

#[derive(Default)]
struct Probe {
    name: &'static str,
    log: Log,
    consume: bool,
    fail_render: bool,
    fail_reset: bool,
}

impl Probe {
    fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: log.clone(),
            ..Default::default()
        }
    }

    fn record(&self, what: &str) {
        self.log.borrow_mut().push(format!("{}:{}", what, self.name));
    }
}

impl Layer for Probe {
    fn name(&self) -> &str {
        self.name
    }

    fn render(&mut self, _canvas: &mut dyn Canvas, _state: &SharedState) -> Result<(), RenderError> {
        self.record("render");
        if self.fail_render {
            return Err(RenderError::MissingTexture(self.name.to_string()));
        }
        Ok(())
    }

    fn update(&mut self, _elapsed: Duration, _ctx: &mut LayerContext) {
        self.record("update");
    }

    fn handle_event(&mut self, _event: &InputEvent, ctx: &mut LayerContext) -> bool {
        self.record("event");
        if self.consume {
            ctx.events.enqueue(GameEvent::MenuClick);
        }
        self.consume
    }

    fn reset(&mut self, _ctx: &mut LayerContext, _assets: &mut dyn AssetLoader) -> Result<(), LayerError> {
        self.record("reset");
        if self.fail_reset {
            return Err(LayerError::Asset(AssetError::Texture {
                key: self.name.to_string(),
                path: PathBuf::from("missing.png"),
                reason: "not found".to_string(),
            }));
        }
        Ok(())
    }

    fn dispose(&mut self) {
        self.record("dispose");
    }
}

fn stack(log: &Log, layers: Vec<Probe>) -> LayerStack {
    let mut stack = LayerStack::new();
    for layer in layers {
        stack.push(Box::new(layer));
    }
    log.borrow_mut().clear();
    stack
}

fn entries(log: &Log, prefix: &str) -> Vec<String> {
    log.borrow().iter().filter(|e| e.starts_with(prefix)).cloned().collect()
}

#[test]
fn render_walks_bottom_up() {
    let log = Log::default();
    let mut layers = stack(&log, vec![Probe::new("a", &log), Probe::new("b", &log), Probe::new("c", &log)]);
    let mut canvas = RecordingCanvas::new(100, 100);
    layers.render(&mut canvas, &SharedState::default()).unwrap();
    assert_eq!(entries(&log, "render"), vec!["render:a", "render:b", "render:c"]);
    assert_eq!(layers.names(), vec!["a", "b", "c"]);
}

#[test]
fn render_stops_at_first_failure() {
    let log = Log::default();
    let failing = Probe {
        fail_render: true,
        ..Probe::new("b", &log)
    };
    let mut layers = stack(&log, vec![Probe::new("a", &log), failing, Probe::new("c", &log)]);
    let mut canvas = RecordingCanvas::new(100, 100);
    let err = layers.render(&mut canvas, &SharedState::default()).unwrap_err();
    assert_eq!(err, RenderError::MissingTexture("b".to_string()));
    assert_eq!(entries(&log, "render"), vec!["render:a", "render:b"]);
}

#[test]
fn input_walks_top_down_until_consumed() {
    let log = Log::default();
    let consumer = Probe {
        consume: true,
        ..Probe::new("b", &log)
    };
    let mut layers = stack(&log, vec![Probe::new("a", &log), consumer, Probe::new("c", &log)]);
    let mut state = SharedState::default();
    let bus = EventBus::new();
    let mut ctx = LayerContext {
        state: &mut state,
        events: &bus,
    };

    assert!(layers.handle_event(&InputEvent::key_press(KeyboardKey::KEY_SPACE), &mut ctx));
    assert_eq!(entries(&log, "event"), vec!["event:c", "event:b"]);
    assert_eq!(bus.pending(), 1);
}

#[test]
fn unconsumed_input_reaches_every_layer() {
    let log = Log::default();
    let mut layers = stack(&log, vec![Probe::new("a", &log), Probe::new("b", &log)]);
    let mut state = SharedState::default();
    let bus = EventBus::new();
    let mut ctx = LayerContext {
        state: &mut state,
        events: &bus,
    };
    assert!(!layers.handle_event(&InputEvent::mouse_move(1.0, 2.0), &mut ctx));
    assert_eq!(entries(&log, "event"), vec!["event:b", "event:a"]);
}

#[test]
fn update_reaches_every_layer() {
    let log = Log::default();
    let consumer = Probe {
        consume: true,
        ..Probe::new("top", &log)
    };
    let mut layers = stack(&log, vec![Probe::new("bottom", &log), consumer]);
    let mut state = SharedState::default();
    let bus = EventBus::new();
    let mut ctx = LayerContext {
        state: &mut state,
        events: &bus,
    };
    layers.update(Duration::from_millis(16), &mut ctx);
    assert_eq!(entries(&log, "update"), vec!["update:bottom", "update:top"]);
}

#[test]
fn reset_runs_in_push_order_and_stops_on_error() {
    let log = Log::default();
    let failing = Probe {
        fail_reset: true,
        ..Probe::new("b", &log)
    };
    let mut layers = stack(&log, vec![Probe::new("a", &log), failing, Probe::new("c", &log)]);
    let mut state = SharedState::default();
    let bus = EventBus::new();
    let mut ctx = LayerContext {
        state: &mut state,
        events: &bus,
    };
    let mut assets = MemoryAssets::new();
    assert!(matches!(
        layers.reset(&mut ctx, &mut assets),
        Err(LayerError::Asset(AssetError::Texture { .. }))
    ));
    assert_eq!(entries(&log, "reset"), vec!["reset:a", "reset:b"]);
}

#[test]
fn dispose_runs_top_first_once() {
    let log = Log::default();
    let mut layers = stack(&log, vec![Probe::new("a", &log), Probe::new("b", &log)]);
    layers.dispose();
    layers.dispose();
    assert_eq!(entries(&log, "dispose"), vec!["dispose:b", "dispose:a"]);
    assert!(layers.is_empty());
}

#[test]
fn dropping_the_stack_disposes_layers() {
    let log = Log::default();
    {
        let _layers = stack(&log, vec![Probe::new("a", &log), Probe::new("b", &log)]);
    }
    assert_eq!(entries(&log, "dispose"), vec!["dispose:b", "dispose:a"]);
}

#[test]
fn events_raised_by_layers_reach_observers_on_poll() {
    let log = Log::default();
    let consumer = Probe {
        consume: true,
        ..Probe::new("menu", &log)
    };
    let mut layers = stack(&log, vec![consumer]);
    let mut state = SharedState::default();
    let mut bus = EventBus::new();
    let clicks = Rc::new(RefCell::new(0));
    let counter = clicks.clone();
    bus.add_observer(GameEventType::MenuClick, move |_: &GameEvent| *counter.borrow_mut() += 1);

    {
        let mut ctx = LayerContext {
            state: &mut state,
            events: &bus,
        };
        layers.handle_event(&InputEvent::key_press(KeyboardKey::KEY_DOWN), &mut ctx);
    }
    assert_eq!(*clicks.borrow(), 0);
    bus.poll();
    assert_eq!(*clicks.borrow(), 1);
}
