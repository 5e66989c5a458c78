//! Fixed-timestep game loop.
//!
//! Simulation advances in constant steps decoupled from rendering. Each
//! iteration catches the simulation up to the time measured at the end of
//! the previous iteration, renders exactly once, then processes input and
//! deferred events:
//!
//! 1. while `updated_to <= now`: update by `step`, `updated_to += step`
//! 2. render and present
//! 3. poll platform input, poll the event bus, dispatch input to the layers,
//!    apply display changes, drain audio messages
//! 4. `now = clock.now()`
//!
//! The loop ends when the platform asks to close or the shared exit flag is
//! set.

use std::time::{Duration, Instant};

use log::{debug, info, trace, warn};

use crate::app::Application;
use crate::error::{AppError, RenderError};
use crate::events::input::InputEvent;
use crate::render::{AssetLoader, Canvas};

/// 60 updates per second.
pub const STEP_60HZ: Duration = Duration::from_nanos(1_000_000_000 / 60);
/// 10 updates per second.
pub const STEP_10HZ: Duration = Duration::from_nanos(1_000_000_000 / 10);
/// Shortest step the loop accepts; a zero step would never catch up.
pub const MIN_STEP: Duration = Duration::from_micros(100);

/// Source of monotonic time.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Window, input and asset access the loop needs from the host.
pub trait Platform {
    /// The user asked to close the window.
    fn should_close(&self) -> bool;

    /// Run `draw` against a canvas for one frame and present it.
    fn draw_frame(
        &mut self,
        draw: &mut dyn FnMut(&mut dyn Canvas) -> Result<(), RenderError>,
    ) -> Result<(), RenderError>;

    /// Append input gathered since the last call. Never blocks.
    fn poll_input(&mut self, out: &mut Vec<InputEvent>);

    fn is_fullscreen(&self) -> bool;

    fn set_fullscreen(&mut self, fullscreen: bool);

    /// Loader for assets tied to the current display.
    fn assets(&mut self) -> &mut dyn AssetLoader;
}

/// What one iteration did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Fixed steps simulated before rendering.
    pub updates: u32,
    /// Input events dispatched to the layers.
    pub events: usize,
    /// Bus events delivered to observers.
    pub delivered: usize,
}

pub struct GameLoop<C: Clock> {
    clock: C,
    step: Duration,
    now: Instant,
    updated_to: Instant,
    inbox: Vec<InputEvent>,
}

impl<C: Clock> GameLoop<C> {
    /// Create a loop advancing by `step`, raised to [`MIN_STEP`] if shorter.
    pub fn new(clock: C, step: Duration) -> Self {
        if step < MIN_STEP {
            warn!("step {:?} is too short, using {:?}", step, MIN_STEP);
        }
        let step = step.max(MIN_STEP);
        let now = clock.now();
        Self {
            clock,
            step,
            now,
            updated_to: now,
            inbox: Vec::new(),
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Run one iteration.
    pub fn iterate(
        &mut self,
        app: &mut Application,
        platform: &mut dyn Platform,
    ) -> Result<FrameStats, AppError> {
        let mut updates = 0;
        while self.updated_to <= self.now {
            app.update(self.step);
            self.updated_to += self.step;
            updates += 1;
        }

        platform.draw_frame(&mut |canvas: &mut dyn Canvas| app.render(canvas))?;

        self.inbox.clear();
        platform.poll_input(&mut self.inbox);
        let delivered = app.poll_events();
        for event in self.inbox.iter() {
            let consumed = app.handle_event(event);
            trace!("input {:?} consumed={}", event, consumed);
        }
        app.apply_display_settings(platform)?;
        app.poll_audio();

        self.now = self.clock.now();
        Ok(FrameStats {
            updates,
            events: self.inbox.len(),
            delivered,
        })
    }

    /// Iterate until the platform closes or the application asks to exit.
    /// Returns the number of iterations.
    pub fn run(&mut self, app: &mut Application, platform: &mut dyn Platform) -> Result<u64, AppError> {
        info!("game loop started, step={:?}", self.step);
        let mut iterations = 0;
        while !platform.should_close() && !app.should_exit() {
            let stats = self.iterate(app, platform)?;
            iterations += 1;
            if stats.updates > 1 {
                debug!("frame {} caught up {} steps", iterations, stats.updates);
            }
        }
        info!("game loop finished after {} iterations", iterations);
        Ok(iterations)
    }
}
