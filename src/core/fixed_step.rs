use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use super::fps::FpsCounter;
use crate::traits::clock::ClockSource;
use crate::traits::lifecycle::LifecycleSignal;

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// Loop configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// Simulation rate. A rate of 0 means no ticks ever become due; the
    /// loop still renders.
    pub ticks_per_second: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: 60,
        }
    }
}

/// Lifecycle errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoopError {
    #[error("loop is already running")]
    AlreadyRunning,
}

/// Callbacks the loop drives. The loop never inspects what they do; tick
/// advances simulation state, render produces one frame, and the optional
/// fps hook receives the frame count once per elapsed second.
pub trait LoopHooks {
    /// One discrete simulation update at the fixed rate.
    fn tick(&mut self);

    /// One frame, called exactly once per loop iteration regardless of how
    /// many ticks were drained.
    fn render(&mut self);

    /// Frames rendered over the last full second.
    fn report_fps(&mut self, frames: u32) {
        let _ = frames;
    }
}

/// Shared run/stop handle for a [`FixedStepLoop`].
///
/// Clones share one atomic flag: the host keeps one, the loop thread
/// observes another. Stop is cooperative; the loop finishes its current
/// iteration before returning.
#[derive(Debug, Clone, Default)]
pub struct LoopController {
    running: Arc<AtomicBool>,
}

impl LoopController {
    /// Create a controller in the idle state.
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Mark the loop as running. Fails if it already is; the running loop
    /// is unaffected either way.
    pub fn start(&self) -> Result<(), LoopError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(LoopError::AlreadyRunning);
        }
        Ok(())
    }

    /// Request a stop. The loop's current iteration completes; no new
    /// iteration begins.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Whether the loop is (still) marked running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl LifecycleSignal for LoopController {
    fn request_stop(&self) {
        self.stop();
    }

    fn stop_requested(&self) -> bool {
        !self.is_running()
    }
}

/// Fixed-timestep scheduler: converts elapsed wall time into whole
/// simulation ticks at a fixed rate, decoupled from the render rate.
///
/// Elapsed time accumulates in `unprocessed` (unit: ticks owed). Each
/// iteration drains every whole tick owed (if the host stalls, the ticks
/// fire back to back to catch up), then renders exactly once. Rendering is
/// uncapped; when the presentation surface blocks on vsync, that block is
/// the frame limiter.
#[derive(Debug)]
pub struct FixedStepLoop<C: ClockSource> {
    clock: C,
    ns_per_tick: f64,
    unprocessed: f64,
    last_time: Duration,
    fps: FpsCounter,
}

impl<C: ClockSource> FixedStepLoop<C> {
    /// Create a loop reading time from `clock`.
    pub fn new(config: LoopConfig, clock: C) -> Self {
        let now = clock.now();
        Self {
            // A rate of 0 divides to infinity: no tick is ever owed.
            ns_per_tick: NANOS_PER_SECOND / f64::from(config.ticks_per_second),
            unprocessed: 0.0,
            last_time: now,
            fps: FpsCounter::new(now),
            clock,
        }
    }

    /// Run until `signal` reports a stop request, checking once per
    /// iteration. Time owed is re-anchored at entry so a delay between
    /// construction and start does not produce a tick burst.
    pub fn run(&mut self, signal: &dyn LifecycleSignal, hooks: &mut impl LoopHooks) {
        let now = self.clock.now();
        self.last_time = now;
        self.unprocessed = 0.0;
        self.fps.reset(now);

        while !signal.stop_requested() {
            self.step(hooks);
        }
    }

    /// One loop iteration: accumulate elapsed ticks, drain them all, render
    /// once, count the frame. Returns the number of ticks drained.
    pub fn step(&mut self, hooks: &mut impl LoopHooks) -> u32 {
        let now = self.clock.now();
        let elapsed = now.saturating_sub(self.last_time);
        self.unprocessed += elapsed.as_nanos() as f64 / self.ns_per_tick;
        self.last_time = now;

        let mut drained = 0;
        while self.unprocessed >= 1.0 {
            hooks.tick();
            self.unprocessed -= 1.0;
            drained += 1;
        }

        hooks.render();

        if let Some(frames) = self.fps.record_frame(now) {
            hooks.report_fps(frames);
        }

        drained
    }

    /// Fraction of a tick currently owed; always in `[0, 1)` after a step.
    pub fn pending_ticks(&self) -> f64 {
        self.unprocessed
    }
}
