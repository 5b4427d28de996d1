//! Loop driver: walks one frame through its phases in order.
//!
//! Fixed updates run zero or more times depending on accumulated time, then
//! update, draw, and optionally swap. The driver only ever switches phases
//! through `Profiler::enter_phase`, so a skipped swap or a frame without
//! fixed steps needs no special handling.

use super::clock::Clock;
use super::engine::{FrameReport, Profiler};
use crate::span::Phase;

/// Application callbacks invoked by [`FrameLoop`]
pub trait LoopHandler<C: Clock> {
    fn fixed_update(&mut self, _profiler: &mut Profiler<C>, _step: f64) {}

    fn update(&mut self, profiler: &mut Profiler<C>, delta: f64);

    fn draw(&mut self, profiler: &mut Profiler<C>);

    /// Whether this frame waits on the GPU in a separate swap phase
    fn wants_swap(&self) -> bool {
        true
    }

    fn swap(&mut self, _profiler: &mut Profiler<C>) {}
}

/// Fixed-step frame driver
#[derive(Debug, Clone)]
pub struct FrameLoop {
    fixed_step: f64,
    max_fixed_steps: u32,
    accumulator: f64,
}

impl FrameLoop {
    /// Create a driver running fixed updates every `fixed_step` seconds
    ///
    /// A non-positive step disables fixed updates.
    pub fn new(fixed_step: f64) -> Self {
        Self {
            fixed_step,
            max_fixed_steps: 8,
            accumulator: 0.0,
        }
    }

    /// Cap the fixed steps run in one frame; leftover time is dropped
    pub fn with_max_fixed_steps(mut self, max: u32) -> Self {
        self.max_fixed_steps = max;
        self
    }

    /// Drive one frame of `delta` seconds and end it on the profiler
    pub fn run_frame<C, H>(
        &mut self,
        profiler: &mut Profiler<C>,
        handler: &mut H,
        delta: f64,
    ) -> FrameReport
    where
        C: Clock,
        H: LoopHandler<C>,
    {
        if self.fixed_step > 0.0 {
            self.accumulator += delta;
            let mut steps = 0;
            while self.accumulator >= self.fixed_step {
                if steps == self.max_fixed_steps {
                    self.accumulator = 0.0;
                    break;
                }
                profiler.enter_phase(Phase::FixedUpdate);
                handler.fixed_update(profiler, self.fixed_step);
                self.accumulator -= self.fixed_step;
                steps += 1;
            }
        }

        profiler.enter_phase(Phase::Update);
        handler.update(profiler, delta);

        profiler.enter_phase(Phase::Draw);
        handler.draw(profiler);

        if handler.wants_swap() {
            profiler.enter_phase(Phase::Swap);
            handler.swap(profiler);
        }

        profiler.end_frame(delta)
    }
}
