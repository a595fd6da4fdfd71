//! Frame clock for the fixed-step animation model.
//!
//! The demo advances `u_time` by a nominal 1/60 per draw call instead of
//! measuring wall-clock deltas. Late vsync callbacks therefore slow the
//! animation down rather than making it jump, which is the behaviour the
//! original sample shipped with and the one we keep.

/// Nominal time step applied per frame.
pub const FRAME_STEP: f32 = 1.0 / 60.0;

/// Accumulates elapsed shader time one fixed step at a time.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameClock {
    elapsed: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock by one step and returns the new elapsed time.
    pub fn tick(&mut self) -> f32 {
        self.elapsed += FRAME_STEP;
        self.elapsed
    }

    /// Elapsed shader time in seconds.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
