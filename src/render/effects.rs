//! Reveal effects for the terminal renderer
//!
//! Cards can appear one after another instead of all at once. Effects are
//! cosmetic; the default is `NoReveal`.

use std::thread;
use std::time::Duration;

pub trait RevealEffect {
    /// Called before card `index` of a render is written
    fn before_card(&self, index: usize);
}

/// Cards appear immediately
pub struct NoReveal;

impl RevealEffect for NoReveal {
    fn before_card(&self, _index: usize) {}
}

/// Card `i` appears roughly `i * step` after the first one
pub struct Staggered {
    step: Duration,
}

impl Staggered {
    pub fn new(step: Duration) -> Self {
        Self { step }
    }
}

impl RevealEffect for Staggered {
    fn before_card(&self, index: usize) {
        if index > 0 && !self.step.is_zero() {
            thread::sleep(self.step);
        }
    }
}

/// Pick an effect from a step in milliseconds; zero disables staggering
pub fn from_millis(step_ms: u64) -> Box<dyn RevealEffect> {
    if step_ms == 0 {
        Box::new(NoReveal)
    } else {
        Box::new(Staggered::new(Duration::from_millis(step_ms)))
    }
}
