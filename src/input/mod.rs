//! Control intent sources

pub mod autopilot;
pub mod keyboard;

pub use autopilot::Autopilot;
pub use keyboard::{Key, KeyboardState};

use crate::game::ControlIntent;

/// Produces the held-state intent for each tick
pub trait ControlIntentSource: Send {
    /// Sample the current intent. `dt` is the elapsed time of the tick being prepared.
    fn sample(&mut self, dt: f32) -> ControlIntent;
}
