//! Time utilities for the frame loop

use std::time::{Duration, Instant};

/// Default frame rate for the headless loop
pub const DEFAULT_FRAME_RATE: u32 = 60;

/// Default cap on a single tick's elapsed time
pub const DEFAULT_MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

/// Measures real elapsed time between ticks, capped so a stall
/// (debugger, suspended process) does not produce one huge step
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    max_delta: Duration,
}

impl FrameClock {
    pub fn new(max_delta: Duration) -> Self {
        Self {
            last: Instant::now(),
            max_delta,
        }
    }

    /// Seconds since the previous call (or construction)
    pub fn delta(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last);
        self.last = now;
        elapsed.min(self.max_delta).as_secs_f32()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_DELTA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_capped() {
        let mut clock = FrameClock::new(Duration::from_millis(5));
        std::thread::sleep(Duration::from_millis(20));
        assert!(clock.delta() <= 0.005 + 1e-6);
    }

    #[test]
    fn delta_resets_between_calls() {
        let mut clock = FrameClock::default();
        std::thread::sleep(Duration::from_millis(10));
        let first = clock.delta();
        let second = clock.delta();
        assert!(first >= 0.01);
        assert!(second < first);
    }
}
