//! Scripted intent source for headless sessions

use crate::game::ControlIntent;

use super::ControlIntentSource;

/// One scripted segment
#[derive(Debug, Clone, Copy)]
pub struct Maneuver {
    pub intent: ControlIntent,
    /// Seconds the intent is held
    pub hold: f32,
}

/// Loops through a list of maneuvers
#[derive(Debug, Clone)]
pub struct Autopilot {
    script: Vec<Maneuver>,
    index: usize,
    remaining: f32,
}

impl Autopilot {
    pub fn new(script: Vec<Maneuver>) -> Self {
        let remaining = script.first().map(|m| m.hold).unwrap_or(0.0);
        Self {
            script,
            index: 0,
            remaining,
        }
    }

    fn current(&self) -> ControlIntent {
        self.script
            .get(self.index)
            .map(|m| m.intent)
            .unwrap_or(ControlIntent::IDLE)
    }

    fn advance(&mut self, dt: f32) {
        if self.script.is_empty() {
            return;
        }
        self.remaining -= dt;
        while self.remaining <= 0.0 {
            self.index = (self.index + 1) % self.script.len();
            let hold = self.script[self.index].hold;
            if hold <= 0.0 {
                // Zero-length script would spin forever
                if self.script.iter().all(|m| m.hold <= 0.0) {
                    self.remaining = 0.0;
                    return;
                }
                continue;
            }
            self.remaining += hold;
        }
    }
}

impl Default for Autopilot {
    /// Cruise around the city with turns, climbs and a boost run
    fn default() -> Self {
        let cruise = ControlIntent::forward();
        Self::new(vec![
            Maneuver { intent: cruise, hold: 3.0 },
            Maneuver {
                intent: ControlIntent { left: true, ..cruise },
                hold: 1.2,
            },
            Maneuver {
                intent: ControlIntent { up: true, ..cruise },
                hold: 1.5,
            },
            Maneuver {
                intent: ControlIntent { boost: true, ..cruise },
                hold: 2.5,
            },
            Maneuver {
                intent: ControlIntent { right: true, down: true, ..cruise },
                hold: 1.0,
            },
            Maneuver { intent: ControlIntent::IDLE, hold: 1.0 },
        ])
    }
}

impl ControlIntentSource for Autopilot {
    fn sample(&mut self, dt: f32) -> ControlIntent {
        self.advance(dt.max(0.0));
        self.current()
    }
}
