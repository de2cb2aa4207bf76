//! Game simulation modules

pub mod collision;
pub mod generator;
pub mod npc;
pub mod session;
pub mod telemetry;
pub mod vehicle;
pub mod world;

pub use collision::{Collision, CollisionSystem};
pub use generator::{CityGenerator, GeneratorConfig};
pub use npc::{NpcMotion, NpcTuning};
pub use session::Session;
pub use telemetry::{TelemetryHandle, VehicleTelemetry};
pub use vehicle::{VehicleSimulation, VehicleState, VehicleTuning};
pub use world::{Building, Color, NpcAgent, NpcAxis, WorldSnapshot};

/// Ground plane height shared by buildings, the vehicle and the HUD
pub const GROUND_LEVEL: f32 = 0.0;

/// Control intent for a single tick ("currently held" semantics)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub boost: bool,
}

impl ControlIntent {
    /// No action held
    pub const IDLE: Self = Self {
        forward: false,
        backward: false,
        left: false,
        right: false,
        up: false,
        down: false,
        boost: false,
    };

    /// Forward held, nothing else
    pub fn forward() -> Self {
        Self {
            forward: true,
            ..Self::IDLE
        }
    }

    /// Turn direction requested this tick: +1 left, -1 right, 0 for none or both
    pub fn turn_axis(&self) -> f32 {
        axis(self.left, self.right)
    }

    /// Vertical direction requested this tick: +1 up, -1 down, 0 for none or both
    pub fn climb_axis(&self) -> f32 {
        axis(self.up, self.down)
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    match (positive, negative) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}
