//! Vehicle telemetry published to presentation

use std::sync::Arc;

use glam::Vec3;
use parking_lot::RwLock;
use rand::Rng;
use serde::Serialize;

use super::collision::Collision;
use super::vehicle::{VehicleState, VehicleTuning};
use super::world::NpcAgent;
use super::GROUND_LEVEL;

/// Per-tick read-only view of the vehicle
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleTelemetry {
    /// Unsigned, scaled speed readout
    pub display_speed: f32,
    /// Height above ground
    pub display_altitude: f32,
    pub position: Vec3,
    pub heading: f32,
    pub bank_angle: f32,
    /// Impact timer value, drives camera shake
    pub impact: f32,
    /// Obstacle hit on this tick, if any
    pub collision: Option<Collision>,
}

impl VehicleTelemetry {
    pub fn from_state(state: &VehicleState, tuning: &VehicleTuning, collision: Option<Collision>) -> Self {
        Self {
            display_speed: state.speed.abs() * tuning.speed_display_scale,
            display_altitude: state.position.y - GROUND_LEVEL,
            position: state.position,
            heading: state.heading,
            bank_angle: state.bank_angle,
            impact: state.impact_timer,
            collision,
        }
    }
}

/// Flat record for structured log output
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryRecord {
    pub speed: f32,
    pub altitude: f32,
    pub x: f32,
    pub z: f32,
    pub heading: f32,
}

impl From<&VehicleTelemetry> for TelemetryRecord {
    fn from(t: &VehicleTelemetry) -> Self {
        Self {
            speed: t.display_speed,
            altitude: t.display_altitude,
            x: t.position.x,
            z: t.position.z,
            heading: t.heading,
        }
    }
}

/// Latest telemetry and traffic, written by the session after each tick and read by presentation
#[derive(Debug, Clone, Default)]
pub struct TelemetryHandle {
    latest: Arc<RwLock<Option<VehicleTelemetry>>>,
    traffic: Arc<RwLock<Vec<NpcAgent>>>,
}

impl TelemetryHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn publish(&self, telemetry: VehicleTelemetry) {
        *self.latest.write() = Some(telemetry);
    }

    pub(crate) fn publish_traffic(&self, npcs: &[NpcAgent]) {
        let mut traffic = self.traffic.write();
        traffic.clear();
        traffic.extend_from_slice(npcs);
    }

    /// Copy of the most recent record, `None` before the first tick
    pub fn latest(&self) -> Option<VehicleTelemetry> {
        self.latest.read().clone()
    }

    /// Copy of the NPC agents as of the most recent tick
    pub fn traffic(&self) -> Vec<NpcAgent> {
        self.traffic.read().clone()
    }
}

/// Random camera jitter with magnitude proportional to the impact timer
pub fn shake_offset<R: Rng + ?Sized>(impact: f32, rng: &mut R) -> Vec3 {
    if impact <= 0.0 {
        return Vec3::ZERO;
    }
    Vec3::new(
        rng.gen_range(-0.5..=0.5),
        rng.gen_range(-0.5..=0.5),
        rng.gen_range(-0.5..=0.5),
    ) * impact
}
