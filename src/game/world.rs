//! World snapshot: frozen building set plus live NPC agents

use glam::{Vec2, Vec3};

use super::GROUND_LEVEL;

/// Packed 0xRRGGBB display color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u32);

impl Color {
    pub fn hex(&self) -> String {
        format!("#{:06x}", self.0 & 0x00ff_ffff)
    }
}

/// Static obstacle, immutable once generated
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    /// Footprint center on the ground plane (x, z)
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub color: Color,
}

impl Building {
    pub fn new(center: Vec2, width: f32, height: f32, depth: f32, color: Color) -> Self {
        Self {
            center,
            width,
            height,
            depth,
            color,
        }
    }

    /// Height of the roof surface
    pub fn top(&self) -> f32 {
        GROUND_LEVEL + self.height
    }

    /// Footprint test after expanding each side by the given margins.
    /// `margin.x` widens the x extent, `margin.y` widens the z extent.
    pub fn contains_inflated(&self, point: Vec2, margin: Vec2) -> bool {
        let half = Vec2::new(self.width * 0.5, self.depth * 0.5) + margin;
        let delta = (point - self.center).abs();
        delta.x < half.x && delta.y < half.y
    }
}

/// Primary travel axis of an NPC agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NpcAxis {
    X,
    Z,
}

/// Non-player vehicle looping along one world axis
#[derive(Debug, Clone, PartialEq)]
pub struct NpcAgent {
    pub position: Vec3,
    pub axis: NpcAxis,
    /// Signed speed along `axis` (units per second)
    pub speed: f32,
    /// Resting altitude the bob oscillates around
    pub cruise_altitude: f32,
    /// Phase offset for the vertical bob (radians)
    pub phase: f32,
    pub color: Color,
}

impl NpcAgent {
    pub fn new(position: Vec3, axis: NpcAxis, speed: f32, phase: f32, color: Color) -> Self {
        Self {
            position,
            axis,
            speed,
            cruise_altitude: position.y,
            phase,
            color,
        }
    }

    /// Coordinate along the travel axis
    pub fn travel(&self) -> f32 {
        match self.axis {
            NpcAxis::X => self.position.x,
            NpcAxis::Z => self.position.z,
        }
    }

    pub fn set_travel(&mut self, value: f32) {
        match self.axis {
            NpcAxis::X => self.position.x = value,
            NpcAxis::Z => self.position.z = value,
        }
    }
}

/// Shared world state read by the vehicle simulation each tick.
///
/// The building list is fixed at construction. NPC agents are only mutable
/// through [`WorldSnapshot::npcs_mut`], which the session hands to NPC motion
/// before the vehicle step runs.
#[derive(Debug, Clone, Default)]
pub struct WorldSnapshot {
    buildings: Vec<Building>,
    npcs: Vec<NpcAgent>,
}

impl WorldSnapshot {
    pub fn new(buildings: Vec<Building>, npcs: Vec<NpcAgent>) -> Self {
        Self { buildings, npcs }
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn npcs(&self) -> &[NpcAgent] {
        &self.npcs
    }

    /// Write handle for NPC motion. The slice length (agent count) cannot change.
    pub fn npcs_mut(&mut self) -> &mut [NpcAgent] {
        &mut self.npcs
    }

    pub fn npc_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.npcs.iter().map(|npc| npc.position)
    }

    /// Buildings whose center lies within `radius` of `center` on the ground plane
    pub fn buildings_within(&self, center: Vec2, radius: f32) -> impl Iterator<Item = &Building> {
        let radius_sq = radius * radius;
        self.buildings
            .iter()
            .filter(move |b| b.center.distance_squared(center) <= radius_sq)
    }
}
