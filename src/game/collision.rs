//! Collision queries against buildings and NPC traffic

use glam::{Vec2, Vec3};

use super::world::{Building, NpcAgent, WorldSnapshot};

/// What the proposed position ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// Index into `WorldSnapshot::buildings`
    Building(usize),
    /// Index into `WorldSnapshot::npcs`
    Npc(usize),
}

/// Vehicle collision volume
#[derive(Debug, Clone, Copy)]
pub struct CollisionShape {
    /// Footprint inflation: x is the half-width, y is the half-length (applied on z)
    pub half_extents: Vec2,
    /// Extra height above a roof that still counts as a hit
    pub roof_clearance: f32,
    /// Per-axis horizontal distance under which the NPC radius check runs
    pub npc_broad_phase: f32,
    /// 3D distance under which an NPC counts as hit
    pub npc_radius: f32,
}

impl Default for CollisionShape {
    fn default() -> Self {
        Self {
            half_extents: Vec2::new(1.5, 2.5),
            roof_clearance: 1.0,
            npc_broad_phase: 8.0,
            npc_radius: 4.0,
        }
    }
}

/// Point-vs-volume collision tests
pub struct CollisionSystem;

impl CollisionSystem {
    /// Test a proposed position against the world.
    /// Buildings are checked before NPCs; the first hit wins.
    pub fn check(position: Vec3, world: &WorldSnapshot, shape: &CollisionShape) -> Option<Collision> {
        Self::check_buildings(position, world.buildings(), shape)
            .map(Collision::Building)
            .or_else(|| Self::check_npcs(position, world.npcs(), shape).map(Collision::Npc))
    }

    /// Index of the first building whose inflated footprint contains the point below its roof
    pub fn check_buildings(position: Vec3, buildings: &[Building], shape: &CollisionShape) -> Option<usize> {
        let ground = Vec2::new(position.x, position.z);
        buildings.iter().position(|b| {
            position.y < b.top() + shape.roof_clearance
                && b.contains_inflated(ground, shape.half_extents)
        })
    }

    /// Index of the first NPC within the collision radius
    pub fn check_npcs(position: Vec3, npcs: &[NpcAgent], shape: &CollisionShape) -> Option<usize> {
        let radius_sq = shape.npc_radius * shape.npc_radius;
        npcs.iter().position(|npc| {
            let dx = (npc.position.x - position.x).abs();
            let dz = (npc.position.z - position.z).abs();
            if dx >= shape.npc_broad_phase || dz >= shape.npc_broad_phase {
                return false;
            }
            npc.position.distance_squared(position) < radius_sq
        })
    }
}
