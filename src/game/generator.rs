//! Procedural city and traffic layout

use std::ops::Range;

use glam::{Vec2, Vec3};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, warn};

use super::world::{Building, Color, NpcAgent, NpcAxis, WorldSnapshot};

/// Placement attempts per building before it is skipped
const MAX_PLACEMENT_ATTEMPTS: usize = 32;

const BUILDING_PALETTE: &[Color] = &[
    Color(0x1b1f2a),
    Color(0x252a38),
    Color(0x2f3547),
    Color(0x3a2f4a),
    Color(0x20303a),
];

const NPC_PALETTE: &[Color] = &[
    Color(0xff2a6d),
    Color(0x05d9e8),
    Color(0xf9c80e),
    Color(0x01ff89),
];

/// Layout parameters for one session
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub building_count: usize,
    /// Building centers lie within [-bound, bound] on both ground axes
    pub placement_bound: f32,
    /// No building center within this radius of the origin
    pub clear_zone_radius: f32,
    pub height_range: Range<f32>,
    pub width_range: Range<f32>,
    pub depth_range: Range<f32>,
    pub building_palette: Vec<Color>,

    pub npc_count: usize,
    /// Initial NPC coordinates lie within [-bound, bound]
    pub npc_bound: f32,
    pub npc_altitude_range: Range<f32>,
    /// Speed magnitude range; direction is random
    pub npc_speed_range: Range<f32>,
    pub npc_palette: Vec<Color>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            building_count: 150,
            placement_bound: 350.0,
            clear_zone_radius: 40.0,
            height_range: 15.0..90.0,
            width_range: 8.0..24.0,
            depth_range: 8.0..24.0,
            building_palette: BUILDING_PALETTE.to_vec(),
            npc_count: 40,
            npc_bound: 400.0,
            npc_altitude_range: 8.0..60.0,
            npc_speed_range: 10.0..35.0,
            npc_palette: NPC_PALETTE.to_vec(),
        }
    }
}

/// One-shot world generator
pub struct CityGenerator;

impl CityGenerator {
    pub fn generate<R: Rng + ?Sized>(config: &GeneratorConfig, rng: &mut R) -> WorldSnapshot {
        let buildings = Self::buildings(config, rng);
        let npcs = Self::npcs(config, rng);

        info!(
            buildings = buildings.len(),
            npcs = npcs.len(),
            "Generated city layout"
        );

        WorldSnapshot::new(buildings, npcs)
    }

    fn buildings<R: Rng + ?Sized>(config: &GeneratorConfig, rng: &mut R) -> Vec<Building> {
        let mut buildings = Vec::with_capacity(config.building_count);
        let clear_sq = config.clear_zone_radius * config.clear_zone_radius;

        for _ in 0..config.building_count {
            let center = (0..MAX_PLACEMENT_ATTEMPTS)
                .map(|_| {
                    Vec2::new(
                        symmetric(rng, config.placement_bound),
                        symmetric(rng, config.placement_bound),
                    )
                })
                .find(|c| c.length_squared() > clear_sq);

            let Some(center) = center else {
                warn!("Could not place building outside the clear zone, skipping");
                continue;
            };

            buildings.push(Building::new(
                center,
                sample(rng, &config.width_range),
                sample(rng, &config.height_range),
                sample(rng, &config.depth_range),
                pick(rng, &config.building_palette),
            ));
        }

        buildings
    }

    fn npcs<R: Rng + ?Sized>(config: &GeneratorConfig, rng: &mut R) -> Vec<NpcAgent> {
        (0..config.npc_count)
            .map(|_| {
                let position = Vec3::new(
                    symmetric(rng, config.npc_bound),
                    sample(rng, &config.npc_altitude_range),
                    symmetric(rng, config.npc_bound),
                );
                let axis = if rng.gen_bool(0.5) { NpcAxis::X } else { NpcAxis::Z };
                let speed = sample(rng, &config.npc_speed_range);
                let speed = if rng.gen_bool(0.5) { speed } else { -speed };
                let phase = rng.gen_range(0.0..std::f32::consts::TAU);
                NpcAgent::new(position, axis, speed, phase, pick(rng, &config.npc_palette))
            })
            .collect()
    }
}

fn symmetric<R: Rng + ?Sized>(rng: &mut R, bound: f32) -> f32 {
    if bound <= 0.0 {
        return 0.0;
    }
    rng.gen_range(-bound..=bound)
}

/// Uniform sample, or the range start when the range is empty
fn sample<R: Rng + ?Sized>(rng: &mut R, range: &Range<f32>) -> f32 {
    if range.is_empty() {
        range.start
    } else {
        rng.gen_range(range.clone())
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R, palette: &[Color]) -> Color {
    palette.choose(rng).copied().unwrap_or(Color(0xffffff))
}
