//! HUD readouts derived from telemetry

use glam::{Vec2, Vec3};

use crate::game::{Color, VehicleTelemetry, WorldSnapshot};

/// Rounded stat readout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatLine {
    pub speed: i32,
    pub altitude: i32,
    /// Compass heading in whole degrees, 0..360, increasing clockwise
    pub heading_deg: i32,
}

impl StatLine {
    pub fn from_telemetry(t: &VehicleTelemetry) -> Self {
        Self {
            speed: t.display_speed.round() as i32,
            altitude: t.display_altitude.round() as i32,
            // Heading grows with left turns, the compass grows with right turns
            heading_deg: ((-t.heading).to_degrees().rem_euclid(360.0).round() as i32) % 360,
        }
    }
}

impl std::fmt::Display for StatLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SPD {:>4}  ALT {:>4}  HDG {:03}", self.speed, self.altitude, self.heading_deg)
    }
}

/// What a minimap blip represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlipKind {
    Building,
    Traffic,
}

/// Minimap marker in vehicle-relative coordinates: +y is straight ahead, +x is to the right
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blip {
    pub kind: BlipKind,
    pub offset: Vec2,
    pub color: Color,
}

/// Project buildings and traffic within `range` into heading-up minimap space
pub fn minimap_blips(world: &WorldSnapshot, t: &VehicleTelemetry, range: f32) -> Vec<Blip> {
    let origin = Vec2::new(t.position.x, t.position.z);
    let range_sq = range * range;

    let buildings = world
        .buildings_within(origin, range)
        .map(|b| (BlipKind::Building, b.center, b.color));
    let traffic = world
        .npcs()
        .iter()
        .map(|n| (BlipKind::Traffic, ground(n.position), n.color))
        .filter(|(_, p, _)| p.distance_squared(origin) <= range_sq);

    buildings
        .chain(traffic)
        .map(|(kind, point, color)| Blip {
            kind,
            offset: heading_up(point - origin, t.heading),
            color,
        })
        .collect()
}

fn ground(p: Vec3) -> Vec2 {
    Vec2::new(p.x, p.z)
}

/// Rotate a world ground-plane delta (x, z) so the vehicle's forward is +y
fn heading_up(delta: Vec2, heading: f32) -> Vec2 {
    let (sin, cos) = heading.sin_cos();
    // forward = (-sin, -cos), right = (cos, -sin) in (x, z)
    let ahead = -delta.x * sin - delta.y * cos;
    let right = delta.x * cos - delta.y * sin;
    Vec2::new(right, ahead)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Building, NpcAgent, NpcAxis};

    fn telemetry(heading: f32) -> VehicleTelemetry {
        VehicleTelemetry {
            display_speed: 36.4,
            display_altitude: 12.6,
            position: Vec3::new(0.0, 12.6, 0.0),
            heading,
            bank_angle: 0.0,
            impact: 0.0,
            collision: None,
        }
    }

    #[test]
    fn stat_line_rounds_and_wraps_heading() {
        // Quarter turn to the right
        let line = StatLine::from_telemetry(&telemetry(-std::f32::consts::FRAC_PI_2));
        assert_eq!(line.speed, 36);
        assert_eq!(line.altitude, 13);
        assert_eq!(line.heading_deg, 90);
        assert_eq!(line.to_string(), "SPD   36  ALT   13  HDG 090");
    }

    #[test]
    fn compass_runs_clockwise() {
        use std::f32::consts::{FRAC_PI_2, PI, TAU};

        let deg = |heading: f32| StatLine::from_telemetry(&telemetry(heading)).heading_deg;
        assert_eq!(deg(0.0), 0);
        assert_eq!(deg(FRAC_PI_2), 270);
        assert_eq!(deg(PI), 180);
        assert_eq!(deg(-TAU), 0);
        assert_eq!(deg(-0.001), 0);
    }

    #[test]
    fn blips_are_heading_up_and_clipped() {
        let world = WorldSnapshot::new(
            vec![
                Building::new(Vec2::new(0.0, -20.0), 4.0, 4.0, 4.0, Color(1)),
                Building::new(Vec2::new(0.0, -500.0), 4.0, 4.0, 4.0, Color(2)),
            ],
            vec![NpcAgent::new(Vec3::new(10.0, 5.0, 0.0), NpcAxis::X, 1.0, 0.0, Color(3))],
        );
        let blips = minimap_blips(&world, &telemetry(0.0), 100.0);
        assert_eq!(blips.len(), 2);

        let building = blips.iter().find(|b| b.kind == BlipKind::Building).expect("building blip");
        assert!((building.offset - Vec2::new(0.0, 20.0)).length() < 1e-4);

        let traffic = blips.iter().find(|b| b.kind == BlipKind::Traffic).expect("traffic blip");
        assert!((traffic.offset - Vec2::new(10.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn turning_left_rotates_blips_right() {
        let world = WorldSnapshot::new(
            vec![Building::new(Vec2::new(0.0, -20.0), 4.0, 4.0, 4.0, Color(1))],
            Vec::new(),
        );
        let blips = minimap_blips(&world, &telemetry(std::f32::consts::FRAC_PI_2), 100.0);
        // Facing -X now; the building at -Z sits off the right side
        assert!((blips[0].offset - Vec2::new(20.0, 0.0)).length() < 1e-4);
    }
}
