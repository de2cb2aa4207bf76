//! Player vehicle physics and collision response

use glam::{Quat, Vec3};
use tracing::debug;

use super::collision::{Collision, CollisionShape, CollisionSystem};
use super::telemetry::VehicleTelemetry;
use super::world::WorldSnapshot;
use super::{ControlIntent, GROUND_LEVEL};

/// Per-frame multipliers below are expressed at this rate
pub const REFERENCE_FPS: f32 = 60.0;

/// Vehicle handling constants
#[derive(Debug, Clone, Copy)]
pub struct VehicleTuning {
    /// Forward speed cap without boost (units per second)
    pub max_forward_speed: f32,
    /// Forward speed cap while boosting
    pub boost_forward_speed: f32,
    /// Reverse speed cap (magnitude), unaffected by boost
    pub max_reverse_speed: f32,
    /// Acceleration rate (units per second squared)
    pub acceleration: f32,
    /// Speed multiplier per reference frame while coasting
    pub friction: f32,
    /// Yaw rate in radians per second
    pub turn_rate: f32,
    /// Speed magnitude at or below which turning is ignored
    pub turn_dead_zone: f32,
    /// Vertical rate (units per second)
    pub climb_rate: f32,
    pub min_altitude: f32,
    pub max_altitude: f32,
    pub shape: CollisionShape,
    /// Applied to speed on impact; negative so the vehicle recoils
    pub bounce_factor: f32,
    /// Impact timer value armed on collision (seconds)
    pub impact_duration: f32,
    /// Multiple of the rejected movement vector pushed back on impact
    pub correction_factor: f32,
    /// Bank angle target while turning (radians)
    pub max_bank: f32,
    /// Blend toward the bank target per reference frame
    pub bank_smoothing: f32,
    /// Speed readout scale for telemetry
    pub speed_display_scale: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            max_forward_speed: 40.0,
            boost_forward_speed: 80.0,
            max_reverse_speed: 15.0,
            acceleration: 25.0,
            friction: 0.98,
            turn_rate: 2.0,
            turn_dead_zone: 0.1,
            climb_rate: 15.0,
            min_altitude: GROUND_LEVEL + 1.5,
            max_altitude: GROUND_LEVEL + 120.0,
            shape: CollisionShape::default(),
            bounce_factor: -0.5,
            impact_duration: 0.5,
            correction_factor: 2.0,
            max_bank: 0.4,
            bank_smoothing: 0.1,
            speed_display_scale: 3.6,
        }
    }
}

impl VehicleTuning {
    /// Forward cap for this tick
    pub fn forward_cap(&self, boost: bool) -> f32 {
        if boost {
            self.boost_forward_speed
        } else {
            self.max_forward_speed
        }
    }
}

/// Kinematic state of the player vehicle
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleState {
    pub position: Vec3,
    /// Yaw in radians, unbounded
    pub heading: f32,
    /// Cosmetic roll, never read by movement or collision
    pub bank_angle: f32,
    /// Signed speed, forward positive
    pub speed: f32,
    /// Seconds of camera shake remaining
    pub impact_timer: f32,
}

impl VehicleState {
    pub fn at(position: Vec3, heading: f32) -> Self {
        Self {
            position,
            heading,
            bank_angle: 0.0,
            speed: 0.0,
            impact_timer: 0.0,
        }
    }

    /// Local forward axis (-Z) rotated into world space
    pub fn forward(&self) -> Vec3 {
        Quat::from_rotation_y(self.heading) * Vec3::NEG_Z
    }
}

/// Owns the single vehicle state for a session and steps it once per tick
#[derive(Debug, Clone)]
pub struct VehicleSimulation {
    state: VehicleState,
    tuning: VehicleTuning,
}

impl VehicleSimulation {
    pub fn new(tuning: VehicleTuning, spawn: Vec3, heading: f32) -> Self {
        let altitude = spawn.y.clamp(tuning.min_altitude, tuning.max_altitude);
        Self {
            state: VehicleState::at(Vec3::new(spawn.x, altitude, spawn.z), heading),
            tuning,
        }
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn tuning(&self) -> &VehicleTuning {
        &self.tuning
    }

    /// Advance one tick. Steps run in a fixed order; the collision test only
    /// ever sees the proposed position, never a committed one.
    pub fn tick(&mut self, dt: f32, intent: &ControlIntent, world: &WorldSnapshot) -> VehicleTelemetry {
        let dt = dt.max(0.0);

        self.apply_throttle(dt, intent);
        self.apply_steering(dt, intent);
        let altitude = self.next_altitude(dt, intent);

        let movement = self.state.forward() * self.state.speed * dt;
        let mut proposed = self.state.position + movement;
        proposed.y = altitude;

        let collision = CollisionSystem::check(proposed, world, &self.tuning.shape);
        match collision {
            None => self.state.position = proposed,
            Some(hit) => self.resolve_impact(hit, movement),
        }

        self.apply_bank(dt, intent);
        self.state.impact_timer = (self.state.impact_timer - dt).max(0.0);

        VehicleTelemetry::from_state(&self.state, &self.tuning, collision)
    }

    fn apply_throttle(&mut self, dt: f32, intent: &ControlIntent) {
        let t = &self.tuning;
        let cap = t.forward_cap(intent.boost);
        let step = t.acceleration * dt;
        let mut speed = self.state.speed;

        if intent.forward {
            if speed < cap {
                speed = (speed + step).min(cap);
            } else {
                // Boost released above the normal cap: coast down to it
                speed = (speed * friction_factor(t.friction, dt)).max(cap);
            }
        }
        if intent.backward {
            let reverse_cap = -t.max_reverse_speed;
            if speed > reverse_cap {
                speed = (speed - step).max(reverse_cap);
            } else {
                // Recoil past the reverse cap: coast up to it
                speed = (speed * friction_factor(t.friction, dt)).min(reverse_cap);
            }
        }
        if !intent.forward && !intent.backward {
            speed *= friction_factor(t.friction, dt);
        }

        self.state.speed = speed;
    }

    fn apply_steering(&mut self, dt: f32, intent: &ControlIntent) {
        if self.state.speed.abs() <= self.tuning.turn_dead_zone {
            return;
        }
        self.state.heading += intent.turn_axis() * self.tuning.turn_rate * dt;
    }

    fn next_altitude(&self, dt: f32, intent: &ControlIntent) -> f32 {
        let t = &self.tuning;
        let altitude = self.state.position.y + intent.climb_axis() * t.climb_rate * dt;
        altitude.clamp(t.min_altitude, t.max_altitude)
    }

    /// Reject the proposed move: recoil, arm the shake and push back along the movement.
    /// A large movement vector can push the vehicle into a second obstacle; that is
    /// only caught on the next tick.
    fn resolve_impact(&mut self, hit: Collision, movement: Vec3) {
        let t = &self.tuning;
        debug!(collision = ?hit, speed = self.state.speed, "Vehicle impact");

        self.state.speed *= t.bounce_factor;
        self.state.impact_timer = t.impact_duration;
        self.state.position -= movement * t.correction_factor;
    }

    fn apply_bank(&mut self, dt: f32, intent: &ControlIntent) {
        let t = &self.tuning;
        let target = intent.turn_axis() * t.max_bank;
        let blend = 1.0 - friction_factor(1.0 - t.bank_smoothing, dt);
        self.state.bank_angle += (target - self.state.bank_angle) * blend;
    }
}

/// Exact exponential form of a per-reference-frame multiplier
pub fn friction_factor(per_frame: f32, dt: f32) -> f32 {
    per_frame.powf(dt * REFERENCE_FPS)
}
