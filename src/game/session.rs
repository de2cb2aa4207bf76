//! Session state and the per-frame tick loop

use std::time::Duration;

use glam::Vec3;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::input::ControlIntentSource;
use crate::util::time::FrameClock;

use super::collision::Collision;
use super::npc::{NpcMotion, NpcTuning};
use super::telemetry::{TelemetryHandle, VehicleTelemetry};
use super::vehicle::{VehicleSimulation, VehicleTuning};
use super::world::WorldSnapshot;
use super::ControlIntent;

/// Frame loop pacing
#[derive(Debug, Clone, Copy)]
pub struct LoopSettings {
    pub frame_rate: u32,
    /// Longest elapsed time fed into a single tick
    pub max_frame_delta: Duration,
    /// Stop after this much wall time, run forever when `None`
    pub duration: Option<Duration>,
}

/// Counters reported when the session ends
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionStats {
    pub ticks: u64,
    pub simulated_secs: f64,
    pub building_hits: u64,
    pub npc_hits: u64,
}

/// Everything mutated by a tick, owned in one place
pub struct Session {
    world: WorldSnapshot,
    npc_motion: NpcMotion,
    vehicle: VehicleSimulation,
    telemetry: TelemetryHandle,
    stats: SessionStats,
}

impl Session {
    /// Vehicle spawns at the origin facing -Z
    pub fn new(world: WorldSnapshot, vehicle_tuning: VehicleTuning, npc_tuning: NpcTuning) -> Self {
        let spawn = Vec3::new(0.0, vehicle_tuning.min_altitude + 8.0, 0.0);
        Self {
            world,
            npc_motion: NpcMotion::new(npc_tuning),
            vehicle: VehicleSimulation::new(vehicle_tuning, spawn, 0.0),
            telemetry: TelemetryHandle::new(),
            stats: SessionStats::default(),
        }
    }

    pub fn with_vehicle(mut self, vehicle: VehicleSimulation) -> Self {
        self.vehicle = vehicle;
        self
    }

    pub fn world(&self) -> &WorldSnapshot {
        &self.world
    }

    pub fn vehicle(&self) -> &VehicleSimulation {
        &self.vehicle
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Read handle for presentation
    pub fn telemetry(&self) -> TelemetryHandle {
        self.telemetry.clone()
    }

    /// Run one tick: NPC motion publishes first so the vehicle collides
    /// against this frame's traffic.
    pub fn tick(&mut self, dt: f32, intent: &ControlIntent) -> VehicleTelemetry {
        let dt = dt.max(0.0);
        self.npc_motion.update(self.world.npcs_mut(), dt);
        let telemetry = self.vehicle.tick(dt, intent, &self.world);

        self.stats.ticks += 1;
        self.stats.simulated_secs += f64::from(dt);
        match telemetry.collision {
            Some(Collision::Building(_)) => self.stats.building_hits += 1,
            Some(Collision::Npc(_)) => self.stats.npc_hits += 1,
            None => {}
        }

        self.telemetry.publish(telemetry.clone());
        self.telemetry.publish_traffic(self.world.npcs());
        telemetry
    }

    /// Drive ticks from a wall-clock interval until the configured duration elapses
    pub async fn run<S>(mut self, mut source: S, settings: LoopSettings) -> SessionStats
    where
        S: ControlIntentSource,
    {
        info!(
            frame_rate = settings.frame_rate,
            buildings = self.world.buildings().len(),
            npcs = self.world.npcs().len(),
            "Session started"
        );

        let frame = Duration::from_secs(1) / settings.frame_rate.max(1);
        let mut ticker = interval(frame);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let started = Instant::now();
        let mut clock = FrameClock::new(settings.max_frame_delta);

        loop {
            ticker.tick().await;

            let dt = clock.delta();
            let intent = source.sample(dt);
            let telemetry = self.tick(dt, &intent);

            if let Some(hit) = telemetry.collision {
                debug!(collision = ?hit, tick = self.stats.ticks, "Collision");
            }

            if settings.duration.is_some_and(|limit| started.elapsed() >= limit) {
                break;
            }
        }

        info!(
            ticks = self.stats.ticks,
            simulated_secs = self.stats.simulated_secs,
            building_hits = self.stats.building_hits,
            npc_hits = self.stats.npc_hits,
            "Session ended"
        );
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::game::world::{Building, Color, NpcAgent, NpcAxis};

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn npcs_move_before_vehicle_collision_test() {
        // NPC starts out of reach and drives into the parked vehicle this tick
        let tuning = VehicleTuning::default();
        let spawn_y = tuning.min_altitude + 8.0;
        let npc = NpcAgent::new(Vec3::new(10.0, spawn_y, 0.0), NpcAxis::X, -480.0, 0.0, Color(0));
        let world = WorldSnapshot::new(Vec::new(), vec![npc]);
        let npc_tuning = NpcTuning {
            bob_amplitude: 0.0,
            ..NpcTuning::default()
        };
        let mut session = Session::new(world, tuning, npc_tuning);

        let telemetry = session.tick(DT, &ControlIntent::IDLE);

        assert_eq!(telemetry.collision, Some(Collision::Npc(0)));
        assert_eq!(session.stats().npc_hits, 1);
    }

    #[test]
    fn tick_publishes_telemetry() {
        let world = WorldSnapshot::new(
            vec![Building::new(Vec2::new(100.0, 100.0), 5.0, 5.0, 5.0, Color(0))],
            Vec::new(),
        );
        let mut session = Session::new(world, VehicleTuning::default(), NpcTuning::default());
        let handle = session.telemetry();
        assert!(handle.latest().is_none());

        let telemetry = session.tick(DT, &ControlIntent::forward());
        assert_eq!(handle.latest(), Some(telemetry));
        assert_eq!(session.stats().ticks, 1);
    }

    #[test]
    fn tick_publishes_moved_traffic() {
        let npc = NpcAgent::new(Vec3::new(50.0, 20.0, 50.0), NpcAxis::Z, 30.0, 0.0, Color(0x00ff00));
        let world = WorldSnapshot::new(Vec::new(), vec![npc.clone()]);
        let mut session = Session::new(world, VehicleTuning::default(), NpcTuning::default());
        let handle = session.telemetry();
        assert!(handle.traffic().is_empty());

        session.tick(DT, &ControlIntent::IDLE);
        let traffic = handle.traffic();
        assert_eq!(traffic, session.world().npcs().to_vec());
        assert!((traffic[0].position.z - npc.position.z - 30.0 * DT).abs() < 1e-4);
    }

    #[tokio::test]
    async fn run_stops_after_duration() {
        let session = Session::new(WorldSnapshot::default(), VehicleTuning::default(), NpcTuning::default());
        let settings = LoopSettings {
            frame_rate: 120,
            max_frame_delta: Duration::from_millis(100),
            duration: Some(Duration::from_millis(50)),
        };
        let stats = session.run(crate::input::Autopilot::default(), settings).await;
        assert!(stats.ticks >= 1);
        assert!(stats.simulated_secs > 0.0);
    }
}
