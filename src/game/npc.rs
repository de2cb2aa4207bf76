//! NPC traffic motion

use super::world::NpcAgent;

/// NPC traffic constants
#[derive(Debug, Clone, Copy)]
pub struct NpcTuning {
    /// Travel coordinate stays within [-bound, +bound]
    pub bound: f32,
    /// Vertical bob amplitude
    pub bob_amplitude: f32,
    /// Vertical bob angular frequency (radians per second)
    pub bob_frequency: f32,
}

impl Default for NpcTuning {
    fn default() -> Self {
        Self {
            bound: 400.0,
            bob_amplitude: 0.5,
            bob_frequency: 2.0,
        }
    }
}

/// Advances every agent along its axis once per tick
#[derive(Debug, Clone)]
pub struct NpcMotion {
    tuning: NpcTuning,
    /// Simulated seconds since the session started, drives the bob
    elapsed: f32,
}

impl NpcMotion {
    pub fn new(tuning: NpcTuning) -> Self {
        Self {
            tuning,
            elapsed: 0.0,
        }
    }

    pub fn tuning(&self) -> &NpcTuning {
        &self.tuning
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Move all agents by `dt` seconds
    pub fn update(&mut self, agents: &mut [NpcAgent], dt: f32) {
        self.elapsed += dt;
        for agent in agents.iter_mut() {
            self.step_agent(agent, dt);
        }
    }

    fn step_agent(&self, agent: &mut NpcAgent, dt: f32) {
        let bound = self.tuning.bound;
        let travel = agent.travel() + agent.speed * dt;
        agent.set_travel(wrap(travel, bound));

        let bob = (self.elapsed * self.tuning.bob_frequency + agent.phase).sin();
        agent.position.y = agent.cruise_altitude + bob * self.tuning.bob_amplitude;
    }
}

impl Default for NpcMotion {
    fn default() -> Self {
        Self::new(NpcTuning::default())
    }
}

/// Past +bound teleports to -bound and vice versa
fn wrap(value: f32, bound: f32) -> f32 {
    if value > bound {
        -bound
    } else if value < -bound {
        bound
    } else {
        value
    }
}
