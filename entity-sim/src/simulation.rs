// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Fixed-order tick driver

use crate::animation::{AnimationEvent, AnimationSystem};
use crate::collision::{CollisionEvent, CollisionResolver};
use crate::config::SimulationConfig;
use crate::ecs::{StepContext, System, World};
use crate::error::{Result, SimError};
use crate::integration::{clear_forces, MotionIntegrator};
use crate::particles::ParticleSimulator;

/// What one tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepStats {
    /// Bodies moved by the motion integrator
    pub integrated: usize,
    /// Overlapping collider pairs, triggers included
    pub contacts: usize,
    /// Live particles across all emitters after the update
    pub active_particles: usize,
    /// Animations that were playing at the start of the tick
    pub animated: usize,
}

/// Owns the global tunables and runs the systems in a fixed order
///
/// Each tick runs motion integration, then collision resolution over the
/// updated transforms, then particles, then animation. Collision and
/// animation events accumulate until drained.
///
/// # Examples
///
/// ```
/// use entity_sim::ecs::components::{PhysicsComponent, TransformComponent, VelocityComponent};
/// use entity_sim::{Simulation, SimulationConfig, World};
/// use glam::Vec2;
///
/// let mut world = World::new();
/// let ball = world.create_entity();
/// world.insert(ball, TransformComponent::default()).unwrap();
/// world.insert(ball, VelocityComponent::default()).unwrap();
/// world.insert(ball, PhysicsComponent::new(1.0)).unwrap();
///
/// let mut sim = Simulation::new(SimulationConfig::new(Vec2::new(0.0, 10.0)));
/// let stats = sim.tick(&mut world, 0.5).unwrap();
/// assert_eq!(stats.integrated, 1);
/// assert_eq!(world.get::<VelocityComponent>(ball).unwrap().velocity, Vec2::new(0.0, 5.0));
///
/// assert!(sim.tick(&mut world, -1.0).is_err());
/// ```
#[derive(Debug, Default)]
pub struct Simulation {
    config: SimulationConfig,
    motion: MotionIntegrator,
    collisions: CollisionResolver,
    particles: ParticleSimulator,
    animation: AnimationSystem,
    ticks: u64,
}

impl Simulation {
    /// Driver with the given tunables
    pub fn new(config: SimulationConfig) -> Self {
        Simulation {
            config,
            ..Self::default()
        }
    }

    /// Tunables in effect
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Tunables, mutably; changes apply from the next tick
    pub fn config_mut(&mut self) -> &mut SimulationConfig {
        &mut self.config
    }

    /// Advance the world by `dt` seconds
    ///
    /// A negative or non-finite `dt` is rejected before anything runs. A
    /// zero `dt` runs no system but still discards pending forces, so every
    /// tick starts with empty accumulators.
    pub fn tick(&mut self, world: &mut World, dt: f32) -> Result<StepStats> {
        if !(dt >= 0.0 && dt.is_finite()) {
            return Err(SimError::InvalidTimestep(dt));
        }
        if dt == 0.0 {
            clear_forces(world);
            return Ok(StepStats::default());
        }

        let ctx = StepContext::new(dt, &self.config);
        let stats = StepStats {
            integrated: self.motion.run(world, &ctx),
            contacts: self.collisions.run(world, &ctx),
            active_particles: self.particles.run(world, &ctx),
            animated: self.animation.run(world, &ctx),
        };
        self.ticks += 1;

        tracing::debug!(
            tick = self.ticks,
            dt,
            integrated = stats.integrated,
            contacts = stats.contacts,
            active_particles = stats.active_particles,
            animated = stats.animated,
            "simulation step"
        );
        Ok(stats)
    }

    /// Number of non-empty ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The collision system, for contact queries
    pub fn collisions(&self) -> &CollisionResolver {
        &self.collisions
    }

    /// Remove and return queued collision events, oldest first
    pub fn drain_collision_events(&mut self) -> std::vec::Drain<'_, CollisionEvent> {
        self.collisions.drain_events()
    }

    /// Remove and return queued animation events, oldest first
    pub fn drain_animation_events(&mut self) -> std::vec::Drain<'_, AnimationEvent> {
        self.animation.drain_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{PhysicsComponent, TransformComponent, VelocityComponent};
    use glam::Vec2;

    #[test]
    fn test_rejects_bad_timesteps() {
        let mut world = World::new();
        let mut sim = Simulation::default();
        assert_eq!(sim.tick(&mut world, -0.1), Err(SimError::InvalidTimestep(-0.1)));
        assert!(sim.tick(&mut world, f32::NAN).is_err());
        assert!(sim.tick(&mut world, f32::INFINITY).is_err());
        assert_eq!(sim.ticks(), 0);
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let mut world = World::new();
        let e = world.create_entity();
        world.insert(e, TransformComponent::default()).unwrap();
        world.insert(e, VelocityComponent::new(Vec2::X)).unwrap();
        world.insert(e, PhysicsComponent::new(1.0)).unwrap();

        let mut sim = Simulation::default();
        assert_eq!(sim.tick(&mut world, 0.0), Ok(StepStats::default()));
        assert_eq!(world.get::<TransformComponent>(e).unwrap().position, Vec2::ZERO);
        assert_eq!(sim.ticks(), 0);
    }

    #[test]
    fn test_zero_dt_discards_pending_forces() {
        let mut world = World::new();
        let e = world.create_entity();
        world.insert(e, TransformComponent::default()).unwrap();
        world.insert(e, VelocityComponent::default()).unwrap();
        world.insert(e, PhysicsComponent::new(1.0)).unwrap();

        let mut sim = Simulation::new(SimulationConfig::weightless());
        assert!(crate::integration::apply_force(&mut world, e, Vec2::new(10.0, 0.0)));
        sim.tick(&mut world, 0.0).unwrap();
        assert_eq!(world.get::<PhysicsComponent>(e).unwrap().accumulated_force(), Vec2::ZERO);

        sim.tick(&mut world, 1.0).unwrap();
        assert_eq!(world.get::<VelocityComponent>(e).unwrap().velocity, Vec2::ZERO);
    }

    #[test]
    fn test_config_changes_between_ticks() {
        let mut world = World::new();
        let e = world.create_entity();
        world.insert(e, TransformComponent::default()).unwrap();
        world.insert(e, VelocityComponent::default()).unwrap();
        world.insert(e, PhysicsComponent::new(1.0)).unwrap();

        let mut sim = Simulation::new(SimulationConfig::weightless());
        sim.tick(&mut world, 1.0).unwrap();
        assert_eq!(world.get::<VelocityComponent>(e).unwrap().velocity, Vec2::ZERO);

        sim.config_mut().gravity = Vec2::new(0.0, 2.0);
        sim.tick(&mut world, 1.0).unwrap();
        assert_eq!(world.get::<VelocityComponent>(e).unwrap().velocity, Vec2::new(0.0, 2.0));
        assert_eq!(sim.ticks(), 2);
    }
}
