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
//! Per-tick particle system

use super::ParticleComponent;
use crate::ecs::components::TransformComponent;
use crate::ecs::{Entity, StepContext, System, World};
use glam::Vec2;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Emits and updates particles for every entity with a
/// [`ParticleComponent`] and a [`TransformComponent`]
///
/// Emitters are independent of each other. With the `parallel` feature they
/// are stepped concurrently; the result is the same as the sequential path.
#[derive(Debug, Default)]
pub struct ParticleSimulator {
    origins: Vec<Option<Vec2>>,
}

impl ParticleSimulator {
    /// Create a simulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Step every emitter by `dt`; returns the total live particle count
    pub fn simulate(&mut self, world: &mut World, dt: f32) -> usize {
        let Some(emitters) = world.storage::<ParticleComponent>() else {
            return 0;
        };
        self.origins.clear();
        self.origins.extend(
            emitters
                .entities()
                .iter()
                .map(|&e| world.get::<TransformComponent>(e).map(|t| t.position)),
        );

        let Some(emitters) = world.storage_mut::<ParticleComponent>() else {
            return 0;
        };
        step_emitters(emitters.components_mut(), &self.origins, dt)
    }
}

impl System for ParticleSimulator {
    fn run(&mut self, world: &mut World, ctx: &StepContext<'_>) -> usize {
        self.simulate(world, ctx.dt())
    }

    fn name(&self) -> &str {
        "ParticleSimulator"
    }
}

#[cfg(feature = "parallel")]
fn step_emitters(emitters: &mut [ParticleComponent], origins: &[Option<Vec2>], dt: f32) -> usize {
    emitters
        .par_iter_mut()
        .zip(origins.par_iter())
        .map(|(emitter, origin)| origin.map_or(0, |origin| emitter.step(origin, dt)))
        .sum()
}

#[cfg(not(feature = "parallel"))]
fn step_emitters(emitters: &mut [ParticleComponent], origins: &[Option<Vec2>], dt: f32) -> usize {
    emitters
        .iter_mut()
        .zip(origins)
        .map(|(emitter, origin)| origin.map_or(0, |origin| emitter.step(origin, dt)))
        .sum()
}

/// Spawn up to `count` particles from `entity`'s emitter at its position
///
/// Returns the number spawned: 0 if the entity lacks an emitter or a
/// transform, fewer than `count` if the pool fills up.
pub fn emit_burst(world: &mut World, entity: Entity, count: usize) -> usize {
    let Some(origin) = world.get::<TransformComponent>(entity).map(|t| t.position) else {
        return 0;
    };
    world
        .get_mut::<ParticleComponent>(entity)
        .map_or(0, |emitter| emitter.spawn(origin, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::EmitterSettings;

    fn settings() -> EmitterSettings {
        EmitterSettings::default().without_variance()
    }

    #[test]
    fn test_emitters_follow_their_transform() {
        let mut world = World::new();
        let e = world.create_entity();
        world.insert(e, TransformComponent::at(Vec2::new(100.0, 0.0))).unwrap();
        world.insert(e, ParticleComponent::new(10, settings(), 0)).unwrap();

        let mut sim = ParticleSimulator::new();
        assert_eq!(sim.simulate(&mut world, 0.1), 1);

        let emitter = world.get::<ParticleComponent>(e).unwrap();
        let p = emitter.active_particles().next().unwrap();
        // spawned at the emitter, then moved by one update
        assert!((p.position.x - 100.0).abs() < 1e-4);
        assert!((p.position.y + 5.0).abs() < 1e-4);
        assert!((p.age - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_emitter_without_transform_is_skipped() {
        let mut world = World::new();
        let e = world.create_entity();
        world.insert(e, ParticleComponent::new(10, settings(), 0)).unwrap();

        let mut sim = ParticleSimulator::new();
        assert_eq!(sim.simulate(&mut world, 1.0), 0);
        assert_eq!(world.get::<ParticleComponent>(e).unwrap().emission_accumulator(), 0.0);
    }

    #[test]
    fn test_totals_across_emitters() {
        let mut world = World::new();
        for i in 0..3 {
            let e = world.create_entity();
            world.insert(e, TransformComponent::at(Vec2::new(i as f32, 0.0))).unwrap();
            world.insert(e, ParticleComponent::new(10, settings(), i)).unwrap();
        }
        let mut sim = ParticleSimulator::new();
        assert_eq!(sim.simulate(&mut world, 0.1), 3);
        assert_eq!(sim.simulate(&mut world, 0.1), 6);
    }

    #[test]
    fn test_emit_burst() {
        let mut world = World::new();
        let e = world.create_entity();
        world.insert(e, TransformComponent::at(Vec2::new(5.0, 5.0))).unwrap();
        world.insert(e, ParticleComponent::new(4, settings(), 0)).unwrap();

        assert_eq!(emit_burst(&mut world, e, 3), 3);
        assert_eq!(emit_burst(&mut world, e, 3), 1);

        let emitter = world.get::<ParticleComponent>(e).unwrap();
        assert_eq!(emitter.active_count(), 4);
        assert!(emitter.active_particles().all(|p| p.position == Vec2::new(5.0, 5.0)));

        let bare = world.create_entity();
        assert_eq!(emit_burst(&mut world, bare, 3), 0);
    }
}
