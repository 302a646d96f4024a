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
//! Motion integration for rigid bodies
//!
//! Turns accumulated forces into velocity and position changes once per
//! tick, and exposes the force/impulse API content code uses to push bodies
//! around between ticks.
//!
//! # Step order
//!
//! For every non-static entity with a [`PhysicsComponent`] and a
//! [`TransformComponent`](crate::ecs::components::TransformComponent):
//!
//! 1. gravity is added to the force accumulator (`g * m * gravity_scale`)
//! 2. `a = F / m`
//! 3. `v += a * dt` (semi-implicit Euler)
//! 4. `v *= exp(-drag * dt)`
//! 5. `|v|` is clamped to `max_speed` when one is set
//! 6. `p += v * dt`
//! 7. the accumulator is cleared
//!
//! Entities without a [`VelocityComponent`] still get steps 1 and 7, so
//! forces applied to them are silently discarded.

use crate::ecs::components::{PhysicsComponent, VelocityComponent};
use crate::ecs::{Entity, World};
use glam::Vec2;

mod motion;

pub use motion::{integrate_body, MotionIntegrator};

/// Add a force to an entity's accumulator for the next step
///
/// Returns false when the entity has no physics component or is static.
pub fn apply_force(world: &mut World, entity: Entity, force: Vec2) -> bool {
    world
        .get_mut::<PhysicsComponent>(entity)
        .map_or(false, |physics| physics.apply_force(force))
}

/// Drop every pending force without integrating it
///
/// Returns the number of accumulators that held a non-zero force.
pub fn clear_forces(world: &mut World) -> usize {
    let Some(storage) = world.storage_mut::<PhysicsComponent>() else {
        return 0;
    };
    let mut cleared = 0;
    for physics in storage.components_mut() {
        if physics.accumulated_force() != Vec2::ZERO {
            physics.clear_forces();
            cleared += 1;
        }
    }
    cleared
}

/// Change an entity's velocity by `impulse / mass` immediately
///
/// Bypasses the integrator. Returns false when the entity is static or lacks
/// either a physics or a velocity component.
pub fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec2) -> bool {
    let inverse_mass = match world.get::<PhysicsComponent>(entity) {
        Some(physics) if !physics.is_static() => physics.inverse_mass(),
        _ => return false,
    };

    match world.get_mut::<VelocityComponent>(entity) {
        Some(motion) => {
            motion.velocity += impulse * inverse_mass;
            true
        }
        None => false,
    }
}

/// Kinetic energy of one body: `0.5 * m * |v|²`
///
/// Static bodies carry no kinetic energy.
pub fn kinetic_energy(physics: &PhysicsComponent, motion: &VelocityComponent) -> f32 {
    if physics.is_static() {
        return 0.0;
    }
    0.5 * physics.mass() * motion.velocity.length_squared()
}

/// Total kinetic energy of every dynamic body in the world
pub fn total_kinetic_energy(world: &World) -> f32 {
    world
        .query::<(PhysicsComponent, VelocityComponent)>()
        .filter_map(|e| Some(kinetic_energy(world.get(e)?, world.get(e)?)))
        .sum()
}

/// Total linear momentum `Σ m·v` of every dynamic body in the world
pub fn total_momentum(world: &World) -> Vec2 {
    world
        .query::<(PhysicsComponent, VelocityComponent)>()
        .filter_map(|e| {
            let physics = world.get::<PhysicsComponent>(e)?;
            let motion = world.get::<VelocityComponent>(e)?;
            (!physics.is_static()).then(|| motion.velocity * physics.mass())
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::TransformComponent;

    fn body(world: &mut World, mass: f32, velocity: Vec2) -> Entity {
        let e = world.create_entity();
        world.insert(e, TransformComponent::default()).unwrap();
        world.insert(e, PhysicsComponent::new(mass)).unwrap();
        world.insert(e, VelocityComponent::new(velocity)).unwrap();
        e
    }

    #[test]
    fn test_clear_forces_counts_pending() {
        let mut world = World::new();
        assert_eq!(clear_forces(&mut world), 0);

        let pushed = body(&mut world, 1.0, Vec2::ZERO);
        let idle = body(&mut world, 1.0, Vec2::ZERO);
        assert!(apply_force(&mut world, pushed, Vec2::new(0.0, 5.0)));

        assert_eq!(clear_forces(&mut world), 1);
        for e in [pushed, idle] {
            let physics = world.get::<PhysicsComponent>(e).unwrap();
            assert_eq!(physics.accumulated_force(), Vec2::ZERO);
        }
    }

    #[test]
    fn test_apply_force_accumulates() {
        let mut world = World::new();
        let e = body(&mut world, 1.0, Vec2::ZERO);

        assert!(apply_force(&mut world, e, Vec2::new(3.0, 0.0)));
        assert!(apply_force(&mut world, e, Vec2::new(1.0, 1.0)));
        let physics = world.get::<PhysicsComponent>(e).unwrap();
        assert_eq!(physics.accumulated_force(), Vec2::new(4.0, 1.0));
    }

    #[test]
    fn test_apply_impulse_divides_by_mass() {
        let mut world = World::new();
        let e = body(&mut world, 4.0, Vec2::new(1.0, 0.0));

        assert!(apply_impulse(&mut world, e, Vec2::new(8.0, -4.0)));
        let motion = world.get::<VelocityComponent>(e).unwrap();
        assert_eq!(motion.velocity, Vec2::new(3.0, -1.0));
    }

    #[test]
    fn test_force_api_noops() {
        let mut world = World::new();
        let bare = world.create_entity();
        assert!(!apply_force(&mut world, bare, Vec2::X));
        assert!(!apply_impulse(&mut world, bare, Vec2::X));

        let wall = world.create_entity();
        world.insert(wall, PhysicsComponent::immovable()).unwrap();
        world.insert(wall, VelocityComponent::default()).unwrap();
        assert!(!apply_force(&mut world, wall, Vec2::X));
        assert!(!apply_impulse(&mut world, wall, Vec2::X));
        assert_eq!(world.get::<VelocityComponent>(wall).unwrap().velocity, Vec2::ZERO);

        let no_velocity = world.create_entity();
        world.insert(no_velocity, PhysicsComponent::new(1.0)).unwrap();
        assert!(!apply_impulse(&mut world, no_velocity, Vec2::X));
    }

    #[test]
    fn test_energy_and_momentum() {
        let mut world = World::new();
        body(&mut world, 2.0, Vec2::new(3.0, 0.0));
        body(&mut world, 1.0, Vec2::new(0.0, -4.0));

        assert!((total_kinetic_energy(&world) - (9.0 + 8.0)).abs() < 1e-5);
        assert_eq!(total_momentum(&world), Vec2::new(6.0, -4.0));
    }
}
