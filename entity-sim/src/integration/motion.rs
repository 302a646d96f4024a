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
//! Semi-implicit Euler motion system

use crate::ecs::components::{PhysicsComponent, TransformComponent, VelocityComponent};
use crate::ecs::{Entity, StepContext, System, World};
use glam::Vec2;

/// Integrates forces into velocity and position for every dynamic body
///
/// Static bodies are skipped entirely. A body whose state turns NaN or
/// infinite during the step keeps its previous velocity and position and a
/// warning is logged.
#[derive(Debug, Default)]
pub struct MotionIntegrator {
    bodies: Vec<Entity>,
}

impl MotionIntegrator {
    /// Create an integrator
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance every dynamic body by `dt` under `gravity`
    ///
    /// Returns the number of bodies whose position was updated.
    pub fn step(&mut self, world: &mut World, dt: f32, gravity: Vec2) -> usize {
        world.query_into::<(PhysicsComponent, TransformComponent)>(&mut self.bodies);

        let mut integrated = 0;
        for &entity in &self.bodies {
            let Some(physics) = world.get_mut::<PhysicsComponent>(entity) else {
                continue;
            };
            if physics.is_static() {
                continue;
            }

            if physics.gravity_scale() > 0.0 {
                let weight = gravity * physics.mass() * physics.gravity_scale();
                physics.apply_force(weight);
            }
            let force = physics.accumulated_force();
            let (mass, drag) = (physics.mass(), physics.drag());
            physics.clear_forces();

            let Some(mut motion) = world.get::<VelocityComponent>(entity).copied() else {
                continue;
            };
            let Some(mut transform) = world.get::<TransformComponent>(entity).copied() else {
                continue;
            };

            integrate_body(force, mass, drag, &mut motion, &mut transform, dt);

            if !(motion.is_valid() && transform.is_valid()) {
                tracing::warn!(%entity, "non-finite motion state; keeping previous step");
                continue;
            }

            if let Some(slot) = world.get_mut::<VelocityComponent>(entity) {
                *slot = motion;
            }
            if let Some(slot) = world.get_mut::<TransformComponent>(entity) {
                *slot = transform;
            }
            integrated += 1;
        }

        integrated
    }
}

impl System for MotionIntegrator {
    fn run(&mut self, world: &mut World, ctx: &StepContext<'_>) -> usize {
        self.step(world, ctx.dt(), ctx.config().gravity)
    }

    fn name(&self) -> &str {
        "MotionIntegrator"
    }
}

/// One integration step for a single body
///
/// `force` is the total force for this step, gravity included. Writes the
/// resulting acceleration, velocity and position in place.
pub fn integrate_body(
    force: Vec2,
    mass: f32,
    drag: f32,
    motion: &mut VelocityComponent,
    transform: &mut TransformComponent,
    dt: f32,
) {
    motion.acceleration = force / mass;
    motion.velocity += motion.acceleration * dt;

    if drag > 0.0 {
        motion.velocity *= (-drag * dt).exp();
    }
    if motion.max_speed > 0.0 {
        motion.velocity = motion.velocity.clamp_length_max(motion.max_speed);
    }

    transform.position += motion.velocity * dt;
}
