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
//! Bouncing Balls Example
//!
//! Drops a row of balls into a box made of static walls and prints collision
//! events and energy as they settle. It showcases:
//!
//! - Gravity, drag and restitution
//! - Static colliders
//! - Collision enter/exit events drained from the simulation
//! - Switching the impulse model at runtime
//!
//! # Running
//!
//! ```bash
//! cargo run --example bouncing_balls
//!
//! # More balls, mass-weighted impulses
//! cargo run --example bouncing_balls -- --balls 12 --mass-weighted
//! ```

use entity_sim::collision::{ColliderComponent, CollisionEventKind, CollisionShape};
use entity_sim::ecs::components::{PhysicsComponent, TransformComponent, VelocityComponent};
use entity_sim::integration::total_kinetic_energy;
use entity_sim::{Entity, ImpulseModel, Simulation, SimulationConfig, World};
use glam::Vec2;

const WIDTH: f32 = 400.0;
const HEIGHT: f32 = 300.0;
const WALL: f32 = 20.0;

fn spawn_wall(world: &mut World, position: Vec2, size: Vec2) -> Entity {
    let wall = world.create_entity();
    world.insert(wall, TransformComponent::at(position)).unwrap();
    world.insert(wall, PhysicsComponent::immovable()).unwrap();
    world
        .insert(wall, ColliderComponent::new(CollisionShape::rect(size.x, size.y)).with_tag("wall"))
        .unwrap();
    wall
}

fn spawn_ball(world: &mut World, index: usize) -> Entity {
    let ball = world.create_entity();
    let x = WALL + 30.0 + index as f32 * 28.0;
    world
        .insert(ball, TransformComponent::at(Vec2::new(x, 40.0 + (index % 3) as f32 * 15.0)))
        .unwrap();
    world
        .insert(ball, VelocityComponent::with_max_speed(Vec2::new(25.0 - index as f32 * 5.0, 0.0), 800.0))
        .unwrap();
    world
        .insert(
            ball,
            PhysicsComponent::new(1.0 + index as f32 * 0.5)
                .with_restitution(0.7)
                .with_drag(0.1),
        )
        .unwrap();
    world
        .insert(ball, ColliderComponent::new(CollisionShape::circle(10.0)).with_tag("ball"))
        .unwrap();
    ball
}

fn main() {
    println!("==========================================================");
    println!("                   Bouncing Balls");
    println!("==========================================================");
    println!();

    let args: Vec<String> = std::env::args().collect();
    let mut ball_count = 6;
    let mut model = ImpulseModel::Unweighted;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--balls" => {
                match args.get(i + 1).and_then(|v| v.parse::<usize>().ok()) {
                    Some(n) => ball_count = n,
                    None => eprintln!("Warning: --balls needs a number, using {}", ball_count),
                }
                i += 1;
            }
            "--mass-weighted" => model = ImpulseModel::MassWeighted,
            other => eprintln!("Warning: ignoring unknown argument '{}'", other),
        }
        i += 1;
    }

    let mut world = World::new();
    spawn_wall(&mut world, Vec2::new(0.0, HEIGHT - WALL), Vec2::new(WIDTH, WALL));
    spawn_wall(&mut world, Vec2::ZERO, Vec2::new(WALL, HEIGHT));
    spawn_wall(&mut world, Vec2::new(WIDTH - WALL, 0.0), Vec2::new(WALL, HEIGHT));
    let balls: Vec<Entity> = (0..ball_count).map(|i| spawn_ball(&mut world, i)).collect();

    let mut sim = Simulation::new(SimulationConfig::default().with_impulse_model(model));
    println!("Balls: {}, impulse model: {:?}", ball_count, model);

    let dt = 1.0 / 120.0;
    for step in 1..=600 {
        let stats = match sim.tick(&mut world, dt) {
            Ok(stats) => stats,
            Err(err) => {
                eprintln!("Error: {}", err);
                return;
            }
        };

        for event in sim.drain_collision_events() {
            if event.kind == CollisionEventKind::Enter {
                println!(
                    "  t={:.2}s contact {} <-> {} at ({:.1}, {:.1})",
                    step as f32 * dt,
                    event.a,
                    event.b,
                    event.point.x,
                    event.point.y
                );
            }
        }

        if step % 120 == 0 {
            println!(
                "t={:.1}s  contacts={}  kinetic energy={:.1}",
                step as f32 * dt,
                stats.contacts,
                total_kinetic_energy(&world)
            );
        }
    }

    println!();
    for ball in balls {
        if let Some(transform) = world.get::<TransformComponent>(ball) {
            println!("{} rests at ({:.1}, {:.1})", ball, transform.position.x, transform.position.y);
        }
    }
}
