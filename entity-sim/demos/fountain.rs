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
//! Particle Fountain Example
//!
//! A moving emitter sprays particles upward against gravity while a second,
//! non-looping emitter fires a single burst. Prints pool statistics each
//! second.
//!
//! # Running
//!
//! ```bash
//! cargo run --example fountain
//!
//! # Same output every run for a given seed
//! cargo run --example fountain -- --seed 7
//! ```

use entity_sim::animation::{Animation, AnimationComponent, FrameGrid};
use entity_sim::ecs::components::TransformComponent;
use entity_sim::particles::{emit_burst, EmitterSettings, ParticleComponent};
use entity_sim::{Color, Simulation, SimulationConfig, World};
use glam::Vec2;

fn main() {
    println!("==========================================================");
    println!("                  Particle Fountain");
    println!("==========================================================");
    println!();

    let args: Vec<String> = std::env::args().collect();
    let seed = match args.iter().position(|a| a == "--seed") {
        Some(i) => args
            .get(i + 1)
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or_else(|| {
                eprintln!("Warning: --seed needs a number, using 0");
                0
            }),
        None => 0,
    };

    let mut world = World::new();

    let fountain = world.create_entity();
    world.insert(fountain, TransformComponent::at(Vec2::new(200.0, 300.0))).unwrap();
    let spray = EmitterSettings {
        emission_rate: 120.0,
        lifetime: 1.5,
        lifetime_variance: 0.3,
        start_velocity: Vec2::new(0.0, -300.0),
        velocity_variance: Vec2::new(40.0, 30.0),
        start_color: Color::rgb(120, 180, 255),
        end_color: Color::rgba(255, 255, 255, 0),
        gravity: Vec2::new(0.0, 400.0),
        wind: Vec2::new(15.0, 0.0),
        rotation_speed: 2.0,
        rotation_variance: 1.0,
        ..EmitterSettings::default()
    };
    world
        .insert(fountain, ParticleComponent::new(256, spray, seed))
        .unwrap();

    let spark = world.create_entity();
    world.insert(spark, TransformComponent::at(Vec2::new(100.0, 100.0))).unwrap();
    let burst = EmitterSettings {
        emission_rate: 0.0,
        loop_emission: false,
        velocity_variance: Vec2::new(150.0, 150.0),
        start_velocity: Vec2::ZERO,
        ..EmitterSettings::default()
    };
    world
        .insert(spark, ParticleComponent::new(64, burst, seed.wrapping_add(1)))
        .unwrap();
    world
        .insert(
            spark,
            AnimationComponent::new().with_animation(
                Animation::horizontal_strip("flash", FrameGrid::new(32, 32), 4, 0.05).looping(false),
            ),
        )
        .unwrap();

    let mut sim = Simulation::new(SimulationConfig::weightless());
    let dt = 1.0 / 60.0;

    for step in 1..=300 {
        if step == 30 {
            let fired = emit_burst(&mut world, spark, 64);
            if let Some(animation) = world.get_mut::<AnimationComponent>(spark) {
                animation.play("flash", true);
            }
            println!("burst: {} sparks", fired);
        }

        // sweep the fountain left and right
        if let Some(transform) = world.get_mut::<TransformComponent>(fountain) {
            transform.position.x = 200.0 + (step as f32 * dt * 2.0).sin() * 80.0;
        }

        let stats = match sim.tick(&mut world, dt) {
            Ok(stats) => stats,
            Err(err) => {
                eprintln!("Error: {}", err);
                return;
            }
        };

        for event in sim.drain_animation_events() {
            println!("  animation: {:?}", event);
        }

        if step % 60 == 0 {
            println!("t={:.0}s  live particles={}", step as f32 * dt, stats.active_particles);
            for (name, entity) in [("fountain", fountain), ("spark", spark)] {
                if let Some(emitter) = world.get::<ParticleComponent>(entity) {
                    let s = emitter.stats();
                    println!(
                        "  {:<8} active={:>3}/{:<3} spawned={} recycled={} exhausted={} peak={}",
                        name,
                        emitter.active_count(),
                        emitter.max_particles(),
                        s.spawned,
                        s.recycled,
                        s.exhausted,
                        s.peak_active
                    );
                }
            }
        }
    }
}
