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
//! # Entity Sim
//!
//! The simulation core of a 2D game engine, built on a small
//! entity-component store.
//!
//! ## Features
//!
//! - **ECS store**: generational entity handles, insertion-ordered dense
//!   component storage and tuple queries
//! - **Motion**: force accumulation, gravity, exponential drag, speed caps
//!   and semi-implicit Euler integration
//! - **Collisions**: circle and rectangle colliders, impulse response with
//!   positional correction, trigger volumes and enter/exit events
//! - **Particles**: fixed-capacity pooled emitters with seeded randomness,
//!   stepped in parallel with Rayon when the `parallel` feature is on
//! - **Animation**: sprite frame playback with completion events
//!
//! Iteration follows component insertion order everywhere, so a run is
//! reproducible given the same inputs and emitter seeds.
//!
//! ## Example
//!
//! ```rust
//! use entity_sim::collision::{ColliderComponent, CollisionShape};
//! use entity_sim::ecs::components::{PhysicsComponent, TransformComponent, VelocityComponent};
//! use entity_sim::{Simulation, SimulationConfig, World};
//! use glam::Vec2;
//!
//! let mut world = World::new();
//! let ball = world.create_entity();
//! world.insert(ball, TransformComponent::at(Vec2::new(0.0, 0.0))).unwrap();
//! world.insert(ball, VelocityComponent::new(Vec2::new(50.0, 0.0))).unwrap();
//! world.insert(ball, PhysicsComponent::new(1.0).with_restitution(0.8)).unwrap();
//! world.insert(ball, ColliderComponent::new(CollisionShape::circle(8.0))).unwrap();
//!
//! let mut sim = Simulation::new(SimulationConfig::default());
//! for _ in 0..60 {
//!     sim.tick(&mut world, 1.0 / 60.0).unwrap();
//! }
//! assert!(world.get::<TransformComponent>(ball).unwrap().position.y > 0.0);
//! ```

#![warn(missing_docs)]

/// Entity Component System implementation
pub mod ecs;

/// Force integration and the force/impulse API
pub mod integration;

/// Collider shapes, collision response and events
pub mod collision;

/// Pooled particle emitters
pub mod particles;

/// Fixed-capacity slot pooling
pub mod pool;

/// Sprite animation playback
pub mod animation;

/// RGBA color
pub mod color;

/// Global tunables
pub mod config;

/// Tick driver
pub mod simulation;

/// Error type
pub mod error;

pub use color::Color;
pub use config::{ImpulseModel, SimulationConfig};
pub use ecs::{Entity, World};
pub use error::{Result, SimError};
pub use simulation::{Simulation, StepStats};
