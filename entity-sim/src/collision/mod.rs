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
//! Collision detection and response
//!
//! Colliders pair a [`CollisionShape`] with a trigger flag and a tag. The
//! [`CollisionResolver`] system tests every pair of collider-bearing
//! entities each tick (no broad phase), applies an impulse and a small
//! positional correction to approaching solid pairs, and queues
//! [`CollisionEvent`]s when pairs start or stop overlapping.
//!
//! Collision impulses follow [`ImpulseModel`](crate::config::ImpulseModel):
//! by default the impulse is applied to velocity unscaled, as though every
//! body had unit mass.

mod collider;
mod resolver;
mod shape;

pub use collider::ColliderComponent;
pub use resolver::{CollisionEvent, CollisionEventKind, CollisionResolver, Contact};
pub use shape::{Aabb, CollisionShape, ShapeKind};
