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
//! Pairwise collision detection and impulse response

use super::{ColliderComponent, CollisionShape};
use crate::config::{ImpulseModel, SimulationConfig};
use crate::ecs::components::{PhysicsComponent, TransformComponent, VelocityComponent};
use crate::ecs::{Entity, StepContext, System, World};
use glam::Vec2;
use std::collections::HashSet;

/// Whether a pair started or stopped overlapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollisionEventKind {
    /// First tick of an overlap
    Enter,
    /// First tick after an overlap ended
    Exit,
}

/// Overlap notification queued by the [`CollisionResolver`]
///
/// `a` precedes `b` in collider query order. For `Enter` events `normal`
/// points from `b` towards `a` and `point` is the midpoint of the two
/// positions; `Exit` events carry zero for both.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollisionEvent {
    /// Enter or exit
    pub kind: CollisionEventKind,
    /// At least one of the two colliders is a trigger
    pub trigger: bool,
    /// First entity of the pair
    pub a: Entity,
    /// Second entity of the pair
    pub b: Entity,
    /// Unit vector from `b` to `a`
    pub normal: Vec2,
    /// Midpoint between the two positions
    pub point: Vec2,
}

/// A pair of colliders overlapping during the last resolved tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Contact {
    /// First entity of the pair
    pub a: Entity,
    /// Second entity of the pair
    pub b: Entity,
    /// At least one of the two colliders is a trigger
    pub trigger: bool,
}

impl Contact {
    /// Whether `entity` is one side of this contact
    pub fn involves(&self, entity: Entity) -> bool {
        self.a == entity || self.b == entity
    }
}

/// Detects overlapping colliders and pushes dynamic bodies apart
///
/// Every tick all pairs `(i, j)`, `i < j`, of entities with a
/// [`ColliderComponent`] and a [`TransformComponent`] are tested, in query
/// order. For each overlapping, approaching, non-trigger pair an impulse of
/// magnitude `-(1 + e) * v_rel·n` is exchanged along the normal and both
/// bodies are nudged apart by a fraction of their combined radii.
///
/// Only bodies with a non-static [`PhysicsComponent`] move. Velocity changes
/// additionally require a [`VelocityComponent`]. A missing physics component
/// counts as restitution 1 and a missing velocity as zero velocity.
#[derive(Debug, Default)]
pub struct CollisionResolver {
    candidates: Vec<(Entity, CollisionShape, bool)>,
    contacts: Vec<Contact>,
    previous: Vec<Contact>,
    lookup: HashSet<Contact>,
    events: Vec<CollisionEvent>,
}

impl CollisionResolver {
    /// Create a resolver with no tracked contacts
    pub fn new() -> Self {
        Self::default()
    }

    /// Run detection and response for one tick
    ///
    /// Returns the number of overlapping pairs, triggers included. Does
    /// nothing when collision resolution is disabled in `config`.
    pub fn resolve(&mut self, world: &mut World, config: &SimulationConfig) -> usize {
        if !config.collision_resolution {
            return 0;
        }

        self.candidates.clear();
        for entity in world.query::<(ColliderComponent, TransformComponent)>() {
            if let Some(collider) = world.get::<ColliderComponent>(entity) {
                self.candidates
                    .push((entity, collider.shape, collider.is_trigger));
            }
        }

        std::mem::swap(&mut self.previous, &mut self.contacts);
        self.contacts.clear();
        self.lookup.clear();
        self.lookup.extend(self.previous.iter().copied());

        for i in 0..self.candidates.len() {
            for j in (i + 1)..self.candidates.len() {
                let (a, shape_a, trigger_a) = self.candidates[i];
                let (b, shape_b, trigger_b) = self.candidates[j];

                let (Some(pos_a), Some(pos_b)) = (position(world, a), position(world, b)) else {
                    continue;
                };
                if !shape_a.intersects(pos_a, &shape_b, pos_b) {
                    continue;
                }

                let normal = (pos_a - pos_b).try_normalize().unwrap_or(Vec2::X);
                let contact = Contact {
                    a,
                    b,
                    trigger: trigger_a || trigger_b,
                };
                self.contacts.push(contact);

                if !self.lookup.contains(&contact) {
                    self.events.push(CollisionEvent {
                        kind: CollisionEventKind::Enter,
                        trigger: contact.trigger,
                        a,
                        b,
                        normal,
                        point: (pos_a + pos_b) * 0.5,
                    });
                }

                if contact.trigger {
                    tracing::trace!(%a, %b, "trigger overlap");
                    continue;
                }

                let separation = (shape_a.approximate_radius() + shape_b.approximate_radius())
                    * config.separation_fraction;
                let responded = respond(world, a, b, normal, separation, config.impulse_model);
                tracing::trace!(%a, %b, responded, "contact");
            }
        }

        self.lookup.clear();
        self.lookup.extend(self.contacts.iter().copied());
        for contact in &self.previous {
            if !self.lookup.contains(contact) {
                self.events.push(CollisionEvent {
                    kind: CollisionEventKind::Exit,
                    trigger: contact.trigger,
                    a: contact.a,
                    b: contact.b,
                    normal: Vec2::ZERO,
                    point: Vec2::ZERO,
                });
            }
        }

        self.contacts.len()
    }

    /// Pairs overlapping as of the last resolved tick, in detection order
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Whether `a` and `b` overlapped during the last resolved tick
    pub fn is_touching(&self, a: Entity, b: Entity) -> bool {
        self.contacts
            .iter()
            .any(|c| (c.a == a && c.b == b) || (c.a == b && c.b == a))
    }

    /// Events queued since the last drain, oldest first
    pub fn events(&self) -> &[CollisionEvent] {
        &self.events
    }

    /// Remove and return every queued event, oldest first
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, CollisionEvent> {
        self.events.drain(..)
    }

    /// Forget tracked contacts and queued events
    pub fn clear(&mut self) {
        self.contacts.clear();
        self.previous.clear();
        self.events.clear();
    }
}

impl System for CollisionResolver {
    fn run(&mut self, world: &mut World, ctx: &StepContext<'_>) -> usize {
        self.resolve(world, ctx.config())
    }

    fn name(&self) -> &str {
        "CollisionResolver"
    }
}

fn position(world: &World, entity: Entity) -> Option<Vec2> {
    world.get::<TransformComponent>(entity).map(|t| t.position)
}

/// Snapshot of the response-relevant state of one side of a contact
#[derive(Debug, Clone, Copy)]
struct Body {
    velocity: Vec2,
    restitution: f32,
    inverse_mass: f32,
    movable: bool,
    accepts_impulse: bool,
}

impl Body {
    fn read(world: &World, entity: Entity) -> Body {
        let physics = world.get::<PhysicsComponent>(entity);
        let velocity = world.get::<VelocityComponent>(entity).map(|v| v.velocity);
        let movable = physics.map_or(false, |p| !p.is_static());

        Body {
            velocity: velocity.unwrap_or(Vec2::ZERO),
            restitution: physics.map_or(1.0, |p| p.restitution()),
            inverse_mass: physics.map_or(0.0, |p| p.inverse_mass()),
            movable,
            accepts_impulse: movable && velocity.is_some(),
        }
    }
}

/// Exchange an impulse between `a` and `b` and separate them
///
/// Returns false when the bodies are already separating.
fn respond(
    world: &mut World,
    a: Entity,
    b: Entity,
    normal: Vec2,
    separation: f32,
    model: ImpulseModel,
) -> bool {
    let body_a = Body::read(world, a);
    let body_b = Body::read(world, b);

    let closing = (body_a.velocity - body_b.velocity).dot(normal);
    if closing >= 0.0 {
        return false;
    }

    let restitution = body_a.restitution.min(body_b.restitution);
    let impulse = normal * (-(1.0 + restitution) * closing);
    let (share_a, share_b) = impulse_shares(model, &body_a, &body_b);

    if body_a.accepts_impulse {
        if let Some(motion) = world.get_mut::<VelocityComponent>(a) {
            motion.velocity += impulse * share_a;
        }
    }
    if body_b.accepts_impulse {
        if let Some(motion) = world.get_mut::<VelocityComponent>(b) {
            motion.velocity -= impulse * share_b;
        }
    }

    if body_a.movable {
        if let Some(transform) = world.get_mut::<TransformComponent>(a) {
            transform.position += normal * separation;
        }
    }
    if body_b.movable {
        if let Some(transform) = world.get_mut::<TransformComponent>(b) {
            transform.position -= normal * separation;
        }
    }

    true
}

/// Fraction of the impulse each side receives
fn impulse_shares(model: ImpulseModel, a: &Body, b: &Body) -> (f32, f32) {
    match model {
        ImpulseModel::Unweighted => (1.0, 1.0),
        ImpulseModel::MassWeighted => {
            let weight_a = if a.accepts_impulse { a.inverse_mass } else { 0.0 };
            let weight_b = if b.accepts_impulse { b.inverse_mass } else { 0.0 };
            let total = weight_a + weight_b;
            if total > 0.0 {
                (weight_a / total, weight_b / total)
            } else {
                (0.0, 0.0)
            }
        }
    }
}
