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
//! Collision response properties
//!
//! Impulse exchange under both impulse models, static and trigger
//! invariance, event sequencing and determinism.

use entity_sim::collision::{
    ColliderComponent, CollisionEventKind, CollisionResolver, CollisionShape,
};
use entity_sim::ecs::components::{PhysicsComponent, TransformComponent, VelocityComponent};
use entity_sim::ecs::{Entity, World};
use entity_sim::integration::{total_kinetic_energy, total_momentum};
use entity_sim::{ImpulseModel, SimulationConfig};
use glam::Vec2;

const EPSILON: f32 = 1e-3;

fn ball(world: &mut World, x: f32, vx: f32, physics: PhysicsComponent) -> Entity {
    let entity = world.create_entity();
    world.insert(entity, TransformComponent::at(Vec2::new(x, 0.0))).unwrap();
    world.insert(entity, VelocityComponent::new(Vec2::new(vx, 0.0))).unwrap();
    world.insert(entity, physics).unwrap();
    world
        .insert(entity, ColliderComponent::new(CollisionShape::circle(10.0)))
        .unwrap();
    entity
}

fn velocity(world: &World, entity: Entity) -> Vec2 {
    world.get::<VelocityComponent>(entity).unwrap().velocity
}

fn position(world: &World, entity: Entity) -> Vec2 {
    world.get::<TransformComponent>(entity).unwrap().position
}

#[test]
fn test_elastic_example_unweighted() {
    let mut world = World::new();
    let left = ball(&mut world, 0.0, 100.0, PhysicsComponent::new(1.0).with_restitution(0.5));
    let right = ball(&mut world, 15.0, -100.0, PhysicsComponent::new(1.0).with_restitution(0.5));

    let config = SimulationConfig::weightless();
    CollisionResolver::new().resolve(&mut world, &config);

    // closing speed 200, impulse 1.5 * 200 applied in full to each side
    assert!((velocity(&world, left).x + 200.0).abs() < EPSILON);
    assert!((velocity(&world, right).x - 200.0).abs() < EPSILON);
}

#[test]
fn test_elastic_example_mass_weighted() {
    let mut world = World::new();
    let left = ball(&mut world, 0.0, 100.0, PhysicsComponent::new(1.0).with_restitution(0.5));
    let right = ball(&mut world, 15.0, -100.0, PhysicsComponent::new(1.0).with_restitution(0.5));

    let config = SimulationConfig::weightless().with_impulse_model(ImpulseModel::MassWeighted);
    CollisionResolver::new().resolve(&mut world, &config);

    // relative velocity goes from -200 to +100: reversed and scaled by e
    assert!((velocity(&world, left).x + 50.0).abs() < EPSILON);
    assert!((velocity(&world, right).x - 50.0).abs() < EPSILON);
    let relative = velocity(&world, right).x - velocity(&world, left).x;
    assert!((relative - 0.5 * 200.0).abs() < EPSILON);
}

#[test]
fn test_mass_weighted_conserves_momentum() {
    let mut world = World::new();
    let light = ball(&mut world, 0.0, 10.0, PhysicsComponent::new(1.0).with_restitution(1.0));
    let heavy = ball(&mut world, 15.0, -10.0, PhysicsComponent::new(3.0).with_restitution(1.0));

    let momentum_before = total_momentum(&world);
    let energy_before = total_kinetic_energy(&world);

    let config = SimulationConfig::weightless().with_impulse_model(ImpulseModel::MassWeighted);
    CollisionResolver::new().resolve(&mut world, &config);

    assert!((total_momentum(&world) - momentum_before).length() < EPSILON);
    assert!((total_kinetic_energy(&world) - energy_before).abs() < EPSILON);
    assert!((velocity(&world, light).x + 20.0).abs() < EPSILON);
    assert!(velocity(&world, heavy).x.abs() < EPSILON);
}

#[test]
fn test_lower_restitution_wins() {
    let mut world = World::new();
    let a = ball(&mut world, 0.0, 100.0, PhysicsComponent::new(1.0).with_restitution(0.2));
    let b = ball(&mut world, 15.0, -100.0, PhysicsComponent::new(1.0).with_restitution(0.9));

    CollisionResolver::new().resolve(&mut world, &SimulationConfig::weightless());

    assert!((velocity(&world, a).x + 140.0).abs() < EPSILON);
    assert!((velocity(&world, b).x - 140.0).abs() < EPSILON);
}

#[test]
fn test_static_invariance() {
    let mut world = World::new();
    let ball_entity = ball(&mut world, 0.0, 100.0, PhysicsComponent::new(1.0));
    let wall = ball(&mut world, 15.0, 0.0, PhysicsComponent::immovable());

    let mut resolver = CollisionResolver::new();
    for model in [ImpulseModel::Unweighted, ImpulseModel::MassWeighted] {
        let config = SimulationConfig::weightless().with_impulse_model(model);
        world
            .get_mut::<VelocityComponent>(ball_entity)
            .unwrap()
            .velocity = Vec2::new(100.0, 0.0);
        world
            .get_mut::<TransformComponent>(ball_entity)
            .unwrap()
            .position = Vec2::ZERO;

        resolver.resolve(&mut world, &config);

        assert_eq!(position(&world, wall), Vec2::new(15.0, 0.0));
        assert_eq!(velocity(&world, wall), Vec2::ZERO);
        // full reflection with e = 0.5 against an immovable body
        assert!((velocity(&world, ball_entity).x + 50.0).abs() < EPSILON);
        assert!(position(&world, ball_entity).x < 0.0);
    }
}

#[test]
fn test_trigger_non_interference() {
    let mut world = World::new();
    let mover = ball(&mut world, 0.0, 100.0, PhysicsComponent::new(1.0));
    let zone = world.create_entity();
    world.insert(zone, TransformComponent::at(Vec2::new(5.0, 0.0))).unwrap();
    world.insert(zone, VelocityComponent::new(Vec2::new(-100.0, 0.0))).unwrap();
    world.insert(zone, PhysicsComponent::new(1.0)).unwrap();
    world
        .insert(zone, ColliderComponent::trigger(CollisionShape::circle(10.0)).with_tag("zone"))
        .unwrap();

    let mut resolver = CollisionResolver::new();
    let contacts = resolver.resolve(&mut world, &SimulationConfig::default());

    assert_eq!(contacts, 1);
    assert_eq!(velocity(&world, mover), Vec2::new(100.0, 0.0));
    assert_eq!(velocity(&world, zone), Vec2::new(-100.0, 0.0));
    assert_eq!(position(&world, mover), Vec2::ZERO);
    assert_eq!(position(&world, zone), Vec2::new(5.0, 0.0));

    let events: Vec<_> = resolver.drain_events().collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, CollisionEventKind::Enter);
    assert!(events[0].trigger);
    assert_eq!(world.get::<ColliderComponent>(zone).unwrap().tag, "zone");

    world.get_mut::<TransformComponent>(zone).unwrap().position.x = 500.0;
    resolver.resolve(&mut world, &SimulationConfig::default());
    let events: Vec<_> = resolver.drain_events().collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, CollisionEventKind::Exit);
    assert!(events[0].trigger);
}

#[test]
fn test_response_is_symmetric_in_query_order() {
    // The first collider has no velocity; the second must still bounce
    let mut world = World::new();
    let post = world.create_entity();
    world.insert(post, TransformComponent::default()).unwrap();
    world.insert(post, PhysicsComponent::new(1.0)).unwrap();
    world
        .insert(post, ColliderComponent::new(CollisionShape::circle(10.0)))
        .unwrap();
    let mover = ball(&mut world, 15.0, -100.0, PhysicsComponent::new(1.0));

    CollisionResolver::new().resolve(&mut world, &SimulationConfig::weightless());

    assert!((velocity(&world, mover).x - 50.0).abs() < EPSILON);
    assert!(!world.has::<VelocityComponent>(post));
}

#[test]
fn test_missing_physics_does_not_move() {
    let mut world = World::new();
    let mover = ball(&mut world, 0.0, 100.0, PhysicsComponent::new(1.0).with_restitution(0.5));
    let scenery = world.create_entity();
    world.insert(scenery, TransformComponent::at(Vec2::new(15.0, 0.0))).unwrap();
    world.insert(scenery, VelocityComponent::new(Vec2::new(-20.0, 0.0))).unwrap();
    world
        .insert(scenery, ColliderComponent::new(CollisionShape::circle(10.0)))
        .unwrap();

    CollisionResolver::new().resolve(&mut world, &SimulationConfig::weightless());

    // closing speed 120, restitution min(0.5, 1.0)
    assert!((velocity(&world, mover).x - (100.0 - 1.5 * 120.0)).abs() < EPSILON);
    assert_eq!(velocity(&world, scenery), Vec2::new(-20.0, 0.0));
    assert_eq!(position(&world, scenery), Vec2::new(15.0, 0.0));
}

#[test]
fn test_circle_against_rectangle() {
    let mut world = World::new();
    let mover = ball(&mut world, 0.0, 0.0, PhysicsComponent::new(1.0));
    let block = world.create_entity();
    world.insert(block, TransformComponent::at(Vec2::new(8.0, -4.0))).unwrap();
    world
        .insert(block, ColliderComponent::new(CollisionShape::rect(20.0, 8.0)))
        .unwrap();

    let mut resolver = CollisionResolver::new();
    assert_eq!(resolver.resolve(&mut world, &SimulationConfig::weightless()), 1);
    assert!(resolver.is_touching(mover, block));

    world.get_mut::<TransformComponent>(block).unwrap().position.x = 10.0;
    assert_eq!(resolver.resolve(&mut world, &SimulationConfig::weightless()), 0);
}

#[test]
fn test_event_order_follows_detection_order() {
    let mut world = World::new();
    let a = ball(&mut world, 0.0, 0.0, PhysicsComponent::new(1.0));
    let b = ball(&mut world, 5.0, 0.0, PhysicsComponent::new(1.0));
    let c = ball(&mut world, 10.0, 0.0, PhysicsComponent::new(1.0));

    let mut resolver = CollisionResolver::new();
    resolver.resolve(&mut world, &SimulationConfig::weightless());

    let pairs: Vec<_> = resolver.drain_events().map(|e| (e.a, e.b)).collect();
    assert_eq!(pairs, vec![(a, b), (a, c), (b, c)]);

    world.destroy_entity(b);
    resolver.resolve(&mut world, &SimulationConfig::weightless());
    let exits: Vec<_> = resolver
        .drain_events()
        .filter(|e| e.kind == CollisionEventKind::Exit)
        .map(|e| (e.a, e.b))
        .collect();
    assert_eq!(exits, vec![(a, b), (b, c)]);
}

#[test]
fn test_resolution_is_deterministic() {
    fn build() -> World {
        let mut world = World::new();
        for i in 0..12 {
            let x = (i % 4) as f32 * 12.0;
            let y = (i / 4) as f32 * 12.0;
            let entity = world.create_entity();
            world.insert(entity, TransformComponent::at(Vec2::new(x, y))).unwrap();
            world
                .insert(entity, VelocityComponent::new(Vec2::new(10.0 - i as f32, i as f32 - 6.0)))
                .unwrap();
            world.insert(entity, PhysicsComponent::new(1.0 + i as f32)).unwrap();
            world
                .insert(entity, ColliderComponent::new(CollisionShape::circle(7.0)))
                .unwrap();
        }
        world
    }

    let config = SimulationConfig::weightless().with_impulse_model(ImpulseModel::MassWeighted);
    let mut first = build();
    let mut second = build();
    let mut r1 = CollisionResolver::new();
    let mut r2 = CollisionResolver::new();
    for _ in 0..5 {
        r1.resolve(&mut first, &config);
        r2.resolve(&mut second, &config);
    }

    let snapshot = |world: &World| -> Vec<(Vec2, Vec2)> {
        world
            .query::<(TransformComponent, VelocityComponent)>()
            .map(|e| (position(world, e), velocity(world, e)))
            .collect()
    };
    assert_eq!(snapshot(&first), snapshot(&second));
    assert_eq!(r1.events(), r2.events());
}
