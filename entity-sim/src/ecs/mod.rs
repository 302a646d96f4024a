//! Entity Component System core
//!
//! This module provides:
//! - Generational entity handles
//! - Insertion-ordered dense component storage
//! - The `World` store and tuple queries over it
//! - The `System` trait every simulation stage implements

mod entity;
mod component;
mod query;
mod system;
mod world;

pub mod components;

pub use entity::{Entity, EntityId};
pub use component::{Component, ComponentStorage, DenseStorage};
pub use query::ComponentSet;
pub use system::{StepContext, System};
pub use world::World;

#[cfg(test)]
mod tests {
    use super::*;
    use components::{TransformComponent, VelocityComponent};

    #[test]
    fn test_world_creation() {
        let world = World::new();
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn test_components_round_trip_through_world() {
        let mut world = World::new();
        let entity = world.create_entity();
        world.insert(entity, TransformComponent::default()).unwrap();
        world.insert(entity, VelocityComponent::default()).unwrap();

        if let Some(transform) = world.get_mut::<TransformComponent>(entity) {
            transform.rotation = 1.5;
        }
        assert_eq!(world.get::<TransformComponent>(entity).unwrap().rotation, 1.5);
        assert_eq!(world.query::<(TransformComponent, VelocityComponent)>().count(), 1);
    }
}
