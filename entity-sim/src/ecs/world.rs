//! World management
//!
//! The World owns every entity and every component. Content code creates
//! entities and attaches components; systems query and mutate them.

use crate::ecs::component::ErasedStorage;
use crate::ecs::query::ComponentSet;
use crate::ecs::{Component, ComponentStorage, DenseStorage, Entity};
use crate::error::{Result, SimError};
use std::any::TypeId;
use std::collections::HashMap;

/// The component store
///
/// Component storages are created lazily on first insert, one per type.
/// Entity slots are recycled through a free list; every recycle bumps the
/// slot generation so stale handles stay dead.
pub struct World {
    generations: Vec<u32>,
    alive: Vec<bool>,
    free_ids: Vec<u32>,
    entity_count: usize,
    storages: HashMap<TypeId, Box<dyn ErasedStorage>>,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a world with room for `capacity` entities
    pub fn with_capacity(capacity: usize) -> Self {
        World {
            generations: Vec::with_capacity(capacity),
            alive: Vec::with_capacity(capacity),
            free_ids: Vec::new(),
            entity_count: 0,
            storages: HashMap::new(),
        }
    }

    /// Create a new entity with no components
    pub fn create_entity(&mut self) -> Entity {
        let id = match self.free_ids.pop() {
            Some(id) => id,
            None => {
                self.generations.push(0);
                self.alive.push(false);
                (self.generations.len() - 1) as u32
            }
        };

        self.alive[id as usize] = true;
        self.entity_count += 1;
        Entity::new(id, self.generations[id as usize])
    }

    /// Destroy an entity and drop all of its components
    ///
    /// Returns false if the handle was already dead.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        if !self.is_entity_alive(entity) {
            return false;
        }

        for storage in self.storages.values_mut() {
            storage.remove_entity(entity);
        }

        let id = entity.id().raw() as usize;
        self.alive[id] = false;
        self.generations[id] = self.generations[id].wrapping_add(1);
        self.free_ids.push(id as u32);
        self.entity_count -= 1;
        true
    }

    /// Check if an entity is alive
    pub fn is_entity_alive(&self, entity: Entity) -> bool {
        let id = entity.id().raw() as usize;
        id < self.alive.len() && self.alive[id] && self.generations[id] == entity.generation()
    }

    /// Get the number of alive entities
    pub fn entity_count(&self) -> usize {
        self.entity_count
    }

    /// Destroy every entity and component
    pub fn clear(&mut self) {
        for storage in self.storages.values_mut() {
            storage.clear();
        }
        self.generations.clear();
        self.alive.clear();
        self.free_ids.clear();
        self.entity_count = 0;
    }

    /// Iterate over all alive entities in slot order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(id, _)| Entity::new(id as u32, self.generations[id]))
    }

    /// Attach a component, replacing and returning any previous one
    pub fn insert<T: Component>(&mut self, entity: Entity, component: T) -> Result<Option<T>> {
        if !self.is_entity_alive(entity) {
            return Err(SimError::DeadEntity(entity));
        }
        Ok(self.storage_or_default::<T>().insert(entity, component))
    }

    /// Detach a component
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.storage_mut::<T>()?.remove(entity)
    }

    /// Shared access to a component; absent is not an error
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.storage::<T>()?.get(entity)
    }

    /// Exclusive access to a component
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.storage_mut::<T>()?.get_mut(entity)
    }

    /// Whether `entity` owns a `T`
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.storage::<T>().map_or(false, |s| s.contains(entity))
    }

    /// The storage for `T`, if any `T` was ever inserted
    pub fn storage<T: Component>(&self) -> Option<&DenseStorage<T>> {
        self.storages
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<DenseStorage<T>>()
    }

    /// Mutable storage for `T`
    pub fn storage_mut<T: Component>(&mut self) -> Option<&mut DenseStorage<T>> {
        self.storages
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<DenseStorage<T>>()
    }

    /// Entities owning every component in the tuple `Q`
    ///
    /// The sequence is lazy and follows the insertion order of the first
    /// component type in `Q`. It borrows the world, so callers that mutate
    /// while walking the result must collect it first (see
    /// [`query_into`](Self::query_into)).
    ///
    /// ```
    /// use entity_sim::ecs::World;
    /// use entity_sim::ecs::components::{PhysicsComponent, TransformComponent};
    ///
    /// let mut world = World::new();
    /// let body = world.create_entity();
    /// world.insert(body, TransformComponent::default()).unwrap();
    /// world.insert(body, PhysicsComponent::default()).unwrap();
    /// world.create_entity();
    ///
    /// let bodies: Vec<_> = world.query::<(PhysicsComponent, TransformComponent)>().collect();
    /// assert_eq!(bodies, vec![body]);
    /// ```
    pub fn query<Q: ComponentSet>(&self) -> impl Iterator<Item = Entity> + '_ {
        Q::lead(self)
            .iter()
            .copied()
            .filter(move |entity| Q::matches(self, *entity))
    }

    /// Materialize a query into a reusable buffer
    ///
    /// The buffer is cleared first; its capacity is kept so per-tick callers
    /// do not reallocate once the entity count settles.
    pub fn query_into<Q: ComponentSet>(&self, out: &mut Vec<Entity>) {
        out.clear();
        out.extend(self.query::<Q>());
    }

    fn storage_or_default<T: Component>(&mut self) -> &mut DenseStorage<T> {
        self.storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(DenseStorage::<T>::new()) as Box<dyn ErasedStorage>)
            .as_any_mut()
            .downcast_mut::<DenseStorage<T>>()
            .expect("storage registered under the TypeId of its component")
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct A(i32);
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct B(i32);
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct C;

    impl Component for A {}
    impl Component for B {}
    impl Component for C {}

    #[test]
    fn test_world_entity_lifecycle() {
        let mut world = World::new();

        let e1 = world.create_entity();
        let e2 = world.create_entity();

        assert_eq!(world.entity_count(), 2);
        assert!(world.is_entity_alive(e1));
        assert!(world.is_entity_alive(e2));

        assert!(world.destroy_entity(e1));
        assert!(!world.destroy_entity(e1));
        assert_eq!(world.entity_count(), 1);
        assert!(!world.is_entity_alive(e1));
        assert!(world.is_entity_alive(e2));
    }

    #[test]
    fn test_slot_recycling_bumps_generation() {
        let mut world = World::new();

        let e1 = world.create_entity();
        world.destroy_entity(e1);
        let e2 = world.create_entity();

        assert_eq!(e2.id(), e1.id());
        assert_ne!(e2.generation(), e1.generation());
        assert!(!world.is_entity_alive(e1));
        assert!(world.insert(e1, A(1)).is_err());
    }

    #[test]
    fn test_destroy_drops_components() {
        let mut world = World::new();
        let e = world.create_entity();
        world.insert(e, A(1)).unwrap();
        world.insert(e, B(2)).unwrap();

        world.destroy_entity(e);
        assert!(world.storage::<A>().unwrap().is_empty());
        assert!(world.storage::<B>().unwrap().is_empty());
    }

    #[test]
    fn test_get_absent_component() {
        let mut world = World::new();
        let e = world.create_entity();
        assert!(world.get::<A>(e).is_none());
        assert!(!world.has::<A>(e));
        assert!(world.remove::<A>(e).is_none());
    }

    #[test]
    fn test_query_requires_all_components() {
        let mut world = World::new();
        let both = world.create_entity();
        let only_a = world.create_entity();
        let only_b = world.create_entity();

        world.insert(both, A(1)).unwrap();
        world.insert(both, B(1)).unwrap();
        world.insert(only_a, A(2)).unwrap();
        world.insert(only_b, B(3)).unwrap();

        let matched: Vec<Entity> = world.query::<(A, B)>().collect();
        assert_eq!(matched, vec![both]);

        let with_a: Vec<Entity> = world.query::<(A,)>().collect();
        assert_eq!(with_a, vec![both, only_a]);

        assert_eq!(world.query::<(A, B, C)>().count(), 0);
        assert_eq!(world.query::<(C,)>().count(), 0);
    }

    #[test]
    fn test_query_follows_insertion_order() {
        let mut world = World::new();
        let entities: Vec<Entity> = (0..4).map(|_| world.create_entity()).collect();
        for e in entities.iter().rev() {
            world.insert(*e, A(0)).unwrap();
        }

        let order: Vec<Entity> = world.query::<(A,)>().collect();
        let expected: Vec<Entity> = entities.iter().rev().copied().collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn test_query_into_reuses_buffer() {
        let mut world = World::new();
        for _ in 0..8 {
            let e = world.create_entity();
            world.insert(e, A(0)).unwrap();
        }

        let mut buffer = Vec::new();
        world.query_into::<(A,)>(&mut buffer);
        let capacity = buffer.capacity();
        world.query_into::<(A,)>(&mut buffer);
        assert_eq!(buffer.len(), 8);
        assert_eq!(buffer.capacity(), capacity);
    }

    #[test]
    fn test_world_clear() {
        let mut world = World::new();
        let e = world.create_entity();
        world.insert(e, A(1)).unwrap();
        world.create_entity();

        world.clear();
        assert_eq!(world.entity_count(), 0);
        assert_eq!(world.entities().count(), 0);
        assert_eq!(world.query::<(A,)>().count(), 0);
    }
}
