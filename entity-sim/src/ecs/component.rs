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
//! Component storage
//!
//! Components are plain data attached to entities. Each component type lives
//! in its own [`DenseStorage`]: a packed array plus a sparse entity-to-slot
//! map. Iteration follows insertion order, which is what makes a tick
//! reproducible from one run to the next.

use crate::ecs::Entity;
use std::any::Any;
use std::collections::HashMap;

/// Marker trait for component types
///
/// Components should be plain data. Behaviour belongs in systems.
pub trait Component: 'static + Send + Sync {}

/// Storage interface for a single component type
pub trait ComponentStorage: Send + Sync {
    /// The component type this storage manages
    type Component: Component;

    /// Insert or replace the component for `entity`, returning the old value
    fn insert(&mut self, entity: Entity, component: Self::Component) -> Option<Self::Component>;

    /// Remove the component for `entity`
    fn remove(&mut self, entity: Entity) -> Option<Self::Component>;

    /// Shared access to the component for `entity`
    fn get(&self, entity: Entity) -> Option<&Self::Component>;

    /// Exclusive access to the component for `entity`
    fn get_mut(&mut self, entity: Entity) -> Option<&mut Self::Component>;

    /// Whether `entity` has this component
    fn contains(&self, entity: Entity) -> bool;

    /// Drop every component
    fn clear(&mut self);
}

/// Packed, insertion-ordered component storage
///
/// Removal shifts the tail down instead of swapping, so the relative order of
/// the remaining entities never changes. Removal is O(n), which is fine for
/// the entity counts this crate targets and keeps queries deterministic.
///
/// # Example
///
/// ```
/// use entity_sim::ecs::{ComponentStorage, DenseStorage, Entity};
/// use entity_sim::ecs::components::TransformComponent;
/// use glam::Vec2;
///
/// let mut storage = DenseStorage::<TransformComponent>::new();
/// let entity = Entity::new(1, 0);
///
/// storage.insert(entity, TransformComponent::at(Vec2::new(1.0, 2.0)));
/// assert!(storage.contains(entity));
/// assert_eq!(storage.get(entity).unwrap().position.x, 1.0);
/// ```
pub struct DenseStorage<T: Component> {
    entity_to_index: HashMap<Entity, usize>,
    entities: Vec<Entity>,
    components: Vec<T>,
}

impl<T: Component> DenseStorage<T> {
    /// Create an empty storage
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty storage with room for `capacity` components
    pub fn with_capacity(capacity: usize) -> Self {
        DenseStorage {
            entity_to_index: HashMap::with_capacity(capacity),
            entities: Vec::with_capacity(capacity),
            components: Vec::with_capacity(capacity),
        }
    }

    /// Number of stored components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the storage is empty
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Owners of the stored components, in insertion order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// The packed component array, aligned with [`entities`](Self::entities)
    pub fn components(&self) -> &[T] {
        &self.components
    }

    /// The packed component array, mutable
    pub fn components_mut(&mut self) -> &mut [T] {
        &mut self.components
    }

    /// Iterate `(entity, component)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        self.entities.iter().copied().zip(self.components.iter())
    }

    /// Iterate `(entity, component)` pairs mutably in insertion order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> + '_ {
        self.entities.iter().copied().zip(self.components.iter_mut())
    }

    /// Slot of `entity` in the packed array
    pub fn get_index(&self, entity: Entity) -> Option<usize> {
        self.entity_to_index.get(&entity).copied()
    }
}

impl<T: Component> Default for DenseStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ComponentStorage for DenseStorage<T> {
    type Component = T;

    fn insert(&mut self, entity: Entity, component: T) -> Option<T> {
        if let Some(&index) = self.entity_to_index.get(&entity) {
            return Some(std::mem::replace(&mut self.components[index], component));
        }

        self.entity_to_index.insert(entity, self.components.len());
        self.entities.push(entity);
        self.components.push(component);

        debug_assert_eq!(self.entity_to_index.len(), self.entities.len());
        debug_assert_eq!(self.entities.len(), self.components.len());
        None
    }

    fn remove(&mut self, entity: Entity) -> Option<T> {
        let index = self.entity_to_index.remove(&entity)?;
        self.entities.remove(index);
        let component = self.components.remove(index);

        for (slot, shifted) in self.entities.iter().enumerate().skip(index) {
            self.entity_to_index.insert(*shifted, slot);
        }

        debug_assert_eq!(self.entity_to_index.len(), self.entities.len());
        Some(component)
    }

    fn get(&self, entity: Entity) -> Option<&T> {
        let index = self.entity_to_index.get(&entity)?;
        Some(&self.components[*index])
    }

    fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let index = self.entity_to_index.get(&entity)?;
        Some(&mut self.components[*index])
    }

    fn contains(&self, entity: Entity) -> bool {
        self.entity_to_index.contains_key(&entity)
    }

    fn clear(&mut self) {
        self.entity_to_index.clear();
        self.entities.clear();
        self.components.clear();
    }
}

/// Type-erased view of a [`DenseStorage`] so the world can hold one per type
pub(crate) trait ErasedStorage: Send + Sync {
    fn remove_entity(&mut self, entity: Entity);
    fn clear(&mut self);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedStorage for DenseStorage<T> {
    fn remove_entity(&mut self, entity: Entity) {
        ComponentStorage::remove(self, entity);
    }

    fn clear(&mut self) {
        ComponentStorage::clear(self);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Tag(u32);

    impl Component for Tag {}

    #[test]
    fn test_insert_and_replace() {
        let mut storage = DenseStorage::<Tag>::new();
        let entity = Entity::new(1, 0);

        assert_eq!(storage.insert(entity, Tag(1)), None);
        assert_eq!(storage.insert(entity, Tag(2)), Some(Tag(1)));
        assert_eq!(storage.len(), 1);
        assert_eq!(storage.get(entity), Some(&Tag(2)));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut storage = DenseStorage::<Tag>::new();
        let entities: Vec<Entity> = (0..5).map(|i| Entity::new(i, 0)).collect();
        for (i, e) in entities.iter().enumerate() {
            storage.insert(*e, Tag(i as u32));
        }

        assert_eq!(storage.remove(entities[1]), Some(Tag(1)));
        assert_eq!(
            storage.entities(),
            &[entities[0], entities[2], entities[3], entities[4]]
        );

        // Indices of shifted entities must still resolve
        assert_eq!(storage.get(entities[4]), Some(&Tag(4)));
        assert_eq!(storage.get_index(entities[2]), Some(1));
    }

    #[test]
    fn test_missing_entity_is_absent_not_error() {
        let mut storage = DenseStorage::<Tag>::new();
        let entity = Entity::new(7, 0);
        assert!(storage.get(entity).is_none());
        assert!(storage.get_mut(entity).is_none());
        assert!(storage.remove(entity).is_none());
    }

    #[test]
    fn test_generations_are_distinct_keys() {
        let mut storage = DenseStorage::<Tag>::new();
        let old = Entity::new(1, 0);
        let new = Entity::new(1, 1);

        storage.insert(old, Tag(1));
        assert!(!storage.contains(new));
        storage.remove(old);
        storage.insert(new, Tag(2));
        assert!(!storage.contains(old));
        assert_eq!(storage.get(new), Some(&Tag(2)));
    }

    #[test]
    fn test_iter_mut_updates_in_place() {
        let mut storage = DenseStorage::<Tag>::new();
        for i in 0..3 {
            storage.insert(Entity::new(i, 0), Tag(i));
        }
        for (_, tag) in storage.iter_mut() {
            tag.0 *= 10;
        }
        let values: Vec<u32> = storage.components().iter().map(|t| t.0).collect();
        assert_eq!(values, vec![0, 10, 20]);
    }

    #[test]
    fn test_clear() {
        let mut storage = DenseStorage::<Tag>::with_capacity(16);
        storage.insert(Entity::new(1, 0), Tag(1));
        storage.insert(Entity::new(2, 0), Tag(2));
        ComponentStorage::clear(&mut storage);
        assert!(storage.is_empty());
        assert!(storage.entities().is_empty());
    }
}
