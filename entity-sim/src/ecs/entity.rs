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
//! Entity handles
//!
//! An entity carries no data of its own. What it "is" depends entirely on
//! the components the [`World`](crate::ecs::World) holds for it.

use std::fmt;

/// Slot index of an entity inside the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(u32);

impl EntityId {
    /// Wrap a raw slot index
    pub fn new(id: u32) -> Self {
        EntityId(id)
    }

    /// Raw slot index
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque, copyable entity handle
///
/// The generation is bumped every time a slot is recycled, so a handle to a
/// destroyed entity never aliases the slot's next occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    id: EntityId,
    generation: u32,
}

impl Entity {
    /// Build a handle from a slot index and generation
    pub fn new(id: u32, generation: u32) -> Self {
        Entity {
            id: EntityId::new(id),
            generation,
        }
    }

    /// Slot index
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Generation of the slot when this handle was issued
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.id.0, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_accessors() {
        let entity = Entity::new(42, 3);
        assert_eq!(entity.id().raw(), 42);
        assert_eq!(entity.generation(), 3);
        assert_eq!(entity.to_string(), "Entity(42v3)");
    }

    #[test]
    fn test_generation_distinguishes_handles() {
        let first = Entity::new(1, 0);
        let recycled = Entity::new(1, 1);
        assert_ne!(first, recycled);
        assert!(first < recycled);
    }
}
