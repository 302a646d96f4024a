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
//! Component-set queries
//!
//! A query names a tuple of component types. The first type drives the
//! iteration order; the rest are membership filters.

use crate::ecs::{Component, Entity, World};

/// A tuple of component types usable with [`World::query`]
pub trait ComponentSet {
    /// Entities owning the leading component, in storage order
    fn lead(world: &World) -> &[Entity];

    /// Whether `entity` also owns every other component of the set
    fn matches(world: &World, entity: Entity) -> bool;
}

macro_rules! impl_component_set {
    ($head:ident $(, $tail:ident)*) => {
        impl<$head: Component $(, $tail: Component)*> ComponentSet for ($head, $($tail,)*) {
            fn lead(world: &World) -> &[Entity] {
                match world.storage::<$head>() {
                    Some(storage) => storage.entities(),
                    None => &[],
                }
            }

            #[allow(unused_variables)]
            fn matches(world: &World, entity: Entity) -> bool {
                true $(&& world.has::<$tail>(entity))*
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
