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
//! Collider component

use super::CollisionShape;
use crate::ecs::Component;

/// Collision shape attached to an entity
///
/// A trigger collider reports overlaps through collision events but takes
/// no part in the physical response. The tag is free-form and never read by
/// the resolver.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColliderComponent {
    /// Geometry, placed relative to the entity's transform
    pub shape: CollisionShape,
    /// Detect overlaps without responding to them
    pub is_trigger: bool,
    /// Label for collaborators filtering events
    pub tag: String,
}

impl ColliderComponent {
    /// Tag given to colliders created without one
    pub const DEFAULT_TAG: &'static str = "Default";

    /// Solid collider
    pub fn new(shape: CollisionShape) -> Self {
        ColliderComponent {
            shape,
            is_trigger: false,
            tag: Self::DEFAULT_TAG.to_string(),
        }
    }

    /// Trigger collider
    pub fn trigger(shape: CollisionShape) -> Self {
        ColliderComponent {
            is_trigger: true,
            ..Self::new(shape)
        }
    }

    /// Builder: replace the tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }
}

impl Component for ColliderComponent {}
