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
//! Collider shapes and overlap tests
//!
//! Two shape kinds are supported, circles and axis-aligned rectangles. Each
//! carries an offset from the owning entity's transform position. A circle
//! is centred on `position + offset`; a rectangle's top-left corner sits at
//! `position + offset` and it extends towards +x/+y (screen space).

use crate::ecs::components::clamp_setting;
use glam::Vec2;

/// Geometry of a collision shape, without placement
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShapeKind {
    /// Circle of the given radius
    Circle {
        /// Radius
        radius: f32,
    },
    /// Axis-aligned rectangle
    Rect {
        /// Extent along x
        width: f32,
        /// Extent along y
        height: f32,
    },
}

/// Axis-aligned bounding box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner
    pub max: Vec2,
}

impl Aabb {
    /// Strict overlap test; boxes that only share an edge do not overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Closest point inside the box to `point`
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }

    /// Box extent
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// A circle or rectangle with an offset from its owner's position
///
/// # Examples
///
/// ```
/// use entity_sim::collision::CollisionShape;
/// use glam::Vec2;
///
/// let ball = CollisionShape::circle(10.0);
/// let wall = CollisionShape::rect(100.0, 20.0);
///
/// assert!(ball.intersects(Vec2::new(50.0, 5.0), &wall, Vec2::ZERO));
/// assert!(!ball.intersects(Vec2::new(50.0, -15.0), &wall, Vec2::ZERO));
/// assert_eq!(wall.approximate_radius(), 50.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollisionShape {
    kind: ShapeKind,
    offset: Vec2,
}

impl CollisionShape {
    /// Circle centred on the owner's position
    ///
    /// Negative or NaN radii are clamped to zero.
    pub fn circle(radius: f32) -> Self {
        CollisionShape {
            kind: ShapeKind::Circle {
                radius: clamp_setting("radius", radius, 0.0, f32::MAX),
            },
            offset: Vec2::ZERO,
        }
    }

    /// Rectangle whose top-left corner is at the owner's position
    ///
    /// Negative or NaN extents are clamped to zero.
    pub fn rect(width: f32, height: f32) -> Self {
        CollisionShape {
            kind: ShapeKind::Rect {
                width: clamp_setting("width", width, 0.0, f32::MAX),
                height: clamp_setting("height", height, 0.0, f32::MAX),
            },
            offset: Vec2::ZERO,
        }
    }

    /// Builder: displacement from the owner's position
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Shape geometry
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Displacement from the owner's position
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Radius used to size positional correction
    ///
    /// The radius for circles, half the longer side for rectangles.
    pub fn approximate_radius(&self) -> f32 {
        match self.kind {
            ShapeKind::Circle { radius } => radius,
            ShapeKind::Rect { width, height } => width.max(height) / 2.0,
        }
    }

    /// World-space bounds when the owner is at `position`
    pub fn bounds(&self, position: Vec2) -> Aabb {
        let anchor = position + self.offset;
        match self.kind {
            ShapeKind::Circle { radius } => Aabb {
                min: anchor - Vec2::splat(radius),
                max: anchor + Vec2::splat(radius),
            },
            ShapeKind::Rect { width, height } => Aabb {
                min: anchor,
                max: anchor + Vec2::new(width, height),
            },
        }
    }

    /// Whether this shape placed at `position` overlaps `other` placed at
    /// `other_position`
    ///
    /// Touching shapes do not intersect.
    pub fn intersects(&self, position: Vec2, other: &CollisionShape, other_position: Vec2) -> bool {
        match (self.kind, other.kind) {
            (ShapeKind::Circle { radius: ra }, ShapeKind::Circle { radius: rb }) => {
                let a = position + self.offset;
                let b = other_position + other.offset;
                a.distance(b) < ra + rb
            }
            (ShapeKind::Rect { .. }, ShapeKind::Rect { .. }) => {
                self.bounds(position).overlaps(&other.bounds(other_position))
            }
            (ShapeKind::Circle { radius }, ShapeKind::Rect { .. }) => {
                circle_rect(position + self.offset, radius, &other.bounds(other_position))
            }
            (ShapeKind::Rect { .. }, ShapeKind::Circle { radius }) => {
                circle_rect(other_position + other.offset, radius, &self.bounds(position))
            }
        }
    }
}

fn circle_rect(centre: Vec2, radius: f32, rect: &Aabb) -> bool {
    centre.distance(rect.closest_point(centre)) < radius
}
