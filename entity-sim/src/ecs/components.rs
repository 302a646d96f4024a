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
//! Rigid-body components
//!
//! Transform, velocity and physics data for 2D bodies. Positions use
//! screen-space conventions: +y points down, rotation is in radians.

use crate::ecs::Component;
use crate::error::{Result, SimError};
use glam::Vec2;

/// Position, rotation and scale of an entity
///
/// # Examples
///
/// ```
/// use entity_sim::ecs::components::TransformComponent;
/// use glam::Vec2;
///
/// let transform = TransformComponent::at(Vec2::new(10.0, 20.0));
/// assert_eq!(transform.scale, Vec2::ONE);
/// assert!(transform.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransformComponent {
    /// World position
    pub position: Vec2,
    /// Rotation in radians
    pub rotation: f32,
    /// Per-axis scale
    pub scale: Vec2,
}

impl TransformComponent {
    /// Transform at `position` with no rotation and unit scale
    pub fn at(position: Vec2) -> Self {
        TransformComponent {
            position,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }

    /// Fully specified transform
    pub fn new(position: Vec2, rotation: f32, scale: Vec2) -> Self {
        TransformComponent {
            position,
            rotation,
            scale,
        }
    }

    /// Check that no field is NaN or infinite
    pub fn is_valid(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }
}

impl Default for TransformComponent {
    fn default() -> Self {
        TransformComponent::at(Vec2::ZERO)
    }
}

impl Component for TransformComponent {}

/// Linear motion state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VelocityComponent {
    /// Units per second
    pub velocity: Vec2,
    /// Units per second squared, recomputed from forces every tick
    pub acceleration: Vec2,
    /// Speed cap; 0 means unlimited
    pub max_speed: f32,
}

impl VelocityComponent {
    /// Velocity with no speed cap
    pub fn new(velocity: Vec2) -> Self {
        VelocityComponent {
            velocity,
            acceleration: Vec2::ZERO,
            max_speed: 0.0,
        }
    }

    /// Velocity capped at `max_speed`
    pub fn with_max_speed(velocity: Vec2, max_speed: f32) -> Self {
        VelocityComponent {
            velocity,
            acceleration: Vec2::ZERO,
            max_speed: max_speed.max(0.0),
        }
    }

    /// Current speed
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Check that no field is NaN or infinite
    pub fn is_valid(&self) -> bool {
        self.velocity.is_finite() && self.acceleration.is_finite() && self.max_speed.is_finite()
    }
}

impl Component for VelocityComponent {}

/// Mass properties and the per-tick force accumulator
///
/// Mass is validated at construction: non-positive or non-finite values are
/// clamped to [`PhysicsComponent::MIN_MASS`] by [`new`](Self::new) and
/// rejected by [`try_new`](Self::try_new). The accumulated force is transient;
/// the motion integrator consumes and clears it every tick.
///
/// # Examples
///
/// ```
/// use entity_sim::ecs::components::PhysicsComponent;
///
/// let body = PhysicsComponent::new(2.0).with_drag(0.5).with_restitution(0.8);
/// assert_eq!(body.mass(), 2.0);
/// assert!(!body.is_static());
///
/// let clamped = PhysicsComponent::new(0.0);
/// assert_eq!(clamped.mass(), PhysicsComponent::MIN_MASS);
///
/// assert!(PhysicsComponent::try_new(-1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "PhysicsRecord"))]
pub struct PhysicsComponent {
    mass: f32,
    drag: f32,
    gravity_scale: f32,
    restitution: f32,
    is_static: bool,
    accumulated_force: Vec2,
}

impl PhysicsComponent {
    /// Smallest mass a body may have
    pub const MIN_MASS: f32 = 1e-4;

    /// Dynamic body with the given mass, clamping invalid values
    pub fn new(mass: f32) -> Self {
        PhysicsComponent {
            mass: sanitize_mass(mass),
            ..Self::default()
        }
    }

    /// Dynamic body with the given mass, rejecting invalid values
    ///
    /// Accepts exactly the masses [`new`](Self::new) keeps unchanged:
    /// finite and at least [`MIN_MASS`](Self::MIN_MASS).
    pub fn try_new(mass: f32) -> Result<Self> {
        if mass >= Self::MIN_MASS && mass.is_finite() {
            Ok(PhysicsComponent {
                mass,
                ..Self::default()
            })
        } else {
            Err(SimError::InvalidMass(mass))
        }
    }

    /// Immovable body: ignored by forces, impulses and positional correction
    pub fn immovable() -> Self {
        PhysicsComponent {
            is_static: true,
            gravity_scale: 0.0,
            ..Self::default()
        }
    }

    /// Builder: exponential drag coefficient (per second)
    pub fn with_drag(mut self, drag: f32) -> Self {
        self.set_drag(drag);
        self
    }

    /// Builder: multiplier on the global gravity
    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.set_gravity_scale(scale);
        self
    }

    /// Builder: bounce retention in `[0, 1]`
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.set_restitution(restitution);
        self
    }

    /// Builder: static flag
    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    /// Mass in simulation units
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Change the mass, clamping invalid values
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = sanitize_mass(mass);
    }

    /// `1 / mass`, or 0 for static bodies
    pub fn inverse_mass(&self) -> f32 {
        if self.is_static {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    /// Drag coefficient
    pub fn drag(&self) -> f32 {
        self.drag
    }

    /// Set the drag coefficient; negative or non-finite values become 0
    pub fn set_drag(&mut self, drag: f32) {
        self.drag = clamp_setting("drag", drag, 0.0, f32::MAX);
    }

    /// Gravity multiplier
    pub fn gravity_scale(&self) -> f32 {
        self.gravity_scale
    }

    /// Set the gravity multiplier
    pub fn set_gravity_scale(&mut self, scale: f32) {
        self.gravity_scale = clamp_setting("gravity_scale", scale, f32::MIN, f32::MAX);
    }

    /// Restitution coefficient
    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    /// Set the restitution; clamped to `[0, 1]`
    pub fn set_restitution(&mut self, restitution: f32) {
        self.restitution = clamp_setting("restitution", restitution, 0.0, 1.0);
    }

    /// Whether the body is immovable
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Mark the body static or dynamic
    pub fn set_static(&mut self, is_static: bool) {
        self.is_static = is_static;
    }

    /// Force accumulated since the last integration step
    pub fn accumulated_force(&self) -> Vec2 {
        self.accumulated_force
    }

    /// Add a force for the next integration step
    ///
    /// Returns false (and does nothing) for static bodies.
    pub fn apply_force(&mut self, force: Vec2) -> bool {
        if self.is_static {
            return false;
        }
        self.accumulated_force += force;
        true
    }

    /// Reset the accumulator to zero
    pub fn clear_forces(&mut self) {
        self.accumulated_force = Vec2::ZERO;
    }
}

impl Default for PhysicsComponent {
    fn default() -> Self {
        PhysicsComponent {
            mass: 1.0,
            drag: 0.0,
            gravity_scale: 1.0,
            restitution: 0.5,
            is_static: false,
            accumulated_force: Vec2::ZERO,
        }
    }
}

impl Component for PhysicsComponent {}

/// Wire form of [`PhysicsComponent`], checked before it becomes a body
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct PhysicsRecord {
    mass: f32,
    drag: f32,
    gravity_scale: f32,
    restitution: f32,
    is_static: bool,
    accumulated_force: Vec2,
}

#[cfg(feature = "serde")]
impl TryFrom<PhysicsRecord> for PhysicsComponent {
    type Error = SimError;

    fn try_from(record: PhysicsRecord) -> Result<Self> {
        let mut body = PhysicsComponent::try_new(record.mass)?;
        body.drag = in_range("drag", record.drag, 0.0, f32::MAX)?;
        body.gravity_scale = in_range("gravity_scale", record.gravity_scale, f32::MIN, f32::MAX)?;
        body.restitution = in_range("restitution", record.restitution, 0.0, 1.0)?;
        body.is_static = record.is_static;

        let force = record.accumulated_force;
        if !force.is_finite() {
            let value = if force.x.is_finite() { force.y } else { force.x };
            return Err(SimError::InvalidSetting {
                name: "accumulated_force",
                value,
            });
        }
        body.accumulated_force = force;
        Ok(body)
    }
}

#[cfg(feature = "serde")]
fn in_range(name: &'static str, value: f32, min: f32, max: f32) -> Result<f32> {
    if value >= min && value <= max {
        Ok(value)
    } else {
        Err(SimError::InvalidSetting { name, value })
    }
}

fn sanitize_mass(mass: f32) -> f32 {
    if mass > 0.0 && mass.is_finite() {
        mass.max(PhysicsComponent::MIN_MASS)
    } else {
        tracing::warn!(mass, "invalid mass clamped to {}", PhysicsComponent::MIN_MASS);
        PhysicsComponent::MIN_MASS
    }
}

/// Clamp a tunable into `[min, max]`, mapping NaN to `min`, and log changes
pub(crate) fn clamp_setting(name: &'static str, value: f32, min: f32, max: f32) -> f32 {
    let clamped = if value.is_nan() { min } else { value.clamp(min, max) };
    if clamped != value {
        tracing::warn!(setting = name, value, clamped, "setting out of range");
    }
    clamped
}
