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
//! Global simulation tunables
//!
//! The tick driver hands a [`SimulationConfig`] to every system through the
//! [`StepContext`](crate::ecs::StepContext). It may be changed between ticks.

use glam::Vec2;

/// How collision impulses are distributed between the two bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImpulseModel {
    /// Both bodies receive the full impulse as a velocity change, as if every
    /// body had unit mass. Momentum is not conserved when masses differ.
    #[default]
    Unweighted,
    /// Impulse is scaled by `1 / (1/m_a + 1/m_b)` and each body's velocity
    /// changes by `impulse / m`. Static bodies count as infinite mass.
    MassWeighted,
}

/// Tunables consumed by the motion and collision systems
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationConfig {
    /// Global gravity in units per second squared
    pub gravity: Vec2,
    /// Master switch for collision detection and response
    pub collision_resolution: bool,
    /// Impulse distribution rule
    pub impulse_model: ImpulseModel,
    /// Fraction of the combined approximate radii used to push overlapping
    /// bodies apart each tick
    pub separation_fraction: f32,
}

impl SimulationConfig {
    /// Default gravity: 980 units/s² downward in screen space
    pub const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, 980.0);

    /// Default positional correction fraction
    pub const DEFAULT_SEPARATION_FRACTION: f32 = 0.01;

    /// Configuration with the given gravity and everything else default
    pub fn new(gravity: Vec2) -> Self {
        SimulationConfig {
            gravity,
            ..Self::default()
        }
    }

    /// Zero gravity, collisions on
    pub fn weightless() -> Self {
        Self::new(Vec2::ZERO)
    }

    /// Set the global gravity
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Enable or disable collision resolution
    pub fn with_collision_resolution(mut self, enabled: bool) -> Self {
        self.collision_resolution = enabled;
        self
    }

    /// Select the impulse model
    pub fn with_impulse_model(mut self, model: ImpulseModel) -> Self {
        self.impulse_model = model;
        self
    }

    /// Set the positional correction fraction (negative values become 0)
    pub fn with_separation_fraction(mut self, fraction: f32) -> Self {
        self.separation_fraction =
            crate::ecs::components::clamp_setting("separation_fraction", fraction, 0.0, 1.0);
        self
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            gravity: Self::DEFAULT_GRAVITY,
            collision_resolution: true,
            impulse_model: ImpulseModel::Unweighted,
            separation_fraction: Self::DEFAULT_SEPARATION_FRACTION,
        }
    }
}
