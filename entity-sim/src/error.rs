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
//! Error type shared by the simulation core
//!
//! Only configuration mistakes are errors. Missing components, exhausted
//! particle pools and degenerate geometry are handled locally by the systems.

use crate::ecs::Entity;
use thiserror::Error;

/// Errors reported by constructors and the tick driver
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Mass must be positive and finite
    #[error("mass must be positive and finite, got {0}")]
    InvalidMass(f32),

    /// Timestep must be non-negative and finite
    #[error("timestep must be non-negative and finite, got {0}")]
    InvalidTimestep(f32),

    /// A tunable is outside its valid range
    #[error("invalid value {value} for `{name}`")]
    InvalidSetting {
        /// Name of the offending field
        name: &'static str,
        /// Rejected value
        value: f32,
    },

    /// The entity was destroyed or never created by this world
    #[error("{0} is not alive")]
    DeadEntity(Entity),
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, SimError>;
