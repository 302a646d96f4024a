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
//! System execution framework
//!
//! Systems hold the per-tick logic. They are stateless with respect to the
//! simulation itself; whatever they keep between ticks is scratch space or
//! an event queue for collaborators to drain.

use crate::config::SimulationConfig;
use crate::ecs::World;

/// Inputs shared by every system for one tick
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    dt: f32,
    config: &'a SimulationConfig,
}

impl<'a> StepContext<'a> {
    /// Bundle the frame's delta time with the global tunables
    pub fn new(dt: f32, config: &'a SimulationConfig) -> Self {
        StepContext { dt, config }
    }

    /// Delta time in seconds
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Global tunables in effect for this tick
    pub fn config(&self) -> &SimulationConfig {
        self.config
    }
}

/// Trait for systems that operate on the world once per tick
pub trait System: Send + Sync {
    /// Run one tick and return how many entities (or particles) were updated
    fn run(&mut self, world: &mut World, ctx: &StepContext<'_>) -> usize;

    /// Name used in logs
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
