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
//! Pooled particle emission
//!
//! An entity with a [`ParticleComponent`] and a transform is an emitter.
//! Each tick the [`ParticleSimulator`] first spawns particles at the rate
//! set in [`EmitterSettings`], carrying fractional counts between ticks,
//! then ages and moves every live particle. Particles are not entities;
//! they live in the emitter's fixed-capacity pool and are recycled in place.

mod emitter;
mod particle;
mod simulator;

pub use emitter::{EmitterSettings, ParticleComponent, MIN_LIFETIME, MIN_SIZE};
pub use particle::Particle;
pub use simulator::{emit_burst, ParticleSimulator};
