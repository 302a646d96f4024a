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
//! Emitter configuration and the emitter component

use super::Particle;
use crate::color::Color;
use crate::ecs::components::clamp_setting;
use crate::ecs::Component;
use crate::error::{Result, SimError};
use crate::pool::{PoolStats, SlotPool};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f32::consts::TAU;

/// Shortest lifetime a particle can be given, in seconds
pub const MIN_LIFETIME: f32 = 0.1;

/// Smallest start or end size a particle can be given
pub const MIN_SIZE: f32 = 0.1;

/// Tunables of a particle emitter
///
/// Every `*_variance` is a half-width: the sampled value is uniform in
/// `base ± variance`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "SettingsRecord"))]
pub struct EmitterSettings {
    /// Particles per second
    pub emission_rate: f32,
    /// Base lifetime in seconds
    pub lifetime: f32,
    /// Lifetime variance in seconds
    pub lifetime_variance: f32,
    /// Base initial velocity
    pub start_velocity: Vec2,
    /// Per-axis initial velocity variance
    pub velocity_variance: Vec2,
    /// Color at birth
    pub start_color: Color,
    /// Color at death
    pub end_color: Color,
    /// Size at birth
    pub start_size: f32,
    /// Size at death
    pub end_size: f32,
    /// Variance added equally to start and end size
    pub size_variance: f32,
    /// Radius of the disc particles spawn in, around the emitter
    pub spawn_radius: f32,
    /// Constant acceleration
    pub gravity: Vec2,
    /// Constant acceleration added to gravity
    pub wind: Vec2,
    /// Base spin in radians per second
    pub rotation_speed: f32,
    /// Spin variance
    pub rotation_variance: f32,
    /// Keep emitting forever; otherwise stop after one pool's worth
    pub loop_emission: bool,
}

impl Default for EmitterSettings {
    fn default() -> Self {
        EmitterSettings {
            emission_rate: 10.0,
            lifetime: 2.0,
            lifetime_variance: 0.5,
            start_velocity: Vec2::new(0.0, -50.0),
            velocity_variance: Vec2::new(50.0, 50.0),
            start_color: Color::WHITE,
            end_color: Color::WHITE.with_alpha(0),
            start_size: 4.0,
            end_size: 1.0,
            size_variance: 1.0,
            spawn_radius: 5.0,
            gravity: Vec2::ZERO,
            wind: Vec2::ZERO,
            rotation_speed: 0.0,
            rotation_variance: 0.0,
            loop_emission: true,
        }
    }
}

impl EmitterSettings {
    /// Settings that spawn identical particles every time
    pub fn without_variance(mut self) -> Self {
        self.lifetime_variance = 0.0;
        self.velocity_variance = Vec2::ZERO;
        self.size_variance = 0.0;
        self.spawn_radius = 0.0;
        self.rotation_variance = 0.0;
        self
    }

    fn non_negative(&self) -> [(&'static str, f32); 10] {
        [
            ("emission_rate", self.emission_rate),
            ("lifetime", self.lifetime),
            ("lifetime_variance", self.lifetime_variance),
            ("velocity_variance.x", self.velocity_variance.x),
            ("velocity_variance.y", self.velocity_variance.y),
            ("start_size", self.start_size),
            ("end_size", self.end_size),
            ("size_variance", self.size_variance),
            ("spawn_radius", self.spawn_radius),
            ("rotation_variance", self.rotation_variance),
        ]
    }

    fn finite(&self) -> [(&'static str, f32); 7] {
        [
            ("start_velocity.x", self.start_velocity.x),
            ("start_velocity.y", self.start_velocity.y),
            ("gravity.x", self.gravity.x),
            ("gravity.y", self.gravity.y),
            ("wind.x", self.wind.x),
            ("wind.y", self.wind.y),
            ("rotation_speed", self.rotation_speed),
        ]
    }

    /// Reject negative magnitudes and non-finite values
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.non_negative() {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(SimError::InvalidSetting { name, value });
            }
        }
        for (name, value) in self.finite() {
            if !value.is_finite() {
                return Err(SimError::InvalidSetting { name, value });
            }
        }
        Ok(())
    }

    /// Clamp every out-of-range value into range, logging each change
    pub fn sanitized(mut self) -> Self {
        let magnitude = |name, value| clamp_setting(name, value, 0.0, f32::MAX);
        self.emission_rate = magnitude("emission_rate", self.emission_rate);
        self.lifetime = magnitude("lifetime", self.lifetime);
        self.lifetime_variance = magnitude("lifetime_variance", self.lifetime_variance);
        self.velocity_variance = Vec2::new(
            magnitude("velocity_variance.x", self.velocity_variance.x),
            magnitude("velocity_variance.y", self.velocity_variance.y),
        );
        self.start_size = magnitude("start_size", self.start_size);
        self.end_size = magnitude("end_size", self.end_size);
        self.size_variance = magnitude("size_variance", self.size_variance);
        self.spawn_radius = magnitude("spawn_radius", self.spawn_radius);
        self.rotation_variance = magnitude("rotation_variance", self.rotation_variance);

        self.start_velocity = finite_or_zero("start_velocity", self.start_velocity);
        self.gravity = finite_or_zero("gravity", self.gravity);
        self.wind = finite_or_zero("wind", self.wind);
        if !self.rotation_speed.is_finite() {
            tracing::warn!(value = self.rotation_speed, "rotation_speed reset to 0");
            self.rotation_speed = 0.0;
        }
        self
    }
}

/// Wire form of [`EmitterSettings`]; missing fields take the defaults and
/// the result must pass [`EmitterSettings::validate`]
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(default)]
struct SettingsRecord {
    emission_rate: f32,
    lifetime: f32,
    lifetime_variance: f32,
    start_velocity: Vec2,
    velocity_variance: Vec2,
    start_color: Color,
    end_color: Color,
    start_size: f32,
    end_size: f32,
    size_variance: f32,
    spawn_radius: f32,
    gravity: Vec2,
    wind: Vec2,
    rotation_speed: f32,
    rotation_variance: f32,
    loop_emission: bool,
}

#[cfg(feature = "serde")]
impl Default for SettingsRecord {
    fn default() -> Self {
        let d = EmitterSettings::default();
        SettingsRecord {
            emission_rate: d.emission_rate,
            lifetime: d.lifetime,
            lifetime_variance: d.lifetime_variance,
            start_velocity: d.start_velocity,
            velocity_variance: d.velocity_variance,
            start_color: d.start_color,
            end_color: d.end_color,
            start_size: d.start_size,
            end_size: d.end_size,
            size_variance: d.size_variance,
            spawn_radius: d.spawn_radius,
            gravity: d.gravity,
            wind: d.wind,
            rotation_speed: d.rotation_speed,
            rotation_variance: d.rotation_variance,
            loop_emission: d.loop_emission,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<SettingsRecord> for EmitterSettings {
    type Error = SimError;

    fn try_from(r: SettingsRecord) -> Result<Self> {
        let settings = EmitterSettings {
            emission_rate: r.emission_rate,
            lifetime: r.lifetime,
            lifetime_variance: r.lifetime_variance,
            start_velocity: r.start_velocity,
            velocity_variance: r.velocity_variance,
            start_color: r.start_color,
            end_color: r.end_color,
            start_size: r.start_size,
            end_size: r.end_size,
            size_variance: r.size_variance,
            spawn_radius: r.spawn_radius,
            gravity: r.gravity,
            wind: r.wind,
            rotation_speed: r.rotation_speed,
            rotation_variance: r.rotation_variance,
            loop_emission: r.loop_emission,
        };
        settings.validate()?;
        Ok(settings)
    }
}

fn finite_or_zero(name: &'static str, value: Vec2) -> Vec2 {
    if value.is_finite() {
        value
    } else {
        tracing::warn!(setting = name, ?value, "non-finite vector reset to zero");
        Vec2::ZERO
    }
}

/// A particle emitter with a fixed-capacity pool
///
/// The pool is allocated once at construction and never resized. Each
/// emitter owns a seeded ChaCha generator, so two emitters built with the
/// same settings and seed evolve identically.
///
/// # Examples
///
/// ```
/// use entity_sim::particles::{EmitterSettings, ParticleComponent};
/// use glam::Vec2;
///
/// let settings = EmitterSettings {
///     emission_rate: 10.0,
///     ..EmitterSettings::default()
/// };
/// let mut emitter = ParticleComponent::new(50, settings, 7);
///
/// emitter.emit(Vec2::ZERO, 0.1);
/// assert_eq!(emitter.active_count(), 1);
/// assert!(emitter.emission_accumulator() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct ParticleComponent {
    settings: EmitterSettings,
    pool: SlotPool<Particle>,
    emission_accumulator: f32,
    is_emitting: bool,
    spawned_total: usize,
    rng: ChaCha8Rng,
}

impl ParticleComponent {
    /// Pool size used by [`Default`]
    pub const DEFAULT_MAX_PARTICLES: usize = 100;

    /// Emitter with `max_particles` slots, clamping invalid settings
    pub fn new(max_particles: usize, settings: EmitterSettings, seed: u64) -> Self {
        ParticleComponent {
            settings: settings.sanitized(),
            pool: SlotPool::new(max_particles),
            emission_accumulator: 0.0,
            is_emitting: true,
            spawned_total: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Emitter with `max_particles` slots, rejecting invalid settings
    pub fn try_new(max_particles: usize, settings: EmitterSettings, seed: u64) -> Result<Self> {
        settings.validate()?;
        Ok(Self::new(max_particles, settings, seed))
    }

    /// Current settings
    pub fn settings(&self) -> &EmitterSettings {
        &self.settings
    }

    /// Replace the settings, clamping invalid values; the pool is kept
    pub fn set_settings(&mut self, settings: EmitterSettings) {
        self.settings = settings.sanitized();
    }

    /// Fixed pool capacity
    pub fn max_particles(&self) -> usize {
        self.pool.capacity()
    }

    /// Whether rate-driven emission is on
    pub fn is_emitting(&self) -> bool {
        self.is_emitting
    }

    /// Resume rate-driven emission
    ///
    /// For a non-looping emitter this also refills its emission budget.
    pub fn start(&mut self) {
        self.is_emitting = true;
        self.spawned_total = 0;
    }

    /// Pause rate-driven emission; live particles keep updating
    pub fn stop(&mut self) {
        self.is_emitting = false;
    }

    /// Fractional particle count carried to the next tick
    pub fn emission_accumulator(&self) -> f32 {
        self.emission_accumulator
    }

    /// Live particles after the last update or spawn
    pub fn active_count(&self) -> usize {
        self.pool.active_count()
    }

    /// Live particles in slot order
    pub fn active_particles(&self) -> impl Iterator<Item = &Particle> {
        self.pool.iter_active()
    }

    /// Every slot, live or not
    pub fn particles(&self) -> &[Particle] {
        self.pool.slots()
    }

    /// Pool usage counters
    pub fn stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Particles spawned since construction or the last [`start`](Self::start)
    pub fn spawned_total(&self) -> usize {
        self.spawned_total
    }

    /// Kill every particle and drop the carried fraction
    pub fn clear(&mut self) {
        self.pool.clear();
        self.emission_accumulator = 0.0;
    }

    /// Rate-driven emission for one tick at `origin`
    ///
    /// Returns the number of particles spawned. Spawning stops silently when
    /// the pool is full.
    pub fn emit(&mut self, origin: Vec2, dt: f32) -> usize {
        if !self.is_emitting {
            return 0;
        }

        self.emission_accumulator += self.settings.emission_rate * dt;
        let due = self.emission_accumulator.floor();
        self.emission_accumulator -= due;

        let mut due = due as usize;
        if !self.settings.loop_emission {
            due = due.min(self.pool.capacity().saturating_sub(self.spawned_total));
        }

        let spawned = self.spawn(origin, due);

        if !self.settings.loop_emission && self.spawned_total >= self.pool.capacity() {
            self.is_emitting = false;
        }
        spawned
    }

    /// Spawn up to `count` particles at `origin` immediately
    ///
    /// Ignores the emission rate and the emitting flag. Returns the number
    /// actually spawned.
    pub fn spawn(&mut self, origin: Vec2, count: usize) -> usize {
        let mut spawned = 0;
        while spawned < count {
            let Some(slot) = self.pool.acquire() else {
                break;
            };
            *slot = sample_particle(&self.settings, &mut self.rng, origin);
            spawned += 1;
        }
        self.spawned_total += spawned;
        spawned
    }

    /// Age and move every live particle by `dt`, retiring expired ones
    ///
    /// Returns the number of particles still alive.
    pub fn update(&mut self, dt: f32) -> usize {
        let acceleration = self.settings.gravity + self.settings.wind;
        for particle in self.pool.slots_mut() {
            if particle.is_active {
                particle.advance(acceleration, dt);
            }
        }
        self.pool.refresh()
    }

    /// Emission followed by update, as the simulator runs it each tick
    pub fn step(&mut self, origin: Vec2, dt: f32) -> usize {
        self.emit(origin, dt);
        self.update(dt)
    }
}

impl Default for ParticleComponent {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_PARTICLES, EmitterSettings::default(), 0)
    }
}

impl Component for ParticleComponent {}

// Scaling a unit sample keeps huge variances from overflowing the range
fn jitter(rng: &mut ChaCha8Rng, variance: f32) -> f32 {
    if variance > 0.0 {
        variance * (2.0 * rng.gen::<f32>() - 1.0)
    } else {
        0.0
    }
}

fn sample_particle(settings: &EmitterSettings, rng: &mut ChaCha8Rng, origin: Vec2) -> Particle {
    let angle = rng.gen_range(0.0..TAU);
    let distance = rng.gen::<f32>() * settings.spawn_radius;
    let position = origin + Vec2::from_angle(angle) * distance;

    let velocity = settings.start_velocity
        + Vec2::new(
            jitter(rng, settings.velocity_variance.x),
            jitter(rng, settings.velocity_variance.y),
        );
    let lifetime = (settings.lifetime + jitter(rng, settings.lifetime_variance)).max(MIN_LIFETIME);

    let size_variation = jitter(rng, settings.size_variance);
    let start_size = (settings.start_size + size_variation).max(MIN_SIZE);
    let end_size = (settings.end_size + size_variation).max(MIN_SIZE);

    let rotation_speed = settings.rotation_speed + jitter(rng, settings.rotation_variance);

    Particle {
        position,
        velocity,
        acceleration: Vec2::ZERO,
        color: settings.start_color,
        start_color: settings.start_color,
        end_color: settings.end_color,
        size: start_size,
        start_size,
        end_size,
        lifetime,
        age: 0.0,
        rotation: 0.0,
        rotation_speed,
        is_active: true,
    }
}
