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
//! Particle pool slot

use crate::color::Color;
use crate::pool::Poolable;
use glam::Vec2;

/// One particle, living in an emitter's pool
///
/// While active, `0 <= age < lifetime`. A slot whose age reaches its
/// lifetime is reset to [`Particle::default`] in the same update.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Particle {
    /// World position
    pub position: Vec2,
    /// Units per second
    pub velocity: Vec2,
    /// Gravity plus wind from the last update
    pub acceleration: Vec2,
    /// Current color
    pub color: Color,
    /// Color at birth
    pub start_color: Color,
    /// Color at death
    pub end_color: Color,
    /// Current size
    pub size: f32,
    /// Size at birth
    pub start_size: f32,
    /// Size at death
    pub end_size: f32,
    /// Seconds the particle lives
    pub lifetime: f32,
    /// Seconds lived so far
    pub age: f32,
    /// Radians
    pub rotation: f32,
    /// Radians per second
    pub rotation_speed: f32,
    /// Whether the slot is in use
    pub is_active: bool,
}

impl Particle {
    /// `age / lifetime` clamped to `[0, 1]`; 1 when lifetime is not positive
    pub fn normalized_age(&self) -> f32 {
        if self.lifetime > 0.0 {
            (self.age / self.lifetime).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Age the particle by `dt` and move it under `acceleration`
    ///
    /// Returns false if the particle expired; it has then been reset.
    pub fn advance(&mut self, acceleration: Vec2, dt: f32) -> bool {
        self.age += dt;
        if self.age >= self.lifetime {
            self.reset();
            return false;
        }

        self.acceleration = acceleration;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
        self.rotation += self.rotation_speed * dt;

        let t = self.normalized_age();
        self.color = self.start_color.lerp(self.end_color, t);
        self.size = self.start_size + (self.end_size - self.start_size) * t;
        true
    }
}

impl Default for Particle {
    fn default() -> Self {
        Particle {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            color: Color::WHITE,
            start_color: Color::WHITE,
            end_color: Color::WHITE,
            size: 1.0,
            start_size: 1.0,
            end_size: 1.0,
            lifetime: 0.0,
            age: 0.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            is_active: false,
        }
    }
}

impl Poolable for Particle {
    fn is_active(&self) -> bool {
        self.is_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live(lifetime: f32) -> Particle {
        Particle {
            lifetime,
            is_active: true,
            start_color: Color::WHITE,
            end_color: Color::TRANSPARENT,
            start_size: 4.0,
            end_size: 2.0,
            ..Particle::default()
        }
    }

    #[test]
    fn test_advance_moves_and_interpolates() {
        let mut p = live(2.0);
        p.velocity = Vec2::new(10.0, 0.0);
        p.rotation_speed = 1.0;

        assert!(p.advance(Vec2::new(0.0, 4.0), 1.0));
        assert_eq!(p.age, 1.0);
        assert_eq!(p.velocity, Vec2::new(10.0, 4.0));
        assert_eq!(p.position, Vec2::new(10.0, 4.0));
        assert_eq!(p.rotation, 1.0);
        assert_eq!(p.size, 3.0);
        assert_eq!(p.color.a, 128);
    }

    #[test]
    fn test_expiry_resets_slot() {
        let mut p = live(0.5);
        p.position = Vec2::new(3.0, 3.0);
        p.velocity = Vec2::ONE;

        assert!(!p.advance(Vec2::ZERO, 0.5));
        assert_eq!(p, Particle::default());
        assert!(!p.is_active());
    }

    #[test]
    fn test_normalized_age() {
        let mut p = live(4.0);
        p.age = 1.0;
        assert_eq!(p.normalized_age(), 0.25);
        p.lifetime = 0.0;
        assert_eq!(p.normalized_age(), 1.0);
    }
}
