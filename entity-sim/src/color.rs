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
//! 8-bit RGBA color

/// RGBA color with one byte per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Color {
    /// Opaque white
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    /// Opaque black
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    /// Fully transparent black
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Color from explicit channels
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::rgba(r, g, b, 255)
    }

    /// Same color with a different alpha
    pub const fn with_alpha(self, a: u8) -> Self {
        Color::rgba(self.r, self.g, self.b, a)
    }

    /// Channel-wise linear interpolation
    ///
    /// `t` is clamped to `[0, 1]` and every channel stays in `0..=255`.
    ///
    /// ```
    /// use entity_sim::Color;
    ///
    /// let mid = Color::BLACK.lerp(Color::WHITE, 0.5);
    /// assert_eq!(mid, Color::rgb(128, 128, 128));
    /// assert_eq!(Color::BLACK.lerp(Color::WHITE, 2.0), Color::WHITE);
    /// ```
    pub fn lerp(self, end: Color, t: f32) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        Color::rgba(
            lerp_channel(self.r, end.r, t),
            lerp_channel(self.g, end.g, t),
            lerp_channel(self.b, end.b, t),
            lerp_channel(self.a, end.a, t),
        )
    }

    /// Normalized `[r, g, b, a]` for GPU upload
    pub fn to_array(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

fn lerp_channel(start: u8, end: u8, t: f32) -> u8 {
    let value = start as f32 + (end as f32 - start as f32) * t;
    value.round().clamp(0.0, 255.0) as u8
}
