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
//! Sprite animation playback
//!
//! An [`AnimationComponent`] holds named [`Animation`]s, each a list of
//! source rectangles with per-frame durations. The [`AnimationSystem`]
//! advances the playing animation of every entity and queues
//! [`AnimationEvent`]s for frame changes and completions; the owner drains
//! them once per tick.

use crate::ecs::components::clamp_setting;
use crate::ecs::{Component, Entity, StepContext, System, World};
use std::collections::HashMap;

/// Source rectangle of a frame on a texture, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameRect {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl FrameRect {
    /// Rectangle from its top-left corner and size
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        FrameRect {
            x,
            y,
            width,
            height,
        }
    }
}

/// One frame of an animation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationFrame {
    /// Region of the texture to draw
    pub rect: FrameRect,
    /// Seconds the frame is shown at speed 1
    pub duration: f32,
}

/// Frame size and the top-left corner of the first frame on a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGrid {
    /// Frame width in pixels
    pub frame_width: u32,
    /// Frame height in pixels
    pub frame_height: u32,
    /// Left edge of the first frame
    pub start_x: u32,
    /// Top edge of the first frame
    pub start_y: u32,
}

impl FrameGrid {
    /// Grid of `frame_width` x `frame_height` frames starting at the origin
    pub const fn new(frame_width: u32, frame_height: u32) -> Self {
        FrameGrid {
            frame_width,
            frame_height,
            start_x: 0,
            start_y: 0,
        }
    }

    /// Builder: move the first frame
    pub const fn starting_at(mut self, x: u32, y: u32) -> Self {
        self.start_x = x;
        self.start_y = y;
        self
    }

    fn rect(&self, column: u32, row: u32) -> FrameRect {
        FrameRect::new(
            self.start_x + column * self.frame_width,
            self.start_y + row * self.frame_height,
            self.frame_width,
            self.frame_height,
        )
    }
}

/// A named, ordered list of frames
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Animation {
    name: String,
    frames: Vec<AnimationFrame>,
    looping: bool,
}

impl Animation {
    /// Conventional frame duration, ten frames per second
    pub const DEFAULT_FRAME_DURATION: f32 = 0.1;

    /// Empty looping animation
    pub fn new(name: impl Into<String>) -> Self {
        Animation {
            name: name.into(),
            frames: Vec::new(),
            looping: true,
        }
    }

    /// Frames laid out row by row on a sheet `sheet_width` pixels wide
    ///
    /// ```
    /// use entity_sim::animation::{Animation, FrameGrid, FrameRect};
    ///
    /// let walk = Animation::from_sprite_sheet("walk", 64, FrameGrid::new(16, 16), 6, 0.1);
    /// assert_eq!(walk.frames().len(), 6);
    /// assert_eq!(walk.frames()[4].rect, FrameRect::new(0, 16, 16, 16));
    /// ```
    pub fn from_sprite_sheet(
        name: impl Into<String>,
        sheet_width: u32,
        grid: FrameGrid,
        frame_count: u32,
        frame_duration: f32,
    ) -> Self {
        let columns = sheet_width
            .saturating_sub(grid.start_x)
            .checked_div(grid.frame_width)
            .unwrap_or(0)
            .max(1);

        (0..frame_count).fold(Self::new(name), |animation, i| {
            animation.with_frame(grid.rect(i % columns, i / columns), frame_duration)
        })
    }

    /// Frames laid out left to right in a single row
    pub fn horizontal_strip(
        name: impl Into<String>,
        grid: FrameGrid,
        frame_count: u32,
        frame_duration: f32,
    ) -> Self {
        (0..frame_count).fold(Self::new(name), |animation, i| {
            animation.with_frame(grid.rect(i, 0), frame_duration)
        })
    }

    /// Frames laid out top to bottom in a single column
    pub fn vertical_strip(
        name: impl Into<String>,
        grid: FrameGrid,
        frame_count: u32,
        frame_duration: f32,
    ) -> Self {
        (0..frame_count).fold(Self::new(name), |animation, i| {
            animation.with_frame(grid.rect(0, i), frame_duration)
        })
    }

    /// Builder: append a frame
    pub fn with_frame(mut self, rect: FrameRect, duration: f32) -> Self {
        self.add_frame(rect, duration);
        self
    }

    /// Builder: loop or play once
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Append a frame; negative durations become 0
    pub fn add_frame(&mut self, rect: FrameRect, duration: f32) {
        self.frames.push(AnimationFrame {
            rect,
            duration: clamp_setting("frame_duration", duration, 0.0, f32::MAX),
        });
    }

    /// Animation name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Frames in playback order
    pub fn frames(&self) -> &[AnimationFrame] {
        &self.frames
    }

    /// Whether playback wraps around
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Sum of all frame durations
    pub fn total_duration(&self) -> f32 {
        self.frames.iter().map(|f| f.duration).sum()
    }
}

/// Outcome of advancing one component by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationStep {
    /// Moved to the given frame index
    FrameChanged(usize),
    /// A non-looping animation reached its end
    Completed,
}

/// Playback state plus the animations an entity can play
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationComponent {
    animations: HashMap<String, Animation>,
    current: Option<String>,
    frame: usize,
    frame_time: f32,
    playing: bool,
    speed: f32,
}

impl AnimationComponent {
    /// Component with no animations, stopped
    pub fn new() -> Self {
        AnimationComponent {
            animations: HashMap::new(),
            current: None,
            frame: 0,
            frame_time: 0.0,
            playing: false,
            speed: 1.0,
        }
    }

    /// Builder: register an animation
    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.add_animation(animation);
        self
    }

    /// Register an animation, replacing any with the same name
    pub fn add_animation(&mut self, animation: Animation) {
        self.animations.insert(animation.name.clone(), animation);
    }

    /// Look up a registered animation
    pub fn animation(&self, name: &str) -> Option<&Animation> {
        self.animations.get(name)
    }

    /// Start playing `name`
    ///
    /// Playback restarts from frame 0 when `restart` is set or a different
    /// animation was selected; replaying the current animation otherwise
    /// keeps its position. Returns false if no such animation exists.
    pub fn play(&mut self, name: &str, restart: bool) -> bool {
        if !self.animations.contains_key(name) {
            return false;
        }

        let same = self.current.as_deref() == Some(name);
        if same && self.playing && !restart {
            return true;
        }
        if restart || !same {
            self.frame = 0;
            self.frame_time = 0.0;
        }
        self.current = Some(name.to_string());
        self.playing = true;
        true
    }

    /// Stop playback, staying on the current frame
    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Alias of [`stop`](Self::stop) for readability at call sites
    pub fn pause(&mut self) {
        self.stop();
    }

    /// Continue from the current frame
    pub fn resume(&mut self) {
        self.playing = true;
    }

    /// Whether the animation is advancing
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Name of the selected animation
    pub fn current_animation(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Index of the frame on screen
    pub fn current_frame(&self) -> usize {
        self.frame
    }

    /// Seconds accumulated on the current frame
    pub fn frame_time(&self) -> f32 {
        self.frame_time
    }

    /// Playback speed multiplier
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Set the speed multiplier; negative values become 0
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = clamp_setting("speed", speed, 0.0, f32::MAX);
    }

    /// Source rectangle of the frame on screen
    pub fn current_frame_rect(&self) -> Option<FrameRect> {
        let animation = self.animations.get(self.current.as_deref()?)?;
        animation
            .frames
            .get(self.frame)
            .or_else(|| animation.frames.first())
            .map(|f| f.rect)
    }

    /// Advance playback by `dt` seconds, at most one frame
    pub fn advance(&mut self, dt: f32) -> Option<AnimationStep> {
        if !self.playing {
            return None;
        }
        let animation = self.animations.get(self.current.as_deref()?)?;
        let frame_count = animation.frames.len();
        if frame_count == 0 {
            return None;
        }
        if self.frame >= frame_count {
            self.frame = 0;
        }

        let duration = animation.frames[self.frame].duration;
        self.frame_time += dt * self.speed;
        if self.frame_time < duration {
            return None;
        }
        self.frame_time -= duration;

        let previous = self.frame;
        if self.frame + 1 < frame_count {
            self.frame += 1;
        } else if animation.looping {
            self.frame = 0;
        } else {
            self.frame = frame_count - 1;
            self.playing = false;
            return Some(AnimationStep::Completed);
        }

        (self.frame != previous).then_some(AnimationStep::FrameChanged(self.frame))
    }
}

impl Default for AnimationComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for AnimationComponent {}

/// Notification queued by the [`AnimationSystem`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimationEvent {
    /// The entity's animation moved to a new frame
    FrameChanged {
        /// Animated entity
        entity: Entity,
        /// Animation name
        animation: String,
        /// New frame index
        frame: usize,
    },
    /// A non-looping animation finished and stopped on its last frame
    Completed {
        /// Animated entity
        entity: Entity,
        /// Animation name
        animation: String,
    },
}

/// Advances every playing [`AnimationComponent`]
#[derive(Debug, Default)]
pub struct AnimationSystem {
    events: Vec<AnimationEvent>,
}

impl AnimationSystem {
    /// Create a system with an empty event queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance all animations by `dt`; returns how many were playing
    pub fn animate(&mut self, world: &mut World, dt: f32) -> usize {
        let Some(storage) = world.storage_mut::<AnimationComponent>() else {
            return 0;
        };

        let mut playing = 0;
        for (entity, component) in storage.iter_mut() {
            if !component.is_playing() {
                continue;
            }
            playing += 1;

            let Some(step) = component.advance(dt) else {
                continue;
            };
            let animation = component.current.clone().unwrap_or_default();
            self.events.push(match step {
                AnimationStep::FrameChanged(frame) => AnimationEvent::FrameChanged {
                    entity,
                    animation,
                    frame,
                },
                AnimationStep::Completed => AnimationEvent::Completed { entity, animation },
            });
        }
        playing
    }

    /// Events queued since the last drain
    pub fn events(&self) -> &[AnimationEvent] {
        &self.events
    }

    /// Remove and return every queued event, oldest first
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, AnimationEvent> {
        self.events.drain(..)
    }
}

impl System for AnimationSystem {
    fn run(&mut self, world: &mut World, ctx: &StepContext<'_>) -> usize {
        self.animate(world, ctx.dt())
    }

    fn name(&self) -> &str {
        "AnimationSystem"
    }
}
