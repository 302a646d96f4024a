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
//! Fixed-capacity object pooling
//!
//! A [`SlotPool`] allocates all of its slots up front and never grows.
//! Slots are claimed by a linear scan for the first inactive one, so the
//! lowest free index is always reused first and iteration order is stable
//! between runs. Particle emitters use one pool each.

/// Item that can live in a [`SlotPool`]
pub trait Poolable: Default {
    /// Whether the slot currently holds a live item
    fn is_active(&self) -> bool;

    /// Return the slot to its pristine, inactive state
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Statistics for monitoring pool usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolStats {
    /// Number of successful acquisitions
    pub spawned: usize,
    /// Number of acquisitions refused because every slot was busy
    pub exhausted: usize,
    /// Acquisitions that reused a slot which had been live before
    pub recycled: usize,
    /// Highest active count observed by [`SlotPool::refresh`]
    pub peak_active: usize,
}

impl PoolStats {
    /// Fraction of acquisitions that were refused, as a percentage
    pub fn exhaustion_rate(&self) -> f64 {
        let total = self.spawned + self.exhausted;
        if total == 0 {
            0.0
        } else {
            (self.exhausted as f64 / total as f64) * 100.0
        }
    }
}

/// Preallocated pool of `T` slots with a hard capacity
#[derive(Debug, Clone)]
pub struct SlotPool<T> {
    slots: Vec<T>,
    touched: usize,
    active: usize,
    stats: PoolStats,
}

impl<T: Poolable> SlotPool<T> {
    /// Pool with `capacity` inactive slots
    pub fn new(capacity: usize) -> Self {
        SlotPool {
            slots: (0..capacity).map(|_| T::default()).collect(),
            touched: 0,
            active: 0,
            stats: PoolStats::default(),
        }
    }

    /// Claim the first inactive slot
    ///
    /// The slot is reset before it is handed out; the caller is expected to
    /// make it active. Returns `None` when every slot is busy.
    pub fn acquire(&mut self) -> Option<&mut T> {
        let Some(index) = self.slots.iter().position(|slot| !slot.is_active()) else {
            self.stats.exhausted += 1;
            tracing::trace!(capacity = self.slots.len(), "slot pool exhausted");
            return None;
        };

        self.stats.spawned += 1;
        if index < self.touched {
            self.stats.recycled += 1;
        } else {
            self.touched = index + 1;
        }
        self.active += 1;
        self.stats.peak_active = self.stats.peak_active.max(self.active);

        let slot = &mut self.slots[index];
        slot.reset();
        Some(slot)
    }

    /// Recount live slots after external mutation and return the count
    pub fn refresh(&mut self) -> usize {
        self.active = self.slots.iter().filter(|slot| slot.is_active()).count();
        self.stats.peak_active = self.stats.peak_active.max(self.active);
        self.active
    }

    /// Reset every slot; statistics are kept
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(T::reset);
        self.active = 0;
    }

    /// Live slot count as of the last acquisition or refresh
    pub fn active_count(&self) -> usize {
        self.active
    }

    /// Iterate over live slots in index order
    pub fn iter_active(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter(|slot| slot.is_active())
    }
}

impl<T> SlotPool<T> {
    /// Number of slots, live or not
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// All slots in index order
    pub fn slots(&self) -> &[T] {
        &self.slots
    }

    /// All slots, mutably
    ///
    /// Call [`refresh`](Self::refresh) afterwards if slots were activated
    /// or retired.
    pub fn slots_mut(&mut self) -> &mut [T] {
        &mut self.slots
    }

    /// Usage counters
    pub fn stats(&self) -> PoolStats {
        self.stats
    }
}
