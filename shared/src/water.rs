//! Ripple bookkeeping for the water shader.

use bevy::math::{Vec2, Vec4};

use crate::constants::MAX_RIPPLES;

/// One click on the water: where it landed and when.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RippleSlot {
    /// World-space (x, z) of the hit
    pub origin: Vec2,
    /// Value of the water time uniform when the ripple started
    pub started_at: f32,
}

impl RippleSlot {
    /// Shader layout: `vec4(x, z, start_time, 0)`.
    #[inline]
    pub fn packed(&self) -> Vec4 {
        Vec4::new(self.origin.x, self.origin.y, self.started_at, 0.0)
    }
}

/// Fixed-capacity FIFO of the most recent ripples, oldest first.
#[derive(Debug, Clone, Default)]
pub struct RippleBuffer {
    slots: [RippleSlot; MAX_RIPPLES],
    len: usize,
}

impl RippleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a ripple. Once full, the oldest entry is dropped and returned.
    pub fn push(&mut self, origin: Vec2, started_at: f32) -> Option<RippleSlot> {
        let slot = RippleSlot { origin, started_at };

        if self.len < MAX_RIPPLES {
            self.slots[self.len] = slot;
            self.len += 1;
            return None;
        }

        let evicted = self.slots[0];
        self.slots.rotate_left(1);
        self.slots[MAX_RIPPLES - 1] = slot;
        Some(evicted)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == MAX_RIPPLES
    }

    pub fn iter(&self) -> impl Iterator<Item = &RippleSlot> {
        self.slots.iter().take(self.len)
    }

    /// Active slots first, unused slots zeroed.
    pub fn to_uniform(&self) -> [Vec4; MAX_RIPPLES] {
        let mut packed = [Vec4::ZERO; MAX_RIPPLES];
        for (target, slot) in packed.iter_mut().zip(self.iter()) {
            *target = slot.packed();
        }
        packed
    }
}
