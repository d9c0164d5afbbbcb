//! Identifiers and simple allocators for dispatched steps and timers.

use serde::{Deserialize, Serialize};

/// Identifies one dispatch of an animation step. Completion tickets carry it so
/// late completions from a revoked or abandoned step can be told apart.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct DispatchId(pub u32);

/// Identifies one arming of the auto-play timer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u32);

/// Monotonic allocator for DispatchId and TimerId.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_dispatch: u32,
    next_timer: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_dispatch(&mut self) -> DispatchId {
        let id = DispatchId(self.next_dispatch);
        self.next_dispatch = self.next_dispatch.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_timer(&mut self) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer = self.next_timer.wrapping_add(1);
        id
    }
}
