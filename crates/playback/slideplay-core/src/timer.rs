//! Auto-play timer driven by the engine clock.

use crate::ids::{IdAllocator, TimerId};

#[derive(Clone, Debug)]
struct Armed {
    id: TimerId,
    interval_ms: u64,
    next_fire_ms: u64,
}

/// Periodic timer with at most one active arming. Arming again replaces the
/// current arming, so two timers can never overlap.
#[derive(Debug, Default)]
pub struct AutoPlayTimer {
    ids: IdAllocator,
    armed: Option<Armed>,
}

impl AutoPlayTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm with a fresh id; the first fire is one interval after `now_ms`.
    pub fn arm(&mut self, now_ms: u64, interval_ms: u64) -> TimerId {
        let id = self.ids.alloc_timer();
        self.armed = Some(Armed {
            id,
            interval_ms: interval_ms.max(1),
            next_fire_ms: now_ms.saturating_add(interval_ms.max(1)),
        });
        id
    }

    /// Returns the id of the arming that was cancelled, if any.
    pub fn disarm(&mut self) -> Option<TimerId> {
        self.armed.take().map(|a| a.id)
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn active(&self) -> Option<TimerId> {
        self.armed.as_ref().map(|a| a.id)
    }

    /// Take one due fire at `now_ms`, scheduling the next one. Call repeatedly to
    /// catch up after a long tick.
    pub fn poll(&mut self, now_ms: u64) -> Option<TimerId> {
        let armed = self.armed.as_mut()?;
        if now_ms < armed.next_fire_ms {
            return None;
        }
        armed.next_fire_ms = armed.next_fire_ms.saturating_add(armed.interval_ms);
        Some(armed.id)
    }
}
