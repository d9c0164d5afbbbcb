//! Completion latch: resolves once N distinct tokens have been observed.

/// Counts completions for the animations of one step. Tokens are slot indices;
/// they may arrive in any order, and each slot counts once.
#[derive(Clone, Debug, Default)]
pub struct CompletionLatch {
    done: Vec<bool>,
    remaining: usize,
}

impl CompletionLatch {
    pub fn new(expected: usize) -> Self {
        Self {
            done: vec![false; expected],
            remaining: expected,
        }
    }

    /// Record a completion. Returns false for unknown or already-seen slots.
    pub fn complete(&mut self, slot: usize) -> bool {
        match self.done.get_mut(slot) {
            Some(seen) if !*seen => {
                *seen = true;
                self.remaining -= 1;
                true
            }
            _ => false,
        }
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.remaining == 0
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}
