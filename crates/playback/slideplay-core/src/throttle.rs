//! Leading-edge rate limiting.

/// Accepts the first occurrence of a key and drops the same key until `window_ms`
/// has passed since it was last accepted. A different key is always accepted and
/// starts a new window.
#[derive(Clone, Debug)]
pub struct LeadingEdge<K> {
    window_ms: u64,
    last: Option<(K, u64)>,
}

impl<K: Copy + PartialEq> LeadingEdge<K> {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last: None,
        }
    }

    pub fn admit(&mut self, key: K, now_ms: u64) -> bool {
        if let Some((last_key, at)) = self.last {
            if last_key == key && now_ms.saturating_sub(at) < self.window_ms {
                return false;
            }
        }
        self.last = Some((key, now_ms));
        true
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
