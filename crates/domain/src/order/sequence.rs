//! Display order numbers.

use std::sync::atomic::{AtomicU32, Ordering};

/// Hands out order numbers 1, 2, ... up to `max`, then starts again at 1.
///
/// Numbers are for display in the kitchen, not identity.
#[derive(Debug)]
pub struct OrderNumberSequence {
    next: AtomicU32,
    max: u32,
}

impl OrderNumberSequence {
    /// Creates a sequence that wraps after `max` (at least 1).
    pub fn new(max: u32) -> Self {
        Self {
            next: AtomicU32::new(1),
            max: max.max(1),
        }
    }

    /// Returns the next number.
    pub fn next_number(&self) -> u32 {
        let max = self.max;
        self.next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some(if current >= max { 1 } else { current + 1 })
            })
            .unwrap_or_else(|current| current)
    }
}
