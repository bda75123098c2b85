//! Busy-indicator signal for in-flight statement fetches.
//!
//! The guard clears the flag in `Drop`, which runs on every exit path —
//! success, error, or the owning task being aborted mid-await.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared counter of in-flight calls; cloned handles observe the same
/// state, so the shell can poll it while the fetch layer raises it.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag {
    active: Arc<AtomicUsize>,
}

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while at least one guarded call is in flight.
    pub fn is_busy(&self) -> bool {
        self.active.load(Ordering::SeqCst) > 0
    }

    /// Raise the flag for the lifetime of the returned guard.
    pub fn raise(&self) -> BusyGuard {
        self.active.fetch_add(1, Ordering::SeqCst);
        BusyGuard {
            active: Arc::clone(&self.active),
        }
    }
}

/// RAII handle holding the flag up; dropping it lowers the count.
#[derive(Debug)]
pub struct BusyGuard {
    active: Arc<AtomicUsize>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_raises_and_clears() {
        let flag = BusyFlag::new();
        assert!(!flag.is_busy());
        {
            let _guard = flag.raise();
            assert!(flag.is_busy());
        }
        assert!(!flag.is_busy());
    }

    #[test]
    fn test_overlapping_guards_count() {
        let flag = BusyFlag::new();
        let first = flag.raise();
        let second = flag.raise();
        drop(first);
        assert!(flag.is_busy(), "still busy while one call remains");
        drop(second);
        assert!(!flag.is_busy());
    }

    #[test]
    fn test_clones_share_state() {
        let flag = BusyFlag::new();
        let observer = flag.clone();
        let _guard = flag.raise();
        assert!(observer.is_busy());
    }
}
