//! Single-flight guard for exports.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Allows at most one export to run at a time.
///
/// Clones share the same flag, so every clone handed to a different caller
/// sees the same in-flight state.
#[derive(Debug, Clone, Default)]
pub struct ExportGuard {
    in_flight: Arc<AtomicBool>,
}

/// Proof that the holder owns the guard. Dropping it releases the guard.
#[derive(Debug)]
#[must_use = "the guard is released as soon as the permit is dropped"]
pub struct ExportPermit {
    in_flight: Arc<AtomicBool>,
}

impl ExportGuard {
    /// Create an idle guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the guard, or return `None` if an export is already running.
    pub fn try_acquire(&self) -> Option<ExportPermit> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ExportPermit {
                in_flight: Arc::clone(&self.in_flight),
            })
    }

    /// Whether an export currently holds the guard.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

impl Drop for ExportPermit {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_starts_idle() {
        let guard = ExportGuard::new();
        assert!(!guard.is_busy());
    }

    #[test]
    fn test_second_acquire_is_refused() {
        let guard = ExportGuard::new();
        let permit = guard.try_acquire();
        assert!(permit.is_some());
        assert!(guard.is_busy());
        assert!(guard.try_acquire().is_none());
    }

    #[test]
    fn test_drop_releases() {
        let guard = ExportGuard::new();
        {
            let _permit = guard.try_acquire().unwrap();
            assert!(guard.is_busy());
        }
        assert!(!guard.is_busy());
        assert!(guard.try_acquire().is_some());
    }

    #[test]
    fn test_clones_share_state() {
        let guard = ExportGuard::new();
        let other = guard.clone();

        let _permit = guard.try_acquire().unwrap();
        assert!(other.is_busy());
        assert!(other.try_acquire().is_none());
    }
}
