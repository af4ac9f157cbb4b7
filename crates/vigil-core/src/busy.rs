//! In-flight flag for simulated async operations
//!
//! Login, signup, settings save and refresh each allow one call at a time.
//! A second call while the first is pending is rejected, not queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result};

/// Shared in-flight flag
#[derive(Debug, Clone, Default)]
pub struct BusyFlag {
    busy: Arc<AtomicBool>,
}

impl BusyFlag {
    /// Create an idle flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the flag busy for the lifetime of the returned guard.
    ///
    /// Fails with [`Error::OperationInProgress`] if another guard is alive.
    pub fn try_acquire(&self, operation: &str) -> Result<BusyGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::OperationInProgress(operation.to_string()))?;

        tracing::trace!(operation, "In-flight flag acquired");
        Ok(BusyGuard {
            busy: Arc::clone(&self.busy),
        })
    }

    /// Whether an operation is currently in flight
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Clears the flag when dropped, including when the owning future is cancelled
#[derive(Debug)]
pub struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_rejected() {
        let flag = BusyFlag::new();
        let guard = flag.try_acquire("login").unwrap();
        assert!(flag.is_busy());

        let err = flag.try_acquire("login").unwrap_err();
        assert!(matches!(err, Error::OperationInProgress(ref op) if op == "login"));

        drop(guard);
        assert!(!flag.is_busy());
        assert!(flag.try_acquire("login").is_ok());
    }

    #[test]
    fn test_clones_share_state() {
        let flag = BusyFlag::new();
        let other = flag.clone();
        let _guard = flag.try_acquire("save").unwrap();
        assert!(other.is_busy());
        assert!(other.try_acquire("save").is_err());
    }
}
