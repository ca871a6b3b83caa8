//! Cooperative cancellation for long-running decode calls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::ReadError;

/// Cloneable cancellation handle shared between a caller and a running
/// decode. The reader checks it at page boundaries (between pages
/// within a chunk and between chunks); once cancelled, the current call
/// returns [`ReadError::Cancelled`] without partial results.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Safe to call from another thread.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub(crate) fn check(&self) -> Result<(), ReadError> {
        if self.is_cancelled() {
            Err(ReadError::Cancelled)
        } else {
            Ok(())
        }
    }
}
