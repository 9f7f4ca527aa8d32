//! Types for the availability monitor.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::booking::ReservationOutcome;

/// Cooperative cancellation signal.
///
/// Checked between orchestration steps and roughly once a second during
/// interval sleeps. An in-flight storefront call is never interrupted;
/// cancellation takes effect at the next checkpoint.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Terminal result of a monitor run.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorOutcome {
    /// The run ended with a reservation outcome: a completed checkout, or a
    /// failure the monitor does not retry.
    Completed(ReservationOutcome),
    /// The run was cancelled before completing.
    Cancelled,
}
