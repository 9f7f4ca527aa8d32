//! Monitor loop implementation.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::booking::{AttemptFailure, BookingWorkflow, ReservationOutcome, RunState};
use crate::events::{ProgressEvent, ProgressHandle};
use crate::metrics;

use super::config::MonitorConfig;
use super::types::{CancelToken, MonitorOutcome};

/// Granularity of cancellation checks during interval waits. Bounds how
/// long a cancel request can sit unnoticed while the loop sleeps.
const CANCEL_POLL: Duration = Duration::from_secs(1);

/// The availability monitor.
///
/// Owns the storefront session (through its workflow) for the lifetime of
/// the run; there is exactly one worker and no concurrent writer of the run
/// state, so no locking is needed.
pub struct Monitor {
    workflow: BookingWorkflow,
    config: MonitorConfig,
    events: ProgressHandle,
    cancel: CancelToken,
}

impl Monitor {
    pub fn new(
        workflow: BookingWorkflow,
        config: MonitorConfig,
        events: ProgressHandle,
        cancel: CancelToken,
    ) -> Self {
        Self {
            workflow,
            config,
            events,
            cancel,
        }
    }

    /// Spawn the monitor on its own task so the caller stays responsive.
    pub fn spawn(self) -> MonitorHandle {
        let cancel = self.cancel.clone();
        let join = tokio::spawn(self.run());
        MonitorHandle { cancel, join }
    }

    /// Run the monitor loop to completion.
    ///
    /// Repeats until cancellation, a completed checkout, or a failure the
    /// monitor does not retry (a session breakdown, or every candidate
    /// blocklisted). All other attempt failures wait out the interval and
    /// retry; the monitor itself never adds to the blocklist.
    pub async fn run(self) -> MonitorOutcome {
        let mut state = RunState::new();

        let interval = self.config.effective_interval();
        if interval.as_secs() != self.config.interval_seconds {
            warn!(
                "Polling interval {}s is below the floor, using {}s",
                self.config.interval_seconds,
                interval.as_secs()
            );
        }

        let keywords: Vec<String> = self
            .workflow
            .candidates()
            .iter()
            .map(|c| c.keyword.clone())
            .collect();
        info!(
            "Monitor started: {} candidate(s), interval {}s",
            keywords.len(),
            interval.as_secs()
        );
        self.events
            .emit(ProgressEvent::MonitorStarted {
                interval_secs: interval.as_secs(),
                keywords,
            })
            .await;

        let mut check_number = 0u64;
        loop {
            if self.cancel.is_cancelled() {
                return self.cancelled().await;
            }
            if let Some(outcome) = self.exhausted(&state).await {
                return outcome;
            }

            check_number += 1;
            metrics::MONITOR_CHECKS.inc();
            debug!(check_number, "Running availability check");
            self.events
                .emit(ProgressEvent::CheckStarted { check_number })
                .await;

            match self.workflow.probe_pass(&mut state).await {
                Err(failure) => {
                    // Only session breakdowns surface here; escalate rather
                    // than poll a dead session.
                    error!("Availability check failed: {}", failure);
                    self.events
                        .emit(ProgressEvent::MonitorStopped {
                            reason: failure.to_string(),
                        })
                        .await;
                    return MonitorOutcome::Completed(ReservationOutcome::Failed(failure));
                }
                Ok(None) => {
                    debug!(check_number, "No candidate available");
                }
                Ok(Some(available)) => {
                    info!(
                        "Candidate '{}' available, starting full attempt",
                        available.keyword
                    );
                    state.affinity_hint = Some(available.keyword.clone());

                    let outcome = self.workflow.execute(&mut state).await;
                    match &outcome {
                        ReservationOutcome::Submitted { .. }
                        | ReservationOutcome::AwaitingManualSubmit { .. } => {
                            self.events
                                .emit(ProgressEvent::MonitorStopped {
                                    reason: "reservation complete".to_string(),
                                })
                                .await;
                            return MonitorOutcome::Completed(outcome);
                        }
                        ReservationOutcome::Failed(AttemptFailure::SessionError(_)) => {
                            self.events
                                .emit(ProgressEvent::MonitorStopped {
                                    reason: "session error".to_string(),
                                })
                                .await;
                            return MonitorOutcome::Completed(outcome);
                        }
                        ReservationOutcome::Failed(failure) => {
                            warn!("Attempt failed ({}), retrying next interval", failure);
                            if let Some(outcome) = self.exhausted(&state).await {
                                return outcome;
                            }
                        }
                    }
                }
            }

            self.events
                .emit(ProgressEvent::MonitorSleeping {
                    seconds: interval.as_secs(),
                })
                .await;
            if !self.wait_interval(interval).await {
                return self.cancelled().await;
            }
        }
    }

    /// Terminal check: once reconciliation has blocklisted every configured
    /// keyword nothing can ever succeed (the blocklist never shrinks), so
    /// stop instead of polling forever.
    async fn exhausted(&self, state: &RunState) -> Option<MonitorOutcome> {
        if self.workflow.remaining_candidates(state) > 0 {
            return None;
        }
        warn!("Every configured candidate is blocklisted, nothing left to try");
        self.events
            .emit(ProgressEvent::MonitorStopped {
                reason: "all candidates blocklisted".to_string(),
            })
            .await;
        Some(MonitorOutcome::Completed(ReservationOutcome::Failed(
            AttemptFailure::NoEligibleProduct,
        )))
    }

    async fn cancelled(&self) -> MonitorOutcome {
        info!("Monitor stopped: cancelled");
        self.events
            .emit(ProgressEvent::MonitorStopped {
                reason: "cancelled".to_string(),
            })
            .await;
        MonitorOutcome::Cancelled
    }

    /// Sleep for `interval`, polling the cancel flag about once a second.
    /// Returns false when cancelled mid-wait.
    async fn wait_interval(&self, interval: Duration) -> bool {
        let mut remaining = interval;
        while !remaining.is_zero() {
            if self.cancel.is_cancelled() {
                return false;
            }
            let tick = remaining.min(CANCEL_POLL);
            tokio::time::sleep(tick).await;
            remaining -= tick;
        }
        !self.cancel.is_cancelled()
    }
}

/// Handle to a spawned monitor: cancel it, or await its outcome.
pub struct MonitorHandle {
    cancel: CancelToken,
    join: JoinHandle<MonitorOutcome>,
}

impl MonitorHandle {
    /// Request cooperative cancellation.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Wait for the monitor to finish.
    pub async fn join(self) -> MonitorOutcome {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Monitor task ended abnormally: {}", e);
                MonitorOutcome::Cancelled
            }
        }
    }
}
