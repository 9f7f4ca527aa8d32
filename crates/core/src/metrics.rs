//! Prometheus metrics for the reservation core.

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Opts};

/// Availability probes by result.
pub static PROBE_RESULTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "sponsor_probe_results_total",
            "Total availability probes by result",
        ),
        &["result"], // "available", "sold_out", "not_found"
    )
    .unwrap()
});

/// Reservation attempts by terminal outcome.
pub static ATTEMPTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "sponsor_attempts_total",
            "Total reservation attempts by outcome",
        ),
        &["outcome"], // "submitted", "awaiting_manual_submit", or a failure kind
    )
    .unwrap()
});

/// Monitor availability checks.
pub static MONITOR_CHECKS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "sponsor_monitor_checks_total",
        "Total monitor availability checks",
    )
    .unwrap()
});

/// Sold-out conflicts detected at cart review.
pub static CART_CONFLICTS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "sponsor_cart_conflicts_total",
        "Total sold-out conflicts detected at cart review",
    )
    .unwrap()
});

/// Keywords learned into the blocklist during reconciliation.
pub static BLOCKLIST_ADDITIONS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "sponsor_blocklist_additions_total",
        "Total keywords learned into the blocklist",
    )
    .unwrap()
});

/// Orders actually submitted through the gate.
pub static ORDERS_SUBMITTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "sponsor_orders_submitted_total",
        "Total orders actually submitted",
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(PROBE_RESULTS.clone()),
        Box::new(ATTEMPTS.clone()),
        Box::new(MONITOR_CHECKS.clone()),
        Box::new(CART_CONFLICTS.clone()),
        Box::new(BLOCKLIST_ADDITIONS.clone()),
        Box::new(ORDERS_SUBMITTED.clone()),
    ]
}
