//! Core library for SponsorCatcher: automated reservation of scarce sponsor
//! slots on a storefront that offers no reservation API.
//!
//! The storefront's state can only be inferred by repeatedly querying its
//! live, mutable catalog. This crate owns the orchestration: ranking
//! configured candidate keywords, probing availability, driving a single
//! attempt from search through cart to a guarded checkout, reconciling
//! sold-out conflicts discovered at cart review, and optionally polling on
//! an interval until a slot becomes available.
//!
//! The browser automation layer is an external collaborator behind the
//! [`StorefrontSession`] trait; [`testing::MockStorefront`] provides a
//! scripted implementation for tests.

pub mod booking;
pub mod config;
pub mod events;
pub mod metrics;
pub mod monitor;
pub mod storefront;
pub mod testing;

pub use booking::{
    candidates_from_keywords, rank_candidates, AttemptFailure, AttemptPhase, AvailableCandidate,
    Blocklist, BookingWorkflow, Candidate, ProbeOutcome, ReservationOutcome, RunState,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use events::{ProgressEnvelope, ProgressEvent, ProgressHandle};
pub use monitor::{
    CancelToken, Monitor, MonitorConfig, MonitorHandle, MonitorOutcome, MIN_INTERVAL_SECS,
};
pub use storefront::{CardRef, PaymentDetails, StorefrontError, StorefrontSession};
