//! Reservation acquisition workflow.
//!
//! The pieces of a single attempt, leaves first:
//! - **selector**: pure ranking of configured candidates (blocklist filter,
//!   affinity-hint promotion)
//! - **probe**: tri-state availability check against the lazily rendered
//!   catalog
//! - **reconcile**: sold-out conflict resolution at cart review, which is
//!   the only place keywords get blocklisted
//! - **gate**: fill-always / submit-iff-authorized checkout boundary
//! - **attempt**: the state machine tying it together

mod attempt;
mod gate;
mod probe;
mod reconcile;
mod selector;
mod types;

pub use attempt::BookingWorkflow;
pub use selector::rank_candidates;
pub use types::{
    candidates_from_keywords, AttemptFailure, AttemptPhase, AvailableCandidate, Blocklist,
    Candidate, ProbeOutcome, ReservationOutcome, RunState,
};
