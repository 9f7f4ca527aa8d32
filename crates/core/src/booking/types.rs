//! Types for the reservation acquisition workflow.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storefront::CardRef;

/// One configured desired item, identified by a search keyword and a
/// priority rank (lower rank = higher priority).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub keyword: String,
    pub priority_rank: u32,
}

impl Candidate {
    pub fn new(keyword: impl Into<String>, priority_rank: u32) -> Self {
        Self {
            keyword: keyword.into(),
            priority_rank,
        }
    }
}

/// Build the candidate list from a priority-ordered keyword list.
pub fn candidates_from_keywords(keywords: &[String]) -> Vec<Candidate> {
    keywords
        .iter()
        .enumerate()
        .map(|(rank, keyword)| Candidate::new(keyword.trim(), rank as u32))
        .collect()
}

/// Keywords confirmed unavailable for the remainder of the current run.
///
/// Grows monotonically; a fresh run starts with a fresh `RunState`.
/// Comparison is case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blocklist {
    entries: BTreeSet<String>,
}

impl Blocklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a keyword. Returns true if it was not already blocklisted.
    pub fn insert(&mut self, keyword: &str) -> bool {
        self.entries.insert(keyword.trim().to_lowercase())
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.entries.contains(&keyword.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Blocklisted keywords, lowercased, in sorted order.
    pub fn keywords(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }
}

/// Mutable state owned by one run.
///
/// Threaded `&mut` through the orchestrator; discarded when the run ends.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    /// Whether this session has already logged in. Login happens at most
    /// once per RunState lifetime.
    pub logged_in: bool,
    pub blocklist: Blocklist,
    /// Most recent keyword confirmed available by a lightweight probe.
    /// Reorders future ranking, never skips probing.
    pub affinity_hint: Option<String>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Phases of a single reservation attempt, in order of progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptPhase {
    Idle,
    LoggingIn,
    Searching,
    Evaluating,
    AddingToCart,
    SelectingForCheckout,
    AtCart,
    FillingPayment,
    ReadyToSubmit,
    Submitted,
    AwaitingManualSubmit,
}

impl AttemptPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptPhase::Idle => "idle",
            AttemptPhase::LoggingIn => "logging_in",
            AttemptPhase::Searching => "searching",
            AttemptPhase::Evaluating => "evaluating",
            AttemptPhase::AddingToCart => "adding_to_cart",
            AttemptPhase::SelectingForCheckout => "selecting_for_checkout",
            AttemptPhase::AtCart => "at_cart",
            AttemptPhase::FillingPayment => "filling_payment",
            AttemptPhase::ReadyToSubmit => "ready_to_submit",
            AttemptPhase::Submitted => "submitted",
            AttemptPhase::AwaitingManualSubmit => "awaiting_manual_submit",
        }
    }
}

/// Why an attempt ended without a reservation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AttemptFailure {
    /// Every ranked candidate was absent, sold out, or refused add-to-cart.
    #[error("no eligible product among configured candidates")]
    NoEligibleProduct,

    /// Navigation from catalog through cart to checkout broke down.
    #[error("checkout navigation failed: {0}")]
    CheckoutNavigationFailed(String),

    /// The cart still reports sold-out items after removing conflicts.
    #[error("cart still reports sold-out items after removal")]
    CartSoldOutPersists,

    /// Order submission did not take effect.
    #[error("order submission failed: {0}")]
    SubmitFailed(String),

    /// Login or page-level breakdown that invalidates the whole run.
    #[error("storefront session error: {0}")]
    SessionError(String),
}

impl AttemptFailure {
    pub fn kind(&self) -> &'static str {
        match self {
            AttemptFailure::NoEligibleProduct => "no_eligible_product",
            AttemptFailure::CheckoutNavigationFailed(_) => "checkout_navigation_failed",
            AttemptFailure::CartSoldOutPersists => "cart_sold_out_persists",
            AttemptFailure::SubmitFailed(_) => "submit_failed",
            AttemptFailure::SessionError(_) => "session_error",
        }
    }
}

/// Terminal result of a reservation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationOutcome {
    /// The order was placed (auto-submit was authorized).
    Submitted { title: String, total: String },
    /// Payment details are filled; the order awaits human review.
    AwaitingManualSubmit { title: String, total: String },
    Failed(AttemptFailure),
}

impl ReservationOutcome {
    /// Whether the attempt reached a terminal checkout state (an actual
    /// submission or a pre-filled form awaiting manual submit).
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ReservationOutcome::Submitted { .. } | ReservationOutcome::AwaitingManualSubmit { .. }
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ReservationOutcome::Submitted { .. } => "submitted",
            ReservationOutcome::AwaitingManualSubmit { .. } => "awaiting_manual_submit",
            ReservationOutcome::Failed(failure) => failure.kind(),
        }
    }
}

/// Result of probing one candidate in the live catalog.
#[derive(Debug, Clone)]
pub enum ProbeOutcome {
    Available {
        card: CardRef,
        title: String,
        price: String,
    },
    SoldOut,
    NotFound,
}

impl ProbeOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeOutcome::Available { .. } => "available",
            ProbeOutcome::SoldOut => "sold_out",
            ProbeOutcome::NotFound => "not_found",
        }
    }
}

/// A candidate confirmed available by a probe, with its display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableCandidate {
    pub keyword: String,
    pub title: String,
    pub price: String,
}
