use serde::{Deserialize, Serialize};

/// Progress event types emitted while a run is in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    // Monitor lifecycle
    MonitorStarted {
        /// Effective polling interval after the floor is applied.
        interval_secs: u64,
        keywords: Vec<String>,
    },
    CheckStarted {
        check_number: u64,
    },
    MonitorSleeping {
        seconds: u64,
    },
    MonitorStopped {
        reason: String,
    },

    // Probing
    CandidateProbed {
        keyword: String,
        /// "available", "sold_out" or "not_found".
        result: String,
    },
    CandidateAvailable {
        keyword: String,
        title: String,
        price: String,
    },

    // Attempt lifecycle
    AttemptStarted {
        attempt_id: String,
    },
    LoggedIn,
    LoginSkipped,
    SearchExecuted {
        keyword: String,
    },
    CandidateSkipped {
        keyword: String,
        reason: String,
    },
    AddedToCart {
        keyword: String,
        title: String,
        price: String,
    },

    // Cart reconciliation
    CartConflictDetected {
        names: Vec<String>,
    },
    KeywordsBlocklisted {
        keywords: Vec<String>,
    },
    CartItemsRemoved {
        removed: Vec<String>,
    },

    // Checkout
    CheckoutReached,
    PaymentFilled {
        total: String,
    },
    /// The form shows a validation warning. Advisory only; the attempt
    /// continues.
    PaymentValidationWarning {
        total: String,
    },
    OrderSubmitted {
        title: String,
        total: String,
    },
    AwaitingManualSubmit {
        title: String,
        total: String,
    },
    AttemptFailed {
        kind: String,
        detail: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_tag() {
        let event = ProgressEvent::CandidateProbed {
            keyword: "Gold".to_string(),
            result: "sold_out".to_string(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"candidate_probed\""));
        assert!(json.contains("\"keyword\":\"Gold\""));

        let parsed: ProgressEvent = serde_json::from_str(&json).unwrap();
        assert!(matches!(parsed, ProgressEvent::CandidateProbed { .. }));
    }

    #[test]
    fn test_unit_variant_serialization() {
        let json = serde_json::to_string(&ProgressEvent::CheckoutReached).unwrap();
        assert_eq!(json, "{\"type\":\"checkout_reached\"}");
    }
}
