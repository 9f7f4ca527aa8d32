//! Reservation attempt lifecycle tests.
//!
//! These exercise the complete attempt state machine end-to-end against the
//! scripted mock storefront: candidate iteration, first-success-wins
//! add-to-cart, cart reconciliation, and the submission gate.

use std::sync::Arc;

use tokio::sync::mpsc;

use sponsorcatcher_core::{
    candidates_from_keywords, rank_candidates,
    testing::{fixtures, MockCartWarning, MockProduct, MockStorefront},
    AttemptFailure, BookingWorkflow, ProgressEnvelope, ProgressEvent, ProgressHandle,
    ReservationOutcome, RunState,
};

/// Test helper bundling a workflow with its mock storefront and event sink.
struct TestHarness {
    storefront: Arc<MockStorefront>,
    workflow: BookingWorkflow,
    events_rx: mpsc::Receiver<ProgressEnvelope>,
}

impl TestHarness {
    fn new(keywords: &[&str], auto_submit: bool) -> Self {
        let storefront = Arc::new(MockStorefront::new());
        let (events, events_rx) = ProgressHandle::channel(256);
        let workflow = BookingWorkflow::new(
            storefront.clone(),
            candidates_from_keywords(
                &keywords.iter().map(|k| k.to_string()).collect::<Vec<_>>(),
            ),
            fixtures::payment_details(),
            auto_submit,
            events,
        );
        Self {
            storefront,
            workflow,
            events_rx,
        }
    }

    fn drain_events(&mut self) -> Vec<ProgressEvent> {
        let mut events = Vec::new();
        while let Ok(envelope) = self.events_rx.try_recv() {
            events.push(envelope.event);
        }
        events
    }
}

#[tokio::test]
async fn gold_not_found_silver_available_reserves_silver() {
    let harness = TestHarness::new(&["Gold", "Silver"], true);
    harness
        .storefront
        .set_products(vec![fixtures::product("Silver Sponsorship", "$900.00")])
        .await;
    harness.storefront.set_order_total("$900.00").await;

    let mut state = RunState::new();
    let outcome = harness.workflow.execute(&mut state).await;

    assert_eq!(
        outcome,
        ReservationOutcome::Submitted {
            title: "Silver Sponsorship".to_string(),
            total: "$900.00".to_string(),
        }
    );
    assert_eq!(harness.storefront.searches().await, vec!["Gold", "Silver"]);
    assert_eq!(harness.storefront.submit_count().await, 1);
}

#[tokio::test]
async fn first_success_short_circuits_remaining_candidates() {
    let harness = TestHarness::new(&["Alpha", "Beta", "Gamma"], false);
    harness
        .storefront
        .set_products(vec![
            fixtures::product("Beta Sponsorship", "$500.00"),
            fixtures::product("Gamma Sponsorship", "$250.00"),
        ])
        .await;

    let mut state = RunState::new();
    let outcome = harness.workflow.execute(&mut state).await;

    assert!(outcome.is_success());
    // Beta succeeded, so Gamma was never evaluated.
    assert_eq!(harness.storefront.searches().await, vec!["Alpha", "Beta"]);
}

#[tokio::test]
async fn sold_out_candidate_advances_to_next() {
    let harness = TestHarness::new(&["Gold", "Silver"], false);
    harness
        .storefront
        .set_products(vec![
            fixtures::sold_out_product("Gold Sponsorship", "$1,500.00"),
            fixtures::product("Silver Sponsorship", "$900.00"),
        ])
        .await;

    let mut state = RunState::new();
    let outcome = harness.workflow.execute(&mut state).await;

    assert!(matches!(
        outcome,
        ReservationOutcome::AwaitingManualSubmit { ref title, .. } if title == "Silver Sponsorship"
    ));
    // Catalog-level sold-out is transient; nothing gets blocklisted here.
    assert!(state.blocklist.is_empty());
}

#[tokio::test]
async fn add_to_cart_failure_yields_no_eligible_product() {
    let harness = TestHarness::new(&["Gold"], false);
    harness
        .storefront
        .set_products(vec![
            MockProduct::new("Gold Sponsorship", "$1,500.00").unaddable()
        ])
        .await;

    let mut state = RunState::new();
    let outcome = harness.workflow.execute(&mut state).await;

    assert_eq!(
        outcome,
        ReservationOutcome::Failed(AttemptFailure::NoEligibleProduct)
    );
    assert!(state.blocklist.is_empty());
    assert_eq!(harness.storefront.filled_payments().await.len(), 0);
}

#[tokio::test]
async fn reconciliation_learns_blocklist_and_proceeds() {
    let mut harness = TestHarness::new(&["Gold", "Silver"], false);
    harness
        .storefront
        .set_products(vec![
            fixtures::product("Gold Sponsorship", "$1,500.00"),
            fixtures::product("Silver Sponsorship", "$900.00"),
        ])
        .await;
    harness
        .storefront
        .set_cart_warning(Some(fixtures::sold_out_warning(&["Gold Sponsorship"])))
        .await;
    harness.storefront.set_order_total("$1,500.00").await;

    let mut state = RunState::new();
    let outcome = harness.workflow.execute(&mut state).await;

    // The conflicted row was removed and checkout proceeded.
    assert!(outcome.is_success());
    assert!(state.blocklist.contains("Gold"));
    assert_eq!(
        harness.storefront.removed_items().await,
        vec!["Gold Sponsorship".to_string()]
    );

    // The selector never offers the learned keyword again this run.
    let next = rank_candidates(
        &candidates_from_keywords(&["Gold".to_string(), "Silver".to_string()]),
        &state.blocklist,
        None,
    );
    let keywords: Vec<&str> = next.iter().map(|c| c.keyword.as_str()).collect();
    assert_eq!(keywords, vec!["Silver"]);

    let events = harness.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, ProgressEvent::CartConflictDetected { .. })));
    assert!(events.iter().any(
        |e| matches!(e, ProgressEvent::KeywordsBlocklisted { keywords } if keywords == &vec!["Gold".to_string()])
    ));
}

#[tokio::test]
async fn persistent_cart_warning_fails_attempt() {
    let harness = TestHarness::new(&["Gold"], false);
    harness
        .storefront
        .set_products(vec![fixtures::product("Gold Sponsorship", "$1,500.00")])
        .await;
    harness
        .storefront
        .set_cart_warning(Some(MockCartWarning {
            item_names: vec!["Gold Sponsorship".to_string()],
            text: String::new(),
            persists: true,
        }))
        .await;

    let mut state = RunState::new();
    let outcome = harness.workflow.execute(&mut state).await;

    assert_eq!(
        outcome,
        ReservationOutcome::Failed(AttemptFailure::CartSoldOutPersists)
    );
    // Learning happened even though the attempt failed.
    assert!(state.blocklist.contains("Gold"));
    assert_eq!(harness.storefront.filled_payments().await.len(), 0);
}

#[tokio::test]
async fn gate_without_authorization_fills_but_never_submits() {
    let harness = TestHarness::new(&["Gold"], false);
    harness
        .storefront
        .set_products(vec![fixtures::product("Gold Sponsorship", "$1,500.00")])
        .await;
    harness.storefront.set_order_total("$1,500.00").await;

    let mut state = RunState::new();
    let outcome = harness.workflow.execute(&mut state).await;

    assert_eq!(
        outcome,
        ReservationOutcome::AwaitingManualSubmit {
            title: "Gold Sponsorship".to_string(),
            total: "$1,500.00".to_string(),
        }
    );
    assert_eq!(harness.storefront.filled_payments().await.len(), 1);
    assert_eq!(harness.storefront.submit_count().await, 0);
}

#[tokio::test]
async fn gate_with_authorization_submits_once() {
    let harness = TestHarness::new(&["Gold"], true);
    harness
        .storefront
        .set_products(vec![fixtures::product("Gold Sponsorship", "$1,500.00")])
        .await;

    let mut state = RunState::new();
    let outcome = harness.workflow.execute(&mut state).await;

    assert!(matches!(outcome, ReservationOutcome::Submitted { .. }));
    assert_eq!(harness.storefront.filled_payments().await.len(), 1);
    assert_eq!(harness.storefront.submit_count().await, 1);
}

#[tokio::test]
async fn submit_failure_is_terminal_for_attempt() {
    let harness = TestHarness::new(&["Gold"], true);
    harness
        .storefront
        .set_products(vec![fixtures::product("Gold Sponsorship", "$1,500.00")])
        .await;
    harness.storefront.set_submit_ok(false).await;

    let mut state = RunState::new();
    let outcome = harness.workflow.execute(&mut state).await;

    assert!(matches!(
        outcome,
        ReservationOutcome::Failed(AttemptFailure::SubmitFailed(_))
    ));
}

#[tokio::test]
async fn login_happens_once_per_run_state() {
    let mut harness = TestHarness::new(&["Gold"], false);
    harness
        .storefront
        .set_products(vec![fixtures::product("Gold Sponsorship", "$1,500.00")])
        .await;

    let mut state = RunState::new();
    let first = harness.workflow.execute(&mut state).await;
    assert!(first.is_success());
    assert_eq!(harness.storefront.call_count("login").await, 1);
    harness.drain_events();

    let second = harness.workflow.execute(&mut state).await;
    assert!(second.is_success());
    // No additional login call for the second attempt in the same run.
    assert_eq!(harness.storefront.call_count("login").await, 1);
    let events = harness.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, ProgressEvent::LoginSkipped)));
}

#[tokio::test]
async fn login_fault_escalates_as_session_error() {
    let harness = TestHarness::new(&["Gold", "Silver"], false);
    harness
        .storefront
        .set_next_error(
            "login",
            sponsorcatcher_core::StorefrontError::LoginFailed("bad credentials".to_string()),
        )
        .await;

    let mut state = RunState::new();
    let outcome = harness.workflow.execute(&mut state).await;

    assert!(matches!(
        outcome,
        ReservationOutcome::Failed(AttemptFailure::SessionError(_))
    ));
    // Candidate iteration never started.
    assert_eq!(harness.storefront.call_count("search").await, 0);
}

#[tokio::test]
async fn search_fault_bypasses_remaining_candidates() {
    let harness = TestHarness::new(&["Gold", "Silver"], false);
    harness
        .storefront
        .set_next_error("search", sponsorcatcher_core::StorefrontError::Timeout)
        .await;

    let mut state = RunState::new();
    let outcome = harness.workflow.execute(&mut state).await;

    assert!(matches!(
        outcome,
        ReservationOutcome::Failed(AttemptFailure::SessionError(_))
    ));
    assert_eq!(harness.storefront.call_count("search").await, 1);
}

#[tokio::test]
async fn cart_review_navigation_failure() {
    let harness = TestHarness::new(&["Gold"], false);
    harness
        .storefront
        .set_products(vec![fixtures::product("Gold Sponsorship", "$1,500.00")])
        .await;
    harness.storefront.set_review_ok(false).await;

    let mut state = RunState::new();
    let outcome = harness.workflow.execute(&mut state).await;

    assert!(matches!(
        outcome,
        ReservationOutcome::Failed(AttemptFailure::CheckoutNavigationFailed(_))
    ));
}

#[tokio::test]
async fn lost_card_falls_back_to_selected_card() {
    let harness = TestHarness::new(&["Gold"], false);
    harness
        .storefront
        .set_products(vec![fixtures::product("Gold Sponsorship", "$1,500.00")])
        .await;
    harness.storefront.set_lose_card_after_add(true).await;

    let mut state = RunState::new();
    let outcome = harness.workflow.execute(&mut state).await;

    assert!(outcome.is_success());
    assert_eq!(
        harness.storefront.call_count("find_any_selected_card").await,
        1
    );
}

#[tokio::test]
async fn validation_warning_is_advisory_only() {
    let mut harness = TestHarness::new(&["Gold"], false);
    harness
        .storefront
        .set_products(vec![fixtures::product("Gold Sponsorship", "$1,500.00")])
        .await;
    harness.storefront.set_validation_error(true).await;
    harness.storefront.set_order_total("$1,500.00").await;

    let mut state = RunState::new();
    let outcome = harness.workflow.execute(&mut state).await;

    assert!(outcome.is_success());
    let events = harness.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, ProgressEvent::PaymentValidationWarning { total } if total == "$1,500.00")));
}
