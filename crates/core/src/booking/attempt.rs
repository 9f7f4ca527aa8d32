//! The reservation attempt state machine.
//!
//! One attempt drives the full pass for a single chosen candidate:
//! login (once per run) → iterate ranked candidates → add to cart →
//! cart reconciliation → guarded checkout. There is no retry inside an
//! attempt; retrying is the monitor's job on its next interval.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::events::{ProgressEvent, ProgressHandle};
use crate::metrics;
use crate::storefront::{CardRef, PaymentDetails, StorefrontSession};

use super::probe::probe_candidate;
use super::reconcile::reconcile_cart;
use super::selector::rank_candidates;
use super::types::{
    candidates_from_keywords, AttemptFailure, AttemptPhase, AvailableCandidate, Candidate,
    ProbeOutcome, ReservationOutcome, RunState,
};

/// Drives reservation attempts against one storefront session.
///
/// The workflow is stateless between calls; all per-run mutable state lives
/// in the `RunState` the caller threads through.
pub struct BookingWorkflow {
    session: Arc<dyn StorefrontSession>,
    candidates: Vec<Candidate>,
    payment: PaymentDetails,
    auto_submit: bool,
    events: ProgressHandle,
}

impl BookingWorkflow {
    pub fn new(
        session: Arc<dyn StorefrontSession>,
        candidates: Vec<Candidate>,
        payment: PaymentDetails,
        auto_submit: bool,
        events: ProgressHandle,
    ) -> Self {
        Self {
            session,
            candidates,
            payment,
            auto_submit,
            events,
        }
    }

    /// Build a workflow from a validated run configuration.
    pub fn from_config(
        session: Arc<dyn StorefrontSession>,
        config: &Config,
        events: ProgressHandle,
    ) -> Self {
        Self::new(
            session,
            candidates_from_keywords(&config.search_keywords),
            config.payment.clone(),
            config.auto_submit,
            events,
        )
    }

    /// The configured candidates, in priority order.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// How many candidates survive the current blocklist.
    pub fn remaining_candidates(&self, state: &RunState) -> usize {
        rank_candidates(
            &self.candidates,
            &state.blocklist,
            state.affinity_hint.as_deref(),
        )
        .len()
    }

    /// Execute one full reservation attempt.
    pub async fn execute(&self, state: &mut RunState) -> ReservationOutcome {
        let outcome = match self.try_execute(state).await {
            Ok(outcome) => outcome,
            Err(failure) => ReservationOutcome::Failed(failure),
        };

        if let ReservationOutcome::Failed(failure) = &outcome {
            warn!("Attempt failed: {}", failure);
            self.events
                .emit(ProgressEvent::AttemptFailed {
                    kind: failure.kind().to_string(),
                    detail: failure.to_string(),
                })
                .await;
        }
        metrics::ATTEMPTS.with_label_values(&[outcome.kind()]).inc();
        outcome
    }

    async fn try_execute(&self, state: &mut RunState) -> Result<ReservationOutcome, AttemptFailure> {
        let attempt_id = Uuid::new_v4().to_string();
        info!(%attempt_id, "Starting reservation attempt");
        self.events
            .emit(ProgressEvent::AttemptStarted { attempt_id })
            .await;

        let mut phase = AttemptPhase::Idle;

        advance(&mut phase, AttemptPhase::LoggingIn);
        self.ensure_logged_in(state).await?;

        advance(&mut phase, AttemptPhase::Searching);
        let chosen = self.add_first_available(state, &mut phase).await?;
        let chosen = chosen.ok_or(AttemptFailure::NoEligibleProduct)?;

        // The catalog view may have refreshed while adding; re-locate the
        // chosen card before navigating to cart review.
        advance(&mut phase, AttemptPhase::SelectingForCheckout);
        let card = self.relocate_card(&chosen.keyword).await?;

        let navigated = self.session.go_to_cart_review(&card).await.map_err(|e| {
            AttemptFailure::CheckoutNavigationFailed(format!("cart review navigation failed: {}", e))
        })?;
        if !navigated {
            return Err(AttemptFailure::CheckoutNavigationFailed(
                "cart review button click did not navigate".to_string(),
            ));
        }

        advance(&mut phase, AttemptPhase::AtCart);
        reconcile_cart(
            self.session.as_ref(),
            &self.candidates,
            &mut state.blocklist,
            &self.events,
        )
        .await?;

        let proceeded = self.session.proceed_to_checkout().await.map_err(|e| {
            AttemptFailure::CheckoutNavigationFailed(format!("checkout navigation failed: {}", e))
        })?;
        if !proceeded {
            return Err(AttemptFailure::CheckoutNavigationFailed(
                "checkout button click did not navigate".to_string(),
            ));
        }
        self.events.emit(ProgressEvent::CheckoutReached).await;

        advance(&mut phase, AttemptPhase::FillingPayment);
        let gate = super::gate::finalize_order(
            self.session.as_ref(),
            &self.payment,
            self.auto_submit,
            &self.events,
        )
        .await?;
        advance(&mut phase, AttemptPhase::ReadyToSubmit);

        let outcome = if gate.submitted {
            advance(&mut phase, AttemptPhase::Submitted);
            self.events
                .emit(ProgressEvent::OrderSubmitted {
                    title: chosen.title.clone(),
                    total: gate.total.clone(),
                })
                .await;
            ReservationOutcome::Submitted {
                title: chosen.title,
                total: gate.total,
            }
        } else {
            advance(&mut phase, AttemptPhase::AwaitingManualSubmit);
            self.events
                .emit(ProgressEvent::AwaitingManualSubmit {
                    title: chosen.title.clone(),
                    total: gate.total.clone(),
                })
                .await;
            ReservationOutcome::AwaitingManualSubmit {
                title: chosen.title,
                total: gate.total,
            }
        };

        Ok(outcome)
    }

    /// Lightweight monitoring pass: search and probe the ranked candidates
    /// without touching the cart. Returns the first available candidate.
    pub async fn probe_pass(
        &self,
        state: &mut RunState,
    ) -> Result<Option<AvailableCandidate>, AttemptFailure> {
        self.ensure_logged_in(state).await?;

        let ranked = rank_candidates(
            &self.candidates,
            &state.blocklist,
            state.affinity_hint.as_deref(),
        );

        for candidate in &ranked {
            self.search(&candidate.keyword).await?;
            let probed = probe_candidate(self.session.as_ref(), &candidate.keyword).await;
            self.events
                .emit(ProgressEvent::CandidateProbed {
                    keyword: candidate.keyword.clone(),
                    result: probed.as_str().to_string(),
                })
                .await;

            if let ProbeOutcome::Available { title, price, .. } = probed {
                info!("Candidate '{}' is available: {}", candidate.keyword, title);
                self.events
                    .emit(ProgressEvent::CandidateAvailable {
                        keyword: candidate.keyword.clone(),
                        title: title.clone(),
                        price: price.clone(),
                    })
                    .await;
                return Ok(Some(AvailableCandidate {
                    keyword: candidate.keyword.clone(),
                    title,
                    price,
                }));
            }
        }

        Ok(None)
    }

    /// Iterate ranked candidates and add the first available one to the
    /// cart. First success wins; catalog-level NotFound/SoldOut are treated
    /// as transient and never blocklisted here.
    async fn add_first_available(
        &self,
        state: &mut RunState,
        phase: &mut AttemptPhase,
    ) -> Result<Option<AvailableCandidate>, AttemptFailure> {
        let ranked = rank_candidates(
            &self.candidates,
            &state.blocklist,
            state.affinity_hint.as_deref(),
        );

        for candidate in &ranked {
            self.search(&candidate.keyword).await?;

            advance(phase, AttemptPhase::Evaluating);
            let probed = probe_candidate(self.session.as_ref(), &candidate.keyword).await;
            self.events
                .emit(ProgressEvent::CandidateProbed {
                    keyword: candidate.keyword.clone(),
                    result: probed.as_str().to_string(),
                })
                .await;

            let (card, title, price) = match probed {
                ProbeOutcome::NotFound => {
                    self.skip_candidate(&candidate.keyword, "not_found").await;
                    continue;
                }
                ProbeOutcome::SoldOut => {
                    self.skip_candidate(&candidate.keyword, "sold_out").await;
                    continue;
                }
                ProbeOutcome::Available { card, title, price } => (card, title, price),
            };

            advance(phase, AttemptPhase::AddingToCart);
            match self.session.add_to_cart(&card).await {
                Ok(true) => {
                    info!("Added to cart: {} ({})", title, price);
                    self.events
                        .emit(ProgressEvent::AddedToCart {
                            keyword: candidate.keyword.clone(),
                            title: title.clone(),
                            price: price.clone(),
                        })
                        .await;
                    return Ok(Some(AvailableCandidate {
                        keyword: candidate.keyword.clone(),
                        title,
                        price,
                    }));
                }
                Ok(false) => {
                    self.skip_candidate(&candidate.keyword, "add_to_cart_failed")
                        .await;
                }
                Err(e) => {
                    debug!("Add to cart for '{}' failed: {}", candidate.keyword, e);
                    self.skip_candidate(&candidate.keyword, "add_to_cart_failed")
                        .await;
                }
            }
        }

        Ok(None)
    }

    /// Login once per run; skipped on subsequent attempts in the same run.
    async fn ensure_logged_in(&self, state: &mut RunState) -> Result<(), AttemptFailure> {
        if state.logged_in {
            debug!("Already logged in, skipping");
            self.events.emit(ProgressEvent::LoginSkipped).await;
            return Ok(());
        }

        self.session
            .login()
            .await
            .map_err(|e| AttemptFailure::SessionError(format!("login failed: {}", e)))?;
        state.logged_in = true;
        info!("Login successful");
        self.events.emit(ProgressEvent::LoggedIn).await;
        Ok(())
    }

    async fn search(&self, keyword: &str) -> Result<(), AttemptFailure> {
        self.session.search(keyword).await.map_err(|e| {
            AttemptFailure::SessionError(format!("search for '{}' failed: {}", keyword, e))
        })?;
        self.events
            .emit(ProgressEvent::SearchExecuted {
                keyword: keyword.to_string(),
            })
            .await;
        Ok(())
    }

    async fn skip_candidate(&self, keyword: &str, reason: &str) {
        debug!("Skipping candidate '{}': {}", keyword, reason);
        self.events
            .emit(ProgressEvent::CandidateSkipped {
                keyword: keyword.to_string(),
                reason: reason.to_string(),
            })
            .await;
    }

    /// Re-locate the chosen card after the catalog refreshed, falling back
    /// to whichever card the storefront marks as selected.
    async fn relocate_card(&self, keyword: &str) -> Result<CardRef, AttemptFailure> {
        if let Ok(Some(card)) = self.session.find_candidate(keyword).await {
            return Ok(card);
        }

        debug!("Lost card for '{}' after add to cart, trying selected-card lookup", keyword);
        match self.session.find_any_selected_card().await {
            Ok(Some(card)) => Ok(card),
            Ok(None) | Err(_) => Err(AttemptFailure::CheckoutNavigationFailed(
                "lost product card after add to cart".to_string(),
            )),
        }
    }
}

fn advance(current: &mut AttemptPhase, next: AttemptPhase) {
    debug!(from = current.as_str(), to = next.as_str(), "Attempt phase");
    *current = next;
}
