//! Availability probing.
//!
//! A probe answers one question about one candidate against the live,
//! lazily rendered catalog: available, sold out, or not found. Probing never
//! raises past its own boundary — any storefront fault collapses to
//! `NotFound`, leaving the caller free to move on to the next candidate.

use tracing::debug;

use crate::metrics;
use crate::storefront::StorefrontSession;

use super::types::ProbeOutcome;

/// How many "reveal more" rounds to attempt before concluding absence.
/// The catalog renders additional items lazily; this bounds the hunt.
const MAX_REVEAL_ROUNDS: usize = 8;

/// Probe one candidate keyword. The caller is expected to have searched for
/// the keyword already; this only inspects the rendered catalog.
pub async fn probe_candidate(session: &dyn StorefrontSession, keyword: &str) -> ProbeOutcome {
    let outcome = run_probe(session, keyword).await;
    metrics::PROBE_RESULTS
        .with_label_values(&[outcome.as_str()])
        .inc();
    outcome
}

async fn run_probe(session: &dyn StorefrontSession, keyword: &str) -> ProbeOutcome {
    let mut card = match session.find_candidate(keyword).await {
        Ok(card) => card,
        Err(e) => {
            debug!("Probe for '{}' failed to locate card: {}", keyword, e);
            return ProbeOutcome::NotFound;
        }
    };

    let mut rounds = 0;
    while card.is_none() && rounds < MAX_REVEAL_ROUNDS {
        rounds += 1;
        match session.reveal_more().await {
            Ok(true) => {}
            // No further content loaded; the catalog is exhausted.
            Ok(false) => break,
            Err(e) => {
                debug!("Probe for '{}' failed while revealing more: {}", keyword, e);
                return ProbeOutcome::NotFound;
            }
        }

        card = match session.find_candidate(keyword).await {
            Ok(card) => card,
            Err(e) => {
                debug!("Probe for '{}' failed to locate card: {}", keyword, e);
                return ProbeOutcome::NotFound;
            }
        };
    }

    let Some(card) = card else {
        debug!(
            "Candidate '{}' not found after {} reveal rounds",
            keyword, rounds
        );
        return ProbeOutcome::NotFound;
    };

    match session.is_available(&card).await {
        Ok(false) => ProbeOutcome::SoldOut,
        Ok(true) => {
            let title = match session.title_of(&card).await {
                Ok(title) => title,
                Err(e) => {
                    debug!("Probe for '{}' failed to read title: {}", keyword, e);
                    return ProbeOutcome::NotFound;
                }
            };
            let price = match session.price_of(&card).await {
                Ok(price) => price,
                Err(e) => {
                    debug!("Probe for '{}' failed to read price: {}", keyword, e);
                    return ProbeOutcome::NotFound;
                }
            };
            ProbeOutcome::Available { card, title, price }
        }
        Err(e) => {
            debug!("Probe for '{}' failed availability check: {}", keyword, e);
            ProbeOutcome::NotFound
        }
    }
}
