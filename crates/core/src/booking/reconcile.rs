//! Cart reconciliation.
//!
//! Inventory can change between "add to cart" and "review cart" — another
//! buyer may take the last slot while it sits in our cart. This step detects
//! the storefront's sold-out warning at cart review, learns which configured
//! keywords are dead for the rest of the run, removes the conflicted rows,
//! and verifies the warning cleared before checkout proceeds.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::{debug, warn};

use crate::events::{ProgressEvent, ProgressHandle};
use crate::metrics;
use crate::storefront::StorefrontSession;

use super::types::{AttemptFailure, Blocklist, Candidate};

/// Resolve any sold-out conflict visible at cart review.
///
/// Matching keywords are added to `blocklist` permanently for the run.
/// Returns `CartSoldOutPersists` when the warning survives row removal.
pub(crate) async fn reconcile_cart(
    session: &dyn StorefrontSession,
    configured: &[Candidate],
    blocklist: &mut Blocklist,
    events: &ProgressHandle,
) -> Result<(), AttemptFailure> {
    let has_warning = session.cart_has_sold_out_warning().await.map_err(|e| {
        AttemptFailure::CheckoutNavigationFailed(format!("cart status check failed: {}", e))
    })?;

    if !has_warning {
        debug!("Cart shows no sold-out warning");
        return Ok(());
    }

    let names = sold_out_names(session).await;
    warn!("Cart reports sold-out items: {:?}", names);
    metrics::CART_CONFLICTS.inc();
    events
        .emit(ProgressEvent::CartConflictDetected {
            names: names.clone(),
        })
        .await;

    let mut learned = Vec::new();
    for name in &names {
        let name_lower = name.to_lowercase();
        for candidate in configured {
            if name_lower.contains(&candidate.keyword.to_lowercase())
                && blocklist.insert(&candidate.keyword)
            {
                learned.push(candidate.keyword.clone());
            }
        }
    }
    if !learned.is_empty() {
        warn!("Blocklisting keywords for this run: {:?}", learned);
        metrics::BLOCKLIST_ADDITIONS.inc_by(learned.len() as u64);
        events
            .emit(ProgressEvent::KeywordsBlocklisted { keywords: learned })
            .await;
    }

    // Removal failure leaves the conflict unresolved.
    let removed = session
        .remove_cart_items(&names)
        .await
        .map_err(|_| AttemptFailure::CartSoldOutPersists)?;
    events
        .emit(ProgressEvent::CartItemsRemoved { removed })
        .await;

    let still_warning = session.cart_has_sold_out_warning().await.map_err(|e| {
        AttemptFailure::CheckoutNavigationFailed(format!("cart status re-check failed: {}", e))
    })?;
    if still_warning {
        return Err(AttemptFailure::CartSoldOutPersists);
    }

    Ok(())
}

/// Display names of the sold-out items. Prefers the structured per-item
/// list; falls back to parsing the free-text warning.
async fn sold_out_names(session: &dyn StorefrontSession) -> Vec<String> {
    match session.cart_sold_out_item_names().await {
        Ok(names) if !names.is_empty() => return names,
        Ok(_) => debug!("Storefront gave no structured sold-out list, parsing warning text"),
        Err(e) => debug!("Structured sold-out list unavailable ({}), parsing warning text", e),
    }

    let text = session.cart_warning_text().await.unwrap_or_default();
    parse_warning_names(&text)
}

static ITEM_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\s\-*•·]+").unwrap());

/// Best-effort extraction of item names from free warning text.
///
/// When the warning spans multiple lines the first line is a header
/// ("The following items are sold out:"), not an item. A single-line
/// warning IS the item name. Bullet and dash prefixes are stripped.
pub(crate) fn parse_warning_names(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let items: &[&str] = if lines.len() > 1 { &lines[1..] } else { &lines };

    items
        .iter()
        .map(|line| ITEM_PREFIX.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}
