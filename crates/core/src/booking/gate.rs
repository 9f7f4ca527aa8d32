//! Submission gate.
//!
//! The boundary between "payment details filled" and "order placed".
//! Filling always happens once an attempt reaches checkout; submitting
//! happens only under explicit authorization. This split is the safety
//! boundary against unintended real purchases.

use tracing::{info, warn};

use crate::events::{ProgressEvent, ProgressHandle};
use crate::metrics;
use crate::storefront::{PaymentDetails, StorefrontSession};

use super::types::AttemptFailure;

/// What the gate did.
pub(crate) struct GateResult {
    /// Order total as displayed after the form was filled.
    pub total: String,
    /// Whether the order was actually submitted.
    pub submitted: bool,
}

/// Fill the payment form and, iff authorized, submit the order.
pub(crate) async fn finalize_order(
    session: &dyn StorefrontSession,
    payment: &PaymentDetails,
    authorize_submit: bool,
    events: &ProgressHandle,
) -> Result<GateResult, AttemptFailure> {
    session
        .fill_payment_form(payment)
        .await
        .map_err(|e| AttemptFailure::SessionError(format!("payment form fill failed: {}", e)))?;

    let total = session
        .order_total()
        .await
        .map_err(|e| AttemptFailure::SessionError(format!("order total read failed: {}", e)))?;
    info!("Payment details filled, order total: {}", total);
    events
        .emit(ProgressEvent::PaymentFilled {
            total: total.clone(),
        })
        .await;

    // Advisory only; a fault checking it counts as no warning.
    if session.has_validation_error().await.unwrap_or(false) {
        warn!("Payment form shows a validation warning");
        events
            .emit(ProgressEvent::PaymentValidationWarning {
                total: total.clone(),
            })
            .await;
    }

    if !authorize_submit {
        info!("Auto-submit not authorized, leaving order for manual review");
        return Ok(GateResult {
            total,
            submitted: false,
        });
    }

    match session.submit_order().await {
        Ok(true) => {
            metrics::ORDERS_SUBMITTED.inc();
            info!("Order submitted");
            Ok(GateResult {
                total,
                submitted: true,
            })
        }
        Ok(false) => Err(AttemptFailure::SubmitFailed(
            "submit click did not take effect".to_string(),
        )),
        Err(e) => Err(AttemptFailure::SubmitFailed(e.to_string())),
    }
}
