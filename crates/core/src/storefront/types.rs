//! Types for the storefront automation boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during storefront session operations.
#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error("Login failed: {0}")]
    LoginFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Interaction failed: {0}")]
    InteractionFailed(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Session closed")]
    SessionClosed,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Opaque reference to a product card in the live catalog.
///
/// Valid only until the next catalog refresh; callers must re-locate cards
/// after any operation that reloads the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRef(String);

impl CardRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Implementation-defined identifier for the card.
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Payment details used to fill the checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub name_on_card: String,
    pub card_number: String,
    pub cvv: String,
    /// Expiration month, "1"-"12" (leading zero accepted).
    pub exp_month: String,
    /// Expiration year, e.g. "2026".
    pub exp_year: String,
    pub billing_zip: String,
    /// Email address the storefront sends the order confirmation to.
    pub confirmation_email: String,
}

/// One live automation session against the storefront.
///
/// The storefront exposes one cart per session, so a session must only ever
/// be driven by a single owner at a time. Every method performs its own
/// bounded wait internally; callers get no preemption over a hung call.
#[async_trait]
pub trait StorefrontSession: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Log into the storefront. Idempotent once successful within a session.
    async fn login(&self) -> Result<(), StorefrontError>;

    /// Run a catalog search for `keyword`. Returns once the refreshed
    /// catalog content is stable.
    async fn search(&self, keyword: &str) -> Result<(), StorefrontError>;

    /// Locate the product card whose title contains `keyword`
    /// (case-insensitive).
    async fn find_candidate(&self, keyword: &str) -> Result<Option<CardRef>, StorefrontError>;

    /// Ask the lazily rendered catalog to load more items. Returns `false`
    /// when no further content loaded (the catalog is exhausted).
    async fn reveal_more(&self) -> Result<bool, StorefrontError>;

    /// Whether the card's item can currently be purchased.
    async fn is_available(&self, card: &CardRef) -> Result<bool, StorefrontError>;

    /// Display title of the card's item.
    async fn title_of(&self, card: &CardRef) -> Result<String, StorefrontError>;

    /// Display price of the card's item.
    async fn price_of(&self, card: &CardRef) -> Result<String, StorefrontError>;

    /// Add the card's item to the cart. `Ok(false)` means the click did not
    /// take effect (e.g. the button vanished between locate and click).
    async fn add_to_cart(&self, card: &CardRef) -> Result<bool, StorefrontError>;

    /// Locate whichever card is currently marked as selected (in cart).
    /// Fallback discovery after a catalog refresh loses the original card.
    async fn find_any_selected_card(&self) -> Result<Option<CardRef>, StorefrontError>;

    /// Navigate from the catalog to the cart review page via the card's
    /// review button.
    async fn go_to_cart_review(&self, card: &CardRef) -> Result<bool, StorefrontError>;

    /// Whether the cart review page shows a sold-out warning.
    async fn cart_has_sold_out_warning(&self) -> Result<bool, StorefrontError>;

    /// Structured per-item list of sold-out display names. Empty when the
    /// storefront does not break the warning down per item.
    async fn cart_sold_out_item_names(&self) -> Result<Vec<String>, StorefrontError>;

    /// Raw sold-out warning text, for callers that must fall back to parsing
    /// display names out of free text.
    async fn cart_warning_text(&self) -> Result<String, StorefrontError>;

    /// Remove cart rows by display name, auto-acknowledging any confirmation
    /// prompt. Returns the subset of names actually removed.
    async fn remove_cart_items(&self, names: &[String]) -> Result<Vec<String>, StorefrontError>;

    /// Proceed from cart review to the payment page.
    async fn proceed_to_checkout(&self) -> Result<bool, StorefrontError>;

    /// Fill the payment form. Returns once every field is committed.
    async fn fill_payment_form(&self, details: &PaymentDetails) -> Result<(), StorefrontError>;

    /// The computed order total as displayed, e.g. "$1,500.00". Empty when
    /// the total is not rendered.
    async fn order_total(&self) -> Result<String, StorefrontError>;

    /// Whether the payment form currently shows a validation error.
    async fn has_validation_error(&self) -> Result<bool, StorefrontError>;

    /// Submit the order. This places a real purchase.
    async fn submit_order(&self) -> Result<bool, StorefrontError>;
}
