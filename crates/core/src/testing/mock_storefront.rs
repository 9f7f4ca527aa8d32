//! Mock storefront for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::storefront::{CardRef, PaymentDetails, StorefrontError, StorefrontSession};

/// A product scripted into the mock catalog.
#[derive(Debug, Clone)]
pub struct MockProduct {
    pub title: String,
    pub price: String,
    pub available: bool,
    /// Number of `reveal_more` rounds before the card renders.
    pub reveal_rounds: usize,
    /// Whether `add_to_cart` succeeds for this card.
    pub addable: bool,
}

impl MockProduct {
    pub fn new(title: &str, price: &str) -> Self {
        Self {
            title: title.to_string(),
            price: price.to_string(),
            available: true,
            reveal_rounds: 0,
            addable: true,
        }
    }

    pub fn sold_out(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn hidden_for(mut self, rounds: usize) -> Self {
        self.reveal_rounds = rounds;
        self
    }

    pub fn unaddable(mut self) -> Self {
        self.addable = false;
        self
    }
}

/// Scripted sold-out warning on the cart review page.
#[derive(Debug, Clone, Default)]
pub struct MockCartWarning {
    /// Structured per-item names. Empty simulates a storefront that only
    /// renders a free-text warning.
    pub item_names: Vec<String>,
    /// Raw warning text for the free-text fallback.
    pub text: String,
    /// Keep the warning set even after items are removed.
    pub persists: bool,
}

#[derive(Debug)]
struct MockState {
    products: Vec<MockProduct>,
    reveals: usize,
    cart: Vec<String>,
    selected: Option<String>,
    warning: Option<MockCartWarning>,
    removed: Vec<String>,
    filled: Vec<PaymentDetails>,
    order_total: String,
    validation_error: bool,
    review_ok: bool,
    checkout_ok: bool,
    submit_ok: bool,
    submits: usize,
    lose_card_after_add: bool,
    calls: Vec<String>,
    errors: HashMap<String, StorefrontError>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            reveals: 0,
            cart: Vec::new(),
            selected: None,
            warning: None,
            removed: Vec::new(),
            filled: Vec::new(),
            order_total: "$0.00".to_string(),
            validation_error: false,
            review_ok: true,
            checkout_ok: true,
            submit_ok: true,
            submits: 0,
            lose_card_after_add: false,
            calls: Vec::new(),
            errors: HashMap::new(),
        }
    }
}

/// Mock implementation of the `StorefrontSession` trait.
///
/// Provides controllable behavior for testing:
/// - Scripted product catalog (availability, lazy rendering, add failures)
/// - Scripted cart warning for reconciliation scenarios
/// - Per-method one-shot error injection
/// - Full call recording for assertions
///
/// # Example
///
/// ```rust,ignore
/// use sponsorcatcher_core::testing::{fixtures, MockStorefront};
///
/// let storefront = MockStorefront::new();
/// storefront.set_products(vec![
///     fixtures::sold_out_product("Gold Sponsorship", "$1,500.00"),
///     fixtures::product("Silver Sponsorship", "$900.00"),
/// ]).await;
///
/// // ... run a workflow against it ...
///
/// assert_eq!(storefront.call_count("login").await, 1);
/// assert_eq!(storefront.searches().await, vec!["Gold", "Silver"]);
/// ```
#[derive(Debug, Default)]
pub struct MockStorefront {
    state: Arc<RwLock<MockState>>,
}

impl MockStorefront {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the scripted catalog.
    pub async fn set_products(&self, products: Vec<MockProduct>) {
        self.state.write().await.products = products;
    }

    /// Add a single product to the catalog.
    pub async fn add_product(&self, product: MockProduct) {
        self.state.write().await.products.push(product);
    }

    /// Script (or clear) the cart sold-out warning.
    pub async fn set_cart_warning(&self, warning: Option<MockCartWarning>) {
        self.state.write().await.warning = warning;
    }

    /// Configure whether cart-review navigation succeeds.
    pub async fn set_review_ok(&self, ok: bool) {
        self.state.write().await.review_ok = ok;
    }

    /// Configure whether checkout navigation succeeds.
    pub async fn set_checkout_ok(&self, ok: bool) {
        self.state.write().await.checkout_ok = ok;
    }

    /// Configure whether submitting the order succeeds.
    pub async fn set_submit_ok(&self, ok: bool) {
        self.state.write().await.submit_ok = ok;
    }

    pub async fn set_order_total(&self, total: &str) {
        self.state.write().await.order_total = total.to_string();
    }

    pub async fn set_validation_error(&self, has_error: bool) {
        self.state.write().await.validation_error = has_error;
    }

    /// Make keyword lookup fail once something is in the cart, forcing
    /// callers onto the selected-card fallback.
    pub async fn set_lose_card_after_add(&self, lose: bool) {
        self.state.write().await.lose_card_after_add = lose;
    }

    /// Configure the next call to `method` to fail with `error` (one-shot).
    pub async fn set_next_error(&self, method: &str, error: StorefrontError) {
        self.state.write().await.errors.insert(method.to_string(), error);
    }

    /// All recorded calls, in order. Calls with an interesting argument are
    /// recorded as "method:argument".
    pub async fn calls(&self) -> Vec<String> {
        self.state.read().await.calls.clone()
    }

    /// Number of recorded calls to `method` (argument ignored).
    pub async fn call_count(&self, method: &str) -> usize {
        let prefix = format!("{}:", method);
        self.state
            .read()
            .await
            .calls
            .iter()
            .filter(|call| *call == method || call.starts_with(&prefix))
            .count()
    }

    /// Keywords searched, in order.
    pub async fn searches(&self) -> Vec<String> {
        self.state
            .read()
            .await
            .calls
            .iter()
            .filter_map(|call| call.strip_prefix("search:").map(str::to_string))
            .collect()
    }

    /// Titles currently in the cart.
    pub async fn cart_titles(&self) -> Vec<String> {
        self.state.read().await.cart.clone()
    }

    /// Display names removed from the cart, in order.
    pub async fn removed_items(&self) -> Vec<String> {
        self.state.read().await.removed.clone()
    }

    /// Payment details the form was filled with, in order.
    pub async fn filled_payments(&self) -> Vec<PaymentDetails> {
        self.state.read().await.filled.clone()
    }

    /// Number of times the order was submitted.
    pub async fn submit_count(&self) -> usize {
        self.state.read().await.submits
    }

    async fn begin(&self, call: String, method: &str) -> Result<(), StorefrontError> {
        let mut state = self.state.write().await;
        state.calls.push(call);
        match state.errors.remove(method) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn visible(product: &MockProduct, reveals: usize) -> bool {
    product.reveal_rounds <= reveals
}

fn matches(product: &MockProduct, keyword: &str) -> bool {
    product
        .title
        .to_lowercase()
        .contains(&keyword.to_lowercase())
}

#[async_trait]
impl StorefrontSession for MockStorefront {
    fn name(&self) -> &str {
        "mock"
    }

    async fn login(&self) -> Result<(), StorefrontError> {
        self.begin("login".to_string(), "login").await
    }

    async fn search(&self, keyword: &str) -> Result<(), StorefrontError> {
        self.begin(format!("search:{}", keyword), "search").await?;
        // A fresh search re-renders the catalog from the top.
        self.state.write().await.reveals = 0;
        Ok(())
    }

    async fn find_candidate(&self, keyword: &str) -> Result<Option<CardRef>, StorefrontError> {
        self.begin(format!("find_candidate:{}", keyword), "find_candidate")
            .await?;
        let state = self.state.read().await;
        if state.lose_card_after_add && !state.cart.is_empty() {
            return Ok(None);
        }
        let card = state
            .products
            .iter()
            .find(|p| visible(p, state.reveals) && matches(p, keyword))
            .map(|p| CardRef::new(p.title.clone()));
        Ok(card)
    }

    async fn reveal_more(&self) -> Result<bool, StorefrontError> {
        self.begin("reveal_more".to_string(), "reveal_more").await?;
        let mut state = self.state.write().await;
        let had_hidden = state
            .products
            .iter()
            .any(|p| p.reveal_rounds > state.reveals);
        state.reveals += 1;
        Ok(had_hidden)
    }

    async fn is_available(&self, card: &CardRef) -> Result<bool, StorefrontError> {
        self.begin(format!("is_available:{}", card.id()), "is_available")
            .await?;
        let state = self.state.read().await;
        state
            .products
            .iter()
            .find(|p| p.title == card.id())
            .map(|p| p.available)
            .ok_or_else(|| StorefrontError::ElementNotFound(card.id().to_string()))
    }

    async fn title_of(&self, card: &CardRef) -> Result<String, StorefrontError> {
        self.begin(format!("title_of:{}", card.id()), "title_of")
            .await?;
        let state = self.state.read().await;
        state
            .products
            .iter()
            .find(|p| p.title == card.id())
            .map(|p| p.title.clone())
            .ok_or_else(|| StorefrontError::ElementNotFound(card.id().to_string()))
    }

    async fn price_of(&self, card: &CardRef) -> Result<String, StorefrontError> {
        self.begin(format!("price_of:{}", card.id()), "price_of")
            .await?;
        let state = self.state.read().await;
        state
            .products
            .iter()
            .find(|p| p.title == card.id())
            .map(|p| p.price.clone())
            .ok_or_else(|| StorefrontError::ElementNotFound(card.id().to_string()))
    }

    async fn add_to_cart(&self, card: &CardRef) -> Result<bool, StorefrontError> {
        self.begin(format!("add_to_cart:{}", card.id()), "add_to_cart")
            .await?;
        let mut state = self.state.write().await;
        let Some(product) = state.products.iter().find(|p| p.title == card.id()).cloned() else {
            return Ok(false);
        };
        if !product.available || !product.addable {
            return Ok(false);
        }
        state.cart.push(product.title.clone());
        state.selected = Some(product.title);
        Ok(true)
    }

    async fn find_any_selected_card(&self) -> Result<Option<CardRef>, StorefrontError> {
        self.begin("find_any_selected_card".to_string(), "find_any_selected_card")
            .await?;
        let state = self.state.read().await;
        Ok(state.selected.clone().map(CardRef::new))
    }

    async fn go_to_cart_review(&self, card: &CardRef) -> Result<bool, StorefrontError> {
        self.begin(
            format!("go_to_cart_review:{}", card.id()),
            "go_to_cart_review",
        )
        .await?;
        Ok(self.state.read().await.review_ok)
    }

    async fn cart_has_sold_out_warning(&self) -> Result<bool, StorefrontError> {
        self.begin(
            "cart_has_sold_out_warning".to_string(),
            "cart_has_sold_out_warning",
        )
        .await?;
        Ok(self.state.read().await.warning.is_some())
    }

    async fn cart_sold_out_item_names(&self) -> Result<Vec<String>, StorefrontError> {
        self.begin(
            "cart_sold_out_item_names".to_string(),
            "cart_sold_out_item_names",
        )
        .await?;
        let state = self.state.read().await;
        Ok(state
            .warning
            .as_ref()
            .map(|w| w.item_names.clone())
            .unwrap_or_default())
    }

    async fn cart_warning_text(&self) -> Result<String, StorefrontError> {
        self.begin("cart_warning_text".to_string(), "cart_warning_text")
            .await?;
        let state = self.state.read().await;
        Ok(state
            .warning
            .as_ref()
            .map(|w| w.text.clone())
            .unwrap_or_default())
    }

    async fn remove_cart_items(&self, names: &[String]) -> Result<Vec<String>, StorefrontError> {
        self.begin("remove_cart_items".to_string(), "remove_cart_items")
            .await?;
        let mut state = self.state.write().await;
        let removed: Vec<String> = names.to_vec();
        state.removed.extend(removed.iter().cloned());
        state.cart.retain(|title| !names.contains(title));
        let persists = state.warning.as_ref().is_some_and(|w| w.persists);
        if !persists {
            state.warning = None;
        }
        Ok(removed)
    }

    async fn proceed_to_checkout(&self) -> Result<bool, StorefrontError> {
        self.begin("proceed_to_checkout".to_string(), "proceed_to_checkout")
            .await?;
        Ok(self.state.read().await.checkout_ok)
    }

    async fn fill_payment_form(&self, details: &PaymentDetails) -> Result<(), StorefrontError> {
        self.begin("fill_payment_form".to_string(), "fill_payment_form")
            .await?;
        self.state.write().await.filled.push(details.clone());
        Ok(())
    }

    async fn order_total(&self) -> Result<String, StorefrontError> {
        self.begin("order_total".to_string(), "order_total").await?;
        Ok(self.state.read().await.order_total.clone())
    }

    async fn has_validation_error(&self) -> Result<bool, StorefrontError> {
        self.begin("has_validation_error".to_string(), "has_validation_error")
            .await?;
        Ok(self.state.read().await.validation_error)
    }

    async fn submit_order(&self) -> Result<bool, StorefrontError> {
        self.begin("submit_order".to_string(), "submit_order").await?;
        let mut state = self.state.write().await;
        state.submits += 1;
        Ok(state.submit_ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_find_candidate_matches_case_insensitive() {
        let storefront = MockStorefront::new();
        storefront
            .set_products(vec![fixtures::product("Gold Sponsorship", "$1,500.00")])
            .await;

        let card = storefront.find_candidate("gold").await.unwrap();
        assert_eq!(card.unwrap().id(), "Gold Sponsorship");

        let missing = storefront.find_candidate("Platinum").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_hidden_product_revealed_by_rounds() {
        let storefront = MockStorefront::new();
        storefront
            .set_products(vec![
                MockProduct::new("Gold Sponsorship", "$1,500.00").hidden_for(2)
            ])
            .await;

        assert!(storefront.find_candidate("Gold").await.unwrap().is_none());
        assert!(storefront.reveal_more().await.unwrap());
        assert!(storefront.find_candidate("Gold").await.unwrap().is_none());
        assert!(storefront.reveal_more().await.unwrap());
        assert!(storefront.find_candidate("Gold").await.unwrap().is_some());
        // Everything visible now.
        assert!(!storefront.reveal_more().await.unwrap());
    }

    #[tokio::test]
    async fn test_search_resets_reveals() {
        let storefront = MockStorefront::new();
        storefront
            .set_products(vec![
                MockProduct::new("Gold Sponsorship", "$1,500.00").hidden_for(1)
            ])
            .await;

        storefront.reveal_more().await.unwrap();
        assert!(storefront.find_candidate("Gold").await.unwrap().is_some());

        storefront.search("Gold").await.unwrap();
        assert!(storefront.find_candidate("Gold").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_to_cart_and_selected() {
        let storefront = MockStorefront::new();
        storefront
            .set_products(vec![fixtures::product("Gold Sponsorship", "$1,500.00")])
            .await;

        let card = storefront.find_candidate("Gold").await.unwrap().unwrap();
        assert!(storefront.add_to_cart(&card).await.unwrap());
        assert_eq!(storefront.cart_titles().await, vec!["Gold Sponsorship"]);

        let selected = storefront.find_any_selected_card().await.unwrap().unwrap();
        assert_eq!(selected.id(), "Gold Sponsorship");
    }

    #[tokio::test]
    async fn test_sold_out_product_not_addable() {
        let storefront = MockStorefront::new();
        storefront
            .set_products(vec![fixtures::sold_out_product(
                "Gold Sponsorship",
                "$1,500.00",
            )])
            .await;

        let card = storefront.find_candidate("Gold").await.unwrap().unwrap();
        assert!(!storefront.is_available(&card).await.unwrap());
        assert!(!storefront.add_to_cart(&card).await.unwrap());
        assert!(storefront.cart_titles().await.is_empty());
    }

    #[tokio::test]
    async fn test_error_injection_is_one_shot() {
        let storefront = MockStorefront::new();
        storefront
            .set_next_error("login", StorefrontError::Timeout)
            .await;

        assert!(storefront.login().await.is_err());
        assert_ok!(storefront.login().await);
        assert_eq!(storefront.call_count("login").await, 2);
    }

    #[tokio::test]
    async fn test_remove_cart_items_clears_warning() {
        let storefront = MockStorefront::new();
        storefront
            .set_cart_warning(Some(MockCartWarning {
                item_names: vec!["Gold Sponsorship".to_string()],
                text: String::new(),
                persists: false,
            }))
            .await;

        assert!(storefront.cart_has_sold_out_warning().await.unwrap());
        let removed = storefront
            .remove_cart_items(&["Gold Sponsorship".to_string()])
            .await
            .unwrap();
        assert_eq!(removed, vec!["Gold Sponsorship"]);
        assert!(!storefront.cart_has_sold_out_warning().await.unwrap());
    }

    #[tokio::test]
    async fn test_call_recording() {
        let storefront = MockStorefront::new();
        storefront.login().await.unwrap();
        storefront.search("Gold").await.unwrap();
        storefront.search("Silver").await.unwrap();

        assert_eq!(storefront.call_count("login").await, 1);
        assert_eq!(storefront.call_count("search").await, 2);
        assert_eq!(storefront.searches().await, vec!["Gold", "Silver"]);
    }
}
