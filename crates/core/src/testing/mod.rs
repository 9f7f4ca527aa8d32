//! Testing utilities and mock implementations.
//!
//! This module provides a scripted mock of the storefront boundary,
//! allowing the whole orchestrator to be exercised end-to-end without a
//! browser or a live storefront.
//!
//! # Example
//!
//! ```rust,ignore
//! use sponsorcatcher_core::testing::{fixtures, MockStorefront};
//!
//! let storefront = MockStorefront::new();
//! storefront.set_products(vec![
//!     fixtures::sold_out_product("Gold Sponsorship", "$1,500.00"),
//!     fixtures::product("Silver Sponsorship", "$900.00"),
//! ]).await;
//! ```

mod mock_storefront;

pub use mock_storefront::{MockCartWarning, MockProduct, MockStorefront};

/// Test fixtures and helper functions.
pub mod fixtures {
    use super::{MockCartWarning, MockProduct};
    use crate::storefront::PaymentDetails;

    /// Create an available, immediately visible product.
    pub fn product(title: &str, price: &str) -> MockProduct {
        MockProduct::new(title, price)
    }

    /// Create a sold-out product.
    pub fn sold_out_product(title: &str, price: &str) -> MockProduct {
        MockProduct::new(title, price).sold_out()
    }

    /// Payment details with reasonable test defaults.
    pub fn payment_details() -> PaymentDetails {
        PaymentDetails {
            name_on_card: "Jane Doe".to_string(),
            card_number: "4111111111111111".to_string(),
            cvv: "123".to_string(),
            exp_month: "12".to_string(),
            exp_year: "2026".to_string(),
            billing_zip: "90210".to_string(),
            confirmation_email: "jane@example.com".to_string(),
        }
    }

    /// A structured cart warning naming the given sold-out items.
    pub fn sold_out_warning(names: &[&str]) -> MockCartWarning {
        MockCartWarning {
            item_names: names.iter().map(|n| n.to_string()).collect(),
            text: String::new(),
            persists: false,
        }
    }
}
