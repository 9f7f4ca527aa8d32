//! Storefront automation boundary.
//!
//! This module provides the `StorefrontSession` trait abstracting the browser
//! automation layer that drives the live storefront (login, catalog search,
//! cart and checkout manipulation). Implementations own element location and
//! waiting; every call carries its own bounded wait.

mod types;

pub use types::*;
