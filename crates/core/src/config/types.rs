use serde::{Deserialize, Serialize};

use crate::monitor::MonitorConfig;
use crate::storefront::PaymentDetails;

/// Root run configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Candidate search keywords in priority order (highest first).
    pub search_keywords: Vec<String>,

    /// Payment details used to fill the checkout form.
    pub payment: PaymentDetails,

    #[serde(default)]
    pub monitor: MonitorConfig,

    /// When true, the submission gate actually places the order. When false
    /// (the default) the run stops with the form pre-filled for human review.
    #[serde(default)]
    pub auto_submit: bool,
}

/// Sanitized config for display and logging (payment secrets redacted).
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub search_keywords: Vec<String>,
    pub payment: SanitizedPaymentConfig,
    pub monitor: MonitorConfig,
    pub auto_submit: bool,
}

/// Sanitized payment config (card number and CVV hidden).
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedPaymentConfig {
    pub name_on_card: String,
    /// Last four digits of the card number, or empty if not configured.
    pub card_last_four: String,
    pub cvv_configured: bool,
    pub exp_month: String,
    pub exp_year: String,
    pub billing_zip: String,
    pub confirmation_email: String,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let digits: String = config
            .payment
            .card_number
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        let card_last_four = if digits.len() >= 4 {
            digits[digits.len() - 4..].to_string()
        } else {
            String::new()
        };

        Self {
            search_keywords: config.search_keywords.clone(),
            payment: SanitizedPaymentConfig {
                name_on_card: config.payment.name_on_card.clone(),
                card_last_four,
                cvv_configured: !config.payment.cvv.is_empty(),
                exp_month: config.payment.exp_month.clone(),
                exp_year: config.payment.exp_year.clone(),
                billing_zip: config.payment.billing_zip.clone(),
                confirmation_email: config.payment.confirmation_email.clone(),
            },
            monitor: config.monitor.clone(),
            auto_submit: config.auto_submit,
        }
    }
}
