use super::{types::Config, ConfigError};

/// Validate configuration.
///
/// Enforces the contract the orchestrator relies on:
/// - at least one search keyword, none blank, no case-insensitive duplicates
/// - every payment field populated, month 1-12, four-digit year
/// - a non-zero polling interval (the runtime additionally floors it)
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.search_keywords.is_empty() {
        return Err(ConfigError::ValidationError(
            "search_keywords cannot be empty".to_string(),
        ));
    }

    let mut seen = Vec::with_capacity(config.search_keywords.len());
    for keyword in &config.search_keywords {
        let trimmed = keyword.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::ValidationError(
                "search_keywords cannot contain blank entries".to_string(),
            ));
        }
        let lowered = trimmed.to_lowercase();
        if seen.contains(&lowered) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate search keyword: {}",
                trimmed
            )));
        }
        seen.push(lowered);
    }

    let payment = &config.payment;
    for (field, value) in [
        ("payment.name_on_card", &payment.name_on_card),
        ("payment.card_number", &payment.card_number),
        ("payment.cvv", &payment.cvv),
        ("payment.exp_month", &payment.exp_month),
        ("payment.exp_year", &payment.exp_year),
        ("payment.billing_zip", &payment.billing_zip),
        ("payment.confirmation_email", &payment.confirmation_email),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                field
            )));
        }
    }

    match payment.exp_month.trim().parse::<u8>() {
        Ok(month) if (1..=12).contains(&month) => {}
        _ => {
            return Err(ConfigError::ValidationError(format!(
                "payment.exp_month must be 1-12, got '{}'",
                payment.exp_month
            )));
        }
    }

    let year = payment.exp_year.trim();
    if year.len() != 4 || year.parse::<u16>().is_err() {
        return Err(ConfigError::ValidationError(format!(
            "payment.exp_year must be a four-digit year, got '{}'",
            payment.exp_year
        )));
    }

    if config.monitor.interval_seconds == 0 {
        return Err(ConfigError::ValidationError(
            "monitor.interval_seconds cannot be 0".to_string(),
        ));
    }

    Ok(())
}
