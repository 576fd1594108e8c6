//! # Configuration State
//!
//! Host configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`WAYFARE_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::PathBuf;

use serde::Serialize;
use tracing::warn;
use wayfare_core::validation::{validate_page_size, validate_tax_rate_bps};
use wayfare_core::{FlowSettings, Money, TaxRate, DEFAULT_PAGE_SIZE, LODGING_TAX_RATE};

/// Host configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Units per page of availability results
    pub page_size: usize,

    /// Lodging tax rate in basis points
    /// e.g., 1000 = 10%
    pub tax_rate_bps: u32,

    /// JSON file with catalogs; `None` uses the built-in demo catalogs
    pub catalog_path: Option<PathBuf>,
}

impl Default for ConfigState {
    /// ## Default Values
    /// - Currency: VND (₫)
    /// - Page size: 3
    /// - Tax: 10% on lodging
    /// - Catalogs: built-in demo
    fn default() -> Self {
        ConfigState {
            currency_code: "VND".to_string(),
            currency_symbol: "₫".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            tax_rate_bps: LODGING_TAX_RATE.bps(),
            catalog_path: None,
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `WAYFARE_CURRENCY`: Override currency code
    /// - `WAYFARE_PAGE_SIZE`: Override page size (e.g., "5")
    /// - `WAYFARE_TAX_RATE`: Override lodging tax rate in percent (e.g., "8.5")
    /// - `WAYFARE_CATALOG_PATH`: Load catalogs from a JSON file
    pub fn from_env() -> Self {
        ConfigState::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ConfigState::from_env`] with an injectable variable source.
    ///
    /// Values that fail to parse or validate are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();

        if let Some(code) = lookup("WAYFARE_CURRENCY") {
            let code = code.trim();
            if code.is_empty() {
                warn!("WAYFARE_CURRENCY is empty, keeping {}", config.currency_code);
            } else {
                config.currency_code = code.to_uppercase();
            }
        }

        if let Some(raw) = lookup("WAYFARE_PAGE_SIZE") {
            match raw.trim().parse::<usize>() {
                Ok(size) if validate_page_size(size).is_ok() => config.page_size = size,
                _ => warn!(value = %raw, "Ignoring invalid WAYFARE_PAGE_SIZE"),
            }
        }

        if let Some(raw) = lookup("WAYFARE_TAX_RATE") {
            match raw.trim().parse::<f64>() {
                Ok(pct) if pct.is_finite() && pct >= 0.0 => {
                    let bps = TaxRate::from_percentage(pct).bps();
                    match validate_tax_rate_bps(bps) {
                        Ok(()) => config.tax_rate_bps = bps,
                        Err(e) => warn!(value = %raw, "Ignoring WAYFARE_TAX_RATE: {}", e),
                    }
                }
                _ => warn!(value = %raw, "Ignoring invalid WAYFARE_TAX_RATE"),
            }
        }

        if let Some(path) = lookup("WAYFARE_CATALOG_PATH") {
            if !path.trim().is_empty() {
                config.catalog_path = Some(PathBuf::from(path.trim()));
            }
        }

        config
    }

    /// Engine settings for a new booking flow.
    pub fn flow_settings(&self) -> FlowSettings {
        FlowSettings {
            page_size: self.page_size,
            tax_rate: TaxRate::from_bps(self.tax_rate_bps),
        }
    }

    /// Formats an amount for logs and display, e.g. `1,300,000 ₫`.
    pub fn format_money(&self, amount: Money) -> String {
        format!("{} {}", amount, self.currency_symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConfigState::from_lookup(lookup(&[]));
        assert_eq!(config, ConfigState::default());
        assert_eq!(config.page_size, 3);
        assert_eq!(config.tax_rate_bps, 1000);
    }

    #[test]
    fn test_env_overrides() {
        let config = ConfigState::from_lookup(lookup(&[
            ("WAYFARE_CURRENCY", "usd"),
            ("WAYFARE_PAGE_SIZE", "5"),
            ("WAYFARE_TAX_RATE", "8.5"),
            ("WAYFARE_CATALOG_PATH", "/tmp/catalog.json"),
        ]));
        assert_eq!(config.currency_code, "USD");
        assert_eq!(config.page_size, 5);
        assert_eq!(config.tax_rate_bps, 850);
        assert_eq!(config.catalog_path, Some(PathBuf::from("/tmp/catalog.json")));
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = ConfigState::from_lookup(lookup(&[
            ("WAYFARE_PAGE_SIZE", "0"),
            ("WAYFARE_TAX_RATE", "ten"),
        ]));
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.tax_rate_bps, LODGING_TAX_RATE.bps());

        let config = ConfigState::from_lookup(lookup(&[("WAYFARE_TAX_RATE", "-3")]));
        assert_eq!(config.tax_rate_bps, LODGING_TAX_RATE.bps());
    }

    #[test]
    fn test_format_money() {
        let config = ConfigState::default();
        assert_eq!(config.format_money(Money::from_minor(1_300_000)), "1,300,000 ₫");
    }

    #[test]
    fn test_flow_settings() {
        let settings = ConfigState::default().flow_settings();
        assert_eq!(settings, FlowSettings::default());
    }
}
