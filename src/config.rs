//! Application configuration.
//!
//! Defaults for the CLI when a flag is not given. The config is an explicit
//! value handed to the command that runs a calculation; the engine itself only
//! ever sees a `TradeInput`.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Order type used to pick the fee rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Maker,
    Taker,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Maker => f.write_str("maker"),
            OrderType::Taker => f.write_str("taker"),
        }
    }
}

impl FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "maker" | "limit" => Ok(OrderType::Maker),
            "taker" | "market" => Ok(OrderType::Taker),
            other => Err(format!("unknown order type '{other}' (expected maker or taker)")),
        }
    }
}

/// Persisted calculator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Account equity in quote currency
    pub capital: Decimal,

    /// Percentage of capital risked per trade
    pub risk_percent: Decimal,

    /// Per-side fee for taker (market) orders, in percent
    pub taker_fee_percent: Decimal,

    /// Per-side fee for maker (limit) orders, in percent
    pub maker_fee_percent: Decimal,

    /// Which fee rate applies by default
    pub order_type: OrderType,

    /// Leverage used when none is given
    pub default_leverage: Decimal,

    /// Exchange name recorded with each trade
    pub exchange: String,

    /// When the file was last written
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            capital: dec!(1000),
            risk_percent: dec!(1),
            taker_fee_percent: dec!(0.04),
            maker_fee_percent: dec!(0.02),
            order_type: OrderType::Taker,
            default_leverage: dec!(1),
            exchange: "Binance".to_string(),
            last_updated: None,
        }
    }
}

impl AppConfig {
    /// Load from `path`; a missing file gives the defaults.
    ///
    /// An unreadable, malformed or invalid file is an error rather than a
    /// silent reset to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate and write as pretty JSON, stamping `last_updated`.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.validate()?;
        self.last_updated = Some(Utc::now());

        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create config dir: {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("serializing config")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write config file: {}", path.display()))?;

        info!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Fee rate for the configured order type.
    pub fn fee_percent(&self) -> Decimal {
        self.fee_percent_for(self.order_type)
    }

    pub fn fee_percent_for(&self, order_type: OrderType) -> Decimal {
        match order_type {
            OrderType::Maker => self.maker_fee_percent,
            OrderType::Taker => self.taker_fee_percent,
        }
    }

    /// Check every field and report all violations at once.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if self.capital <= Decimal::ZERO {
            errors.push(format!("capital must be positive, got {}", self.capital));
        }
        if self.risk_percent <= Decimal::ZERO || self.risk_percent > dec!(100) {
            errors.push(format!(
                "risk_percent must be in (0, 100], got {}",
                self.risk_percent
            ));
        }
        if self.taker_fee_percent < Decimal::ZERO {
            errors.push(format!(
                "taker_fee_percent must not be negative, got {}",
                self.taker_fee_percent
            ));
        }
        if self.maker_fee_percent < Decimal::ZERO {
            errors.push(format!(
                "maker_fee_percent must not be negative, got {}",
                self.maker_fee_percent
            ));
        }
        if self.default_leverage < Decimal::ONE {
            errors.push(format!(
                "default_leverage must be at least 1, got {}",
                self.default_leverage
            ));
        }
        if self.exchange.trim().is_empty() {
            errors.push("exchange is empty".into());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            bail!(
                "Configuration validation failed ({} error{}):\n  - {}",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" },
                errors.join("\n  - ")
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.fee_percent(), dec!(0.04));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = AppConfig {
            capital: dec!(2500),
            order_type: OrderType::Maker,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert!(config.last_updated.is_some());

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.fee_percent(), dec!(0.02));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "capital": "500" }"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.capital, dec!(500));
        assert_eq!(config.risk_percent, dec!(1));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(AppConfig::load(&path).is_err());
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let config = AppConfig {
            capital: Decimal::ZERO,
            risk_percent: dec!(150),
            default_leverage: dec!(0.5),
            ..Default::default()
        };
        let msg = config.validate().unwrap_err().to_string();
        assert!(msg.contains("3 errors"));
        assert!(msg.contains("capital"));
        assert!(msg.contains("risk_percent"));
        assert!(msg.contains("default_leverage"));
    }

    #[test]
    fn test_order_type_parsing() {
        assert_eq!("market".parse::<OrderType>().unwrap(), OrderType::Taker);
        assert_eq!("Maker".parse::<OrderType>().unwrap(), OrderType::Maker);
        assert!("stop".parse::<OrderType>().is_err());
    }
}
