//! Entry price sources.
//!
//! The engine never fetches prices. The CLI resolves an entry price through a
//! [`PriceSource`] before building a trade input.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("no price available for {0}")]
    Unavailable(String),

    #[error("price for {symbol} must be positive, got {price}")]
    NonPositive { symbol: String, price: Decimal },
}

/// Anything that can quote a symbol.
pub trait PriceSource {
    fn price(&self, symbol: &str) -> Result<Decimal, PriceError>;
}

/// A price the trader typed in; quotes the same value for any symbol.
#[derive(Debug, Clone, Copy)]
pub struct ManualPrice(pub Decimal);

impl PriceSource for ManualPrice {
    fn price(&self, symbol: &str) -> Result<Decimal, PriceError> {
        if self.0 <= Decimal::ZERO {
            return Err(PriceError::NonPositive {
                symbol: symbol.to_string(),
                price: self.0,
            });
        }
        Ok(self.0)
    }
}

/// Fixed quote table keyed by symbol (case-insensitive).
#[derive(Debug, Clone, Default)]
pub struct StaticQuotes {
    quotes: HashMap<String, Decimal>,
}

impl StaticQuotes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offline reference quotes for the majors.
    pub fn reference() -> Self {
        Self::new()
            .with_quote("BTCUSDT", dec!(98500))
            .with_quote("ETHUSDT", dec!(2700))
    }

    pub fn with_quote(mut self, symbol: &str, price: Decimal) -> Self {
        self.quotes.insert(symbol.to_uppercase(), price);
        self
    }
}

impl PriceSource for StaticQuotes {
    fn price(&self, symbol: &str) -> Result<Decimal, PriceError> {
        let key = symbol.to_uppercase();
        let price = self
            .quotes
            .get(&key)
            .copied()
            .ok_or_else(|| PriceError::Unavailable(key.clone()))?;
        ManualPrice(price).price(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_price_must_be_positive() {
        assert_eq!(ManualPrice(dec!(101.5)).price("X").unwrap(), dec!(101.5));
        assert!(matches!(
            ManualPrice(Decimal::ZERO).price("X"),
            Err(PriceError::NonPositive { .. })
        ));
    }

    #[test]
    fn test_reference_quotes() {
        let quotes = StaticQuotes::reference();
        assert_eq!(quotes.price("btcusdt").unwrap(), dec!(98500));
        assert_eq!(quotes.price("ETHUSDT").unwrap(), dec!(2700));
    }

    #[test]
    fn test_unknown_symbol_is_unavailable_not_a_default() {
        let quotes = StaticQuotes::reference();
        assert_eq!(
            quotes.price("DOGEUSDT"),
            Err(PriceError::Unavailable("DOGEUSDT".to_string()))
        );
    }
}
