//! Trade parameters supplied by the caller for a single calculation.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a leveraged position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Long,
    Short,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Long => "LONG",
            Side::Short => "SHORT",
        }
    }

    /// Signed price move from `entry` to `price`, as a fraction of `entry`.
    ///
    /// Positive when the move favours this side. `None` if `entry` is zero or
    /// the result leaves the decimal range.
    pub fn signed_move(&self, entry: Decimal, price: Decimal) -> Option<Decimal> {
        let diff = match self {
            Side::Long => price.checked_sub(entry)?,
            Side::Short => entry.checked_sub(price)?,
        };
        diff.checked_div(entry)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "long" | "buy" => Ok(Side::Long),
            "short" | "sell" => Ok(Side::Short),
            other => Err(format!("unknown side '{other}' (expected long or short)")),
        }
    }
}

/// Inputs for one position-risk calculation.
///
/// Built fresh for every request; nothing here is cached or reused by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeInput {
    /// Price at which the position is opened
    pub entry_price: Decimal,

    /// Price at which the position is closed to cap the loss
    pub stop_loss: Decimal,

    /// Take-profit targets, evaluated in the given order
    pub take_profits: Vec<Decimal>,

    /// Exposure multiplier relative to posted margin (>= 1)
    pub leverage: Decimal,

    /// Account equity in quote currency
    pub capital: Decimal,

    /// Percentage of capital allowed to be lost at the stop, in (0, 100]
    pub risk_percent: Decimal,

    /// Per-side fee rate in percent (0.04 means 0.04%)
    pub fee_percent: Decimal,

    /// Position direction
    pub side: Side,
}
