use std::fmt;

use thiserror::Error;

/// Input field named by [`CalcError::InvalidParameter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    EntryPrice,
    StopLoss,
    Capital,
    Leverage,
    FeePercent,
    RiskPercent,
    /// Take-profit at the given input position
    TakeProfit(usize),
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::EntryPrice => f.write_str("entry_price"),
            Field::StopLoss => f.write_str("stop_loss"),
            Field::Capital => f.write_str("capital"),
            Field::Leverage => f.write_str("leverage"),
            Field::FeePercent => f.write_str("fee_percent"),
            Field::RiskPercent => f.write_str("risk_percent"),
            Field::TakeProfit(i) => write!(f, "take_profits[{i}]"),
        }
    }
}

/// Structural failures of a calculation.
///
/// Every variant is caller-actionable: fix the input and call again. Per-target
/// anomalies (an undefined risk/reward) are carried as data on the result and
/// never show up here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(Field),

    #[error("stop loss equals entry price; stop distance would be zero")]
    DegenerateStopLoss,

    #[error("no take-profit target provided")]
    NoTakeProfitProvided,

    /// A derived value left the representable decimal range (overflow, or a
    /// size that rounds to zero).
    #[error("value out of decimal range while computing {0}")]
    OutOfRange(&'static str),
}
