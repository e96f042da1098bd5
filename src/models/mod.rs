//! Data models for trade inputs and calculation results.

mod calculation;
mod trade_input;

pub use calculation::{
    BestTarget, CalculationResult, RiskReward, TargetResult, Tier, ACCEPTABLE_RISK_REWARD,
    EXCELLENT_RISK_REWARD,
};
pub use trade_input::{Side, TradeInput};
