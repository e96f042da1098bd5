//! Leveraged crypto position risk calculator.
//!
//! Sizes a position so that a stop-loss hit costs a fixed share of capital,
//! then prices fees, estimates liquidation and grades each take-profit by its
//! risk/reward. The [`engine`] is pure; config, history and price lookup are
//! the plumbing around it.

pub mod config;
pub mod engine;
pub mod history;
pub mod models;
pub mod price;
pub mod profile;

pub use engine::{calculate, CalcError, Field};
pub use models::{
    BestTarget, CalculationResult, RiskReward, Side, TargetResult, Tier, TradeInput,
};
