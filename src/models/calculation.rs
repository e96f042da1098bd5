//! Derived output of a position-risk calculation.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Risk/reward at or above this is graded excellent.
pub const EXCELLENT_RISK_REWARD: Decimal = dec!(2.0);

/// Risk/reward at or above this (and below excellent) is graded acceptable.
pub const ACCEPTABLE_RISK_REWARD: Decimal = dec!(1.5);

/// Recommendation grade for a take-profit target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Poor,
    Acceptable,
    Excellent,
}

impl Tier {
    /// Grade a risk/reward ratio against the fixed thresholds.
    pub fn from_ratio(ratio: Decimal) -> Self {
        if ratio >= EXCELLENT_RISK_REWARD {
            Tier::Excellent
        } else if ratio >= ACCEPTABLE_RISK_REWARD {
            Tier::Acceptable
        } else {
            Tier::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Poor => "POOR",
            Tier::Acceptable => "ACCEPTABLE",
            Tier::Excellent => "EXCELLENT",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Risk/reward of a target relative to the loss at the stop.
///
/// `Undefined` is carried when the loss at the stop is zero, so the ratio has
/// no denominator. It is never coerced to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskReward {
    Ratio(Decimal),
    Undefined,
}

impl RiskReward {
    pub fn ratio(&self) -> Option<Decimal> {
        match self {
            RiskReward::Ratio(r) => Some(*r),
            RiskReward::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, RiskReward::Undefined)
    }
}

impl fmt::Display for RiskReward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskReward::Ratio(r) => f.pad(&format!("{:.2}", r.round_dp(2))),
            RiskReward::Undefined => f.pad("undefined"),
        }
    }
}

/// Evaluation of a single take-profit target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetResult {
    /// Target price (echo of the input)
    pub price: Decimal,

    /// Signed distance from entry in percent; positive favours the position
    pub percent_move: Decimal,

    /// P&L before fees
    pub gross_pnl: Decimal,

    /// P&L after entry and exit fees
    pub net_pnl: Decimal,

    /// |net P&L| / |loss at stop|
    pub risk_reward: RiskReward,

    /// Recommendation grade
    pub tier: Tier,
}

impl TargetResult {
    /// Whether reaching this target leaves the trade in profit after fees.
    pub fn is_profitable(&self) -> bool {
        self.net_pnl > Decimal::ZERO
    }
}

/// Summary of the target with the highest risk/reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestTarget {
    /// Position of the target in the input order (0-based)
    pub index: usize,
    pub price: Decimal,
    pub risk_reward: Decimal,
    pub tier: Tier,
}

/// Complete output of the calculation engine.
///
/// Constructed once, fully populated, and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Currency amount allowed to be lost at the stop (capital * risk%)
    pub risk_amount: Decimal,

    /// |entry - stop| / entry
    pub stop_distance_pct: Decimal,

    /// Unleveraged position size sized from the risk amount
    pub position_size_base: Decimal,

    /// Leveraged exposure value
    pub leveraged_notional: Decimal,

    /// Contract quantity in base asset units
    pub quantity: Decimal,

    pub entry_fee: Decimal,
    pub exit_fee: Decimal,
    pub total_fees: Decimal,

    /// Signed P&L if the stop is hit, fees included
    pub loss_at_stop: Decimal,

    /// Approximate liquidation price; ignores funding, maintenance-margin
    /// tiers and margin mode, so treat it as a sanity indicator only
    pub liquidation_price: Decimal,

    /// One entry per input take-profit, in input order
    pub targets: Vec<TargetResult>,

    /// Target with the highest risk/reward, `None` when no ratio is defined
    pub best_target: Option<BestTarget>,
}

impl CalculationResult {
    /// The target result for the best target, if any.
    pub fn best(&self) -> Option<&TargetResult> {
        self.best_target.and_then(|b| self.targets.get(b.index))
    }
}

impl fmt::Display for CalculationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n{:=^60}", " POSITION ")?;
        writeln!(f, "Risk Amount:      ${:.2}", self.risk_amount.round_dp(2))?;
        writeln!(f, "Stop Distance:    {:.2}%", (self.stop_distance_pct * dec!(100)).round_dp(2))?;
        writeln!(f, "Position Size:    ${:.2} (margin)", self.position_size_base.round_dp(2))?;
        writeln!(f, "Notional:         ${:.2}", self.leveraged_notional.round_dp(2))?;
        writeln!(f, "Quantity:         {:.6}", self.quantity.round_dp(6))?;
        writeln!(f)?;
        writeln!(f, "--- Fees ---")?;
        writeln!(f, "Entry:            ${:.4}", self.entry_fee.round_dp(4))?;
        writeln!(f, "Exit:             ${:.4}", self.exit_fee.round_dp(4))?;
        writeln!(f, "Total:            ${:.4}", self.total_fees.round_dp(4))?;
        writeln!(f)?;
        writeln!(f, "--- Risk ---")?;
        writeln!(f, "Loss at Stop:     ${:+.2}", self.loss_at_stop.round_dp(2))?;
        writeln!(f, "Liquidation (~):  {:.4}", self.liquidation_price.round_dp(4))?;
        writeln!(f)?;
        writeln!(f, "--- Targets ---")?;
        for (i, t) in self.targets.iter().enumerate() {
            writeln!(
                f,
                "TP{}: {} ({:+.2}%) -> P&L: ${:+.2} | R:R {} | {}",
                i + 1,
                t.price,
                t.percent_move.round_dp(2),
                t.net_pnl.round_dp(2),
                t.risk_reward,
                t.tier
            )?;
        }
        if let Some(best) = &self.best_target {
            writeln!(f)?;
            writeln!(
                f,
                "Best: TP{} @ {} (R:R {:.2}, {})",
                best.index + 1,
                best.price,
                best.risk_reward.round_dp(2),
                best.tier
            )?;
        }
        writeln!(f, "{:=^60}", "")?;
        Ok(())
    }
}
