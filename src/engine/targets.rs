//! Take-profit evaluation: net P&L, risk/reward and a recommendation tier per
//! target, plus the best target overall.
//!
//! "Bad" trades are legitimate output here. A target on the losing side of
//! entry is evaluated like any other and simply graded poor.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;

use super::checked;
use super::error::CalcError;
use super::fees::Fees;
use super::position_sizer::Sizing;
use super::validator::Validated;
use crate::models::{BestTarget, RiskReward, TargetResult, Tier};

/// Signed P&L of the risk-sized position if it closes at `price`.
struct Pnl {
    percent_move: Decimal,
    gross: Decimal,
    net: Decimal,
}

fn pnl_at(
    input: &Validated<'_>,
    sizing: &Sizing,
    fees: &Fees,
    price: Decimal,
) -> Result<Pnl, CalcError> {
    let fraction = checked(input.side.signed_move(input.entry_price, price), "price move")?;
    let percent_move = checked(fraction.checked_mul(dec!(100)), "price move")?;
    let gross = checked(sizing.position_size_base.checked_mul(fraction), "gross P&L")?;
    let net = checked(gross.checked_sub(fees.total_fees), "net P&L")?;

    Ok(Pnl {
        percent_move,
        gross,
        net,
    })
}

/// Signed P&L realized if the stop is hit, fees included.
pub fn loss_at_stop(
    input: &Validated<'_>,
    sizing: &Sizing,
    fees: &Fees,
) -> Result<Decimal, CalcError> {
    Ok(pnl_at(input, sizing, fees, input.stop_loss)?.net)
}

fn risk_reward(net_pnl: Decimal, loss_at_stop: Decimal) -> Result<RiskReward, CalcError> {
    if loss_at_stop.is_zero() {
        return Ok(RiskReward::Undefined);
    }
    let ratio = checked(net_pnl.abs().checked_div(loss_at_stop.abs()), "risk/reward")?;
    Ok(RiskReward::Ratio(ratio))
}

fn tier(net_pnl: Decimal, risk_reward: RiskReward) -> Tier {
    match risk_reward {
        RiskReward::Ratio(ratio) if net_pnl > Decimal::ZERO => Tier::from_ratio(ratio),
        _ => Tier::Poor,
    }
}

/// Evaluate every take-profit in input order.
pub fn evaluate(
    input: &Validated<'_>,
    sizing: &Sizing,
    fees: &Fees,
    loss_at_stop: Decimal,
) -> Result<Vec<TargetResult>, CalcError> {
    input
        .take_profits
        .iter()
        .enumerate()
        .map(|(i, &price)| {
            let pnl = pnl_at(input, sizing, fees, price)?;
            if pnl.percent_move <= Decimal::ZERO {
                warn!(
                    target = i + 1,
                    price = %price,
                    side = %input.side,
                    "Take-profit is not beyond entry in the trade direction"
                );
            }

            let risk_reward = risk_reward(pnl.net, loss_at_stop)?;
            Ok(TargetResult {
                price,
                percent_move: pnl.percent_move,
                gross_pnl: pnl.gross,
                net_pnl: pnl.net,
                risk_reward,
                tier: tier(pnl.net, risk_reward),
            })
        })
        .collect()
}

/// Pick the target with the highest risk/reward; the earliest wins a tie.
///
/// Ranking uses the ratio signed by the net P&L, so a losing target never
/// outranks a profitable one. Targets with an undefined ratio are skipped.
pub fn best_target(targets: &[TargetResult]) -> Option<BestTarget> {
    let mut best: Option<(Decimal, BestTarget)> = None;

    for (index, t) in targets.iter().enumerate() {
        let Some(ratio) = t.risk_reward.ratio() else {
            continue;
        };
        let rank = if t.net_pnl < Decimal::ZERO { -ratio } else { ratio };

        let better = match &best {
            Some((best_rank, _)) => rank > *best_rank,
            None => true,
        };
        if better {
            best = Some((
                rank,
                BestTarget {
                    index,
                    price: t.price,
                    risk_reward: ratio,
                    tier: t.tier,
                },
            ));
        }
    }

    best.map(|(_, b)| b)
}
