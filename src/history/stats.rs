//! Summary statistics and the planned-P&L equity curve over the history.

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use statrs::statistics::Statistics;

use super::TradeRecord;
use crate::models::Tier;

/// One point of the cumulative planned P&L curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EquityPoint {
    /// 1-based position in the history
    pub trade_number: usize,
    /// Net P&L at the first take-profit of this trade
    pub pnl: Decimal,
    pub cumulative: Decimal,
}

/// Cumulative sum of each trade's first-target net P&L, saturating at the
/// decimal range.
pub fn equity_curve(records: &[TradeRecord]) -> Vec<EquityPoint> {
    let mut cumulative = Decimal::ZERO;
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let pnl = record
                .result
                .targets
                .first()
                .map(|t| t.net_pnl)
                .unwrap_or(Decimal::ZERO);
            cumulative = cumulative.saturating_add(pnl);
            EquityPoint {
                trade_number: i + 1,
                pnl,
                cumulative,
            }
        })
        .collect()
}

/// Aggregate view of the recorded calculations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySummary {
    pub total_trades: usize,
    pub excellent: usize,
    pub acceptable: usize,
    pub poor: usize,
    /// Sum of the risk amounts of all trades
    pub total_risk: Decimal,
    /// Sum of the first-target net P&L of all trades
    pub planned_pnl: Decimal,
    pub avg_risk_reward: f64,
    pub risk_reward_std_dev: f64,
}

impl HistorySummary {
    pub fn from_records(records: &[TradeRecord]) -> Self {
        let mut summary = Self {
            total_trades: records.len(),
            excellent: 0,
            acceptable: 0,
            poor: 0,
            total_risk: Decimal::ZERO,
            planned_pnl: equity_curve(records)
                .last()
                .map(|p| p.cumulative)
                .unwrap_or(Decimal::ZERO),
            avg_risk_reward: 0.0,
            risk_reward_std_dev: 0.0,
        };

        let mut ratios: Vec<f64> = Vec::with_capacity(records.len());
        for record in records {
            summary.total_risk = summary
                .total_risk
                .saturating_add(record.result.risk_amount);

            // A trade with no defined ratio grades as poor.
            match record.result.best_target {
                Some(best) => {
                    match best.tier {
                        Tier::Excellent => summary.excellent += 1,
                        Tier::Acceptable => summary.acceptable += 1,
                        Tier::Poor => summary.poor += 1,
                    }
                    if let Some(r) = best.risk_reward.to_f64() {
                        ratios.push(r);
                    }
                }
                None => summary.poor += 1,
            }
        }

        if !ratios.is_empty() {
            summary.avg_risk_reward = ratios.clone().mean();
        }
        if ratios.len() > 1 {
            summary.risk_reward_std_dev = ratios.std_dev();
        }

        summary
    }
}

impl fmt::Display for HistorySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n{:=^50}", " HISTORY ")?;
        writeln!(f, "Trades:           {}", self.total_trades)?;
        writeln!(f, "Excellent:        {}", self.excellent)?;
        writeln!(f, "Acceptable:       {}", self.acceptable)?;
        writeln!(f, "Poor:             {}", self.poor)?;
        writeln!(f)?;
        writeln!(f, "Total Risk:       ${:.2}", self.total_risk.round_dp(2))?;
        writeln!(f, "Planned P&L:      ${:+.2}", self.planned_pnl.round_dp(2))?;
        writeln!(f, "Avg Best R:R:     {:.2}", self.avg_risk_reward)?;
        writeln!(f, "R:R Std Dev:      {:.2}", self.risk_reward_std_dev)?;
        writeln!(f, "{:=^50}", "")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::tests::make_record;
    use rust_decimal_macros::dec;

    #[test]
    fn test_equity_curve_accumulates_first_target() {
        let records = vec![
            make_record("A", dec!(55000)), // +23
            make_record("B", dec!(40000)), // 250 * -0.2 - 2 = -52
            make_record("C", dec!(60000)), // +48
        ];
        let curve = equity_curve(&records);

        let cumulative: Vec<Decimal> = curve.iter().map(|p| p.cumulative).collect();
        assert_eq!(cumulative, vec![dec!(23), dec!(-29), dec!(19)]);
        assert_eq!(curve[1].trade_number, 2);
        assert_eq!(curve[1].pnl, dec!(-52));
    }

    #[test]
    fn test_summary_counts_tiers() {
        let records = vec![
            make_record("A", dec!(55000)),
            make_record("B", dec!(40000)),
            make_record("C", dec!(60000)),
        ];
        let summary = HistorySummary::from_records(&records);

        assert_eq!(summary.total_trades, 3);
        assert_eq!(summary.acceptable, 1);
        assert_eq!(summary.poor, 1);
        assert_eq!(summary.excellent, 1);
        assert_eq!(summary.total_risk, dec!(30));
        assert_eq!(summary.planned_pnl, dec!(19));
        assert!(summary.avg_risk_reward > 0.0);
        assert!(summary.risk_reward_std_dev > 0.0);
    }

    #[test]
    fn test_extreme_values_saturate() {
        let mut huge = make_record("BTCUSDT", dec!(55000));
        huge.result.risk_amount = Decimal::MAX;
        huge.result.targets[0].net_pnl = Decimal::MAX;
        let records = vec![huge.clone(), huge];

        let curve = equity_curve(&records);
        assert_eq!(curve[1].cumulative, Decimal::MAX);

        let summary = HistorySummary::from_records(&records);
        assert_eq!(summary.total_risk, Decimal::MAX);
        assert_eq!(summary.planned_pnl, Decimal::MAX);
    }

    #[test]
    fn test_empty_summary() {
        let summary = HistorySummary::from_records(&[]);
        assert_eq!(summary.total_trades, 0);
        assert_eq!(summary.planned_pnl, Decimal::ZERO);
        assert_eq!(summary.avg_risk_reward, 0.0);
    }
}
