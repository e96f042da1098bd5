//! P&L profile of a trade across its key price levels.
//!
//! Produces the data for a P&L-vs-price chart (stop, entry, targets and a 5%
//! margin either side) without rendering anything.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::engine::{validate, CalcError};
use crate::models::TradeInput;

/// Margin below the lowest and above the highest level.
const RANGE_PADDING: Decimal = dec!(0.05);

/// What a price on the ladder represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    RangeLow,
    StopLoss,
    Entry,
    /// 1-based take-profit number in input order
    TakeProfit(usize),
    RangeHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProfilePoint {
    pub level: Level,
    pub price: Decimal,
    /// Signed move from entry in percent, positive favours the position
    pub pnl_percent: Decimal,
}

/// Build the price ladder for `input`: range low, stop, entry, the targets
/// sorted by price, range high.
pub fn pnl_profile(input: &TradeInput) -> Result<Vec<ProfilePoint>, CalcError> {
    let input = validate(input)?;

    let mut targets: Vec<(usize, Decimal)> = input
        .take_profits
        .iter()
        .enumerate()
        .map(|(i, &p)| (i + 1, p))
        .collect();
    targets.sort_by(|a, b| a.1.cmp(&b.1));

    let all_prices = [input.entry_price, input.stop_loss]
        .into_iter()
        .chain(targets.iter().map(|(_, p)| *p));
    let (mut low, mut high) = (input.entry_price, input.entry_price);
    for p in all_prices {
        low = low.min(p);
        high = high.max(p);
    }

    let mut levels = Vec::with_capacity(targets.len() + 4);
    levels.push((Level::RangeLow, low * (Decimal::ONE - RANGE_PADDING)));
    levels.push((Level::StopLoss, input.stop_loss));
    levels.push((Level::Entry, input.entry_price));
    levels.extend(targets.into_iter().map(|(n, p)| (Level::TakeProfit(n), p)));
    levels.push((
        Level::RangeHigh,
        high.checked_mul(Decimal::ONE + RANGE_PADDING)
            .ok_or(CalcError::OutOfRange("profile range"))?,
    ));

    levels
        .into_iter()
        .map(|(level, price)| {
            let pnl_percent = input
                .side
                .signed_move(input.entry_price, price)
                .and_then(|m| m.checked_mul(dec!(100)))
                .ok_or(CalcError::OutOfRange("profile move"))?;
            Ok(ProfilePoint {
                level,
                price,
                pnl_percent,
            })
        })
        .collect()
}
