//! Risk-based position sizing.
//!
//! The size comes from the *percentage* distance to the stop, so the currency
//! amount at risk stays the same whatever the price scale of the asset.
//! Leverage scales notional and quantity but not the amount lost at the stop
//! before fees, which is always the risk amount.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::CalcError;
use super::validator::Validated;
use super::checked;

/// Output of the sizing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sizing {
    pub risk_amount: Decimal,
    pub stop_distance_pct: Decimal,
    pub position_size_base: Decimal,
    pub leveraged_notional: Decimal,
    pub quantity: Decimal,
}

/// Size a validated trade.
pub fn size(input: &Validated<'_>) -> Result<Sizing, CalcError> {
    let risk_amount = checked(
        input.capital.checked_mul(input.risk_percent / dec!(100)),
        "risk amount",
    )?;

    // Validation guarantees entry != stop and entry > 0.
    let stop_distance_pct = checked(
        (input.entry_price - input.stop_loss)
            .abs()
            .checked_div(input.entry_price),
        "stop distance",
    )?;

    let position_size_base = checked(
        risk_amount.checked_div(stop_distance_pct),
        "position size",
    )?;
    let leveraged_notional = checked(
        position_size_base.checked_mul(input.leverage),
        "leveraged notional",
    )?;
    let quantity = checked(
        leveraged_notional.checked_div(input.entry_price),
        "quantity",
    )?;

    if position_size_base <= Decimal::ZERO {
        return Err(CalcError::OutOfRange("position size"));
    }
    if quantity <= Decimal::ZERO {
        return Err(CalcError::OutOfRange("quantity"));
    }

    Ok(Sizing {
        risk_amount,
        stop_distance_pct,
        position_size_base,
        leveraged_notional,
        quantity,
    })
}
