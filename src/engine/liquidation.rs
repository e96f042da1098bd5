//! Liquidation price estimate.
//!
//! This is an approximation: it ignores funding payments, maintenance-margin
//! tiers and cross/isolated margin mode. Use it as a sanity indicator, never
//! as the exchange's actual liquidation level.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::checked;
use super::error::CalcError;
use super::validator::Validated;
use crate::models::Side;

/// Estimate where the position is force-closed.
///
/// LONG: `entry * (1 - 1/leverage + fee%)`, SHORT: `entry * (1 + 1/leverage + fee%)`.
/// For a long the distance to entry shrinks as leverage grows while
/// `1/leverage > fee%`; for a short it always shrinks.
pub fn liquidation_price(input: &Validated<'_>) -> Result<Decimal, CalcError> {
    // leverage >= 1 after validation
    let margin_fraction = Decimal::ONE / input.leverage;
    let fee_fraction = input.fee_percent / dec!(100);

    let factor = match input.side {
        Side::Long => Decimal::ONE - margin_fraction + fee_fraction,
        Side::Short => Decimal::ONE + margin_fraction + fee_fraction,
    };

    checked(input.entry_price.checked_mul(factor), "liquidation price")
}
