//! Position risk & liquidation calculation engine.
//!
//! A pure pipeline: validate → size → fees → liquidation → targets. Nothing is
//! kept between calls, so [`calculate`] is re-entrant and safe to call from
//! any number of threads at once.

mod error;
mod fees;
mod liquidation;
mod position_sizer;
mod targets;
mod validator;

pub use error::{CalcError, Field};
pub use validator::{validate, Validated};

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{CalculationResult, TradeInput};

/// Lift a checked decimal operation into the engine's error type.
pub(crate) fn checked(value: Option<Decimal>, what: &'static str) -> Result<Decimal, CalcError> {
    value.ok_or(CalcError::OutOfRange(what))
}

/// Turn trade parameters into a fully populated [`CalculationResult`].
///
/// Structurally invalid input fails with a typed [`CalcError`] and no partial
/// result. Poor or losing targets are not errors; they come back graded.
pub fn calculate(input: &TradeInput) -> Result<CalculationResult, CalcError> {
    let input = validate(input)?;

    let sizing = position_sizer::size(&input)?;
    let fees = fees::fees(sizing.leveraged_notional, input.fee_percent)?;
    let liquidation_price = liquidation::liquidation_price(&input)?;
    let loss_at_stop = targets::loss_at_stop(&input, &sizing, &fees)?;
    let target_results = targets::evaluate(&input, &sizing, &fees, loss_at_stop)?;
    let best_target = targets::best_target(&target_results);

    debug!(
        side = %input.side,
        entry = %input.entry_price,
        stop = %input.stop_loss,
        leverage = %input.leverage,
        position_size = %sizing.position_size_base,
        quantity = %sizing.quantity,
        loss_at_stop = %loss_at_stop,
        targets = target_results.len(),
        "Position calculated"
    );

    Ok(CalculationResult {
        risk_amount: sizing.risk_amount,
        stop_distance_pct: sizing.stop_distance_pct,
        position_size_base: sizing.position_size_base,
        leveraged_notional: sizing.leveraged_notional,
        quantity: sizing.quantity,
        entry_fee: fees.entry_fee,
        exit_fee: fees.exit_fee,
        total_fees: fees.total_fees,
        loss_at_stop,
        liquidation_price,
        targets: target_results,
        best_target,
    })
}
