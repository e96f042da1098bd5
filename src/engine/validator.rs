//! Input validation: rejects degenerate or out-of-range parameters before any
//! arithmetic runs.

use std::ops::Deref;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::{CalcError, Field};
use crate::models::TradeInput;

/// A [`TradeInput`] that passed every check in [`validate`].
///
/// The later stages only accept this type, so a stop distance of zero or a
/// leverage below one can never reach their arithmetic.
#[derive(Debug, Clone, Copy)]
pub struct Validated<'a>(&'a TradeInput);

impl Deref for Validated<'_> {
    type Target = TradeInput;

    fn deref(&self) -> &TradeInput {
        self.0
    }
}

/// Check a trade input.
///
/// Checks run in a fixed order and the first failure is returned. Take-profits
/// on the losing side of entry are accepted; the target evaluator reports them.
pub fn validate(input: &TradeInput) -> Result<Validated<'_>, CalcError> {
    let positive = [
        (Field::EntryPrice, input.entry_price),
        (Field::StopLoss, input.stop_loss),
        (Field::Capital, input.capital),
    ];
    for (field, value) in positive {
        if value <= Decimal::ZERO {
            return Err(CalcError::InvalidParameter(field));
        }
    }

    if input.leverage < Decimal::ONE {
        return Err(CalcError::InvalidParameter(Field::Leverage));
    }
    if input.fee_percent < Decimal::ZERO {
        return Err(CalcError::InvalidParameter(Field::FeePercent));
    }
    if input.risk_percent <= Decimal::ZERO || input.risk_percent > dec!(100) {
        return Err(CalcError::InvalidParameter(Field::RiskPercent));
    }
    if let Some(i) = input.take_profits.iter().position(|tp| *tp <= Decimal::ZERO) {
        return Err(CalcError::InvalidParameter(Field::TakeProfit(i)));
    }

    if input.entry_price == input.stop_loss {
        return Err(CalcError::DegenerateStopLoss);
    }
    if input.take_profits.is_empty() {
        return Err(CalcError::NoTakeProfitProvided);
    }

    Ok(Validated(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Side;

    fn make_input() -> TradeInput {
        TradeInput {
            entry_price: dec!(50000),
            stop_loss: dec!(48000),
            take_profits: vec![dec!(55000)],
            leverage: dec!(10),
            capital: dec!(1000),
            risk_percent: dec!(1),
            fee_percent: dec!(0.04),
            side: Side::Long,
        }
    }

    #[test]
    fn test_valid_input_passes() {
        let input = make_input();
        let validated = validate(&input).unwrap();
        assert_eq!(validated.entry_price, dec!(50000));
    }

    #[test]
    fn test_non_positive_prices_rejected() {
        let mut input = make_input();
        input.entry_price = Decimal::ZERO;
        assert_eq!(
            validate(&input).unwrap_err(),
            CalcError::InvalidParameter(Field::EntryPrice)
        );

        let mut input = make_input();
        input.stop_loss = dec!(-1);
        assert_eq!(
            validate(&input).unwrap_err(),
            CalcError::InvalidParameter(Field::StopLoss)
        );

        let mut input = make_input();
        input.capital = Decimal::ZERO;
        assert_eq!(
            validate(&input).unwrap_err(),
            CalcError::InvalidParameter(Field::Capital)
        );
    }

    #[test]
    fn test_leverage_below_one_rejected() {
        let mut input = make_input();
        input.leverage = dec!(0.5);
        assert_eq!(
            validate(&input).unwrap_err(),
            CalcError::InvalidParameter(Field::Leverage)
        );

        input.leverage = Decimal::ONE;
        assert!(validate(&input).is_ok());
    }

    #[test]
    fn test_negative_fee_rejected_zero_fee_allowed() {
        let mut input = make_input();
        input.fee_percent = dec!(-0.01);
        assert_eq!(
            validate(&input).unwrap_err(),
            CalcError::InvalidParameter(Field::FeePercent)
        );

        input.fee_percent = Decimal::ZERO;
        assert!(validate(&input).is_ok());
    }

    #[test]
    fn test_risk_percent_bounds() {
        let mut input = make_input();
        for bad in [Decimal::ZERO, dec!(-1), dec!(100.01)] {
            input.risk_percent = bad;
            assert_eq!(
                validate(&input).unwrap_err(),
                CalcError::InvalidParameter(Field::RiskPercent)
            );
        }

        input.risk_percent = dec!(100);
        assert!(validate(&input).is_ok());
    }

    #[test]
    fn test_non_positive_take_profit_names_its_index() {
        let mut input = make_input();
        input.take_profits = vec![dec!(55000), Decimal::ZERO];
        assert_eq!(
            validate(&input).unwrap_err(),
            CalcError::InvalidParameter(Field::TakeProfit(1))
        );
    }

    #[test]
    fn test_degenerate_stop_loss() {
        let mut input = make_input();
        input.stop_loss = input.entry_price;
        assert_eq!(validate(&input).unwrap_err(), CalcError::DegenerateStopLoss);
    }

    #[test]
    fn test_empty_take_profits() {
        let mut input = make_input();
        input.take_profits.clear();
        assert_eq!(validate(&input).unwrap_err(), CalcError::NoTakeProfitProvided);
    }

    #[test]
    fn test_parameter_errors_come_before_degenerate_stop() {
        let mut input = make_input();
        input.stop_loss = input.entry_price;
        input.capital = Decimal::ZERO;
        assert_eq!(
            validate(&input).unwrap_err(),
            CalcError::InvalidParameter(Field::Capital)
        );
    }

    #[test]
    fn test_target_behind_entry_is_accepted() {
        let mut input = make_input();
        input.take_profits = vec![dec!(45000)];
        assert!(validate(&input).is_ok());
    }
}
