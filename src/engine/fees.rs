//! Entry/exit fee model.
//!
//! Exchanges charge on the traded contract value, so both legs are priced
//! against the leveraged notional. Both legs are always charged, whichever
//! exit (stop or target) is reached.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::checked;
use super::error::CalcError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fees {
    pub entry_fee: Decimal,
    pub exit_fee: Decimal,
    pub total_fees: Decimal,
}

pub fn fees(leveraged_notional: Decimal, fee_percent: Decimal) -> Result<Fees, CalcError> {
    let per_side = checked(
        leveraged_notional.checked_mul(fee_percent / dec!(100)),
        "fees",
    )?;
    let total_fees = checked(per_side.checked_add(per_side), "fees")?;

    Ok(Fees {
        entry_fee: per_side,
        exit_fee: per_side,
        total_fees,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fees_on_notional() {
        let f = fees(dec!(2500), dec!(0.04)).unwrap();
        assert_eq!(f.entry_fee, dec!(1));
        assert_eq!(f.exit_fee, dec!(1));
        assert_eq!(f.total_fees, dec!(2));
    }

    #[test]
    fn test_zero_fee_rate() {
        let f = fees(dec!(2500), Decimal::ZERO).unwrap();
        assert!(f.total_fees.is_zero());
    }
}
