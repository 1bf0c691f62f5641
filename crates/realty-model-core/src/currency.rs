use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RealtyModelError;
use crate::types::{Rate, ReportingMoney, SourceMoney};
use crate::RealtyModelResult;

/// The two source → reporting rates used by a projection.
///
/// `spot` converts the initial outlay. `future` carries the currency-risk
/// premium and converts every year 1..N revenue, expense and terminal value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRates {
    pub spot: Rate,
    pub future: Rate,
}

impl ExchangeRates {
    pub fn new(spot: Rate, currency_risk_premium: Rate) -> RealtyModelResult<Self> {
        if spot <= Decimal::ZERO {
            return Err(RealtyModelError::InvalidInput {
                field: "spot_exchange_rate".into(),
                reason: "Spot exchange rate must be positive".into(),
            });
        }
        let future = (Decimal::ONE + currency_risk_premium)
            .checked_mul(spot)
            .ok_or_else(|| RealtyModelError::overflow("spot_exchange_rate"))?;
        Ok(Self { spot, future })
    }

    pub fn spot_to_reporting(&self, amount: SourceMoney) -> RealtyModelResult<ReportingMoney> {
        to_reporting(amount, self.spot)
    }

    pub fn future_to_reporting(&self, amount: SourceMoney) -> RealtyModelResult<ReportingMoney> {
        to_reporting(amount, self.future)
    }

    pub fn future_to_source(&self, amount: ReportingMoney) -> RealtyModelResult<SourceMoney> {
        to_source(amount, self.future)
    }
}

pub fn to_reporting(amount: SourceMoney, rate: Rate) -> RealtyModelResult<ReportingMoney> {
    amount
        .amount()
        .checked_mul(rate)
        .map(ReportingMoney::new)
        .ok_or_else(|| RealtyModelError::overflow("source → reporting conversion"))
}

pub fn to_source(amount: ReportingMoney, rate: Rate) -> RealtyModelResult<SourceMoney> {
    if rate.is_zero() {
        return Err(RealtyModelError::DivisionByZero {
            context: "reporting → source conversion".into(),
        });
    }
    amount
        .amount()
        .checked_div(rate)
        .map(SourceMoney::new)
        .ok_or_else(|| RealtyModelError::overflow("reporting → source conversion"))
}

/// Rate implied by a pair of equivalent amounts; `None` when the source side is zero.
pub fn implied_rate(source: SourceMoney, reporting: ReportingMoney) -> Option<Rate> {
    if source.is_zero() {
        None
    } else {
        Some(reporting.amount() / source.amount())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_future_rate_carries_premium() {
        let rates = ExchangeRates::new(dec!(1.35), dec!(0.05)).unwrap();
        assert_eq!(rates.future, dec!(1.4175));
    }

    #[test]
    fn test_spot_and_future_conversion() {
        let rates = ExchangeRates::new(dec!(1.35), dec!(0.05)).unwrap();
        let amount = SourceMoney::new(dec!(1000));
        assert_eq!(rates.spot_to_reporting(amount).unwrap().amount(), dec!(1350));
        assert_eq!(rates.future_to_reporting(amount).unwrap().amount(), dec!(1417.5));
    }

    #[test]
    fn test_conversion_overflow_is_an_error() {
        let rates = ExchangeRates::new(dec!(1.35), dec!(0.05)).unwrap();
        let err = rates
            .future_to_reporting(SourceMoney::new(Decimal::MAX))
            .unwrap_err();
        assert!(matches!(err, RealtyModelError::InvalidInput { .. }));
    }

    #[test]
    fn test_future_to_source_round_trip() {
        let rates = ExchangeRates::new(dec!(1.35), dec!(0.05)).unwrap();
        let back = rates
            .future_to_source(ReportingMoney::new(dec!(1417.5)))
            .unwrap();
        assert_eq!(back.amount(), dec!(1000));
    }

    #[test]
    fn test_non_positive_spot_rejected() {
        assert!(ExchangeRates::new(Decimal::ZERO, dec!(0.05)).is_err());
        assert!(ExchangeRates::new(dec!(-1.2), dec!(0.05)).is_err());
    }

    #[test]
    fn test_to_source_zero_rate() {
        let err = to_source(ReportingMoney::new(dec!(10)), Decimal::ZERO).unwrap_err();
        assert!(matches!(err, RealtyModelError::DivisionByZero { .. }));
    }

    #[test]
    fn test_implied_rate_guards_zero() {
        assert_eq!(
            implied_rate(SourceMoney::ZERO, ReportingMoney::new(dec!(5))),
            None
        );
        assert_eq!(
            implied_rate(SourceMoney::new(dec!(100)), ReportingMoney::new(dec!(135))),
            Some(dec!(1.35))
        );
    }
}
