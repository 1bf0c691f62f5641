use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RealtyModelError;
use crate::types::{Currency, Money, Rate, SourceMoney};
use crate::RealtyModelResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeFrequency {
    Monthly,
    Annual,
    /// Paid once at acquisition (furnishing, setup); capitalised, never recurring.
    #[serde(alias = "one-time")]
    OneTime,
}

/// A fee attached to a deal, stated in whichever currency it is billed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fee {
    pub label: String,
    pub amount: Money,
    pub frequency: FeeFrequency,
    pub currency: Currency,
}

/// Fees normalised to the deal's source currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTotals {
    /// Monthly and annual fees, annualised (year-1 level, before inflation)
    pub annual_recurring: SourceMoney,
    /// Sum of one-time fees
    pub one_time: SourceMoney,
}

/// Reduce a fee list to an annual recurring total and a one-time total.
///
/// Fees billed in the source currency pass through; fees billed in the
/// reporting currency are divided by the spot rate. Any other currency is
/// rejected since no rate for it is available.
pub fn aggregate_fees(
    fees: &[Fee],
    source_currency: &Currency,
    reporting_currency: &Currency,
    spot_rate: Rate,
) -> RealtyModelResult<FeeTotals> {
    let mut annual_recurring = SourceMoney::ZERO;
    let mut one_time = SourceMoney::ZERO;

    for fee in fees {
        let amount = normalise_currency(fee, source_currency, reporting_currency, spot_rate)?;
        let too_large = || RealtyModelError::overflow(&format!("recurring_fees:{}", fee.label));
        match fee.frequency {
            FeeFrequency::Monthly => {
                let yearly = amount.checked_scale(dec!(12)).ok_or_else(too_large)?;
                annual_recurring = annual_recurring.checked_add(yearly).ok_or_else(too_large)?;
            }
            FeeFrequency::Annual => {
                annual_recurring = annual_recurring.checked_add(amount).ok_or_else(too_large)?;
            }
            FeeFrequency::OneTime => {
                one_time = one_time.checked_add(amount).ok_or_else(too_large)?;
            }
        }
    }

    Ok(FeeTotals {
        annual_recurring,
        one_time,
    })
}

fn normalise_currency(
    fee: &Fee,
    source_currency: &Currency,
    reporting_currency: &Currency,
    spot_rate: Rate,
) -> RealtyModelResult<SourceMoney> {
    if &fee.currency == source_currency {
        return Ok(SourceMoney::new(fee.amount));
    }
    if &fee.currency == reporting_currency {
        if spot_rate.is_zero() {
            return Err(RealtyModelError::DivisionByZero {
                context: format!("fee '{}' currency conversion", fee.label),
            });
        }
        return fee
            .amount
            .checked_div(spot_rate)
            .map(SourceMoney::new)
            .ok_or_else(|| RealtyModelError::overflow(&format!("recurring_fees:{}", fee.label)));
    }
    Err(RealtyModelError::InvalidInput {
        field: format!("recurring_fees:{}", fee.label),
        reason: format!(
            "Fee currency {} is neither the deal currency ({source_currency}) nor the reporting currency ({reporting_currency})",
            fee.currency
        ),
    })
}

/// Recurring fees for a 1-based projection year: `base × (1 + inflation)^(year-1)`.
pub fn inflated_fees(
    base: SourceMoney,
    inflation_rate: Rate,
    year: u32,
) -> RealtyModelResult<SourceMoney> {
    (Decimal::ONE + inflation_rate)
        .checked_powi(i64::from(year.saturating_sub(1)))
        .and_then(|growth| base.checked_scale(growth))
        .ok_or_else(|| RealtyModelError::overflow("fee_inflation_rate"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fee(label: &str, amount: Decimal, frequency: FeeFrequency, currency: Currency) -> Fee {
        Fee {
            label: label.into(),
            amount,
            frequency,
            currency,
        }
    }

    #[test]
    fn test_monthly_fees_annualised() {
        let fees = vec![fee("HOA", dec!(200), FeeFrequency::Monthly, Currency::USD)];
        let totals = aggregate_fees(&fees, &Currency::USD, &Currency::CAD, dec!(1.35)).unwrap();
        assert_eq!(totals.annual_recurring.amount(), dec!(2400));
        assert_eq!(totals.one_time, SourceMoney::ZERO);
    }

    #[test]
    fn test_one_time_fees_kept_separate() {
        let fees = vec![
            fee("Insurance", dec!(1200), FeeFrequency::Annual, Currency::USD),
            fee("Furnishing", dec!(15000), FeeFrequency::OneTime, Currency::USD),
        ];
        let totals = aggregate_fees(&fees, &Currency::USD, &Currency::CAD, dec!(1.35)).unwrap();
        assert_eq!(totals.annual_recurring.amount(), dec!(1200));
        assert_eq!(totals.one_time.amount(), dec!(15000));
    }

    #[test]
    fn test_reporting_currency_fee_divided_by_spot() {
        let fees = vec![fee("Accounting", dec!(1350), FeeFrequency::Annual, Currency::CAD)];
        let totals = aggregate_fees(&fees, &Currency::USD, &Currency::CAD, dec!(1.35)).unwrap();
        assert_eq!(totals.annual_recurring.amount(), dec!(1000));
    }

    #[test]
    fn test_normalisation_symmetric_for_cad_deal() {
        // Deal bought in CAD, reported in USD: a USD fee is divided by the CAD→USD spot.
        let fees = vec![fee("Platform", dec!(74), FeeFrequency::Annual, Currency::USD)];
        let totals = aggregate_fees(&fees, &Currency::CAD, &Currency::USD, dec!(0.74)).unwrap();
        assert_eq!(totals.annual_recurring.amount(), dec!(100));
    }

    #[test]
    fn test_unknown_fee_currency_rejected() {
        let fees = vec![fee("Agent", dec!(10), FeeFrequency::Monthly, Currency::EUR)];
        let err = aggregate_fees(&fees, &Currency::USD, &Currency::CAD, dec!(1.35)).unwrap_err();
        assert!(matches!(err, RealtyModelError::InvalidInput { .. }));
    }

    #[test]
    fn test_inflation_starts_in_year_two() {
        let base = SourceMoney::new(dec!(1000));
        let at = |year| inflated_fees(base, dec!(0.025), year).unwrap().amount();
        assert_eq!(at(1), dec!(1000));
        assert_eq!(at(2), dec!(1025));
        assert_eq!(at(3), dec!(1050.625));
    }

    #[test]
    fn test_runaway_fee_inflation_is_an_error() {
        // 1,200 × 2^119 is far beyond the 96-bit mantissa
        let base = SourceMoney::new(dec!(1200));
        let err = inflated_fees(base, Decimal::ONE, 120).unwrap_err();
        match err {
            RealtyModelError::InvalidInput { field, .. } => assert_eq!(field, "fee_inflation_rate"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_fee_totals_overflow_is_an_error() {
        let fees = vec![
            fee("A", Decimal::MAX, FeeFrequency::Annual, Currency::USD),
            fee("B", Decimal::MAX, FeeFrequency::Annual, Currency::USD),
        ];
        assert!(aggregate_fees(&fees, &Currency::USD, &Currency::CAD, dec!(1.35)).is_err());
    }

    #[test]
    fn test_frequency_accepts_hyphenated_one_time() {
        let f: FeeFrequency = serde_json::from_str("\"one-time\"").unwrap();
        assert_eq!(f, FeeFrequency::OneTime);
    }
}
