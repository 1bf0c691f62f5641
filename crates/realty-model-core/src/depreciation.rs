use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::currency::ExchangeRates;
use crate::error::RealtyModelError;
use crate::fees::FeeTotals;
use crate::types::{Rate, ReportingMoney, SourceMoney};
use crate::RealtyModelResult;

/// Tax jurisdiction of the property. Anything other than `"USA"` falls back
/// to `Other`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Country {
    #[serde(rename = "USA")]
    Usa,
    #[default]
    #[serde(other)]
    Other,
}

impl Country {
    /// Straight-line annual depreciation rate (27.5-year residential schedule in the US).
    pub fn depreciation_rate(self) -> Rate {
        match self {
            Country::Usa => dec!(0.03636),
            Country::Other => dec!(0.04),
        }
    }

    pub fn capital_gains_tax_rate(self) -> Rate {
        match self {
            Country::Usa => dec!(0.15),
            Country::Other => dec!(0.135),
        }
    }
}

/// Straight-line depreciation and the capital deployed for a deal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepreciationSchedule {
    pub rate: Rate,
    /// Purchase cost plus capitalised one-time fees
    pub base: SourceMoney,
    /// Deduction per year, constant over the holding period
    pub annual: SourceMoney,
    /// Total capital deployed at the spot rate
    pub initial_cash_outlay: ReportingMoney,
}

impl DepreciationSchedule {
    pub fn new(
        purchase_cost: SourceMoney,
        fees: &FeeTotals,
        country: Country,
        rates: &ExchangeRates,
    ) -> RealtyModelResult<Self> {
        let rate = country.depreciation_rate();
        let base = purchase_cost
            .checked_add(fees.one_time)
            .ok_or_else(|| RealtyModelError::overflow("purchase_cost"))?;
        Ok(Self {
            rate,
            base,
            annual: base * rate,
            initial_cash_outlay: rates.spot_to_reporting(base)?,
        })
    }

    /// The yearly deduction expressed at the future rate.
    pub fn annual_in_reporting(&self, rates: &ExchangeRates) -> RealtyModelResult<ReportingMoney> {
        rates.future_to_reporting(self.annual)
    }

    /// Tax saved by the deduction at the given income tax rate (percent).
    pub fn tax_savings(
        &self,
        rates: &ExchangeRates,
        income_tax_pct: Decimal,
    ) -> RealtyModelResult<ReportingMoney> {
        self.annual_in_reporting(rates)?
            .checked_scale(income_tax_pct / dec!(100))
            .ok_or_else(|| RealtyModelError::overflow("income_tax_rate_pct"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates() -> ExchangeRates {
        ExchangeRates::new(dec!(1.35), dec!(0.05)).unwrap()
    }

    #[test]
    fn test_default_jurisdiction_rate() {
        let fees = FeeTotals {
            annual_recurring: SourceMoney::ZERO,
            one_time: SourceMoney::ZERO,
        };
        let d = DepreciationSchedule::new(
            SourceMoney::new(dec!(250000)),
            &fees,
            Country::Other,
            &rates(),
        )
        .unwrap();
        assert_eq!(d.annual.amount(), dec!(10000));
        assert_eq!(d.initial_cash_outlay.amount(), dec!(337500));
    }

    #[test]
    fn test_usa_rate_and_one_time_fees_in_base() {
        let fees = FeeTotals {
            annual_recurring: SourceMoney::new(dec!(1200)),
            one_time: SourceMoney::new(dec!(10000)),
        };
        let d = DepreciationSchedule::new(
            SourceMoney::new(dec!(100000)),
            &fees,
            Country::Usa,
            &rates(),
        )
        .unwrap();
        assert_eq!(d.base.amount(), dec!(110000));
        assert_eq!(d.annual.amount(), dec!(3999.6));
        assert_eq!(d.initial_cash_outlay.amount(), dec!(148500));
    }

    #[test]
    fn test_country_parsing() {
        let usa: Country = serde_json::from_str("\"USA\"").unwrap();
        let other: Country = serde_json::from_str("\"Mexico\"").unwrap();
        assert_eq!(usa, Country::Usa);
        assert_eq!(other, Country::Other);
        assert_eq!(Country::Usa.capital_gains_tax_rate(), dec!(0.15));
        assert_eq!(Country::Other.capital_gains_tax_rate(), dec!(0.135));
    }

    #[test]
    fn test_tax_savings_never_exceed_deduction() {
        let fees = FeeTotals {
            annual_recurring: SourceMoney::ZERO,
            one_time: SourceMoney::ZERO,
        };
        let d = DepreciationSchedule::new(
            SourceMoney::new(dec!(250000)),
            &fees,
            Country::Other,
            &rates(),
        )
        .unwrap();
        let deduction = d.annual_in_reporting(&rates()).unwrap();
        assert_eq!(deduction.amount(), dec!(14175));
        assert!(d.tax_savings(&rates(), dec!(27)).unwrap() <= deduction);
        assert_eq!(d.tax_savings(&rates(), dec!(100)).unwrap(), deduction);
    }
}
