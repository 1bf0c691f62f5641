use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::currency::ExchangeRates;
use crate::depreciation::DepreciationSchedule;
use crate::error::RealtyModelError;
use crate::fees::{aggregate_fees, inflated_fees, FeeTotals};
use crate::input::{check_duration, PromoterData, RentMode, ScenarioInput};
use crate::types::{Money, Percent, Rate, ReportingMoney, SourceMoney};
use crate::RealtyModelResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One projected year of the holding period. All amounts are in the
/// reporting currency at the future (risk-adjusted) rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    /// 1-based year index
    pub year: u32,
    pub property_value: ReportingMoney,
    pub rental_income: ReportingMoney,
    pub management_fees: ReportingMoney,
    pub recurring_fees: ReportingMoney,
    /// Rental income less management fees
    pub gross_income: ReportingMoney,
    /// Gross income less the depreciation deduction, floored at zero
    pub taxable_income: ReportingMoney,
    pub taxes: ReportingMoney,
    pub depreciation_tax_savings: ReportingMoney,
    pub net_income: ReportingMoney,
    /// Running sum of net income, seeded at minus the initial cash outlay
    pub cumulative_cashflow: ReportingMoney,
    /// Percent of initial cash outlay
    pub roi: Percent,
    /// Net income over property value, percent
    pub cap_rate: Percent,
    /// Net income over initial cash outlay, percent
    pub cash_on_cash_return: Percent,
}

/// Operating terms after any scenario adjustment has been applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingTerms {
    pub rent: Money,
    pub rent_mode: RentMode,
    pub appreciation_pct: Percent,
    pub occupancy_pct: Percent,
    pub management_fee_pct: Percent,
    pub income_tax_rate_pct: Percent,
    pub annual_rent_increase_pct: Percent,
    pub duration_years: u32,
}

impl From<&PromoterData> for OperatingTerms {
    fn from(p: &PromoterData) -> Self {
        Self {
            rent: p.rent,
            rent_mode: p.rent_mode,
            appreciation_pct: p.annual_appreciation_pct,
            occupancy_pct: p.occupancy_rate_pct,
            management_fee_pct: p.management_fee_pct,
            income_tax_rate_pct: p.income_tax_rate_pct,
            annual_rent_increase_pct: p.annual_rent_increase_pct,
            duration_years: p.project_duration_years,
        }
    }
}

/// The parts of a projection that do not depend on the scenario variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionBasis {
    pub purchase_cost: SourceMoney,
    pub rates: ExchangeRates,
    pub fees: FeeTotals,
    pub depreciation: DepreciationSchedule,
    pub fee_inflation_rate: Rate,
}

impl ProjectionBasis {
    pub fn from_input(input: &ScenarioInput) -> RealtyModelResult<Self> {
        let rates = ExchangeRates::new(
            input.spot_exchange_rate,
            input.assumptions.currency_risk_premium,
        )?;
        let fees = aggregate_fees(
            &input.recurring_fees,
            &input.source_currency,
            &input.reporting_currency,
            rates.spot,
        )?;
        let purchase_cost = SourceMoney::new(input.purchase_cost);
        let depreciation = DepreciationSchedule::new(purchase_cost, &fees, input.country, &rates)?;

        Ok(Self {
            purchase_cost,
            rates,
            fees,
            depreciation,
            fee_inflation_rate: input.assumptions.fee_inflation_rate,
        })
    }

    pub fn initial_cash_outlay(&self) -> ReportingMoney {
        self.depreciation.initial_cash_outlay
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project the holding period year by year.
///
/// Each year depends only on its index and the fixed terms; the running
/// cumulative cash flow is the only state carried between iterations.
pub fn project_years(
    basis: &ProjectionBasis,
    terms: &OperatingTerms,
) -> RealtyModelResult<Vec<YearRecord>> {
    check_duration(terms.duration_years)?;

    let rates = &basis.rates;
    let initial_cash_outlay = basis.initial_cash_outlay();
    let depreciation = basis.depreciation.annual_in_reporting(rates)?;
    let tax_rate = terms.income_tax_rate_pct / dec!(100);
    let management_rate = terms.management_fee_pct / dec!(100);
    // 365 nights × occupancy percent / 100
    let nights_factor = checked(
        terms.occupancy_pct.checked_mul(dec!(3.65)),
        "occupancy_rate_pct",
    )?;

    let mut records = Vec::with_capacity(terms.duration_years as usize);
    let mut cumulative_cashflow = -initial_cash_outlay;

    for year in 1..=terms.duration_years {
        let appreciation = compound(terms.appreciation_pct, year, "annual_appreciation_pct")?;
        let value_source = scale(basis.purchase_cost.amount(), appreciation, "property_value")?;
        let property_value = rates.future_to_reporting(SourceMoney::new(value_source))?;

        let rent_multiplier = compound(
            terms.annual_rent_increase_pct,
            year - 1,
            "annual_rent_increase_pct",
        )?;
        let current_rent = scale(terms.rent, rent_multiplier, "rent")?;
        let annual_rent = match terms.rent_mode {
            RentMode::Nightly => scale(current_rent, nights_factor, "rent")?,
            RentMode::Monthly => scale(current_rent, dec!(12), "rent")?,
        };
        let rental_income = rates.future_to_reporting(SourceMoney::new(annual_rent))?;

        let management_fees = checked(
            rental_income.checked_scale(management_rate),
            "management_fee_pct",
        )?;
        let recurring_fees = rates.future_to_reporting(inflated_fees(
            basis.fees.annual_recurring,
            basis.fee_inflation_rate,
            year,
        )?)?;
        let gross_income = checked(
            rental_income.checked_sub(management_fees),
            "management_fee_pct",
        )?;

        let taxable_income = checked(gross_income.checked_sub(depreciation), "taxable_income")?
            .max(ReportingMoney::ZERO);
        let taxes = checked(taxable_income.checked_scale(tax_rate), "income_tax_rate_pct")?;
        let depreciation_tax_savings =
            checked(depreciation.checked_scale(tax_rate), "income_tax_rate_pct")?;

        let net_income = checked(
            gross_income
                .checked_sub(taxes)
                .and_then(|v| v.checked_sub(recurring_fees)),
            "net_income",
        )?;
        cumulative_cashflow = checked(
            cumulative_cashflow.checked_add(net_income),
            "cumulative_cashflow",
        )?;

        let equity_gain = checked(
            property_value
                .checked_add(cumulative_cashflow)
                .and_then(|v| v.checked_sub(initial_cash_outlay)),
            "roi",
        )?;
        let roi = ratio_pct(equity_gain.amount(), initial_cash_outlay.amount(), "roi")?;
        let cap_rate = ratio_pct(net_income.amount(), property_value.amount(), "cap_rate")?;
        let cash_on_cash_return = ratio_pct(
            net_income.amount(),
            initial_cash_outlay.amount(),
            "cash_on_cash_return",
        )?;

        records.push(YearRecord {
            year,
            property_value,
            rental_income,
            management_fees,
            recurring_fees,
            gross_income,
            taxable_income,
            taxes,
            depreciation_tax_savings,
            net_income,
            cumulative_cashflow,
            roi,
            cap_rate,
            cash_on_cash_return,
        });
    }

    log::debug!(
        "projected {} years, final cumulative cash flow {}",
        records.len(),
        cumulative_cashflow
    );

    Ok(records)
}

/// `numerator / denominator × 100`, or zero when the denominator is zero.
pub fn ratio_pct(
    numerator: Decimal,
    denominator: Decimal,
    field: &str,
) -> RealtyModelResult<Percent> {
    if denominator.is_zero() {
        return Ok(Decimal::ZERO);
    }
    checked(
        numerator
            .checked_div(denominator)
            .and_then(|r| r.checked_mul(dec!(100))),
        field,
    )
}

fn compound(rate_pct: Percent, periods: u32, field: &str) -> RealtyModelResult<Decimal> {
    checked(
        (Decimal::ONE + rate_pct / dec!(100)).checked_powi(i64::from(periods)),
        field,
    )
}

fn scale(amount: Decimal, factor: Decimal, field: &str) -> RealtyModelResult<Decimal> {
    checked(amount.checked_mul(factor), field)
}

fn checked<T>(value: Option<T>, field: &str) -> RealtyModelResult<T> {
    value.ok_or_else(|| RealtyModelError::overflow(field))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fees::{Fee, FeeFrequency};
    use crate::input::tests::sample_input;
    use crate::types::Currency;

    fn run(input: &ScenarioInput) -> Vec<YearRecord> {
        let basis = ProjectionBasis::from_input(input).unwrap();
        project_years(&basis, &OperatingTerms::from(&input.promoter_data)).unwrap()
    }

    #[test]
    fn test_year_one_known_values() {
        let years = run(&sample_input());
        assert_eq!(years.len(), 10);
        let y1 = &years[0];

        assert_eq!(y1.year, 1);
        // 250,000 × 1.05 × 1.4175
        assert_eq!(y1.property_value.amount(), dec!(372093.75));
        // 2,000 × 12 × 1.35 × 1.05
        assert_eq!(y1.rental_income.amount(), dec!(34020));
        assert_eq!(y1.management_fees.amount(), dec!(3402));
        assert_eq!(y1.gross_income.amount(), dec!(30618));
        // 30,618 − 10,000 × 1.4175
        assert_eq!(y1.taxable_income.amount(), dec!(16443));
        assert_eq!(y1.taxes.amount(), dec!(4439.61));
        assert_eq!(y1.depreciation_tax_savings.amount(), dec!(3827.25));
        assert_eq!(y1.net_income.amount(), dec!(26178.39));
        assert_eq!(y1.cumulative_cashflow.amount(), dec!(-311321.61));
    }

    #[test]
    fn test_rent_increase_compounds_from_year_two() {
        let years = run(&sample_input());
        assert_eq!(years[1].rental_income.amount(), dec!(34700.4));
        assert_eq!(years[2].rental_income.amount(), dec!(35394.408));
    }

    #[test]
    fn test_income_identities_hold_every_year() {
        let mut input = sample_input();
        input.recurring_fees.push(Fee {
            label: "Insurance".into(),
            amount: dec!(1500),
            frequency: FeeFrequency::Annual,
            currency: Currency::USD,
        });
        let years = run(&input);
        let basis = ProjectionBasis::from_input(&input).unwrap();

        let mut previous = -basis.initial_cash_outlay();
        for y in &years {
            assert_eq!(y.gross_income, y.rental_income - y.management_fees);
            assert_eq!(y.net_income, y.gross_income - y.taxes - y.recurring_fees);
            assert_eq!(y.cumulative_cashflow, previous + y.net_income);
            previous = y.cumulative_cashflow;
        }
    }

    #[test]
    fn test_recurring_fees_inflate_at_future_rate() {
        let mut input = sample_input();
        input.recurring_fees.push(Fee {
            label: "HOA".into(),
            amount: dec!(100),
            frequency: FeeFrequency::Monthly,
            currency: Currency::USD,
        });
        let years = run(&input);
        // 1,200 × 1.4175
        assert_eq!(years[0].recurring_fees.amount(), dec!(1701));
        // 1,200 × 1.025 × 1.4175
        assert_eq!(years[1].recurring_fees.amount(), dec!(1743.525));
    }

    #[test]
    fn test_zero_occupancy_nightly_never_earns() {
        let mut input = sample_input();
        input.promoter_data.rent_mode = RentMode::Nightly;
        input.promoter_data.rent = dec!(180);
        input.promoter_data.occupancy_rate_pct = Decimal::ZERO;
        input.recurring_fees.push(Fee {
            label: "Utilities".into(),
            amount: dec!(150),
            frequency: FeeFrequency::Monthly,
            currency: Currency::USD,
        });

        for y in run(&input) {
            assert_eq!(y.rental_income, ReportingMoney::ZERO);
            assert!(y.net_income <= ReportingMoney::ZERO);
            assert!(y.cumulative_cashflow <= ReportingMoney::ZERO);
        }
    }

    #[test]
    fn test_nightly_rent_uses_occupancy() {
        let mut input = sample_input();
        input.promoter_data.rent_mode = RentMode::Nightly;
        input.promoter_data.rent = dec!(100);
        input.promoter_data.occupancy_rate_pct = dec!(50);
        let years = run(&input);
        // 100 × 365 × 0.5 × 1.4175
        assert_eq!(years[0].rental_income.amount(), dec!(25869.375));
    }

    #[test]
    fn test_zero_outlay_ratios_are_zero() {
        let mut input = sample_input();
        input.purchase_cost = Decimal::ZERO;
        let years = run(&input);
        for y in &years {
            assert_eq!(y.roi, Decimal::ZERO);
            assert_eq!(y.cash_on_cash_return, Decimal::ZERO);
            assert_eq!(y.cap_rate, Decimal::ZERO);
        }
    }

    #[test]
    fn test_zero_duration_rejected_before_loop() {
        let input = sample_input();
        let basis = ProjectionBasis::from_input(&input).unwrap();
        let mut terms = OperatingTerms::from(&input.promoter_data);
        terms.duration_years = 0;
        match project_years(&basis, &terms).unwrap_err() {
            RealtyModelError::Configuration { field, .. } => {
                assert_eq!(field, "project_duration_years")
            }
            other => panic!("Expected Configuration, got {other:?}"),
        }
    }

    #[test]
    fn test_single_year_produces_one_record() {
        let mut input = sample_input();
        input.promoter_data.project_duration_years = 1;
        assert_eq!(run(&input).len(), 1);
    }

    #[test]
    fn test_runaway_appreciation_reports_error() {
        let mut input = sample_input();
        input.promoter_data.annual_appreciation_pct = dec!(100000);
        input.promoter_data.project_duration_years = 40;
        let basis = ProjectionBasis::from_input(&input).unwrap();
        let result = project_years(&basis, &OperatingTerms::from(&input.promoter_data));
        assert!(matches!(
            result,
            Err(RealtyModelError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_long_horizon_beyond_cap_rejected() {
        let mut input = sample_input();
        input.promoter_data.annual_appreciation_pct = Decimal::ZERO;
        input.promoter_data.annual_rent_increase_pct = Decimal::ZERO;
        input.promoter_data.project_duration_years = 3000;
        input.recurring_fees.push(Fee {
            label: "HOA".into(),
            amount: dec!(100),
            frequency: FeeFrequency::Monthly,
            currency: Currency::USD,
        });
        let basis = ProjectionBasis::from_input(&input).unwrap();
        let result = project_years(&basis, &OperatingTerms::from(&input.promoter_data));
        assert!(matches!(
            result,
            Err(RealtyModelError::Configuration { .. })
        ));
    }

    #[test]
    fn test_runaway_fee_inflation_reports_error() {
        let mut input = sample_input();
        input.promoter_data.annual_appreciation_pct = Decimal::ZERO;
        input.promoter_data.annual_rent_increase_pct = Decimal::ZERO;
        input.promoter_data.project_duration_years = 120;
        input.assumptions.fee_inflation_rate = Decimal::ONE;
        input.recurring_fees.push(Fee {
            label: "HOA".into(),
            amount: dec!(100),
            frequency: FeeFrequency::Monthly,
            currency: Currency::USD,
        });
        let basis = ProjectionBasis::from_input(&input).unwrap();
        let result = project_years(&basis, &OperatingTerms::from(&input.promoter_data));
        assert!(matches!(
            result,
            Err(RealtyModelError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_huge_nightly_rent_reports_error() {
        let mut input = sample_input();
        input.promoter_data.rent_mode = RentMode::Nightly;
        input.promoter_data.rent = Decimal::MAX / dec!(10);
        input.promoter_data.occupancy_rate_pct = dec!(100);
        let basis = ProjectionBasis::from_input(&input).unwrap();
        let result = project_years(&basis, &OperatingTerms::from(&input.promoter_data));
        assert!(matches!(
            result,
            Err(RealtyModelError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_ratio_pct_guards_zero() {
        assert_eq!(ratio_pct(dec!(5), Decimal::ZERO, "roi").unwrap(), Decimal::ZERO);
        assert_eq!(ratio_pct(dec!(5), dec!(50), "roi").unwrap(), dec!(10));
        assert!(ratio_pct(Decimal::MAX, dec!(0.001), "roi").is_err());
    }
}
