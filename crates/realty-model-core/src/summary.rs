use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::assumptions::ModelAssumptions;
use crate::depreciation::Country;
use crate::error::RealtyModelError;
use crate::projection::{ratio_pct, ProjectionBasis, YearRecord};
use crate::time_value::{self, IrrSettings};
use crate::types::{Money, Percent, ReportingMoney, SourceMoney};
use crate::RealtyModelResult;

/// Average annual return above which a quick break-even is recommended.
pub const RECOMMEND_MIN_AVG_RETURN_PCT: Percent = dec!(8);
pub const RECOMMEND_MAX_BREAK_EVEN_YEAR: u32 = 5;
/// Average annual return below which a deal is rejected outright.
pub const REJECT_BELOW_AVG_RETURN_PCT: Percent = dec!(3);
pub const REJECT_AFTER_BREAK_EVEN_YEAR: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Recommended,
    Consider,
    NotRecommended,
}

impl Recommendation {
    /// A deal that never breaks even within the horizon is treated as
    /// breaking even later than any threshold.
    pub fn classify(avg_annual_return_pct: Percent, break_even_year: Option<u32>) -> Self {
        let quick = break_even_year.is_some_and(|y| y <= RECOMMEND_MAX_BREAK_EVEN_YEAR);
        let late = break_even_year.is_none_or(|y| y > REJECT_AFTER_BREAK_EVEN_YEAR);

        if avg_annual_return_pct > RECOMMEND_MIN_AVG_RETURN_PCT && quick {
            Recommendation::Recommended
        } else if avg_annual_return_pct < REJECT_BELOW_AVG_RETURN_PCT || late {
            Recommendation::NotRecommended
        } else {
            Recommendation::Consider
        }
    }
}

/// Aggregate metrics over a full projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub total_return_pct: Percent,
    pub avg_annual_return_pct: Percent,
    pub total_net_income: ReportingMoney,
    pub final_property_value: ReportingMoney,
    /// First year with positive cumulative cash flow; `None` if it never turns positive
    pub break_even_year: Option<u32>,
    pub recommendation: Recommendation,
    pub irr_pct: Percent,
    /// False when the IRR solver ran out of iterations; `irr_pct` is then approximate
    pub irr_converged: bool,
    pub npv: ReportingMoney,
    pub total_depreciation_savings: ReportingMoney,
    pub capital_gains_tax: ReportingMoney,
    pub net_proceeds_after_sale: ReportingMoney,
}

/// Cash flows for IRR and NPV: the initial outlay, each year's net income,
/// and the sale at the end of the horizon folded into the final year.
pub fn sale_cash_flows(
    years: &[YearRecord],
    initial_cash_outlay: ReportingMoney,
) -> RealtyModelResult<Vec<Money>> {
    let mut flows = Vec::with_capacity(years.len() + 1);
    flows.push(-initial_cash_outlay.amount());
    for (i, y) in years.iter().enumerate() {
        if i == years.len() - 1 {
            let sale = y
                .net_income
                .checked_add(y.property_value)
                .ok_or_else(|| RealtyModelError::overflow("property_value"))?;
            flows.push(sale.amount());
        } else {
            flows.push(y.net_income.amount());
        }
    }
    Ok(flows)
}

fn checked_total(
    years: &[YearRecord],
    amount: impl Fn(&YearRecord) -> ReportingMoney,
    field: &str,
) -> RealtyModelResult<ReportingMoney> {
    years.iter().try_fold(ReportingMoney::ZERO, |acc, y| {
        acc.checked_add(amount(y))
            .ok_or_else(|| RealtyModelError::overflow(field))
    })
}

/// Derive the summary metrics from a complete year series.
pub fn summarize(
    years: &[YearRecord],
    basis: &ProjectionBasis,
    country: Country,
    assumptions: &ModelAssumptions,
    warnings: &mut Vec<String>,
) -> RealtyModelResult<ScenarioSummary> {
    let final_year = years.last().ok_or_else(|| RealtyModelError::Configuration {
        field: "project_duration_years".into(),
        reason: "Cannot summarise an empty projection".into(),
    })?;
    let duration = Decimal::from(years.len() as u64);
    let initial_cash_outlay = basis.initial_cash_outlay();

    // --- Returns ---
    let equity_gain = final_year
        .property_value
        .checked_add(final_year.cumulative_cashflow)
        .and_then(|v| v.checked_sub(initial_cash_outlay))
        .ok_or_else(|| RealtyModelError::overflow("total_return_pct"))?;
    let total_return_pct = ratio_pct(
        equity_gain.amount(),
        initial_cash_outlay.amount(),
        "total_return_pct",
    )?;
    let avg_annual_return_pct = total_return_pct / duration;
    let total_net_income = checked_total(years, |y| y.net_income, "total_net_income")?;

    let break_even_year = years
        .iter()
        .find(|y| y.cumulative_cashflow > ReportingMoney::ZERO)
        .map(|y| y.year);
    if break_even_year.is_none() {
        warnings.push(format!(
            "Cumulative cash flow stays negative through year {}",
            final_year.year
        ));
    }

    let recommendation = Recommendation::classify(avg_annual_return_pct, break_even_year);

    // --- Discounted metrics ---
    let flows = sale_cash_flows(years, initial_cash_outlay)?;
    let irr = time_value::irr(&flows, &IrrSettings::from(assumptions))?;
    if !irr.converged {
        warnings.push(format!(
            "IRR did not converge after {} iterations — {:.2}% is approximate",
            irr.iterations,
            irr.rate * dec!(100)
        ));
    }
    let npv = ReportingMoney::new(time_value::npv(assumptions.discount_rate, &flows)?);

    // --- Tax effects ---
    let total_depreciation_savings = checked_total(
        years,
        |y| y.depreciation_tax_savings,
        "total_depreciation_savings",
    )?;

    let final_value_source = basis.rates.future_to_source(final_year.property_value)?;
    let capital_gain = final_value_source
        .checked_sub(basis.purchase_cost)
        .ok_or_else(|| RealtyModelError::overflow("capital_gain"))?
        .max(SourceMoney::ZERO);
    let capital_gains_tax = basis
        .rates
        .future_to_reporting(capital_gain * country.capital_gains_tax_rate())?;
    let net_proceeds_after_sale = final_year.property_value - capital_gains_tax;

    Ok(ScenarioSummary {
        total_return_pct,
        avg_annual_return_pct,
        total_net_income,
        final_property_value: final_year.property_value,
        break_even_year,
        recommendation,
        irr_pct: irr.rate * dec!(100),
        irr_converged: irr.converged,
        npv,
        total_depreciation_savings,
        capital_gains_tax,
        net_proceeds_after_sale,
    })
}
