use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::error::RealtyModelError;
use crate::evaluation::EnglishTranslator;
use crate::input::ScenarioInput;
use crate::projection::ProjectionBasis;
use crate::summary::Recommendation;
use crate::types::{with_metadata, ComputationOutput, Percent, ReportingMoney};
use crate::variants::{run_variant, ScenarioVariant};
use crate::RealtyModelResult;

const MAX_SWEEP_POINTS: usize = 1000;

/// Input the sweep varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityDriver {
    Appreciation,
    Occupancy,
    Rent,
    SpotRate,
    ManagementFee,
    IncomeTaxRate,
}

impl SensitivityDriver {
    fn get(self, input: &ScenarioInput) -> Decimal {
        let p = &input.promoter_data;
        match self {
            SensitivityDriver::Appreciation => p.annual_appreciation_pct,
            SensitivityDriver::Occupancy => p.occupancy_rate_pct,
            SensitivityDriver::Rent => p.rent,
            SensitivityDriver::SpotRate => input.spot_exchange_rate,
            SensitivityDriver::ManagementFee => p.management_fee_pct,
            SensitivityDriver::IncomeTaxRate => p.income_tax_rate_pct,
        }
    }

    fn set(self, input: &mut ScenarioInput, value: Decimal) {
        let p = &mut input.promoter_data;
        match self {
            SensitivityDriver::Appreciation => p.annual_appreciation_pct = value,
            SensitivityDriver::Occupancy => p.occupancy_rate_pct = value,
            SensitivityDriver::Rent => p.rent = value,
            SensitivityDriver::SpotRate => input.spot_exchange_rate = value,
            SensitivityDriver::ManagementFee => p.management_fee_pct = value,
            SensitivityDriver::IncomeTaxRate => p.income_tax_rate_pct = value,
        }
    }
}

impl fmt::Display for SensitivityDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SensitivityDriver::Appreciation => "appreciation",
            SensitivityDriver::Occupancy => "occupancy",
            SensitivityDriver::Rent => "rent",
            SensitivityDriver::SpotRate => "spot_rate",
            SensitivityDriver::ManagementFee => "management_fee",
            SensitivityDriver::IncomeTaxRate => "income_tax_rate",
        };
        f.write_str(name)
    }
}

/// One-way sweep of a single driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityInput {
    pub base: ScenarioInput,
    pub driver: SensitivityDriver,
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
    #[serde(default = "default_variant")]
    pub variant: ScenarioVariant,
}

fn default_variant() -> ScenarioVariant {
    ScenarioVariant::Moderate
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub driver_value: Decimal,
    pub total_return_pct: Percent,
    pub avg_annual_return_pct: Percent,
    pub irr_pct: Percent,
    pub irr_converged: bool,
    pub npv: ReportingMoney,
    pub break_even_year: Option<u32>,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityOutput {
    pub driver: SensitivityDriver,
    pub variant: ScenarioVariant,
    /// Driver value in the unmodified input
    pub base_value: Decimal,
    pub points: Vec<SensitivityPoint>,
}

/// Generate the sweep values from min to max with step, always including max.
fn generate_sweep_values(
    min: Decimal,
    max: Decimal,
    step: Decimal,
) -> RealtyModelResult<Vec<Decimal>> {
    if step <= Decimal::ZERO {
        return Err(RealtyModelError::InvalidInput {
            field: "step".into(),
            reason: "Step must be positive".into(),
        });
    }
    if min > max {
        return Err(RealtyModelError::InvalidInput {
            field: "min".into(),
            reason: "Min must be <= max".into(),
        });
    }

    let mut values = Vec::new();
    let mut current = min;
    while current <= max {
        if values.len() == MAX_SWEEP_POINTS {
            return Err(RealtyModelError::InvalidInput {
                field: "step".into(),
                reason: format!("Sweep exceeds {MAX_SWEEP_POINTS} points"),
            });
        }
        values.push(current);
        match current.checked_add(step) {
            Some(next) => current = next,
            None => break,
        }
    }
    if let Some(&last) = values.last() {
        if last < max {
            values.push(max);
        }
    }

    Ok(values)
}

/// Re-run one scenario variant across a range of values for a single driver.
pub fn sweep(input: &SensitivityInput) -> RealtyModelResult<ComputationOutput<SensitivityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let values = generate_sweep_values(input.min, input.max, input.step)?;
    input.base.validate(&mut warnings)?;

    let mut points = Vec::with_capacity(values.len());
    for value in values {
        let mut scenario = input.base.clone();
        input.driver.set(&mut scenario, value);

        let mut point_warnings = Vec::new();
        scenario.validate(&mut point_warnings)?;
        let basis = ProjectionBasis::from_input(&scenario)?;
        let result = run_variant(
            &scenario,
            &basis,
            input.variant,
            &EnglishTranslator,
            &mut point_warnings,
        )?;

        let driver = input.driver;
        warnings.extend(
            point_warnings
                .into_iter()
                .map(|w| format!("{driver} = {value}: {w}")),
        );

        let s = result.summary;
        points.push(SensitivityPoint {
            driver_value: value,
            total_return_pct: s.total_return_pct,
            avg_annual_return_pct: s.avg_annual_return_pct,
            irr_pct: s.irr_pct,
            irr_converged: s.irr_converged,
            npv: s.npv,
            break_even_year: s.break_even_year,
            recommendation: s.recommendation,
        });
    }

    let output = SensitivityOutput {
        driver: input.driver,
        variant: input.variant,
        base_value: input.driver.get(&input.base),
        points,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "One-Way Sensitivity of Scenario Returns",
        &serde_json::json!({
            "driver": input.driver,
            "variant": input.variant,
            "min": input.min,
            "max": input.max,
            "step": input.step,
        }),
        warnings,
        elapsed,
        output,
    ))
}
