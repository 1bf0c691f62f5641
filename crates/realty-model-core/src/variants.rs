use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::currency::ExchangeRates;
use crate::error::RealtyModelError;
use crate::evaluation::{evaluate, Evaluation, EvaluationContext, Translator};
use crate::input::ScenarioInput;
use crate::projection::{project_years, OperatingTerms, ProjectionBasis, YearRecord};
use crate::summary::{summarize, ScenarioSummary};
use crate::types::{with_metadata, ComputationOutput, ReportingMoney, SourceMoney};
use crate::RealtyModelResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioVariant {
    Conservative,
    Moderate,
    Optimistic,
}

/// Factors applied to (appreciation, occupancy, rent) for a variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariantMultipliers {
    pub appreciation: Decimal,
    pub occupancy: Decimal,
    pub rent: Decimal,
}

impl ScenarioVariant {
    pub const ALL: [ScenarioVariant; 3] = [
        ScenarioVariant::Conservative,
        ScenarioVariant::Moderate,
        ScenarioVariant::Optimistic,
    ];

    pub fn multipliers(self) -> VariantMultipliers {
        match self {
            ScenarioVariant::Conservative => VariantMultipliers {
                appreciation: dec!(0.8),
                occupancy: dec!(0.85),
                rent: dec!(0.9),
            },
            ScenarioVariant::Moderate => VariantMultipliers {
                appreciation: Decimal::ONE,
                occupancy: Decimal::ONE,
                rent: Decimal::ONE,
            },
            ScenarioVariant::Optimistic => VariantMultipliers {
                appreciation: dec!(1.2),
                occupancy: dec!(1.1),
                rent: dec!(1.15),
            },
        }
    }

    /// Adjust the promoter's terms for this variant.
    pub fn adjust(self, base: &OperatingTerms) -> RealtyModelResult<OperatingTerms> {
        let m = self.multipliers();
        let apply = |value: Decimal, factor: Decimal, field: &str| {
            value
                .checked_mul(factor)
                .ok_or_else(|| RealtyModelError::overflow(field))
        };
        Ok(OperatingTerms {
            rent: apply(base.rent, m.rent, "rent")?,
            appreciation_pct: apply(
                base.appreciation_pct,
                m.appreciation,
                "annual_appreciation_pct",
            )?,
            occupancy_pct: apply(base.occupancy_pct, m.occupancy, "occupancy_rate_pct")?,
            ..base.clone()
        })
    }

    pub fn translation_key(self) -> &'static str {
        match self {
            ScenarioVariant::Conservative => "scenario.conservative",
            ScenarioVariant::Moderate => "scenario.moderate",
            ScenarioVariant::Optimistic => "scenario.optimistic",
        }
    }
}

impl fmt::Display for ScenarioVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScenarioVariant::Conservative => "conservative",
            ScenarioVariant::Moderate => "moderate",
            ScenarioVariant::Optimistic => "optimistic",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for ScenarioVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "conservative" => Ok(ScenarioVariant::Conservative),
            "moderate" => Ok(ScenarioVariant::Moderate),
            "optimistic" => Ok(ScenarioVariant::Optimistic),
            other => Err(format!(
                "Unknown scenario '{other}' (expected conservative, moderate or optimistic)"
            )),
        }
    }
}

/// Projection, summary and narrative for one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantResult {
    pub variant: ScenarioVariant,
    pub terms: OperatingTerms,
    pub years: Vec<YearRecord>,
    pub summary: ScenarioSummary,
    pub evaluation: Evaluation,
}

/// The three variants computed from one input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioAnalysis {
    pub initial_cash_outlay: ReportingMoney,
    pub annual_depreciation: SourceMoney,
    pub exchange_rates: ExchangeRates,
    pub scenarios: Vec<VariantResult>,
}

impl ScenarioAnalysis {
    pub fn variant(&self, variant: ScenarioVariant) -> Option<&VariantResult> {
        self.scenarios.iter().find(|r| r.variant == variant)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the conservative, moderate and optimistic projections for a deal.
pub fn analyze_scenarios(
    input: &ScenarioInput,
    translator: &dyn Translator,
) -> RealtyModelResult<ComputationOutput<ScenarioAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.validate(&mut warnings)?;
    let basis = ProjectionBasis::from_input(input)?;

    let scenarios = ScenarioVariant::ALL
        .iter()
        .map(|&variant| run_variant(input, &basis, variant, translator, &mut warnings))
        .collect::<RealtyModelResult<Vec<_>>>()?;

    log::debug!(
        "analysed {} scenarios over {} years",
        scenarios.len(),
        input.promoter_data.project_duration_years
    );

    let output = ScenarioAnalysis {
        initial_cash_outlay: basis.initial_cash_outlay(),
        annual_depreciation: basis.depreciation.annual,
        exchange_rates: basis.rates,
        scenarios,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Multi-Scenario Real Estate Projection (risk-adjusted FX, straight-line depreciation)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Run a single variant.
pub fn project_variant(
    input: &ScenarioInput,
    variant: ScenarioVariant,
    translator: &dyn Translator,
) -> RealtyModelResult<ComputationOutput<VariantResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.validate(&mut warnings)?;
    let basis = ProjectionBasis::from_input(input)?;
    let output = run_variant(input, &basis, variant, translator, &mut warnings)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        &format!("Real Estate Projection ({variant} scenario)"),
        input,
        warnings,
        elapsed,
        output,
    ))
}

pub(crate) fn run_variant(
    input: &ScenarioInput,
    basis: &ProjectionBasis,
    variant: ScenarioVariant,
    translator: &dyn Translator,
    warnings: &mut Vec<String>,
) -> RealtyModelResult<VariantResult> {
    let terms = variant.adjust(&OperatingTerms::from(&input.promoter_data))?;
    let years = project_years(basis, &terms)?;

    let mut summary_warnings = Vec::new();
    let summary = summarize(
        &years,
        basis,
        input.country,
        &input.assumptions,
        &mut summary_warnings,
    )?;
    warnings.extend(summary_warnings.into_iter().map(|w| format!("{variant}: {w}")));

    let evaluation = evaluate(
        &EvaluationContext {
            variant,
            avg_annual_return_pct: summary.avg_annual_return_pct,
            break_even_year: summary.break_even_year,
            total_return_pct: summary.total_return_pct,
            recommendation: summary.recommendation,
            duration_years: terms.duration_years,
        },
        translator,
    );

    Ok(VariantResult {
        variant,
        terms,
        years,
        summary,
        evaluation,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
