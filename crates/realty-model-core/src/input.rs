use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::assumptions::{ModelAssumptions, MAX_PROJECTION_YEARS};
use crate::depreciation::Country;
use crate::error::RealtyModelError;
use crate::fees::Fee;
use crate::types::{Currency, Money, Percent, Rate};
use crate::RealtyModelResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentMode {
    #[default]
    Monthly,
    Nightly,
}

/// Operating assumptions supplied by the project promoter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoterData {
    /// Rent per month or per night, depending on `rent_mode` (source currency)
    pub rent: Money,
    #[serde(default)]
    pub rent_mode: RentMode,
    #[serde(default)]
    pub annual_appreciation_pct: Percent,
    /// Only used for nightly rentals
    #[serde(default = "default_occupancy")]
    pub occupancy_rate_pct: Percent,
    #[serde(default)]
    pub management_fee_pct: Percent,
    pub project_duration_years: u32,
    #[serde(default)]
    pub income_tax_rate_pct: Percent,
    #[serde(default)]
    pub annual_rent_increase_pct: Percent,
}

fn default_occupancy() -> Percent {
    dec!(100)
}

/// Everything needed to project one property across the three scenario variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInput {
    /// Total acquisition cost in the source currency
    pub purchase_cost: Money,
    #[serde(default)]
    pub country: Country,
    pub promoter_data: PromoterData,
    #[serde(default)]
    pub recurring_fees: Vec<Fee>,
    /// Source → reporting rate at analysis time
    pub spot_exchange_rate: Rate,
    #[serde(default)]
    pub source_currency: Currency,
    #[serde(default = "default_reporting_currency")]
    pub reporting_currency: Currency,
    #[serde(default)]
    pub assumptions: ModelAssumptions,
}

/// Holding period must be between 1 and `MAX_PROJECTION_YEARS` years.
pub(crate) fn check_duration(years: u32) -> RealtyModelResult<()> {
    if years < 1 {
        return Err(RealtyModelError::Configuration {
            field: "project_duration_years".into(),
            reason: "Project duration must be at least 1 year".into(),
        });
    }
    if years > MAX_PROJECTION_YEARS {
        return Err(RealtyModelError::Configuration {
            field: "project_duration_years".into(),
            reason: format!("Project duration cannot exceed {MAX_PROJECTION_YEARS} years"),
        });
    }
    Ok(())
}

pub(crate) fn default_reporting_currency() -> Currency {
    Currency::CAD
}

impl ScenarioInput {
    /// Reject inputs the model cannot run on and collect warnings for
    /// values that are legal but unusual.
    pub fn validate(&self, warnings: &mut Vec<String>) -> RealtyModelResult<()> {
        check_duration(self.promoter_data.project_duration_years)?;

        if self.purchase_cost < Decimal::ZERO {
            return Err(RealtyModelError::InvalidInput {
                field: "purchase_cost".into(),
                reason: "Purchase cost cannot be negative".into(),
            });
        }

        if self.spot_exchange_rate <= Decimal::ZERO {
            return Err(RealtyModelError::InvalidInput {
                field: "spot_exchange_rate".into(),
                reason: "Spot exchange rate must be positive".into(),
            });
        }

        self.assumptions.validate()?;

        let p = &self.promoter_data;
        if p.rent < Decimal::ZERO {
            warnings.push(format!("Rent {} is negative — income will be negative", p.rent));
        }
        if p.rent_mode == RentMode::Nightly
            && (p.occupancy_rate_pct < Decimal::ZERO || p.occupancy_rate_pct > dec!(100))
        {
            warnings.push(format!(
                "Occupancy rate {}% is outside 0–100%",
                p.occupancy_rate_pct
            ));
        }
        if p.management_fee_pct >= dec!(100) {
            warnings.push(format!(
                "Management fee {}% consumes all rental income",
                p.management_fee_pct
            ));
        }
        if p.income_tax_rate_pct > dec!(100) {
            warnings.push(format!(
                "Income tax rate {}% exceeds 100%",
                p.income_tax_rate_pct
            ));
        }
        if self.purchase_cost.is_zero() {
            warnings.push(
                "Purchase cost is zero — ROI and cash-on-cash returns are reported as 0".into(),
            );
        }

        Ok(())
    }
}
