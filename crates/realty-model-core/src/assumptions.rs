//! Platform-wide model constants.
//!
//! Every projection runs under a `ModelAssumptions` value. Inputs that do not
//! carry one get [`ModelAssumptions::default`], which is built from the named
//! constants below.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RealtyModelError;
use crate::types::Rate;
use crate::RealtyModelResult;

/// Currency-risk premium applied to the spot rate for every future cash flow.
pub const CURRENCY_RISK_PREMIUM: Rate = dec!(0.05);

/// Yearly inflation of recurring fees.
pub const FEE_INFLATION_RATE: Rate = dec!(0.025);

/// Discount rate used for NPV.
pub const NPV_DISCOUNT_RATE: Rate = dec!(0.05);

/// Starting point for the IRR solver.
pub const IRR_INITIAL_GUESS: Rate = dec!(0.10);

/// IRR is accepted once |NPV| falls below this.
pub const IRR_TOLERANCE: Decimal = dec!(0.0001);

pub const IRR_MAX_ITERATIONS: u32 = 100;

/// Longest holding period a projection will run.
pub const MAX_PROJECTION_YEARS: u32 = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelAssumptions {
    /// Uplift on the spot rate for year 1..N conversions (0.05 = +5%)
    pub currency_risk_premium: Rate,
    /// Annual growth of recurring fees
    pub fee_inflation_rate: Rate,
    /// Discount rate for NPV
    pub discount_rate: Rate,
    pub irr_initial_guess: Rate,
    pub irr_tolerance: Decimal,
    pub irr_max_iterations: u32,
}

impl Default for ModelAssumptions {
    fn default() -> Self {
        Self {
            currency_risk_premium: CURRENCY_RISK_PREMIUM,
            fee_inflation_rate: FEE_INFLATION_RATE,
            discount_rate: NPV_DISCOUNT_RATE,
            irr_initial_guess: IRR_INITIAL_GUESS,
            irr_tolerance: IRR_TOLERANCE,
            irr_max_iterations: IRR_MAX_ITERATIONS,
        }
    }
}

impl ModelAssumptions {
    pub fn validate(&self) -> RealtyModelResult<()> {
        if self.currency_risk_premium <= dec!(-1) {
            return Err(RealtyModelError::Configuration {
                field: "currency_risk_premium".into(),
                reason: "Premium must be greater than -100%".into(),
            });
        }
        if self.discount_rate <= dec!(-1) {
            return Err(RealtyModelError::Configuration {
                field: "discount_rate".into(),
                reason: "Discount rate must be greater than -100%".into(),
            });
        }
        if self.fee_inflation_rate <= dec!(-1) {
            return Err(RealtyModelError::Configuration {
                field: "fee_inflation_rate".into(),
                reason: "Fee inflation must be greater than -100%".into(),
            });
        }
        if self.irr_tolerance <= Decimal::ZERO {
            return Err(RealtyModelError::Configuration {
                field: "irr_tolerance".into(),
                reason: "Tolerance must be positive".into(),
            });
        }
        if self.irr_max_iterations == 0 {
            return Err(RealtyModelError::Configuration {
                field: "irr_max_iterations".into(),
                reason: "At least one solver iteration is required".into(),
            });
        }
        Ok(())
    }
}
