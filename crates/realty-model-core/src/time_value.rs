use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::assumptions::{ModelAssumptions, IRR_INITIAL_GUESS, IRR_MAX_ITERATIONS, IRR_TOLERANCE};
use crate::error::RealtyModelError;
use crate::types::{Money, Rate};
use crate::RealtyModelResult;

const IRR_FLOOR: Rate = dec!(-0.99);
const IRR_CEILING: Rate = dec!(10);

/// Newton-Raphson settings for [`irr`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrrSettings {
    pub guess: Rate,
    /// Accept the rate once |NPV| is below this
    pub tolerance: Decimal,
    pub max_iterations: u32,
}

impl Default for IrrSettings {
    fn default() -> Self {
        Self {
            guess: IRR_INITIAL_GUESS,
            tolerance: IRR_TOLERANCE,
            max_iterations: IRR_MAX_ITERATIONS,
        }
    }
}

impl From<&ModelAssumptions> for IrrSettings {
    fn from(a: &ModelAssumptions) -> Self {
        Self {
            guess: a.irr_initial_guess,
            tolerance: a.irr_tolerance,
            max_iterations: a.irr_max_iterations,
        }
    }
}

/// Result of the IRR search. When `converged` is false, `rate` is the
/// iterate with the smallest |NPV| seen and should be read as approximate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrrEstimate {
    pub rate: Rate,
    pub converged: bool,
    pub iterations: u32,
}

/// Net Present Value of a series of cash flows, `cash_flows[0]` undiscounted.
pub fn npv(rate: Rate, cash_flows: &[Money]) -> RealtyModelResult<Money> {
    if rate <= dec!(-1) {
        return Err(RealtyModelError::InvalidInput {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }

    npv_and_derivative(cash_flows, rate)
        .map(|(value, _)| value)
        .ok_or_else(|| RealtyModelError::InvalidInput {
            field: "rate".into(),
            reason: format!("Discounting at {rate} overflows over {} periods", cash_flows.len()),
        })
}

/// Internal Rate of Return using Newton-Raphson.
///
/// The rate is clamped to [-0.99, 10] after every step. Running out of
/// iterations is not an error: the best estimate is returned with
/// `converged = false`.
pub fn irr(cash_flows: &[Money], settings: &IrrSettings) -> RealtyModelResult<IrrEstimate> {
    if cash_flows.len() < 2 {
        return Err(RealtyModelError::InsufficientData(
            "IRR requires at least 2 cash flows".into(),
        ));
    }

    let mut rate = settings.guess.clamp(IRR_FLOOR, IRR_CEILING);
    let mut best_rate = rate;
    let mut best_abs_npv = Decimal::MAX;
    let mut iterations = 0;

    while iterations < settings.max_iterations {
        iterations += 1;

        let Some((npv_val, dnpv)) = npv_and_derivative(cash_flows, rate) else {
            log::debug!("IRR: discounting overflowed at rate {rate}");
            break;
        };

        if npv_val.abs() < best_abs_npv {
            best_abs_npv = npv_val.abs();
            best_rate = rate;
        }

        if npv_val.abs() < settings.tolerance {
            return Ok(IrrEstimate {
                rate,
                converged: true,
                iterations,
            });
        }

        let Some(step) = npv_val.checked_div(dnpv) else {
            log::debug!("IRR: derivative vanished at rate {rate}");
            break;
        };

        rate = (rate - step).clamp(IRR_FLOOR, IRR_CEILING);
    }

    log::warn!(
        "IRR did not converge after {iterations} iterations; best estimate {best_rate} (|NPV| {best_abs_npv})"
    );

    Ok(IrrEstimate {
        rate: best_rate,
        converged: false,
        iterations,
    })
}

/// NPV(r) = sum CF_t / (1+r)^t and its derivative d(NPV)/dr.
/// `None` if any intermediate leaves the decimal range.
fn npv_and_derivative(cash_flows: &[Money], rate: Rate) -> Option<(Decimal, Decimal)> {
    let one_plus_r = Decimal::ONE + rate;
    let mut npv = Decimal::ZERO;
    let mut dnpv = Decimal::ZERO;
    let mut discount = Decimal::ONE;

    for (t, cf) in cash_flows.iter().enumerate() {
        npv = npv.checked_add(cf.checked_mul(discount)?)?;
        if t > 0 {
            // d/dr of CF_t / (1+r)^t = -t * CF_t / (1+r)^(t+1)
            let term = Decimal::from(t as i64)
                .checked_mul(*cf)?
                .checked_mul(discount)?
                .checked_div(one_plus_r)?;
            dnpv = dnpv.checked_sub(term)?;
        }
        discount = discount.checked_div(one_plus_r)?;
    }

    Some((npv, dnpv))
}
