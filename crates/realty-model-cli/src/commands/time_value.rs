use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use realty_model_core::time_value::{self, IrrSettings};

/// Arguments for IRR
#[derive(Args)]
pub struct IrrArgs {
    /// Periodic cash flows (comma-separated, e.g. "-100,30,30,130")
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
    pub cash_flows: Vec<Decimal>,

    /// Initial guess as a decimal rate
    #[arg(long, default_value = "0.10")]
    pub guess: Decimal,
}

/// Arguments for NPV
#[derive(Args)]
pub struct NpvArgs {
    /// Discount rate as a decimal (0.05 = 5%)
    #[arg(long, default_value = "0.05", allow_hyphen_values = true)]
    pub rate: Decimal,

    /// Periodic cash flows (comma-separated, first undiscounted)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
    pub cash_flows: Vec<Decimal>,
}

pub fn run_irr(args: IrrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let settings = IrrSettings {
        guess: args.guess,
        ..Default::default()
    };
    let est = time_value::irr(&args.cash_flows, &settings)?;
    Ok(json!({
        "irr": est.rate,
        "irr_pct": est.rate * dec!(100),
        "converged": est.converged,
        "iterations": est.iterations,
    }))
}

pub fn run_npv(args: NpvArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let value = time_value::npv(args.rate, &args.cash_flows)?;
    Ok(json!({
        "npv": value,
        "rate": args.rate,
        "periods": args.cash_flows.len(),
    }))
}
