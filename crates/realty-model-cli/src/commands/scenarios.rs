use clap::Args;
use serde::de::DeserializeOwned;
use serde_json::Value;

use realty_model_core::deal::DealTerms;
use realty_model_core::evaluation::MapTranslator;
use realty_model_core::input::ScenarioInput;
use realty_model_core::sensitivity::{self, SensitivityDriver, SensitivityInput};
use realty_model_core::variants::{self, ScenarioVariant};
use rust_decimal::Decimal;

use crate::input;

/// Arguments for the three-scenario analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to a JSON/YAML scenario input (or deal terms with --deal)
    #[arg(long)]
    pub input: Option<String>,

    /// Treat the input as deal terms (price + transaction costs)
    #[arg(long)]
    pub deal: bool,

    /// JSON/YAML map of translation keys to localised text
    #[arg(long)]
    pub translations: Option<String>,
}

/// Arguments for a single-variant projection
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to a JSON/YAML scenario input (or deal terms with --deal)
    #[arg(long)]
    pub input: Option<String>,

    /// Treat the input as deal terms (price + transaction costs)
    #[arg(long)]
    pub deal: bool,

    /// conservative, moderate or optimistic
    #[arg(long, default_value = "moderate")]
    pub variant: ScenarioVariant,

    /// JSON/YAML map of translation keys to localised text
    #[arg(long)]
    pub translations: Option<String>,
}

/// Arguments for a one-way sensitivity sweep
#[derive(Args)]
pub struct SensitivityArgs {
    /// Path to a full sweep definition (base scenario + driver + range)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to the base scenario input, used with --var
    #[arg(long)]
    pub base_inputs: Option<String>,

    /// Driver to sweep in format driver:min:max:step
    /// (e.g. "appreciation:0:8:1"; drivers: appreciation, occupancy, rent,
    /// spot_rate, management_fee, income_tax_rate)
    #[arg(long, allow_hyphen_values = true)]
    pub var: Option<String>,

    /// Scenario variant to sweep
    #[arg(long, default_value = "moderate")]
    pub variant: ScenarioVariant,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario = load_scenario(&args.input, args.deal)?;
    let translator = load_translator(&args.translations)?;
    let result = variants::analyze_scenarios(&scenario, &translator)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario = load_scenario(&args.input, args.deal)?;
    let translator = load_translator(&args.translations)?;
    let result = variants::project_variant(&scenario, args.variant, &translator)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sweep_input: SensitivityInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else {
        let var = args
            .var
            .as_deref()
            .ok_or("--var driver:min:max:step is required (or provide --input)")?;
        let base_path = args
            .base_inputs
            .as_deref()
            .ok_or("--base-inputs is required with --var")?;
        let (driver, min, max, step) = parse_sweep_var(var)?;
        SensitivityInput {
            base: input::file::read_input(base_path)?,
            driver,
            min,
            max,
            step,
            variant: args.variant,
        }
    };

    let result = sensitivity::sweep(&sweep_input)?;
    Ok(serde_json::to_value(result)?)
}

fn load_scenario(
    path: &Option<String>,
    deal: bool,
) -> Result<ScenarioInput, Box<dyn std::error::Error>> {
    if deal {
        let terms: DealTerms = load(path, "deal terms")?;
        Ok(terms.into_scenario_input()?)
    } else {
        load(path, "scenario analysis")
    }
}

fn load<T: DeserializeOwned>(
    path: &Option<String>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(ref path) = path {
        input::file::read_input(path)
    } else if let Some(data) = input::stdin::read_stdin()? {
        Ok(serde_json::from_value(data)?)
    } else {
        Err(format!("--input <file> or stdin required for {what}").into())
    }
}

fn load_translator(path: &Option<String>) -> Result<MapTranslator, Box<dyn std::error::Error>> {
    match path {
        Some(p) => input::file::read_input(p),
        None => Ok(MapTranslator::default()),
    }
}

fn parse_sweep_var(
    var: &str,
) -> Result<(SensitivityDriver, Decimal, Decimal, Decimal), Box<dyn std::error::Error>> {
    let parts: Vec<&str> = var.split(':').collect();
    if parts.len() != 4 {
        return Err(format!(
            "Sensitivity variable must be driver:min:max:step, got '{}'",
            var
        )
        .into());
    }
    let driver: SensitivityDriver =
        serde_json::from_value(Value::String(parts[0].to_string()))
            .map_err(|_| format!("Unknown sensitivity driver '{}'", parts[0]))?;
    Ok((driver, parts[1].parse()?, parts[2].parse()?, parts[3].parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_sweep_var() {
        let (driver, min, max, step) = parse_sweep_var("spot_rate:1.2:1.5:0.05").unwrap();
        assert_eq!(driver, SensitivityDriver::SpotRate);
        assert_eq!(min, dec!(1.2));
        assert_eq!(max, dec!(1.5));
        assert_eq!(step, dec!(0.05));
    }

    #[test]
    fn test_parse_sweep_var_negative_bounds() {
        let (driver, min, _, _) = parse_sweep_var("appreciation:-2:6:1").unwrap();
        assert_eq!(driver, SensitivityDriver::Appreciation);
        assert_eq!(min, dec!(-2));
    }

    #[test]
    fn test_parse_sweep_var_errors() {
        assert!(parse_sweep_var("appreciation:0:8").is_err());
        assert!(parse_sweep_var("vacancy:0:8:1").is_err());
        assert!(parse_sweep_var("rent:a:8:1").is_err());
    }
}
