use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;

use realty_model_core::evaluation::MapTranslator;
use realty_model_core::input::ScenarioInput;
use realty_model_core::time_value::{self, IrrSettings};
use realty_model_core::variants::{self, ScenarioVariant};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_translator(translations_json: Option<String>) -> NapiResult<MapTranslator> {
    match translations_json {
        Some(json) => serde_json::from_str(&json).map_err(to_napi_error),
        None => Ok(MapTranslator::default()),
    }
}

fn parse_flows(flows_json: &str) -> NapiResult<Vec<Decimal>> {
    serde_json::from_str(flows_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_scenarios(
    input_json: String,
    translations_json: Option<String>,
) -> NapiResult<String> {
    let input: ScenarioInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let translator = parse_translator(translations_json)?;
    let output = variants::analyze_scenarios(&input, &translator).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn project_variant(input_json: String, variant: String) -> NapiResult<String> {
    let input: ScenarioInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let variant: ScenarioVariant = variant.parse().map_err(to_napi_error)?;
    let output = variants::project_variant(&input, variant, &MapTranslator::default())
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn sensitivity_sweep(input_json: String) -> NapiResult<String> {
    let input: realty_model_core::sensitivity::SensitivityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = realty_model_core::sensitivity::sweep(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Time value
// ---------------------------------------------------------------------------

#[napi]
pub fn irr(flows_json: String) -> NapiResult<String> {
    let flows = parse_flows(&flows_json)?;
    let estimate = time_value::irr(&flows, &IrrSettings::default()).map_err(to_napi_error)?;
    serde_json::to_string(&estimate).map_err(to_napi_error)
}

#[napi]
pub fn npv(rate: String, flows_json: String) -> NapiResult<String> {
    let rate: Decimal = rate.parse().map_err(to_napi_error)?;
    let flows = parse_flows(&flows_json)?;
    let value = time_value::npv(rate, &flows).map_err(to_napi_error)?;
    serde_json::to_string(&value).map_err(to_napi_error)
}
