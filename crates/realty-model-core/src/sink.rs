//! Hand-off of computed scenarios to whatever stores them.
//!
//! A stored batch is always replaced as a whole: results from a previous
//! run are never merged with a new one.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::RealtyModelError;
use crate::projection::YearRecord;
use crate::summary::ScenarioSummary;
use crate::variants::{ScenarioAnalysis, ScenarioVariant};
use crate::RealtyModelResult;

/// One persisted (variant, years, summary, evaluation) tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredScenario {
    pub variant: ScenarioVariant,
    pub years: Vec<YearRecord>,
    pub summary: ScenarioSummary,
    pub evaluation_text: String,
}

pub trait ScenarioSink {
    /// Replace everything stored under `scenario_id` with `batch`.
    fn replace_results(
        &mut self,
        scenario_id: &str,
        batch: Vec<StoredScenario>,
    ) -> RealtyModelResult<()>;
}

#[derive(Debug, Default)]
pub struct InMemorySink {
    batches: HashMap<String, Vec<StoredScenario>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, scenario_id: &str) -> Option<&[StoredScenario]> {
        self.batches.get(scenario_id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

impl ScenarioSink for InMemorySink {
    fn replace_results(
        &mut self,
        scenario_id: &str,
        batch: Vec<StoredScenario>,
    ) -> RealtyModelResult<()> {
        self.batches.insert(scenario_id.to_string(), batch);
        Ok(())
    }
}

/// Persist all variants of an analysis under one identifier.
/// Returns the number of stored variants.
pub fn store_analysis(
    sink: &mut dyn ScenarioSink,
    scenario_id: &str,
    analysis: &ScenarioAnalysis,
) -> RealtyModelResult<usize> {
    if scenario_id.trim().is_empty() {
        return Err(RealtyModelError::InvalidInput {
            field: "scenario_id".into(),
            reason: "Scenario identifier cannot be empty".into(),
        });
    }

    let batch: Vec<StoredScenario> = analysis
        .scenarios
        .iter()
        .map(|r| StoredScenario {
            variant: r.variant,
            years: r.years.clone(),
            summary: r.summary.clone(),
            evaluation_text: r.evaluation.text.clone(),
        })
        .collect();
    let count = batch.len();

    sink.replace_results(scenario_id, batch)?;
    log::debug!("stored {count} scenario variants under '{scenario_id}'");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::EnglishTranslator;
    use crate::input::tests::sample_input;
    use crate::variants::analyze_scenarios;
    use rust_decimal_macros::dec;

    #[test]
    fn test_store_three_variants() {
        let analysis = analyze_scenarios(&sample_input(), &EnglishTranslator)
            .unwrap()
            .result;
        let mut sink = InMemorySink::new();
        let n = store_analysis(&mut sink, "deal-42", &analysis).unwrap();
        assert_eq!(n, 3);
        let stored = sink.get("deal-42").unwrap();
        assert_eq!(stored[0].variant, ScenarioVariant::Conservative);
        assert_eq!(stored[2].evaluation_text, analysis.scenarios[2].evaluation.text);
    }

    #[test]
    fn test_recompute_replaces_wholesale() {
        let mut sink = InMemorySink::new();
        let first = analyze_scenarios(&sample_input(), &EnglishTranslator)
            .unwrap()
            .result;
        store_analysis(&mut sink, "deal-42", &first).unwrap();

        let mut input = sample_input();
        input.promoter_data.project_duration_years = 3;
        let second = analyze_scenarios(&input, &EnglishTranslator).unwrap().result;
        store_analysis(&mut sink, "deal-42", &second).unwrap();

        assert_eq!(sink.len(), 1);
        let stored = sink.get("deal-42").unwrap();
        assert_eq!(stored.len(), 3);
        assert!(stored.iter().all(|s| s.years.len() == 3));
        assert_eq!(stored[1].years[0].rental_income.amount(), dec!(34020));
    }

    #[test]
    fn test_blank_id_rejected() {
        let analysis = analyze_scenarios(&sample_input(), &EnglishTranslator)
            .unwrap()
            .result;
        let mut sink = InMemorySink::new();
        assert!(store_analysis(&mut sink, "  ", &analysis).is_err());
        assert!(sink.is_empty());
    }
}
