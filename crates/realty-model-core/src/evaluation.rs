//! Qualitative read-out of a scenario summary.
//!
//! The narrative is assembled from translation keys so the caller can supply
//! any locale. Keys that take a number carry a `{n}` placeholder.

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::summary::Recommendation;
use crate::types::Percent;
use crate::variants::ScenarioVariant;

/// Looks up display text for a translation key.
pub trait Translator {
    fn translate(&self, key: &str) -> String;
}

impl<F> Translator for F
where
    F: Fn(&str) -> String,
{
    fn translate(&self, key: &str) -> String {
        self(key)
    }
}

/// Built-in English strings. Unknown keys are echoed back.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishTranslator;

impl Translator for EnglishTranslator {
    fn translate(&self, key: &str) -> String {
        let text = match key {
            "scenario.conservative" => "Conservative scenario",
            "scenario.moderate" => "Moderate scenario",
            "scenario.optimistic" => "Optimistic scenario",
            "recommendation.recommended" => "Recommended",
            "recommendation.consider" => "Worth considering",
            "recommendation.not_recommended" => "Not recommended",
            "metric.avg_annual_return" => "Average annual return",
            "metric.total_return" => "total return",
            "metric.over_years" => "over {n} years",
            "metric.break_even_in" => "Break-even in year {n}",
            "metric.break_even_never" => "No break-even within the holding period",
            "flag.return.attractive" => "The return is attractive",
            "flag.return.moderate" => "The return is moderate",
            "flag.return.low" => "The return is low",
            "flag.break_even.quick" => "capital is recovered quickly",
            "flag.break_even.acceptable" => "the break-even horizon is acceptable",
            "flag.break_even.distant" => "the break-even point is distant",
            other => return other.to_string(),
        };
        text.to_string()
    }
}

/// Translations from a key → text map, falling back to English for missing keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapTranslator {
    entries: HashMap<String, String>,
}

impl MapTranslator {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }
}

impl Translator for MapTranslator {
    fn translate(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| EnglishTranslator.translate(key))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnQuality {
    Attractive,
    Moderate,
    Low,
}

impl ReturnQuality {
    pub fn from_avg_return(avg_annual_return_pct: Percent) -> Self {
        if avg_annual_return_pct > dec!(8) {
            ReturnQuality::Attractive
        } else if avg_annual_return_pct < dec!(3) {
            ReturnQuality::Low
        } else {
            ReturnQuality::Moderate
        }
    }

    fn key(self) -> &'static str {
        match self {
            ReturnQuality::Attractive => "flag.return.attractive",
            ReturnQuality::Moderate => "flag.return.moderate",
            ReturnQuality::Low => "flag.return.low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakEvenQuality {
    Quick,
    Acceptable,
    Distant,
}

impl BreakEvenQuality {
    pub fn from_break_even(break_even_year: Option<u32>) -> Self {
        match break_even_year {
            Some(y) if y <= 5 => BreakEvenQuality::Quick,
            Some(y) if y <= 7 => BreakEvenQuality::Acceptable,
            _ => BreakEvenQuality::Distant,
        }
    }

    fn key(self) -> &'static str {
        match self {
            BreakEvenQuality::Quick => "flag.break_even.quick",
            BreakEvenQuality::Acceptable => "flag.break_even.acceptable",
            BreakEvenQuality::Distant => "flag.break_even.distant",
        }
    }
}

fn recommendation_key(r: Recommendation) -> &'static str {
    match r {
        Recommendation::Recommended => "recommendation.recommended",
        Recommendation::Consider => "recommendation.consider",
        Recommendation::NotRecommended => "recommendation.not_recommended",
    }
}

/// The metrics an evaluation is written from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationContext {
    pub variant: ScenarioVariant,
    pub avg_annual_return_pct: Percent,
    pub break_even_year: Option<u32>,
    pub total_return_pct: Percent,
    pub recommendation: Recommendation,
    pub duration_years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub text: String,
    pub return_quality: ReturnQuality,
    pub break_even_quality: BreakEvenQuality,
}

pub fn evaluate(ctx: &EvaluationContext, t: &dyn Translator) -> Evaluation {
    let return_quality = ReturnQuality::from_avg_return(ctx.avg_annual_return_pct);
    let break_even_quality = BreakEvenQuality::from_break_even(ctx.break_even_year);

    let break_even = match ctx.break_even_year {
        Some(y) => fill(&t.translate("metric.break_even_in"), y),
        None => t.translate("metric.break_even_never"),
    };

    let text = format!(
        "{}: {}. {}: {:.2}% ({} {:.2}% {}). {}. {}, {}.",
        t.translate(ctx.variant.translation_key()),
        t.translate(recommendation_key(ctx.recommendation)),
        t.translate("metric.avg_annual_return"),
        ctx.avg_annual_return_pct,
        t.translate("metric.total_return"),
        ctx.total_return_pct,
        fill(&t.translate("metric.over_years"), ctx.duration_years),
        break_even,
        t.translate(return_quality.key()),
        t.translate(break_even_quality.key()),
    );

    Evaluation {
        text,
        return_quality,
        break_even_quality,
    }
}

fn fill(template: &str, n: u32) -> String {
    template.replace("{n}", &n.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ctx() -> EvaluationContext {
        EvaluationContext {
            variant: ScenarioVariant::Moderate,
            avg_annual_return_pct: dec!(9.456),
            break_even_year: Some(4),
            total_return_pct: dec!(94.56),
            recommendation: Recommendation::Recommended,
            duration_years: 10,
        }
    }

    #[test]
    fn test_english_narrative() {
        let e = evaluate(&ctx(), &EnglishTranslator);
        assert_eq!(
            e.text,
            "Moderate scenario: Recommended. Average annual return: 9.46% \
             (total return 94.56% over 10 years). Break-even in year 4. \
             The return is attractive, capital is recovered quickly."
        );
        assert_eq!(e.return_quality, ReturnQuality::Attractive);
        assert_eq!(e.break_even_quality, BreakEvenQuality::Quick);
    }

    #[test]
    fn test_never_breaking_even_reads_distant() {
        let mut c = ctx();
        c.break_even_year = None;
        c.avg_annual_return_pct = dec!(1.5);
        c.recommendation = Recommendation::NotRecommended;
        let e = evaluate(&c, &EnglishTranslator);
        assert_eq!(e.break_even_quality, BreakEvenQuality::Distant);
        assert_eq!(e.return_quality, ReturnQuality::Low);
        assert!(e.text.contains("No break-even within the holding period"));
        assert!(e.text.starts_with("Moderate scenario: Not recommended."));
    }

    #[test]
    fn test_flag_boundaries() {
        assert_eq!(ReturnQuality::from_avg_return(dec!(8)), ReturnQuality::Moderate);
        assert_eq!(ReturnQuality::from_avg_return(dec!(3)), ReturnQuality::Moderate);
        assert_eq!(ReturnQuality::from_avg_return(dec!(2.99)), ReturnQuality::Low);
        assert_eq!(BreakEvenQuality::from_break_even(Some(5)), BreakEvenQuality::Quick);
        assert_eq!(BreakEvenQuality::from_break_even(Some(7)), BreakEvenQuality::Acceptable);
        assert_eq!(BreakEvenQuality::from_break_even(Some(8)), BreakEvenQuality::Distant);
    }

    #[test]
    fn test_closure_translator() {
        let upper = |key: &str| key.to_uppercase();
        let e = evaluate(&ctx(), &upper);
        assert!(e.text.starts_with("SCENARIO.MODERATE: RECOMMENDATION.RECOMMENDED."));
    }

    #[test]
    fn test_map_translator_falls_back_to_english() {
        let mut entries = HashMap::new();
        entries.insert("scenario.moderate".to_string(), "Scénario modéré".to_string());
        entries.insert("metric.over_years".to_string(), "sur {n} ans".to_string());
        let t = MapTranslator::new(entries);
        let e = evaluate(&ctx(), &t);
        assert!(e.text.starts_with("Scénario modéré: Recommended."));
        assert!(e.text.contains("sur 10 ans"));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(
            evaluate(&ctx(), &EnglishTranslator),
            evaluate(&ctx(), &EnglishTranslator)
        );
    }
}
