//! Pluggable scoring strategies.
//!
//! A strategy reduces a judged candidate's component scores into one scalar
//! fitness value so the pipeline's decision logic stays strategy-agnostic.
//! Every strategy is pure and deterministic, and returns 0.0 (never errors)
//! for a candidate the judge has not evaluated yet.

use crate::types::{CandidatePrompt, OriginalPrompt};
use std::sync::Arc;

/// Strategy contract for computing a candidate's final score.
pub trait ScoringStrategy: Send + Sync {
    /// Stable strategy name, used in logs.
    fn name(&self) -> &'static str;

    /// Reduce the candidate's component scores into one scalar in context of
    /// the original prompt. Must return 0.0 when the candidate is unjudged.
    fn calculate_score(&self, candidate: &CandidatePrompt, original: &OriginalPrompt) -> f64;
}

fn mean_constraint_score(candidate: &CandidatePrompt) -> Option<f64> {
    match &candidate.constraint_scores {
        Some(scores) if !scores.is_empty() => {
            Some(scores.values().sum::<f64>() / scores.len() as f64)
        }
        _ => None,
    }
}

fn weighted_sum(candidate: &CandidatePrompt, intent_w: f64, tone_w: f64, constraint_w: f64) -> f64 {
    let Some(intent) = candidate.primary_intent_score else {
        return 0.0;
    };

    let mut score = intent * intent_w;
    score += candidate.tone_voice_score.unwrap_or(0.0) * tone_w;

    // No scored constraints means no constraint term; the weight is not
    // redistributed to the other components.
    if let Some(avg) = mean_constraint_score(candidate) {
        score += avg * constraint_w;
    }

    score
}

/// Standard weighted-sum strategy: intent 50%, tone 30%, constraints 20%
/// (average over all scored constraints).
#[derive(Debug, Clone)]
pub struct WeightedStrategy {
    pub intent_weight: f64,
    pub tone_weight: f64,
    pub constraint_weight: f64,
}

impl Default for WeightedStrategy {
    fn default() -> Self {
        Self {
            intent_weight: 0.5,
            tone_weight: 0.3,
            constraint_weight: 0.2,
        }
    }
}

impl ScoringStrategy for WeightedStrategy {
    fn name(&self) -> &'static str {
        "weighted"
    }

    fn calculate_score(&self, candidate: &CandidatePrompt, _original: &OriginalPrompt) -> f64 {
        weighted_sum(
            candidate,
            self.intent_weight,
            self.tone_weight,
            self.constraint_weight,
        )
    }
}

/// Strict "compiler mode" strategy: geometric mean of all component scores.
///
/// Every component is clamped to at least 0.01 so a single zero cannot
/// collapse the whole product.
#[derive(Debug, Clone, Default)]
pub struct GeometricMeanStrategy;

const GEOMETRIC_FLOOR: f64 = 0.01;

impl ScoringStrategy for GeometricMeanStrategy {
    fn name(&self) -> &'static str {
        "geometric"
    }

    fn calculate_score(&self, candidate: &CandidatePrompt, _original: &OriginalPrompt) -> f64 {
        let Some(intent) = candidate.primary_intent_score else {
            return 0.0;
        };

        let mut components = vec![
            intent.max(GEOMETRIC_FLOOR),
            candidate.tone_voice_score.unwrap_or(0.0).max(GEOMETRIC_FLOOR),
        ];
        if let Some(scores) = &candidate.constraint_scores {
            components.extend(scores.values().map(|s| s.max(GEOMETRIC_FLOOR)));
        }

        let product: f64 = components.iter().product();
        product.powf(1.0 / components.len() as f64)
    }
}

/// "Linter mode" strategy: start from 1.0 and subtract fixed penalties.
///
/// Missing the primary intent wipes the score out entirely; each violated
/// constraint costs 0.5; a bad tone costs 0.1. The result never goes below
/// 0.0.
#[derive(Debug, Clone)]
pub struct PenaltyStrategy {
    pub intent_floor: f64,
    pub constraint_floor: f64,
    pub tone_floor: f64,
}

impl Default for PenaltyStrategy {
    fn default() -> Self {
        Self {
            intent_floor: 0.9,
            constraint_floor: 0.7,
            tone_floor: 0.5,
        }
    }
}

impl ScoringStrategy for PenaltyStrategy {
    fn name(&self) -> &'static str {
        "penalty"
    }

    fn calculate_score(&self, candidate: &CandidatePrompt, _original: &OriginalPrompt) -> f64 {
        let Some(intent) = candidate.primary_intent_score else {
            return 0.0;
        };

        let mut score = 1.0_f64;

        if intent < self.intent_floor {
            score -= 1.0;
        }

        if let Some(scores) = &candidate.constraint_scores {
            for value in scores.values() {
                if *value < self.constraint_floor {
                    score -= 0.5;
                }
            }
        }

        if candidate.tone_voice_score.unwrap_or(0.0) < self.tone_floor {
            score -= 0.1;
        }

        score.max(0.0)
    }
}

/// Mode-aware strategy: picks a weight triple from the original prompt's
/// `mode` tag, then applies the weighted-sum formula.
#[derive(Debug, Clone, Default)]
pub struct DynamicStrategy;

impl DynamicStrategy {
    fn weights_for(mode: Option<&str>) -> (f64, f64, f64) {
        match mode {
            Some("strict_code") => (0.4, 0.0, 0.6),
            Some("creative") => (0.4, 0.5, 0.1),
            // "balanced" and anything unrecognized.
            _ => (0.5, 0.2, 0.3),
        }
    }
}

impl ScoringStrategy for DynamicStrategy {
    fn name(&self) -> &'static str {
        "dynamic"
    }

    fn calculate_score(&self, candidate: &CandidatePrompt, original: &OriginalPrompt) -> f64 {
        let (intent_w, tone_w, constraint_w) = Self::weights_for(original.mode.as_deref());
        weighted_sum(candidate, intent_w, tone_w, constraint_w)
    }
}

/// Resolve a strategy by case-insensitive name.
///
/// Unknown names log a warning and fall back to the weighted default rather
/// than erroring.
pub fn strategy_for(name: &str) -> Arc<dyn ScoringStrategy> {
    match name.trim().to_ascii_lowercase().as_str() {
        "weighted" => Arc::new(WeightedStrategy::default()),
        "geometric" | "geometric_mean" => Arc::new(GeometricMeanStrategy),
        "penalty" => Arc::new(PenaltyStrategy::default()),
        "dynamic" => Arc::new(DynamicStrategy),
        other => {
            tracing::warn!("Unknown scoring strategy '{}', using weighted", other);
            Arc::new(WeightedStrategy::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ModelDescriptor;
    use std::collections::HashMap;

    fn descriptor() -> ModelDescriptor {
        ModelDescriptor::api_default("openai", "gpt-4o")
    }

    fn original() -> OriginalPrompt {
        OriginalPrompt::new("summarize this", descriptor())
    }

    fn judged(intent: f64, tone: f64, constraints: &[(&str, f64)]) -> CandidatePrompt {
        let mut candidate = CandidatePrompt::new("candidate", descriptor());
        candidate.primary_intent_score = Some(intent);
        candidate.tone_voice_score = Some(tone);
        if !constraints.is_empty() {
            candidate.constraint_scores = Some(
                constraints
                    .iter()
                    .map(|(k, v)| (k.to_string(), *v))
                    .collect::<HashMap<_, _>>(),
            );
        }
        candidate
    }

    #[test]
    fn weighted_matches_formula_exactly() {
        let candidate = judged(0.8, 0.6, &[("no_emoji", 1.0), ("max_words", 0.5)]);
        let strategy = WeightedStrategy::default();
        let expected = 0.8 * 0.5 + 0.6 * 0.3 + ((1.0 + 0.5) / 2.0) * 0.2;
        assert!((strategy.calculate_score(&candidate, &original()) - expected).abs() < 1e-12);
    }

    #[test]
    fn weighted_omits_constraint_term_when_none_scored() {
        let candidate = judged(1.0, 1.0, &[]);
        let strategy = WeightedStrategy::default();
        let score = strategy.calculate_score(&candidate, &original());
        // Constraint weight is not redistributed.
        assert!((score - 0.8).abs() < 1e-12);
    }

    #[test]
    fn weighted_is_zero_for_unjudged_candidate() {
        let mut candidate = CandidatePrompt::new("candidate", descriptor());
        candidate.tone_voice_score = Some(1.0);
        let strategy = WeightedStrategy::default();
        assert_eq!(strategy.calculate_score(&candidate, &original()), 0.0);
    }

    #[test]
    fn geometric_perfect_scores_yield_one() {
        let candidate = judged(1.0, 1.0, &[]);
        let strategy = GeometricMeanStrategy;
        assert!((strategy.calculate_score(&candidate, &original()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn geometric_clamps_zero_components() {
        let candidate = judged(0.0, 1.0, &[]);
        let strategy = GeometricMeanStrategy;
        let score = strategy.calculate_score(&candidate, &original());
        assert!((score - (0.01f64).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn geometric_includes_constraint_components() {
        let candidate = judged(1.0, 1.0, &[("schema", 0.5)]);
        let strategy = GeometricMeanStrategy;
        let score = strategy.calculate_score(&candidate, &original());
        assert!((score - 0.5f64.powf(1.0 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn penalty_charges_each_violated_constraint() {
        let candidate = judged(0.95, 0.9, &[("format", 0.6)]);
        let strategy = PenaltyStrategy::default();
        assert!((strategy.calculate_score(&candidate, &original()) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn penalty_wipes_out_missed_intent_and_clamps_at_zero() {
        let candidate = judged(0.5, 0.2, &[("a", 0.1), ("b", 0.2)]);
        let strategy = PenaltyStrategy::default();
        assert_eq!(strategy.calculate_score(&candidate, &original()), 0.0);
    }

    #[test]
    fn dynamic_selects_weights_from_mode_tag() {
        let candidate = judged(1.0, 1.0, &[("c", 1.0)]);
        let strategy = DynamicStrategy;

        let mut strict = original();
        strict.mode = Some("strict_code".to_string());
        assert!((strategy.calculate_score(&candidate, &strict) - 1.0).abs() < 1e-12);

        let candidate_toneless = judged(1.0, 0.0, &[("c", 1.0)]);
        // Tone weight is zero in strict_code mode, so a flat tone costs nothing.
        assert!(
            (strategy.calculate_score(&candidate_toneless, &strict) - 1.0).abs() < 1e-12
        );

        let balanced = original();
        let score = strategy.calculate_score(&candidate_toneless, &balanced);
        assert!((score - (0.5 + 0.3)).abs() < 1e-12);
    }

    #[test]
    fn factory_is_case_insensitive_and_defaults_to_weighted() {
        assert_eq!(strategy_for("GEOMETRIC").name(), "geometric");
        assert_eq!(strategy_for("Penalty").name(), "penalty");
        assert_eq!(strategy_for("dynamic").name(), "dynamic");
        assert_eq!(strategy_for("does-not-exist").name(), "weighted");
    }
}
