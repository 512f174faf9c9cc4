//! Prompt records carried through one compilation run.
//!
//! [`OriginalPrompt`] is written once by the historian and read-only
//! afterwards. [`CandidatePrompt`] is created fresh each optimization attempt
//! and mutated in place by the pilot (response) and the judge (scores,
//! feedback). Exactly one candidate outlives the loop as the returned result.

use crate::scoring::ScoringStrategy;
use crate::types::ModelDescriptor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// The user-supplied prompt bound to its source model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginalPrompt {
    /// Raw prompt text as authored for the source model.
    pub prompt: String,
    /// Source model descriptor.
    pub model: ModelDescriptor,
    /// Optional response-format hint (JSON schema or similar).
    #[serde(default)]
    pub response_format: Option<Value>,
    /// Baseline response, set exactly once by the historian.
    #[serde(default)]
    pub response: Option<String>,
    /// Optimization mode tag read by the dynamic scoring strategy
    /// ("strict_code", "creative", absent = balanced).
    #[serde(default)]
    pub mode: Option<String>,
    /// When the baseline was captured.
    #[serde(default)]
    pub baselined_at: Option<DateTime<Utc>>,
}

impl OriginalPrompt {
    pub fn new(prompt: impl Into<String>, model: ModelDescriptor) -> Self {
        Self {
            prompt: prompt.into(),
            model,
            response_format: None,
            response: None,
            mode: None,
            baselined_at: None,
        }
    }
}

/// One generated attempt at an optimized prompt for the target model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidatePrompt {
    /// Unique id for log correlation across role calls.
    pub id: Uuid,
    /// Generated prompt text.
    pub prompt: String,
    /// Target model descriptor.
    pub model: ModelDescriptor,
    /// Optional response-format hint carried to the pilot.
    #[serde(default)]
    pub response_format: Option<Value>,
    /// Execution response, set by the pilot. A failed test run is recorded
    /// here as an `ERROR:` marker rather than raised.
    #[serde(default)]
    pub response: Option<String>,

    // Component scores, absent until the judge has evaluated this instance.
    #[serde(default)]
    pub primary_intent_score: Option<f64>,
    #[serde(default)]
    pub tone_voice_score: Option<f64>,
    #[serde(default)]
    pub constraint_scores: Option<HashMap<String, f64>>,

    /// Constructive hint from the judge, carried into the next design call.
    #[serde(default)]
    pub feedback: Option<String>,

    // Score cache, keyed by strategy instance identity. Two strategy
    // instances with identical weights are cache-distinct on purpose; this
    // mirrors observed upstream behavior (see DESIGN.md).
    #[serde(skip)]
    cached_score: Option<f64>,
    #[serde(skip)]
    cached_strategy_key: Option<usize>,
}

impl CandidatePrompt {
    pub fn new(prompt: impl Into<String>, model: ModelDescriptor) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt: prompt.into(),
            model,
            response_format: None,
            response: None,
            primary_intent_score: None,
            tone_voice_score: None,
            constraint_scores: None,
            feedback: None,
            cached_score: None,
            cached_strategy_key: None,
        }
    }

    /// Final scalar score under the given strategy.
    ///
    /// The result is cached per strategy instance: calling again with the
    /// same `Arc` returns the cached value without re-invoking the strategy,
    /// while a different instance recomputes and replaces the cache entry.
    pub fn total_score(
        &mut self,
        strategy: &Arc<dyn ScoringStrategy>,
        original: &OriginalPrompt,
    ) -> f64 {
        let key = Arc::as_ptr(strategy) as *const () as usize;

        if let (Some(score), Some(cached_key)) = (self.cached_score, self.cached_strategy_key) {
            if cached_key == key {
                return score;
            }
        }

        let score = strategy.calculate_score(self, original);
        self.cached_score = Some(score);
        self.cached_strategy_key = Some(key);
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ModelDescriptor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingStrategy {
        calls: AtomicUsize,
        value: f64,
    }

    impl ScoringStrategy for CountingStrategy {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn calculate_score(&self, _candidate: &CandidatePrompt, _original: &OriginalPrompt) -> f64 {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.value
        }
    }

    fn candidate() -> CandidatePrompt {
        CandidatePrompt::new("prompt", ModelDescriptor::api_default("openai", "gpt-4o"))
    }

    fn original() -> OriginalPrompt {
        OriginalPrompt::new("prompt", ModelDescriptor::api_default("openai", "gpt-4o"))
    }

    #[test]
    fn total_score_caches_per_strategy_instance() {
        let typed = Arc::new(CountingStrategy {
            calls: AtomicUsize::new(0),
            value: 0.7,
        });
        let strategy: Arc<dyn ScoringStrategy> = typed.clone();
        let mut candidate = candidate();
        let original = original();

        assert_eq!(candidate.total_score(&strategy, &original), 0.7);
        assert_eq!(candidate.total_score(&strategy, &original), 0.7);
        assert_eq!(typed.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn distinct_strategy_instances_do_not_share_cache() {
        let first = Arc::new(CountingStrategy {
            calls: AtomicUsize::new(0),
            value: 0.5,
        });
        let second = Arc::new(CountingStrategy {
            calls: AtomicUsize::new(0),
            value: 0.9,
        });
        let first_erased: Arc<dyn ScoringStrategy> = first.clone();
        let second_erased: Arc<dyn ScoringStrategy> = second.clone();

        let mut candidate = candidate();
        let original = original();

        assert_eq!(candidate.total_score(&first_erased, &original), 0.5);
        assert_eq!(candidate.total_score(&second_erased, &original), 0.9);
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.calls.load(Ordering::SeqCst), 1);

        // Returning to the first instance recomputes; the cache only holds
        // the most recent strategy.
        assert_eq!(candidate.total_score(&first_erased, &original), 0.5);
        assert_eq!(first.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn cache_state_is_not_serialized() {
        let mut candidate = candidate();
        let original = original();
        let strategy: Arc<dyn ScoringStrategy> = Arc::new(CountingStrategy {
            calls: AtomicUsize::new(0),
            value: 0.7,
        });
        candidate.total_score(&strategy, &original);

        let json = serde_json::to_string(&candidate).unwrap();
        assert!(!json.contains("cached_score"));
    }
}
