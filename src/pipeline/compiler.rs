//! The compilation pipeline: baseline, decompile, then the optimization loop.
//!
//! One [`CompilerPipeline`] serves any number of independent runs. Each run
//! is strictly sequential: every role call is awaited before the next begins,
//! and each prompt record is exclusively owned by the run that created it.

use std::sync::Arc;

use crate::config::CompilerConfig;
use crate::pipeline::ModelRegistry;
use crate::roles::{
    Architect, Decompiler, DefaultHistorian, DefaultPilot, Historian, Judge, LlmArchitect,
    LlmDecompiler, LlmJudge, Pilot,
};
use crate::scoring::{strategy_for, ScoringStrategy};
use crate::telemetry::{MetricsSink, PipelineTelemetry};
use crate::types::{CandidatePrompt, CompileError, OriginalPrompt};

const RUNS_COUNTER: &str = "compiler.pipeline.runs";
const SUCCESS_COUNTER: &str = "compiler.pipeline.success";
const FAILURE_COUNTER: &str = "compiler.pipeline.failures";
const RETRY_COUNTER: &str = "compiler.pipeline.retries";

/// One compilation request: rewrite `raw_prompt` (authored for the source
/// model) into an optimized prompt for the target model.
#[derive(Debug, Clone)]
pub struct CompileRequest {
    pub raw_prompt: String,
    pub source_model: String,
    pub target_model: String,
    pub source_provider: String,
    pub target_provider: String,
    /// Override of the configured retry budget for this run.
    pub max_retries: Option<u32>,
    /// Optimization mode tag consumed by the dynamic scoring strategy.
    pub mode: Option<String>,
}

impl CompileRequest {
    pub fn new(
        raw_prompt: impl Into<String>,
        source_model: impl Into<String>,
        target_model: impl Into<String>,
    ) -> Self {
        Self {
            raw_prompt: raw_prompt.into(),
            source_model: source_model.into(),
            target_model: target_model.into(),
            source_provider: "openai".to_string(),
            target_provider: "openai".to_string(),
            max_retries: None,
            mode: None,
        }
    }

    pub fn with_providers(
        mut self,
        source_provider: impl Into<String>,
        target_provider: impl Into<String>,
    ) -> Self {
        self.source_provider = source_provider.into();
        self.target_provider = target_provider.into();
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }
}

/// The orchestration engine.
///
/// All roles and the scoring strategy are injected so alternate backends and
/// test doubles can be swapped in without touching the loop.
pub struct CompilerPipeline {
    historian: Arc<dyn Historian>,
    decompiler: Arc<dyn Decompiler>,
    architect: Arc<dyn Architect>,
    pilot: Arc<dyn Pilot>,
    judge: Arc<dyn Judge>,
    scoring: Arc<dyn ScoringStrategy>,
    metrics: Arc<dyn MetricsSink>,
    registry: Arc<ModelRegistry>,
    score_threshold: f64,
    max_retries: u32,
    early_stop_patience: u32,
}

impl CompilerPipeline {
    /// Pipeline with the default role implementations bound per `config`.
    pub fn new(config: &CompilerConfig) -> Result<Self, CompileError> {
        Self::builder(config).build()
    }

    pub fn builder(config: &CompilerConfig) -> PipelineBuilder {
        PipelineBuilder::new(config.clone())
    }

    /// Execute one compilation run.
    ///
    /// Returns the first candidate to meet the score threshold, else the best
    /// candidate seen once retries or patience are exhausted. Baseline,
    /// decompile, architect, and judge failures abort the run.
    pub async fn run(&self, request: CompileRequest) -> Result<CandidatePrompt, CompileError> {
        self.metrics.add(
            RUNS_COUNTER,
            1,
            &[
                ("source", request.source_model.clone()),
                ("target", request.target_model.clone()),
            ],
        );

        match self.execute(request).await {
            Ok(candidate) => Ok(candidate),
            Err(e) => {
                tracing::error!("Pipeline failed execution: {}", e);
                self.metrics.add(FAILURE_COUNTER, 1, &[]);
                Err(e)
            }
        }
    }

    async fn execute(&self, request: CompileRequest) -> Result<CandidatePrompt, CompileError> {
        if request.raw_prompt.trim().is_empty() {
            return Err(CompileError::EmptyPrompt);
        }

        let max_retries = request.max_retries.unwrap_or(self.max_retries);

        tracing::info!(
            "Starting compilation pipeline: source={} target={} max_retries={}",
            request.source_model,
            request.target_model,
            max_retries
        );

        let source = self
            .registry
            .get(&request.source_model, Some(&request.source_provider));
        let target = self
            .registry
            .get(&request.target_model, Some(&request.target_provider));

        let mut original = OriginalPrompt::new(&request.raw_prompt, source);
        original.mode = request.mode.clone();

        // Stage 1: baseline. No baseline means no point of comparison, so
        // failure here is fatal.
        tracing::debug!("Stage 1: establishing baseline");
        let original = self.historian.establish_baseline(original).await?;

        // Stage 2: decompile to IR.
        tracing::debug!("Stage 2: decompiling to IR");
        let ir = self.decompiler.decompile(&original, &target).await?;

        // Stage 3: design / test / judge / score until a stop condition fires.
        tracing::debug!("Stage 3: entering optimization loop");
        let mut best_candidate: Option<CandidatePrompt> = None;
        let mut last_candidate: Option<CandidatePrompt> = None;
        let mut best_score = -1.0_f64;
        let mut patience_counter = 0u32;
        let mut feedback: Option<String> = None;

        for attempt in 0..=max_retries {
            tracing::info!(
                "Optimization loop: attempt {}/{}",
                attempt + 1,
                max_retries + 1
            );
            if attempt > 0 {
                self.metrics.add(RETRY_COUNTER, 1, &[]);
            }

            let candidate = self
                .architect
                .design_prompt(&ir, &target, feedback.as_deref())
                .await?;

            let mut candidate = self.pilot.test_candidate(candidate).await;

            self.judge.evaluate(&mut candidate, &original).await?;

            let final_score = candidate.total_score(&self.scoring, &original);
            tracing::info!("Candidate scored: score={:.4}", final_score);

            // Strict improvement only: ties keep the first-seen best and
            // still count against patience.
            if final_score > best_score {
                best_score = final_score;
                best_candidate = Some(candidate.clone());
                patience_counter = 0;
            } else {
                patience_counter += 1;
            }

            if final_score >= self.score_threshold {
                tracing::info!("Threshold met: score={:.4}", final_score);
                self.metrics.add(
                    SUCCESS_COUNTER,
                    1,
                    &[("status", "threshold_met".to_string())],
                );
                return Ok(candidate);
            }

            if patience_counter >= self.early_stop_patience {
                tracing::warn!("Early stopping triggered: no improvement.");
                last_candidate = Some(candidate);
                break;
            }

            feedback = candidate.feedback.clone();
            if feedback.as_deref().map_or(true, str::is_empty) {
                tracing::warn!("Judge provided no feedback for optimization.");
            }
            last_candidate = Some(candidate);
        }

        tracing::warn!(
            "Max retries reached. Returning best candidate: best_score={:.4}",
            best_score
        );
        if let Some(best) = best_candidate {
            self.metrics.add(
                SUCCESS_COUNTER,
                1,
                &[("status", "max_retries_best_effort".to_string())],
            );
            return Ok(best);
        }

        // Only reachable if every score sat at or below the -1.0 sentinel,
        // which non-negative strategies never produce.
        if let Some(last) = last_candidate {
            self.metrics
                .add(SUCCESS_COUNTER, 1, &[("status", "fallback".to_string())]);
            return Ok(last);
        }

        Err(CompileError::NoCandidate)
    }
}

/// Builder for a [`CompilerPipeline`] with injected collaborators.
///
/// Any role left unset is constructed from the configuration's role bindings.
pub struct PipelineBuilder {
    config: CompilerConfig,
    historian: Option<Arc<dyn Historian>>,
    decompiler: Option<Arc<dyn Decompiler>>,
    architect: Option<Arc<dyn Architect>>,
    pilot: Option<Arc<dyn Pilot>>,
    judge: Option<Arc<dyn Judge>>,
    scoring: Option<Arc<dyn ScoringStrategy>>,
    metrics: Option<Arc<dyn MetricsSink>>,
    registry: Option<Arc<ModelRegistry>>,
}

impl PipelineBuilder {
    pub fn new(config: CompilerConfig) -> Self {
        Self {
            config,
            historian: None,
            decompiler: None,
            architect: None,
            pilot: None,
            judge: None,
            scoring: None,
            metrics: None,
            registry: None,
        }
    }

    pub fn with_historian(mut self, historian: Arc<dyn Historian>) -> Self {
        self.historian = Some(historian);
        self
    }

    pub fn with_decompiler(mut self, decompiler: Arc<dyn Decompiler>) -> Self {
        self.decompiler = Some(decompiler);
        self
    }

    pub fn with_architect(mut self, architect: Arc<dyn Architect>) -> Self {
        self.architect = Some(architect);
        self
    }

    pub fn with_pilot(mut self, pilot: Arc<dyn Pilot>) -> Self {
        self.pilot = Some(pilot);
        self
    }

    pub fn with_judge(mut self, judge: Arc<dyn Judge>) -> Self {
        self.judge = Some(judge);
        self
    }

    pub fn with_scoring(mut self, scoring: Arc<dyn ScoringStrategy>) -> Self {
        self.scoring = Some(scoring);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_registry(mut self, registry: Arc<ModelRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn build(self) -> Result<CompilerPipeline, CompileError> {
        let config = self.config;

        let decompiler = match self.decompiler {
            Some(decompiler) => decompiler,
            None => Arc::new(LlmDecompiler::from_config(&config.roles.decompiler)?),
        };
        let architect = match self.architect {
            Some(architect) => architect,
            None => Arc::new(LlmArchitect::from_config(&config.roles.architect)?),
        };
        let judge = match self.judge {
            Some(judge) => judge,
            None => Arc::new(LlmJudge::from_config(&config.roles.judge)?),
        };

        Ok(CompilerPipeline {
            historian: self.historian.unwrap_or_else(|| Arc::new(DefaultHistorian)),
            decompiler,
            architect,
            pilot: self.pilot.unwrap_or_else(|| Arc::new(DefaultPilot)),
            judge,
            scoring: self
                .scoring
                .unwrap_or_else(|| strategy_for(&config.scoring_strategy)),
            metrics: self
                .metrics
                .unwrap_or_else(|| Arc::new(PipelineTelemetry::new(&config.telemetry))),
            registry: self.registry.unwrap_or_else(|| Arc::new(ModelRegistry::new())),
            score_threshold: config.score_threshold,
            max_retries: config.max_retries,
            early_stop_patience: config.early_stop_patience,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_prompt_is_rejected_before_any_role_runs() {
        let pipeline = CompilerPipeline::new(&CompilerConfig::default()).unwrap();
        let request = CompileRequest::new("   ", "gpt-4o", "gemini-2.5-pro");

        let err = pipeline.run(request).await.unwrap_err();
        assert!(matches!(err, CompileError::EmptyPrompt));
    }

    #[tokio::test]
    async fn offline_run_returns_a_candidate_end_to_end() {
        let config = CompilerConfig::default();
        let pipeline = CompilerPipeline::new(&config).unwrap();
        let request = CompileRequest::new(
            "Summarize Fight Club using emojis",
            "gpt-4o",
            "gemini-2.5-pro",
        )
        .with_providers("openai", "gemini");

        let candidate = pipeline.run(request).await.unwrap();
        assert_eq!(candidate.model.model_name, "gemini-2.5-pro");
        // The offline judge scores every attempt identically, so the loop
        // ends as a best-effort result below the threshold.
        assert!(candidate.primary_intent_score.is_some());
        assert!(candidate.response.is_some());
    }
}
