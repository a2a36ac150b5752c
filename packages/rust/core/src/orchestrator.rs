//! End-to-end query pipeline: retrieve → gate → classify or synthesize → respond.
//!
//! [`QueryPipeline::answer_query`] never fails: any error at any stage is
//! logged and turned into the `ERROR` payload.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use supportdesk_llm::LanguageModel;
use supportdesk_retrieval::RetrievalGateway;
use supportdesk_shared::{
    AppConfig, IntentCategory, QueryId, StructuredResponse, SupportContacts, SupportDeskError,
};
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::synthesis::SynthesisOutcome;
use crate::{intent, relevance, responders, synthesis};

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Pipeline states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Retrieving,
    Gating,
    Classifying,
    Synthesizing,
    Responding,
    Done,
    Failed,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retrieving => "RETRIEVING",
            Self::Gating => "GATING",
            Self::Classifying => "CLASSIFYING",
            Self::Synthesizing => "SYNTHESIZING",
            Self::Responding => "RESPONDING",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
        }
    }

    /// Human-readable name of the remote call made in this stage.
    fn call_name(&self) -> &'static str {
        match self {
            Self::Retrieving => "document retrieval",
            Self::Gating => "relevance check",
            Self::Classifying => "intent classification",
            Self::Synthesizing => "answer synthesis",
            _ => "pipeline step",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress callback for stage transitions.
pub trait PipelineProgress: Send + Sync {
    /// Called on entering `stage`.
    fn stage(&self, stage: Stage);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl PipelineProgress for SilentProgress {
    fn stage(&self, _stage: Stage) {}
}

/// An error tagged with the stage it happened in.
#[derive(Debug)]
struct StageError {
    stage: Stage,
    source: SupportDeskError,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Answers support queries. Holds no per-query state, so one instance can
/// serve concurrent callers.
#[derive(Clone)]
pub struct QueryPipeline {
    retrieval: RetrievalGateway,
    model: Arc<dyn LanguageModel>,
    contacts: SupportContacts,
    stage_timeout: Duration,
}

impl QueryPipeline {
    pub fn new(
        retrieval: RetrievalGateway,
        model: Arc<dyn LanguageModel>,
        contacts: SupportContacts,
        stage_timeout: Duration,
    ) -> Self {
        Self {
            retrieval,
            model,
            contacts,
            stage_timeout,
        }
    }

    /// Build a pipeline using the `[pipeline]` and `[support]` config sections.
    pub fn from_config(
        config: &AppConfig,
        retrieval: RetrievalGateway,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        Self::new(
            retrieval,
            model,
            config.support.clone(),
            config.pipeline.stage_timeout(),
        )
    }

    /// Answer one query. Always returns one of the defined response shapes.
    pub async fn answer_query(&self, query: &str) -> StructuredResponse {
        self.answer_query_with_progress(query, &SilentProgress).await
    }

    /// [`answer_query`](Self::answer_query) with stage notifications.
    pub async fn answer_query_with_progress(
        &self,
        query: &str,
        progress: &dyn PipelineProgress,
    ) -> StructuredResponse {
        let query_id = QueryId::new();
        let span = info_span!("answer_query", %query_id, model = %self.model.model_name());

        async move {
            debug!(query, "query received");
            match self.run(query, progress).await {
                Ok(response) => {
                    progress.stage(Stage::Done);
                    info!(response_type = response.kind(), "query answered");
                    response
                }
                Err(e) => {
                    progress.stage(Stage::Failed);
                    error!(stage = %e.stage, error = %e.source, "query failed");
                    responders::error(&e.source)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        query: &str,
        progress: &dyn PipelineProgress,
    ) -> Result<StructuredResponse, StageError> {
        progress.stage(Stage::Retrieving);
        let context = self
            .guarded(Stage::Retrieving, self.retrieval.retrieve(query))
            .await?;

        progress.stage(Stage::Gating);
        let relevant = self
            .guarded(
                Stage::Gating,
                relevance::is_relevant(self.model.as_ref(), query, &context),
            )
            .await?;

        if relevant {
            progress.stage(Stage::Synthesizing);
            let outcome = self
                .guarded(
                    Stage::Synthesizing,
                    synthesis::synthesize(self.model.as_ref(), query, &context),
                )
                .await?;

            progress.stage(Stage::Responding);
            Ok(match outcome {
                SynthesisOutcome::Answered(answer) => StructuredResponse::TechnicalWithDocs(answer),
                SynthesisOutcome::Malformed(e) => {
                    warn!(error = %e, "synthesis reply unusable, escalating to support");
                    responders::technical_no_docs(&self.contacts)
                }
            })
        } else {
            progress.stage(Stage::Classifying);
            let category = self
                .guarded(
                    Stage::Classifying,
                    intent::classify(self.model.as_ref(), query),
                )
                .await?;

            progress.stage(Stage::Responding);
            Ok(self.respond_to(category))
        }
    }

    fn respond_to(&self, category: IntentCategory) -> StructuredResponse {
        match category {
            IntentCategory::TechnicalNoDocs => responders::technical_no_docs(&self.contacts),
            IntentCategory::Billing => responders::billing(&self.contacts),
            IntentCategory::Irrelevant => responders::irrelevant(),
            IntentCategory::TechnicalWithDocs => {
                warn!("documentation intent on the fallback path, treating as IRRELEVANT");
                responders::irrelevant()
            }
        }
    }

    /// Run one remote call under the stage deadline.
    async fn guarded<T>(
        &self,
        stage: Stage,
        call: impl Future<Output = supportdesk_shared::Result<T>>,
    ) -> Result<T, StageError> {
        let source = match tokio::time::timeout(self.stage_timeout, call).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) => e,
            Err(_) => SupportDeskError::timeout(stage.call_name(), self.stage_timeout),
        };
        Err(StageError { stage, source })
    }
}
