//! Query-handling pipeline for SupportDesk.
//!
//! This crate ties retrieval, relevance gating, intent classification, and
//! answer synthesis into [`QueryPipeline::answer_query`].

pub mod intent;
pub mod orchestrator;
mod prompts;
pub mod relevance;
pub mod repair;
pub mod responders;
pub mod synthesis;

#[cfg(test)]
mod testing;

pub use orchestrator::{PipelineProgress, QueryPipeline, SilentProgress, Stage};
pub use synthesis::{DecodeError, SynthesisOutcome};
