//! Documentation-backed answer synthesis.
//!
//! The model is asked for a JSON payload; its reply goes through
//! [`repair::parse_model_json`] and then [`decode_answer`], which fills
//! defaults field by field. The model only supplies the narrative answer and
//! optional metadata: `type`, `priority` and `responseTime` are always fixed.

use serde_json::{Map, Value};
use supportdesk_llm::LanguageModel;
use supportdesk_shared::{Result, TechnicalAnswer};
use tracing::{debug, instrument};

use crate::prompts;
use crate::repair::{self, Unparseable};

pub const DEFAULT_CONFIDENCE: f64 = 0.95;
pub const DEFAULT_SOURCES_USED: u32 = 1;

/// Why a model reply could not become a [`TechnicalAnswer`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Unparseable(#[from] Unparseable),

    #[error("reply JSON is not an object")]
    NotAnObject,

    #[error("reply has no answer")]
    MissingAnswer,

    #[error("answer is not a string")]
    InvalidAnswer,
}

/// Result of one synthesis call.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisOutcome {
    Answered(TechnicalAnswer),
    /// The model replied, but not with a usable payload.
    Malformed(DecodeError),
}

/// Ask the model for a JSON answer grounded in `context`.
///
/// A failed model call is an error; an unusable reply is
/// [`SynthesisOutcome::Malformed`].
#[instrument(skip_all, fields(context_chars = context.len()))]
pub async fn synthesize(
    model: &dyn LanguageModel,
    query: &str,
    context: &str,
) -> Result<SynthesisOutcome> {
    let reply = model
        .complete(&prompts::synthesis_messages(query, context))
        .await?;
    debug!(reply_chars = reply.len(), "synthesis reply received");

    Ok(match decode_reply(&reply) {
        Ok(answer) => SynthesisOutcome::Answered(answer),
        Err(e) => SynthesisOutcome::Malformed(e),
    })
}

/// Parse (with repair) and decode a raw reply.
pub fn decode_reply(raw: &str) -> std::result::Result<TechnicalAnswer, DecodeError> {
    let value = repair::parse_model_json(raw)?;
    decode_answer(&value)
}

/// Validate a parsed payload and fill defaults.
pub fn decode_answer(value: &Value) -> std::result::Result<TechnicalAnswer, DecodeError> {
    let object = value.as_object().ok_or(DecodeError::NotAnObject)?;

    let answer = match object.get("answer") {
        None | Some(Value::Null) => return Err(DecodeError::MissingAnswer),
        Some(Value::String(s)) if s.trim().is_empty() => return Err(DecodeError::MissingAnswer),
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err(DecodeError::InvalidAnswer),
    };

    Ok(TechnicalAnswer::new(
        answer,
        confidence(object),
        sources_used(object),
        relevant_docs(object),
    ))
}

fn confidence(object: &Map<String, Value>) -> f64 {
    object
        .get("confidence")
        .and_then(Value::as_f64)
        .unwrap_or(DEFAULT_CONFIDENCE)
}

fn sources_used(object: &Map<String, Value>) -> u32 {
    match object.get("sourcesUsed") {
        Some(Value::Number(n)) => n
            .as_u64()
            .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f.round() as u32)
            })
            .unwrap_or(DEFAULT_SOURCES_USED),
        _ => DEFAULT_SOURCES_USED,
    }
}

/// String entries only; anything else in the array is dropped.
fn relevant_docs(object: &Map<String, Value>) -> Vec<String> {
    match object.get("relevantDocs") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(String::from))
            .collect(),
        _ => Vec::new(),
    }
}
