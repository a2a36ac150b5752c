//! Relevance gate: does the retrieved context help with the query?

use supportdesk_llm::LanguageModel;
use supportdesk_shared::Result;
use tracing::{debug, instrument};

use crate::prompts;

/// Ask the model one YES/NO question about `context`.
///
/// Only an exact `YES` (after trimming and upper-casing) counts as relevant.
#[instrument(skip_all, fields(context_chars = context.len()))]
pub async fn is_relevant(model: &dyn LanguageModel, query: &str, context: &str) -> Result<bool> {
    let reply = model.prompt(&prompts::relevance_prompt(query, context)).await?;
    let relevant = parse_relevance(&reply);
    debug!(reply = %reply.trim(), relevant, "relevance decided");
    Ok(relevant)
}

pub(crate) fn parse_relevance(reply: &str) -> bool {
    reply.trim().to_uppercase() == "YES"
}
