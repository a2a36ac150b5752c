//! Intent classification for queries the documentation cannot answer.

use supportdesk_llm::LanguageModel;
use supportdesk_shared::{IntentCategory, Result};
use tracing::{debug, instrument, warn};

use crate::prompts;

/// Bucket `query` into TECHNICAL_NO_DOCS, BILLING or IRRELEVANT.
///
/// Unrecognized replies fall back to [`IntentCategory::Irrelevant`]; only a
/// failed model call is an error.
#[instrument(skip_all)]
pub async fn classify(model: &dyn LanguageModel, query: &str) -> Result<IntentCategory> {
    let reply = model.prompt(&prompts::intent_prompt(query)).await?;
    let category = parse_intent(&reply);
    debug!(reply = %reply.trim(), %category, "intent classified");
    Ok(category)
}

pub(crate) fn parse_intent(reply: &str) -> IntentCategory {
    let token = reply.trim().to_uppercase();
    match IntentCategory::from_token(&token) {
        Some(category @ IntentCategory::TechnicalNoDocs)
        | Some(category @ IntentCategory::Billing)
        | Some(category @ IntentCategory::Irrelevant) => category,
        Some(IntentCategory::TechnicalWithDocs) | None => {
            warn!(%token, "unrecognized intent token, defaulting to IRRELEVANT");
            IntentCategory::Irrelevant
        }
    }
}
