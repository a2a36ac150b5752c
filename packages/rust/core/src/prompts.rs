//! Prompt templates for every model-backed stage.

use supportdesk_llm::ChatMessage;

/// Literal JSON shape shown to the model during synthesis.
pub(crate) const ANSWER_EXAMPLE: &str = r#"{
  "answer": "A clear, step-by-step answer based only on the documentation",
  "confidence": 0.95,
  "sourcesUsed": 1,
  "relevantDocs": ["Title or short description of each document used"]
}"#;

/// Yes/no relevance question. Biased toward YES: partial matches count.
pub(crate) fn relevance_prompt(query: &str, context: &str) -> String {
    format!(
        "You are checking whether retrieved support documentation can help answer a user's question.\n\
         \n\
         Documentation:\n\
         {context}\n\
         \n\
         Question: {query}\n\
         \n\
         Does the documentation contain information relevant to the question? \
         Answer YES if it contains any relevant information, even a partial match. \
         Answer NO only if it is completely unrelated.\n\
         Reply with exactly one word: YES or NO."
    )
}

/// Single-word classification among the three no-documentation categories.
pub(crate) fn intent_prompt(query: &str) -> String {
    format!(
        "Classify the following customer support query into exactly one category:\n\
         \n\
         TECHNICAL_NO_DOCS - a technical or product question (setup, errors, features, how-to)\n\
         BILLING - payments, invoices, refunds, pricing, or subscriptions\n\
         IRRELEVANT - anything unrelated to the product or its support\n\
         \n\
         Query: {query}\n\
         \n\
         Reply with only the category name and nothing else."
    )
}

/// System + user messages asking for the JSON answer payload.
pub(crate) fn synthesis_messages(query: &str, context: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(
            "You are a customer support assistant. Return only valid JSON matching this exact \
             structure. Do not wrap the JSON in Markdown and do not add any commentary.",
        ),
        ChatMessage::user(format!(
            "Documentation:\n\
             {context}\n\
             \n\
             Question: {query}\n\
             \n\
             Answer the question using only the documentation above. \
             Respond with JSON in exactly this structure:\n\
             {ANSWER_EXAMPLE}"
        )),
    ]
}
