//! Core domain types: intent categories and the structured response payloads.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed `priority` stamped on every documentation-backed answer.
pub const ANSWER_PRIORITY: &str = "normal";

/// Fixed `responseTime` stamped on every documentation-backed answer.
pub const ANSWER_RESPONSE_TIME: &str = "immediate";

// ---------------------------------------------------------------------------
// QueryId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying one pipeline invocation in logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryId(pub Uuid);

impl QueryId {
    /// Generate a new time-sortable query identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for QueryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for QueryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// IntentCategory
// ---------------------------------------------------------------------------

/// Closed set of intents; exactly one is assigned per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntentCategory {
    /// Retrieved documentation is relevant; answer from it.
    TechnicalWithDocs,
    /// Technical question with no usable documentation.
    TechnicalNoDocs,
    /// Payments, invoices, refunds, subscriptions.
    Billing,
    /// Anything outside support scope.
    Irrelevant,
}

impl IntentCategory {
    /// Wire token, identical to the `type` tag of the matching response.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TechnicalWithDocs => "TECHNICAL_WITH_DOCS",
            Self::TechnicalNoDocs => "TECHNICAL_NO_DOCS",
            Self::Billing => "BILLING",
            Self::Irrelevant => "IRRELEVANT",
        }
    }

    /// Exact-match a token against the category names.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "TECHNICAL_WITH_DOCS" => Some(Self::TechnicalWithDocs),
            "TECHNICAL_NO_DOCS" => Some(Self::TechnicalNoDocs),
            "BILLING" => Some(Self::Billing),
            "IRRELEVANT" => Some(Self::Irrelevant),
            _ => None,
        }
    }
}

impl std::fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

/// Answer synthesized from retrieved documentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalAnswer {
    pub priority: String,
    pub response_time: String,
    pub answer: String,
    /// Always within `[0, 1]`.
    pub confidence: f64,
    pub sources_used: u32,
    #[serde(default)]
    pub relevant_docs: Vec<String>,
}

impl TechnicalAnswer {
    /// Build an answer with the fixed envelope values and a clamped confidence.
    pub fn new(
        answer: impl Into<String>,
        confidence: f64,
        sources_used: u32,
        relevant_docs: Vec<String>,
    ) -> Self {
        Self {
            priority: ANSWER_PRIORITY.into(),
            response_time: ANSWER_RESPONSE_TIME.into(),
            answer: answer.into(),
            confidence: confidence.clamp(0.0, 1.0),
            sources_used,
            relevant_docs,
        }
    }
}

/// Contact block for technical escalations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportContactInfo {
    pub email: String,
    pub phone: String,
    pub support_hours: String,
}

/// Technical question without documentation: route to a human.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationNotice {
    pub message: String,
    pub contact_info: SupportContactInfo,
    pub ticket_priority: String,
}

/// Contact block for the billing team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingContactInfo {
    pub email: String,
    pub phone: String,
    pub hours: String,
}

/// Billing question: never answered in-band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingNotice {
    pub message: String,
    pub contact_info: BillingContactInfo,
    pub security_note: String,
}

/// Out-of-scope query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutOfScopeNotice {
    pub message: String,
    pub suggestion: String,
    #[serde(default)]
    pub available_categories: Vec<String>,
}

/// Uniform failure payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorNotice {
    pub message: String,
    pub error: String,
}

/// The payload returned for every query, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StructuredResponse {
    #[serde(rename = "TECHNICAL_WITH_DOCS")]
    TechnicalWithDocs(TechnicalAnswer),
    #[serde(rename = "TECHNICAL_NO_DOCS")]
    TechnicalNoDocs(EscalationNotice),
    #[serde(rename = "BILLING")]
    Billing(BillingNotice),
    #[serde(rename = "IRRELEVANT")]
    Irrelevant(OutOfScopeNotice),
    #[serde(rename = "ERROR")]
    Error(ErrorNotice),
}

impl StructuredResponse {
    /// The `type` tag this payload serializes with.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Error(_) => "ERROR",
            other => other.category().map(|c| c.as_str()).unwrap_or("ERROR"),
        }
    }

    /// The intent that produced this payload, or `None` for errors.
    pub fn category(&self) -> Option<IntentCategory> {
        match self {
            Self::TechnicalWithDocs(_) => Some(IntentCategory::TechnicalWithDocs),
            Self::TechnicalNoDocs(_) => Some(IntentCategory::TechnicalNoDocs),
            Self::Billing(_) => Some(IntentCategory::Billing),
            Self::Irrelevant(_) => Some(IntentCategory::Irrelevant),
            Self::Error(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(value: &serde_json::Value) -> Vec<String> {
        let mut keys: Vec<String> = value
            .as_object()
            .expect("object")
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    #[test]
    fn category_tokens_match_response_tags() {
        for category in [
            IntentCategory::TechnicalWithDocs,
            IntentCategory::TechnicalNoDocs,
            IntentCategory::Billing,
            IntentCategory::Irrelevant,
        ] {
            assert_eq!(IntentCategory::from_token(category.as_str()), Some(category));
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
        assert_eq!(IntentCategory::from_token("billing"), None);
        assert_eq!(IntentCategory::from_token("MAYBE"), None);
    }

    #[test]
    fn technical_answer_shape() {
        let response = StructuredResponse::TechnicalWithDocs(TechnicalAnswer::new(
            "Use the reset link.",
            0.8,
            2,
            vec!["reset-password.md".into()],
        ));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["type"], "TECHNICAL_WITH_DOCS");
        assert_eq!(value["priority"], ANSWER_PRIORITY);
        assert_eq!(value["responseTime"], ANSWER_RESPONSE_TIME);
        assert_eq!(value["sourcesUsed"], 2);
        assert_eq!(
            keys(&value),
            [
                "answer",
                "confidence",
                "priority",
                "relevantDocs",
                "responseTime",
                "sourcesUsed",
                "type"
            ]
        );
    }

    #[test]
    fn confidence_is_clamped() {
        assert_eq!(TechnicalAnswer::new("a", 1.7, 1, vec![]).confidence, 1.0);
        assert_eq!(TechnicalAnswer::new("a", -0.2, 1, vec![]).confidence, 0.0);
    }

    #[test]
    fn billing_shape_uses_hours_key() {
        let response = StructuredResponse::Billing(BillingNotice {
            message: "m".into(),
            contact_info: BillingContactInfo {
                email: "e".into(),
                phone: "p".into(),
                hours: "h".into(),
            },
            security_note: "s".into(),
        });
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(keys(&value), ["contactInfo", "message", "securityNote", "type"]);
        assert_eq!(keys(&value["contactInfo"]), ["email", "hours", "phone"]);
    }

    #[test]
    fn error_shape_roundtrips() {
        let response = StructuredResponse::Error(ErrorNotice {
            message: "failed".into(),
            error: "model error: 500".into(),
        });
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.starts_with(r#"{"type":"ERROR""#));
        let back: StructuredResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back, response);
        assert_eq!(back.kind(), "ERROR");
        assert!(back.category().is_none());
        assert!(back.is_error());
    }

    #[test]
    fn answers_are_not_errors() {
        let response =
            StructuredResponse::TechnicalWithDocs(TechnicalAnswer::new("a", 0.9, 1, vec![]));
        assert!(!response.is_error());
    }
}
