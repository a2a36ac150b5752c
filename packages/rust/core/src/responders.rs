//! Fixed responses for the categories that never call the model.
//!
//! All functions are pure: the same contacts always produce the same payload.

use supportdesk_shared::{
    BillingContactInfo, BillingNotice, ErrorNotice, EscalationNotice, OutOfScopeNotice,
    StructuredResponse, SupportContactInfo, SupportContacts,
};

const NO_DOCS_TICKET_PRIORITY: &str = "medium";

const AVAILABLE_CATEGORIES: [&str; 4] = [
    "Technical support",
    "Account and login",
    "Product features",
    "Billing and payments",
];

/// Technical question with no matching documentation.
pub fn technical_no_docs(contacts: &SupportContacts) -> StructuredResponse {
    StructuredResponse::TechnicalNoDocs(EscalationNotice {
        message: "I couldn't find documentation that answers your question. \
                  Our technical support team can help you directly."
            .into(),
        contact_info: SupportContactInfo {
            email: contacts.email.clone(),
            phone: contacts.phone.clone(),
            support_hours: contacts.support_hours.clone(),
        },
        ticket_priority: NO_DOCS_TICKET_PRIORITY.into(),
    })
}

/// Billing question: point to the billing team.
pub fn billing(contacts: &SupportContacts) -> StructuredResponse {
    StructuredResponse::Billing(BillingNotice {
        message: "Billing questions are handled by our billing team through a secure channel."
            .into(),
        contact_info: BillingContactInfo {
            email: contacts.billing_email.clone(),
            phone: contacts.billing_phone.clone(),
            hours: contacts.billing_hours.clone(),
        },
        security_note: "For your security, never share card numbers, passwords, \
                        or other payment details in this chat."
            .into(),
    })
}

/// Query outside support scope.
pub fn irrelevant() -> StructuredResponse {
    StructuredResponse::Irrelevant(OutOfScopeNotice {
        message: "I can only help with questions about our product and its support.".into(),
        suggestion: "Try asking about a technical issue, your account, or billing.".into(),
        available_categories: AVAILABLE_CATEGORIES.iter().map(|c| (*c).to_string()).collect(),
    })
}

/// Uniform failure payload; `error` carries the failure description.
pub fn error(error: &dyn std::fmt::Display) -> StructuredResponse {
    StructuredResponse::Error(ErrorNotice {
        message: "Sorry, we couldn't process your request. Please try again later.".into(),
        error: error.to_string(),
    })
}
