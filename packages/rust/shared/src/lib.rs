//! Shared types, error model, and configuration for SupportDesk.
//!
//! This crate is the foundation depended on by all other SupportDesk crates.
//! It provides:
//! - [`SupportDeskError`], the unified error type
//! - Domain types ([`IntentCategory`], [`StructuredResponse`] and its payloads, [`QueryId`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, LlmConfig, PipelineConfig, SupportContacts, VectorStoreConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from, validate_api_key,
    validate_endpoints, validate_timeouts,
};
pub use error::{Result, SupportDeskError};
pub use types::{
    ANSWER_PRIORITY, ANSWER_RESPONSE_TIME, BillingContactInfo, BillingNotice, ErrorNotice,
    EscalationNotice, IntentCategory, OutOfScopeNotice, QueryId, StructuredResponse,
    SupportContactInfo, TechnicalAnswer,
};
