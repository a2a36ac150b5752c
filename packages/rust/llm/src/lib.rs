//! Language model capability for SupportDesk.
//!
//! The pipeline only ever sees [`LanguageModel`]: ordered chat messages in,
//! free text out. No structural guarantee is assumed about the reply; all
//! structure is imposed downstream.

mod openrouter;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use supportdesk_shared::Result;

pub use openrouter::{OpenRouterClient, OpenRouterOptions};

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One entry in a chat-style completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A remote text-completion service.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete a chat conversation and return the raw reply text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Single-prompt form: the prompt is sent as one user message.
    async fn prompt(&self, prompt: &str) -> Result<String> {
        self.complete(&[ChatMessage::user(prompt)]).await
    }

    /// Model identifier for tracing.
    fn model_name(&self) -> &str;
}
