//! In-memory fakes for the model and vector store.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use supportdesk_llm::{ChatMessage, LanguageModel};
use supportdesk_retrieval::{RetrievedDocument, VectorStore};
use supportdesk_shared::{Result, SupportDeskError};

/// One scripted turn.
enum Turn {
    Reply(String),
    Fail(String),
    Hang,
}

/// Replays canned replies in order and records every request.
pub(crate) struct ScriptedModel {
    replies: Mutex<VecDeque<Turn>>,
    pub(crate) calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedModel {
    pub(crate) fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| Turn::Reply((*r).to_string())).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a failing call after the existing replies.
    pub(crate) fn then_fail(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Turn::Fail(message.to_string()));
        self
    }

    /// Queue a call that never resolves after the existing replies.
    pub(crate) fn then_hang(self) -> Self {
        self.replies.lock().unwrap().push_back(Turn::Hang);
        self
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        self.calls.lock().unwrap().push(messages.to_vec());
        let turn = self.replies.lock().unwrap().pop_front();
        match turn {
            Some(Turn::Reply(reply)) => Ok(reply),
            Some(Turn::Fail(message)) => Err(SupportDeskError::Model(message)),
            Some(Turn::Hang) => std::future::pending().await,
            None => Err(SupportDeskError::Model("script exhausted".into())),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Never resolves.
pub(crate) struct HangingModel;

#[async_trait]
impl LanguageModel for HangingModel {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String> {
        std::future::pending().await
    }

    fn model_name(&self) -> &str {
        "hanging"
    }
}

/// Returns the same documents for every query.
pub(crate) struct StaticStore(pub(crate) Vec<&'static str>);

#[async_trait]
impl VectorStore for StaticStore {
    async fn search(&self, _query: &str, k: usize) -> Result<Vec<RetrievedDocument>> {
        Ok(self
            .0
            .iter()
            .take(k)
            .map(|t| RetrievedDocument {
                text: (*t).into(),
                score: None,
            })
            .collect())
    }
}

/// Always unreachable.
pub(crate) struct DownStore;

#[async_trait]
impl VectorStore for DownStore {
    async fn search(&self, _query: &str, _k: usize) -> Result<Vec<RetrievedDocument>> {
        Err(SupportDeskError::Retrieval("connection refused".into()))
    }
}
