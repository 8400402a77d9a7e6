//! Remote assistant contract.
//!
//! The backend that stores sessions and runs inference is an external
//! collaborator. This trait is the seam the application layer talks to; the
//! HTTP implementation lives in `opsdesk-infrastructure` and tests substitute
//! an in-memory fake.

use super::context::ContextMessage;
use super::deep_think::DeepThinkMode;
use super::message::FunctionCall;
use super::model::{ChatSession, SessionId};
use crate::config::ModelProvider;
use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Body of a chat turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    /// The new user message; it is not repeated inside `conversation_history`.
    pub message: String,
    pub conversation_history: Vec<ContextMessage>,
    pub model_provider: ModelProvider,
    /// `None` while the conversation has not been saved yet.
    pub session_id: Option<SessionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep_think_mode: Option<DeepThinkMode>,
}

/// Result of a chat turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub response: String,
    pub session_id: SessionId,
    pub function_calls: Vec<FunctionCall>,
    /// Title the backend generated for the session, if it produced one.
    pub session_title: Option<String>,
}

#[async_trait]
pub trait AssistantApi: Send + Sync {
    /// Lists stored sessions, newest first as ordered by the backend.
    async fn list_sessions(&self) -> Result<Vec<ChatSession>>;

    /// Fetches one session with its full transcript.
    async fn get_session(&self, id: SessionId) -> Result<ChatSession>;

    /// Runs one chat turn.
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply>;
}
