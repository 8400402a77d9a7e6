#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use opsdesk_core::error::{OpsdeskError, Result};
use opsdesk_core::session::{
    AssistantApi, ChatMessage, ChatReply, ChatRequest, ChatSession, SessionId,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// In-memory assistant backend with scripted replies.
#[derive(Default)]
pub struct FakeAssistantApi {
    sessions: Mutex<Vec<ChatSession>>,
    list_error: Mutex<Option<OpsdeskError>>,
    replies: Mutex<VecDeque<Result<ChatReply>>>,
    requests: Mutex<Vec<ChatRequest>>,
    chat_gate: Mutex<Option<Arc<Notify>>>,
    list_gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeAssistantApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_session(&self, id: u64, title: &str, messages: Vec<ChatMessage>) {
        let now = Utc::now();
        self.sessions.lock().unwrap().push(ChatSession {
            id: SessionId(id),
            title: title.to_string(),
            created_at: now,
            updated_at: now,
            messages,
        });
    }

    pub fn fail_listing(&self, error: Option<OpsdeskError>) {
        *self.list_error.lock().unwrap() = error;
    }

    pub fn push_reply(&self, response: &str, session_id: u64, title: Option<&str>) {
        self.replies.lock().unwrap().push_back(Ok(ChatReply {
            response: response.to_string(),
            session_id: SessionId(session_id),
            function_calls: Vec::new(),
            session_title: title.map(str::to_string),
        }));
    }

    pub fn push_error(&self, error: OpsdeskError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    /// Holds `send_chat` until the returned handle is notified.
    pub fn gate_chat(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.chat_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Holds `list_sessions` until the returned handle is notified.
    pub fn gate_listing(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.list_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssistantApi for FakeAssistantApi {
    async fn list_sessions(&self) -> Result<Vec<ChatSession>> {
        let gate = self.list_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if let Some(error) = self.list_error.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(self.sessions.lock().unwrap().clone())
    }

    async fn get_session(&self, id: SessionId) -> Result<ChatSession> {
        self.sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| OpsdeskError::not_found("Session", id.to_string()))
    }

    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        self.requests.lock().unwrap().push(request.clone());
        let gate = self.chat_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(ChatReply {
                response: "ok".to_string(),
                session_id: request.session_id.unwrap_or(SessionId(1)),
                function_calls: Vec::new(),
                session_title: None,
            })
        })
    }
}
