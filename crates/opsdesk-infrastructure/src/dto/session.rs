//! Wire representations of sessions and chat turns.
//!
//! The backend is loose about optional fields (`function_calls: null`,
//! missing `created_at`, paginated or bare list responses), so every DTO
//! tolerates absence and converts into the strict domain types.

use chrono::{DateTime, Utc};
use opsdesk_core::session::{
    ChatMessage, ChatReply, ChatSession, FunctionCall, MessageRole, SessionId,
};
use serde::Deserialize;

pub const UNTITLED_SESSION: &str = "Untitled session";

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCallDto {
    pub function: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

impl From<FunctionCallDto> for FunctionCall {
    fn from(dto: FunctionCallDto) -> Self {
        FunctionCall {
            name: dto.function,
            arguments: dto.args,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageDto {
    pub role: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub function_calls: Option<Vec<FunctionCallDto>>,
}

impl MessageDto {
    pub fn into_domain(self) -> ChatMessage {
        let role = match self.role.as_str() {
            "user" => MessageRole::User,
            _ => MessageRole::Assistant,
        };
        ChatMessage {
            role,
            content: self.content,
            timestamp: parse_timestamp(self.created_at.as_deref()),
            function_calls: convert_calls(self.function_calls),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionDto {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<MessageDto>>,
}

impl SessionDto {
    pub fn into_domain(self) -> ChatSession {
        let created_at = parse_timestamp(self.created_at.as_deref());
        let updated_at = self
            .updated_at
            .as_deref()
            .map(|raw| parse_timestamp(Some(raw)))
            .unwrap_or(created_at);
        ChatSession {
            id: SessionId(self.id),
            title: self
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| UNTITLED_SESSION.to_string()),
            created_at,
            updated_at,
            messages: self
                .messages
                .unwrap_or_default()
                .into_iter()
                .map(MessageDto::into_domain)
                .collect(),
        }
    }
}

/// `GET /sessions` answers either `{ "results": [...] }` or a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SessionListDto {
    Paginated { results: Vec<SessionDto> },
    Plain(Vec<SessionDto>),
}

impl SessionListDto {
    pub fn into_sessions(self) -> Vec<SessionDto> {
        match self {
            SessionListDto::Paginated { results } => results,
            SessionListDto::Plain(sessions) => sessions,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponseDto {
    pub response: String,
    pub session_id: u64,
    #[serde(default)]
    pub function_calls: Option<Vec<FunctionCallDto>>,
    #[serde(default)]
    pub session_title: Option<String>,
}

impl From<ChatResponseDto> for ChatReply {
    fn from(dto: ChatResponseDto) -> Self {
        ChatReply {
            response: dto.response,
            session_id: SessionId(dto.session_id),
            function_calls: convert_calls(dto.function_calls),
            session_title: dto.session_title.filter(|t| !t.trim().is_empty()),
        }
    }
}

/// Error bodies seen from the backend: `{"detail": ...}` or `{"error": ...}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBodyDto {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBodyDto {
    pub fn message(self) -> Option<String> {
        self.detail.or(self.error)
    }
}

fn convert_calls(calls: Option<Vec<FunctionCallDto>>) -> Vec<FunctionCall> {
    calls
        .unwrap_or_default()
        .into_iter()
        .map(FunctionCall::from)
        .collect()
}

/// Parses an RFC 3339 timestamp, falling back to now when absent or invalid.
fn parse_timestamp(raw: Option<&str>) -> DateTime<Utc> {
    match raw {
        Some(value) => match DateTime::parse_from_rfc3339(value) {
            Ok(parsed) => parsed.with_timezone(&Utc),
            Err(err) => {
                tracing::debug!("[SessionDto] Unparseable timestamp '{}': {}", value, err);
                Utc::now()
            }
        },
        None => Utc::now(),
    }
}
