//! Conversation message types.
//!
//! This module contains types for representing messages in a transcript,
//! including roles, content and the tool calls the assistant reported.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message typed by the user.
    User,
    /// Message produced by the assistant (including synthetic error messages).
    Assistant,
}

/// A backend tool invocation reported alongside an assistant response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: serde_json::Value,
}

/// A single message in a transcript.
///
/// Messages are immutable once created and only ever appended; insertion order
/// is both the display order and the order the model sees as context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message sender.
    pub role: MessageRole,
    /// The raw content of the message.
    pub content: String,
    /// When the message was created.
    pub timestamp: DateTime<Utc>,
    /// Tool calls the assistant made while producing this message.
    #[serde(default)]
    pub function_calls: Vec<FunctionCall>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            timestamp: Utc::now(),
            function_calls: Vec::new(),
        }
    }

    pub fn assistant(content: impl Into<String>, function_calls: Vec<FunctionCall>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            function_calls,
        }
    }
}
