use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::OpsdeskError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/ai";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Inference provider the backend should route a turn to.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    #[default]
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
}

impl ModelProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelProvider::Gemini => "gemini",
            ModelProvider::OpenAi => "openai",
            ModelProvider::Anthropic => "anthropic",
        }
    }
}

impl fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelProvider {
    type Err = OpsdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(ModelProvider::Gemini),
            "openai" => Ok(ModelProvider::OpenAi),
            "anthropic" | "claude" => Ok(ModelProvider::Anthropic),
            other => Err(OpsdeskError::config(format!(
                "unknown model provider '{other}' (expected gemini, openai or anthropic)"
            ))),
        }
    }
}

/// How much of the transcript is sent back as conversation history.
///
/// History is unbounded unless configured otherwise, so long conversations
/// grow request size and latency linearly.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(tag = "kind", content = "count", rename_all = "snake_case")]
pub enum HistoryWindow {
    #[default]
    Unbounded,
    /// Keep only the most recent `n` messages.
    LastMessages(usize),
}

/// Settings for the assistant surface.
///
/// Loaded from `~/.config/opsdesk/config.toml`; every field has a default so a
/// missing or partial file still yields a usable configuration.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AssistantSettings {
    pub api_base_url: String,
    pub model_provider: ModelProvider,
    pub request_timeout_secs: u64,
    pub history_window: HistoryWindow,
    /// When false, rendered assistant HTML goes through the allow-list sanitizer.
    pub trust_assistant_html: bool,
    pub log_level: String,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            model_provider: ModelProvider::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            history_window: HistoryWindow::default(),
            trust_assistant_html: true,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}
