//! HttpAssistantApi - REST implementation of the remote assistant contract.
//!
//! Endpoints (relative to the configured base URL):
//! - `GET  /sessions`      list sessions (paginated or bare array)
//! - `GET  /sessions/{id}` one session with messages
//! - `POST /chat`          run one turn

use crate::dto::{ChatResponseDto, ErrorBodyDto, SessionDto, SessionListDto};
use async_trait::async_trait;
use opsdesk_core::config::AssistantSettings;
use opsdesk_core::error::{OpsdeskError, Result};
use opsdesk_core::session::{AssistantApi, ChatReply, ChatRequest, ChatSession, SessionId};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Client for the assistant backend.
#[derive(Clone)]
pub struct HttpAssistantApi {
    client: Client,
    base_url: String,
}

impl HttpAssistantApi {
    /// Creates a client with default reqwest settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: normalize_base(base_url.into()),
        }
    }

    /// Creates a client honoring the configured request timeout.
    pub fn from_settings(settings: &AssistantSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|err| OpsdeskError::config(format!("Failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            base_url: normalize_base(settings.api_base_url.clone()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        tracing::debug!("[HttpAssistantApi] GET {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| transport_error("GET", &url, err))?;
        read_json(response).await
    }
}

#[async_trait]
impl AssistantApi for HttpAssistantApi {
    async fn list_sessions(&self) -> Result<Vec<ChatSession>> {
        let list: SessionListDto = self.get_json("sessions").await?;
        Ok(list
            .into_sessions()
            .into_iter()
            .map(SessionDto::into_domain)
            .collect())
    }

    async fn get_session(&self, id: SessionId) -> Result<ChatSession> {
        let session: SessionDto = self.get_json(&format!("sessions/{id}")).await?;
        Ok(session.into_domain())
    }

    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        let url = self.url("chat");
        tracing::debug!(
            "[HttpAssistantApi] POST {} (session_id={:?}, mode={:?}, history={})",
            url,
            request.session_id,
            request.deep_think_mode,
            request.conversation_history.len()
        );
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|err| transport_error("POST", &url, err))?;

        let parsed: ChatResponseDto = read_json(response).await?;
        Ok(parsed.into())
    }
}

fn normalize_base(base: String) -> String {
    base.trim().trim_end_matches('/').to_string()
}

fn transport_error(method: &str, url: &str, err: reqwest::Error) -> OpsdeskError {
    tracing::warn!("[HttpAssistantApi] {} {} failed: {}", method, url, err);
    OpsdeskError::transport(format!("{method} {url} failed: {err}"))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());
        let message = serde_json::from_str::<ErrorBodyDto>(&body)
            .ok()
            .and_then(ErrorBodyDto::message)
            .unwrap_or(body);
        return Err(OpsdeskError::remote(status.as_u16(), message));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|err| OpsdeskError::transport(format!("Failed to read response body: {err}")))?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let api = HttpAssistantApi::new("http://localhost:8000/api/ai/");
        assert_eq!(api.url("sessions"), "http://localhost:8000/api/ai/sessions");
        assert_eq!(api.url("/chat"), "http://localhost:8000/api/ai/chat");
    }
}
