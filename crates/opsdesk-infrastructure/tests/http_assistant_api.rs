use opsdesk_core::OpsdeskError;
use opsdesk_core::config::ModelProvider;
use opsdesk_core::session::{
    AssistantApi, ChatMessage, ChatRequest, DeepThinkMode, MessageRole, SessionId, build_context,
};
use opsdesk_infrastructure::HttpAssistantApi;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(mode: Option<DeepThinkMode>, session_id: Option<SessionId>) -> ChatRequest {
    ChatRequest {
        message: "Plan a production schedule".to_string(),
        conversation_history: build_context(&[
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello", Vec::new()),
        ]),
        model_provider: ModelProvider::Anthropic,
        session_id,
        deep_think_mode: mode,
    }
}

#[tokio::test]
async fn lists_paginated_sessions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"id": 3, "title": "Stock check", "created_at": "2025-01-02T09:00:00Z"},
                {"id": 2, "title": "Invoices", "created_at": "2025-01-01T09:00:00Z"}
            ]
        })))
        .mount(&server)
        .await;

    let api = HttpAssistantApi::new(server.uri());
    let sessions = api.list_sessions().await.unwrap();

    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].id, SessionId(3));
    assert_eq!(sessions[0].title, "Stock check");
    assert!(sessions[0].messages.is_empty());
}

#[tokio::test]
async fn lists_bare_array_sessions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 8, "title": "Q3"}])))
        .mount(&server)
        .await;

    let sessions = HttpAssistantApi::new(server.uri())
        .list_sessions()
        .await
        .unwrap();
    assert_eq!(sessions[0].id, SessionId(8));
}

#[tokio::test]
async fn loads_session_with_null_function_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sessions/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "title": "Line 2 downtime",
            "messages": [
                {"role": "user", "content": "Why is line 2 down?", "created_at": "2025-02-01T08:00:00Z"},
                {"role": "assistant", "content": "Maintenance.", "function_calls": null},
                {"role": "assistant", "content": "Logged.",
                 "function_calls": [{"function": "log_event", "args": {"line": 2}}]}
            ]
        })))
        .mount(&server)
        .await;

    let session = HttpAssistantApi::new(server.uri())
        .get_session(SessionId(5))
        .await
        .unwrap();

    assert_eq!(session.messages.len(), 3);
    assert_eq!(session.messages[0].role, MessageRole::User);
    assert!(session.messages[1].function_calls.is_empty());
    assert_eq!(session.messages[2].function_calls[0].name, "log_event");
}

#[tokio::test]
async fn chat_sends_deep_think_mode_and_parses_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_partial_json(json!({
            "message": "Plan a production schedule",
            "model_provider": "anthropic",
            "session_id": 4,
            "deep_think_mode": "plan",
            "conversation_history": [
                {"role": "user", "content": "hi"},
                {"role": "assistant", "content": "hello"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "## Plan\n1. Check stock",
            "session_id": 4,
            "session_title": "Production schedule"
        })))
        .mount(&server)
        .await;

    let reply = HttpAssistantApi::new(server.uri())
        .send_chat(&request(Some(DeepThinkMode::Plan), Some(SessionId(4))))
        .await
        .unwrap();

    assert_eq!(reply.response, "## Plan\n1. Check stock");
    assert_eq!(reply.session_id, SessionId(4));
    assert!(reply.function_calls.is_empty());
    assert_eq!(reply.session_title.as_deref(), Some("Production schedule"));
}

#[tokio::test]
async fn chat_omits_unset_mode_and_sends_null_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"response": "ok", "session_id": 1})),
        )
        .mount(&server)
        .await;

    HttpAssistantApi::new(server.uri())
        .send_chat(&request(None, None))
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert!(body.get("deep_think_mode").is_none());
    assert!(body["session_id"].is_null());
}

#[tokio::test]
async fn error_status_maps_to_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"detail": "model overloaded"})),
        )
        .mount(&server)
        .await;

    let err = HttpAssistantApi::new(server.uri())
        .send_chat(&request(None, None))
        .await
        .unwrap_err();

    assert_eq!(err, OpsdeskError::remote(503, "model overloaded"));
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let err = HttpAssistantApi::new("http://127.0.0.1:1")
        .list_sessions()
        .await
        .unwrap_err();
    assert!(matches!(err, OpsdeskError::Transport(_)));
}
