//! History context builder.
//!
//! Converts a transcript into the `{role, content}` list the backend expects
//! as `conversation_history`.

use super::message::{ChatMessage, MessageRole};
use crate::config::HistoryWindow;
use serde::{Deserialize, Serialize};

/// One history entry on the wire. Timestamps and function calls are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMessage {
    pub role: MessageRole,
    pub content: String,
}

impl From<&ChatMessage> for ContextMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

/// Builds the full, untruncated history for `messages`.
pub fn build_context(messages: &[ChatMessage]) -> Vec<ContextMessage> {
    messages.iter().map(ContextMessage::from).collect()
}

/// Builds history under an explicit window policy.
pub fn build_context_with(messages: &[ChatMessage], window: HistoryWindow) -> Vec<ContextMessage> {
    let start = match window {
        HistoryWindow::Unbounded => 0,
        HistoryWindow::LastMessages(n) => messages.len().saturating_sub(n),
    };
    build_context(&messages[start..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::message::FunctionCall;

    fn transcript() -> Vec<ChatMessage> {
        vec![
            ChatMessage::user("How many orders shipped today?"),
            ChatMessage::assistant(
                "42 orders shipped.",
                vec![FunctionCall {
                    name: "count_orders".to_string(),
                    arguments: serde_json::json!({"status": "shipped"}),
                }],
            ),
            ChatMessage::user("And yesterday?"),
            ChatMessage::assistant("37.", Vec::new()),
        ]
    }

    #[test]
    fn keeps_role_content_and_order() {
        let context = build_context(&transcript());

        assert_eq!(context.len(), 4);
        assert_eq!(context[0].role, MessageRole::User);
        assert_eq!(context[1].content, "42 orders shipped.");
        assert_eq!(context[3].content, "37.");
    }

    #[test]
    fn wire_shape_has_only_role_and_content() {
        let context = build_context(&transcript());
        let value = serde_json::to_value(&context[1]).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"role": "assistant", "content": "42 orders shipped."})
        );
    }

    #[test]
    fn last_messages_window_keeps_newest() {
        let context = build_context_with(&transcript(), HistoryWindow::LastMessages(2));
        assert_eq!(context.len(), 2);
        assert_eq!(context[0].content, "And yesterday?");
        assert_eq!(context[1].content, "37.");
    }

    #[test]
    fn window_larger_than_history_keeps_everything() {
        let context = build_context_with(&transcript(), HistoryWindow::LastMessages(50));
        assert_eq!(context.len(), 4);
        assert!(build_context_with(&[], HistoryWindow::LastMessages(3)).is_empty());
    }
}
