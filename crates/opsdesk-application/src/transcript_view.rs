//! Display form of transcript messages.
//!
//! Assistant content is markdown and goes through the renderer; user content
//! is shown verbatim and only escaped.

use opsdesk_core::session::{ChatMessage, FunctionCall, MessageRole};

/// A transcript entry ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMessage {
    pub role: MessageRole,
    pub html: String,
    pub function_calls: Vec<FunctionCall>,
}

/// Renders one message.
///
/// With `trust_html` off, assistant output is passed through the sanitizer.
pub fn render_message(message: &ChatMessage, trust_html: bool) -> RenderedMessage {
    let html = match message.role {
        MessageRole::User => opsdesk_markdown::escape_text(&message.content),
        MessageRole::Assistant if trust_html => opsdesk_markdown::render(&message.content),
        MessageRole::Assistant => opsdesk_markdown::render_untrusted(&message.content),
    };

    RenderedMessage {
        role: message.role,
        html,
        function_calls: message.function_calls.clone(),
    }
}
