//! Session domain module.
//!
//! This module contains the conversation domain: messages, session models,
//! the DeepThink protocol, history assembly and the explicit conversation
//! state the orchestrator drives.
//!
//! # Module Structure
//!
//! - `message`: Transcript message types (`MessageRole`, `ChatMessage`, `FunctionCall`)
//! - `model`: Session models (`ChatSession`, `SessionSummary`, `SessionId`)
//! - `deep_think`: DeepThink state machine (`DeepThinkState`, `DeepThinkPhase`)
//! - `context`: History context builder (`build_context`)
//! - `state`: Conversation state (`ConversationState`, `PendingTurn`)
//! - `api`: Remote assistant trait (`AssistantApi`)

mod api;
mod context;
mod deep_think;
mod message;
mod model;
mod state;

// Re-export public API
pub use api::{AssistantApi, ChatReply, ChatRequest};
pub use context::{ContextMessage, build_context, build_context_with};
pub use deep_think::{APPROVAL_MESSAGE, DeepThinkMode, DeepThinkPhase, DeepThinkState};
pub use message::{ChatMessage, FunctionCall, MessageRole};
pub use model::{ChatSession, SessionId, SessionSummary};
pub use state::{ConversationState, PendingTurn, TurnResolution};
