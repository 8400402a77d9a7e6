//! Application layer for opsdesk.
//!
//! This crate coordinates the domain state machine in `opsdesk-core` with a
//! remote [`AssistantApi`](opsdesk_core::session::AssistantApi) to run chat
//! turns and keep the session list current.
//!
//! # Module Structure
//!
//! - [`session`] - Session list cache and conversation switching
//! - [`turn_orchestrator`] - Single-flight turn submission and DeepThink flow
//! - [`transcript_view`] - Transcript rendering for display

pub mod session;
pub mod transcript_view;
pub mod turn_orchestrator;

pub use session::{SessionStore, SharedConversation};
pub use transcript_view::{RenderedMessage, render_message};
pub use turn_orchestrator::{TurnOrchestrator, TurnOutcome, TurnSettings};
