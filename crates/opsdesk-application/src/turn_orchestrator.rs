//! Turn orchestrator.
//!
//! Drives one chat turn end to end: appends the user message, sends the
//! request with the prior history, applies the reply, and advances the
//! DeepThink phase. At most one turn is outstanding at a time; a submit
//! while another turn is in flight is ignored.
//!
//! The conversation lock is never held across the network call. A turn
//! whose conversation was replaced (new or loaded session) while it was
//! outstanding is dropped on completion.

use crate::session::{SessionStore, SharedConversation};
use crate::transcript_view::{RenderedMessage, render_message};
use opsdesk_core::config::{AssistantSettings, HistoryWindow, ModelProvider};
use opsdesk_core::error::{OpsdeskError, Result};
use opsdesk_core::session::{
    APPROVAL_MESSAGE, AssistantApi, ChatMessage, DeepThinkMode, DeepThinkPhase, DeepThinkState,
    TurnResolution,
};
use std::sync::Arc;

/// Per-turn request settings.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnSettings {
    pub model_provider: ModelProvider,
    pub history_window: HistoryWindow,
    pub trust_assistant_html: bool,
}

impl Default for TurnSettings {
    fn default() -> Self {
        Self::from(&AssistantSettings::default())
    }
}

impl From<&AssistantSettings> for TurnSettings {
    fn from(settings: &AssistantSettings) -> Self {
        Self {
            model_provider: settings.model_provider,
            history_window: settings.history_window,
            trust_assistant_html: settings.trust_assistant_html,
        }
    }
}

/// Result of a submit as seen by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Blank input, or another turn was already in flight. Nothing changed.
    Ignored,
    /// The assistant reply was appended.
    Completed { phase: DeepThinkPhase },
    /// An error message was appended to the transcript.
    Failed {
        error: OpsdeskError,
        phase: DeepThinkPhase,
    },
    /// The reply arrived after the conversation was replaced and was dropped.
    Superseded,
}

pub struct TurnOrchestrator {
    api: Arc<dyn AssistantApi>,
    session_store: Arc<SessionStore>,
    conversation: SharedConversation,
    settings: TurnSettings,
}

impl TurnOrchestrator {
    pub fn new(
        api: Arc<dyn AssistantApi>,
        session_store: Arc<SessionStore>,
        settings: TurnSettings,
    ) -> Self {
        let conversation = session_store.conversation();
        Self {
            api,
            session_store,
            conversation,
            settings,
        }
    }

    pub fn session_store(&self) -> &Arc<SessionStore> {
        &self.session_store
    }

    pub fn settings(&self) -> &TurnSettings {
        &self.settings
    }

    /// Submits user input as a new turn.
    ///
    /// `explicit` forces a DeepThink mode; otherwise the mode follows the
    /// toggle and current phase.
    ///
    /// # Errors
    ///
    /// Returns a protocol error when `explicit` does not fit the current
    /// phase (execute with no pending plan, plan while a plan is underway).
    /// Nothing is appended in that case.
    pub async fn submit(&self, text: &str, explicit: Option<DeepThinkMode>) -> Result<TurnOutcome> {
        let pending = {
            let mut conversation = self.conversation.write().await;
            match conversation.begin_turn(
                text,
                explicit,
                self.settings.model_provider,
                self.settings.history_window,
            )? {
                Some(pending) => pending,
                None => {
                    tracing::debug!(
                        "[TurnOrchestrator] Ignoring submit (blank input or turn in flight)"
                    );
                    return Ok(TurnOutcome::Ignored);
                }
            }
        };

        tracing::info!(
            "[TurnOrchestrator] Sending turn (session_id={:?}, mode={:?}, history={})",
            pending.request.session_id,
            pending.mode,
            pending.request.conversation_history.len()
        );

        let result = self.api.send_chat(&pending.request).await;
        let resolution = self.conversation.write().await.finish_turn(pending, result);

        Ok(match resolution {
            TurnResolution::Applied {
                session_id,
                session_title,
                phase,
            } => {
                tracing::debug!(
                    "[TurnOrchestrator] Turn applied to session {} (phase={})",
                    session_id,
                    phase
                );
                // The refresh task is detached; its result is fenced inside the store.
                let _refresh = self.session_store.after_turn(session_id, session_title).await;
                TurnOutcome::Completed { phase }
            }
            TurnResolution::Failed { error, phase } => {
                tracing::warn!("[TurnOrchestrator] Turn failed: {} (phase={})", error, phase);
                TurnOutcome::Failed { error, phase }
            }
            TurnResolution::Superseded => {
                tracing::debug!("[TurnOrchestrator] Dropping reply for superseded conversation");
                TurnOutcome::Superseded
            }
        })
    }

    /// Approves the pending plan and runs the execute turn.
    ///
    /// Returns [`TurnOutcome::Ignored`] when no plan is awaiting approval or
    /// a turn is in flight.
    pub async fn approve(&self) -> Result<TurnOutcome> {
        {
            let conversation = self.conversation.read().await;
            if !conversation.deep_think().can_approve() || conversation.is_in_flight() {
                tracing::debug!(
                    "[TurnOrchestrator] Approve ignored (phase={})",
                    conversation.phase()
                );
                return Ok(TurnOutcome::Ignored);
            }
        }
        self.submit(APPROVAL_MESSAGE, Some(DeepThinkMode::Execute)).await
    }

    /// Turns the DeepThink toggle on or off; only allowed while idle.
    pub async fn set_deep_think(&self, enabled: bool) -> Result<()> {
        self.conversation.write().await.set_deep_think(enabled)?;
        tracing::debug!("[TurnOrchestrator] DeepThink enabled={}", enabled);
        Ok(())
    }

    pub async fn deep_think(&self) -> DeepThinkState {
        self.conversation.read().await.deep_think().clone()
    }

    pub async fn phase(&self) -> DeepThinkPhase {
        self.conversation.read().await.phase()
    }

    pub async fn is_busy(&self) -> bool {
        self.conversation.read().await.is_in_flight()
    }

    pub async fn transcript(&self) -> Vec<ChatMessage> {
        self.conversation.read().await.transcript().to_vec()
    }

    /// The transcript in display form.
    pub async fn rendered_transcript(&self) -> Vec<RenderedMessage> {
        let trust = self.settings.trust_assistant_html;
        self.conversation
            .read()
            .await
            .transcript()
            .iter()
            .map(|message| render_message(message, trust))
            .collect()
    }
}
