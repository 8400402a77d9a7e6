//! Explicit conversation state.
//!
//! Everything the UI would otherwise keep in ambient globals (transcript,
//! active session, DeepThink phase, in-flight flag) lives in one value. A
//! turn is split into `begin_turn` and `finish_turn` around the single
//! suspension point so both halves are plain synchronous transitions.

use super::api::{ChatReply, ChatRequest};
use super::context::build_context_with;
use super::deep_think::{DeepThinkMode, DeepThinkPhase, DeepThinkState};
use super::message::ChatMessage;
use super::model::SessionId;
use crate::config::{HistoryWindow, ModelProvider};
use crate::error::{OpsdeskError, Result};

/// A turn that has been started and is waiting for the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTurn {
    pub request: ChatRequest,
    pub mode: Option<DeepThinkMode>,
    /// Epoch the turn was started in.
    pub epoch: u64,
}

/// What `finish_turn` did with a backend result.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnResolution {
    /// The assistant reply was appended.
    Applied {
        session_id: SessionId,
        session_title: Option<String>,
        phase: DeepThinkPhase,
    },
    /// An error message was appended and the phase rolled back.
    Failed {
        error: OpsdeskError,
        phase: DeepThinkPhase,
    },
    /// The active conversation changed while the request was outstanding.
    Superseded,
}

#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    transcript: Vec<ChatMessage>,
    active_session_id: Option<SessionId>,
    deep_think: DeepThinkState,
    in_flight: bool,
    epoch: u64,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn active_session_id(&self) -> Option<SessionId> {
        self.active_session_id
    }

    pub fn deep_think(&self) -> &DeepThinkState {
        &self.deep_think
    }

    pub fn phase(&self) -> DeepThinkPhase {
        self.deep_think.phase()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// True when nothing replaced the conversation since `epoch` was taken.
    pub fn is_current(&self, epoch: u64) -> bool {
        self.epoch == epoch
    }

    pub fn set_deep_think(&mut self, enabled: bool) -> Result<()> {
        self.deep_think.set_enabled(enabled)
    }

    /// Starts a turn.
    ///
    /// Returns `Ok(None)` when the text is blank or another turn is in flight;
    /// the state is left untouched in both cases. Otherwise the user message is
    /// appended, the DeepThink phase moves optimistically and the request is
    /// built from the history *before* the new message.
    ///
    /// # Errors
    ///
    /// Protocol misuse from [`DeepThinkState::begin`]; nothing is appended.
    pub fn begin_turn(
        &mut self,
        text: &str,
        explicit: Option<DeepThinkMode>,
        model_provider: ModelProvider,
        window: HistoryWindow,
    ) -> Result<Option<PendingTurn>> {
        if text.trim().is_empty() || self.in_flight {
            return Ok(None);
        }

        let mode = self.deep_think.begin(explicit)?;
        let conversation_history = build_context_with(&self.transcript, window);

        self.transcript.push(ChatMessage::user(text));
        self.in_flight = true;

        Ok(Some(PendingTurn {
            request: ChatRequest {
                message: text.to_string(),
                conversation_history,
                model_provider,
                session_id: self.active_session_id,
                deep_think_mode: mode,
            },
            mode,
            epoch: self.epoch,
        }))
    }

    /// Applies the backend result of a pending turn.
    pub fn finish_turn(&mut self, pending: PendingTurn, result: Result<ChatReply>) -> TurnResolution {
        self.in_flight = false;

        if !self.is_current(pending.epoch) {
            return TurnResolution::Superseded;
        }

        match result {
            Ok(reply) => {
                self.transcript
                    .push(ChatMessage::assistant(reply.response, reply.function_calls));
                let session_id = *self.active_session_id.get_or_insert(reply.session_id);
                self.deep_think.complete(pending.mode);
                TurnResolution::Applied {
                    session_id,
                    session_title: reply.session_title,
                    phase: self.deep_think.phase(),
                }
            }
            Err(error) => {
                self.transcript
                    .push(ChatMessage::assistant(error_message(&error), Vec::new()));
                self.deep_think.fail(pending.mode);
                TurnResolution::Failed {
                    error,
                    phase: self.deep_think.phase(),
                }
            }
        }
    }

    /// Clears the conversation for a fresh, unsaved session.
    pub fn start_new(&mut self) {
        self.transcript.clear();
        self.active_session_id = None;
        self.deep_think.reset();
        self.epoch += 1;
    }

    /// Replaces the conversation with a stored session.
    pub fn replace_transcript(&mut self, session_id: SessionId, messages: Vec<ChatMessage>) {
        self.transcript = messages;
        self.active_session_id = Some(session_id);
        self.deep_think.reset();
        self.epoch += 1;
    }
}

fn error_message(error: &OpsdeskError) -> String {
    format!("Sorry, I couldn't complete that request. {error}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::message::MessageRole;

    fn begin(state: &mut ConversationState, text: &str) -> Option<PendingTurn> {
        state
            .begin_turn(text, None, ModelProvider::Gemini, HistoryWindow::Unbounded)
            .unwrap()
    }

    fn reply(text: &str, id: u64) -> Result<ChatReply> {
        Ok(ChatReply {
            response: text.to_string(),
            session_id: SessionId(id),
            function_calls: Vec::new(),
            session_title: None,
        })
    }

    #[test]
    fn blank_text_is_ignored() {
        let mut state = ConversationState::new();
        assert!(begin(&mut state, "   \n").is_none());
        assert!(state.transcript().is_empty());
        assert!(!state.is_in_flight());
    }

    #[test]
    fn history_excludes_the_new_message() {
        let mut state = ConversationState::new();
        let first = begin(&mut state, "hello").unwrap();
        assert!(first.request.conversation_history.is_empty());
        state.finish_turn(first, reply("hi", 1));

        let second = begin(&mut state, "status?").unwrap();
        assert_eq!(second.request.message, "status?");
        assert_eq!(second.request.conversation_history.len(), 2);
        assert_eq!(second.request.session_id, Some(SessionId(1)));
        assert_eq!(state.transcript().len(), 3);
    }

    #[test]
    fn second_begin_while_in_flight_is_a_no_op() {
        let mut state = ConversationState::new();
        let _pending = begin(&mut state, "one").unwrap();
        assert!(begin(&mut state, "two").is_none());
        assert_eq!(state.transcript().len(), 1);
    }

    #[test]
    fn server_session_id_is_adopted_once() {
        let mut state = ConversationState::new();
        let pending = begin(&mut state, "one").unwrap();
        state.finish_turn(pending, reply("ok", 9));
        assert_eq!(state.active_session_id(), Some(SessionId(9)));

        let pending = begin(&mut state, "two").unwrap();
        state.finish_turn(pending, reply("ok", 10));
        assert_eq!(state.active_session_id(), Some(SessionId(9)));
    }

    #[test]
    fn failure_appends_assistant_error_and_rolls_back() {
        let mut state = ConversationState::new();
        state.set_deep_think(true).unwrap();
        let pending = begin(&mut state, "Plan a production schedule").unwrap();
        assert_eq!(state.phase(), DeepThinkPhase::Planning);

        let resolution =
            state.finish_turn(pending, Err(OpsdeskError::transport("connection refused")));

        assert!(matches!(
            resolution,
            TurnResolution::Failed { phase: DeepThinkPhase::Idle, .. }
        ));
        let last = state.transcript().last().unwrap();
        assert_eq!(last.role, MessageRole::Assistant);
        assert!(last.content.contains("connection refused"));
        assert!(!state.is_in_flight());
    }

    #[test]
    fn result_for_replaced_conversation_is_dropped() {
        let mut state = ConversationState::new();
        let pending = begin(&mut state, "one").unwrap();
        state.start_new();

        assert_eq!(state.finish_turn(pending, reply("late", 3)), TurnResolution::Superseded);
        assert!(state.transcript().is_empty());
        assert_eq!(state.active_session_id(), None);
        assert!(!state.is_in_flight());
    }

    #[test]
    fn protocol_misuse_appends_nothing() {
        let mut state = ConversationState::new();
        let err = state
            .begin_turn(
                "go",
                Some(DeepThinkMode::Execute),
                ModelProvider::Gemini,
                HistoryWindow::Unbounded,
            )
            .unwrap_err();
        assert!(err.is_protocol());
        assert!(state.transcript().is_empty());
        assert!(!state.is_in_flight());
    }
}
