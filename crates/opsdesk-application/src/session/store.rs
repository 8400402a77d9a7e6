//! Session store: cached session list plus the loaded conversation.
//!
//! The backend owns sessions; this store keeps a read-through copy of the
//! summaries and swaps the active transcript in `ConversationState`. Every
//! async operation is fenced by the conversation epoch so a response that
//! arrives after the user moved to another session is dropped.

use chrono::Utc;
use opsdesk_core::error::Result;
use opsdesk_core::session::{
    AssistantApi, ChatMessage, ConversationState, SessionId, SessionSummary,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Conversation state shared between the store and the orchestrator.
pub type SharedConversation = Arc<RwLock<ConversationState>>;

pub struct SessionStore {
    api: Arc<dyn AssistantApi>,
    sessions: Arc<RwLock<Vec<SessionSummary>>>,
    conversation: SharedConversation,
}

impl SessionStore {
    pub fn new(api: Arc<dyn AssistantApi>) -> Self {
        Self::with_conversation(api, Arc::new(RwLock::new(ConversationState::new())))
    }

    pub fn with_conversation(api: Arc<dyn AssistantApi>, conversation: SharedConversation) -> Self {
        Self {
            api,
            sessions: Arc::new(RwLock::new(Vec::new())),
            conversation,
        }
    }

    pub fn conversation(&self) -> SharedConversation {
        self.conversation.clone()
    }

    /// Returns the cached session list without a network call.
    pub async fn sessions(&self) -> Vec<SessionSummary> {
        self.sessions.read().await.clone()
    }

    pub async fn active_session_id(&self) -> Option<SessionId> {
        self.conversation.read().await.active_session_id()
    }

    /// Refreshes the session list.
    ///
    /// On failure the previous list is kept and returned; the error is only
    /// logged.
    pub async fn list_sessions(&self) -> Vec<SessionSummary> {
        match self.api.list_sessions().await {
            Ok(sessions) => {
                let summaries: Vec<SessionSummary> =
                    sessions.iter().map(|session| session.summary()).collect();
                tracing::debug!("[SessionStore] Listed {} sessions", summaries.len());
                *self.sessions.write().await = summaries.clone();
                summaries
            }
            Err(err) => {
                tracing::warn!("[SessionStore] Failed to list sessions, keeping cache: {}", err);
                self.sessions.read().await.clone()
            }
        }
    }

    /// Loads a stored session and makes it the active conversation.
    ///
    /// Returns `Ok(None)` when another load or a new session superseded this
    /// one while the request was outstanding; nothing is applied then.
    pub async fn load_session(&self, id: SessionId) -> Result<Option<Vec<ChatMessage>>> {
        let epoch = self.conversation.read().await.epoch();
        let session = self.api.get_session(id).await?;

        let mut conversation = self.conversation.write().await;
        if !conversation.is_current(epoch) {
            tracing::debug!("[SessionStore] Dropping superseded load of session {}", id);
            return Ok(None);
        }

        tracing::info!(
            "[SessionStore] Loaded session {} ({} messages)",
            id,
            session.messages.len()
        );
        conversation.replace_transcript(session.id, session.messages.clone());
        Ok(Some(session.messages))
    }

    /// Starts an unsaved conversation; the backend assigns an id on the first
    /// successful turn.
    pub async fn start_new_session(&self) {
        self.conversation.write().await.start_new();
        tracing::debug!("[SessionStore] Started new session");
    }

    /// Bookkeeping after a completed turn.
    ///
    /// The title the backend generated is patched into the cached list right
    /// away; a full re-list then runs in the background and is discarded if
    /// the active conversation changed before it returned.
    pub async fn after_turn(
        &self,
        session_id: SessionId,
        session_title: Option<String>,
    ) -> JoinHandle<()> {
        if let Some(title) = session_title {
            self.patch_title(session_id, title).await;
        }

        let epoch = self.conversation.read().await.epoch();
        let api = self.api.clone();
        let sessions = self.sessions.clone();
        let conversation = self.conversation.clone();

        tokio::spawn(async move {
            let listed = match api.list_sessions().await {
                Ok(listed) => listed,
                Err(err) => {
                    tracing::warn!("[SessionStore] Background refresh failed: {}", err);
                    return;
                }
            };

            let conversation = conversation.read().await;
            if !conversation.is_current(epoch)
                || conversation.active_session_id() != Some(session_id)
            {
                tracing::debug!(
                    "[SessionStore] Discarding stale refresh for session {}",
                    session_id
                );
                return;
            }
            *sessions.write().await = listed.iter().map(|s| s.summary()).collect();
        })
    }

    async fn patch_title(&self, session_id: SessionId, title: String) {
        let mut sessions = self.sessions.write().await;
        match sessions.iter_mut().find(|s| s.id == session_id) {
            Some(summary) => summary.title = title,
            None => {
                let now = Utc::now();
                sessions.insert(
                    0,
                    SessionSummary {
                        id: session_id,
                        title,
                        created_at: now,
                        updated_at: now,
                        message_count: 0,
                    },
                );
            }
        }
    }
}
