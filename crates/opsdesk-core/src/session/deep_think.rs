//! DeepThink protocol state machine.
//!
//! DeepThink layers a plan → approval → execute exchange over ordinary chat
//! turns. The toggle only changes how the *next* submission is interpreted;
//! the phase records where the conversation is inside the exchange.
//!
//! ```text
//!            submit (enabled)           plan ok
//!   Idle ───────────────────▶ Planning ─────────▶ AwaitingApproval
//!    ▲                           │ plan failed          │ approve / follow-up
//!    │◀──────────────────────────┘                      ▼
//!    │            execute ok                        Executing
//!    └──────────────────────────────────────────────────┘
//!                               execute failed ──▶ AwaitingApproval
//! ```

use crate::error::{OpsdeskError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text sent when the user approves a pending plan.
pub const APPROVAL_MESSAGE: &str = "I approve the plan. Please proceed to execute.";

/// Where the conversation currently is inside the DeepThink exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeepThinkPhase {
    #[default]
    Idle,
    Planning,
    AwaitingApproval,
    Executing,
}

impl fmt::Display for DeepThinkPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DeepThinkPhase::Idle => "idle",
            DeepThinkPhase::Planning => "planning",
            DeepThinkPhase::AwaitingApproval => "awaiting_approval",
            DeepThinkPhase::Executing => "executing",
        };
        f.write_str(label)
    }
}

/// Request mode sent to the backend with a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeepThinkMode {
    Plan,
    Execute,
}

/// Toggle plus phase for one conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeepThinkState {
    enabled: bool,
    phase: DeepThinkPhase,
}

impl DeepThinkState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DeepThinkPhase {
        self.phase
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The toggle is interactive only outside of an exchange.
    pub fn toggle_available(&self) -> bool {
        self.phase == DeepThinkPhase::Idle
    }

    /// Approval is only offered while a plan is pending.
    pub fn can_approve(&self) -> bool {
        self.phase == DeepThinkPhase::AwaitingApproval
    }

    /// Enables or disables DeepThink for subsequent submissions.
    ///
    /// # Errors
    ///
    /// Returns `OpsdeskError::Protocol` when an exchange is under way.
    pub fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        if !self.toggle_available() {
            return Err(OpsdeskError::protocol(format!(
                "DeepThink cannot be toggled while phase is {}",
                self.phase
            )));
        }
        self.enabled = enabled;
        Ok(())
    }

    /// Decides the request mode for a submission and moves the phase
    /// optimistically.
    ///
    /// Returns `Ok(None)` for an ordinary turn, which leaves the phase alone.
    ///
    /// # Errors
    ///
    /// An explicit mode that the current phase does not allow (executing with
    /// no plan pending, planning mid-exchange) is refused with
    /// `OpsdeskError::Protocol` and nothing changes.
    pub fn begin(&mut self, explicit: Option<DeepThinkMode>) -> Result<Option<DeepThinkMode>> {
        let mode = match (explicit, self.phase) {
            (Some(DeepThinkMode::Execute), DeepThinkPhase::AwaitingApproval) => {
                Some(DeepThinkMode::Execute)
            }
            (Some(DeepThinkMode::Execute), phase) => {
                return Err(OpsdeskError::protocol(format!(
                    "no plan is awaiting approval (phase is {phase})"
                )));
            }
            (Some(DeepThinkMode::Plan), DeepThinkPhase::Idle) => Some(DeepThinkMode::Plan),
            (Some(DeepThinkMode::Plan), phase) => {
                return Err(OpsdeskError::protocol(format!(
                    "a plan can only be requested from idle (phase is {phase})"
                )));
            }
            (None, DeepThinkPhase::Idle) if self.enabled => Some(DeepThinkMode::Plan),
            // An edited follow-up to a pending plan counts as approval.
            (None, DeepThinkPhase::AwaitingApproval) => Some(DeepThinkMode::Execute),
            (None, _) => None,
        };

        match mode {
            Some(DeepThinkMode::Plan) => self.phase = DeepThinkPhase::Planning,
            Some(DeepThinkMode::Execute) => self.phase = DeepThinkPhase::Executing,
            None => {}
        }
        Ok(mode)
    }

    /// Advances the phase after a successful response.
    pub fn complete(&mut self, mode: Option<DeepThinkMode>) {
        match mode {
            Some(DeepThinkMode::Plan) => self.phase = DeepThinkPhase::AwaitingApproval,
            Some(DeepThinkMode::Execute) => self.phase = DeepThinkPhase::Idle,
            None => {}
        }
    }

    /// Rolls the phase back to where it was before a failed request.
    pub fn fail(&mut self, mode: Option<DeepThinkMode>) {
        match mode {
            Some(DeepThinkMode::Plan) => self.phase = DeepThinkPhase::Idle,
            Some(DeepThinkMode::Execute) => self.phase = DeepThinkPhase::AwaitingApproval,
            None => {}
        }
    }

    /// Drops any exchange in progress; the toggle keeps its value.
    pub fn reset(&mut self) {
        self.phase = DeepThinkPhase::Idle;
    }
}
