//! Update check state
//!
//! Types describing where an update check currently is.

use crate::error::UpdatesError;

/// Phase of the current update check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckState {
    /// No check has run yet
    #[default]
    Idle,
    /// Waiting for the service to hand out a ticket
    AwaitingTicket,
    /// Polling the ticket; `attempt` counts the "not ready" retries so far
    Polling { attempt: u32 },
    /// The last check produced a result (possibly empty)
    Succeeded,
    /// The last check failed
    Failed(UpdatesError),
}

impl CheckState {
    /// Get the display label for this state
    pub fn label(&self) -> &'static str {
        match self {
            CheckState::Idle => "Idle",
            CheckState::AwaitingTicket => "Requesting ticket",
            CheckState::Polling { .. } => "Checking for updates",
            CheckState::Succeeded => "Done",
            CheckState::Failed(_) => "Failed",
        }
    }

    /// Is a check running right now?
    pub fn is_loading(&self) -> bool {
        matches!(self, CheckState::AwaitingTicket | CheckState::Polling { .. })
    }

    /// Has the check reached its end?
    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckState::Succeeded | CheckState::Failed(_))
    }
}
