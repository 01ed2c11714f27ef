//! Confirmation gate
//!
//! Holds one `oneshot` sender per tool call waiting for a human answer,
//! keyed by `tool_use_id`. The runtime awaits the receiving half; the session
//! loop resolves it through [`ConfirmationGate::resolve`]. Only the waiting
//! call is suspended.
//!
//! The runtime issues one confirmation at a time, but the gate keeps a map
//! so several outstanding requests resolve independently.

use deckhand_domain::ConfirmationDecision;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("No pending confirmation for tool call {0}")]
    UnknownRequest(String),

    #[error("Tool call {0} is already awaiting confirmation")]
    DuplicateRequest(String),
}

/// Receiving half of a pending confirmation
#[derive(Debug)]
pub struct PendingConfirmation {
    tool_use_id: String,
    receiver: oneshot::Receiver<ConfirmationDecision>,
}

impl PendingConfirmation {
    /// Wait for the answer. A dropped sender counts as a denial.
    pub async fn wait(self) -> ConfirmationDecision {
        match self.receiver.await {
            Ok(decision) => decision,
            Err(_) => {
                debug!(tool_use_id = %self.tool_use_id, "Confirmation dropped, treating as denied");
                ConfirmationDecision::Denied
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct ConfirmationGate {
    pending: Mutex<HashMap<String, oneshot::Sender<ConfirmationDecision>>>,
}

impl ConfirmationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a call as awaiting a human answer
    pub fn request(&self, tool_use_id: &str) -> Result<PendingConfirmation, GateError> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if pending.contains_key(tool_use_id) {
            return Err(GateError::DuplicateRequest(tool_use_id.to_string()));
        }
        let (sender, receiver) = oneshot::channel();
        pending.insert(tool_use_id.to_string(), sender);
        debug!(tool_use_id, "Awaiting confirmation");

        Ok(PendingConfirmation {
            tool_use_id: tool_use_id.to_string(),
            receiver,
        })
    }

    /// Deliver a decision for a pending call
    pub fn resolve(&self, tool_use_id: &str, decision: ConfirmationDecision) -> Result<(), GateError> {
        let sender = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(tool_use_id)
            .ok_or_else(|| GateError::UnknownRequest(tool_use_id.to_string()))?;

        debug!(tool_use_id, ?decision, "Confirmation resolved");
        if sender.send(decision).is_err() {
            warn!(tool_use_id, "Confirmation answered after the call was abandoned");
        }
        Ok(())
    }

    /// Deny every outstanding request
    pub fn deny_all(&self) {
        let drained: Vec<_> = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
            .collect();
        for (_, sender) in drained {
            let _ = sender.send(ConfirmationDecision::Denied);
        }
    }
}
