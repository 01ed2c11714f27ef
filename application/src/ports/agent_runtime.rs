//! Agent runtime port
//!
//! The session loop drives a conversation through this trait and receives
//! progress as [`AgentEvent`](super::agent_event::AgentEvent)s.

use crate::use_cases::confirmation_gate::GateError;
use crate::ports::llm_gateway::GatewayError;
use async_trait::async_trait;
use deckhand_domain::ConfirmationDecision;
use thiserror::Error;

/// Errors surfaced to the session loop for a single turn
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Session is closed")]
    Closed,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Confirmation(#[from] GateError),
}

/// A conversation with the model, driven one user turn at a time.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Run one user turn to completion, including every tool call the model
    /// requests along the way.
    async fn send(&self, input: &str) -> Result<(), RuntimeError>;

    /// Answer a pending `ToolConfirmation` event
    fn respond_confirmation(
        &self,
        tool_use_id: &str,
        decision: ConfirmationDecision,
    ) -> Result<(), RuntimeError>;

    /// Orderly shutdown. Pending confirmations are denied and later calls
    /// to [`send`](Self::send) fail with [`RuntimeError::Closed`].
    async fn close(&self) -> Result<(), RuntimeError>;
}
