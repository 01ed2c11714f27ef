//! Confirmation port for asking a human about a flagged tool call.
//!
//! # Architecture
//!
//! - **Port**: [`ConfirmationPort`] - defined here in application layer
//! - **Adapter**: `InteractiveConfirmation` - implemented in presentation layer
//!
//! # Built-in Implementations
//!
//! - [`AutoDenyConfirmation`] - always denies
//! - [`AutoApproveConfirmation`] - always approves
//!
//! Errors are never decisions. Callers map an error to
//! [`ConfirmationDecision::Denied`], so a broken terminal cannot approve a call.

use async_trait::async_trait;
use deckhand_domain::ConfirmationDecision;
use thiserror::Error;

/// What the human is asked to approve
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationRequest {
    pub tool_use_id: String,
    pub tool_name: String,
    pub display_action: String,
    pub input: serde_json::Value,
}

/// Failures while collecting an answer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationError {
    #[error("Operation cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(String),
}

/// Port for requesting a yes/no decision on a tool call.
#[async_trait]
pub trait ConfirmationPort: Send + Sync {
    async fn confirm(
        &self,
        request: &ConfirmationRequest,
    ) -> Result<ConfirmationDecision, ConfirmationError>;
}

/// Denies every request. Used when no terminal is attached.
#[derive(Debug, Clone, Default)]
pub struct AutoDenyConfirmation;

#[async_trait]
impl ConfirmationPort for AutoDenyConfirmation {
    async fn confirm(
        &self,
        _request: &ConfirmationRequest,
    ) -> Result<ConfirmationDecision, ConfirmationError> {
        Ok(ConfirmationDecision::Denied)
    }
}

/// Approves every request. Intended for tests and scripted runs.
#[derive(Debug, Clone, Default)]
pub struct AutoApproveConfirmation;

#[async_trait]
impl ConfirmationPort for AutoApproveConfirmation {
    async fn confirm(
        &self,
        _request: &ConfirmationRequest,
    ) -> Result<ConfirmationDecision, ConfirmationError> {
        Ok(ConfirmationDecision::Approved)
    }
}
