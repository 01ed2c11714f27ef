//! Confirmation decisions and the per-call gate state

use serde::{Deserialize, Serialize};

/// A human's answer to a confirmation prompt.
///
/// Only an exact `y`/`Y` approves; everything else, including an empty
/// line, is a denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationDecision {
    Approved,
    Denied,
}

impl ConfirmationDecision {
    /// Interpret a raw answer line
    pub fn from_answer(answer: &str) -> Self {
        match answer.trim_end_matches(['\r', '\n']) {
            "y" | "Y" => ConfirmationDecision::Approved,
            _ => ConfirmationDecision::Denied,
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, ConfirmationDecision::Approved)
    }
}

/// State of one tool call as it passes the confirmation gate
///
/// ```text
/// Requested ──(no acceptance needed)──▶ Approved
/// Requested ──(acceptance needed)──▶ AwaitingHuman ──▶ Approved | Denied
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationState {
    Requested,
    AwaitingHuman,
    Approved,
    Denied,
}

impl ConfirmationState {
    /// Move out of `Requested` according to the tool's acceptance predicate.
    /// Any other state is returned unchanged.
    pub fn transition(self, requires_acceptance: bool) -> Self {
        match self {
            ConfirmationState::Requested if requires_acceptance => {
                ConfirmationState::AwaitingHuman
            }
            ConfirmationState::Requested => ConfirmationState::Approved,
            other => other,
        }
    }

    /// Apply a human decision. Only valid from `AwaitingHuman`; any other
    /// state is returned unchanged.
    pub fn resolve(self, decision: ConfirmationDecision) -> Self {
        match (self, decision) {
            (ConfirmationState::AwaitingHuman, ConfirmationDecision::Approved) => {
                ConfirmationState::Approved
            }
            (ConfirmationState::AwaitingHuman, ConfirmationDecision::Denied) => {
                ConfirmationState::Denied
            }
            (other, _) => other,
        }
    }

    pub fn permits_execution(&self) -> bool {
        matches!(self, ConfirmationState::Approved)
    }
}
