//! Interactive y/N confirmation for flagged tool calls
//!
//! The question has already been rendered as a `ToolConfirmation` event;
//! this adapter only prints the prompt and reads the answer.
//!
//! ```text
//! ? Running command: sudo apt install jq [bash]
//! Allow? [y/N]
//! ```

use async_trait::async_trait;
use colored::Colorize;
use deckhand_application::{ConfirmationError, ConfirmationPort, ConfirmationRequest};
use deckhand_domain::ConfirmationDecision;
use std::io::{self, BufRead, Write};

/// Reads the answer from stdin. Only `y`/`Y` approves.
#[derive(Debug, Clone, Default)]
pub struct InteractiveConfirmation;

impl InteractiveConfirmation {
    pub fn new() -> Self {
        Self
    }

    fn read_answer() -> Result<String, ConfirmationError> {
        print!("{} ", "Allow? [y/N]".yellow().bold());
        io::stdout()
            .flush()
            .map_err(|e| ConfirmationError::Io(format!("Failed to flush stdout: {}", e)))?;

        let mut input = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut input)
            .map_err(|e| ConfirmationError::Io(format!("Failed to read input: {}", e)))?;
        if read == 0 {
            return Err(ConfirmationError::Cancelled);
        }
        Ok(input)
    }
}

#[async_trait]
impl ConfirmationPort for InteractiveConfirmation {
    async fn confirm(
        &self,
        request: &ConfirmationRequest,
    ) -> Result<ConfirmationDecision, ConfirmationError> {
        let answer = tokio::task::spawn_blocking(Self::read_answer)
            .await
            .map_err(|e| ConfirmationError::Io(e.to_string()))??;

        let decision = ConfirmationDecision::from_answer(&answer);
        if decision.is_approved() {
            println!("{}", "✓ Approved".green());
        } else {
            println!("{} {}", "✗ Denied:".red(), request.display_action.dimmed());
        }
        Ok(decision)
    }
}
