//! REPL (Read-Eval-Print Loop) for the chat session
//!
//! Each input line is either a slash command or a user turn. A user turn
//! runs `runtime.send` while the event stream is rendered concurrently; a
//! `ToolConfirmation` event pauses rendering until the human answers.

use super::commands::{CommandTable, ReplCommand};
use super::render::EventRenderer;
use colored::Colorize;
use deckhand_application::{
    AgentEvent, AgentEventReceiver, AgentRuntime, ConfirmationPort, ConfirmationRequest,
    RuntimeError,
};
use deckhand_domain::{ConfirmationDecision, Model};
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Entries kept in the history file
const HISTORY_SIZE: usize = 1000;

/// How a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// `/quit` or Ctrl-D
    Quit,
    /// The runtime sent `SystemClosed`
    Closed { reason: String },
}

/// Result of one user turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Continue,
    Closed { reason: String },
}

/// Interactive chat REPL
pub struct ChatRepl<R: AgentRuntime + 'static, C: ConfirmationPort + 'static> {
    runtime: Arc<R>,
    events: AgentEventReceiver,
    confirmation: Arc<C>,
    renderer: EventRenderer,
    commands: CommandTable,
    model: Model,
    history_path: Option<PathBuf>,
}

impl<R: AgentRuntime + 'static, C: ConfirmationPort + 'static> ChatRepl<R, C> {
    pub fn new(
        runtime: Arc<R>,
        events: AgentEventReceiver,
        confirmation: Arc<C>,
        model: Model,
    ) -> Self {
        Self {
            runtime,
            events,
            confirmation,
            renderer: EventRenderer::new(true),
            commands: CommandTable::default(),
            model,
            history_path: None,
        }
    }

    pub fn with_renderer(mut self, renderer: EventRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_history_path(mut self, path: Option<PathBuf>) -> Self {
        self.history_path = path;
        self
    }

    /// Run the interactive REPL until `/quit`, Ctrl-D or `SystemClosed`
    pub async fn run(&mut self) -> io::Result<SessionEnd> {
        let mut line_editor = Reedline::create();
        if let Some(path) = &self.history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match FileBackedHistory::with_file(HISTORY_SIZE, path.clone()) {
                Ok(history) => line_editor = line_editor.with_history(Box::new(history)),
                Err(e) => warn!(path = %path.display(), error = %e, "History disabled"),
            }
        }

        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("deckhand".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();
        info!(model = %self.model, "Session started");

        loop {
            match line_editor.read_line(&prompt)? {
                Signal::Success(buffer) => {
                    let line = buffer.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        match self.commands.resolve(line) {
                            Some(ReplCommand::Quit) => {
                                self.shutdown().await;
                                return Ok(SessionEnd::Quit);
                            }
                            Some(ReplCommand::Help) => {
                                println!();
                                println!("{}", self.commands.help_text());
                                println!();
                            }
                            None => {
                                println!("Unknown command: {}", line);
                                println!("Type /help for available commands");
                            }
                        }
                        continue;
                    }

                    if let TurnOutcome::Closed { reason } = self.process_line(line).await {
                        info!(reason = %reason, "Session closed by runtime");
                        return Ok(SessionEnd::Closed { reason });
                    }
                }
                // Reedline has already cleared the line
                Signal::CtrlC => continue,
                Signal::CtrlD => {
                    self.shutdown().await;
                    return Ok(SessionEnd::Quit);
                }
            }
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("{} {}", "deckhand".cyan().bold(), format!("({})", self.model).dimmed());
        println!(
            "{}",
            "Type a request, /help for commands, /quit to exit.".dimmed()
        );
        println!();
    }

    async fn shutdown(&mut self) {
        if let Err(e) = self.runtime.close().await {
            warn!(error = %e, "Runtime did not close cleanly");
        }
        self.renderer.stop_spinner();
        info!("Session ended");
        println!("Bye!");
    }

    /// Run one user turn, rendering its events as they arrive
    pub async fn process_line(&mut self, line: &str) -> TurnOutcome {
        let runtime = Arc::clone(&self.runtime);
        let send = runtime.send(line);
        tokio::pin!(send);

        let mut closed = None;
        let result = loop {
            tokio::select! {
                biased;
                Some(event) = self.events.recv() => {
                    if let Some(reason) = self.handle_event(event).await {
                        closed = Some(reason);
                    }
                }
                result = &mut send => break result,
            }
        };

        while let Ok(event) = self.events.try_recv() {
            if let Some(reason) = self.handle_event(event).await {
                closed = Some(reason);
            }
        }
        self.renderer.stop_spinner();

        match (result, closed) {
            (_, Some(reason)) => TurnOutcome::Closed { reason },
            (Ok(()), None) => TurnOutcome::Continue,
            (Err(RuntimeError::Closed), None) => TurnOutcome::Closed {
                reason: "closed".to_string(),
            },
            (Err(e), None) => {
                warn!(error = %e, "Turn failed");
                self.renderer.render(&AgentEvent::Error {
                    message: e.to_string(),
                });
                TurnOutcome::Continue
            }
        }
    }

    /// Render an event; answers confirmations. Returns the close reason for `SystemClosed`.
    async fn handle_event(&mut self, event: AgentEvent) -> Option<String> {
        self.renderer.render(&event);

        match event {
            AgentEvent::ToolConfirmation {
                tool_use_id,
                tool_name,
                input,
                display_action,
            } => {
                self.renderer.stop_spinner();
                let request = ConfirmationRequest {
                    tool_use_id,
                    tool_name,
                    display_action,
                    input,
                };

                let decision = match self.confirmation.confirm(&request).await {
                    Ok(decision) => decision,
                    Err(e) => {
                        warn!(error = %e, "No confirmation answer, denying");
                        ConfirmationDecision::Denied
                    }
                };

                if let Err(e) = self
                    .runtime
                    .respond_confirmation(&request.tool_use_id, decision)
                {
                    self.renderer.render(&AgentEvent::Error {
                        message: e.to_string(),
                    });
                }
                if decision.is_approved() {
                    self.renderer.start_spinner("Working...");
                }
                None
            }
            AgentEvent::SystemClosed { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use deckhand_application::{
        AutoApproveConfirmation, AutoDenyConfirmation, AgentEventSender, ConfirmationGate,
        GatewayError, agent_event_channel,
    };
    use std::sync::Mutex;

    /// Emits a confirmation request per turn and records the decision
    struct ConfirmingRuntime {
        events: AgentEventSender,
        gate: ConfirmationGate,
        decisions: Mutex<Vec<ConfirmationDecision>>,
    }

    #[async_trait]
    impl AgentRuntime for ConfirmingRuntime {
        async fn send(&self, input: &str) -> Result<(), RuntimeError> {
            let pending = self.gate.request("toolu_1")?;
            let _ = self.events.send(AgentEvent::ToolConfirmation {
                tool_use_id: "toolu_1".into(),
                tool_name: "bash".into(),
                input: serde_json::json!({"command": input}),
                display_action: format!("Running command: {}", input),
            });
            let decision = pending.wait().await;
            self.decisions.lock().unwrap().push(decision);
            let _ = self.events.send(AgentEvent::AssistantReceive {
                text: "done".into(),
            });
            Ok(())
        }

        fn respond_confirmation(
            &self,
            tool_use_id: &str,
            decision: ConfirmationDecision,
        ) -> Result<(), RuntimeError> {
            Ok(self.gate.resolve(tool_use_id, decision)?)
        }

        async fn close(&self) -> Result<(), RuntimeError> {
            self.gate.deny_all();
            Ok(())
        }
    }

    /// Fails every turn; fatal failures announce `SystemClosed` first
    struct FailingRuntime {
        events: AgentEventSender,
        fatal: bool,
    }

    #[async_trait]
    impl AgentRuntime for FailingRuntime {
        async fn send(&self, _input: &str) -> Result<(), RuntimeError> {
            if self.fatal {
                let _ = self.events.send(AgentEvent::SystemClosed {
                    reason: "gateway".into(),
                    message: None,
                });
                return Err(GatewayError::Authentication("bad key".into()).into());
            }
            Err(GatewayError::RateLimited.into())
        }

        fn respond_confirmation(
            &self,
            _tool_use_id: &str,
            _decision: ConfirmationDecision,
        ) -> Result<(), RuntimeError> {
            Ok(())
        }

        async fn close(&self) -> Result<(), RuntimeError> {
            Ok(())
        }
    }

    fn confirming_repl<C: ConfirmationPort + 'static>(
        confirmation: C,
    ) -> (ChatRepl<ConfirmingRuntime, C>, Arc<ConfirmingRuntime>) {
        let (tx, rx) = agent_event_channel();
        let runtime = Arc::new(ConfirmingRuntime {
            events: tx,
            gate: ConfirmationGate::new(),
            decisions: Mutex::new(Vec::new()),
        });
        let repl = ChatRepl::new(
            Arc::clone(&runtime),
            rx,
            Arc::new(confirmation),
            Model::default(),
        )
        .with_renderer(EventRenderer::new(false));
        (repl, runtime)
    }

    #[tokio::test]
    async fn test_confirmation_is_routed_back_to_runtime() {
        let (mut repl, runtime) = confirming_repl(AutoApproveConfirmation);
        assert_eq!(repl.process_line("sudo ls").await, TurnOutcome::Continue);
        assert_eq!(
            *runtime.decisions.lock().unwrap(),
            vec![ConfirmationDecision::Approved]
        );
    }

    #[tokio::test]
    async fn test_denial_is_routed_back_to_runtime() {
        let (mut repl, runtime) = confirming_repl(AutoDenyConfirmation);
        assert_eq!(repl.process_line("sudo ls").await, TurnOutcome::Continue);
        assert_eq!(
            *runtime.decisions.lock().unwrap(),
            vec![ConfirmationDecision::Denied]
        );
    }

    #[tokio::test]
    async fn test_turn_failure_does_not_end_session() {
        let (tx, rx) = agent_event_channel();
        let runtime = Arc::new(FailingRuntime {
            events: tx,
            fatal: false,
        });
        let mut repl = ChatRepl::new(runtime, rx, Arc::new(AutoDenyConfirmation), Model::default())
            .with_renderer(EventRenderer::new(false));

        assert_eq!(repl.process_line("hello").await, TurnOutcome::Continue);
        assert_eq!(repl.process_line("again").await, TurnOutcome::Continue);
    }

    #[tokio::test]
    async fn test_system_closed_ends_session() {
        let (tx, rx) = agent_event_channel();
        let runtime = Arc::new(FailingRuntime {
            events: tx,
            fatal: true,
        });
        let mut repl = ChatRepl::new(runtime, rx, Arc::new(AutoDenyConfirmation), Model::default())
            .with_renderer(EventRenderer::new(false));

        assert_eq!(
            repl.process_line("hello").await,
            TurnOutcome::Closed {
                reason: "gateway".to_string()
            }
        );
    }
}
