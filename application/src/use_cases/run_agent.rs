//! Tool-use agent runtime
//!
//! [`ToolUseAgent`] implements [`AgentRuntime`] on top of an [`LlmGateway`].
//! One call to [`send`](AgentRuntime::send) runs a full user turn:
//!
//! ```text
//! user text ─▶ model ─┬─▶ text only ─────────────────────────────▶ done
//!                     └─▶ tool_use blocks
//!                           │ for each call, in order:
//!                           │   lookup ─▶ validate ─▶ gate ─▶ execute
//!                           └─▶ tool_result blocks ─▶ model ─▶ …
//! ```
//!
//! Every tool call is answered with a `tool_result` block, including unknown
//! tools, invalid arguments and denied confirmations, so the model can adapt.

use crate::config::AgentConfig;
use crate::ports::agent_event::{AgentEvent, AgentEventSender};
use crate::ports::agent_runtime::{AgentRuntime, RuntimeError};
use crate::ports::llm_gateway::{CompletionRequest, LlmGateway};
use crate::ports::tool_executor::ToolExecutorPort;
use crate::ports::tool_schema::ToolSchemaPort;
use crate::use_cases::confirmation_gate::ConfirmationGate;
use async_trait::async_trait;
use deckhand_domain::util::one_line;
use deckhand_domain::{
    ConfirmationDecision, ConfirmationState, ContentBlock, Conversation, Message, ToolCall,
    ToolError, ToolResult, strip_reasoning,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Width of the one-line result summary carried by `ToolEnd`
const SUMMARY_CHARS: usize = 120;

/// Stands in for an assistant reply with no content blocks; the API rejects
/// empty messages in history
const EMPTY_REPLY_PLACEHOLDER: &str = "(no response)";

pub struct ToolUseAgent {
    gateway: Arc<dyn LlmGateway>,
    tools: Arc<dyn ToolExecutorPort>,
    tool_schemas: Vec<serde_json::Value>,
    config: AgentConfig,
    gate: ConfirmationGate,
    events: AgentEventSender,
    conversation: Mutex<Conversation>,
    closed: CancellationToken,
}

impl ToolUseAgent {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        tools: Arc<dyn ToolExecutorPort>,
        tool_schema: &dyn ToolSchemaPort,
        config: AgentConfig,
        events: AgentEventSender,
    ) -> Self {
        let tool_schemas = tool_schema.all_tools_schema(&tools.definitions());
        Self {
            gateway,
            tools,
            tool_schemas,
            config,
            gate: ConfirmationGate::new(),
            events,
            conversation: Mutex::new(Conversation::new()),
            closed: CancellationToken::new(),
        }
    }

    pub fn with_system_prompt(self, system_prompt: impl Into<String>) -> Self {
        Self {
            conversation: Mutex::new(Conversation::with_system_prompt(system_prompt)),
            ..self
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    fn emit(&self, event: AgentEvent) {
        if self.events.send(event).is_err() {
            debug!("Event receiver dropped");
        }
    }

    /// Run one tool call through lookup, validation, the gate and execution.
    async fn run_tool_call(&self, call: &ToolCall) -> ToolResult {
        let tool = match self.tools.tool(&call.tool_name) {
            Ok(tool) => tool,
            Err(e) => {
                warn!(tool = %call.tool_name, "Model requested an unknown tool");
                self.emit(AgentEvent::Error {
                    message: e.to_string(),
                });
                return ToolResult::failure(&call.tool_name, ToolError::not_found(e.to_string()));
            }
        };

        if let Err(message) = tool.validate(call) {
            debug!(tool = %call.tool_name, %message, "Tool call failed validation");
            self.emit(AgentEvent::Error {
                message: message.clone(),
            });
            return ToolResult::failure(&call.tool_name, ToolError::invalid_argument(message));
        }

        let display_action = tool.display_action(call);
        let mut state = ConfirmationState::Requested.transition(tool.requires_acceptance(call));

        if state == ConfirmationState::AwaitingHuman {
            let decision = match self.gate.request(&call.tool_use_id) {
                Ok(pending) => {
                    self.emit(AgentEvent::ToolConfirmation {
                        tool_use_id: call.tool_use_id.clone(),
                        tool_name: call.tool_name.clone(),
                        input: call.input_json(),
                        display_action: display_action.clone(),
                    });
                    tokio::select! {
                        decision = pending.wait() => decision,
                        _ = self.closed.cancelled() => ConfirmationDecision::Denied,
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Could not register confirmation");
                    ConfirmationDecision::Denied
                }
            };
            state = state.resolve(decision);
        }

        if !state.permits_execution() {
            info!(tool = %call.tool_name, tool_use_id = %call.tool_use_id, "Tool call denied");
            return ToolResult::failure(&call.tool_name, ToolError::rejected());
        }

        self.emit(AgentEvent::ToolStart {
            tool_use_id: call.tool_use_id.clone(),
            tool_name: call.tool_name.clone(),
            input: call.input_json(),
            display_action,
        });

        let start = Instant::now();
        let result = tool.execute(call).await;
        let elapsed = start.elapsed();
        debug!(
            tool = %call.tool_name,
            success = result.is_success(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Tool call finished"
        );

        if let Some(change) = &result.file_change {
            match &change.old_content {
                None => self.emit(AgentEvent::FileNewContent {
                    path: change.path.clone(),
                    content: change.new_content.clone(),
                }),
                Some(old) => self.emit(AgentEvent::FileUpdateContent {
                    path: change.path.clone(),
                    old_content: old.clone(),
                    new_content: change.new_content.clone(),
                }),
            }
        }

        self.emit(AgentEvent::ToolEnd {
            tool_use_id: call.tool_use_id.clone(),
            tool_name: call.tool_name.clone(),
            elapsed,
            is_error: result.is_error(),
            summary: one_line(&result.content(), SUMMARY_CHARS),
        });

        result
    }
}

#[async_trait]
impl AgentRuntime for ToolUseAgent {
    async fn send(&self, input: &str) -> Result<(), RuntimeError> {
        if self.closed.is_cancelled() {
            return Err(RuntimeError::Closed);
        }

        let mut conversation = self.conversation.lock().await;
        let turn_start = conversation.len();
        conversation.push(Message::user(input));
        self.emit(AgentEvent::UserSent {
            text: input.to_string(),
        });

        for iteration in 1..=self.config.max_iterations {
            if self.closed.is_cancelled() {
                return Err(RuntimeError::Closed);
            }

            let request = CompletionRequest {
                model: self.config.model,
                max_tokens: self.config.max_tokens,
                system: conversation.system_prompt(),
                messages: conversation.messages(),
                tools: &self.tool_schemas,
            };

            let response = match self.gateway.complete(request).await {
                Ok(response) => response,
                Err(e) => {
                    // Roll back so the history never ends on an unanswered turn
                    conversation.truncate(turn_start);
                    if e.is_fatal() {
                        warn!(error = %e, "Gateway failure is fatal, closing session");
                        self.closed.cancel();
                        self.gate.deny_all();
                        self.emit(AgentEvent::SystemClosed {
                            reason: "gateway".to_string(),
                            message: Some(e.to_string()),
                        });
                    }
                    return Err(e.into());
                }
            };

            if let Some(usage) = response.usage {
                self.emit(AgentEvent::TokenUsage {
                    input_tokens: usage.input_tokens,
                    output_tokens: usage.output_tokens,
                });
            }

            let text = strip_reasoning(&response.text_content());
            if !text.is_empty() {
                self.emit(AgentEvent::AssistantReceive { text });
            }

            let calls = response.tool_calls();
            let content = if response.content.is_empty() {
                warn!(iteration, "Model returned no content blocks");
                vec![ContentBlock::Text(EMPTY_REPLY_PLACEHOLDER.to_string())]
            } else {
                response.content
            };
            conversation.push(Message::assistant(content));

            if calls.is_empty() {
                debug!(iteration, "Turn complete");
                return Ok(());
            }

            debug!(iteration, calls = calls.len(), "Running tool calls");
            let mut results = Vec::with_capacity(calls.len());
            for call in &calls {
                let result = self.run_tool_call(call).await;
                results.push(ContentBlock::ToolResult {
                    tool_use_id: call.tool_use_id.clone(),
                    content: result.content(),
                    is_error: result.is_error(),
                });
            }
            conversation.push(Message::tool_results(results));
        }

        warn!(
            max_iterations = self.config.max_iterations,
            "Turn stopped at the iteration limit"
        );
        conversation.push(Message::assistant(vec![ContentBlock::Text(
            "(stopped: too many tool round-trips in one turn)".to_string(),
        )]));
        self.emit(AgentEvent::Error {
            message: format!(
                "Stopped after {} model round-trips; send another message to continue",
                self.config.max_iterations
            ),
        });
        Ok(())
    }

    fn respond_confirmation(
        &self,
        tool_use_id: &str,
        decision: ConfirmationDecision,
    ) -> Result<(), RuntimeError> {
        self.gate.resolve(tool_use_id, decision)?;
        Ok(())
    }

    async fn close(&self) -> Result<(), RuntimeError> {
        info!("Closing agent session");
        self.closed.cancel();
        self.gate.deny_all();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::agent_event::{AgentEventReceiver, agent_event_channel};
    use crate::ports::llm_gateway::GatewayError;
    use crate::ports::tool_executor::RegistryError;
    use deckhand_domain::{
        FileChange, LlmResponse, Role, StopReason, Tool, ToolDefinition, ToolParameter,
        TokenUsage,
    };
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    // ==================== Test doubles ====================

    struct ScriptedGateway {
        responses: StdMutex<VecDeque<Result<LlmResponse, GatewayError>>>,
        seen: StdMutex<Vec<Vec<Message>>>,
    }

    impl ScriptedGateway {
        fn new(responses: Vec<Result<LlmResponse, GatewayError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: StdMutex::new(responses.into()),
                seen: StdMutex::new(Vec::new()),
            })
        }

        fn last_messages(&self) -> Vec<Message> {
            self.seen.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        async fn complete(
            &self,
            request: CompletionRequest<'_>,
        ) -> Result<LlmResponse, GatewayError> {
            self.seen.lock().unwrap().push(request.messages.to_vec());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::RequestFailed("No more responses".into())))
        }
    }

    /// Counts executions; flags calls whose `command` contains "danger".
    struct RecordingTool {
        definition: ToolDefinition,
        runs: AtomicUsize,
        writes_file: bool,
    }

    impl RecordingTool {
        fn build(name: &str, writes_file: bool) -> Arc<Self> {
            Arc::new(Self {
                definition: ToolDefinition::new(name, name, "test tool")
                    .with_parameter(ToolParameter::new("command", "cmd", true)),
                runs: AtomicUsize::new(0),
                writes_file,
            })
        }

        fn new(name: &str) -> Arc<Self> {
            Self::build(name, false)
        }

        fn writer(name: &str) -> Arc<Self> {
            Self::build(name, true)
        }
    }

    #[async_trait]
    impl Tool for RecordingTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        fn requires_acceptance(&self, call: &ToolCall) -> bool {
            call.get_string("command").is_some_and(|c| c.contains("danger"))
        }

        async fn execute(&self, call: &ToolCall) -> ToolResult {
            self.runs.fetch_add(1, Ordering::SeqCst);
            let result = ToolResult::success(&call.tool_name, "ran");
            if self.writes_file {
                result.with_file_change(FileChange {
                    path: "/tmp/f".into(),
                    old_content: Some("a\n".into()),
                    new_content: "b\n".into(),
                })
            } else {
                result
            }
        }

        fn display_action(&self, call: &ToolCall) -> String {
            format!("Running command: {}", call.get_string("command").unwrap_or(""))
        }
    }

    struct MockToolExecutor {
        tools: Vec<Arc<RecordingTool>>,
    }

    impl ToolExecutorPort for MockToolExecutor {
        fn definitions(&self) -> Vec<&ToolDefinition> {
            self.tools.iter().map(|t| t.definition()).collect()
        }

        fn tool(&self, name: &str) -> Result<Arc<dyn Tool>, RegistryError> {
            self.tools
                .iter()
                .find(|t| t.name() == name)
                .map(|t| t.clone() as Arc<dyn Tool>)
                .ok_or_else(|| RegistryError::UnknownTool(name.to_string()))
        }
    }

    struct MockToolSchema;

    impl ToolSchemaPort for MockToolSchema {
        fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value {
            serde_json::json!({ "name": tool.name })
        }
    }

    fn text_response(text: &str) -> Result<LlmResponse, GatewayError> {
        Ok(LlmResponse {
            content: vec![ContentBlock::Text(text.to_string())],
            stop_reason: Some(StopReason::EndTurn),
            usage: Some(TokenUsage {
                input_tokens: 10,
                output_tokens: 5,
            }),
        })
    }

    fn tool_use_response(id: &str, tool: &str, command: &str) -> Result<LlmResponse, GatewayError> {
        let input: HashMap<_, _> = [("command".to_string(), serde_json::json!(command))]
            .into_iter()
            .collect();
        Ok(LlmResponse {
            content: vec![ContentBlock::ToolUse {
                id: id.to_string(),
                name: tool.to_string(),
                input,
            }],
            stop_reason: Some(StopReason::ToolUse),
            usage: None,
        })
    }

    fn agent(
        gateway: Arc<ScriptedGateway>,
        tools: Vec<Arc<RecordingTool>>,
    ) -> (Arc<ToolUseAgent>, AgentEventReceiver) {
        let (tx, rx) = agent_event_channel();
        let agent = ToolUseAgent::new(
            gateway,
            Arc::new(MockToolExecutor { tools }),
            &MockToolSchema,
            AgentConfig::default().with_max_iterations(4),
            tx,
        )
        .with_system_prompt("system");
        (Arc::new(agent), rx)
    }

    fn drain(rx: &mut AgentEventReceiver) -> Vec<AgentEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn last_tool_result(gateway: &ScriptedGateway) -> (String, bool) {
        let messages = gateway.last_messages();
        let last = messages.last().unwrap();
        assert_eq!(last.role, Role::User);
        match &last.content[0] {
            ContentBlock::ToolResult {
                content, is_error, ..
            } => (content.clone(), *is_error),
            other => panic!("expected tool result, got {:?}", other),
        }
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_text_turn_strips_reasoning() {
        let gateway = ScriptedGateway::new(vec![text_response(
            "<thinking>private</thinking>Hello there",
        )]);
        let (agent, mut rx) = agent(gateway, vec![]);

        agent.send("hi").await.unwrap();

        let events = drain(&mut rx);
        assert_eq!(
            events,
            vec![
                AgentEvent::UserSent { text: "hi".into() },
                AgentEvent::TokenUsage {
                    input_tokens: 10,
                    output_tokens: 5
                },
                AgentEvent::AssistantReceive {
                    text: "Hello there".into()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_safe_tool_runs_without_confirmation() {
        let bash = RecordingTool::new("bash");
        let gateway = ScriptedGateway::new(vec![
            tool_use_response("toolu_1", "bash", "ls"),
            text_response("done"),
        ]);
        let (agent, mut rx) = agent(gateway.clone(), vec![bash.clone()]);

        agent.send("list").await.unwrap();

        assert_eq!(bash.runs.load(Ordering::SeqCst), 1);
        let events = drain(&mut rx);
        assert!(!events
            .iter()
            .any(|e| matches!(e, AgentEvent::ToolConfirmation { .. })));
        assert!(events.iter().any(|e| matches!(
            e,
            AgentEvent::ToolStart { display_action, .. } if display_action == "Running command: ls"
        )));
        assert!(events
            .iter()
            .any(|e| matches!(e, AgentEvent::ToolEnd { is_error: false, .. })));
        assert_eq!(last_tool_result(&gateway), ("ran".to_string(), false));
    }

    #[tokio::test]
    async fn test_denied_confirmation_skips_execution() {
        let bash = RecordingTool::new("bash");
        let gateway = ScriptedGateway::new(vec![
            tool_use_response("toolu_9", "bash", "danger rm"),
            text_response("ok, not doing that"),
        ]);
        let (agent, mut rx) = agent(gateway.clone(), vec![bash.clone()]);

        let runner = agent.clone();
        let turn = tokio::spawn(async move { runner.send("clean up").await });

        loop {
            match rx.recv().await.unwrap() {
                AgentEvent::ToolConfirmation { tool_use_id, .. } => {
                    assert_eq!(tool_use_id, "toolu_9");
                    agent
                        .respond_confirmation(&tool_use_id, ConfirmationDecision::Denied)
                        .unwrap();
                    break;
                }
                AgentEvent::ToolStart { .. } => panic!("tool started before confirmation"),
                _ => {}
            }
        }

        turn.await.unwrap().unwrap();
        assert_eq!(bash.runs.load(Ordering::SeqCst), 0);
        let (content, is_error) = last_tool_result(&gateway);
        assert!(is_error);
        assert_eq!(content, "Error: Tool call was rejected by the user.");
    }

    #[tokio::test]
    async fn test_approved_confirmation_runs_tool() {
        let bash = RecordingTool::new("bash");
        let gateway = ScriptedGateway::new(vec![
            tool_use_response("toolu_2", "bash", "danger"),
            text_response("done"),
        ]);
        let (agent, mut rx) = agent(gateway, vec![bash.clone()]);

        let runner = agent.clone();
        let turn = tokio::spawn(async move { runner.send("go").await });

        while let Some(event) = rx.recv().await {
            if let AgentEvent::ToolConfirmation { tool_use_id, .. } = event {
                agent
                    .respond_confirmation(&tool_use_id, ConfirmationDecision::Approved)
                    .unwrap();
                break;
            }
        }

        turn.await.unwrap().unwrap();
        assert_eq!(bash.runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_tool_and_invalid_args_are_reported_to_model() {
        let bash = RecordingTool::new("bash");
        let missing_args = Ok(LlmResponse {
            content: vec![ContentBlock::ToolUse {
                id: "toolu_b".into(),
                name: "bash".into(),
                input: HashMap::new(),
            }],
            stop_reason: Some(StopReason::ToolUse),
            usage: None,
        });
        let gateway = ScriptedGateway::new(vec![
            tool_use_response("toolu_a", "teleport", "x"),
            missing_args,
            text_response("giving up"),
        ]);
        let (agent, mut rx) = agent(gateway.clone(), vec![bash.clone()]);

        agent.send("do it").await.unwrap();

        assert_eq!(bash.runs.load(Ordering::SeqCst), 0);
        let (content, is_error) = last_tool_result(&gateway);
        assert!(is_error);
        assert_eq!(
            content,
            "Error: Missing required parameter 'command' for tool 'bash'"
        );

        let errors: Vec<_> = drain(&mut rx)
            .into_iter()
            .filter_map(|e| match e {
                AgentEvent::Error { message } => Some(message),
                _ => None,
            })
            .collect();
        assert_eq!(errors[0], "Unknown tool: teleport");
    }

    #[tokio::test]
    async fn test_file_change_emits_update_event() {
        let writer = RecordingTool::writer("write_file");
        let gateway = ScriptedGateway::new(vec![
            tool_use_response("toolu_w", "write_file", "edit"),
            text_response("edited"),
        ]);
        let (agent, mut rx) = agent(gateway, vec![writer]);

        agent.send("edit").await.unwrap();

        assert!(drain(&mut rx).contains(&AgentEvent::FileUpdateContent {
            path: "/tmp/f".into(),
            old_content: "a\n".into(),
            new_content: "b\n".into(),
        }));
    }

    #[tokio::test]
    async fn test_gateway_error_rolls_back_turn() {
        let gateway = ScriptedGateway::new(vec![
            Err(GatewayError::RequestFailed("boom".into())),
            text_response("recovered"),
        ]);
        let (agent, _rx) = agent(gateway.clone(), vec![]);

        assert!(matches!(
            agent.send("first").await,
            Err(RuntimeError::Gateway(_))
        ));
        agent.send("second").await.unwrap();

        let messages = gateway.last_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0], Message::user("second"));
    }

    #[tokio::test]
    async fn test_empty_reply_keeps_history_valid() {
        let empty = Ok(LlmResponse {
            content: vec![],
            stop_reason: Some(StopReason::EndTurn),
            usage: None,
        });
        let gateway = ScriptedGateway::new(vec![empty, text_response("hello")]);
        let (agent, _rx) = agent(gateway.clone(), vec![]);

        agent.send("hi").await.unwrap();
        agent.send("again").await.unwrap();

        let messages = gateway.last_messages();
        assert_eq!(messages.len(), 3);
        assert!(messages.iter().all(|m| !m.content.is_empty()));
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(
            messages[1].content,
            vec![ContentBlock::Text(EMPTY_REPLY_PLACEHOLDER.to_string())]
        );
    }

    #[tokio::test]
    async fn test_fatal_gateway_error_closes_session() {
        let gateway = ScriptedGateway::new(vec![Err(GatewayError::Authentication(
            "invalid x-api-key".into(),
        ))]);
        let (agent, mut rx) = agent(gateway, vec![]);

        assert!(agent.send("hi").await.is_err());
        assert!(drain(&mut rx)
            .iter()
            .any(|e| matches!(e, AgentEvent::SystemClosed { reason, .. } if reason == "gateway")));
        assert!(matches!(agent.send("again").await, Err(RuntimeError::Closed)));
    }

    #[tokio::test]
    async fn test_iteration_limit() {
        let bash = RecordingTool::new("bash");
        let gateway = ScriptedGateway::new(
            (0..4)
                .map(|i| tool_use_response(&format!("toolu_{}", i), "bash", "ls"))
                .collect(),
        );
        let (agent, mut rx) = agent(gateway, vec![bash.clone()]);

        agent.send("loop").await.unwrap();

        assert_eq!(bash.runs.load(Ordering::SeqCst), 4);
        assert!(drain(&mut rx).iter().any(|e| matches!(
            e,
            AgentEvent::Error { message } if message.starts_with("Stopped after 4")
        )));
    }

    #[tokio::test]
    async fn test_close_rejects_further_turns() {
        let (agent, _rx) = agent(ScriptedGateway::new(vec![]), vec![]);
        agent.close().await.unwrap();
        assert!(matches!(agent.send("hi").await, Err(RuntimeError::Closed)));
        assert!(matches!(
            agent.respond_confirmation("nope", ConfirmationDecision::Approved),
            Err(RuntimeError::Confirmation(_))
        ));
    }
}
