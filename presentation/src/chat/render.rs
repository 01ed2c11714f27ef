//! Event rendering for the chat session
//!
//! [`format_event`] turns one [`AgentEvent`] into terminal text and has no
//! side effects. [`EventRenderer`] owns the spinner and does the writing.

use super::diff::render_diff;
use colored::Colorize;
use deckhand_application::AgentEvent;
use deckhand_domain::util::one_line;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Width limit for one-line summaries
const SUMMARY_WIDTH: usize = 100;

/// Terminal text for an event, or `None` when the event has no visible form
pub fn format_event(event: &AgentEvent) -> Option<String> {
    match event {
        AgentEvent::UserSent { .. } => None,
        AgentEvent::AssistantReceive { text } => Some(text.trim().to_string()),
        AgentEvent::ToolStart { display_action, .. } => {
            Some(format!("{} {}", "●".cyan(), display_action.bold()))
        }
        AgentEvent::ToolEnd {
            elapsed,
            is_error,
            summary,
            ..
        } => {
            let summary = one_line(summary, SUMMARY_WIDTH);
            let timing = format!("({:.1}s)", elapsed.as_secs_f64());
            let line = if *is_error {
                format!("  ⎿ {}", summary.red())
            } else {
                format!("  ⎿ {}", summary.dimmed())
            };
            Some(format!("{} {}", line, timing.dimmed()))
        }
        AgentEvent::ToolConfirmation {
            tool_name,
            display_action,
            input,
            ..
        } => {
            let mut text = format!(
                "{} {} {}",
                "?".yellow().bold(),
                display_action.bold(),
                format!("[{}]", tool_name).dimmed()
            );
            // The command line is already in the action text
            if tool_name != "bash" {
                let pretty = serde_json::to_string_pretty(input).unwrap_or_default();
                for line in pretty.lines() {
                    text.push_str(&format!("\n    {}", line.dimmed()));
                }
            }
            Some(text)
        }
        AgentEvent::Error { message } => Some(format!("{} {}", "Error:".red().bold(), message)),
        AgentEvent::FileNewContent { path, content } => {
            let count = content.lines().count();
            let mut text = format!(
                "{} {} ({} line{})",
                "Created".green().bold(),
                path,
                count,
                if count == 1 { "" } else { "s" }
            );
            let diff = render_diff("", content);
            if !diff.is_empty() {
                text.push('\n');
                text.push_str(&diff);
            }
            Some(text)
        }
        AgentEvent::FileUpdateContent {
            path,
            old_content,
            new_content,
        } => {
            let mut text = format!("{} {}", "Updated".yellow().bold(), path);
            let diff = render_diff(old_content, new_content);
            if !diff.is_empty() {
                text.push('\n');
                text.push_str(&diff);
            }
            Some(text)
        }
        AgentEvent::TokenUsage {
            input_tokens,
            output_tokens,
        } => Some(
            format!("tokens: {} in / {} out", input_tokens, output_tokens)
                .dimmed()
                .to_string(),
        ),
        AgentEvent::SystemClosed { reason, message } => {
            let mut text = format!("{} ({})", "Session closed".red().bold(), reason);
            if let Some(message) = message {
                text.push_str(&format!(": {}", message));
            }
            Some(text)
        }
    }
}

/// Writes events to the terminal and animates a spinner between them
pub struct EventRenderer {
    spinner: Option<ProgressBar>,
    show_spinner: bool,
    show_usage: bool,
}

impl EventRenderer {
    pub fn new(show_spinner: bool) -> Self {
        Self {
            spinner: None,
            show_spinner,
            show_usage: false,
        }
    }

    /// Also print token usage after every model call
    pub fn with_usage(mut self, show: bool) -> Self {
        self.show_usage = show;
        self
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Start (or retitle) the spinner
    pub fn start_spinner(&mut self, message: impl Into<String>) {
        if !self.show_spinner {
            return;
        }
        let message = message.into();
        match &self.spinner {
            Some(pb) => pb.set_message(message),
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(Self::spinner_style());
                pb.set_message(message);
                pb.enable_steady_tick(Duration::from_millis(80));
                self.spinner = Some(pb);
            }
        }
    }

    pub fn stop_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }

    /// Print a line with the spinner out of the way
    pub fn print(&mut self, text: &str) {
        self.stop_spinner();
        println!("{}", text);
    }

    /// Render one event. The spinner resumes while the runtime is busy.
    pub fn render(&mut self, event: &AgentEvent) {
        if matches!(event, AgentEvent::TokenUsage { .. }) && !self.show_usage {
            return;
        }

        if let Some(text) = format_event(event) {
            self.print(&text);
        }

        match event {
            AgentEvent::UserSent { .. } | AgentEvent::ToolEnd { .. } => {
                self.start_spinner("Thinking...")
            }
            AgentEvent::ToolStart { display_action, .. } => {
                self.start_spinner(one_line(display_action, SUMMARY_WIDTH))
            }
            _ => {}
        }
    }
}

impl Drop for EventRenderer {
    fn drop(&mut self) {
        self.stop_spinner();
    }
}
