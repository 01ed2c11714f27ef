//! In-session slash commands

/// Action of a slash command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Quit,
}

#[derive(Debug, Clone)]
struct CommandEntry {
    name: &'static str,
    aliases: &'static [&'static str],
    description: &'static str,
    command: ReplCommand,
}

/// The commands a session understands
#[derive(Debug, Clone)]
pub struct CommandTable {
    entries: Vec<CommandEntry>,
}

impl Default for CommandTable {
    fn default() -> Self {
        Self {
            entries: vec![
                CommandEntry {
                    name: "/help",
                    aliases: &["/h", "/?"],
                    description: "Show this help",
                    command: ReplCommand::Help,
                },
                CommandEntry {
                    name: "/quit",
                    aliases: &["/exit", "/q"],
                    description: "End the session (Ctrl-D also works)",
                    command: ReplCommand::Quit,
                },
            ],
        }
    }
}

impl CommandTable {
    /// Resolve a `/`-prefixed line. Arguments after the command are ignored.
    pub fn resolve(&self, line: &str) -> Option<ReplCommand> {
        let word = line.split_whitespace().next()?;
        self.entries
            .iter()
            .find(|e| e.name == word || e.aliases.contains(&word))
            .map(|e| e.command)
    }

    pub fn help_text(&self) -> String {
        let mut text = String::from("Commands:");
        for entry in &self.entries {
            let names = std::iter::once(entry.name)
                .chain(entry.aliases.iter().copied())
                .collect::<Vec<_>>()
                .join(", ");
            text.push_str(&format!("\n  {:<18} - {}", names, entry.description));
        }
        text
    }
}
