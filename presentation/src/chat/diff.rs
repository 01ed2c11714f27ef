//! Line diffs for file write events

use colored::Colorize;
use similar::{ChangeTag, TextDiff};

/// Unchanged lines kept around each change
const CONTEXT_LINES: usize = 3;

/// Rendered lines after which the rest of a diff is elided
const MAX_RENDERED_LINES: usize = 200;

/// Render a line diff: unchanged lines dimmed, `+` added lines green,
/// `-` removed lines red. Distant hunks are separated by a dimmed `⋮`.
pub fn render_diff(old: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(old, new);
    let mut lines = Vec::new();
    let mut elided = 0usize;

    for (i, group) in diff.grouped_ops(CONTEXT_LINES).iter().enumerate() {
        if i > 0 && lines.len() < MAX_RENDERED_LINES {
            lines.push("⋮".dimmed().to_string());
        }
        for op in group {
            for change in diff.iter_changes(op) {
                if lines.len() >= MAX_RENDERED_LINES {
                    elided += 1;
                    continue;
                }
                let text = change.value().trim_end_matches(['\n', '\r']);
                let line = match change.tag() {
                    ChangeTag::Equal => format!(" {}", text).dimmed().to_string(),
                    ChangeTag::Insert => format!("+{}", text).green().to_string(),
                    ChangeTag::Delete => format!("-{}", text).red().to_string(),
                };
                lines.push(line);
            }
        }
    }

    if elided > 0 {
        lines.push(format!("... ({} more lines)", elided).dimmed().to_string());
    }
    lines.join("\n")
}
