//! File read tool: read_file
//!
//! | Mode | Parameters | Output |
//! |------|------------|--------|
//! | `Full` | - | file content verbatim |
//! | `Line` | `start_line`, `end_line` | inclusive line range; negatives count from the end |
//! | `Directory` | `depth`? | recursive listing, or a long-format listing without `depth` |
//! | `Search` | `pattern`, `context_lines`? | case-insensitive matches with context |
//!
//! A missing path is reported as "does not exist yet", not as an error.

use super::resolve_path;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use deckhand_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolParameter},
    traits::Tool,
    value_objects::{ToolError, ToolResult, ToolResultMetadata},
};
use regex::RegexBuilder;
use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Tool name constant
pub const READ_FILE: &str = "read_file";

/// Context lines around a search match when `context_lines` is omitted
pub const DEFAULT_CONTEXT_LINES: i64 = 2;

const MODES: [&str; 4] = ["Line", "Directory", "Search", "Full"];

/// Get the tool definition for read_file
pub fn read_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        READ_FILE,
        "Read File",
        "Read a file or directory. Modes: Full (whole file), Line (start_line..end_line, \
         negative values count from the end), Directory (listing, recursive up to depth), \
         Search (case-insensitive regex with context lines).",
    )
    .with_parameter(ToolParameter::new("path", "Absolute path to read", true).with_type("path"))
    .with_parameter(ToolParameter::new("mode", "How to read the path", true).with_enum(MODES))
    .with_parameter(
        ToolParameter::new("start_line", "First line for Line mode (1-based, negative from end)", false)
            .with_type("integer"),
    )
    .with_parameter(
        ToolParameter::new("end_line", "Last line for Line mode (inclusive, negative from end)", false)
            .with_type("integer"),
    )
    .with_parameter(
        ToolParameter::new("depth", "Recursion depth for Directory mode", false).with_type("integer"),
    )
    .with_parameter(
        ToolParameter::new("pattern", "Regular expression for Search mode", false)
            .with_type("string"),
    )
    .with_parameter(
        ToolParameter::new("context_lines", "Lines of context around each match", false)
            .with_type("integer")
            .with_default(DEFAULT_CONTEXT_LINES),
    )
}

#[derive(Debug, Clone)]
pub struct ReadFileTool {
    definition: ToolDefinition,
}

impl Default for ReadFileTool {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadFileTool {
    pub fn new() -> Self {
        Self {
            definition: read_file_definition(),
        }
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let (path_str, mode) = match (call.require_string("path"), call.require_string("mode")) {
            (Ok(p), Ok(m)) => (p, m),
            (Err(e), _) | (_, Err(e)) => {
                return ToolResult::failure(READ_FILE, ToolError::invalid_argument(e));
            }
        };
        let path = resolve_path(path_str);

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return ToolResult::success(
                    READ_FILE,
                    format!("Path {} does not exist yet.", path_str),
                )
                .with_path(path_str);
            }
            Err(e) => return ToolResult::failure(READ_FILE, ToolError::from_io(&e, path_str)),
        };

        debug!(path = path_str, mode, "read_file");

        let result = match mode {
            "Full" => {
                if !metadata.is_file() {
                    return ToolResult::failure(
                        READ_FILE,
                        ToolError::invalid_argument(format!("{} is not a file", path_str)),
                    );
                }
                read_text(&path, path_str).await.map(|content| (content, None))
            }
            "Line" => match (call.get_i64("start_line"), call.get_i64("end_line")) {
                (Some(start), Some(end)) => read_text(&path, path_str)
                    .await
                    .and_then(|content| {
                        select_lines(&content, start, end).map_err(ToolError::invalid_argument)
                    })
                    .map(|lines| (lines, None)),
                _ => Err(ToolError::invalid_argument(
                    "Line mode requires start_line and end_line",
                )),
            },
            "Search" => match call.get_string("pattern") {
                Some(pattern) => {
                    let context = call
                        .get_i64("context_lines")
                        .unwrap_or(DEFAULT_CONTEXT_LINES)
                        .max(0) as usize;
                    read_text(&path, path_str).await.and_then(|content| {
                        search_lines(&content, pattern, context)
                            .map(|(text, count)| (text, Some(count)))
                            .map_err(ToolError::invalid_argument)
                    })
                }
                None => Err(ToolError::invalid_argument("Search mode requires pattern")),
            },
            "Directory" => {
                if !metadata.is_dir() {
                    return ToolResult::failure(
                        READ_FILE,
                        ToolError::invalid_argument(format!("{} is not a directory", path_str)),
                    );
                }
                let depth = call.get_i64("depth");
                let dir = path.clone();
                tokio::task::spawn_blocking(move || match depth {
                    Some(depth) => list_recursive(&dir, depth.max(1) as usize),
                    None => list_long(&dir),
                })
                .await
                .map_err(|e| ToolError::execution_failed(e.to_string()))
                .and_then(|listing| listing.map_err(|e| ToolError::from_io(&e, path_str)))
                .map(|listing| (listing, None))
            }
            other => Err(ToolError::invalid_argument(format!(
                "unknown mode '{}'; expected one of {}",
                other,
                MODES.join(", ")
            ))),
        };

        match result {
            Ok((text, match_count)) => {
                let metadata = ToolResultMetadata {
                    bytes: Some(text.len()),
                    path: Some(path_str.to_string()),
                    match_count,
                    ..Default::default()
                };
                ToolResult::success(READ_FILE, text).with_metadata(metadata)
            }
            Err(e) => ToolResult::failure(READ_FILE, e).with_path(path_str),
        }
    }

    fn display_action(&self, call: &ToolCall) -> String {
        let path = call.get_string("path").unwrap_or_default();
        match call.get_string("mode") {
            Some("Directory") => format!("Listing directory: {}", path),
            Some("Search") => format!(
                "Searching {} for {}",
                path,
                call.get_string("pattern").unwrap_or_default()
            ),
            Some("Line") => format!(
                "Reading lines {}-{} of {}",
                call.get_i64("start_line").unwrap_or_default(),
                call.get_i64("end_line").unwrap_or_default(),
                path
            ),
            _ => format!("Reading file: {}", path),
        }
    }
}

async fn read_text(path: &Path, display: &str) -> Result<String, ToolError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ToolError::from_io(&e, display))
}

/// Inclusive line range. Negative indices count from the end
/// (`line_count + index + 1`); both bounds are clamped to `[1, line_count]`.
fn select_lines(content: &str, start: i64, end: i64) -> Result<String, String> {
    if start == 0 || end == 0 {
        return Err(
            "start_line and end_line must be non-zero (1-based; negative values count from the end)"
                .to_string(),
        );
    }

    let lines: Vec<&str> = content.lines().collect();
    let count = lines.len() as i64;
    if count == 0 {
        return Ok(String::new());
    }

    let normalize = |i: i64| if i < 0 { count + i + 1 } else { i };
    let first = normalize(start).clamp(1, count);
    let last = normalize(end).clamp(1, count);
    if first > last {
        return Err(format!(
            "start_line {} resolves after end_line {} (file has {} lines)",
            start, end, count
        ));
    }

    Ok(lines[(first - 1) as usize..last as usize].join("\n"))
}

/// One block per matching line: `context` lines either side, the match
/// marked with `>`, blocks separated by `--`.
fn search_lines(content: &str, pattern: &str, context: usize) -> Result<(String, usize), String> {
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| format!("invalid pattern '{}': {}", pattern, e))?;

    let lines: Vec<&str> = content.lines().collect();
    let matches: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| regex.is_match(line))
        .map(|(i, _)| i)
        .collect();

    if matches.is_empty() {
        return Ok(("No matches found".to_string(), 0));
    }

    let width = lines.len().to_string().len();
    let blocks: Vec<String> = matches
        .iter()
        .map(|&hit| {
            let from = hit.saturating_sub(context);
            let to = (hit + context).min(lines.len() - 1);
            (from..=to)
                .map(|i| {
                    let marker = if i == hit { '>' } else { ' ' };
                    format!("{}{:>width$}: {}", marker, i + 1, lines[i], width = width)
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect();

    Ok((blocks.join("\n--\n"), matches.len()))
}

/// Paths relative to `dir`, directories suffixed with `/`, sorted
fn list_recursive(dir: &Path, depth: usize) -> std::io::Result<String> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(depth)
        .sort_by_file_name()
    {
        let entry = entry.map_err(std::io::Error::other)?;
        let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
        let mut line = relative.display().to_string();
        if entry.file_type().is_dir() {
            line.push('/');
        }
        entries.push(line);
    }
    Ok(entries.join("\n"))
}

/// `ls -la` style listing: type and permissions, size, modification time, name
fn list_long(dir: &Path) -> std::io::Result<String> {
    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(|e| e.file_name());

    let mut lines = Vec::with_capacity(entries.len());
    for entry in entries {
        let meta = entry.path().symlink_metadata()?;
        let modified = meta
            .modified()
            .map(|t| DateTime::<Local>::from(t).format("%b %e %H:%M").to_string())
            .unwrap_or_else(|_| "-".to_string());
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if meta.file_type().is_symlink()
            && let Ok(target) = fs::read_link(entry.path())
        {
            name = format!("{} -> {}", name, target.display());
        }
        lines.push(format!(
            "{} {:>10} {} {}",
            mode_string(&meta),
            meta.len(),
            modified,
            name
        ));
    }
    Ok(lines.join("\n"))
}

fn mode_string(meta: &fs::Metadata) -> String {
    let kind = if meta.file_type().is_symlink() {
        'l'
    } else if meta.is_dir() {
        'd'
    } else {
        '-'
    };

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = meta.permissions().mode();
        let bits: String = [0o400, 0o200, 0o100, 0o040, 0o020, 0o010, 0o004, 0o002, 0o001]
            .iter()
            .zip("rwxrwxrwx".chars())
            .map(|(bit, c)| if mode & bit != 0 { c } else { '-' })
            .collect();
        format!("{}{}", kind, bits)
    }

    #[cfg(not(unix))]
    {
        let write = if meta.permissions().readonly() { '-' } else { 'w' };
        format!("{}r{}-------", kind, write)
    }
}
