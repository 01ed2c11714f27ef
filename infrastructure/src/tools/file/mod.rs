//! File operation tools: read_file, write_file

pub mod read;
pub mod write;

pub use read::{READ_FILE, ReadFileTool, read_file_definition};
pub use write::{WRITE_FILE, WriteFileTool, write_file_definition};

use std::path::PathBuf;

/// Expand a leading `~` to the home directory. Other paths are used as given.
pub(crate) fn resolve_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}
