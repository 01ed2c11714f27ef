//! Tool implementations for the agent
//!
//! Three tools are offered to the model:
//!
//! | Tool | Module | Confirmation |
//! |------|--------|--------------|
//! | `bash` | [`command`] | when the command matches a [`CommandPolicy`] pattern |
//! | `read_file` | [`file::read`] | never |
//! | `write_file` | [`file::write`] | never |
//!
//! [`ToolRegistry`] dispatches calls by name and [`JsonSchemaToolConverter`]
//! renders the definitions for the Messages API.

pub mod command;
pub mod file;
pub mod policy;

mod registry;
mod schema;

pub use command::{BASH, BashTool, bash_definition};
pub use file::{
    READ_FILE, ReadFileTool, WRITE_FILE, WriteFileTool, read_file_definition,
    write_file_definition,
};
pub use policy::{CommandPolicy, PolicyError};
pub use registry::ToolRegistry;
pub use schema::JsonSchemaToolConverter;
