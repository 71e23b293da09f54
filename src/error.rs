//! Error types for backends and tools.
//!
//! Only constructor-time misconfiguration is fatal and surfaces as
//! [BackendError]. Everything the LLM should see (missing files, ambiguous
//! edits, bad regexes) is reported inline as an `"Error: ..."` string so the
//! result stays inspectable in the conversation.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal backend configuration errors.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Workspace root does not exist: {0} (use virtual mode to create it)")]
    RootNotFound(PathBuf),
    #[error("Route prefix must start and end with '/' (e.g. \"/memories/\"): {0}")]
    InvalidRoutePrefix(String),
    #[error("Route prefixes overlap: {0} and {1}")]
    OverlappingRoutes(String, String),
    #[error("Path escapes workspace root: {0}")]
    PathEscapesRoot(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Structural tool-dispatch errors (malformed input, unknown tool).
///
/// Workspace-level failures are not represented here; they come back as
/// `"Error: ..."` tool output per the inline-error convention.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    ToolNotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Missing required input: {0}")]
    MissingInput(String),
    #[error("Execution failed: {0}")]
    ExecutionError(String),
}

impl From<String> for ToolError {
    fn from(s: String) -> Self {
        ToolError::ExecutionError(s)
    }
}
