//! Filesystem tools: the workspace surface exposed to the agent.
//!
//! Seven tools over the session backend: read_file, write_file, edit_file,
//! list_dir, glob, grep, and (when the backend is sandboxed) execute.

mod edit_file;
mod execute;
mod glob;
mod grep;
mod ls;
mod read_file;
mod write_file;

pub use edit_file::EditFileTool;
pub use execute::ExecuteTool;
pub use glob::GlobTool;
pub use grep::GrepTool;
pub use ls::ListDirTool;
pub use read_file::ReadFileTool;
pub use write_file::WriteFileTool;

use crate::state::AgentState;

pub const FS_SYSTEM_PROMPT: &str = "## Filesystem Tools

You can work with files in the workspace:
- `list_dir`, `glob`, and `grep` to explore
- `read_file` before `edit_file`; `write_file` to create or overwrite";

/// Filesystem section of the dynamic system prompt.
pub fn system_prompt_fragment(state: &AgentState) -> String {
    let mut out = FS_SYSTEM_PROMPT.to_string();
    if state.has_sandbox() {
        out.push_str(
            "\n\n### Command Execution\n\nThe workspace is sandboxed; use `execute` to run shell commands inside it.",
        );
    }
    let files = state.files_in_memory();
    if !files.is_empty() {
        out.push_str("\n\n### Files in Memory\n");
        for path in files {
            out.push_str(&format!("\n- {path}"));
        }
    }
    out
}
