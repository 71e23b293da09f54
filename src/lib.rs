//! # deep-agent
//!
//! Core toolkit for building deep agents: a virtualized, pluggable workspace
//! filesystem the agent reads, writes, edits, and searches, coordinated with
//! a todo planner and a skills registry through shared session state and
//! dynamic system prompts.
//!
//! ## Overview
//!
//! - **Backends** — one semantic contract, three storage strategies:
//!   [StateBackend] (in-memory), [FilesystemBackend] (host files under a
//!   sandboxed root), and [CompositeBackend] (prefix-routed federation).
//!   [LocalSandbox] adds command execution on top of a filesystem workspace.
//! - **Tools** — `read_file`, `write_file`, `edit_file`, `list_dir`, `glob`,
//!   `grep`, and `execute` (sandbox-only), plus `write_todos` and
//!   `load_skill`, dispatched through a [Toolset] with approval gating.
//! - **Planning** — a session todo list projected into the system prompt.
//! - **Skills** — directories of `SKILL.md` packages discovered eagerly
//!   (frontmatter only) and loaded on demand.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use deep_agent::prompt::get_system_prompt;
//! use deep_agent::state::AgentState;
//! use deep_agent::tools::{ToolDispatch, ToolRuntime, Toolset, ToolsetConfig};
//! use serde_json::json;
//! use tokio::sync::Mutex;
//!
//! # async fn run() {
//! let state = Arc::new(Mutex::new(AgentState::in_memory()));
//! let toolset = {
//!     let guard = state.lock().await;
//!     Toolset::deep_agent(guard.backend_handle(), ToolsetConfig::default())
//! };
//! let runtime = ToolRuntime::new(state.clone());
//!
//! let result = toolset
//!     .dispatch("write_file", json!({ "path": "/hello.txt", "content": "hi" }), &runtime)
//!     .await;
//! assert!(matches!(result, ToolDispatch::Completed(_)));
//! let prompt = get_system_prompt(&*state.lock().await);
//! assert!(prompt.contains("/hello.txt"));
//! # }
//! ```

pub mod backends;
pub mod error;
pub mod prompt;
pub mod skills;
pub mod state;
pub mod subagents;
pub mod todo;
pub mod tools;

pub use backends::{
    CompositeBackend, EditResult, ExecuteResponse, FileBackend, FileInfo, FilesystemBackend,
    GrepMatch, LocalSandbox, SandboxBackend, StateBackend, WriteResult, DEFAULT_READ_LIMIT,
};
pub use error::{BackendError, ToolError};
pub use prompt::get_system_prompt;
pub use skills::{
    discover_skills, load_skill_instructions, parse_skill_md, Skill, SkillDirectory,
};
pub use state::{AgentState, BackendHandle};
pub use subagents::SubagentHandle;
pub use todo::{Todo, TodoStatus};
pub use tools::{
    ApprovalDecision, ApprovalHook, ApproveAll, Tool, ToolDispatch, ToolRuntime, Toolset,
    ToolsetConfig,
};
