//! Toolset: tool registration plus approval-gated dispatch.
//!
//! The workspace toolset probes the backend handle once at construction:
//! `execute` is registered only when the sandbox capability is present, and
//! the gated set is fixed by [ToolsetConfig]. Dispatch consults the approval
//! hook before running a gated tool; a deferral is handed back to the agent
//! loop rather than blocking here.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;

use super::approval::{ApprovalDecision, ApprovalHook, ApproveAll};
use super::fs::{
    EditFileTool, ExecuteTool, GlobTool, GrepTool, ListDirTool, ReadFileTool, WriteFileTool,
};
use super::load_skill::LoadSkillTool;
use super::tool::Tool;
use super::write_todos::WriteTodosTool;
use super::ToolRuntime;
use crate::state::BackendHandle;

/// Approval requirements for the workspace tools.
#[derive(Clone, Copy, Debug)]
pub struct ToolsetConfig {
    /// Gate write_file and edit_file behind the approval hook.
    pub require_write_approval: bool,
    /// Gate execute behind the approval hook.
    pub require_execute_approval: bool,
}

impl Default for ToolsetConfig {
    fn default() -> Self {
        Self {
            require_write_approval: false,
            require_execute_approval: true,
        }
    }
}

/// Result of dispatching one tool call.
#[derive(Debug)]
pub enum ToolDispatch {
    /// The tool ran (or was rejected); the string goes back to the LLM.
    Completed(String),
    /// Approval was deferred; the agent loop must resolve it and re-dispatch.
    Deferred { tool: String, arguments: Value },
}

pub struct Toolset {
    tools: Vec<Arc<dyn Tool>>,
    gated: HashSet<String>,
    hook: Arc<dyn ApprovalHook>,
}

impl Toolset {
    /// The workspace toolset: file tools, plus `execute` when the backend is
    /// sandboxed.
    pub fn workspace(backend: &BackendHandle, config: ToolsetConfig) -> Self {
        let mut toolset = Self {
            tools: Vec::new(),
            gated: HashSet::new(),
            hook: Arc::new(ApproveAll),
        };
        toolset.register(Arc::new(ReadFileTool), false);
        toolset.register(Arc::new(WriteFileTool), config.require_write_approval);
        toolset.register(Arc::new(EditFileTool), config.require_write_approval);
        toolset.register(Arc::new(ListDirTool), false);
        toolset.register(Arc::new(GlobTool), false);
        toolset.register(Arc::new(GrepTool), false);
        if backend.has_sandbox() {
            toolset.register(Arc::new(ExecuteTool), config.require_execute_approval);
        }
        toolset
    }

    /// The full deep-agent toolset: workspace tools plus planning and skills.
    pub fn deep_agent(backend: &BackendHandle, config: ToolsetConfig) -> Self {
        let mut toolset = Self::workspace(backend, config);
        toolset.register(Arc::new(WriteTodosTool), false);
        toolset.register(Arc::new(LoadSkillTool), false);
        toolset
    }

    pub fn with_approval_hook(mut self, hook: Arc<dyn ApprovalHook>) -> Self {
        self.hook = hook;
        self
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>, gated: bool) {
        if gated {
            self.gated.insert(tool.name());
        }
        self.tools.push(tool);
    }

    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn is_gated(&self, name: &str) -> bool {
        self.gated.contains(name)
    }

    /// Run one tool call. Tool-level failures come back as `"Error: ..."`
    /// output so the LLM can react to them.
    pub async fn dispatch(&self, name: &str, arguments: Value, runtime: &ToolRuntime) -> ToolDispatch {
        let Some(tool) = self.tools.iter().find(|t| t.name() == name) else {
            return ToolDispatch::Completed(format!("Error: Tool not found: {name}"));
        };
        if self.gated.contains(name) {
            match self.hook.review(name, &arguments).await {
                ApprovalDecision::Approve => {}
                ApprovalDecision::Reject => {
                    log::warn!("tool call rejected by approval hook: {name}");
                    return ToolDispatch::Completed(format!(
                        "Error: Tool call '{name}' was not approved"
                    ));
                }
                ApprovalDecision::Defer => {
                    log::debug!("tool call deferred for approval: {name}");
                    return ToolDispatch::Deferred {
                        tool: name.to_string(),
                        arguments,
                    };
                }
            }
        }
        match tool.run(arguments, runtime).await {
            Ok(output) => ToolDispatch::Completed(output),
            Err(e) => ToolDispatch::Completed(format!("Error: {e}")),
        }
    }
}
