//! Subagent handle cache. Orchestration happens outside the core; the state
//! only keeps name-keyed handles so repeated delegations reuse the same
//! compiled subagent, and projects the cache into the system prompt.

use crate::state::AgentState;

/// Cached handle for a compiled subagent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubagentHandle {
    pub name: String,
    pub description: String,
}

impl SubagentHandle {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

pub const SUBAGENT_SYSTEM_PROMPT: &str = "## Task Delegation

Delegate self-contained multi-step work to subagents instead of cluttering
the main context. Reuse an existing subagent when one fits the task.";

/// Delegation section of the dynamic system prompt.
pub fn system_prompt_fragment(state: &AgentState) -> String {
    if state.subagents.is_empty() {
        return SUBAGENT_SYSTEM_PROMPT.to_string();
    }
    let mut names: Vec<&str> = state.subagents.keys().map(String::as_str).collect();
    names.sort_unstable();
    let mut lines = vec![
        SUBAGENT_SYSTEM_PROMPT.to_string(),
        String::new(),
        "### Cached Subagents".to_string(),
    ];
    for name in names {
        lines.push(format!("- {name}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_lists_cached_handles() {
        let mut state = AgentState::in_memory();
        let base = system_prompt_fragment(&state);
        assert!(base.contains("Task Delegation"));
        assert!(!base.contains("Cached Subagents"));

        state.subagents.insert(
            "researcher".to_string(),
            SubagentHandle::new("researcher", "Research topics"),
        );
        let prompt = system_prompt_fragment(&state);
        assert!(prompt.contains("### Cached Subagents"));
        assert!(prompt.contains("- researcher"));
    }
}
