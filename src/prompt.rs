//! Dynamic system prompt assembly.
//!
//! Each subsystem contributes a pure `fragment(state) -> String`; the agent
//! runtime calls [get_system_prompt] after every turn and concatenates the
//! non-empty fragments with blank-line separators.

use crate::state::AgentState;
use crate::{skills, subagents, todo, tools};

/// Assemble the per-turn system prompt section from the current state.
pub fn get_system_prompt(state: &AgentState) -> String {
    let fragments = [
        todo::system_prompt_fragment(state),
        tools::fs::system_prompt_fragment(state),
        subagents::system_prompt_fragment(state),
        skills::system_prompt_fragment(&state.skills),
    ];
    fragments
        .into_iter()
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::skills::Skill;
    use crate::todo::{Todo, TodoStatus};

    #[test]
    fn joins_nonempty_fragments_with_blank_lines() {
        let state = AgentState::in_memory();
        let prompt = get_system_prompt(&state);
        assert!(prompt.contains("## Task Management"));
        assert!(prompt.contains("## Filesystem Tools"));
        assert!(prompt.contains("## Task Delegation"));
        // No skills registered, so the skills section is absent entirely.
        assert!(!prompt.contains("## Available Skills"));
        assert!(!prompt.contains("\n\n\n"));
    }

    #[test]
    fn reflects_session_state() {
        let mut state = AgentState::in_memory().with_skills(vec![Skill {
            name: "arxiv".to_string(),
            description: "Search papers".to_string(),
            path: PathBuf::from("/skills/arxiv"),
            version: String::new(),
            author: String::new(),
            tags: Vec::new(),
            frontmatter_loaded: true,
            resources: Vec::new(),
        }]);
        state.todos.push(Todo {
            content: "Write tests".to_string(),
            status: TodoStatus::InProgress,
            active_form: "Writing tests".to_string(),
        });
        let prompt = get_system_prompt(&state);
        assert!(prompt.contains("- [*] Write tests"));
        assert!(prompt.contains("**arxiv**"));
    }
}
