//! Session todo planner: a task list the agent maintains through the
//! `write_todos` tool and that is projected into the system prompt each turn.

use serde::{Deserialize, Serialize};

use crate::state::AgentState;

/// Status of a todo item. The planner prompt asks for at most one
/// `in_progress` item at a time; storage does not enforce it.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TodoStatus {
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Pending => "[ ]",
            Self::InProgress => "[*]",
            Self::Completed => "[x]",
        }
    }
}

/// A single planned task.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    /// Imperative task description (e.g. "Implement feature X").
    pub content: String,
    pub status: TodoStatus,
    /// Present-continuous form shown while the task runs.
    pub active_form: String,
}

/// Stable guidance on when and how to use the planner.
pub const TODO_SYSTEM_PROMPT: &str = "## Task Management

You have access to the `write_todos` tool to track your tasks.
Use it frequently to:
- Plan complex tasks before starting
- Show progress to the user
- Keep track of what's done and what's pending

When working on tasks:
1. Break down complex tasks into smaller steps
2. Mark exactly one task as in_progress at a time
3. Mark tasks as completed immediately after finishing";

/// Planner section of the dynamic system prompt: guidance, plus the current
/// list when one exists.
pub fn system_prompt_fragment(state: &AgentState) -> String {
    if state.todos.is_empty() {
        return TODO_SYSTEM_PROMPT.to_string();
    }
    let mut lines = vec![TODO_SYSTEM_PROMPT.to_string(), String::new(), "## Current Todos".to_string()];
    for todo in &state.todos {
        lines.push(format!("- {} {}", todo.status.icon(), todo.content));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(content: &str, status: TodoStatus) -> Todo {
        Todo {
            content: content.to_string(),
            status,
            active_form: format!("Working on {content}"),
        }
    }

    #[test]
    fn status_parses_from_snake_case() {
        let status: TodoStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, TodoStatus::InProgress);
        assert_eq!(TodoStatus::default(), TodoStatus::Pending);
    }

    #[test]
    fn fragment_without_todos_is_just_guidance() {
        let state = AgentState::in_memory();
        let prompt = system_prompt_fragment(&state);
        assert!(prompt.contains("Task Management"));
        assert!(prompt.contains("write_todos"));
        assert!(!prompt.contains("Current Todos"));
    }

    #[test]
    fn fragment_renders_status_icons() {
        let mut state = AgentState::in_memory();
        state.todos = vec![
            todo("Task 1", TodoStatus::Completed),
            todo("Task 2", TodoStatus::InProgress),
            todo("Task 3", TodoStatus::Pending),
        ];
        let prompt = system_prompt_fragment(&state);
        assert!(prompt.contains("## Current Todos"));
        assert!(prompt.contains("- [x] Task 1"));
        assert!(prompt.contains("- [*] Task 2"));
        assert!(prompt.contains("- [ ] Task 3"));
    }
}
