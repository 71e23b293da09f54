//! write_todos tool: replace the session todo list.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::todo::{Todo, TodoStatus};
use crate::tools::tool::Tool;
use crate::tools::ToolRuntime;

pub struct WriteTodosTool;

#[async_trait]
impl Tool for WriteTodosTool {
    fn name(&self) -> String {
        "write_todos".to_string()
    }

    fn description(&self) -> String {
        "Replace the session todo list. Use it to break complex work into steps and \
         track progress; keep exactly one item in_progress at a time and mark items \
         completed immediately after finishing them."
            .to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "todos": {
                    "type": "array",
                    "description": "The full todo list; this replaces the previous list",
                    "items": {
                        "type": "object",
                        "properties": {
                            "content": { "type": "string", "description": "Task in imperative form" },
                            "status": { "type": "string", "enum": ["pending", "in_progress", "completed"] },
                            "active_form": { "type": "string", "description": "Present continuous form shown while running" }
                        },
                        "required": ["content", "status", "active_form"]
                    }
                }
            },
            "required": ["todos"]
        })
    }

    async fn run(&self, input: Value, runtime: &ToolRuntime) -> Result<String, ToolError> {
        let todos_value = input
            .get("todos")
            .cloned()
            .ok_or_else(|| ToolError::MissingInput("todos".to_string()))?;
        let todos: Vec<Todo> = serde_json::from_value(todos_value)
            .map_err(|e| ToolError::InvalidInput(format!("todos: {e}")))?;

        let mut completed = 0;
        let mut in_progress = 0;
        let mut pending = 0;
        for todo in &todos {
            match todo.status {
                TodoStatus::Completed => completed += 1,
                TodoStatus::InProgress => in_progress += 1,
                TodoStatus::Pending => pending += 1,
            }
        }
        let total = todos.len();
        runtime.state().await.todos = todos;
        Ok(format!(
            "Updated {total} todos: {completed} completed, {in_progress} in progress, {pending} pending"
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::Mutex;

    use super::*;
    use crate::state::AgentState;

    #[tokio::test]
    async fn replaces_list_and_summarizes_counts() {
        let state = Arc::new(Mutex::new(AgentState::in_memory()));
        let runtime = ToolRuntime::new(state.clone());
        let tool = WriteTodosTool;

        let input = json!({
            "todos": [
                { "content": "Task 1", "status": "completed", "active_form": "Completing task 1" },
                { "content": "Task 2", "status": "in_progress", "active_form": "Working on task 2" },
                { "content": "Task 3", "status": "pending", "active_form": "Starting task 3" }
            ]
        });
        let summary = tool.run(input, &runtime).await.unwrap();
        assert_eq!(summary, "Updated 3 todos: 1 completed, 1 in progress, 1 pending");
        assert_eq!(state.lock().await.todos.len(), 3);

        let summary = tool.run(json!({ "todos": [] }), &runtime).await.unwrap();
        assert_eq!(summary, "Updated 0 todos: 0 completed, 0 in progress, 0 pending");
        assert!(state.lock().await.todos.is_empty());
    }

    #[tokio::test]
    async fn malformed_input_is_a_tool_error() {
        let runtime = ToolRuntime::new(Arc::new(Mutex::new(AgentState::in_memory())));
        let err = WriteTodosTool
            .run(json!({ "todos": [{ "status": "bogus" }] }), &runtime)
            .await;
        assert!(err.is_err());
    }
}
