//! edit_file tool: exact string replacement with a uniqueness rule.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::backends::EditResult;
use crate::error::ToolError;
use crate::tools::tool::{require_str, Tool};
use crate::tools::ToolRuntime;

pub struct EditFileTool;

#[async_trait]
impl Tool for EditFileTool {
    fn name(&self) -> String {
        "edit_file".to_string()
    }

    fn description(&self) -> String {
        "Edit a file by exact string replacement. old_string must match exactly once \
         unless replace_all is set."
            .to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": { "type": "string", "description": "Logical file path" },
                "old_string": { "type": "string", "description": "Exact text to replace" },
                "new_string": { "type": "string", "description": "Replacement text" },
                "replace_all": { "type": "boolean", "description": "Replace every occurrence; default false" }
            },
            "required": ["path", "old_string", "new_string"]
        })
    }

    async fn run(&self, input: Value, runtime: &ToolRuntime) -> Result<String, ToolError> {
        let path = require_str(&input, "path")?;
        let old_string = require_str(&input, "old_string")?;
        let new_string = input.get("new_string").and_then(Value::as_str).unwrap_or("");
        let replace_all = input
            .get("replace_all")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let backend = runtime.backend().await;
        match backend.edit(path, old_string, new_string, replace_all).await {
            EditResult::Edited { path, occurrences } => {
                Ok(format!("Replaced {occurrences} occurrence(s) in {path}"))
            }
            EditResult::Failed { error } => Ok(error),
        }
    }
}
