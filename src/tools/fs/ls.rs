//! list_dir tool: directory listings as JSON entries.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::tools::tool::Tool;
use crate::tools::ToolRuntime;

pub struct ListDirTool;

#[async_trait]
impl Tool for ListDirTool {
    fn name(&self) -> String {
        "list_dir".to_string()
    }

    fn description(&self) -> String {
        "List files and directories at a path. Returns name, type, size, and \
         child count for directories."
            .to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": { "type": "string", "description": "Directory path; default /" }
            }
        })
    }

    async fn run(&self, input: Value, runtime: &ToolRuntime) -> Result<String, ToolError> {
        let path = input.get("path").and_then(Value::as_str).unwrap_or("/");
        let backend = runtime.backend().await;
        let entries: Vec<Value> = backend
            .ls_info(path)
            .await
            .into_iter()
            .map(|info| {
                let mut entry = json!({
                    "name": info.name,
                    "path": info.path,
                    "type": if info.is_dir { "dir" } else { "file" },
                    "size": info.size,
                });
                if let Some(count) = info.child_count {
                    entry["child_count"] = json!(count);
                }
                if let Some(modified) = info.modified_at {
                    entry["modified"] = json!(modified);
                }
                entry
            })
            .collect();
        serde_json::to_string_pretty(&entries)
            .map_err(|e| ToolError::ExecutionError(e.to_string()))
    }
}
