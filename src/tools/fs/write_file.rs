//! write_file tool: create or overwrite a file.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::backends::WriteResult;
use crate::error::ToolError;
use crate::tools::tool::{require_str, Tool};
use crate::tools::ToolRuntime;

pub struct WriteFileTool;

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> String {
        "write_file".to_string()
    }

    fn description(&self) -> String {
        "Create or overwrite a file in the workspace. Parent directories are created as needed."
            .to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": { "type": "string", "description": "Logical file path" },
                "content": { "type": "string", "description": "Full file content to write" }
            },
            "required": ["path", "content"]
        })
    }

    async fn run(&self, input: Value, runtime: &ToolRuntime) -> Result<String, ToolError> {
        let path = require_str(&input, "path")?;
        let content = input.get("content").and_then(Value::as_str).unwrap_or("");
        let backend = runtime.backend().await;
        match backend.write(path, content).await {
            WriteResult::Written { path, bytes, lines } => {
                Ok(format!("Wrote {bytes} bytes ({lines} lines) to {path}"))
            }
            WriteResult::Failed { error } => Ok(error),
        }
    }
}
