//! read_file tool: gutter-numbered file reads with optional offset/limit.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::backends::DEFAULT_READ_LIMIT;
use crate::error::ToolError;
use crate::tools::tool::{require_str, Tool};
use crate::tools::ToolRuntime;

pub struct ReadFileTool;

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> String {
        "read_file".to_string()
    }

    fn description(&self) -> String {
        "Read a file from the workspace. Lines come back numbered; use offset \
         (0-based line index) and limit to page through large files."
            .to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": { "type": "string", "description": "Logical file path, e.g. /src/main.rs" },
                "offset": { "type": "integer", "description": "First line to return (0-based); default 0" },
                "limit": { "type": "integer", "description": "Maximum lines to return; default 2000" }
            },
            "required": ["path"]
        })
    }

    async fn run(&self, input: Value, runtime: &ToolRuntime) -> Result<String, ToolError> {
        let path = require_str(&input, "path")?;
        let offset = input.get("offset").and_then(Value::as_u64).unwrap_or(0) as usize;
        let limit = input
            .get("limit")
            .and_then(Value::as_u64)
            .map(|l| l as usize)
            .unwrap_or(DEFAULT_READ_LIMIT);
        let backend = runtime.backend().await;
        Ok(backend.read(path, offset, limit).await)
    }
}
