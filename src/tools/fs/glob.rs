//! glob tool: list files matching a shell-glob pattern.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::tools::tool::{require_str, Tool};
use crate::tools::ToolRuntime;

pub struct GlobTool;

#[async_trait]
impl Tool for GlobTool {
    fn name(&self) -> String {
        "glob".to_string()
    }

    fn description(&self) -> String {
        "Find files matching a glob pattern (e.g. '**/*.rs'). `*` matches within one \
         path segment, `**` spans segments."
            .to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "pattern": { "type": "string", "description": "Glob pattern, matched relative to path" },
                "path": { "type": "string", "description": "Base directory; default /" }
            },
            "required": ["pattern"]
        })
    }

    async fn run(&self, input: Value, runtime: &ToolRuntime) -> Result<String, ToolError> {
        let pattern = require_str(&input, "pattern")?;
        let path = input.get("path").and_then(Value::as_str).unwrap_or("/");
        let backend = runtime.backend().await;
        let paths: Vec<String> = backend
            .glob_info(pattern, path)
            .await
            .into_iter()
            .map(|info| info.path)
            .collect();
        if paths.is_empty() {
            return Ok(format!("No files matching '{pattern}'"));
        }
        serde_json::to_string_pretty(&paths).map_err(|e| ToolError::ExecutionError(e.to_string()))
    }
}
