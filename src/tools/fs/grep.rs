//! grep tool: regex search across workspace files.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::tools::tool::{require_str, Tool};
use crate::tools::ToolRuntime;

pub struct GrepTool;

#[async_trait]
impl Tool for GrepTool {
    fn name(&self) -> String {
        "grep".to_string()
    }

    fn description(&self) -> String {
        "Search file contents with a regular expression. Optionally restrict to a \
         path (file or directory) and filter candidate files with a glob."
            .to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "pattern": { "type": "string", "description": "Regular expression to search for" },
                "path": { "type": "string", "description": "File or directory to search; default the whole workspace" },
                "glob": { "type": "string", "description": "Glob filter on candidate files (e.g. '**/*.rs')" }
            },
            "required": ["pattern"]
        })
    }

    async fn run(&self, input: Value, runtime: &ToolRuntime) -> Result<String, ToolError> {
        let pattern = require_str(&input, "pattern")?;
        let path = input.get("path").and_then(Value::as_str);
        let glob = input.get("glob").and_then(Value::as_str);
        let backend = runtime.backend().await;
        match backend.grep_raw(pattern, path, glob).await {
            Ok(matches) if matches.is_empty() => Ok(format!("No matches for '{pattern}'")),
            Ok(matches) => Ok(matches
                .into_iter()
                .map(|m| format!("{}:{}: {}", m.path, m.line, m.text))
                .collect::<Vec<_>>()
                .join("\n")),
            Err(error) => Ok(error),
        }
    }
}
