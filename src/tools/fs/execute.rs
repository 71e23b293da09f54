//! execute tool: run a command in the sandboxed workspace.
//!
//! Only registered when the session backend advertises the sandbox
//! capability.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::tools::tool::{require_str, Tool};
use crate::tools::ToolRuntime;

pub struct ExecuteTool;

#[async_trait]
impl Tool for ExecuteTool {
    fn name(&self) -> String {
        "execute".to_string()
    }

    fn description(&self) -> String {
        "Run a shell command inside the sandboxed workspace. Returns stdout, stderr, \
         and the exit code; long-running commands can be bounded with a timeout."
            .to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": { "type": "string", "description": "The command to run" },
                "timeout": { "type": "integer", "description": "Timeout in seconds; unlimited when omitted" }
            },
            "required": ["command"]
        })
    }

    async fn run(&self, input: Value, runtime: &ToolRuntime) -> Result<String, ToolError> {
        let command = require_str(&input, "command")?;
        let timeout = input
            .get("timeout")
            .and_then(Value::as_u64)
            .map(Duration::from_secs);
        let Some(sandbox) = runtime.sandbox().await else {
            return Ok("Error: The workspace backend does not support command execution".to_string());
        };
        let response = sandbox.execute(command, timeout).await;
        if response.timed_out {
            return Ok(format!("Error: Command timed out: {command}"));
        }
        let mut out = String::new();
        if !response.stdout.is_empty() {
            out.push_str(&response.stdout);
        }
        if !response.stderr.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str("stderr:\n");
            out.push_str(&response.stderr);
        }
        if response.exit_code != 0 {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("(exit code {})", response.exit_code));
        }
        if out.is_empty() {
            out.push_str("(no output)");
        }
        Ok(out)
    }
}
