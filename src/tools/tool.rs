//! Tool trait: the LLM-callable surface of the toolkit.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::runtime::ToolRuntime;
use crate::error::ToolError;

/// An operation the agent can invoke. Results are plain strings fed back to
/// the LLM; workspace failures are reported inline as `"Error: ..."` text
/// rather than through the error channel, which is reserved for malformed
/// invocations.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> String;

    /// What the tool does and when to use it, for the tool listing.
    fn description(&self) -> String;

    /// JSON schema of the tool's arguments, OpenAI function-call style.
    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "input": {
                    "type": "string",
                    "description": self.description()
                }
            },
            "required": ["input"]
        })
    }

    async fn run(&self, input: Value, runtime: &ToolRuntime) -> Result<String, ToolError>;
}

/// Pull a required string argument out of a tool input object.
pub(crate) fn require_str<'a>(input: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    input
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolError::MissingInput(key.to_string()))
}
