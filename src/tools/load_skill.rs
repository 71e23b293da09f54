//! load_skill tool: load a discovered skill's full instructions on demand.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::skills::load_skill_instructions;
use crate::tools::tool::{require_str, Tool};
use crate::tools::ToolRuntime;

pub struct LoadSkillTool;

#[async_trait]
impl Tool for LoadSkillTool {
    fn name(&self) -> String {
        "load_skill".to_string()
    }

    fn description(&self) -> String {
        "Load the full instructions of an available skill by name. Do this before \
         applying a skill."
            .to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "Skill name as listed in Available Skills" }
            },
            "required": ["name"]
        })
    }

    async fn run(&self, input: Value, runtime: &ToolRuntime) -> Result<String, ToolError> {
        let name = require_str(&input, "name")?;
        let state = runtime.state().await;
        let Some(skill) = state.skills.iter().find(|s| s.name == name) else {
            let available: Vec<&str> = state.skills.iter().map(|s| s.name.as_str()).collect();
            return Ok(format!(
                "Error: Skill '{name}' not found. Available skills: {}",
                if available.is_empty() {
                    "(none)".to_string()
                } else {
                    available.join(", ")
                }
            ));
        };
        let instructions = load_skill_instructions(&skill.path);
        if instructions.starts_with("Error") {
            return Ok(instructions);
        }
        let mut out = format!("# Skill: {name}\n\n{instructions}");
        if !skill.resources.is_empty() {
            out.push_str(&format!("\n\nResources: {}", skill.resources.join(", ")));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::Mutex;

    use super::*;
    use crate::skills::{discover_skills, SkillDirectory};
    use crate::state::AgentState;

    #[tokio::test]
    async fn loads_instructions_by_name() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("my-skill");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("SKILL.md"),
            "---\nname: my-skill\ndescription: d\n---\n\n# Detailed Instructions\n\n1. Step one\n",
        )
        .unwrap();
        std::fs::write(dir.join("template.py"), "# template").unwrap();

        let skills = discover_skills(&[SkillDirectory::new(tmp.path())]);
        let state = AgentState::in_memory().with_skills(skills);
        let runtime = ToolRuntime::new(Arc::new(Mutex::new(state)));

        let out = LoadSkillTool
            .run(json!({ "name": "my-skill" }), &runtime)
            .await
            .unwrap();
        assert!(out.contains("# Detailed Instructions"));
        assert!(out.contains("Resources: template.py"));

        let missing = LoadSkillTool
            .run(json!({ "name": "other" }), &runtime)
            .await
            .unwrap();
        assert!(missing.starts_with("Error"));
        assert!(missing.contains("my-skill"));
    }
}
