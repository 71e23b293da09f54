//! Tool surface: the trait, runtime, approval gating, and the concrete
//! workspace/planning/skill tools.

mod approval;
mod load_skill;
mod runtime;
mod tool;
mod toolset;
mod write_todos;

pub mod fs;

pub use approval::{ApprovalDecision, ApprovalHook, ApproveAll};
pub use fs::{
    EditFileTool, ExecuteTool, GlobTool, GrepTool, ListDirTool, ReadFileTool, WriteFileTool,
};
pub use load_skill::LoadSkillTool;
pub use runtime::ToolRuntime;
pub use tool::Tool;
pub use toolset::{ToolDispatch, Toolset, ToolsetConfig};
pub use write_todos::WriteTodosTool;
