//! Approval gating for side-effecting tools.
//!
//! The hook is a pluggable predicate consulted before a gated tool runs.
//! `Defer` is a suspension point: the toolset reports it upward and the
//! enclosing agent loop decides how to resume; the workspace never blocks.

use async_trait::async_trait;
use serde_json::Value;

/// Outcome of reviewing a pending tool call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApprovalDecision {
    Approve,
    Reject,
    Defer,
}

/// Callback reviewing a gated tool call before it runs.
#[async_trait]
pub trait ApprovalHook: Send + Sync {
    async fn review(&self, tool_name: &str, arguments: &Value) -> ApprovalDecision;
}

/// Hook that approves everything. Default when no reviewer is configured.
pub struct ApproveAll;

#[async_trait]
impl ApprovalHook for ApproveAll {
    async fn review(&self, _tool_name: &str, _arguments: &Value) -> ApprovalDecision {
        ApprovalDecision::Approve
    }
}
