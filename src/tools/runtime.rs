//! Runtime information handed to tools during execution.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::backends::{FileBackend, SandboxBackend};
use crate::state::AgentState;

/// Carries the shared agent state into tool invocations. Tool operations are
/// invoked one at a time from the agent loop, so the state mutex is
/// uncontended in the common case.
#[derive(Clone)]
pub struct ToolRuntime {
    state: Arc<Mutex<AgentState>>,
}

impl ToolRuntime {
    pub fn new(state: Arc<Mutex<AgentState>>) -> Self {
        Self { state }
    }

    pub async fn state(&self) -> MutexGuard<'_, AgentState> {
        self.state.lock().await
    }

    pub fn state_handle(&self) -> Arc<Mutex<AgentState>> {
        self.state.clone()
    }

    /// The session's workspace backend.
    pub async fn backend(&self) -> Arc<dyn FileBackend> {
        self.state.lock().await.backend()
    }

    /// The session's sandbox, when the backend has the capability.
    pub async fn sandbox(&self) -> Option<Arc<dyn SandboxBackend>> {
        self.state.lock().await.sandbox()
    }
}
