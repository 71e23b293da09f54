//! Shared agent state: the workspace backend handle plus the mutable session
//! data (todos, skills, subagent cache) the tools and prompt fragments read.

use std::collections::HashMap;
use std::sync::Arc;

use crate::backends::{FileBackend, SandboxBackend, StateBackend};
use crate::skills::Skill;
use crate::subagents::SubagentHandle;
use crate::todo::Todo;

/// Backend handle with the sandbox capability resolved at construction time.
///
/// Whether `execute` is available is a property of the backend the session
/// was built with, not something probed per call; the toolset asks once.
#[derive(Clone)]
pub struct BackendHandle {
    backend: Arc<dyn FileBackend>,
    sandbox: Option<Arc<dyn SandboxBackend>>,
}

impl BackendHandle {
    /// A backend with file operations only.
    pub fn pure(backend: Arc<dyn FileBackend>) -> Self {
        Self {
            backend,
            sandbox: None,
        }
    }

    /// A backend that also executes commands.
    pub fn sandboxed<S: SandboxBackend + 'static>(backend: Arc<S>) -> Self {
        Self {
            backend: backend.clone(),
            sandbox: Some(backend),
        }
    }

    pub fn backend(&self) -> Arc<dyn FileBackend> {
        self.backend.clone()
    }

    pub fn sandbox(&self) -> Option<Arc<dyn SandboxBackend>> {
        self.sandbox.clone()
    }

    pub fn has_sandbox(&self) -> bool {
        self.sandbox.is_some()
    }
}

/// Per-session agent state. Owned by one session; wrap in a mutex when tools
/// run against it.
pub struct AgentState {
    backend: BackendHandle,
    pub todos: Vec<Todo>,
    pub skills: Vec<Skill>,
    /// Name-keyed cache of compiled subagents.
    pub subagents: HashMap<String, SubagentHandle>,
    /// Set when the session uses the in-memory backend; surfaced for prompt
    /// context only.
    memory: Option<Arc<StateBackend>>,
}

impl AgentState {
    pub fn new(backend: BackendHandle) -> Self {
        Self {
            backend,
            todos: Vec::new(),
            skills: Vec::new(),
            subagents: HashMap::new(),
            memory: None,
        }
    }

    /// State over a fresh in-memory backend, with the file map exposed for
    /// prompt context.
    pub fn in_memory() -> Self {
        let store = Arc::new(StateBackend::new());
        let mut state = Self::new(BackendHandle::pure(store.clone()));
        state.memory = Some(store);
        state
    }

    pub fn with_skills(mut self, skills: Vec<Skill>) -> Self {
        self.skills = skills;
        self
    }

    pub fn backend_handle(&self) -> &BackendHandle {
        &self.backend
    }

    pub fn backend(&self) -> Arc<dyn FileBackend> {
        self.backend.backend()
    }

    pub fn sandbox(&self) -> Option<Arc<dyn SandboxBackend>> {
        self.backend.sandbox()
    }

    pub fn has_sandbox(&self) -> bool {
        self.backend.has_sandbox()
    }

    /// Paths currently held by the in-memory backend; empty for other
    /// backends.
    pub fn files_in_memory(&self) -> Vec<String> {
        self.memory
            .as_ref()
            .map(|store| store.paths())
            .unwrap_or_default()
    }
}
