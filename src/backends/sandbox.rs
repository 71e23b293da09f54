//! Optional sandbox capability: command execution alongside the file
//! operations.
//!
//! The toolset probes for this capability once, at construction time, and
//! registers the `execute` tool only when it is present. [LocalSandbox] runs
//! commands as host processes rooted in a [FilesystemBackend] workspace;
//! container-based sandboxes implement the same trait elsewhere.

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::file_backend::{EditResult, FileBackend, FileInfo, GrepMatch, WriteResult};
use super::filesystem::FilesystemBackend;

/// Outcome of a sandboxed command. Non-zero exit codes and timeouts are
/// data, not errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecuteResponse {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub timed_out: bool,
}

/// A backend that can also execute commands inside its workspace.
#[async_trait]
pub trait SandboxBackend: FileBackend {
    /// Run `command` in the workspace. The timeout is advisory: when it
    /// lapses the process is killed and `timed_out` is set.
    async fn execute(&self, command: &str, timeout: Option<Duration>) -> ExecuteResponse;
}

/// Sandbox that runs `sh -c <command>` with the backend root as working
/// directory. File operations delegate to the wrapped [FilesystemBackend].
pub struct LocalSandbox {
    inner: FilesystemBackend,
}

impl LocalSandbox {
    pub fn new(inner: FilesystemBackend) -> Self {
        Self { inner }
    }

    pub fn backend(&self) -> &FilesystemBackend {
        &self.inner
    }
}

#[async_trait]
impl FileBackend for LocalSandbox {
    async fn read(&self, file_path: &str, offset: usize, limit: usize) -> String {
        self.inner.read(file_path, offset, limit).await
    }

    async fn write(&self, file_path: &str, content: &str) -> WriteResult {
        self.inner.write(file_path, content).await
    }

    async fn edit(
        &self,
        file_path: &str,
        old_string: &str,
        new_string: &str,
        replace_all: bool,
    ) -> EditResult {
        self.inner.edit(file_path, old_string, new_string, replace_all).await
    }

    async fn ls_info(&self, path: &str) -> Vec<FileInfo> {
        self.inner.ls_info(path).await
    }

    async fn glob_info(&self, pattern: &str, path: &str) -> Vec<FileInfo> {
        self.inner.glob_info(pattern, path).await
    }

    async fn grep_raw(
        &self,
        pattern: &str,
        path: Option<&str>,
        glob: Option<&str>,
    ) -> Result<Vec<GrepMatch>, String> {
        self.inner.grep_raw(pattern, path, glob).await
    }
}

#[async_trait]
impl SandboxBackend for LocalSandbox {
    async fn execute(&self, command: &str, timeout: Option<Duration>) -> ExecuteResponse {
        log::debug!("executing command in {}: {command}", self.inner.root().display());
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(command)
            .current_dir(self.inner.root())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true);
        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                return ExecuteResponse {
                    stdout: String::new(),
                    stderr: format!("Failed to spawn command: {e}"),
                    exit_code: -1,
                    timed_out: false,
                }
            }
        };
        let waited = match timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(result) => result,
                Err(_) => {
                    // Dropping the future killed the child (kill_on_drop).
                    return ExecuteResponse {
                        stdout: String::new(),
                        stderr: String::new(),
                        exit_code: -1,
                        timed_out: true,
                    };
                }
            },
            None => child.wait_with_output().await,
        };
        match waited {
            Ok(output) => ExecuteResponse {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                exit_code: output.status.code().unwrap_or(-1),
                timed_out: false,
            },
            Err(e) => ExecuteResponse {
                stdout: String::new(),
                stderr: format!("Failed to wait for command: {e}"),
                exit_code: -1,
                timed_out: false,
            },
        }
    }
}
