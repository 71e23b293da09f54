//! Host-filesystem backend rooted at a directory.
//!
//! Logical paths map to `root/<path>`; anything that resolves outside the
//! root is rejected even when it slipped past segment validation. Output
//! contracts (read gutter, edit uniqueness, entry shapes, sort order) match
//! the in-memory backend exactly; only storage differs.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::UNIX_EPOCH;

use async_trait::async_trait;
use regex::Regex;

use super::file_backend::{
    apply_edit, glob_options, relative_to, render_read, EditResult, FileBackend, FileInfo,
    GrepMatch, WriteResult,
};
use super::path::{normalize_path, resolve_in_root, validate_path};
use crate::error::BackendError;

/// Backend that reads and writes real files under a sandboxed root.
pub struct FilesystemBackend {
    root: PathBuf,
    external_tools: bool,
}

impl FilesystemBackend {
    /// Open an existing root directory. Fails when the root does not exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, BackendError> {
        let root: PathBuf = root.into();
        if !root.is_dir() {
            return Err(BackendError::RootNotFound(root));
        }
        let root = root.canonicalize()?;
        Ok(Self {
            root,
            external_tools: false,
        })
    }

    /// Open a root in virtual mode: the directory is created when missing.
    pub fn new_virtual(root: impl Into<PathBuf>) -> Result<Self, BackendError> {
        let root: PathBuf = root.into();
        fs::create_dir_all(&root)?;
        Self::new(root)
    }

    /// Allow shelling out to `rg` for grep when it is on `PATH`. The internal
    /// scan remains the reference semantics and the fallback.
    pub fn with_external_tools(mut self, enabled: bool) -> Self {
        self.external_tools = enabled;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn host_path(&self, logical: &str) -> Result<PathBuf, String> {
        if let Some(err) = validate_path(logical) {
            return Err(err);
        }
        resolve_in_root(&self.root, logical)
            .map_err(|_| format!("Error: Path escapes workspace root: {logical}"))
    }

    fn logical_path(&self, host: &Path) -> String {
        let rel = host.strip_prefix(&self.root).unwrap_or(host);
        normalize_path(&rel.to_string_lossy().replace('\\', "/"))
    }

    /// All files under `dir`, as sorted normalized logical paths.
    fn list_files(&self, dir: &Path) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_files(dir, &mut out);
        out.sort();
        out
    }

    fn collect_files(&self, dir: &Path, out: &mut Vec<String>) {
        let Ok(entries) = fs::read_dir(dir) else {
            log::debug!("skipping unreadable directory {}", dir.display());
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            // Symlinks that point outside the root are not followed.
            let canonical = path.canonicalize().unwrap_or_else(|_| path.clone());
            if !canonical.starts_with(&self.root) {
                continue;
            }
            if path.is_dir() {
                self.collect_files(&path, out);
            } else if path.is_file() {
                out.push(self.logical_path(&path));
            }
        }
    }

    fn grep_with_ripgrep(
        &self,
        pattern: &str,
        base: &Path,
        glob: Option<&str>,
    ) -> Option<Vec<GrepMatch>> {
        let mut cmd = Command::new("rg");
        cmd.arg("--line-number")
            .arg("--no-heading")
            .arg("--color")
            .arg("never")
            .arg("--no-ignore")
            .arg("--hidden")
            .current_dir(&self.root);
        if let Some(g) = glob {
            cmd.arg("--glob").arg(g);
        }
        let rel = base.strip_prefix(&self.root).unwrap_or(base);
        let target = if rel.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            rel.to_path_buf()
        };
        cmd.arg("--regexp").arg(pattern).arg(target);
        let output = cmd.output().ok()?;
        // Exit code 1 means "no matches"; anything above is a real failure
        // and the internal scan takes over.
        match output.status.code() {
            Some(0) | Some(1) => {}
            _ => return None,
        }
        let stdout = String::from_utf8(output.stdout).ok()?;
        let mut matches = Vec::new();
        for line in stdout.lines() {
            let mut parts = line.splitn(3, ':');
            let path = parts.next()?;
            let line_no: usize = parts.next()?.parse().ok()?;
            let text = parts.next().unwrap_or("");
            matches.push(GrepMatch {
                path: normalize_path(&path.replace('\\', "/")),
                line: line_no,
                text: text.to_string(),
            });
        }
        matches.sort_by(|a, b| a.path.cmp(&b.path).then(a.line.cmp(&b.line)));
        Some(matches)
    }
}

#[async_trait]
impl FileBackend for FilesystemBackend {
    async fn read(&self, file_path: &str, offset: usize, limit: usize) -> String {
        let host = match self.host_path(file_path) {
            Ok(p) => p,
            Err(e) => return e,
        };
        let path = normalize_path(file_path);
        if host.is_dir() {
            return format!("Error: Path '{path}' is a directory");
        }
        if !host.is_file() {
            return format!("Error: File '{path}' not found");
        }
        let content = match fs::read_to_string(&host) {
            Ok(c) => c,
            Err(e) => return format!("Error: Could not read '{path}': {e}"),
        };
        let lines: Vec<&str> = content.split('\n').collect();
        render_read(&path, &lines, offset, limit)
    }

    async fn write(&self, file_path: &str, content: &str) -> WriteResult {
        let host = match self.host_path(file_path) {
            Ok(p) => p,
            Err(error) => return WriteResult::Failed { error },
        };
        if let Some(parent) = host.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                return WriteResult::Failed {
                    error: format!("Error: Could not create parent directories: {e}"),
                };
            }
        }
        let path = normalize_path(file_path);
        if let Err(e) = fs::write(&host, content) {
            return WriteResult::Failed {
                error: format!("Error: Could not write '{path}': {e}"),
            };
        }
        WriteResult::Written {
            path,
            bytes: content.len(),
            lines: content.split('\n').count(),
        }
    }

    async fn edit(
        &self,
        file_path: &str,
        old_string: &str,
        new_string: &str,
        replace_all: bool,
    ) -> EditResult {
        let host = match self.host_path(file_path) {
            Ok(p) => p,
            Err(error) => return EditResult::Failed { error },
        };
        let path = normalize_path(file_path);
        if !host.is_file() {
            return EditResult::Failed {
                error: format!("Error: File '{path}' not found"),
            };
        }
        let content = match fs::read_to_string(&host) {
            Ok(c) => c,
            Err(e) => {
                return EditResult::Failed {
                    error: format!("Error: Could not read '{path}': {e}"),
                }
            }
        };
        match apply_edit(&content, old_string, new_string, replace_all) {
            Ok((new_content, occurrences)) => {
                if let Err(e) = fs::write(&host, new_content) {
                    return EditResult::Failed {
                        error: format!("Error: Could not write '{path}': {e}"),
                    };
                }
                EditResult::Edited { path, occurrences }
            }
            Err(error) => EditResult::Failed { error },
        }
    }

    async fn ls_info(&self, path: &str) -> Vec<FileInfo> {
        let Ok(host) = self.host_path(path) else {
            return Vec::new();
        };
        if host.is_file() {
            let meta = fs::metadata(&host).ok();
            let logical = self.logical_path(&host);
            return vec![FileInfo {
                name: logical.rsplit('/').next().unwrap_or(&logical).to_string(),
                path: logical,
                is_dir: false,
                size: meta.as_ref().map(|m| m.len()).unwrap_or(0),
                child_count: None,
                modified_at: meta.and_then(|m| m.modified().ok()).and_then(|t| {
                    t.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
                }),
            }];
        }
        let Ok(entries) = fs::read_dir(&host) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for entry in entries.flatten() {
            let entry_path = entry.path();
            let Ok(meta) = entry.metadata() else {
                continue;
            };
            let is_dir = meta.is_dir();
            let child_count = is_dir
                .then(|| fs::read_dir(&entry_path).map(|d| d.count()).unwrap_or(0));
            out.push(FileInfo {
                name: entry.file_name().to_string_lossy().to_string(),
                path: self.logical_path(&entry_path),
                is_dir,
                size: if is_dir { 0 } else { meta.len() },
                child_count,
                modified_at: meta.modified().ok().and_then(|t| {
                    t.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
                }),
            });
        }
        out.sort_by(|a, b| a.path.cmp(&b.path));
        out
    }

    async fn glob_info(&self, pattern: &str, path: &str) -> Vec<FileInfo> {
        let Ok(host) = self.host_path(path) else {
            return Vec::new();
        };
        if !host.is_dir() {
            return Vec::new();
        }
        let Ok(pat) = glob::Pattern::new(pattern) else {
            log::debug!("invalid glob pattern: {pattern}");
            return Vec::new();
        };
        let base = normalize_path(path);
        let opts = glob_options();
        self.list_files(&host)
            .into_iter()
            .filter(|p| pat.matches_with(&relative_to(p, &base), opts))
            .map(|p| {
                let meta = fs::metadata(self.root.join(p.trim_start_matches('/'))).ok();
                FileInfo {
                    name: p.rsplit('/').next().unwrap_or(&p).to_string(),
                    path: p.clone(),
                    is_dir: false,
                    size: meta.as_ref().map(|m| m.len()).unwrap_or(0),
                    child_count: None,
                    modified_at: meta.and_then(|m| m.modified().ok()).and_then(|t| {
                        t.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
                    }),
                }
            })
            .collect()
    }

    async fn grep_raw(
        &self,
        pattern: &str,
        path: Option<&str>,
        glob: Option<&str>,
    ) -> Result<Vec<GrepMatch>, String> {
        let regex =
            Regex::new(pattern).map_err(|e| format!("Error: Invalid regex pattern: {e}"))?;
        let base = match path {
            Some(p) => self.host_path(p)?,
            None => self.root.clone(),
        };
        if !base.exists() {
            let logical = normalize_path(path.unwrap_or("/"));
            return Err(format!("Error: Path '{logical}' not found"));
        }
        let candidates: Vec<String> = if base.is_file() {
            vec![self.logical_path(&base)]
        } else {
            if self.external_tools {
                if let Some(matches) = self.grep_with_ripgrep(pattern, &base, glob) {
                    return Ok(matches);
                }
                log::debug!("ripgrep unavailable or failed; using internal scan");
            }
            let all = self.list_files(&base);
            match glob {
                Some(g) => {
                    let pat = glob::Pattern::new(g)
                        .map_err(|e| format!("Error: Invalid glob pattern: {e}"))?;
                    let opts = glob_options();
                    all.into_iter()
                        .filter(|p| pat.matches_with(&relative_to(p, "/"), opts))
                        .collect()
                }
                None => all,
            }
        };
        let mut matches = Vec::new();
        for logical in candidates {
            let host = self.root.join(logical.trim_start_matches('/'));
            if !host.is_file() {
                continue;
            }
            let Ok(content) = fs::read_to_string(&host) else {
                continue;
            };
            for (idx, line) in content.split('\n').enumerate() {
                if regex.is_match(line) {
                    matches.push(GrepMatch {
                        path: logical.clone(),
                        line: idx + 1,
                        text: line.to_string(),
                    });
                }
            }
        }
        matches.sort_by(|a, b| a.path.cmp(&b.path).then(a.line.cmp(&b.line)));
        Ok(matches)
    }
}
