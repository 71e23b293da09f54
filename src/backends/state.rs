//! In-memory backend: files live in a path-keyed map for the lifetime of the
//! backend instance.
//!
//! There are no real directories; a path is a directory exactly when some
//! other stored path begins with `path + "/"`. Content is stored
//! line-buffered: split on `\n` at write time, joined with `\n` on the way
//! out, so the original bytes round-trip exactly (a trailing newline is kept
//! as a trailing empty line).

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use regex::Regex;

use super::file_backend::{
    apply_edit, glob_options, relative_to, render_read, EditResult, FileBackend, FileInfo,
    GrepMatch, WriteResult,
};
use super::path::{normalize_path, validate_path};

/// One stored file: its lines plus creation and modification timestamps.
#[derive(Clone, Debug)]
pub struct FileRecord {
    pub lines: Vec<String>,
    pub created_at: u64,
    pub modified_at: u64,
}

impl FileRecord {
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn split_lines(content: &str) -> Vec<String> {
    content.split('\n').map(str::to_string).collect()
}

/// In-memory virtual filesystem keyed by normalized logical path.
///
/// A single coarse mutex serializes mutation; operations never hold it across
/// an await point.
#[derive(Default)]
pub struct StateBackend {
    files: Mutex<BTreeMap<String, FileRecord>>,
}

impl StateBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths currently stored, in sorted order. Surfaced for prompt context.
    pub fn paths(&self) -> Vec<String> {
        self.files.lock().expect("state backend lock").keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.files.lock().expect("state backend lock").is_empty()
    }

    fn record(&self, path: &str) -> Option<FileRecord> {
        self.files.lock().expect("state backend lock").get(path).cloned()
    }

    /// Stored paths equal to `base` or nested under it; all paths when `base`
    /// is the root.
    fn paths_under(&self, base: &str) -> Vec<String> {
        let prefix = if base == "/" {
            "/".to_string()
        } else {
            format!("{base}/")
        };
        self.files
            .lock()
            .expect("state backend lock")
            .keys()
            .filter(|p| p.as_str() == base || p.starts_with(&prefix))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl FileBackend for StateBackend {
    async fn read(&self, file_path: &str, offset: usize, limit: usize) -> String {
        if let Some(err) = validate_path(file_path) {
            return err;
        }
        let path = normalize_path(file_path);
        let Some(record) = self.record(&path) else {
            return format!("Error: File '{path}' not found");
        };
        let lines: Vec<&str> = record.lines.iter().map(String::as_str).collect();
        render_read(&path, &lines, offset, limit)
    }

    async fn write(&self, file_path: &str, content: &str) -> WriteResult {
        if let Some(err) = validate_path(file_path) {
            return WriteResult::Failed { error: err };
        }
        let path = normalize_path(file_path);
        let lines = split_lines(content);
        let line_count = lines.len();
        let now = now_secs();
        let mut files = self.files.lock().expect("state backend lock");
        let created_at = files.get(&path).map(|r| r.created_at).unwrap_or(now);
        files.insert(
            path.clone(),
            FileRecord {
                lines,
                created_at,
                modified_at: now,
            },
        );
        WriteResult::Written {
            path,
            bytes: content.len(),
            lines: line_count,
        }
    }

    async fn edit(
        &self,
        file_path: &str,
        old_string: &str,
        new_string: &str,
        replace_all: bool,
    ) -> EditResult {
        if let Some(err) = validate_path(file_path) {
            return EditResult::Failed { error: err };
        }
        let path = normalize_path(file_path);
        let mut files = self.files.lock().expect("state backend lock");
        let Some(record) = files.get_mut(&path) else {
            return EditResult::Failed {
                error: format!("Error: File '{path}' not found"),
            };
        };
        match apply_edit(&record.lines.join("\n"), old_string, new_string, replace_all) {
            Ok((new_content, occurrences)) => {
                record.lines = split_lines(&new_content);
                record.modified_at = now_secs();
                EditResult::Edited { path, occurrences }
            }
            Err(error) => EditResult::Failed { error },
        }
    }

    async fn ls_info(&self, path: &str) -> Vec<FileInfo> {
        if validate_path(path).is_some() {
            return Vec::new();
        }
        let base = normalize_path(path);
        if let Some(record) = self.record(&base) {
            let name = base.rsplit('/').next().unwrap_or(&base).to_string();
            return vec![FileInfo {
                name,
                path: base,
                is_dir: false,
                size: record.content().len() as u64,
                child_count: None,
                modified_at: Some(record.modified_at),
            }];
        }
        let prefix = if base == "/" {
            "/".to_string()
        } else {
            format!("{base}/")
        };
        // child name -> (file record if exact, distinct grandchildren)
        let mut children: BTreeMap<String, (Option<FileRecord>, BTreeSet<String>)> =
            BTreeMap::new();
        let files = self.files.lock().expect("state backend lock");
        for (stored, record) in files.iter() {
            let Some(rest) = stored.strip_prefix(&prefix) else {
                continue;
            };
            let mut segments = rest.split('/');
            let Some(child) = segments.next() else {
                continue;
            };
            let entry = children.entry(child.to_string()).or_default();
            match segments.next() {
                Some(grandchild) => {
                    entry.1.insert(grandchild.to_string());
                }
                None => entry.0 = Some(record.clone()),
            }
        }
        children
            .into_iter()
            .filter_map(|(name, (file, grandchildren))| {
                let child_path = if base == "/" {
                    format!("/{name}")
                } else {
                    format!("{base}/{name}")
                };
                if grandchildren.is_empty() {
                    // A leaf child is always an exact stored file.
                    let record = file?;
                    Some(FileInfo {
                        name,
                        path: child_path,
                        is_dir: false,
                        size: record.content().len() as u64,
                        child_count: None,
                        modified_at: Some(record.modified_at),
                    })
                } else {
                    Some(FileInfo {
                        name,
                        path: child_path,
                        is_dir: true,
                        size: 0,
                        child_count: Some(grandchildren.len() + usize::from(file.is_some())),
                        modified_at: None,
                    })
                }
            })
            .collect()
    }

    async fn glob_info(&self, pattern: &str, path: &str) -> Vec<FileInfo> {
        if validate_path(path).is_some() {
            return Vec::new();
        }
        let base = normalize_path(path);
        let Ok(pat) = glob::Pattern::new(pattern) else {
            log::debug!("invalid glob pattern: {pattern}");
            return Vec::new();
        };
        let opts = glob_options();
        self.paths_under(&base)
            .into_iter()
            .filter(|p| pat.matches_with(&relative_to(p, &base), opts))
            .filter_map(|p| self.record(&p).map(|r| (p, r)))
            .map(|(p, record)| FileInfo {
                name: p.rsplit('/').next().unwrap_or(&p).to_string(),
                path: p.clone(),
                is_dir: false,
                size: record.content().len() as u64,
                child_count: None,
                modified_at: Some(record.modified_at),
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
        let candidates = match path {
            Some(p) => {
                if let Some(err) = validate_path(p) {
                    return Err(err);
                }
                self.paths_under(&normalize_path(p))
            }
            None => self.paths(),
        };
        let candidates: Vec<String> = match glob {
            Some(g) => {
                let pat = glob::Pattern::new(g)
                    .map_err(|e| format!("Error: Invalid glob pattern: {e}"))?;
                let opts = glob_options();
                candidates
                    .into_iter()
                    .filter(|p| pat.matches_with(&relative_to(p, "/"), opts))
                    .collect()
            }
            None => candidates,
        };
        let mut matches = Vec::new();
        for candidate in candidates {
            let Some(record) = self.record(&candidate) else {
                continue;
            };
            for (idx, line) in record.lines.iter().enumerate() {
                if regex.is_match(line) {
                    matches.push(GrepMatch {
                        path: candidate.clone(),
                        line: idx + 1,
                        text: line.clone(),
                    });
                }
            }
        }
        matches.sort_by(|a, b| a.path.cmp(&b.path).then(a.line.cmp(&b.line)));
        Ok(matches)
    }
}
