//! Composite backend: partitions the logical path tree across backends by
//! prefix route, longest prefix wins.
//!
//! A route prefix looks like `"/memories/"`. The matched prefix (minus its
//! trailing slash) is stripped before delegating, so a routed backend always
//! sees root-anchored paths, and is restored on every path that comes back.
//! Prefixes must not overlap; that keeps dispatch deterministic.

use std::sync::Arc;

use async_trait::async_trait;

use super::file_backend::{EditResult, FileBackend, FileInfo, GrepMatch, WriteResult};
use super::path::{normalize_path, validate_path};
use crate::error::BackendError;

pub struct CompositeBackend {
    default: Arc<dyn FileBackend>,
    /// Sorted by prefix length, longest first.
    routes: Vec<(String, Arc<dyn FileBackend>)>,
}

impl CompositeBackend {
    pub fn new(default: Arc<dyn FileBackend>) -> Self {
        Self {
            default,
            routes: Vec::new(),
        }
    }

    /// Add a route. The prefix must start and end with `/` and must not
    /// overlap an existing route.
    pub fn with_route(
        mut self,
        prefix: impl Into<String>,
        backend: Arc<dyn FileBackend>,
    ) -> Result<Self, BackendError> {
        let prefix = prefix.into();
        if prefix.len() < 3
            || !prefix.starts_with('/')
            || !prefix.ends_with('/')
            || validate_path(&prefix).is_some()
        {
            return Err(BackendError::InvalidRoutePrefix(prefix));
        }
        for (existing, _) in &self.routes {
            if existing.starts_with(&prefix) || prefix.starts_with(existing.as_str()) {
                return Err(BackendError::OverlappingRoutes(existing.clone(), prefix));
            }
        }
        self.routes.push((prefix, backend));
        self.routes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Ok(self)
    }

    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|(p, _)| p.as_str())
    }

    /// Longest route prefix matching `path` (treated as a directory), with
    /// the rewritten root-anchored remainder.
    fn route_for(&self, path: &str) -> Option<(&str, &Arc<dyn FileBackend>, String)> {
        let norm = normalize_path(path);
        let probe = if norm == "/" {
            norm.clone()
        } else {
            format!("{norm}/")
        };
        for (prefix, backend) in &self.routes {
            if probe.starts_with(prefix.as_str()) {
                let remainder = &norm[prefix.len() - 1..];
                let inner = if remainder.is_empty() {
                    "/".to_string()
                } else {
                    remainder.to_string()
                };
                return Some((prefix, backend, inner));
            }
        }
        None
    }

    /// Restore a route prefix on a path returned by a routed backend.
    fn restore(prefix: &str, inner: &str) -> String {
        normalize_path(&format!(
            "{}/{}",
            prefix.trim_end_matches('/'),
            inner.trim_start_matches('/')
        ))
    }

    fn is_aggregate_path(path: &str) -> bool {
        normalize_path(path) == "/"
    }
}

#[async_trait]
impl FileBackend for CompositeBackend {
    async fn read(&self, file_path: &str, offset: usize, limit: usize) -> String {
        match self.route_for(file_path) {
            Some((_, backend, inner)) => backend.read(&inner, offset, limit).await,
            None => self.default.read(file_path, offset, limit).await,
        }
    }

    async fn write(&self, file_path: &str, content: &str) -> WriteResult {
        match self.route_for(file_path) {
            Some((prefix, backend, inner)) => match backend.write(&inner, content).await {
                WriteResult::Written { path, bytes, lines } => WriteResult::Written {
                    path: Self::restore(prefix, &path),
                    bytes,
                    lines,
                },
                failed => failed,
            },
            None => self.default.write(file_path, content).await,
        }
    }

    async fn edit(
        &self,
        file_path: &str,
        old_string: &str,
        new_string: &str,
        replace_all: bool,
    ) -> EditResult {
        match self.route_for(file_path) {
            Some((prefix, backend, inner)) => {
                match backend.edit(&inner, old_string, new_string, replace_all).await {
                    EditResult::Edited { path, occurrences } => EditResult::Edited {
                        path: Self::restore(prefix, &path),
                        occurrences,
                    },
                    failed => failed,
                }
            }
            None => {
                self.default
                    .edit(file_path, old_string, new_string, replace_all)
                    .await
            }
        }
    }

    async fn ls_info(&self, path: &str) -> Vec<FileInfo> {
        if Self::is_aggregate_path(path) {
            let mut entries = self.default.ls_info("/").await;
            for (prefix, _) in &self.routes {
                let Some(first_segment) = prefix.trim_matches('/').split('/').next() else {
                    continue;
                };
                if entries.iter().any(|e| e.name == first_segment) {
                    continue;
                }
                entries.push(FileInfo {
                    name: first_segment.to_string(),
                    path: format!("/{first_segment}"),
                    is_dir: true,
                    size: 0,
                    child_count: None,
                    modified_at: None,
                });
            }
            entries.sort_by(|a, b| a.path.cmp(&b.path));
            return entries;
        }
        match self.route_for(path) {
            Some((prefix, backend, inner)) => backend
                .ls_info(&inner)
                .await
                .into_iter()
                .map(|mut info| {
                    info.path = Self::restore(prefix, &info.path);
                    info
                })
                .collect(),
            None => self.default.ls_info(path).await,
        }
    }

    async fn glob_info(&self, pattern: &str, path: &str) -> Vec<FileInfo> {
        if Self::is_aggregate_path(path) {
            let mut entries = self.default.glob_info(pattern, "/").await;
            for (prefix, backend) in &self.routes {
                for mut info in backend.glob_info(pattern, "/").await {
                    info.path = Self::restore(prefix, &info.path);
                    entries.push(info);
                }
            }
            entries.sort_by(|a, b| a.path.cmp(&b.path));
            return entries;
        }
        match self.route_for(path) {
            Some((prefix, backend, inner)) => backend
                .glob_info(pattern, &inner)
                .await
                .into_iter()
                .map(|mut info| {
                    info.path = Self::restore(prefix, &info.path);
                    info
                })
                .collect(),
            None => self.default.glob_info(pattern, path).await,
        }
    }

    async fn grep_raw(
        &self,
        pattern: &str,
        path: Option<&str>,
        glob: Option<&str>,
    ) -> Result<Vec<GrepMatch>, String> {
        let aggregate = path.map(Self::is_aggregate_path).unwrap_or(true);
        if aggregate {
            let mut matches = Vec::new();
            let mut first_error: Option<String> = None;
            let mut any_ok = false;
            match self.default.grep_raw(pattern, None, glob).await {
                Ok(found) => {
                    any_ok = true;
                    matches.extend(found);
                }
                Err(e) => first_error = Some(e),
            }
            for (prefix, backend) in &self.routes {
                match backend.grep_raw(pattern, None, glob).await {
                    Ok(found) => {
                        any_ok = true;
                        matches.extend(found.into_iter().map(|mut m| {
                            m.path = Self::restore(prefix, &m.path);
                            m
                        }));
                    }
                    Err(e) => {
                        log::debug!("route {prefix} grep failed: {e}");
                        first_error.get_or_insert(e);
                    }
                }
            }
            if !any_ok {
                if let Some(error) = first_error {
                    return Err(error);
                }
            }
            matches.sort_by(|a, b| a.path.cmp(&b.path).then(a.line.cmp(&b.line)));
            return Ok(matches);
        }
        let target = path.unwrap_or("/");
        match self.route_for(target) {
            Some((prefix, backend, inner)) => {
                let found = backend.grep_raw(pattern, Some(&inner), glob).await?;
                Ok(found
                    .into_iter()
                    .map(|mut m| {
                        m.path = Self::restore(prefix, &m.path);
                        m
                    })
                    .collect())
            }
            None => self.default.grep_raw(pattern, Some(target), glob).await,
        }
    }
}
