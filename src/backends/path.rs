//! Path rules shared by every backend.
//!
//! Logical paths are forward-slash strings normalized to start with `/` and
//! end without a trailing `/` (except the root). Validation rejects traversal
//! before any backend touches storage; the host-rooted backend additionally
//! resolves against its root via [resolve_in_root].

use std::path::{Path, PathBuf};

use crate::error::BackendError;

/// Validate a logical path. Returns an `"Error: ..."` message when the path
/// is hostile, `None` when it is safe to normalize and use.
pub fn validate_path(path: &str) -> Option<String> {
    if path.split(['/', '\\']).any(|seg| seg == "..") {
        return Some("Error: Path cannot contain '..' segments".to_string());
    }
    if path.starts_with('~') {
        return Some("Error: Path cannot start with '~'".to_string());
    }
    let mut chars = path.chars();
    if let (Some(first), Some(':')) = (chars.next(), chars.next()) {
        if first.is_ascii_alphabetic() {
            return Some("Error: Windows-style paths are not supported".to_string());
        }
    }
    None
}

/// Normalize a logical path: leading `/` added, trailing `/` stripped unless
/// the whole path is the root. No dot-segment resolution happens here;
/// [validate_path] has already rejected `..`.
pub fn normalize_path(path: &str) -> String {
    let path = path.trim();
    let mut out = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    while out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}

/// Resolve `logical` under `root` and verify the result stays inside `root`.
///
/// Existing paths are canonicalized so symlinked escapes are caught; paths
/// that do not exist yet are checked lexically against the canonical root.
pub fn resolve_in_root(root: &Path, logical: &str) -> Result<PathBuf, BackendError> {
    let trimmed = logical.trim().trim_start_matches('/');
    if trimmed.is_empty() {
        return Ok(root.to_path_buf());
    }
    if trimmed.split(['/', '\\']).any(|seg| seg == "..") {
        return Err(BackendError::PathEscapesRoot(logical.to_string()));
    }
    let canonical_root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    let full = root.join(trimmed);
    if full.exists() {
        let canonical = full.canonicalize()?;
        if !canonical.starts_with(&canonical_root) {
            return Err(BackendError::PathEscapesRoot(logical.to_string()));
        }
        Ok(canonical)
    } else {
        if !full.starts_with(root) && !full.starts_with(&canonical_root) {
            return Err(BackendError::PathEscapesRoot(logical.to_string()));
        }
        Ok(full)
    }
}
