//! Pluggable file backend protocol for the workspace tools.
//!
//! Every backend presents the same semantic contract: normalized logical
//! paths, gutter-numbered reads, exact-string edits with a uniqueness rule,
//! sorted glob results, and regex grep that reports matches or a single
//! `"Error: ..."` string. The helpers at the bottom of this module are the
//! reference implementation of the shared output shapes.

use async_trait::async_trait;

/// Default number of lines returned by `read` when no limit is given.
pub const DEFAULT_READ_LIMIT: usize = 2000;

/// Metadata for a single file or directory entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileInfo {
    /// Entry name (last path segment).
    pub name: String,
    /// Normalized logical path.
    pub path: String,
    pub is_dir: bool,
    /// Size in bytes; 0 for directories.
    pub size: u64,
    /// Number of immediate children (directories only).
    pub child_count: Option<usize>,
    /// Last modification time, seconds since the Unix epoch.
    pub modified_at: Option<u64>,
}

/// Result of a write operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteResult {
    Written {
        path: String,
        bytes: usize,
        lines: usize,
    },
    Failed {
        error: String,
    },
}

impl WriteResult {
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Written { .. } => None,
            Self::Failed { error } => Some(error),
        }
    }
}

/// Result of an edit operation. Success and failure are mutually exclusive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditResult {
    Edited { path: String, occurrences: usize },
    Failed { error: String },
}

impl EditResult {
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Edited { .. } => None,
            Self::Failed { error } => Some(error),
        }
    }

    pub fn occurrences(&self) -> Option<usize> {
        match self {
            Self::Edited { occurrences, .. } => Some(*occurrences),
            Self::Failed { .. } => None,
        }
    }
}

/// A single grep match: path, 1-based line number, raw line text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrepMatch {
    pub path: String,
    pub line: usize,
    pub text: String,
}

/// Workspace backend contract shared by the in-memory, host-filesystem, and
/// composite implementations.
#[async_trait]
pub trait FileBackend: Send + Sync {
    /// Read a file with gutter-numbered lines. `offset` is a 0-based line
    /// index; at most `limit` lines are returned, with a trailing
    /// `... (N more lines)` marker when the tail is cut off. Failures come
    /// back inline as an `"Error: ..."` string.
    async fn read(&self, file_path: &str, offset: usize, limit: usize) -> String;

    /// Create or overwrite a file.
    async fn write(&self, file_path: &str, content: &str) -> WriteResult;

    /// Replace `old_string` with `new_string`. Without `replace_all` the old
    /// string must occur exactly once.
    async fn edit(
        &self,
        file_path: &str,
        old_string: &str,
        new_string: &str,
        replace_all: bool,
    ) -> EditResult;

    /// List the entries at `path`: the file itself when `path` is a file,
    /// otherwise its immediate children. Invalid or missing paths yield an
    /// empty listing.
    async fn ls_info(&self, path: &str) -> Vec<FileInfo>;

    /// List files under `path` whose path (relative to `path`) matches the
    /// shell-glob `pattern`. Results are sorted by path; directories are
    /// excluded.
    async fn glob_info(&self, pattern: &str, path: &str) -> Vec<FileInfo>;

    /// Regex-search file contents. `path` restricts the search to one file or
    /// subtree; `glob` filters candidate files. An invalid pattern returns an
    /// error string instead of a match list.
    async fn grep_raw(
        &self,
        pattern: &str,
        path: Option<&str>,
        glob: Option<&str>,
    ) -> Result<Vec<GrepMatch>, String>;
}

/// Render a slice of file lines with the 1-based right-aligned line-number
/// gutter and the truncation marker. Reference semantics for `read`.
pub(crate) fn render_read(path: &str, lines: &[&str], offset: usize, limit: usize) -> String {
    if offset >= lines.len() {
        return format!(
            "Error: Offset {} exceeds file length ({} lines)",
            offset,
            lines.len()
        );
    }
    let end = offset.saturating_add(limit).min(lines.len());
    let mut out = lines[offset..end]
        .iter()
        .enumerate()
        .map(|(i, text)| format!("{:>6}→{}", offset + i + 1, text))
        .collect::<Vec<_>>()
        .join("\n");
    if end < lines.len() {
        out.push_str(&format!("\n... ({} more lines)", lines.len() - end));
    }
    log::debug!("read {} lines {}..{} of {}", path, offset, end, lines.len());
    out
}

/// Apply the exact-string edit rule to `content`. Returns the substituted
/// content and the occurrence count, or the error message. Reference
/// semantics for `edit`.
pub(crate) fn apply_edit(
    content: &str,
    old_string: &str,
    new_string: &str,
    replace_all: bool,
) -> Result<(String, usize), String> {
    if old_string.is_empty() {
        return Err("Error: old_string must not be empty".to_string());
    }
    let occurrences = content.matches(old_string).count();
    if occurrences == 0 {
        return Err(format!("Error: String not found in file: '{old_string}'"));
    }
    if occurrences > 1 && !replace_all {
        return Err(format!(
            "Error: String '{old_string}' appears {occurrences} times in file. \
             Use replace_all=true or provide a larger string with more context"
        ));
    }
    let new_content = if replace_all {
        content.replace(old_string, new_string)
    } else {
        content.replacen(old_string, new_string, 1)
    };
    Ok((new_content, occurrences))
}

/// Match options giving shell-glob semantics: `*` and `?` stay within one
/// path segment, `**` spans segments.
pub(crate) fn glob_options() -> glob::MatchOptions {
    glob::MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    }
}

/// Strip `base` from a normalized logical path, yielding the relative form
/// glob patterns are matched against.
pub(crate) fn relative_to(path: &str, base: &str) -> String {
    let rel = if base == "/" {
        path
    } else {
        path.strip_prefix(base).unwrap_or(path)
    };
    rel.trim_start_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_read_formats_gutter() {
        let lines = ["Hello", "World"];
        assert_eq!(
            render_read("/a/b.txt", &lines, 0, DEFAULT_READ_LIMIT),
            "     1→Hello\n     2→World"
        );
    }

    #[test]
    fn render_read_marks_truncation() {
        let all: Vec<String> = (0..10).map(|i| format!("Line {i}")).collect();
        let lines: Vec<&str> = all.iter().map(String::as_str).collect();
        let out = render_read("/t", &lines, 0, 4);
        assert!(out.ends_with("... (6 more lines)"));
        assert!(out.contains("     4→Line 3"));
    }

    #[test]
    fn render_read_rejects_offset_past_end() {
        let out = render_read("/t", &["only"], 1, 10);
        assert!(out.starts_with("Error"));
        assert!(out.contains('1'));
        let last = render_read("/t", &["a", "b"], 1, 10);
        assert_eq!(last, "     2→b");
    }

    #[test]
    fn apply_edit_enforces_uniqueness() {
        let err = apply_edit("foo bar foo baz foo", "foo", "qux", false).unwrap_err();
        assert!(err.contains("3 times"));
        let (out, n) = apply_edit("foo bar foo baz foo", "foo", "qux", true).unwrap();
        assert_eq!(out, "qux bar qux baz qux");
        assert_eq!(n, 3);
    }

    #[test]
    fn apply_edit_reports_missing_string() {
        let err = apply_edit("Hello World", "foo", "bar", false).unwrap_err();
        assert!(err.contains("not found"));
    }

    #[test]
    fn glob_star_stays_in_segment() {
        let opts = glob_options();
        let pat = glob::Pattern::new("*.py").unwrap();
        assert!(pat.matches_with("main.py", opts));
        assert!(!pat.matches_with("src/main.py", opts));
        let deep = glob::Pattern::new("**/*.py").unwrap();
        assert!(deep.matches_with("src/main.py", opts));
        assert!(deep.matches_with("main.py", opts));
    }

    #[test]
    fn relative_to_strips_base() {
        assert_eq!(relative_to("/src/main.py", "/src"), "main.py");
        assert_eq!(relative_to("/src/main.py", "/"), "src/main.py");
    }
}
