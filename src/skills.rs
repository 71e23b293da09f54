//! Directory-based skills: each skill is a directory with a `SKILL.md`
//! (YAML-like frontmatter plus a markdown body) and optional resource files.
//!
//! Discovery reads only the frontmatter; the instruction body is loaded on
//! demand via [load_skill_instructions] or the `load_skill` tool. The
//! frontmatter parser is deliberately a tiny subset of YAML: scalar values
//! with optional matching quotes, `- item` block lists, `[a, b]` inline
//! lists. Lines without a colon are ignored.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A parsed frontmatter value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrontmatterValue {
    Scalar(String),
    List(Vec<String>),
}

impl FrontmatterValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::Scalar(_) => None,
            Self::List(items) => Some(items),
        }
    }
}

pub type Frontmatter = BTreeMap<String, FrontmatterValue>;

/// One discovered skill. Immutable after discovery.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Skill {
    pub name: String,
    pub description: String,
    /// Directory containing the skill's SKILL.md.
    pub path: PathBuf,
    pub version: String,
    pub author: String,
    pub tags: Vec<String>,
    /// True once the frontmatter header has been read.
    pub frontmatter_loaded: bool,
    /// Top-level files in the skill directory other than SKILL.md.
    pub resources: Vec<String>,
}

/// A directory to scan for skills.
#[derive(Clone, Debug)]
pub struct SkillDirectory {
    pub path: PathBuf,
    pub recursive: bool,
}

impl SkillDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            recursive: true,
        }
    }

    pub fn non_recursive(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            recursive: false,
        }
    }
}

fn strip_matching_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn parse_inline_list(value: &str) -> Vec<String> {
    value
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(|item| strip_matching_quotes(item.trim()).to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Split a SKILL.md into (frontmatter, body).
///
/// The frontmatter block is delimited by a leading `---` line and the next
/// line that is exactly `---`; without one, the whole text is the body.
pub fn parse_skill_md(text: &str) -> (Frontmatter, String) {
    let mut frontmatter = Frontmatter::new();
    if !text.starts_with("---\n") && text != "---" {
        return (frontmatter, text.to_string());
    }
    let lines: Vec<&str> = text.split('\n').collect();
    let Some(close) = lines.iter().skip(1).position(|l| *l == "---") else {
        return (frontmatter, text.to_string());
    };
    let close = close + 1;
    let mut pending_list: Option<String> = None;
    for line in &lines[1..close] {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(item) = trimmed.strip_prefix("- ") {
            if let Some(key) = &pending_list {
                if let Some(FrontmatterValue::List(items)) = frontmatter.get_mut(key) {
                    items.push(strip_matching_quotes(item.trim()).to_string());
                }
            }
            continue;
        }
        let Some((key, value)) = trimmed.split_once(':') else {
            continue;
        };
        let key = key.trim().to_string();
        let value = value.trim();
        if value.is_empty() {
            frontmatter.insert(key.clone(), FrontmatterValue::List(Vec::new()));
            pending_list = Some(key);
        } else if value.starts_with('[') && value.ends_with(']') {
            frontmatter.insert(key, FrontmatterValue::List(parse_inline_list(value)));
            pending_list = None;
        } else {
            frontmatter.insert(
                key,
                FrontmatterValue::Scalar(strip_matching_quotes(value).to_string()),
            );
            pending_list = None;
        }
    }
    let body = lines[close + 1..].join("\n");
    (frontmatter, body)
}

fn scalar(frontmatter: &Frontmatter, key: &str) -> String {
    frontmatter
        .get(key)
        .and_then(FrontmatterValue::as_scalar)
        .unwrap_or_default()
        .to_string()
}

fn skill_from_dir(dir: &Path) -> Option<Skill> {
    let skill_md = dir.join("SKILL.md");
    let content = fs::read_to_string(&skill_md).ok()?;
    let (frontmatter, _) = parse_skill_md(&content);
    let name = scalar(&frontmatter, "name");
    if name.is_empty() {
        log::debug!("skipping {}: frontmatter has no name", skill_md.display());
        return None;
    }
    let tags = frontmatter
        .get("tags")
        .and_then(FrontmatterValue::as_list)
        .map(<[String]>::to_vec)
        .unwrap_or_default();
    let mut resources: Vec<String> = fs::read_dir(dir)
        .map(|entries| {
            entries
                .flatten()
                .filter(|e| e.path().is_file())
                .map(|e| e.file_name().to_string_lossy().to_string())
                .filter(|n| n != "SKILL.md")
                .collect()
        })
        .unwrap_or_default();
    resources.sort();
    Some(Skill {
        name,
        description: scalar(&frontmatter, "description"),
        path: dir.to_path_buf(),
        version: scalar(&frontmatter, "version"),
        author: scalar(&frontmatter, "author"),
        tags,
        frontmatter_loaded: true,
        resources,
    })
}

fn scan(dir: &Path, recursive: bool, out: &mut Vec<Skill>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if path.join("SKILL.md").is_file() {
            if let Some(skill) = skill_from_dir(&path) {
                out.push(skill);
            }
        }
        if recursive {
            scan(&path, recursive, out);
        }
    }
}

/// Discover skills in the configured directories. Only the frontmatter is
/// read; missing directories contribute nothing.
pub fn discover_skills(directories: &[SkillDirectory]) -> Vec<Skill> {
    let mut skills = Vec::new();
    for dir in directories {
        if !dir.path.is_dir() {
            log::debug!("skill directory missing: {}", dir.path.display());
            continue;
        }
        scan(&dir.path, dir.recursive, &mut skills);
    }
    skills.sort_by(|a, b| a.name.cmp(&b.name));
    skills
}

/// Load the full instruction body of a skill (everything after the
/// frontmatter in its SKILL.md).
pub fn load_skill_instructions(skill_path: &Path) -> String {
    let skill_md = skill_path.join("SKILL.md");
    match fs::read_to_string(&skill_md) {
        Ok(content) => {
            let (_, body) = parse_skill_md(&content);
            body
        }
        Err(_) => format!("Error: Skill not found at {}", skill_path.display()),
    }
}

/// Skills section of the dynamic system prompt. Empty when no skills are
/// registered.
pub fn system_prompt_fragment(skills: &[Skill]) -> String {
    if skills.is_empty() {
        return String::new();
    }
    let mut lines = vec![
        "## Available Skills".to_string(),
        String::new(),
        "Load a skill's full instructions with the `load_skill` tool before using it.".to_string(),
        String::new(),
    ];
    for skill in skills {
        let mut line = format!("- **{}**: {}", skill.name, skill.description);
        if !skill.tags.is_empty() {
            line.push_str(&format!(" (tags: {})", skill.tags.join(", ")));
        }
        lines.push(line);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_frontmatter() {
        let content = "---\nname: test-skill\ndescription: A test skill\nversion: 1.0.0\n---\n\n# Instructions\n\nThis is a test skill.\n";
        let (frontmatter, body) = parse_skill_md(content);
        assert_eq!(frontmatter["name"].as_scalar(), Some("test-skill"));
        assert_eq!(frontmatter["description"].as_scalar(), Some("A test skill"));
        assert_eq!(frontmatter["version"].as_scalar(), Some("1.0.0"));
        assert!(body.contains("# Instructions"));
        assert!(body.contains("This is a test skill."));
    }

    #[test]
    fn parses_block_and_inline_lists() {
        let content = "---\nname: code-review\ntags:\n  - code\n  - review\n  - quality\nauthor: Test Author\n---\nReview code carefully.\n";
        let (frontmatter, body) = parse_skill_md(content);
        assert_eq!(
            frontmatter["tags"].as_list(),
            Some(&["code".to_string(), "review".to_string(), "quality".to_string()][..])
        );
        assert_eq!(frontmatter["author"].as_scalar(), Some("Test Author"));
        assert!(body.contains("Review code carefully."));

        let (frontmatter, _) = parse_skill_md("---\nname: x\ntags: [a, b]\n---\nBody");
        assert_eq!(
            frontmatter["tags"].as_list(),
            Some(&["a".to_string(), "b".to_string()][..])
        );
    }

    #[test]
    fn text_without_frontmatter_is_all_body() {
        let content = "Just instructions without frontmatter.";
        let (frontmatter, body) = parse_skill_md(content);
        assert!(frontmatter.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn strips_matching_quotes_only() {
        let content = "---\nname: \"quoted-skill\"\ndescription: 'Single quoted description'\nmixed: \"unbalanced'\n---\nBody";
        let (frontmatter, _) = parse_skill_md(content);
        assert_eq!(frontmatter["name"].as_scalar(), Some("quoted-skill"));
        assert_eq!(
            frontmatter["description"].as_scalar(),
            Some("Single quoted description")
        );
        assert_eq!(frontmatter["mixed"].as_scalar(), Some("\"unbalanced'"));
    }

    #[test]
    fn ignores_blank_lines_and_lines_without_colons() {
        let content = "---\nname: test\n\nsome random text without colon\ndescription: test desc\n---\nBody";
        let (frontmatter, _) = parse_skill_md(content);
        assert_eq!(frontmatter["name"].as_scalar(), Some("test"));
        assert_eq!(frontmatter["description"].as_scalar(), Some("test desc"));
        assert_eq!(frontmatter.len(), 2);
    }

    fn write_skill(root: &Path, dir_name: &str, frontmatter: &str) -> PathBuf {
        let dir = root.join(dir_name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("SKILL.md"),
            format!("---\n{frontmatter}\n---\n\n# How to use\n\nFollow these steps...\n"),
        )
        .unwrap();
        dir
    }

    #[test]
    fn discovers_skills_with_resources() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = write_skill(
            tmp.path(),
            "my-skill",
            "name: my-skill\ndescription: My test skill\nversion: 2.0.0\ntags:\n  - test",
        );
        fs::write(dir.join("template.py"), "# Template file").unwrap();

        let skills = discover_skills(&[SkillDirectory::new(tmp.path())]);
        assert_eq!(skills.len(), 1);
        let skill = &skills[0];
        assert_eq!(skill.name, "my-skill");
        assert_eq!(skill.description, "My test skill");
        assert_eq!(skill.version, "2.0.0");
        assert_eq!(skill.tags, vec!["test"]);
        assert!(skill.frontmatter_loaded);
        assert_eq!(skill.resources, vec!["template.py"]);
    }

    #[test]
    fn discovers_multiple_and_sorts_by_name() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill(tmp.path(), "zeta", "name: zeta\ndescription: Second");
        write_skill(tmp.path(), "alpha", "name: alpha\ndescription: First");
        let skills = discover_skills(&[SkillDirectory::new(tmp.path())]);
        let names: Vec<&str> = skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn recursion_flag_controls_nested_discovery() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill(tmp.path(), "top-skill", "name: top-skill\ndescription: Top");
        write_skill(
            &tmp.path().join("category"),
            "nested-skill",
            "name: nested-skill\ndescription: Nested",
        );

        let recursive = discover_skills(&[SkillDirectory::new(tmp.path())]);
        assert_eq!(recursive.len(), 2);

        let flat = discover_skills(&[SkillDirectory::non_recursive(tmp.path())]);
        let names: Vec<&str> = flat.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["top-skill"]);
    }

    #[test]
    fn skips_nameless_skills_and_missing_directories() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill(tmp.path(), "anon", "description: No name here");
        assert!(discover_skills(&[SkillDirectory::new(tmp.path())]).is_empty());
        assert!(discover_skills(&[SkillDirectory::new("/nonexistent/path")]).is_empty());
    }

    #[test]
    fn loads_instructions_body() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = write_skill(tmp.path(), "my-skill", "name: my-skill\ndescription: d");
        let instructions = load_skill_instructions(&dir);
        assert!(instructions.contains("# How to use"));
        assert!(!instructions.contains("name: my-skill"));

        let missing = load_skill_instructions(Path::new("/nonexistent/skill"));
        assert!(missing.starts_with("Error"));
    }

    #[test]
    fn prompt_fragment_lists_skills() {
        assert!(system_prompt_fragment(&[]).is_empty());
        let skill = Skill {
            name: "code-review".to_string(),
            description: "Reviews code for issues".to_string(),
            path: PathBuf::from("/skills/code-review"),
            version: "1.0.0".to_string(),
            author: String::new(),
            tags: vec!["code".to_string(), "quality".to_string()],
            frontmatter_loaded: true,
            resources: Vec::new(),
        };
        let prompt = system_prompt_fragment(&[skill]);
        assert!(prompt.contains("## Available Skills"));
        assert!(prompt.contains("**code-review**"));
        assert!(prompt.contains("(tags: code, quality)"));
    }
}
