//! End-to-end scenarios across backends, tools, planning, and skills.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::Mutex;

use deep_agent::prompt::get_system_prompt;
use deep_agent::skills::{discover_skills, SkillDirectory};
use deep_agent::state::{AgentState, BackendHandle};
use deep_agent::tools::{ToolDispatch, ToolRuntime, Toolset, ToolsetConfig};
use deep_agent::{
    CompositeBackend, FileBackend, FilesystemBackend, StateBackend, WriteResult,
    DEFAULT_READ_LIMIT,
};

#[tokio::test]
async fn write_then_read_renders_numbered_lines() {
    let backend = StateBackend::new();
    let result = backend.write("/a/b.txt", "Hello\nWorld").await;
    assert_eq!(
        result,
        WriteResult::Written {
            path: "/a/b.txt".to_string(),
            bytes: 11,
            lines: 2,
        }
    );
    assert_eq!(
        backend.read("/a/b.txt", 0, DEFAULT_READ_LIMIT).await,
        "     1→Hello\n     2→World"
    );
}

#[tokio::test]
async fn edit_uniqueness_round_trip() {
    let backend = StateBackend::new();
    backend.write("/f", "foo foo foo").await;

    let ambiguous = backend.edit("/f", "foo", "bar", false).await;
    assert!(ambiguous.error().unwrap().contains("3 times"));

    let replaced = backend.edit("/f", "foo", "bar", true).await;
    assert_eq!(replaced.occurrences(), Some(3));
    assert_eq!(
        backend.read("/f", 0, DEFAULT_READ_LIMIT).await,
        "     1→bar bar bar"
    );
}

#[tokio::test]
async fn composite_routes_writes_lists_and_globs() {
    let default = Arc::new(StateBackend::new());
    let skills = Arc::new(StateBackend::new());
    let composite = CompositeBackend::new(default.clone())
        .with_route("/skills/", skills.clone() as Arc<dyn FileBackend>)
        .unwrap();

    composite.write("/skills/x", "A").await;
    // The routed backend stores the file at the stripped path.
    assert_eq!(skills.read("/x", 0, DEFAULT_READ_LIMIT).await, "     1→A");

    let children = composite.ls_info("/").await;
    assert!(children.iter().any(|e| e.name == "skills" && e.is_dir));

    let globbed = composite.glob_info("**/*", "/").await;
    assert!(globbed.iter().any(|e| e.path == "/skills/x"));
}

#[tokio::test]
async fn composite_grep_aggregates_across_backends() {
    let default = Arc::new(StateBackend::new());
    let skills = Arc::new(StateBackend::new());
    let composite = CompositeBackend::new(default.clone())
        .with_route("/skills/", skills.clone() as Arc<dyn FileBackend>)
        .unwrap();

    default.write("/a.txt", "hi").await;
    skills.write("/b.txt", "hi").await;

    let matches = composite.grep_raw("hi", Some("/"), None).await.unwrap();
    let paths: Vec<&str> = matches.iter().map(|m| m.path.as_str()).collect();
    assert_eq!(paths, vec!["/a.txt", "/skills/b.txt"]);
}

#[tokio::test]
async fn invalid_regex_reports_an_error_string() {
    let backend = StateBackend::new();
    backend.write("/x.txt", "content").await;
    let err = backend.grep_raw("[invalid", None, None).await.unwrap_err();
    assert!(err.starts_with("Error"));
}

#[tokio::test]
async fn discovered_skill_carries_frontmatter_and_resources() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("my-skill");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("SKILL.md"),
        "---\nname: my-skill\ndescription: My test skill\ntags: [a, b]\n---\n\n# Use me\n",
    )
    .unwrap();
    std::fs::write(dir.join("template.py"), "# template").unwrap();

    let skills = discover_skills(&[SkillDirectory::new(tmp.path())]);
    assert_eq!(skills.len(), 1);
    assert_eq!(skills[0].name, "my-skill");
    assert_eq!(skills[0].tags, vec!["a", "b"]);
    assert!(skills[0].resources.contains(&"template.py".to_string()));
}

#[tokio::test]
async fn backends_agree_on_the_semantic_contract() {
    let dir = tempfile::tempdir().unwrap();
    let host = FilesystemBackend::new(dir.path()).unwrap();
    let memory = StateBackend::new();

    for backend in [&host as &dyn FileBackend, &memory as &dyn FileBackend] {
        backend.write("/src/main.rs", "fn main() {}\nfn helper() {}").await;
        backend.write("/docs/readme.md", "# Docs").await;

        assert_eq!(
            backend.read("/src/main.rs", 0, DEFAULT_READ_LIMIT).await,
            "     1→fn main() {}\n     2→fn helper() {}"
        );

        let globbed = backend.glob_info("**/*.rs", "/").await;
        let paths: Vec<&str> = globbed.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/src/main.rs"]);

        let matches = backend.grep_raw("fn \\w+", None, None).await.unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].path, "/src/main.rs");
        assert_eq!(matches[0].line, 1);

        let ambiguous = backend.edit("/src/main.rs", "fn", "pub fn", false).await;
        assert!(ambiguous.error().unwrap().contains("2 times"));
    }
}

#[tokio::test]
async fn session_flow_updates_prompt_through_tools() {
    let state = Arc::new(Mutex::new(AgentState::in_memory()));
    let toolset = {
        let guard = state.lock().await;
        Toolset::deep_agent(guard.backend_handle(), ToolsetConfig::default())
    };
    let runtime = ToolRuntime::new(state.clone());

    let dispatched = toolset
        .dispatch(
            "write_todos",
            json!({
                "todos": [
                    { "content": "Set up project", "status": "in_progress", "active_form": "Setting up project" }
                ]
            }),
            &runtime,
        )
        .await;
    match dispatched {
        ToolDispatch::Completed(out) => {
            assert_eq!(out, "Updated 1 todos: 0 completed, 1 in progress, 0 pending")
        }
        other => panic!("unexpected dispatch result: {other:?}"),
    }

    toolset
        .dispatch(
            "write_file",
            json!({ "path": "/notes.md", "content": "remember" }),
            &runtime,
        )
        .await;

    let guard = state.lock().await;
    let prompt = get_system_prompt(&guard);
    assert!(prompt.contains("- [*] Set up project"));
    assert!(prompt.contains("- /notes.md"));
}

#[tokio::test]
async fn filesystem_route_inside_a_composite() {
    let dir = tempfile::tempdir().unwrap();
    let host = Arc::new(FilesystemBackend::new(dir.path()).unwrap());
    let memory = Arc::new(StateBackend::new());
    let composite = Arc::new(
        CompositeBackend::new(memory as Arc<dyn FileBackend>)
            .with_route("/disk/", host as Arc<dyn FileBackend>)
            .unwrap(),
    );

    composite.write("/disk/persisted.txt", "on disk").await;
    assert!(dir.path().join("persisted.txt").is_file());

    composite.write("/scratch.txt", "in memory").await;
    assert!(!dir.path().join("scratch.txt").exists());

    let state = AgentState::new(BackendHandle::pure(composite.clone()));
    let listing = state.backend().ls_info("/").await;
    assert!(listing.iter().any(|e| e.name == "disk" && e.is_dir));
    assert!(listing.iter().any(|e| e.name == "scratch.txt"));
}
