use std::fs;

use sandtree::config::SandtreeConfig;
use sandtree::error::ApiError;
use sandtree::tooling::cli::{CliContext, Commands};
use sandtree::types::WorkspaceId;
use tempfile::TempDir;

fn context(temp_dir: &TempDir) -> CliContext {
    CliContext::new(SandtreeConfig::default(), Some(temp_dir.path().join("store"))).unwrap()
}

fn create(path: &str, content: &str) -> Commands {
    Commands::Create {
        path: path.to_string(),
        folder: false,
        content: Some(content.to_string()),
        from_file: None,
    }
}

#[test]
fn tree_json_contract_has_required_fields() {
    let temp_dir = TempDir::new().unwrap();
    let cli = context(&temp_dir);
    cli.execute(&create("/lib/utils.js", "util")).unwrap();
    cli.execute(&create("/index.js", "main")).unwrap();

    let output = cli
        .execute(&Commands::Tree {
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["workspace_id"], "default");
    assert_eq!(parsed["version"], 2);
    assert_eq!(parsed["file_count"], 2);
    let roots = parsed["roots"].as_array().unwrap();
    assert_eq!(roots[0]["name"], "lib");
    assert_eq!(roots[0]["type"], "folder");
    assert_eq!(roots[1]["name"], "index.js");
}

#[test]
fn versions_json_contract_has_manifests() {
    let temp_dir = TempDir::new().unwrap();
    let cli = context(&temp_dir);
    cli.execute(&create("/a.txt", "abc")).unwrap();

    let output = cli
        .execute(&Commands::Versions {
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    let versions = parsed["versions"].as_array().unwrap();
    assert_eq!(versions.len(), 2);
    for (expected, info) in [0u64, 1].iter().zip(versions) {
        assert_eq!(info["version"], *expected);
        assert_eq!(info["entry_count"], 1);
        assert_eq!(info["fingerprint"].as_str().unwrap().len(), 64);
        assert!(info["saved_at"].as_str().is_some());
    }
}

#[test]
fn rename_and_cat_follow_moved_content() {
    let temp_dir = TempDir::new().unwrap();
    let cli = context(&temp_dir);
    cli.execute(&create("/old/a.ts", "X")).unwrap();
    cli.execute(&create("/old/b/c.ts", "Y")).unwrap();

    let out = cli
        .execute(&Commands::Rename {
            from: "/old".to_string(),
            to: "/new".to_string(),
        })
        .unwrap();
    assert!(out.contains("2 file(s) moved"));
    let content = cli
        .execute(&Commands::Cat {
            path: "/new/b/c.ts".to_string(),
        })
        .unwrap();
    assert_eq!(content, "Y");

    let err = cli
        .execute(&Commands::Cat {
            path: "/old/a.ts".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn conflicting_create_is_rejected_without_save() {
    let temp_dir = TempDir::new().unwrap();
    let cli = context(&temp_dir);
    cli.execute(&create("/index.js", "main")).unwrap();

    let err = cli.execute(&create("/Index.js", "dup")).unwrap_err();
    assert!(matches!(err, ApiError::PathExists { .. }));
    assert_eq!(cli.selected_version().unwrap(), 1);
}

#[test]
fn import_reads_directory_and_write_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("site");
    fs::create_dir_all(source.join("lib")).unwrap();
    fs::write(source.join("index.js"), "main").unwrap();
    fs::write(source.join("lib").join("utils.js"), "util").unwrap();

    let cli = context(&temp_dir).for_workspace(WorkspaceId::new("imported").unwrap());
    let out = cli
        .execute(&Commands::Import {
            dir: source.clone(),
            into: "/".to_string(),
        })
        .unwrap();
    assert!(out.contains("Imported 2 file(s)"));

    let replacement = temp_dir.path().join("new-index.js");
    fs::write(&replacement, "main v2").unwrap();
    cli.execute(&Commands::Write {
        path: "/index.js".to_string(),
        content: None,
        from_file: Some(replacement),
    })
    .unwrap();
    let content = cli
        .execute(&Commands::Cat {
            path: "/index.js".to_string(),
        })
        .unwrap();
    assert_eq!(content, "main v2");

    let listing = cli
        .execute(&Commands::Ls {
            format: "text".to_string(),
        })
        .unwrap();
    assert!(listing.contains("/lib/utils.js"));
}

#[test]
fn config_command_prints_toml() {
    let temp_dir = TempDir::new().unwrap();
    let cli = context(&temp_dir);
    let output = cli.execute(&Commands::Config).unwrap();
    let parsed: toml::Value = toml::from_str(&output).unwrap();
    assert_eq!(parsed["session"]["folder_placeholder"].as_str(), Some(".gitkeep"));
}
