//! Integration tests for `affected-projects projects`

use crate::helpers::{run_affected, standard_workspace};
use anyhow::Result;
use serde_json::{Value, json};

#[test]
fn test_projects_json() -> Result<()> {
  let (ws, _base) = standard_workspace()?;
  std::fs::create_dir_all(ws.path.join("apps/.cache"))?;

  let output = run_affected(&ws.path, &["projects", "--json"])?;
  let json: Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(json["workspace_layout"], json!({ "apps_dir": "apps", "libs_dir": "libs" }));
  assert_eq!(json["apps"], json!(["admin", "web"]));
  assert_eq!(json["libs"], json!(["core", "ui"]));

  let entries = json["implicit_dependencies"].as_array().cloned().unwrap_or_default();
  assert!(entries.contains(&json!({ "kind": "global", "file": "package.json" })));
  assert!(entries.contains(&json!({ "kind": "keyed", "key": "core", "projects": ["web", "admin", "ui"] })));
  assert!(entries.contains(&json!({ "kind": "keyed", "key": "ui", "projects": ["admin"] })));

  Ok(())
}

#[test]
fn test_projects_text_from_subdir_root() -> Result<()> {
  let (ws, _base) = standard_workspace()?;
  let root = ws.path.display().to_string();

  let output = run_affected(&std::env::temp_dir(), &["projects", "--root", &root])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("Apps (apps/): 2"), "got: {}", stdout);
  assert!(stdout.contains("Libs (libs/): 2"), "got: {}", stdout);
  assert!(stdout.contains("nx.json → all projects"), "got: {}", stdout);

  Ok(())
}
