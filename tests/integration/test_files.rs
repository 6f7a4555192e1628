//! Integration tests for `affected-projects files`

use crate::helpers::{TestWorkspace, affected_cmd, run_affected, run_affected_with_stdin, standard_workspace};
use anyhow::Result;
use serde_json::{Value, json};

#[test]
fn test_files_from_args() -> Result<()> {
  let (ws, _base) = standard_workspace()?;

  let output = run_affected(
    &ws.path,
    &["files", "apps/admin/src/main.ts", "./libs/ui/button.ts", "--format", "json"],
  )?;
  let json: Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(json["changed_files"], json!(["apps/admin/src/main.ts", "libs/ui/button.ts"]));
  assert_eq!(json["apps"], json!(["admin"]));
  assert_eq!(json["libs"], json!(["ui"]));

  Ok(())
}

#[test]
fn test_files_from_stdin() -> Result<()> {
  let (ws, _base) = standard_workspace()?;

  let output = run_affected_with_stdin(
    &ws.path,
    &["files", "-", "--format", "names-only"],
    "libs/core/src/index.ts\n\nnx.json\n",
  )?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  let names: Vec<&str> = stdout.lines().collect();
  // Direct core hit and its fan-out come first, then the global file adds the rest
  assert_eq!(names, vec!["web", "admin", "core", "ui"]);

  Ok(())
}

#[test]
fn test_files_apps_fan_out_flag() -> Result<()> {
  let ws = TestWorkspace::new(
    r#"{ "projects": { "docs": { "implicitDependencies": ["web"] } } }"#,
  )?;
  ws.add_project("apps/web")?;
  ws.add_project("apps/docs")?;
  ws.commit("Add apps")?;

  let plain = run_affected(&ws.path, &["files", "apps/web/index.ts", "--format", "json"])?;
  let plain: Value = serde_json::from_slice(&plain.stdout)?;
  assert_eq!(plain["apps"], json!(["web"]));

  let fanned = run_affected(
    &ws.path,
    &["files", "apps/web/index.ts", "--apps-fan-out", "--format", "json"],
  )?;
  let fanned: Value = serde_json::from_slice(&fanned.stdout)?;
  assert_eq!(fanned["apps"], json!(["web", "docs"]));

  Ok(())
}

#[test]
fn test_files_custom_layout_from_toml() -> Result<()> {
  let ws = TestWorkspace::new("{}")?;
  std::fs::remove_file(ws.path.join("nx.json"))?;
  ws.write_file(
    "affected.toml",
    r#"
[implicitDependencies]
"pnpm-lock.yaml" = "*"

[workspaceLayout]
appsDir = "./services/"
libsDir = "packages"

[projects.api]
implicitDependencies = ["shared"]
"#,
  )?;
  ws.add_project("services/api")?;
  ws.add_project("packages/shared")?;

  let output = run_affected(&ws.path, &["files", "packages/shared/lib.ts", "--format", "json"])?;
  let json: Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(json["apps"], json!(["api"]));
  assert_eq!(json["libs"], json!(["shared"]));

  let output = run_affected(&ws.path, &["files", "pnpm-lock.yaml", "--format", "json"])?;
  let json: Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(json["implicit_dependencies"], json!(["pnpm-lock.yaml"]));
  assert_eq!(json["dirs"], json!(["api", "shared"]));

  Ok(())
}

#[test]
fn test_files_missing_config_fails() -> Result<()> {
  let ws = TestWorkspace::new("{}")?;
  std::fs::remove_file(ws.path.join("nx.json"))?;

  let output = affected_cmd(&ws.path, &["files", "apps/web/a.ts"]).output()?;
  assert_eq!(output.status.code(), Some(1));

  Ok(())
}

#[test]
fn test_files_invalid_format_fails() -> Result<()> {
  let (ws, _base) = standard_workspace()?;

  let output = affected_cmd(&ws.path, &["files", "apps/web/a.ts", "--format", "yaml"]).output()?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown format"));

  Ok(())
}
