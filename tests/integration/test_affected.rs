//! Integration tests for `affected-projects run`

use crate::helpers::{affected_cmd, output_value, parse_outputs, run_affected, standard_workspace};
use anyhow::Result;
use serde_json::{Value, json};

fn run_json(ws_path: &std::path::Path, base: &str, head: &str, extra: &[&str]) -> Result<Value> {
  let mut args = vec!["run", "--base", base, "--head", head, "--format", "json"];
  args.extend_from_slice(extra);
  let output = run_affected(ws_path, &args)?;
  Ok(serde_json::from_slice(&output.stdout)?)
}

#[test]
fn test_affected_app_change() -> Result<()> {
  let (ws, base) = standard_workspace()?;
  ws.write_file("apps/web/src/index.ts", "export const name = 'changed';\n")?;
  let head = ws.commit("Change web")?;

  let json = run_json(&ws.path, &base, &head, &[])?;
  assert_eq!(json["apps"], json!(["web"]));
  assert_eq!(json["libs"], json!([]));
  assert_eq!(json["implicit_dependencies"], json!([]));
  assert_eq!(json["not_affected"], json!(false));
  assert_eq!(json["changed_files"], json!(["apps/web/src/index.ts"]));

  Ok(())
}

#[test]
fn test_affected_lib_fans_out() -> Result<()> {
  let (ws, base) = standard_workspace()?;
  ws.write_file("libs/core/src/util.ts", "export const util = 1;\n")?;
  let head = ws.commit("Add core util")?;

  let json = run_json(&ws.path, &base, &head, &[])?;
  assert_eq!(json["apps"], json!(["web", "admin"]));
  assert_eq!(json["libs"], json!(["core", "ui"]));

  Ok(())
}

#[test]
fn test_affected_global_implicit_dependency() -> Result<()> {
  let (ws, base) = standard_workspace()?;
  ws.write_file("package.json", "{ \"name\": \"acme\", \"version\": \"2.0.0\" }\n")?;
  let head = ws.commit("Bump root package")?;

  let json = run_json(&ws.path, &base, &head, &[])?;
  assert_eq!(json["apps"], json!(["admin", "web"]));
  assert_eq!(json["libs"], json!(["core", "ui"]));
  assert_eq!(json["implicit_dependencies"], json!(["package.json"]));

  Ok(())
}

#[test]
fn test_affected_unrelated_change_not_affected() -> Result<()> {
  let (ws, base) = standard_workspace()?;
  ws.write_file("README.md", "# acme\n\nDocs.\n")?;
  ws.write_file("apps/NOTES.md", "not a project\n")?;
  let head = ws.commit("Docs")?;

  let output = run_affected(&ws.path, &["run", "--base", &base, "--head", &head])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("Changed files: 2"), "got: {}", stdout);
  assert!(stdout.contains("Not affected"), "got: {}", stdout);

  Ok(())
}

#[test]
fn test_affected_writes_github_outputs_with_ignore() -> Result<()> {
  let (ws, base) = standard_workspace()?;
  ws.write_file("apps/web/src/index.ts", "export const name = 'ignored';\n")?;
  let head = ws.commit("Change web")?;

  let out_file = ws.path.join("github-output.txt");
  let out_arg = out_file.display().to_string();
  run_affected(
    &ws.path,
    &[
      "run",
      "--base",
      &base,
      "--head",
      &head,
      "--ignore",
      r#"["web"]"#,
      "--github-output",
      &out_arg,
    ],
  )?;

  let outputs = parse_outputs(&ws.read_file("github-output.txt")?);
  assert_eq!(output_value(&outputs, "changed-apps").as_deref(), Some(""));
  assert_eq!(output_value(&outputs, "changed-dirs").as_deref(), Some(""));
  assert_eq!(output_value(&outputs, "changed-apps-matrix").as_deref(), Some(r#"{"app":[]}"#));
  assert_eq!(output_value(&outputs, "not-affected").as_deref(), Some("true"));

  Ok(())
}

#[test]
fn test_affected_malformed_ignore_is_not_fatal() -> Result<()> {
  let (ws, base) = standard_workspace()?;
  ws.write_file("apps/web/src/index.ts", "export const name = 'x';\n")?;
  let head = ws.commit("Change web")?;

  let json = run_json(&ws.path, &base, &head, &["--ignore", "web,admin"])?;
  assert_eq!(json["apps"], json!(["web"]));

  Ok(())
}

#[test]
fn test_affected_pull_request_event_overrides_refs() -> Result<()> {
  let (ws, base) = standard_workspace()?;
  ws.write_file("libs/ui/src/button.ts", "export const button = 1;\n")?;
  let head = ws.commit("Add button")?;

  let event = ws.path.join("event.json");
  std::fs::write(
    &event,
    format!(
      r#"{{ "pull_request": {{ "base": {{ "sha": "{}" }}, "head": {{ "sha": "{}" }} }} }}"#,
      base, head
    ),
  )?;
  let event_arg = event.display().to_string();

  let output = run_affected(
    &ws.path,
    &[
      "run",
      "--event-name",
      "pull_request",
      "--event-path",
      &event_arg,
      "--base",
      "does-not-exist",
      "--head",
      "also-missing",
      "--format",
      "github",
    ],
  )?;

  let outputs = parse_outputs(&String::from_utf8_lossy(&output.stdout));
  assert_eq!(output_value(&outputs, "changed-apps").as_deref(), Some("admin"));
  assert_eq!(output_value(&outputs, "changed-libs").as_deref(), Some("ui"));
  assert_eq!(output_value(&outputs, "changed-dirs").as_deref(), Some("admin ui"));
  assert_eq!(output_value(&outputs, "not-affected").as_deref(), Some("false"));

  Ok(())
}

#[test]
fn test_affected_names_only() -> Result<()> {
  let (ws, base) = standard_workspace()?;
  ws.write_file("libs/core/src/index.ts", "export const name = 'core2';\n")?;
  let head = ws.commit("Change core")?;

  let output = run_affected(
    &ws.path,
    &["run", "--base", &base, "--head", &head, "--format", "names-only"],
  )?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  let lines: Vec<&str> = stdout.trim().lines().collect();
  assert_eq!(lines, vec!["web", "admin", "core", "ui"]);

  Ok(())
}

#[test]
fn test_affected_dry_run_lists_files() -> Result<()> {
  let (ws, base) = standard_workspace()?;
  ws.write_file("apps/admin/src/index.ts", "export const name = 'a';\n")?;
  let head = ws.commit("Change admin")?;

  let output = run_affected(&ws.path, &["run", "--base", &base, "--head", &head, "--dry-run"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("Would analyze 1 changed files"));
  assert!(stdout.contains("apps/admin/src/index.ts"));

  Ok(())
}

#[test]
fn test_affected_manual_without_refs_fails() -> Result<()> {
  let (ws, _base) = standard_workspace()?;

  let output = affected_cmd(&ws.path, &["run", "--base", "main"]).output()?;
  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("'manual'"), "got: {}", stderr);

  Ok(())
}

#[test]
fn test_affected_unknown_revision_fails() -> Result<()> {
  let (ws, base) = standard_workspace()?;

  let output = affected_cmd(&ws.path, &["run", "--base", &base, "--head", "no-such-ref"]).output()?;
  assert_eq!(output.status.code(), Some(2));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Git command failed"), "got: {}", stderr);

  Ok(())
}

#[test]
fn test_affected_transitive_flag() -> Result<()> {
  let ws = crate::helpers::TestWorkspace::new(
    r#"{
      "projects": {
        "ui": { "implicitDependencies": ["core"] },
        "shop": { "implicitDependencies": ["ui"] }
      }
    }"#,
  )?;
  for dir in ["apps/shop", "libs/core", "libs/ui"] {
    ws.add_project(dir)?;
  }
  let base = ws.commit("Add projects")?;
  ws.write_file("libs/core/src/index.ts", "export const v = 2;\n")?;
  let head = ws.commit("Change core")?;

  let single = run_json(&ws.path, &base, &head, &[])?;
  assert_eq!(single["apps"], json!([]));
  assert_eq!(single["libs"], json!(["core", "ui"]));

  let transitive = run_json(&ws.path, &base, &head, &["--transitive"])?;
  assert_eq!(transitive["apps"], json!(["shop"]));
  assert_eq!(transitive["libs"], json!(["core", "ui"]));

  Ok(())
}
