//! Rendering of affected results
//!
//! Stdout formats for humans and scripts, plus the `key=value` outputs a CI
//! runner reads from the `$GITHUB_OUTPUT` file.

use crate::core::error::{RailError, RailResult, ResultExt};
use crate::graph::{AffectedAnalysis, ChangeResult};
use serde_json::json;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Output format for affected results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
  Text,
  Json,
  NamesOnly,
  Github,
}

impl OutputFormat {
  pub fn from_str(s: &str) -> RailResult<Self> {
    match s.to_lowercase().as_str() {
      "text" => Ok(Self::Text),
      "json" => Ok(Self::Json),
      "names" | "names-only" => Ok(Self::NamesOnly),
      "github" => Ok(Self::Github),
      _ => Err(RailError::message(format!(
        "Unknown format '{}'. Valid formats: text, json, names-only, github",
        s
      ))),
    }
  }
}

/// The named outputs consumed by the invoking workflow, in a fixed order.
pub fn github_outputs(result: &ChangeResult) -> RailResult<Vec<(&'static str, String)>> {
  let matrix = serde_json::to_string(&json!({ "app": result.apps }))?;

  Ok(vec![
    ("changed-apps", result.apps.join(" ")),
    ("changed-libs", result.libs.join(" ")),
    ("changed-dirs", result.dirs().join(" ")),
    ("changed-implicit-dependencies", result.implicit_dependencies.join(" ")),
    ("changed-apps-matrix", matrix),
    ("not-affected", result.not_affected().to_string()),
  ])
}

/// Render outputs as `key=value` lines.
pub fn render_github_outputs(result: &ChangeResult) -> RailResult<String> {
  let mut out = String::new();
  for (key, value) in github_outputs(result)? {
    out.push_str(key);
    out.push('=');
    out.push_str(&value);
    out.push('\n');
  }
  Ok(out)
}

/// Append outputs to a `$GITHUB_OUTPUT`-style file.
pub fn write_github_output(path: &Path, result: &ChangeResult) -> RailResult<()> {
  let rendered = render_github_outputs(result)?;
  let mut file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("Failed to open output file {}", path.display()))?;
  file
    .write_all(rendered.as_bytes())
    .with_context(|| format!("Failed to write outputs to {}", path.display()))?;
  tracing::debug!("Wrote outputs to {}", path.display());
  Ok(())
}

/// Render an analysis in the requested stdout format.
pub fn render(analysis: &AffectedAnalysis, format: OutputFormat) -> RailResult<String> {
  match format {
    OutputFormat::Text => Ok(render_text(analysis)),
    OutputFormat::Json => render_json(analysis),
    OutputFormat::NamesOnly => Ok(render_names_only(&analysis.result)),
    OutputFormat::Github => render_github_outputs(&analysis.result),
  }
}

/// Display results to stdout
pub fn display_results(analysis: &AffectedAnalysis, format: OutputFormat) -> RailResult<()> {
  print!("{}", render(analysis, format)?);
  Ok(())
}

fn render_text(analysis: &AffectedAnalysis) -> String {
  let result = &analysis.result;
  let mut out = String::new();

  out.push_str("Affected Analysis\n");
  out.push_str("=================\n\n");

  out.push_str(&format!("Changed files: {}\n", analysis.changed_files.len()));
  if !analysis.changed_files.is_empty() && analysis.changed_files.len() <= 20 {
    for file in &analysis.changed_files {
      out.push_str(&format!("  {}\n", file));
    }
  }
  out.push('\n');

  if result.not_affected() {
    out.push_str("Not affected\n");
    return out;
  }

  out.push_str(&format!("Affected apps: {}\n", result.apps.len()));
  for app in &result.apps {
    out.push_str(&format!("  📦 {}\n", app));
  }
  out.push('\n');

  out.push_str(&format!("Affected libs: {}\n", result.libs.len()));
  for lib in &result.libs {
    out.push_str(&format!("  📚 {}\n", lib));
  }
  out.push('\n');

  out.push_str(&format!("Implicit dependencies: {}\n", result.implicit_dependencies.len()));
  for file in &result.implicit_dependencies {
    out.push_str(&format!("  ⚙  {}\n", file));
  }

  out
}

fn render_json(analysis: &AffectedAnalysis) -> RailResult<String> {
  let result = &analysis.result;
  let output = json!({
      "changed_files": analysis.changed_files,
      "apps": result.apps,
      "libs": result.libs,
      "implicit_dependencies": result.implicit_dependencies,
      "dirs": result.dirs(),
      "not_affected": result.not_affected(),
      "summary": {
          "changed_files_count": analysis.changed_files.len(),
          "apps_count": result.apps.len(),
          "libs_count": result.libs.len(),
          "implicit_dependencies_count": result.implicit_dependencies.len()
      }
  });

  let mut rendered = serde_json::to_string_pretty(&output)?;
  rendered.push('\n');
  Ok(rendered)
}

fn render_names_only(result: &ChangeResult) -> String {
  result.dirs().iter().map(|name| format!("{}\n", name)).collect()
}
