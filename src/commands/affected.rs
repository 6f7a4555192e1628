//! `affected-projects run` - Show which apps and libs are affected by a change
//!
//! Resolves the `(base, head)` pair from the trigger event, asks git for the
//! files that differ, and classifies them against the workspace layout and
//! implicit-dependency table. Every step runs after the previous one has
//! fully completed; any failure aborts the run.

use super::output::{self, OutputFormat};
use crate::core::context::WorkspaceContext;
use crate::core::error::RailResult;
use crate::core::refs::{self, ChangeEvent, Refs};
use crate::core::vcs::{ChangeSource, SystemGit};
use crate::graph::{AffectedAnalysis, AffectedOptions, affected};
use std::path::PathBuf;

/// Where the refs come from
#[derive(Debug, Clone, Default)]
pub struct RefsInput {
  pub event_name: String,
  pub event_path: Option<PathBuf>,
  pub base: Option<String>,
  pub head: Option<String>,
  pub ignore: Option<String>,
}

impl RefsInput {
  /// Run the reference resolver over this input
  pub fn resolve(&self) -> RailResult<Refs> {
    let event = ChangeEvent::from_trigger(&self.event_name, self.event_path.as_deref())?;
    refs::resolve(&event, self.base.as_deref(), self.head.as_deref(), self.ignore.as_deref())
  }
}

/// How to report the result
#[derive(Debug, Clone)]
pub struct ReportOptions {
  pub format: String,
  pub github_output: Option<PathBuf>,
}

/// Run the affected command
pub fn run_affected(
  ctx: &WorkspaceContext,
  input: RefsInput,
  options: AffectedOptions,
  report: ReportOptions,
  dry_run: bool,
) -> RailResult<()> {
  let output_format = OutputFormat::from_str(&report.format)?;
  let refs = input.resolve()?;
  let git = SystemGit::open(ctx.workspace_root())?;
  tracing::debug!("Git work tree: {}", git.work_tree().display());

  if dry_run {
    let changed_files = git.compare_revisions(&refs.base, &refs.head)?;
    println!("DRY RUN: Would analyze {} changed files", changed_files.len());
    for file in &changed_files {
      println!("  - {}", file);
    }
    return Ok(());
  }

  let analysis = analyze_between(ctx, &git, &refs, options)?;
  emit(&analysis, output_format, report.github_output.as_deref())
}

/// Diff `refs` with `source` and classify the result.
pub fn analyze_between(
  ctx: &WorkspaceContext,
  source: &impl ChangeSource,
  refs: &Refs,
  options: AffectedOptions,
) -> RailResult<AffectedAnalysis> {
  let changed_files = source.compare_revisions(&refs.base, &refs.head)?;
  tracing::info!("{} changed files between {} and {}", changed_files.len(), refs.base, refs.head);

  Ok(affected::analyze(
    changed_files,
    ctx.layout(),
    &ctx.catalog,
    &ctx.implicit,
    &refs.ignore,
    options,
  ))
}

/// Print the analysis and, if requested, append workflow outputs.
pub(crate) fn emit(
  analysis: &AffectedAnalysis,
  format: OutputFormat,
  github_output: Option<&std::path::Path>,
) -> RailResult<()> {
  output::display_results(analysis, format)?;
  if let Some(path) = github_output {
    output::write_github_output(path, &analysis.result)?;
  }
  Ok(())
}
