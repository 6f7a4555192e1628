//! `affected-projects files` - Classify an explicit list of changed paths
//!
//! Same analysis as `run`, but the changed files come from the command line
//! or stdin instead of git. Useful when another tool already produced the
//! diff.

use super::affected::{ReportOptions, emit};
use super::output::OutputFormat;
use crate::core::context::WorkspaceContext;
use crate::core::error::{RailResult, ResultExt};
use crate::core::refs;
use crate::graph::layout::normalize_path;
use crate::graph::{AffectedOptions, affected};
use std::io::{self, BufRead};

/// Run the files command. A single `-` reads paths from stdin, one per line.
pub fn run_files(
  ctx: &WorkspaceContext,
  files: Vec<String>,
  ignore: Option<String>,
  options: AffectedOptions,
  report: ReportOptions,
) -> RailResult<()> {
  let output_format = OutputFormat::from_str(&report.format)?;

  let raw = if files.len() == 1 && files[0] == "-" {
    read_lines(io::stdin().lock())?
  } else {
    files
  };
  let changed_files = collect_paths(raw);
  let ignore = refs::parse_ignore(ignore.as_deref());

  let analysis = affected::analyze(
    changed_files,
    ctx.layout(),
    &ctx.catalog,
    &ctx.implicit,
    &ignore,
    options,
  );
  emit(&analysis, output_format, report.github_output.as_deref())
}

fn read_lines(reader: impl BufRead) -> RailResult<Vec<String>> {
  reader
    .lines()
    .collect::<Result<Vec<_>, _>>()
    .context("Failed to read changed files from stdin")
}

/// Normalize paths and drop blank lines.
fn collect_paths(raw: Vec<String>) -> Vec<String> {
  raw
    .iter()
    .map(|line| normalize_path(line))
    .filter(|path| !path.is_empty())
    .collect()
}
