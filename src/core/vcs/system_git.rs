//! System git backend
//!
//! Shells out to the `git` binary with an isolated environment. Only the
//! operations the affected analysis needs live here: opening a repository
//! and listing the files that differ between two revisions.

use super::ChangeSource;
use crate::core::error::{GitError, RailError, RailResult, ResultExt};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using system git
pub struct SystemGit {
  /// Repository working directory
  pub(crate) repo_path: PathBuf,

  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  ///
  /// This performs ONE subprocess call to get the repository metadata.
  pub fn open(path: &Path) -> RailResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(RailError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(RailError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = stdout.trim();

    Ok(Self {
      repo_path: path.to_path_buf(),
      work_tree: PathBuf::from(work_tree),
    })
  }

  /// Working tree root as reported by git
  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Files that differ between `base` and `head`.
  ///
  /// Uses the three-dot form so a pull request only reports what its head
  /// changed since the merge base, matching what a hosted compare view shows.
  /// Paths are relative to the opened directory (`--relative`), so a
  /// workspace nested inside a larger repository sees its own layout. Rename
  /// detection is off: a move reports both the old and the new path.
  pub fn changed_files_between(&self, base: &str, head: &str) -> RailResult<Vec<String>> {
    let range = format!("{}...{}", base, head);
    let output = self
      .git_cmd()
      .args(["diff", "--name-status", "-z", "--no-renames", "--relative", &range, "--"])
      .output()
      .context("Failed to run git diff")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(RailError::Git(GitError::CommandFailed {
        command: format!("git diff {}", range),
        stderr: stderr.trim().to_string(),
      }));
    }

    Ok(parse_name_status_z(&output.stdout))
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    // Isolated environment (don't trust global config)
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }
}

impl ChangeSource for SystemGit {
  fn compare_revisions(&self, base: &str, head: &str) -> RailResult<Vec<String>> {
    self.changed_files_between(base, head)
  }
}

/// Parse `git diff --name-status -z` output: `STATUS\0PATH\0` records.
///
/// Paths are raw bytes; one that is not valid UTF-8 is kept with the bad
/// bytes replaced, so the project directory in front of it still matches.
fn parse_name_status_z(stdout: &[u8]) -> Vec<String> {
  let mut files = Vec::new();
  let mut fields = stdout.split(|&b| b == 0).filter(|f| !f.is_empty());

  while let Some(status) = fields.next() {
    // Copies and renames carry two paths (only with rename detection on)
    let paths = if status.starts_with(b"R") || status.starts_with(b"C") { 2 } else { 1 };
    for _ in 0..paths {
      if let Some(path) = fields.next() {
        let path = String::from_utf8_lossy(path);
        if matches!(path, Cow::Owned(_)) {
          tracing::warn!("Changed path is not valid UTF-8, using {}", path);
        }
        files.push(path.into_owned());
      }
    }
  }

  files
}
