//! Workspace layout: path → project classification and project discovery
//!
//! A project is a first-level subdirectory of a layout root (`appsDir` or
//! `libsDir`). A changed file belongs to a project only if it sits strictly
//! inside that subdirectory: `apps/web/src/main.ts` belongs to `web`, while
//! `apps/web` on its own belongs to nothing.

use crate::core::error::{ConfigError, RailError, RailResult};
use std::fs;
use std::io;
use std::path::Path;

/// Name of the project under `root_dir` that owns `file`, if any.
///
/// `root_dir` must be normalized (no leading `./`, no surrounding `/`) and
/// may span several segments (`packages/apps`). Matching is segment-wise:
/// `apps-legacy/x/y` is not under `apps`.
pub fn project_of<'a>(file: &'a str, root_dir: &str) -> Option<&'a str> {
  let rest = file.strip_prefix(root_dir)?.strip_prefix('/')?;
  let (name, tail) = rest.split_once('/')?;
  if name.is_empty() || tail.is_empty() {
    return None;
  }
  Some(name)
}

/// Normalize a changed path coming from outside git (stdin, CLI args):
/// trims whitespace, converts backslashes and drops leading `./`.
pub fn normalize_path(raw: &str) -> String {
  let mut path = raw.trim().replace('\\', "/");
  while let Some(rest) = path.strip_prefix("./") {
    path = rest.to_string();
  }
  path
}

/// Sorted names of the non-hidden subdirectories of `<root>/<dir>`.
///
/// A missing directory yields no projects; any other read failure is a
/// config error.
pub fn list_projects(root: &Path, dir: &str) -> RailResult<Vec<String>> {
  let path = root.join(dir);
  let listing_error = |e: io::Error| {
    RailError::Config(ConfigError::Listing {
      path: path.clone(),
      reason: e.to_string(),
    })
  };

  let entries = match fs::read_dir(&path) {
    Ok(entries) => entries,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      tracing::debug!("{} does not exist, no projects there", path.display());
      return Ok(Vec::new());
    }
    Err(e) => return Err(listing_error(e)),
  };

  let mut names = Vec::new();
  for entry in entries {
    let entry = entry.map_err(listing_error)?;
    let name = entry.file_name().to_string_lossy().into_owned();
    if name.starts_with('.') || !entry.path().is_dir() {
      continue;
    }
    names.push(name);
  }

  names.sort();
  Ok(names)
}
