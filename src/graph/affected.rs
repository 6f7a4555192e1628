//! Affected project analysis
//!
//! Given a set of changed files, determine:
//! - Which apps and libs directly contain those files
//! - Which projects are pulled in through implicit-dependency fan-out
//! - Which global implicit-dependency files were touched
//!
//! Each file is classified on its own and the results are folded into one
//! accumulator; nothing here performs I/O.

use super::implicit::ImplicitDependencies;
use super::layout::project_of;
use super::ordered_set::OrderedSet;
use crate::core::config::WorkspaceLayout;

/// Every known app and lib in the workspace.
#[derive(Debug, Clone, Default)]
pub struct ProjectCatalog {
  pub apps: OrderedSet,
  pub libs: OrderedSet,
}

impl ProjectCatalog {
  pub fn new(apps: impl IntoIterator<Item = String>, libs: impl IntoIterator<Item = String>) -> Self {
    Self {
      apps: apps.into_iter().collect(),
      libs: libs.into_iter().collect(),
    }
  }
}

/// Policy switches for fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AffectedOptions {
  /// Apps act as fan-out keys too, not only libs
  pub apps_fan_out: bool,
  /// Follow fan-out through projects that were themselves pulled in
  pub transitive: bool,
}

/// Final affected set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeResult {
  pub apps: Vec<String>,
  pub libs: Vec<String>,
  pub implicit_dependencies: Vec<String>,
}

impl ChangeResult {
  /// True when no app, lib or implicit dependency was touched.
  pub fn not_affected(&self) -> bool {
    self.apps.is_empty() && self.libs.is_empty() && self.implicit_dependencies.is_empty()
  }

  /// Apps followed by libs, without repeats.
  pub fn dirs(&self) -> Vec<String> {
    let set: OrderedSet = self.apps.iter().chain(&self.libs).cloned().collect();
    set.into_vec()
  }
}

/// Complete affected analysis.
#[derive(Debug, Clone)]
pub struct AffectedAnalysis {
  /// Files that changed
  pub changed_files: Vec<String>,

  /// Impact set
  pub result: ChangeResult,
}

/// Per-run accumulator for the fold over changed files.
#[derive(Debug, Default)]
struct Accumulator {
  apps: OrderedSet,
  libs: OrderedSet,
  implicit_dependencies: Vec<String>,
}

/// Read-only inputs shared by every classification step.
struct Classifier<'a> {
  layout: &'a WorkspaceLayout,
  catalog: &'a ProjectCatalog,
  implicit: &'a ImplicitDependencies,
  options: AffectedOptions,
}

impl Classifier<'_> {
  /// Apply every matching rule for one file. Rules never short-circuit.
  fn classify(&self, mut acc: Accumulator, file: &str) -> Accumulator {
    if self.implicit.is_global(file) {
      tracing::debug!("{}: global implicit dependency, every project affected", file);
      acc.implicit_dependencies.push(file.to_string());
      acc.apps.extend(self.catalog.apps.iter());
      acc.libs.extend(self.catalog.libs.iter());
    }

    if let Some(lib) = project_of(file, &self.layout.libs_dir) {
      tracing::debug!("{}: lib {}", file, lib);
      acc.libs.insert(lib);
      self.fan_out(&mut acc, lib);
    }

    if let Some(app) = project_of(file, &self.layout.apps_dir) {
      tracing::debug!("{}: app {}", file, app);
      acc.apps.insert(app);
      if self.options.apps_fan_out {
        self.fan_out(&mut acc, app);
      }
    }

    acc
  }

  /// Mark the dependents of `key`, bucketed by catalog membership.
  fn fan_out(&self, acc: &mut Accumulator, key: &str) {
    let dependents = if self.options.transitive {
      // Apps pulled in along the way only pass fan-out on under the apps policy
      self
        .implicit
        .transitive_dependents(key, |name| self.options.apps_fan_out || !self.catalog.apps.contains(name))
    } else {
      self.implicit.dependents(key)
    };

    for project in dependents {
      let is_app = self.catalog.apps.contains(&project);
      let is_lib = self.catalog.libs.contains(&project);
      if !is_app && !is_lib {
        tracing::debug!("{} depends on {} but is not a known project, skipping", project, key);
        continue;
      }
      if is_app {
        acc.apps.insert(project.as_str());
      }
      if is_lib {
        acc.libs.insert(project);
      }
    }
  }
}

/// Compute affected apps, libs and triggered implicit dependencies.
///
/// `ignore` only filters the final `apps`/`libs`; ignored projects still
/// take part in fan-out, and `implicit_dependencies` is never filtered.
pub fn compute_affected(
  changed_files: &[impl AsRef<str>],
  layout: &WorkspaceLayout,
  catalog: &ProjectCatalog,
  implicit: &ImplicitDependencies,
  ignore: &[String],
  options: AffectedOptions,
) -> ChangeResult {
  let classifier = Classifier {
    layout,
    catalog,
    implicit,
    options,
  };

  let acc = changed_files
    .iter()
    .fold(Accumulator::default(), |acc, file| classifier.classify(acc, file.as_ref()));

  let keep = |name: &String| !ignore.contains(name);
  ChangeResult {
    apps: acc.apps.into_vec().into_iter().filter(keep).collect(),
    libs: acc.libs.into_vec().into_iter().filter(keep).collect(),
    implicit_dependencies: acc.implicit_dependencies,
  }
}

/// Analyze a list of changed files, keeping the input list alongside the result.
pub fn analyze(
  changed_files: Vec<String>,
  layout: &WorkspaceLayout,
  catalog: &ProjectCatalog,
  implicit: &ImplicitDependencies,
  ignore: &[String],
  options: AffectedOptions,
) -> AffectedAnalysis {
  let result = compute_affected(&changed_files, layout, catalog, implicit, ignore, options);
  AffectedAnalysis { changed_files, result }
}
