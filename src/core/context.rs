//! Workspace context - build once, pass everywhere
//!
//! Loads the workspace config, lists the project directories and builds the
//! implicit-dependency table in one go, so commands only deal with
//! in-memory data.
//!
//! ```text
//! main.rs:
//!   WorkspaceContext::build() -> &WorkspaceContext
//!   |
//!   v
//! commands/affected.rs, files.rs, projects.rs:
//!   fn run_*(ctx: &WorkspaceContext, ...)
//! ```

use crate::core::config::{WorkspaceConfig, WorkspaceLayout};
use crate::core::error::RailResult;
use crate::graph::layout::list_projects;
use crate::graph::{ImplicitDependencies, ProjectCatalog};
use std::path::{Path, PathBuf};

/// Everything the affected analysis needs to know about the workspace.
#[derive(Debug, Clone)]
pub struct WorkspaceContext {
  /// Workspace root directory
  pub root: PathBuf,

  /// Parsed workspace config
  pub config: WorkspaceConfig,

  /// Known apps and libs (live directory listing)
  pub catalog: ProjectCatalog,

  /// Global files and keyed fan-out table
  pub implicit: ImplicitDependencies,
}

impl WorkspaceContext {
  /// Build workspace context from a root directory.
  ///
  /// `config_path` overrides the config search. Any read failure is fatal.
  pub fn build(workspace_root: &Path, config_path: Option<&Path>) -> RailResult<Self> {
    let root = workspace_root.to_path_buf();
    let config = match config_path {
      Some(path) => WorkspaceConfig::load_from(&root.join(path))?,
      None => WorkspaceConfig::load(&root)?,
    };
    Self::from_config(root, config)
  }

  /// Build from an already-parsed config (lists project directories).
  pub fn from_config(root: PathBuf, config: WorkspaceConfig) -> RailResult<Self> {
    let layout = &config.workspace_layout;
    let apps = list_projects(&root, &layout.apps_dir)?;
    let libs = list_projects(&root, &layout.libs_dir)?;
    tracing::debug!("Found {} apps in {}, {} libs in {}", apps.len(), layout.apps_dir, libs.len(), layout.libs_dir);

    let implicit = ImplicitDependencies::from_config(&config);

    Ok(Self {
      root,
      catalog: ProjectCatalog::new(apps, libs),
      implicit,
      config,
    })
  }

  /// Workspace layout (normalized)
  pub fn layout(&self) -> &WorkspaceLayout {
    &self.config.workspace_layout
  }

  /// Get workspace root as Path reference (convenience)
  pub fn workspace_root(&self) -> &Path {
    &self.root
  }
}
