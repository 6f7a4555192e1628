use crate::core::error::{ConfigError, RailError, RailResult, ResultExt};
use crate::graph::layout::normalize_path;
use crate::graph::ordered_set::OrderedSet;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Workspace configuration (Nx-style)
/// Searched in order: nx.json, affected.toml, .config/affected.toml
#[derive(Debug, Clone, Default)]
pub struct WorkspaceConfig {
  /// Global implicit dependencies: file path -> anything.
  /// Only the keys matter; the values (`"*"`, project lists, nested
  /// objects) are carried through untouched.
  pub implicit_dependencies: BTreeMap<String, serde_json::Value>,

  pub workspace_layout: WorkspaceLayout,

  /// Declared projects, in declaration order
  pub projects: Vec<(String, ProjectConfig)>,
}

/// Root directories whose first-level subdirectories are projects
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceLayout {
  #[serde(default = "default_apps_dir")]
  pub apps_dir: String,
  #[serde(default = "default_libs_dir")]
  pub libs_dir: String,
}

fn default_apps_dir() -> String {
  "apps".to_string()
}

fn default_libs_dir() -> String {
  "libs".to_string()
}

impl Default for WorkspaceLayout {
  fn default() -> Self {
    Self {
      apps_dir: default_apps_dir(),
      libs_dir: default_libs_dir(),
    }
  }
}

impl WorkspaceLayout {
  /// Normalize both directories and reject ones that would match the
  /// repository root itself.
  pub fn normalized(&self) -> RailResult<Self> {
    Ok(Self {
      apps_dir: normalize_dir("appsDir", &self.apps_dir)?,
      libs_dir: normalize_dir("libsDir", &self.libs_dir)?,
    })
  }
}

/// Strip `./` prefixes and surrounding slashes so layout dirs compare
/// segment-wise against git's repository-relative paths.
fn normalize_dir(field: &str, raw: &str) -> RailResult<String> {
  let mut dir = raw.trim();
  while let Some(rest) = dir.strip_prefix("./") {
    dir = rest;
  }
  let dir = dir.trim_matches('/');

  if dir.is_empty() || dir == "." || dir.split('/').any(|seg| seg.is_empty() || seg == "..") {
    return Err(RailError::Config(ConfigError::InvalidLayout {
      field: field.to_string(),
      value: raw.to_string(),
    }));
  }

  Ok(dir.to_string())
}

/// Per-project settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
  /// Keys (usually other project names) whose changes affect this project
  #[serde(default)]
  pub implicit_dependencies: Vec<String>,
}

/// On-disk shape; `projects` is a map there but we keep declaration order.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWorkspaceConfig {
  #[serde(default)]
  implicit_dependencies: BTreeMap<String, serde_json::Value>,
  #[serde(default)]
  workspace_layout: WorkspaceLayout,
  #[serde(default)]
  projects: serde_json::Map<String, serde_json::Value>,
}

impl WorkspaceConfig {
  /// Find config file in search order: nx.json, affected.toml, .config/affected.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("nx.json"),
      path.join("affected.toml"),
      path.join(".config").join("affected.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from the workspace root (searches multiple locations)
  pub fn load(path: &Path) -> RailResult<Self> {
    let config_path = Self::find_config_path(path).ok_or_else(|| {
      RailError::Config(ConfigError::NotFound {
        workspace_root: path.to_path_buf(),
      })
    })?;

    Self::load_from(&config_path)
  }

  /// Load config from an explicit file. `.toml` files are read as TOML,
  /// everything else as JSON.
  pub fn load_from(config_path: &Path) -> RailResult<Self> {
    let content = fs::read_to_string(config_path)
      .with_context(|| format!("Failed to read workspace config from {}", config_path.display()))?;

    let is_toml = config_path.extension().is_some_and(|ext| ext == "toml");
    let parsed = if is_toml {
      Self::from_toml_str(&content)
    } else {
      Self::from_json_str(&content)
    };

    parsed.map_err(|e| match e {
      RailError::Config(_) => e,
      other => RailError::Config(ConfigError::Parse {
        path: config_path.to_path_buf(),
        reason: other.to_string(),
      }),
    })
  }

  /// Parse the JSON form (nx.json)
  pub fn from_json_str(content: &str) -> RailResult<Self> {
    let raw: RawWorkspaceConfig = serde_json::from_str(content)?;
    raw.into_config()
  }

  /// Parse the TOML form (affected.toml)
  pub fn from_toml_str(content: &str) -> RailResult<Self> {
    let raw: RawWorkspaceConfig = toml_edit::de::from_str(content)?;
    raw.into_config()
  }

  /// Global implicit-dependency file paths, normalized like git's paths
  /// (`./package.json` is `package.json`). Key order, no repeats.
  pub fn global_files(&self) -> Vec<String> {
    let files: OrderedSet = self
      .implicit_dependencies
      .keys()
      .map(|key| normalize_path(key))
      .filter(|path| !path.is_empty())
      .collect();
    files.into_vec()
  }
}

impl RawWorkspaceConfig {
  fn into_config(self) -> RailResult<WorkspaceConfig> {
    let mut projects = Vec::with_capacity(self.projects.len());
    for (name, value) in self.projects {
      // Older Nx configs map a project to a bare string (its root); treat as no deps
      let project = match value {
        serde_json::Value::Object(_) => serde_json::from_value::<ProjectConfig>(value)
          .map_err(|e| RailError::message(format!("project '{}': {}", name, e)))?,
        _ => ProjectConfig::default(),
      };
      projects.push((name, project));
    }

    Ok(WorkspaceConfig {
      implicit_dependencies: self.implicit_dependencies,
      workspace_layout: self.workspace_layout.normalized()?,
      projects,
    })
  }
}
