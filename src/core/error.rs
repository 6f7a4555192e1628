//! Error types for affected-projects with contextual messages and exit codes
//!
//! One error type for the whole run. Every fatal failure (missing refs, git
//! diff failure, unreadable workspace config) bubbles up to `main` as a
//! `RailError`, which prints it with optional help text and exits with the
//! matching code.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for affected-projects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing refs)
  User = 1,
  /// System error (git, I/O)
  System = 2,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for affected-projects
#[derive(Debug)]
pub enum RailError {
  /// Workspace configuration errors
  Config(ConfigError),

  /// Revision resolution errors
  Refs(RefsError),

  /// Git operation errors
  Git(GitError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl RailError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    RailError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      RailError::Message { message, context, help } => RailError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      RailError::Io(err) => RailError::Message {
        message: format!("I/O error: {}", err),
        context: Some(ctx_str),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      RailError::Config(_) => ExitCode::User,
      RailError::Refs(_) => ExitCode::User,
      RailError::Git(_) => ExitCode::System,
      RailError::Io(_) => ExitCode::System,
      RailError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      RailError::Config(e) => e.help_message(),
      RailError::Refs(e) => e.help_message(),
      RailError::Git(e) => e.help_message(),
      RailError::Message { help, .. } => help.clone(),
      RailError::Io(_) => None,
    }
  }
}

impl fmt::Display for RailError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RailError::Config(e) => write!(f, "{}", e),
      RailError::Refs(e) => write!(f, "{}", e),
      RailError::Git(e) => write!(f, "{}", e),
      RailError::Io(e) => write!(f, "I/O error: {}", e),
      RailError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for RailError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      RailError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for RailError {
  fn from(err: io::Error) -> Self {
    RailError::Io(err)
  }
}

impl From<toml_edit::de::Error> for RailError {
  fn from(err: toml_edit::de::Error) -> Self {
    RailError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for RailError {
  fn from(err: serde_json::Error) -> Self {
    RailError::message(format!("JSON error: {}", err))
  }
}

/// Workspace configuration errors
#[derive(Debug)]
pub enum ConfigError {
  /// No workspace config file in any search location
  NotFound { workspace_root: PathBuf },

  /// Config file exists but could not be parsed
  Parse { path: PathBuf, reason: String },

  /// `workspaceLayout` names an unusable directory
  InvalidLayout { field: String, value: String },

  /// A project root directory exists but could not be listed
  Listing { path: PathBuf, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Create an nx.json (or affected.toml) at the workspace root, or pass --config <path>.".to_string())
      }
      ConfigError::Parse { .. } => Some("Check the file for syntax errors.".to_string()),
      ConfigError::InvalidLayout { field, .. } => Some(format!(
        "Set workspaceLayout.{} to a directory relative to the workspace root (e.g. \"apps\").",
        field
      )),
      ConfigError::Listing { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { workspace_root } => {
        write!(
          f,
          "No workspace configuration found.\nSearched: {root}/nx.json, {root}/affected.toml, {root}/.config/affected.toml",
          root = workspace_root.display()
        )
      }
      ConfigError::Parse { path, reason } => {
        write!(f, "Failed to parse workspace config {}: {}", path.display(), reason)
      }
      ConfigError::InvalidLayout { field, value } => {
        write!(f, "Invalid workspaceLayout.{}: '{}'", field, value)
      }
      ConfigError::Listing { path, reason } => {
        write!(f, "Failed to list projects in {}: {}", path.display(), reason)
      }
    }
  }
}

/// Revision resolution errors
#[derive(Debug)]
pub enum RefsError {
  /// Trigger kind needs explicit refs, or resolution produced an empty ref
  MissingRefs { event: String },
}

impl RefsError {
  fn help_message(&self) -> Option<String> {
    match self {
      RefsError::MissingRefs { .. } => {
        Some("Pass both --base and --head, or run from a pull_request / push event.".to_string())
      }
    }
  }
}

impl fmt::Display for RefsError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RefsError::MissingRefs { event } => {
        write!(f, "Base and head refs are required for '{}' events", event)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::CommandFailed { stderr, .. } => {
        if stderr.contains("unknown revision") || stderr.contains("bad revision") {
          Some("Make sure both revisions are fetched (e.g. actions/checkout with fetch-depth: 0).".to_string())
        } else {
          None
        }
      }
      GitError::RepoNotFound { path } => Some(format!(
        "Run inside a git checkout or pass --root pointing at one: {}",
        path.display()
      )),
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
    }
  }
}

/// Result type alias for affected-projects
pub type RailResult<T> = Result<T, RailError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> RailResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> RailResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<RailError>,
{
  fn context(self, ctx: impl Into<String>) -> RailResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> RailResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &RailError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
