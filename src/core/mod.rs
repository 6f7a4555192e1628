//! Core building blocks for affected-projects
//!
//! - **config**: Workspace configuration (nx.json / affected.toml) parsing
//! - **context**: Workspace context loaded once and shared by commands
//! - **error**: Error types with contextual help messages and exit codes
//! - **refs**: Base/head resolution from the trigger event
//! - **vcs**: Changed-file source (SystemGit)

pub mod config;
pub mod context;
pub mod error;
pub mod refs;
pub mod vcs;
