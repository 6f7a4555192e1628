//! CLI commands for affected-projects
//!
//! - **affected**: Resolve refs, diff with git, report affected projects (`run`)
//! - **files**: Same analysis over an explicit list of paths
//! - **refs**: Only resolve the base/head pair
//! - **projects**: Show discovered projects and implicit dependencies
//! - **output**: Rendering shared by `run` and `files`

pub mod affected;
pub mod files;
pub mod output;
pub mod projects;
pub mod refs;

pub use affected::{RefsInput, ReportOptions, run_affected};
pub use files::run_files;
pub use projects::run_projects;
pub use refs::run_refs;
