pub mod system_git;

pub use system_git::SystemGit;

use crate::core::error::RailResult;

/// Source of changed file paths between two revisions.
///
/// Paths are repository-relative; order is not significant.
pub trait ChangeSource {
  fn compare_revisions(&self, base: &str, head: &str) -> RailResult<Vec<String>>;
}
