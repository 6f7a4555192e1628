//! Project graph: layout classification, implicit-dependency fan-out and
//! the affected-set resolver built on top of them.

pub mod affected;
pub mod implicit;
pub mod layout;
pub mod ordered_set;

pub use affected::{AffectedAnalysis, AffectedOptions, ChangeResult, ProjectCatalog};
pub use implicit::{ImplicitDependencies, ImplicitDependencyEntry};
