//! Global template rewrite: ordered substitutions, file relocations, commit

pub mod engine;
pub mod plan;

pub use engine::personalize;
pub use plan::{PlanError, RenamePlan, RenameValues};
