//! hookpin: keep pre-commit `additional_dependencies` pinned to the versions
//! your lock files actually install.

pub mod language;
pub mod sync;

pub use language::{HeuristicLanguageResolver, LanguageResolver};
pub use sync::{sync_config, Repin, SyncOptions, SyncReport};
