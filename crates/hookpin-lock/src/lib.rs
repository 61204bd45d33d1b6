//! # hookpin-lock
//!
//! Lock-file normalization for hookpin.
//!
//! This crate provides functionality to:
//! - Parse lockfiles (yarn.lock classic and berry, package-lock.json,
//!   poetry.lock, requirements.txt)
//! - Reduce every format to one shape: package name mapped to an ordered
//!   list of installed versions, newest first
//! - Split dependency specifiers (`name@1.2.3`, `name==1.2.3`) into name and
//!   optional version
//! - Compare versions with npm or Python semantics
//!
//! Dialect detection lives entirely in this crate; the editing layer that
//! consumes these tables never sees a lock format.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use hookpin_lock::{load_lock_files, Ecosystem};
//!
//! # fn example() -> hookpin_lock::Result<()> {
//! let locks = load_lock_files(&[PathBuf::from("package-lock.json")])?;
//! if let Some(table) = locks.get(Ecosystem::Node) {
//!     println!("newest eslint: {:?}", table.newest("eslint"));
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod npm;
pub mod python;
pub mod specifier;
pub mod types;
pub mod version;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

// Re-export main types
pub use error::{Error, Result};
pub use specifier::{parse_specifier, pin, Specifier};
pub use types::{Ecosystem, InstalledVersions, LockSet};
pub use version::{compare_versions, sort_versions_desc};

/// Parse one lock file, dispatching on its file name.
///
/// # Errors
/// Returns [`Error::UnsupportedLockFile`] for unrecognized file names and the
/// per-format errors otherwise.
pub fn parse_lock_file(path: &Path) -> Result<(Ecosystem, InstalledVersions)> {
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    match file_name {
        "yarn.lock" => Ok((Ecosystem::Node, npm::parse_yarn_lock(path)?)),
        "package-lock.json" => Ok((Ecosystem::Node, npm::parse_package_lock(path)?)),
        "poetry.lock" => Ok((Ecosystem::Python, python::parse_poetry_lock(path)?)),
        _ if is_requirements_file(file_name) => {
            Ok((Ecosystem::Python, python::parse_requirements(path)?))
        }
        _ => Err(Error::UnsupportedLockFile(path.to_path_buf())),
    }
}

/// Load and normalize a set of lock files, one ecosystem each, with every
/// version list sorted newest-first.
///
/// # Errors
/// Returns [`Error::DuplicateEcosystem`] when two paths resolve to the same
/// ecosystem, plus any per-file parse error.
pub fn load_lock_files(paths: &[PathBuf]) -> Result<LockSet> {
    let mut set = LockSet::default();
    for path in paths {
        let (ecosystem, mut table) = parse_lock_file(path)?;
        table.sort_newest_first(ecosystem);
        set.insert(ecosystem, table)?;
    }
    Ok(set)
}

fn is_requirements_file(file_name: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^requirements(\.[a-z0-9]+)?\.txt$").expect("requirements regex is valid")
    })
    .is_match(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirements_file_names() {
        assert!(is_requirements_file("requirements.txt"));
        assert!(is_requirements_file("requirements.dev.txt"));
        assert!(is_requirements_file("Requirements.TXT"));
        assert!(!is_requirements_file("requirements.in"));
        assert!(!is_requirements_file("constraints.txt"));
    }
}
