//! Python lock-file parsers: poetry.lock, requirements.txt

mod poetry;
mod requirements;

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::types::InstalledVersions;

pub use poetry::parse_poetry_lock_str;
pub use requirements::parse_requirements_str;

/// Parse a `poetry.lock`.
pub fn parse_poetry_lock(path: &Path) -> Result<InstalledVersions> {
    let content = fs::read_to_string(path)?;
    poetry::parse_poetry_lock_str(&content, path)
}

/// Parse a pinned `requirements.txt` (or `requirements.<env>.txt`).
pub fn parse_requirements(path: &Path) -> Result<InstalledVersions> {
    let content = fs::read_to_string(path)?;
    requirements::parse_requirements_str(&content, path)
}
