//! Node lock-file parsers: yarn classic, yarn berry, package-lock.json

mod berry;
mod package_lock;
mod yarn;

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::types::InstalledVersions;

pub use berry::parse_berry_lock_str;
pub use package_lock::parse_package_lock_str;
pub use yarn::parse_yarn_classic_str;

/// Parse a `yarn.lock`, dispatching between the classic v1 format and the
/// berry (yarn 2+) YAML format by content.
///
/// Classic files carry a `# yarn lockfile v1` header; berry files carry a
/// top-level `__metadata:` block. The decision is made up front so a parse
/// failure stays a parse failure instead of triggering a dialect fallback.
pub fn parse_yarn_lock(path: &Path) -> Result<InstalledVersions> {
    let content = fs::read_to_string(path)?;
    if is_berry(&content) {
        berry::parse_berry_lock_str(&content, path)
    } else {
        yarn::parse_yarn_classic_str(&content, path)
    }
}

/// Parse a `package-lock.json` (lockfileVersion 2 or 3).
pub fn parse_package_lock(path: &Path) -> Result<InstalledVersions> {
    let content = fs::read_to_string(path)?;
    package_lock::parse_package_lock_str(&content, path)
}

fn is_berry(content: &str) -> bool {
    content.lines().any(|line| line.starts_with("__metadata:"))
}
