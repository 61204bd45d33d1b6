//! package-lock.json parser (npm v7+, lockfileVersion 2 and 3)

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::InstalledVersions;

#[derive(Debug, Deserialize)]
struct PackageLock {
    #[serde(rename = "lockfileVersion")]
    lockfile_version: u8,
    #[serde(default)]
    packages: HashMap<String, PackageLockEntry>,
}

#[derive(Debug, Deserialize)]
struct PackageLockEntry {
    version: Option<String>,
}

/// Parse `package-lock.json` content
pub fn parse_package_lock_str(content: &str, path: &Path) -> Result<InstalledVersions> {
    let lock: PackageLock = serde_json::from_str(content)?;
    if !matches!(lock.lockfile_version, 2 | 3) {
        return Err(Error::UnsupportedFormat {
            path: path.to_path_buf(),
            message: format!(
                "unsupported version of package-lock.json ({})",
                lock.lockfile_version
            ),
        });
    }

    let mut table = InstalledVersions::default();
    for (key, entry) in &lock.packages {
        // the empty key is the root package itself
        if key.is_empty() {
            continue;
        }
        // names sit after the last "node_modules/" path component, which
        // keeps the "@scope/name" form intact
        let Some(idx) = key.rfind("node_modules/") else {
            continue;
        };
        let name = &key[idx + "node_modules/".len()..];
        if name.is_empty() {
            continue;
        }
        if let Some(version) = &entry.version {
            table.insert(name, version.clone());
        }
    }
    Ok(table)
}
