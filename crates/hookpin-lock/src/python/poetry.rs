//! poetry.lock parser.
//!
//! Poetry lock files are TOML with one `[[package]]` table per installed
//! package. Declared extras are recorded as additional `name[extra]` entries
//! at the package version, so extras specifiers resolve too.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::InstalledVersions;

#[derive(Debug, Deserialize)]
struct PoetryLock {
    #[serde(default)]
    package: Vec<PoetryPackage>,
}

#[derive(Debug, Deserialize)]
struct PoetryPackage {
    name: String,
    version: String,
    #[serde(default)]
    extras: BTreeMap<String, Vec<String>>,
}

/// Parse `poetry.lock` content
pub fn parse_poetry_lock_str(content: &str, _path: &Path) -> Result<InstalledVersions> {
    let lock: PoetryLock =
        toml::from_str(content).map_err(|e| Error::Toml(e.to_string()))?;

    let mut table = InstalledVersions::default();
    for package in &lock.package {
        let name = package.name.to_lowercase();
        table.insert(name.clone(), package.version.clone());
        for extra in package.extras.keys() {
            table.insert(format!("{name}[{extra}]"), package.version.clone());
        }
    }
    Ok(table)
}
