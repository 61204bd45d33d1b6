//! Core types for lock-file normalization

use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::version::sort_versions_desc;

/// Represents a dependency ecosystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Ecosystem {
    /// JavaScript/TypeScript (npm, yarn)
    Node,
    /// Python (poetry, pip)
    Python,
    // This is non_exhaustive to allow adding new ecosystems without breaking API
}

impl Ecosystem {
    /// Stable lowercase name, matching the `language` values pre-commit uses
    pub fn as_str(&self) -> &'static str {
        match self {
            Ecosystem::Node => "node",
            Ecosystem::Python => "python",
        }
    }

    /// Parse a pre-commit `language` value
    pub fn from_language(language: &str) -> Option<Self> {
        match language {
            "node" => Some(Ecosystem::Node),
            "python" => Some(Ecosystem::Python),
            _ => None,
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Installed versions extracted from one lock file: package name mapped to an
/// ordered list of version strings
#[derive(Debug, Clone, Default)]
pub struct InstalledVersions {
    versions: HashMap<String, Vec<String>>,
}

impl InstalledVersions {
    /// Record another installed version for `name`
    pub fn insert(&mut self, name: impl Into<String>, version: impl Into<String>) {
        self.versions.entry(name.into()).or_default().push(version.into());
    }

    /// All recorded versions for `name`, in stored order
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.versions.get(name).map(|v| v.as_slice())
    }

    /// The first recorded version for `name` (the newest once sorted)
    pub fn newest(&self, name: &str) -> Option<&str> {
        self.versions
            .get(name)
            .and_then(|v| v.first())
            .map(|v| v.as_str())
    }

    /// Whether any versions were recorded for `name`
    pub fn contains(&self, name: &str) -> bool {
        self.versions.contains_key(name)
    }

    /// Number of distinct package names
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// True when no packages were recorded
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Sort every version list newest-first for the given ecosystem
    pub fn sort_newest_first(&mut self, ecosystem: Ecosystem) {
        for versions in self.versions.values_mut() {
            sort_versions_desc(versions, ecosystem);
        }
    }
}

/// Normalized installed-version tables, one per ecosystem
#[derive(Debug, Clone, Default)]
pub struct LockSet {
    tables: HashMap<Ecosystem, InstalledVersions>,
}

impl LockSet {
    /// Add the table for an ecosystem
    ///
    /// # Errors
    /// Returns [`Error::DuplicateEcosystem`] when the ecosystem already has a
    /// table; combining several lock files of one ecosystem is not supported
    pub fn insert(&mut self, ecosystem: Ecosystem, table: InstalledVersions) -> Result<()> {
        if self.tables.contains_key(&ecosystem) {
            return Err(Error::DuplicateEcosystem(ecosystem));
        }
        self.tables.insert(ecosystem, table);
        Ok(())
    }

    /// Table for an ecosystem, if one was loaded
    pub fn get(&self, ecosystem: Ecosystem) -> Option<&InstalledVersions> {
        self.tables.get(&ecosystem)
    }

    /// Ecosystems with a loaded table
    pub fn ecosystems(&self) -> impl Iterator<Item = Ecosystem> + '_ {
        self.tables.keys().copied()
    }

    /// True when no lock files were loaded
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
