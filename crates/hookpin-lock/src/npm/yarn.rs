//! yarn classic (v1) lockfile parser.
//!
//! The v1 format is not YAML. Entries open with an unindented line of
//! comma-separated specifier keys ending in a colon, optionally quoted, and
//! the installed version follows on an indented `version "x.y.z"` line:
//!
//! ```text
//! "@babel/core@^7.0.0", "@babel/core@^7.1.0":
//!   version "7.2.0"
//! ```

use std::path::Path;

use crate::error::Result;
use crate::specifier::parse_specifier;
use crate::types::InstalledVersions;

/// Parse classic `yarn.lock` content
pub fn parse_yarn_classic_str(content: &str, _path: &Path) -> Result<InstalledVersions> {
    let mut table = InstalledVersions::default();
    let mut entry_names: Vec<String> = Vec::new();

    for raw in content.lines() {
        let line = raw.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if !line.starts_with([' ', '\t']) {
            // header line: comma-separated specifier keys
            entry_names.clear();
            let keys = line.trim_end_matches(':');
            for key in keys.split(", ") {
                let key = key.trim().trim_matches('"');
                let spec = parse_specifier(key);
                if spec.is_valid() && !entry_names.contains(&spec.name) {
                    entry_names.push(spec.name);
                }
            }
            continue;
        }
        if let Some(rest) = line.trim_start().strip_prefix("version ") {
            let version = rest.trim().trim_matches('"');
            for name in &entry_names {
                table.insert(name.clone(), version);
            }
        }
    }

    Ok(table)
}
