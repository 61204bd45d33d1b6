//! yarn berry (yarn 2+) lockfile parser.
//!
//! Berry lock files are YAML. Keys are comma-separated `name@protocol:range`
//! specifiers, values carry the resolved `version`, and a `__metadata` block
//! records the lockfile revision (6 and 8 are supported).

use std::path::Path;

use serde_yaml::Value;

use crate::error::{Error, Result};
use crate::types::InstalledVersions;

/// Parse berry `yarn.lock` content
pub fn parse_berry_lock_str(content: &str, path: &Path) -> Result<InstalledVersions> {
    let doc: Value = serde_yaml::from_str(content)?;
    let Some(map) = doc.as_mapping() else {
        return Err(Error::UnsupportedFormat {
            path: path.to_path_buf(),
            message: "expected a top-level mapping".to_string(),
        });
    };

    let metadata_version = map
        .get("__metadata")
        .and_then(|m| m.get("version"))
        .and_then(|v| match v {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        });
    if !matches!(metadata_version, Some(6) | Some(8)) {
        return Err(Error::UnsupportedFormat {
            path: path.to_path_buf(),
            message: format!("unsupported metadata version {metadata_version:?}"),
        });
    }

    let mut table = InstalledVersions::default();
    for (key, entry) in map {
        let Some(key) = key.as_str() else { continue };
        if key == "__metadata" {
            continue;
        }
        let Some(version) = entry.get("version").and_then(Value::as_str) else {
            continue;
        };
        let mut names: Vec<&str> = Vec::new();
        for spec in key.split(", ") {
            let name = spec_name(spec.trim());
            if !name.is_empty() && !names.contains(&name) {
                names.push(name);
            }
        }
        for name in names {
            table.insert(name, version);
        }
    }
    Ok(table)
}

/// Package name of a berry specifier: everything before the `@` that follows
/// the optional `@scope/` prefix.
fn spec_name(spec: &str) -> &str {
    let search_from = usize::from(spec.starts_with('@'));
    match spec[search_from..].find('@') {
        Some(i) => &spec[..search_from + i],
        None => spec,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"# This file is generated by running "yarn install" inside your project.

__metadata:
  version: 6
  cacheKey: 8

"@babel/core@npm:^7.12.3":
  version: 7.23.0
  resolution: "@babel/core@npm:7.23.0"

"lodash@npm:^4.17.20, lodash@npm:^4.17.21":
  version: 4.17.21
  resolution: "lodash@npm:4.17.21"
"#;

    #[test]
    fn test_parse_berry_lock() {
        let table = parse_berry_lock_str(SAMPLE, Path::new("yarn.lock")).unwrap();
        assert_eq!(table.newest("@babel/core"), Some("7.23.0"));
        assert_eq!(table.newest("lodash"), Some("4.17.21"));
        assert_eq!(table.get("lodash").unwrap().len(), 1);
        assert!(!table.contains("__metadata"));
    }

    #[test]
    fn test_unsupported_metadata_version() {
        let content = "__metadata:\n  version: 4\n";
        let err = parse_berry_lock_str(content, Path::new("yarn.lock")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_spec_name() {
        assert_eq!(spec_name("lodash@npm:^4.17.21"), "lodash");
        assert_eq!(spec_name("@babel/core@npm:^7.12.3"), "@babel/core");
        assert_eq!(spec_name("bare"), "bare");
    }
}
