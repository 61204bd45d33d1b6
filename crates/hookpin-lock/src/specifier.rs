//! Dependency specifier parsing.
//!
//! A specifier combines a package name with an optional pinned version:
//! `eslint@8.0.0` or `@scope/pkg@1.2.3` for Node, `flake8==6.0.0` (with
//! optional `[extras]`) for Python.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::Ecosystem;

/// A parsed dependency specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    /// Package name; empty when the token could not be parsed
    pub name: String,
    /// Pinned version, when one was present
    pub version: Option<String>,
}

impl Specifier {
    /// Whether the token parsed to a usable name
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
    }
}

fn specifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<name>@?[A-Za-z0-9._/\[\]-]+?)(?:(?:@|==)(?P<version>.+))?$")
            .expect("specifier regex is valid")
    })
}

/// Split a dependency token into name and optional version.
///
/// Unparseable tokens yield an empty name; callers must treat that as "no
/// match" rather than an error.
pub fn parse_specifier(token: &str) -> Specifier {
    match specifier_re().captures(token) {
        Some(caps) => Specifier {
            name: caps.name("name").map_or_else(String::new, |m| m.as_str().to_string()),
            version: caps.name("version").map(|m| m.as_str().to_string()),
        },
        None => Specifier {
            name: String::new(),
            version: None,
        },
    }
}

/// Render a pinned specifier in the ecosystem's syntax
pub fn pin(name: &str, version: &str, ecosystem: Ecosystem) -> String {
    match ecosystem {
        Ecosystem::Node => format!("{name}@{version}"),
        Ecosystem::Python => format!("{name}=={version}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_node_specifier() {
        let spec = parse_specifier("eslint@8.0.0");
        assert_eq!(spec.name, "eslint");
        assert_eq!(spec.version.as_deref(), Some("8.0.0"));
    }

    #[test]
    fn test_parse_scoped_specifier() {
        let spec = parse_specifier("@typescript-eslint/parser@5.62.0");
        assert_eq!(spec.name, "@typescript-eslint/parser");
        assert_eq!(spec.version.as_deref(), Some("5.62.0"));
    }

    #[test]
    fn test_parse_python_specifier() {
        let spec = parse_specifier("flake8==6.0.0");
        assert_eq!(spec.name, "flake8");
        assert_eq!(spec.version.as_deref(), Some("6.0.0"));
    }

    #[test]
    fn test_parse_extras() {
        let spec = parse_specifier("uvicorn[standard]==0.23.2");
        assert_eq!(spec.name, "uvicorn[standard]");
        assert_eq!(spec.version.as_deref(), Some("0.23.2"));
    }

    #[test]
    fn test_parse_bare_name() {
        let spec = parse_specifier("prettier");
        assert_eq!(spec.name, "prettier");
        assert_eq!(spec.version, None);
    }

    #[test]
    fn test_unparseable_token_yields_empty_name() {
        let spec = parse_specifier("!!!");
        assert!(!spec.is_valid());
        assert_eq!(spec.version, None);
    }

    #[test]
    fn test_pin_by_ecosystem() {
        assert_eq!(pin("eslint", "8.5.1", Ecosystem::Node), "eslint@8.5.1");
        assert_eq!(pin("flake8", "6.1.0", Ecosystem::Python), "flake8==6.1.0");
    }
}
