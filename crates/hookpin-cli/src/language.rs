//! Hook language resolution.
//!
//! pre-commit itself knows every hook's language from its cloned repository;
//! hookpin only sees the configuration. The resolver is constructed by the
//! caller and handed to the engine for the duration of one run, so there is
//! no process-wide lookup state to tear down.

use hookpin_lock::{parse_specifier, Ecosystem};

/// Decides which ecosystem a hook's additional dependencies belong to.
pub trait LanguageResolver {
    /// Resolve the ecosystem for a hook from its repository, its declared
    /// `language` key, and its dependency tokens. `None` skips the hook.
    fn resolve(
        &self,
        repo: &str,
        declared: Option<&str>,
        dependencies: &[Option<String>],
    ) -> Option<Ecosystem>;
}

/// Default resolver.
///
/// The declared `language` key always wins. Local hooks must declare one.
/// Remote hooks without a declaration are inferred from the specifier
/// delimiter: `==` reads as Python, a versioned `@` as Node.
#[derive(Debug, Default)]
pub struct HeuristicLanguageResolver;

impl HeuristicLanguageResolver {
    /// Create the default resolver
    pub fn new() -> Self {
        Self
    }
}

impl LanguageResolver for HeuristicLanguageResolver {
    fn resolve(
        &self,
        repo: &str,
        declared: Option<&str>,
        dependencies: &[Option<String>],
    ) -> Option<Ecosystem> {
        if let Some(language) = declared {
            return Ecosystem::from_language(language);
        }
        if repo == "local" {
            return None;
        }
        for token in dependencies.iter().flatten() {
            let spec = parse_specifier(token);
            if spec.is_valid() && spec.version.is_some() {
                if token.contains("==") {
                    return Some(Ecosystem::Python);
                }
                return Some(Ecosystem::Node);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deps(tokens: &[&str]) -> Vec<Option<String>> {
        tokens.iter().map(|t| Some(t.to_string())).collect()
    }

    #[test]
    fn test_declared_language_wins() {
        let resolver = HeuristicLanguageResolver::new();
        assert_eq!(
            resolver.resolve("local", Some("node"), &deps(&["flake8==6.0.0"])),
            Some(Ecosystem::Node)
        );
        assert_eq!(
            resolver.resolve("https://example.com/repo", Some("python"), &[]),
            Some(Ecosystem::Python)
        );
    }

    #[test]
    fn test_unsupported_language_skips() {
        let resolver = HeuristicLanguageResolver::new();
        assert_eq!(
            resolver.resolve("local", Some("rust"), &deps(&["x@1.0.0"])),
            None
        );
    }

    #[test]
    fn test_local_without_declaration_skips() {
        let resolver = HeuristicLanguageResolver::new();
        assert_eq!(resolver.resolve("local", None, &deps(&["x@1.0.0"])), None);
    }

    #[test]
    fn test_remote_inferred_from_delimiter() {
        let resolver = HeuristicLanguageResolver::new();
        assert_eq!(
            resolver.resolve("https://example.com/r", None, &deps(&["eslint@8.0.0"])),
            Some(Ecosystem::Node)
        );
        assert_eq!(
            resolver.resolve("https://example.com/r", None, &deps(&["flake8==6.0.0"])),
            Some(Ecosystem::Python)
        );
        assert_eq!(
            resolver.resolve("https://example.com/r", None, &deps(&["unversioned"])),
            None
        );
    }
}
