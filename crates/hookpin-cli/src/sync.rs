//! The re-pin engine: one edit session over a pre-commit configuration.
//!
//! The mutation callback walks `repos[] -> hooks[] -> additional_dependencies[]`
//! through the transparent view, resolves each hook's ecosystem, and rewrites
//! every specifier whose pinned version differs from the newest installed one.
//! All comments and formatting outside the rewritten entries survive, and
//! nothing is written when any step fails.

use std::path::PathBuf;

use hookpin_lock::{parse_specifier, pin, Ecosystem, InstalledVersions, LockSet};
use hookpin_yaml::{edit_document, edit_document_dry_run, Value, View};
use tracing::{debug, warn};

use crate::language::LanguageResolver;

/// What to edit and how strictly
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Pre-commit configuration to rewrite
    pub config_path: PathBuf,
    /// Compute the result without writing it
    pub dry_run: bool,
    /// Fail on dependencies missing from the lock tables instead of warning
    pub strict: bool,
}

/// One applied (or planned) re-pin
#[derive(Debug, Clone)]
pub struct Repin {
    /// Repository the hook belongs to
    pub repo: String,
    /// Hook id
    pub hook: String,
    /// Specifier as it stood in the configuration
    pub previous: String,
    /// Specifier written in its place
    pub pinned: String,
}

/// Result of one sync run
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Re-pins in document order
    pub repins: Vec<Repin>,
    /// Re-serialized configuration, for dry runs
    pub preview: Option<String>,
}

/// Synchronize the configuration against the loaded lock tables.
///
/// # Errors
/// Parse and traversal errors, missing dependencies under `strict`, and IO
/// failures abort the run; the configuration file is never partially written.
pub fn sync_config(
    options: &SyncOptions,
    locks: &LockSet,
    resolver: &dyn LanguageResolver,
) -> anyhow::Result<SyncReport> {
    let mut repins = Vec::new();
    let preview = if options.dry_run {
        Some(edit_document_dry_run(&options.config_path, |root| {
            apply(root, locks, resolver, options.strict, &mut repins)
        })?)
    } else {
        edit_document(&options.config_path, |root| {
            apply(root, locks, resolver, options.strict, &mut repins)
        })?;
        None
    };
    Ok(SyncReport { repins, preview })
}

fn apply(
    root: &mut View<'_>,
    locks: &LockSet,
    resolver: &dyn LanguageResolver,
    strict: bool,
    repins: &mut Vec<Repin>,
) -> hookpin_yaml::Result<()> {
    let Some(Value::Container(mut repos)) = root.get("repos")? else {
        return Ok(());
    };
    for r in 0..repos.len() {
        let Some(Value::Container(mut repo)) = repos.get_index(r)? else {
            continue;
        };
        let repo_name = string_field(&mut repo, "repo")?.unwrap_or_default();
        let Some(Value::Container(mut hooks)) = repo.get("hooks")? else {
            continue;
        };
        for h in 0..hooks.len() {
            let Some(Value::Container(mut hook)) = hooks.get_index(h)? else {
                continue;
            };
            let hook_id = string_field(&mut hook, "id")?.unwrap_or_default();
            let declared = string_field(&mut hook, "language")?;
            let Some(Value::Container(mut deps)) = hook.get("additional_dependencies")? else {
                continue;
            };
            if !deps.is_sequence() {
                continue;
            }

            let mut tokens: Vec<Option<String>> = Vec::with_capacity(deps.len());
            for k in 0..deps.len() {
                tokens.push(match deps.get_index(k)? {
                    Some(Value::Scalar(value)) => value.into_string(),
                    _ => None,
                });
            }

            let Some(ecosystem) = resolver.resolve(&repo_name, declared.as_deref(), &tokens)
            else {
                debug!(repo = %repo_name, hook = %hook_id, "hook language unknown, skipping");
                continue;
            };
            let Some(table) = locks.get(ecosystem) else {
                debug!(repo = %repo_name, hook = %hook_id, %ecosystem, "no lock file for ecosystem, skipping");
                continue;
            };

            for (k, token) in tokens.iter().enumerate() {
                let Some(token) = token else { continue };
                let spec = parse_specifier(token);
                if !spec.is_valid() {
                    warn!("could not parse dependency specifier '{token}' (hook: {hook_id})");
                    continue;
                }
                let Some(newest) = lookup(table, &spec.name, ecosystem) else {
                    if strict {
                        return Err(hookpin_yaml::Error::Other(format!(
                            "{token} is used in a pre-commit hook, but is not in any of the provided lock files"
                        )));
                    }
                    warn!(
                        "{token} is used in a pre-commit hook, but is not in any of the provided lock files"
                    );
                    continue;
                };
                let pinned = pin(&spec.name, &newest, ecosystem);
                if pinned != *token {
                    debug!(repo = %repo_name, hook = %hook_id, from = %token, to = %pinned, "repinning");
                    deps.set_index(k, pinned.as_str())?;
                    repins.push(Repin {
                        repo: repo_name.clone(),
                        hook: hook_id.clone(),
                        previous: token.clone(),
                        pinned,
                    });
                }
            }
        }
    }
    Ok(())
}

fn string_field(view: &mut View<'_>, key: &str) -> hookpin_yaml::Result<Option<String>> {
    Ok(match view.get(key)? {
        Some(Value::Scalar(value)) => value.into_string(),
        _ => None,
    })
}

fn lookup(table: &InstalledVersions, name: &str, ecosystem: Ecosystem) -> Option<String> {
    let key = match ecosystem {
        Ecosystem::Python => name.to_lowercase(),
        _ => name.to_string(),
    };
    if let Some(version) = table.newest(&key) {
        return Some(version.to_string());
    }
    // requirements files record no `name[extra]` entries; fall back to the
    // bare package, the pin applies to it either way
    key.find('[')
        .and_then(|i| table.newest(&key[..i]))
        .map(str::to_string)
}
