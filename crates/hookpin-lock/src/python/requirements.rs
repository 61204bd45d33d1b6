//! Pinned requirements.txt parser.
//!
//! Requirement lines are normalized before parsing: backslash continuations
//! are joined, `--hash=...` fragments and `;` environment markers dropped.
//! Every version mentioned in a clause of the specifier is recorded, so a
//! strict `pkg==1.2.3` contributes its pin and range clauses contribute their
//! bounds.

use std::path::Path;

use crate::error::Result;
use crate::types::InstalledVersions;

/// Parse `requirements.txt` content
pub fn parse_requirements_str(content: &str, _path: &Path) -> Result<InstalledVersions> {
    let joined = content.replace("\\\r\n", " ").replace("\\\n", " ");

    let mut table = InstalledVersions::default();
    for raw in joined.lines() {
        let line = raw.trim();
        // skip blanks, comments, and pip options such as -r / --index-url
        if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
            continue;
        }
        let line = line.split(';').next().unwrap_or("").trim();
        let line = match line.find(" #") {
            Some(i) => line[..i].trim_end(),
            None => line,
        };
        let cleaned: String = line
            .split_whitespace()
            .filter(|token| !token.starts_with("--hash="))
            .collect::<Vec<_>>()
            .join(" ");
        if cleaned.is_empty() {
            continue;
        }

        let (head, spec) = split_requirement(&cleaned);
        let name = normalize_name(head);
        if name.is_empty() {
            continue;
        }
        for version in clause_versions(spec) {
            table.insert(name.clone(), version);
        }
    }
    Ok(table)
}

/// Split a requirement into its name part and the version specifier tail.
fn split_requirement(line: &str) -> (&str, &str) {
    match line.find(['=', '<', '>', '!', '~', ' ']) {
        Some(i) => (&line[..i], &line[i..]),
        None => (line, ""),
    }
}

/// Lowercase the package name, dropping any `[extras]` suffix.
fn normalize_name(head: &str) -> String {
    let bare = match head.find('[') {
        Some(i) => &head[..i],
        None => head,
    };
    bare.trim().to_lowercase()
}

/// The version component of every comparison clause in a specifier.
fn clause_versions(spec: &str) -> Vec<String> {
    spec.split(',')
        .filter_map(|clause| {
            let version = clause
                .trim()
                .trim_start_matches(['=', '<', '>', '!', '~'])
                .trim();
            if version.is_empty() {
                None
            } else {
                Some(version.to_string())
            }
        })
        .collect()
}
