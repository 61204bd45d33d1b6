//! Version comparison and ordering per ecosystem.
//!
//! Node versions follow npm semantics via `node_semver`; Python versions are
//! compared with `semver` where they parse and a loose numeric-segment
//! fallback for PEP 440 spellings (`1.2`, `1.2.3.post1`) otherwise. Both
//! orderings are total, so "pick the newest" is always well-defined;
//! unparseable versions sort below parseable ones.

use std::cmp::Ordering;

use crate::types::Ecosystem;

/// Compare two version strings under the ecosystem's ordering
pub fn compare_versions(a: &str, b: &str, ecosystem: Ecosystem) -> Ordering {
    match ecosystem {
        Ecosystem::Node => match (
            node_semver::Version::parse(a),
            node_semver::Version::parse(b),
        ) {
            (Ok(va), Ok(vb)) => va.cmp(&vb),
            (Ok(_), Err(_)) => Ordering::Greater,
            (Err(_), Ok(_)) => Ordering::Less,
            (Err(_), Err(_)) => loose_compare(a, b),
        },
        Ecosystem::Python => match (semver::Version::parse(a), semver::Version::parse(b)) {
            (Ok(va), Ok(vb)) => va.cmp(&vb),
            _ => loose_compare(a, b),
        },
    }
}

/// Sort a version list newest-first
pub fn sort_versions_desc(versions: &mut [String], ecosystem: Ecosystem) {
    versions.sort_by(|a, b| compare_versions(b, a, ecosystem));
}

#[derive(Debug, PartialEq, Eq)]
enum Segment {
    Num(u64),
    Text(String),
}

fn segments(version: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut digits = String::new();
    let mut text = String::new();
    for c in version.chars() {
        if c.is_ascii_digit() {
            if !text.is_empty() {
                out.push(Segment::Text(std::mem::take(&mut text)));
            }
            digits.push(c);
        } else if matches!(c, '.' | '-' | '_' | '+') {
            if !digits.is_empty() {
                out.push(Segment::Num(digits.parse().unwrap_or(u64::MAX)));
                digits.clear();
            }
            if !text.is_empty() {
                out.push(Segment::Text(std::mem::take(&mut text)));
            }
        } else {
            if !digits.is_empty() {
                out.push(Segment::Num(digits.parse().unwrap_or(u64::MAX)));
                digits.clear();
            }
            text.push(c);
        }
    }
    if !digits.is_empty() {
        out.push(Segment::Num(digits.parse().unwrap_or(u64::MAX)));
    }
    if !text.is_empty() {
        out.push(Segment::Text(text));
    }
    out
}

fn loose_compare(a: &str, b: &str) -> Ordering {
    let sa = segments(a.trim_start_matches(['v', 'V']));
    let sb = segments(b.trim_start_matches(['v', 'V']));
    for pair in sa.iter().zip(sb.iter()) {
        let ord = match pair {
            (Segment::Num(x), Segment::Num(y)) => x.cmp(y),
            (Segment::Text(x), Segment::Text(y)) => x.cmp(y),
            // numeric releases outrank textual markers at the same position
            (Segment::Num(_), Segment::Text(_)) => Ordering::Greater,
            (Segment::Text(_), Segment::Num(_)) => Ordering::Less,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    sa.len().cmp(&sb.len())
}


#[cfg(test)]
#[cfg(feature = "property-tests")]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn version_comparison_is_transitive(
            a in r"[0-9]{1,4}\.[0-9]{1,4}\.[0-9]{1,4}",
            b in r"[0-9]{1,4}\.[0-9]{1,4}\.[0-9]{1,4}",
            c in r"[0-9]{1,4}\.[0-9]{1,4}\.[0-9]{1,4}"
        ) {
            let ab = compare_versions(&a, &b, Ecosystem::Node);
            let bc = compare_versions(&b, &c, Ecosystem::Node);
            let ac = compare_versions(&a, &c, Ecosystem::Node);
            if ab == Ordering::Less && bc == Ordering::Less {
                prop_assert_eq!(ac, Ordering::Less);
            }
        }

        #[test]
        fn version_comparison_is_reflexive(
            version in r"[0-9]{1,4}\.[0-9]{1,4}\.[0-9]{1,4}"
        ) {
            prop_assert_eq!(
                compare_versions(&version, &version, Ecosystem::Python),
                Ordering::Equal
            );
        }
    }
}
