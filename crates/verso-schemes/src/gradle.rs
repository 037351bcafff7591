//! Gradle/Ivy version parsing, comparison, and dynamic versions.
//!
//! Gradle compares versions token by token: numbers beat text at the
//! same position, numbers compare numerically, text compares
//! lexicographically (case-sensitive). A missing position equals zero
//! against a number and outranks text, so `1.0-SNAPSHOT < 1.0`.
//!
//! Constraint syntax covers Ivy intervals with either exclusion style
//! (`[1.0,2.0)` or `]1.0,2.0[`), dynamic versions `prefix.+`, the bare
//! `+`, and plain versions meaning "this or anything newer".

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use verso_core::{SchemeVersion, VersionConstraint, VersionError, VersionRange, VersionResult};

use crate::component::{tokenize, Component};
use crate::ivy::{self, BracketBounds};

const SEPARATORS: &[char] = &['.', '-', '_'];

/// A parsed Gradle version with comparable components.
#[derive(Debug, Clone)]
pub struct GradleVersion {
    original: String,
    components: Vec<Component>,
}

impl GradleVersion {
    /// Parse a Gradle version. Any string is accepted; `+` is kept as a
    /// text token so dynamic endpoints like `2.+` order below `2.0.0`.
    pub fn parse(version: &str) -> Self {
        Self {
            original: version.to_string(),
            components: tokenize(version, SEPARATORS),
        }
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }
}

fn compare_components(a: Option<&Component>, b: Option<&Component>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (Some(c), None) => compare_to_absent(c),
        (None, Some(c)) => compare_to_absent(c).reverse(),
        (Some(Component::Number(a)), Some(Component::Number(b))) => a.cmp(b),
        (Some(Component::Text(a)), Some(Component::Text(b))) => a.cmp(b),
        (Some(Component::Number(_)), Some(Component::Text(_))) => Ordering::Greater,
        (Some(Component::Text(_)), Some(Component::Number(_))) => Ordering::Less,
    }
}

/// A missing position equals zero against a number; a trailing text
/// token is a qualifier and ranks below nothing at all.
fn compare_to_absent(component: &Component) -> Ordering {
    match component {
        Component::Number(0) => Ordering::Equal,
        Component::Number(_) => Ordering::Greater,
        Component::Text(_) => Ordering::Less,
    }
}

impl SchemeVersion for GradleVersion {
    fn original(&self) -> &str {
        &self.original
    }

    fn is_pre_release(&self) -> bool {
        self.components.iter().any(|c| {
            matches!(c, Component::Text(s) if s.eq_ignore_ascii_case("snapshot"))
        })
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl PartialEq for GradleVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GradleVersion {}

impl Ord for GradleVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let max_len = self.components.len().max(other.components.len());
        for i in 0..max_len {
            let ord = compare_components(self.components.get(i), other.components.get(i));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for GradleVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for GradleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl FromStr for GradleVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Serialize for GradleVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.original)
    }
}

impl<'de> Deserialize<'de> for GradleVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_str(&raw).map_err(D::Error::custom)
    }
}

/// Parse a Gradle constraint expression.
pub fn parse_constraint(spec: &str) -> VersionResult<VersionConstraint<GradleVersion>> {
    let trimmed = spec.trim();
    if trimmed.is_empty() {
        return Err(VersionError::constraint("empty Gradle constraint".to_string()));
    }
    if trimmed == "+" {
        return Ok(VersionConstraint::any());
    }
    if ivy::starts_bracket(trimmed, true) {
        let bracket = ivy::parse_bracket(trimmed, true)?;
        let range = match bracket.bounds {
            BracketBounds::Exact(v) => VersionRange::exactly(GradleVersion::parse(v)),
            BracketBounds::Pair(lo, hi) => VersionRange::new(
                lo.map(GradleVersion::parse),
                bracket.open_included,
                hi.map(GradleVersion::parse),
                bracket.close_included,
            ),
        };
        return Ok(VersionConstraint::from(range));
    }
    if let Some(prefix) = trimmed.strip_suffix(".+") {
        return dynamic_version(prefix, spec);
    }
    Ok(VersionConstraint::from(VersionRange::at_least(
        GradleVersion::parse(trimmed),
    )))
}

/// Expand a dynamic version `prefix.+` into `[prefix, next-prefix)`,
/// where the final numeric segment of the prefix is incremented.
fn dynamic_version(prefix: &str, spec: &str) -> VersionResult<VersionConstraint<GradleVersion>> {
    let (head, last) = match prefix.rsplit_once('.') {
        Some((head, last)) => (Some(head), last),
        None => (None, prefix),
    };
    if last.is_empty() || !last.chars().all(|c| c.is_ascii_digit()) {
        return Err(VersionError::constraint(format!(
            "dynamic version '{spec}' must end in a numeric segment"
        )));
    }
    let bumped: u64 = last.parse().map_err(|_| {
        VersionError::constraint(format!("segment '{last}' in '{spec}' is out of range"))
    })?;
    let next = match head {
        Some(head) => format!("{head}.{}", bumped + 1),
        None => (bumped + 1).to_string(),
    };
    Ok(VersionConstraint::from(VersionRange::new(
        Some(GradleVersion::parse(prefix)),
        true,
        Some(GradleVersion::parse(&next)),
        false,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> GradleVersion {
        GradleVersion::parse(s)
    }

    #[test]
    fn numeric_ordering() {
        assert!(v("1.0") < v("1.1"));
        assert!(v("1.9") < v("1.10"));
    }

    #[test]
    fn numbers_beat_text() {
        assert!(v("1.a") < v("1.0"));
        assert!(v("2.+") < v("2.0.0"));
    }

    #[test]
    fn text_compares_case_sensitively() {
        assert!(v("1.0-RC") < v("1.0-rc"));
    }

    #[test]
    fn shorter_versions_pad_with_zero() {
        assert_eq!(v("1.0"), v("1"));
        assert!(v("1.0.1") > v("1"));
    }

    #[test]
    fn trailing_text_ranks_below_release() {
        assert!(v("1.0-SNAPSHOT") < v("1.0"));
        assert!(v("1.0-rc") < v("1.0"));
    }

    #[test]
    fn snapshot_is_pre_release() {
        assert!(v("1.0-SNAPSHOT").is_pre_release());
        assert!(v("1.0-snapshot").is_pre_release());
        assert!(!v("1.0").is_pre_release());
        assert!(!v("1.0-rc").is_pre_release());
    }

    #[test]
    fn bracket_ranges() {
        let range = parse_constraint("[1.0,2.0)").unwrap();
        assert!(range.allows(&v("1.5")));
        assert!(!range.allows(&v("2.0")));
    }

    #[test]
    fn inverted_exclusion_brackets() {
        let range = parse_constraint("]1.0,2.0[").unwrap();
        assert!(!range.allows(&v("1.0")));
        assert!(range.allows(&v("1.5")));
        assert!(!range.allows(&v("2.0")));
        assert_eq!(range.to_string(), "(1.0,2.0)");
    }

    #[test]
    fn plain_version_means_at_least() {
        let open = parse_constraint("1.5").unwrap();
        assert!(open.allows(&v("1.5")));
        assert!(open.allows(&v("9.9")));
        assert!(!open.allows(&v("1.4")));
        assert_eq!(open.to_string(), "[1.5,)");
    }

    #[test]
    fn bare_plus_means_anything() {
        assert_eq!(parse_constraint("+").unwrap(), VersionConstraint::any());
    }

    #[test]
    fn dynamic_versions_expand() {
        let minors = parse_constraint("1.2.+").unwrap();
        assert_eq!(minors.to_string(), "[1.2,1.3)");
        assert!(minors.allows(&v("1.2")));
        assert!(minors.allows(&v("1.2.9")));
        assert!(!minors.allows(&v("1.3")));

        let majors = parse_constraint("2.+").unwrap();
        assert_eq!(majors.to_string(), "[2,3)");
        assert!(majors.allows(&v("2.9.9")));
        assert!(!majors.allows(&v("3.0")));
    }

    #[test]
    fn dynamic_version_needs_numeric_prefix() {
        assert!(parse_constraint("alpha.+").is_err());
        assert!(parse_constraint(".+").is_err());
    }
}
