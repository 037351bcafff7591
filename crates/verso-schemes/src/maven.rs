//! Maven version parsing, comparison, and ranges.
//!
//! Maven versions use a custom ordering that differs from semver:
//! - Tokens are split on `.`, `-`, `_`, `+` and at digit boundaries
//! - Numeric tokens compare as numbers and beat any qualifier
//! - String qualifiers have a special ordering:
//!   `alpha` < `beta` < `milestone` < `rc` < `snapshot` < `""` (release) < `sp`
//! - Any other text sorts after the known qualifiers, lexicographically
//! - Trailing zeros and release-equivalent qualifiers equal no token at all

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use verso_core::{SchemeVersion, VersionConstraint, VersionError, VersionRange, VersionResult};

use crate::component::{tokenize, Component};
use crate::ivy::{self, BracketBounds};

const SEPARATORS: &[char] = &['.', '-', '_', '+'];

/// A parsed Maven version with comparable components.
#[derive(Debug, Clone)]
pub struct MavenVersion {
    original: String,
    components: Vec<Component>,
}

impl MavenVersion {
    /// Parse a Maven version. Any string is a valid Maven version; the
    /// empty string stays empty and compares equal to `"0"`.
    pub fn parse(version: &str) -> Self {
        Self {
            original: version.to_string(),
            components: tokenize(version, SEPARATORS),
        }
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn is_snapshot(&self) -> bool {
        matches!(
            self.components.last().map(classify),
            Some(Token::Qualifier(Qualifier::Snapshot))
        )
    }

    /// The components with the release-equivalent tail stripped: trailing
    /// zeros and trailing release-sentinel qualifiers count as absent, and
    /// leaving them in would make `1.0` and `1.ga` compare unequal even
    /// though both equal `1`.
    fn trimmed(&self) -> &[Component] {
        let mut end = self.components.len();
        while end > 0
            && compare_to_absent(&classify(&self.components[end - 1])) == Ordering::Equal
        {
            end -= 1;
        }
        &self.components[..end]
    }
}

/// Well-known Maven qualifiers with defined ordering.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
enum Qualifier {
    Alpha,
    Beta,
    Milestone,
    Rc,
    Snapshot,
    Release,
    Sp,
}

/// How a component participates in the Maven order.
#[derive(Debug)]
enum Token {
    Number(u64),
    Qualifier(Qualifier),
    Text(String),
}

fn classify(component: &Component) -> Token {
    let text = match component {
        Component::Number(n) => return Token::Number(*n),
        Component::Text(s) => s,
    };
    match text.to_lowercase().as_str() {
        "alpha" | "a" => Token::Qualifier(Qualifier::Alpha),
        "beta" | "b" => Token::Qualifier(Qualifier::Beta),
        "milestone" | "m" => Token::Qualifier(Qualifier::Milestone),
        "rc" | "cr" => Token::Qualifier(Qualifier::Rc),
        "snapshot" => Token::Qualifier(Qualifier::Snapshot),
        "" | "ga" | "final" | "release" => Token::Qualifier(Qualifier::Release),
        "sp" => Token::Qualifier(Qualifier::Sp),
        _ => Token::Text(text.to_string()),
    }
}

fn compare_components(a: Option<&Component>, b: Option<&Component>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (Some(c), None) => compare_to_absent(&classify(c)),
        (None, Some(c)) => compare_to_absent(&classify(c)).reverse(),
        (Some(a), Some(b)) => compare_two(&classify(a), &classify(b)),
    }
}

/// Compare a token against a missing position. Zero and the release
/// sentinel qualifiers equal nothing at all; unknown text sorts after
/// the release sentinel, like any unknown qualifier.
fn compare_to_absent(token: &Token) -> Ordering {
    match token {
        Token::Number(0) => Ordering::Equal,
        Token::Number(_) => Ordering::Greater,
        Token::Qualifier(q) => q.cmp(&Qualifier::Release),
        Token::Text(_) => Ordering::Greater,
    }
}

fn compare_two(a: &Token, b: &Token) -> Ordering {
    match (a, b) {
        (Token::Number(a), Token::Number(b)) => a.cmp(b),
        (Token::Qualifier(a), Token::Qualifier(b)) => a.cmp(b),
        (Token::Number(_), _) => Ordering::Greater,
        (_, Token::Number(_)) => Ordering::Less,
        (Token::Qualifier(_), Token::Text(_)) => Ordering::Less,
        (Token::Text(_), Token::Qualifier(_)) => Ordering::Greater,
        (Token::Text(a), Token::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

impl SchemeVersion for MavenVersion {
    fn original(&self) -> &str {
        &self.original
    }

    /// A version is a pre-release when any component maps to a qualifier
    /// strictly below the release sentinel.
    fn is_pre_release(&self) -> bool {
        self.components.iter().any(|c| {
            matches!(classify(c), Token::Qualifier(q) if q < Qualifier::Release)
        })
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl PartialEq for MavenVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MavenVersion {}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.trimmed(), other.trimmed());
        let max_len = a.len().max(b.len());
        for i in 0..max_len {
            let ord = compare_components(a.get(i), b.get(i));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl FromStr for MavenVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Serialize for MavenVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.original)
    }
}

impl<'de> Deserialize<'de> for MavenVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_str(&raw).map_err(D::Error::custom)
    }
}

/// Parse a Maven constraint expression.
///
/// Bracket notation supports a comma-separated union of ranges:
/// `[1.0,2.0)`, `(,1.0],[1.2,)`, `[1.5]`. A bare version is Maven's
/// soft requirement and parses as a weak single-point constraint.
pub fn parse_constraint(spec: &str) -> VersionResult<VersionConstraint<MavenVersion>> {
    let trimmed = spec.trim();
    if trimmed.is_empty() {
        return Err(VersionError::constraint("empty Maven constraint".to_string()));
    }
    if !ivy::starts_bracket(trimmed, false) {
        let pin = VersionRange::exactly(MavenVersion::parse(trimmed));
        return Ok(VersionConstraint::weak(vec![pin]));
    }

    let mut ranges = Vec::new();
    for group in ivy::split_groups(trimmed, false)? {
        let bracket = ivy::parse_bracket(group, false)?;
        let range = match bracket.bounds {
            BracketBounds::Exact(v) => VersionRange::exactly(MavenVersion::parse(v)),
            BracketBounds::Pair(lo, hi) => VersionRange::new(
                lo.map(MavenVersion::parse),
                bracket.open_included,
                hi.map(MavenVersion::parse),
                bracket.close_included,
            ),
        };
        ranges.push(range);
    }
    Ok(VersionConstraint::new(ranges))
}
