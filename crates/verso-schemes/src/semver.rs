//! Semantic Versioning 2.0 parsing, precedence, and constraints.
//!
//! The comparator follows SemVer precedence: pre-release identifiers
//! compare left to right (numeric before alphanumeric, numerics
//! numerically) and build metadata never participates in ordering.
//! Equality, however, is on the original string, so two versions that
//! differ only in build metadata compare as equal but are not `==`.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use verso_core::{SchemeVersion, VersionConstraint, VersionError, VersionRange, VersionResult};

use crate::npm;

/// A parsed SemVer 2.0 version.
#[derive(Debug, Clone)]
pub struct SemanticVersion {
    original: String,
    major: u32,
    minor: u32,
    patch: u32,
    pre_release: Vec<Identifier>,
    build: Vec<String>,
}

/// One dot-separated pre-release identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Numeric(u64),
    AlphaNumeric(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::AlphaNumeric(s) => f.write_str(s),
        }
    }
}

impl SemanticVersion {
    /// Parse a version of the form
    /// `v?MAJOR.MINOR.PATCH(-PRE(.PRE)*)?(+BUILD(.BUILD)*)?`.
    pub fn parse(version: &str) -> VersionResult<Self> {
        let bad = |what: &str| {
            VersionError::version(format!("'{version}' is not a semantic version: {what}"))
        };

        let stripped = version
            .strip_prefix('v')
            .or_else(|| version.strip_prefix('V'))
            .unwrap_or(version);

        let (rest, build) = match stripped.split_once('+') {
            Some((rest, build)) => (rest, parse_build(build).ok_or_else(|| bad("build"))?),
            None => (stripped, Vec::new()),
        };
        let (core, pre_release) = match rest.split_once('-') {
            Some((core, pre)) => (core, parse_pre_release(pre).ok_or_else(|| bad("pre-release"))?),
            None => (rest, Vec::new()),
        };

        let mut numbers = core.split('.');
        let (major, minor, patch) = match (numbers.next(), numbers.next(), numbers.next(), numbers.next()) {
            (Some(major), Some(minor), Some(patch), None) => (
                parse_core_number(major).ok_or_else(|| bad("major"))?,
                parse_core_number(minor).ok_or_else(|| bad("minor"))?,
                parse_core_number(patch).ok_or_else(|| bad("patch"))?,
            ),
            _ => return Err(bad("expected major.minor.patch")),
        };

        Ok(Self {
            original: version.to_string(),
            major,
            minor,
            patch,
            pre_release,
            build,
        })
    }

    /// Parse a release version and stamp it as a snapshot: the current
    /// epoch milliseconds become the sole pre-release identifier.
    pub fn snapshot(core: &str) -> VersionResult<Self> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let base = Self::parse(core)?;
        Self::parse(&format!(
            "{}.{}.{}-{millis}",
            base.major, base.minor, base.patch
        ))
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn patch(&self) -> u32 {
        self.patch
    }

    pub fn pre_release(&self) -> &[Identifier] {
        &self.pre_release
    }

    pub fn build(&self) -> &[String] {
        &self.build
    }
}

fn parse_core_number(token: &str) -> Option<u32> {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if token.len() > 1 && token.starts_with('0') {
        return None;
    }
    // Must fit a signed 32-bit integer.
    token.parse::<i32>().ok().map(|n| n as u32)
}

fn parse_pre_release(pre: &str) -> Option<Vec<Identifier>> {
    pre.split('.').map(parse_identifier).collect()
}

fn parse_identifier(token: &str) -> Option<Identifier> {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return None;
    }
    if token.chars().all(|c| c.is_ascii_digit()) {
        if token.len() > 1 && token.starts_with('0') {
            return None;
        }
        token.parse().ok().map(Identifier::Numeric)
    } else {
        Some(Identifier::AlphaNumeric(token.to_string()))
    }
}

fn parse_build(build: &str) -> Option<Vec<String>> {
    let identifiers: Vec<String> = build.split('.').map(str::to_string).collect();
    let well_formed = identifiers.iter().all(|id| {
        !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    well_formed.then_some(identifiers)
}

/// Compare two pre-release identifiers.
///
/// Numeric identifiers compare numerically and rank below alphanumeric
/// ones. Alphanumeric identifiers that share a letter prefix and both
/// end in digits compare by their numeric tails, so `alpha2 < alpha10`;
/// otherwise they compare lexicographically.
fn compare_identifiers(a: &Identifier, b: &Identifier) -> Ordering {
    match (a, b) {
        (Identifier::Numeric(a), Identifier::Numeric(b)) => a.cmp(b),
        (Identifier::Numeric(_), Identifier::AlphaNumeric(_)) => Ordering::Less,
        (Identifier::AlphaNumeric(_), Identifier::Numeric(_)) => Ordering::Greater,
        (Identifier::AlphaNumeric(a), Identifier::AlphaNumeric(b)) => {
            if let ((a_word, Some(a_tail)), (b_word, Some(b_tail))) =
                (split_numeric_tail(a), split_numeric_tail(b))
            {
                if a_word == b_word {
                    return a_tail.cmp(&b_tail);
                }
            }
            a.cmp(b)
        }
    }
}

fn split_numeric_tail(identifier: &str) -> (&str, Option<u64>) {
    let cut = identifier
        .rfind(|c: char| !c.is_ascii_digit())
        .map(|i| i + 1)
        .unwrap_or(0);
    let (word, digits) = identifier.split_at(cut);
    if word.is_empty() || digits.is_empty() {
        (identifier, None)
    } else {
        (word, digits.parse().ok())
    }
}

impl SchemeVersion for SemanticVersion {
    fn original(&self) -> &str {
        &self.original
    }

    fn is_pre_release(&self) -> bool {
        !self.pre_release.is_empty()
    }

    fn compare(&self, other: &Self) -> Ordering {
        let core = (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch));
        if core != Ordering::Equal {
            return core;
        }
        match (self.pre_release.is_empty(), other.pre_release.is_empty()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => {}
        }
        let len = self.pre_release.len().max(other.pre_release.len());
        for i in 0..len {
            // A missing trailing identifier ranks below any present one.
            let ord = match (self.pre_release.get(i), other.pre_release.get(i)) {
                (Some(a), Some(b)) => compare_identifiers(a, b),
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (None, None) => Ordering::Equal,
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl PartialEq for SemanticVersion {
    /// Equality is on the original string, so build metadata counts here
    /// even though `compare` ignores it.
    fn eq(&self, other: &Self) -> bool {
        self.original == other.original
    }
}

impl Eq for SemanticVersion {}

impl Hash for SemanticVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.original.hash(state);
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl FromStr for SemanticVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for SemanticVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.original)
    }
}

impl<'de> Deserialize<'de> for SemanticVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(D::Error::custom)
    }
}

/// Parse a SemVer constraint.
///
/// NPM shorthand (`^`, `~`, hyphen ranges, X-ranges, wildcards) is
/// rewritten first; what remains is a whitespace-separated list of
/// `op version` terms (`=` `!=` `<` `<=` `>` `>=`, default `=`) that are
/// intersected. Terms whose intersection is empty cannot all be meant,
/// so that combination is rejected as malformed.
pub fn parse_constraint(spec: &str) -> VersionResult<VersionConstraint<SemanticVersion>> {
    let translated = npm::translate(spec)?;
    let mut constraint = VersionConstraint::any();
    for (op, version) in split_terms(&translated)? {
        let version = SemanticVersion::parse(version)?;
        constraint = constraint.intersect(&term_constraint(op, version));
    }
    if constraint.is_empty() {
        return Err(VersionError::constraint(format!(
            "'{spec}' combines operators that no version can satisfy"
        )));
    }
    Ok(constraint)
}

fn term_constraint(op: &str, version: SemanticVersion) -> VersionConstraint<SemanticVersion> {
    let range = match op {
        "<" => VersionRange::upper(version, false),
        "<=" => VersionRange::upper(version, true),
        ">" => VersionRange::lower(version, false),
        ">=" => VersionRange::lower(version, true),
        "!=" => {
            return VersionConstraint::new(vec![
                VersionRange::upper(version.clone(), false),
                VersionRange::lower(version, false),
            ])
        }
        _ => VersionRange::exactly(version),
    };
    VersionConstraint::from(range)
}

/// Split a constraint into `(op, version)` terms, tolerating whitespace
/// between an operator and its version.
fn split_terms(spec: &str) -> VersionResult<Vec<(&str, &str)>> {
    let mut terms = Vec::new();
    let mut pending_op: Option<&str> = None;
    for token in spec.split_whitespace() {
        if let Some(op) = pending_op.take() {
            terms.push((op, token));
            continue;
        }
        let split = token
            .find(|c| !matches!(c, '=' | '!' | '<' | '>'))
            .unwrap_or(token.len());
        let (op, version) = token.split_at(split);
        if !matches!(op, "" | "=" | "!=" | "<" | "<=" | ">" | ">=") {
            return Err(VersionError::constraint(format!(
                "unknown operator '{op}' in '{spec}'"
            )));
        }
        if version.is_empty() {
            pending_op = Some(op);
        } else {
            terms.push((op, version));
        }
    }
    if let Some(op) = pending_op {
        return Err(VersionError::constraint(format!(
            "operator '{op}' has no version in '{spec}'"
        )));
    }
    Ok(terms)
}
