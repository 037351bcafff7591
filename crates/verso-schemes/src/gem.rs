//! RubyGems version parsing, comparison, and requirements.
//!
//! Gem versions compare segment by segment with trailing numeric zeros
//! stripped first, so `1.0` equals `1`. Text segments are pre-release
//! markers: they rank below numbers and below a missing segment, which
//! keeps `1.0.pre` under `1.0` and `2.ZZZ` under every release of the
//! `2` series.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use verso_core::{SchemeVersion, VersionConstraint, VersionError, VersionRange, VersionResult};

use crate::component::{tokenize, Component};

const SEPARATORS: &[char] = &['.', '-', '_'];

/// Upper-bound sentinel for the pessimistic operator. As a text segment
/// it sits below the bumped release itself, and its uppercase spelling
/// sits below the usual lowercase pre-release tags too.
const SENTINEL: &str = "ZZZ";

static CORRECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]+(\.[0-9a-zA-Z]+)*(-[0-9a-zA-Z.\-]+)?$").expect("version grammar compiles")
});

/// A parsed RubyGems version.
#[derive(Debug, Clone)]
pub struct GemVersion {
    original: String,
    components: Vec<Component>,
    next: OnceCell<Box<GemVersion>>,
}

impl GemVersion {
    /// Parse a Gem version. The empty string is the alias for `"0"`.
    pub fn parse(version: &str) -> VersionResult<Self> {
        let trimmed = version.trim();
        let components = if trimmed.is_empty() {
            vec![Component::Number(0)]
        } else if CORRECT.is_match(trimmed) {
            tokenize(trimmed, SEPARATORS)
        } else {
            return Err(VersionError::version(format!(
                "'{version}' is not a RubyGems version"
            )));
        };
        Ok(Self {
            original: version.to_string(),
            components,
            next: OnceCell::new(),
        })
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// The release that would follow this one: the pre-release suffix is
    /// cut off, the last numeric segment is dropped (when more than one
    /// remains) and the new last segment is incremented. `1.4.4` bumps
    /// to `1.5`, `5.3.1.b.2` bumps to `5.4`. The result is computed at
    /// most once.
    pub fn next_version(&self) -> &Self {
        self.next.get_or_init(|| Box::new(self.bump()))
    }

    fn bump(&self) -> Self {
        let mut numbers: Vec<u64> = self
            .components
            .iter()
            .map_while(|c| match c {
                Component::Number(n) => Some(*n),
                Component::Text(_) => None,
            })
            .collect();
        if numbers.is_empty() {
            numbers.push(0);
        }
        if numbers.len() > 1 {
            numbers.pop();
        }
        if let Some(last) = numbers.last_mut() {
            *last += 1;
        }
        from_components(numbers.into_iter().map(Component::Number).collect())
    }

    fn trimmed(&self) -> &[Component] {
        let mut end = self.components.len();
        while end > 0 && matches!(self.components[end - 1], Component::Number(0)) {
            end -= 1;
        }
        &self.components[..end]
    }
}

fn from_components(components: Vec<Component>) -> GemVersion {
    let original = components
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".");
    GemVersion {
        original,
        components,
        next: OnceCell::new(),
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

/// Zeros were already stripped from the tail, so a present number here
/// outranks a missing one; text is a pre-release marker and ranks below.
fn compare_to_absent(component: &Component) -> Ordering {
    match component {
        Component::Number(0) => Ordering::Equal,
        Component::Number(_) => Ordering::Greater,
        Component::Text(_) => Ordering::Less,
    }
}

impl SchemeVersion for GemVersion {
    fn original(&self) -> &str {
        &self.original
    }

    fn is_pre_release(&self) -> bool {
        self.components.iter().any(|c| matches!(c, Component::Text(_)))
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl PartialEq for GemVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GemVersion {}

impl Ord for GemVersion {
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

impl PartialOrd for GemVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for GemVersion {
    /// Hashes the zero-trimmed components so that `1.0` and `1` hash
    /// alike, matching equality.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.trimmed().hash(state);
    }
}

impl fmt::Display for GemVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl FromStr for GemVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for GemVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.original)
    }
}

impl<'de> Deserialize<'de> for GemVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(D::Error::custom)
    }
}

/// Parse one or more Gem requirement fragments into a single constraint.
///
/// Each fragment is a whitespace-separated list of `op version` terms
/// (`=` `!=` `<` `<=` `>` `>=` `~>`, default `=`); all terms of all
/// fragments are intersected, mirroring a gemspec's requirement list.
pub fn parse_constraint(specs: &[&str]) -> VersionResult<VersionConstraint<GemVersion>> {
    let mut constraint = VersionConstraint::any();
    let mut terms = 0usize;
    for spec in specs {
        for (op, version) in split_terms(spec)? {
            let version = GemVersion::parse(version)?;
            constraint = constraint.intersect(&term_constraint(op, version, spec)?);
            terms += 1;
        }
    }
    if terms == 0 {
        return Err(VersionError::constraint("empty Gem requirement".to_string()));
    }
    Ok(constraint)
}

fn term_constraint(
    op: &str,
    version: GemVersion,
    spec: &str,
) -> VersionResult<VersionConstraint<GemVersion>> {
    let range = match op {
        "<" => VersionRange::upper(version, false),
        "<=" => VersionRange::upper(version, true),
        ">" => VersionRange::lower(version, false),
        ">=" => VersionRange::lower(version, true),
        "~>" => {
            let upper = pessimistic_upper(&version, spec)?;
            VersionRange::between(version, true, upper, false)
        }
        "!=" => {
            return Ok(VersionConstraint::new(vec![
                VersionRange::upper(version.clone(), false),
                VersionRange::lower(version, false),
            ]))
        }
        _ => VersionRange::exactly(version),
    };
    Ok(VersionConstraint::from(range))
}

/// The exclusive upper bound of `~>v`: drop the last segment, increment
/// the new last one, and cap it with the `ZZZ` sentinel so the bound
/// stays below the bumped release and its pre-releases.
fn pessimistic_upper(version: &GemVersion, spec: &str) -> VersionResult<GemVersion> {
    let mut components = version.components.clone();
    if components.len() > 1 {
        components.pop();
    }
    match components.last_mut() {
        Some(Component::Number(n)) => *n += 1,
        _ => {
            return Err(VersionError::constraint(format!(
                "'~>' needs a numeric segment to pin in '{spec}'"
            )))
        }
    }
    components.push(Component::Text(SENTINEL.to_string()));
    Ok(from_components(components))
}

fn split_terms(spec: &str) -> VersionResult<Vec<(&str, &str)>> {
    let mut terms = Vec::new();
    let mut pending_op: Option<&str> = None;
    for token in spec.split_whitespace() {
        if let Some(op) = pending_op.take() {
            terms.push((op, token));
            continue;
        }
        let split = token
            .find(|c| !matches!(c, '=' | '!' | '<' | '>' | '~'))
            .unwrap_or(token.len());
        let (op, version) = token.split_at(split);
        if !matches!(op, "" | "=" | "!=" | "<" | "<=" | ">" | ">=" | "~>") {
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
