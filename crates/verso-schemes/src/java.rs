//! Java runtime version parsing per JEP 322.
//!
//! A version is a dot-separated numeric tuple
//! `feature.interim.update.patch...` optionally followed by `-pre`,
//! `+build`, and `-opt` fields. Ordering is on the zero-padded tuple
//! with pre/build/opt as tiebreakers.

use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;
use std::process::Command;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use verso_core::{SchemeVersion, VersionConstraint, VersionError, VersionRange, VersionResult};

use crate::ivy::{self, BracketBounds};

/// A parsed JEP 322 runtime version.
#[derive(Debug, Clone)]
pub struct JavaVersion {
    original: String,
    numbers: Vec<u32>,
    pre: Option<String>,
    build: Option<u32>,
    optional: Option<String>,
}

impl JavaVersion {
    /// Parse `$VNUM(-$PRE)?(+$BUILD)?(-$OPT)?`, including the
    /// `$VNUM+-$OPT` empty-build form.
    pub fn parse(version: &str) -> VersionResult<Self> {
        let bad = |what: &str| {
            VersionError::version(format!("'{version}' is not a Java version: {what}"))
        };

        let vnum_end = version
            .find(['-', '+'])
            .unwrap_or(version.len());
        let (vnum, mut rest) = version.split_at(vnum_end);

        let mut numbers = Vec::new();
        for element in vnum.split('.') {
            if element.is_empty() || !element.chars().all(|c| c.is_ascii_digit()) {
                return Err(bad("version numbers"));
            }
            if element.len() > 1 && element.starts_with('0') {
                return Err(bad("leading zero"));
            }
            numbers.push(element.parse().map_err(|_| bad("number out of range"))?);
        }

        let mut pre = None;
        let mut build = None;
        let mut optional = None;

        if let Some(tail) = rest.strip_prefix('-') {
            let end = tail
                .find(['-', '+'])
                .unwrap_or(tail.len());
            let (p, after) = tail.split_at(end);
            if p.is_empty() || !p.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(bad("pre-release"));
            }
            pre = Some(p.to_string());
            rest = after;
        }
        if let Some(tail) = rest.strip_prefix('+') {
            if let Some(opt) = tail.strip_prefix('-') {
                // `17+-opt`: a '+' with no build number, only $OPT.
                optional = Some(parse_opt(opt).ok_or_else(|| bad("optional field"))?);
                rest = "";
            } else {
                let end = tail.find('-').unwrap_or(tail.len());
                let (b, after) = tail.split_at(end);
                if b.is_empty() || !b.chars().all(|c| c.is_ascii_digit()) {
                    return Err(bad("build number"));
                }
                build = Some(b.parse().map_err(|_| bad("build out of range"))?);
                rest = after;
            }
        }
        if optional.is_none() {
            if let Some(tail) = rest.strip_prefix('-') {
                optional = Some(parse_opt(tail).ok_or_else(|| bad("optional field"))?);
                rest = "";
            }
        }
        if !rest.is_empty() {
            return Err(bad("trailing characters"));
        }

        Ok(Self {
            original: version.to_string(),
            numbers,
            pre,
            build,
            optional,
        })
    }

    pub fn feature(&self) -> u32 {
        self.number(0)
    }

    pub fn interim(&self) -> u32 {
        self.number(1)
    }

    pub fn update(&self) -> u32 {
        self.number(2)
    }

    pub fn patch(&self) -> u32 {
        self.number(3)
    }

    pub fn pre(&self) -> Option<&str> {
        self.pre.as_deref()
    }

    pub fn build(&self) -> Option<u32> {
        self.build
    }

    pub fn optional(&self) -> Option<&str> {
        self.optional.as_deref()
    }

    fn number(&self, index: usize) -> u32 {
        self.numbers.get(index).copied().unwrap_or(0)
    }
}

fn parse_opt(opt: &str) -> Option<String> {
    let well_formed = !opt.is_empty()
        && opt
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');
    well_formed.then(|| opt.to_string())
}

/// Whether `candidate` is a release of the `base` version line: its
/// leading numeric tuple starts with `base`'s.
pub fn is_version(base: &JavaVersion, candidate: &JavaVersion) -> bool {
    candidate.numbers.starts_with(&base.numbers)
}

/// The version of the Java runtime on this host, probed at most once.
///
/// Looks for `java` under `JAVA_HOME` or on the search path and reads
/// the quoted version out of the `java -version` banner. `None` when no
/// runtime answers.
pub fn runtime_version() -> Option<&'static JavaVersion> {
    static RUNTIME_VERSION: Lazy<Option<JavaVersion>> = Lazy::new(probe_runtime);
    RUNTIME_VERSION.as_ref()
}

fn probe_runtime() -> Option<JavaVersion> {
    let java = std::env::var_os("JAVA_HOME")
        .map(|home| {
            let binary = if cfg!(windows) { "java.exe" } else { "java" };
            PathBuf::from(home).join("bin").join(binary)
        })
        .filter(|path| path.exists())
        .unwrap_or_else(|| PathBuf::from("java"));

    let output = Command::new(java).arg("-version").output().ok()?;
    let banner = String::from_utf8_lossy(&output.stderr);
    parse_banner(&banner)
}

/// Pull the version out of a `java -version` banner line such as
/// `openjdk version "21.0.2" 2024-01-16`. Legacy `1.x` strings collapse
/// to their feature number.
fn parse_banner(banner: &str) -> Option<JavaVersion> {
    for line in banner.lines() {
        let Some(start) = line.find('"') else { continue };
        let Some(end) = line[start + 1..].find('"') else {
            continue;
        };
        let quoted = &line[start + 1..start + 1 + end];
        let normalized = match quoted.strip_prefix("1.") {
            Some(tail) => tail.split(['.', '_']).next().unwrap_or(tail),
            None => quoted,
        };
        if let Ok(version) = JavaVersion::parse(normalized) {
            return Some(version);
        }
    }
    None
}

impl SchemeVersion for JavaVersion {
    fn original(&self) -> &str {
        &self.original
    }

    fn is_pre_release(&self) -> bool {
        self.pre.is_some()
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl PartialEq for JavaVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for JavaVersion {}

impl Ord for JavaVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let max_len = self.numbers.len().max(other.numbers.len());
        for i in 0..max_len {
            let ord = self.number(i).cmp(&other.number(i));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        compare_pre(self.pre.as_deref(), other.pre.as_deref())
            .then_with(|| self.build.cmp(&other.build))
            .then_with(|| self.optional.cmp(&other.optional))
    }
}

impl PartialOrd for JavaVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A promoted build outranks a pre-release of the same tuple; two
/// pre-releases compare numerically when both are numeric.
fn compare_pre(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (a.parse::<u64>(), b.parse::<u64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            _ => a.cmp(b),
        },
    }
}

impl fmt::Display for JavaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl FromStr for JavaVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for JavaVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.original)
    }
}

impl<'de> Deserialize<'de> for JavaVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(D::Error::custom)
    }
}

/// Parse a Java version constraint: an Ivy bracket range over runtime
/// versions, or a bare version meaning "this or anything newer".
pub fn parse_constraint(spec: &str) -> VersionResult<VersionConstraint<JavaVersion>> {
    let trimmed = spec.trim();
    if trimmed.is_empty() {
        return Err(VersionError::constraint("empty Java constraint".to_string()));
    }
    if !ivy::starts_bracket(trimmed, true) {
        return Ok(VersionConstraint::from(VersionRange::at_least(
            JavaVersion::parse(trimmed)?,
        )));
    }
    let bracket = ivy::parse_bracket(trimmed, true)?;
    let range = match bracket.bounds {
        BracketBounds::Exact(v) => VersionRange::exactly(JavaVersion::parse(v)?),
        BracketBounds::Pair(lo, hi) => VersionRange::new(
            lo.map(JavaVersion::parse).transpose()?,
            bracket.open_included,
            hi.map(JavaVersion::parse).transpose()?,
            bracket.close_included,
        ),
    };
    Ok(VersionConstraint::from(range))
}
