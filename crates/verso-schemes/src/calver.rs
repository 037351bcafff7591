//! Calendar versioning driven by a format specification.
//!
//! A scheme is built from a format such as `YYYY.MM.0D-MAJOR`: the
//! format tokens compile into one anchored regex with a capture group
//! per token plus an implicit optional trailing modifier. Versions
//! parsed by the same scheme compare component by component; versions
//! of different formats have no defined order.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Serialize, Serializer};
use verso_core::{SchemeVersion, VersionConstraint, VersionError, VersionRange, VersionResult};

use crate::ivy::{self, BracketBounds};

/// What a calendar component measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentCategory {
    Year,
    Month,
    Week,
    Day,
    Major,
    Minor,
    Patch,
    Modifier,
}

impl ComponentCategory {
    pub fn name(self) -> &'static str {
        match self {
            Self::Year => "YEAR",
            Self::Month => "MONTH",
            Self::Week => "WEEK",
            Self::Day => "DAY",
            Self::Major => "MAJOR",
            Self::Minor => "MINOR",
            Self::Patch => "PATCH",
            Self::Modifier => "MODIFIER",
        }
    }
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ComponentCategory {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "YEAR" => Ok(Self::Year),
            "MONTH" => Ok(Self::Month),
            "WEEK" => Ok(Self::Week),
            "DAY" => Ok(Self::Day),
            "MAJOR" => Ok(Self::Major),
            "MINOR" => Ok(Self::Minor),
            "PATCH" => Ok(Self::Patch),
            "MODIFIER" => Ok(Self::Modifier),
            _ => Err(VersionError::format(format!(
                "unknown component category '{s}'"
            ))),
        }
    }
}

/// One parsed component of a calendar version.
#[derive(Debug, Clone)]
pub struct CalendarComponent {
    category: ComponentCategory,
    token: String,
    text: String,
    value: i64,
}

impl CalendarComponent {
    pub fn category(&self) -> ComponentCategory {
        self.category
    }

    /// The format token this component was captured by; empty for the
    /// implicit modifier.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The numeric value; two-digit year forms count from 2000. Zero for
    /// modifiers, which carry no number.
    pub fn value(&self) -> i64 {
        self.value
    }
}

impl PartialEq for CalendarComponent {
    /// Modifiers compare by text, every other category by numeric value,
    /// so `03` equals `3` but `rc1` does not equal `rc01`.
    fn eq(&self, other: &Self) -> bool {
        self.category == other.category
            && match self.category {
                ComponentCategory::Modifier => self.text == other.text,
                _ => self.value == other.value,
            }
    }
}

impl Eq for CalendarComponent {}

fn compare_components(a: &CalendarComponent, b: &CalendarComponent) -> Ordering {
    match a.category {
        ComponentCategory::Modifier => a.text.cmp(&b.text),
        _ => a.value.cmp(&b.value),
    }
}

/// A version parsed against one calendar format.
#[derive(Debug, Clone)]
pub struct CalendarVersion {
    original: String,
    format: String,
    components: Vec<CalendarComponent>,
}

impl CalendarVersion {
    pub fn components(&self) -> &[CalendarComponent] {
        &self.components
    }

    /// The format specification this version was parsed with.
    pub fn format(&self) -> &str {
        &self.format
    }
}

impl SchemeVersion for CalendarVersion {
    fn original(&self) -> &str {
        &self.original
    }

    fn is_pre_release(&self) -> bool {
        self.components
            .iter()
            .any(|c| c.category == ComponentCategory::Modifier)
    }

    /// Positional comparison. Comparing versions parsed with different
    /// formats is a programming error and panics.
    fn compare(&self, other: &Self) -> Ordering {
        assert_eq!(
            self.format, other.format,
            "cannot compare calendar versions of different formats"
        );
        let max_len = self.components.len().max(other.components.len());
        for i in 0..max_len {
            // Only the trailing modifier can be missing on one side; a
            // version without it is the release and ranks above.
            let ord = match (self.components.get(i), other.components.get(i)) {
                (Some(a), Some(b)) => compare_components(a, b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl PartialEq for CalendarVersion {
    fn eq(&self, other: &Self) -> bool {
        self.format == other.format
            && self.components.len() == other.components.len()
            && self
                .components
                .iter()
                .zip(&other.components)
                .all(|(a, b)| a == b)
    }
}

impl Eq for CalendarVersion {}

impl fmt::Display for CalendarVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl Serialize for CalendarVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.original)
    }
}

struct TokenSpec {
    token: &'static str,
    category: ComponentCategory,
    pattern: &'static str,
}

/// Format tokens, most specific first so `YYYY` wins over `YY`.
const TOKENS: &[TokenSpec] = &[
    TokenSpec {
        token: "MAJOR",
        category: ComponentCategory::Major,
        pattern: r"\d+",
    },
    TokenSpec {
        token: "MINOR",
        category: ComponentCategory::Minor,
        pattern: r"\d+",
    },
    TokenSpec {
        token: "PATCH",
        category: ComponentCategory::Patch,
        pattern: r"\d+",
    },
    TokenSpec {
        token: "YYYY",
        category: ComponentCategory::Year,
        pattern: r"\d{4}",
    },
    TokenSpec {
        token: "YY",
        category: ComponentCategory::Year,
        pattern: r"\d{1,3}",
    },
    TokenSpec {
        token: "0Y",
        category: ComponentCategory::Year,
        pattern: r"\d{2,3}",
    },
    TokenSpec {
        token: "MM",
        category: ComponentCategory::Month,
        pattern: r"\d{1,2}",
    },
    TokenSpec {
        token: "0M",
        category: ComponentCategory::Month,
        pattern: r"\d{2}",
    },
    TokenSpec {
        token: "WW",
        category: ComponentCategory::Week,
        pattern: r"\d{1,2}",
    },
    TokenSpec {
        token: "0W",
        category: ComponentCategory::Week,
        pattern: r"\d{2}",
    },
    TokenSpec {
        token: "DD",
        category: ComponentCategory::Day,
        pattern: r"\d{1,2}",
    },
    TokenSpec {
        token: "0D",
        category: ComponentCategory::Day,
        pattern: r"\d{2}",
    },
];

const SEPARATORS: &[char] = &['.', '-', '_'];

/// A compiled calendar format.
#[derive(Debug, Clone)]
pub struct CalendarVersionScheme {
    format: String,
    tokens: Vec<(ComponentCategory, String)>,
    pattern: Regex,
}

impl CalendarVersionScheme {
    /// Compile a format specification such as `YYYY.MM.0D-MAJOR`.
    pub fn new(format: &str) -> VersionResult<Self> {
        if format.trim().is_empty() {
            return Err(VersionError::format("empty format specification".to_string()));
        }

        let mut tokens = Vec::new();
        let mut pattern = String::from("^");
        let mut rest = format;
        'scan: while !rest.is_empty() {
            for spec in TOKENS {
                if let Some(tail) = rest.strip_prefix(spec.token) {
                    tokens.push((spec.category, spec.token.to_string()));
                    pattern.push('(');
                    pattern.push_str(spec.pattern);
                    pattern.push(')');
                    rest = tail;
                    continue 'scan;
                }
            }
            let mut chars = rest.chars();
            match chars.next() {
                Some(c) if SEPARATORS.contains(&c) => {
                    pattern.push_str(&regex::escape(&c.to_string()));
                    rest = chars.as_str();
                }
                _ => {
                    return Err(VersionError::format(format!(
                        "unknown format specifier at '{rest}' in '{format}'"
                    )))
                }
            }
        }
        if tokens.is_empty() {
            return Err(VersionError::format(format!(
                "'{format}' has no format tokens"
            )));
        }
        // Implicit optional trailing modifier.
        pattern.push_str(r"(?:[-._](.+))?$");

        let pattern = Regex::new(&pattern)
            .map_err(|e| VersionError::format(format!("format '{format}': {e}")))?;
        Ok(Self {
            format: format.to_string(),
            tokens,
            pattern,
        })
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Parse a version against this format.
    pub fn parse(&self, version: &str) -> VersionResult<CalendarVersion> {
        let captures = self.pattern.captures(version).ok_or_else(|| {
            VersionError::version(format!(
                "'{version}' does not match the format '{}'",
                self.format
            ))
        })?;

        let mut components = Vec::with_capacity(self.tokens.len() + 1);
        for (i, (category, token)) in self.tokens.iter().enumerate() {
            let text = captures
                .get(i + 1)
                .map(|m| m.as_str())
                .unwrap_or_default();
            let parsed: i64 = text.parse().map_err(|_| {
                VersionError::version(format!("component '{text}' in '{version}' is out of range"))
            })?;
            let value = match token.as_str() {
                "YY" | "0Y" => 2000 + parsed,
                _ => parsed,
            };
            validate(*category, value, version)?;
            components.push(CalendarComponent {
                category: *category,
                token: token.clone(),
                text: text.to_string(),
                value,
            });
        }
        if let Some(modifier) = captures.get(self.tokens.len() + 1) {
            components.push(CalendarComponent {
                category: ComponentCategory::Modifier,
                token: String::new(),
                text: modifier.as_str().to_string(),
                value: 0,
            });
        }

        Ok(CalendarVersion {
            original: version.to_string(),
            format: self.format.clone(),
            components,
        })
    }

    /// Parse a constraint whose versions use this format: an Ivy bracket
    /// range, or a bare version meaning "this or anything newer".
    pub fn parse_constraint(&self, spec: &str) -> VersionResult<VersionConstraint<CalendarVersion>> {
        let trimmed = spec.trim();
        if trimmed.is_empty() {
            return Err(VersionError::constraint(
                "empty calendar constraint".to_string(),
            ));
        }
        if !ivy::starts_bracket(trimmed, false) {
            return Ok(VersionConstraint::from(VersionRange::at_least(
                self.parse(trimmed)?,
            )));
        }
        let bracket = ivy::parse_bracket(trimmed, false)?;
        let range = match bracket.bounds {
            BracketBounds::Exact(v) => VersionRange::exactly(self.parse(v)?),
            BracketBounds::Pair(lo, hi) => VersionRange::new(
                lo.map(|v| self.parse(v)).transpose()?,
                bracket.open_included,
                hi.map(|v| self.parse(v)).transpose()?,
                bracket.close_included,
            ),
        };
        Ok(VersionConstraint::from(range))
    }
}

/// One-shot parse without keeping the compiled scheme around.
pub fn parse(format: &str, version: &str) -> VersionResult<CalendarVersion> {
    CalendarVersionScheme::new(format)?.parse(version)
}

fn validate(category: ComponentCategory, value: i64, version: &str) -> VersionResult<()> {
    let range = match category {
        ComponentCategory::Month => 1..=12,
        ComponentCategory::Week => 1..=53,
        ComponentCategory::Day => 1..=31,
        _ => return Ok(()),
    };
    if range.contains(&value) {
        Ok(())
    } else {
        Err(VersionError::version(format!(
            "{} {value} in '{version}' is out of range",
            category.name().to_lowercase()
        )))
    }
}
