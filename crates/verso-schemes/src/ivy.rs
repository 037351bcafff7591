//! Ivy bracket interval notation, shared by the Maven, Gradle, Java, and
//! CalVer constraint grammars.

use verso_core::{VersionError, VersionResult};

/// One bracket group, split but not yet parsed into versions.
#[derive(Debug)]
pub(crate) struct BracketRange<'a> {
    pub open_included: bool,
    pub close_included: bool,
    pub bounds: BracketBounds<'a>,
}

#[derive(Debug)]
pub(crate) enum BracketBounds<'a> {
    /// `[1.5]` — exactly one version.
    Exact(&'a str),
    /// `[lo,hi]` with either side optionally absent.
    Pair(Option<&'a str>, Option<&'a str>),
}

/// Whether a constraint string opens with bracket notation.
pub(crate) fn starts_bracket(spec: &str, allow_inverted: bool) -> bool {
    spec.starts_with('[') || spec.starts_with('(') || (allow_inverted && spec.starts_with(']'))
}

/// Parse a single bracket group such as `[1.0,2.0)` or `]1.0,2.0[`.
///
/// Ivy writes an excluded endpoint either with a parenthesis or with the
/// bracket turned outward; `allow_inverted` enables the latter.
pub(crate) fn parse_bracket(group: &str, allow_inverted: bool) -> VersionResult<BracketRange<'_>> {
    let mut chars = group.chars();
    let (first, last) = match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Err(VersionError::constraint(format!(
                "range '{group}' is too short"
            )))
        }
    };

    let open_included = match first {
        '[' => true,
        '(' => false,
        ']' if allow_inverted => false,
        _ => {
            return Err(VersionError::constraint(format!(
                "range '{group}' must open with a bracket"
            )))
        }
    };
    let close_included = match last {
        ']' => true,
        ')' => false,
        '[' if allow_inverted => false,
        _ => {
            return Err(VersionError::constraint(format!(
                "range '{group}' must close with a bracket"
            )))
        }
    };

    let inner = &group[1..group.len() - 1];
    let bounds = match inner.split_once(',') {
        Some((lo, hi)) => {
            let lo = lo.trim();
            let hi = hi.trim();
            BracketBounds::Pair(
                (!lo.is_empty()).then_some(lo),
                (!hi.is_empty()).then_some(hi),
            )
        }
        None => {
            let exact = inner.trim();
            if exact.is_empty() {
                return Err(VersionError::constraint(format!(
                    "range '{group}' has no versions"
                )));
            }
            BracketBounds::Exact(exact)
        }
    };

    Ok(BracketRange {
        open_included,
        close_included,
        bounds,
    })
}

/// Split a comma-separated list of bracket groups, e.g. `(,1.0],[1.2,)`.
///
/// Commas inside a group separate its bounds; only commas between groups
/// separate groups. Since version strings never contain brackets, each
/// group ends at the first bracket character after its opener.
pub(crate) fn split_groups(spec: &str, allow_inverted: bool) -> VersionResult<Vec<&str>> {
    let mut groups = Vec::new();
    let mut rest = spec.trim();
    while !rest.is_empty() {
        if !starts_bracket(rest, allow_inverted) {
            return Err(VersionError::constraint(format!(
                "expected a bracket range at '{rest}'"
            )));
        }
        let close = rest
            .char_indices()
            .skip(1)
            .find(|(_, c)| matches!(c, ']' | ')' | '['))
            .map(|(i, _)| i)
            .ok_or_else(|| {
                VersionError::constraint(format!("unterminated range in '{spec}'"))
            })?;
        groups.push(&rest[..=close]);
        rest = rest[close + 1..].trim_start();
        if let Some(tail) = rest.strip_prefix(',') {
            rest = tail.trim_start();
            if rest.is_empty() {
                return Err(VersionError::constraint(format!(
                    "trailing comma in '{spec}'"
                )));
            }
        } else if !rest.is_empty() {
            return Err(VersionError::constraint(format!(
                "expected ',' between ranges in '{spec}'"
            )));
        }
    }
    if groups.is_empty() {
        return Err(VersionError::constraint("empty range list".to_string()));
    }
    Ok(groups)
}
