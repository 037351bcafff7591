//! The NPM constraint shorthand translator.
//!
//! Rewrites a human-readable NPM range expression into the plain
//! `op version` terms the SemVer constraint parser consumes. This is a
//! pure string-to-string rewrite with no knowledge of the SemVer
//! parser's internals.
//!
//! Every generated upper bound carries the `-0` pre-release sentinel so
//! that pre-releases of the next version stay excluded.

use verso_core::{VersionError, VersionResult};

/// A version with possibly missing or wildcarded positions, plus any
/// pre-release/build suffix it carried.
#[derive(Debug, Default)]
struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    suffix: String,
}

/// Translate an NPM constraint into space-separated `op version` terms.
///
/// Passes, in order: wildcard, hyphen range, caret, tilde, X-range.
pub fn translate(spec: &str) -> VersionResult<String> {
    let trimmed = spec.trim();

    if matches!(trimmed, "" | "*" | "latest" | "latest.integration") {
        return Ok(">=0.0.0".to_string());
    }

    let mut terms = Vec::new();
    if let Some((lower, upper)) = trimmed.split_once(" - ") {
        hyphen(lower.trim(), upper.trim(), &mut terms, spec)?;
    } else {
        let mut pending_op: Option<&str> = None;
        for token in trimmed.split_whitespace() {
            let token = match pending_op.take() {
                Some(op) => {
                    translate_token(op, token, &mut terms, spec)?;
                    continue;
                }
                None => token,
            };
            let (op, rest) = split_op(token);
            if rest.is_empty() {
                pending_op = Some(op);
            } else {
                translate_token(op, rest, &mut terms, spec)?;
            }
        }
        if pending_op.is_some() {
            return Err(VersionError::constraint(format!(
                "operator without a version in '{spec}'"
            )));
        }
    }

    let out = terms.join(" ");
    tracing::debug!("translated npm constraint '{spec}' to '{out}'");
    Ok(out)
}

fn split_op(token: &str) -> (&str, &str) {
    let cut = token
        .find(|c| !matches!(c, '=' | '!' | '<' | '>' | '^' | '~'))
        .unwrap_or(token.len());
    token.split_at(cut)
}

fn translate_token(
    op: &str,
    version: &str,
    terms: &mut Vec<String>,
    spec: &str,
) -> VersionResult<()> {
    let partial = parse_partial(version).ok_or_else(|| {
        VersionError::constraint(format!("cannot read version '{version}' in '{spec}'"))
    })?;
    match op {
        "^" => caret(&partial, terms),
        "~" => tilde(&partial, terms),
        "" | "=" | "!=" | "<" | "<=" | ">" | ">=" => x_range(op, version, &partial, terms, spec)?,
        _ => {
            return Err(VersionError::constraint(format!(
                "unknown operator '{op}' in '{spec}'"
            )))
        }
    }
    Ok(())
}

/// Hyphen pass: `A - B`, either side possibly partial.
fn hyphen(lower: &str, upper: &str, terms: &mut Vec<String>, spec: &str) -> VersionResult<()> {
    let too_hard = |side: &str| {
        VersionError::constraint(format!("cannot read version '{side}' in '{spec}'"))
    };
    let lo = parse_partial(lower).ok_or_else(|| too_hard(lower))?;
    let hi = parse_partial(upper).ok_or_else(|| too_hard(upper))?;

    terms.push(format!(
        ">={}.{}.{}{}",
        lo.major.unwrap_or(0),
        lo.minor.unwrap_or(0),
        lo.patch.unwrap_or(0),
        lo.suffix
    ));
    match (hi.major, hi.minor, hi.patch) {
        (None, _, _) => {}
        (Some(major), None, _) => terms.push(format!("<{}.0.0-0", major + 1)),
        (Some(major), Some(minor), None) => terms.push(format!("<{major}.{}.0-0", minor + 1)),
        (Some(major), Some(minor), Some(patch)) => {
            terms.push(format!("<={major}.{minor}.{patch}{}", hi.suffix));
        }
    }
    Ok(())
}

/// Caret pass: changes allowed in everything right of the left-most
/// non-zero component.
fn caret(partial: &Partial, terms: &mut Vec<String>) {
    let Some(major) = partial.major else {
        terms.push(">=0.0.0".to_string());
        return;
    };
    let minor = partial.minor.unwrap_or(0);
    let patch = partial.patch.unwrap_or(0);
    terms.push(format!(">={major}.{minor}.{patch}{}", partial.suffix));

    let upper = if major != 0 {
        format!("<{}.0.0-0", major + 1)
    } else if partial.minor.is_none() {
        "<1.0.0-0".to_string()
    } else if minor != 0 {
        format!("<0.{}.0-0", minor + 1)
    } else if partial.patch.is_none() {
        "<0.1.0-0".to_string()
    } else {
        format!("<0.0.{}-0", patch + 1)
    };
    terms.push(upper);
}

/// Tilde pass: changes allowed in the patch position only (or minor and
/// patch when only a major is given).
fn tilde(partial: &Partial, terms: &mut Vec<String>) {
    let Some(major) = partial.major else {
        terms.push(">=0.0.0".to_string());
        return;
    };
    match partial.minor {
        None => {
            terms.push(format!(">={major}.0.0"));
            terms.push(format!("<{}.0.0-0", major + 1));
        }
        Some(minor) => {
            terms.push(format!(
                ">={major}.{minor}.{}{}",
                partial.patch.unwrap_or(0),
                partial.suffix
            ));
            terms.push(format!("<{major}.{}.0-0", minor + 1));
        }
    }
}

/// X-range pass: wildcarded or missing positions, optionally behind an
/// explicit comparator that normalises its own bound direction.
fn x_range(
    op: &str,
    version: &str,
    partial: &Partial,
    terms: &mut Vec<String>,
    spec: &str,
) -> VersionResult<()> {
    match (partial.major, partial.minor, partial.patch) {
        (Some(_), Some(_), Some(_)) => {
            // Fully specified; the term passes through as written.
            terms.push(format!("{op}{version}"));
        }
        (None, _, _) => match op {
            ">" | "<" => terms.push("<0.0.0-0".to_string()),
            _ => terms.push(">=0.0.0".to_string()),
        },
        (Some(major), None, _) => match op {
            "" | "=" => {
                terms.push(format!(">={major}.0.0"));
                terms.push(format!("<{}.0.0-0", major + 1));
            }
            ">" => terms.push(format!(">={}.0.0-0", major + 1)),
            ">=" => terms.push(format!(">={major}.0.0")),
            "<" => terms.push(format!("<{major}.0.0-0")),
            "<=" => terms.push(format!("<{}.0.0-0", major + 1)),
            _ => {
                return Err(VersionError::constraint(format!(
                    "'{op}' cannot take a wildcard version in '{spec}'"
                )))
            }
        },
        (Some(major), Some(minor), None) => match op {
            "" | "=" => {
                terms.push(format!(">={major}.{minor}.0"));
                terms.push(format!("<{major}.{}.0-0", minor + 1));
            }
            ">" => terms.push(format!(">={major}.{}.0-0", minor + 1)),
            ">=" => terms.push(format!(">={major}.{minor}.0")),
            "<" => terms.push(format!("<{major}.{minor}.0-0")),
            "<=" => terms.push(format!("<{major}.{}.0-0", minor + 1)),
            _ => {
                return Err(VersionError::constraint(format!(
                    "'{op}' cannot take a wildcard version in '{spec}'"
                )))
            }
        },
    }
    Ok(())
}

/// Read a possibly partial version: `1`, `1.2`, `1.2.x`, `1.x`, `*`,
/// `1.2.3-pre`, `1.2.3+build`. Wildcard positions and missing positions
/// both read as `None`.
fn parse_partial(version: &str) -> Option<Partial> {
    let version = version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version);
    let suffix_at = version.char_indices().find_map(|(i, c)| match c {
        '-' => Some(i),
        // A '+' after a digit is build metadata; elsewhere it is the
        // Gradle-flavoured wildcard.
        '+' if version[..i].ends_with(|p: char| p.is_ascii_digit()) => Some(i),
        _ => None,
    });
    let (numbers, suffix) = match suffix_at {
        Some(i) => version.split_at(i),
        None => (version, ""),
    };

    let mut positions = [None, None, None];
    let mut count = 0;
    for (i, part) in numbers.split('.').enumerate() {
        if i >= 3 {
            return None;
        }
        positions[i] = parse_position(part)?;
        count = i + 1;
    }
    if count == 0 {
        return None;
    }
    // Wildcards may not be followed by concrete numbers (`x.2.3`).
    if positions[0].is_none() && (positions[1].is_some() || positions[2].is_some()) {
        return None;
    }
    if positions[1].is_none() && positions[2].is_some() {
        return None;
    }
    Some(Partial {
        major: positions[0],
        minor: positions[1],
        patch: positions[2],
        suffix: suffix.to_string(),
    })
}

/// One dotted position: a number, or a wildcard reading as `None`.
/// The outer `Option` reports malformed input.
fn parse_position(part: &str) -> Option<Option<u64>> {
    match part {
        "x" | "X" | "*" | "+" => Some(None),
        _ if !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()) => {
            part.parse().ok().map(Some)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(spec: &str) -> String {
        translate(spec).unwrap()
    }

    #[test]
    fn wildcard_pass() {
        assert_eq!(t(""), ">=0.0.0");
        assert_eq!(t("*"), ">=0.0.0");
        assert_eq!(t("latest"), ">=0.0.0");
        assert_eq!(t("latest.integration"), ">=0.0.0");
    }

    #[test]
    fn hyphen_pass() {
        assert_eq!(t("1.2.3 - 2.3.4"), ">=1.2.3 <=2.3.4");
        assert_eq!(t("1.2 - 2.3.4"), ">=1.2.0 <=2.3.4");
        assert_eq!(t("1.2.3 - 2.3"), ">=1.2.3 <2.4.0-0");
        assert_eq!(t("1.2.3 - 2"), ">=1.2.3 <3.0.0-0");
    }

    #[test]
    fn caret_pass() {
        assert_eq!(t("^1.2.3"), ">=1.2.3 <2.0.0-0");
        assert_eq!(t("^0.2.3"), ">=0.2.3 <0.3.0-0");
        assert_eq!(t("^0.0.3"), ">=0.0.3 <0.0.4-0");
        assert_eq!(t("^1.2.3-beta.2"), ">=1.2.3-beta.2 <2.0.0-0");
        assert_eq!(t("^1.2"), ">=1.2.0 <2.0.0-0");
        assert_eq!(t("^0.0"), ">=0.0.0 <0.1.0-0");
        assert_eq!(t("^0"), ">=0.0.0 <1.0.0-0");
    }

    #[test]
    fn tilde_pass() {
        assert_eq!(t("~1.2.3"), ">=1.2.3 <1.3.0-0");
        assert_eq!(t("~1.2"), ">=1.2.0 <1.3.0-0");
        assert_eq!(t("~1"), ">=1.0.0 <2.0.0-0");
        assert_eq!(t("~1.2.3-beta.2"), ">=1.2.3-beta.2 <1.3.0-0");
    }

    #[test]
    fn x_range_pass() {
        assert_eq!(t("1.2.x"), ">=1.2.0 <1.3.0-0");
        assert_eq!(t("1.x"), ">=1.0.0 <2.0.0-0");
        assert_eq!(t("1.2.+"), ">=1.2.0 <1.3.0-0");
        assert_eq!(t("1"), ">=1.0.0 <2.0.0-0");
        assert_eq!(t("1.2"), ">=1.2.0 <1.3.0-0");
    }

    #[test]
    fn comparator_with_x_range() {
        assert_eq!(t(">1.2.x"), ">=1.3.0-0");
        assert_eq!(t(">=1.2.x"), ">=1.2.0");
        assert_eq!(t("<1.2.x"), "<1.2.0-0");
        assert_eq!(t("<=1.2.x"), "<1.3.0-0");
        assert_eq!(t(">1.x"), ">=2.0.0-0");
        assert_eq!(t("<=1.x"), "<2.0.0-0");
    }

    #[test]
    fn full_terms_pass_through() {
        assert_eq!(t(">=1.5.0 <3.0.0"), ">=1.5.0 <3.0.0");
        assert_eq!(t("1.2.3"), "1.2.3");
        assert_eq!(t(">= 1.5.0"), ">=1.5.0");
    }

    #[test]
    fn build_metadata_is_not_a_wildcard() {
        assert_eq!(t("1.2.3+build"), "1.2.3+build");
    }

    #[test]
    fn leading_v_is_tolerated() {
        assert_eq!(t(">=v1.2.3"), ">=v1.2.3");
        assert_eq!(t("^v1.2.3"), ">=1.2.3 <2.0.0-0");
        assert_eq!(t("v1.2"), ">=1.2.0 <1.3.0-0");
    }

    #[test]
    fn unknown_operators_fail() {
        assert!(translate("~>1.2.3").is_err());
        assert!(translate("=>1.2.3").is_err());
    }

    #[test]
    fn garbage_fails() {
        assert!(translate("1.2.3.4").is_err());
        assert!(translate("x.2.3").is_err());
        assert!(translate(">=").is_err());
    }
}
