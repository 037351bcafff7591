use verso_schemes::gradle::{self, GradleVersion};
use verso_schemes::SchemeVersion;

fn v(s: &str) -> GradleVersion {
    GradleVersion::parse(s)
}

#[test]
fn interval_algebra_scenario() {
    // `[1.0.0,2.0.0[` uses the Ivy exclusion bracket; `2.+` stays a
    // version inside the second range and orders just below 2.0.0.
    let a = gradle::parse_constraint("[1.0.0,2.0.0[").unwrap();
    let b = gradle::parse_constraint("[1.5.0,2.+]").unwrap();

    let both = a.intersect(&b);
    assert_eq!(both.to_string(), "[1.5.0,2.+]");

    let either = a.union(&b);
    assert_eq!(either.to_string(), "[1.0.0,2.0.0)");
}

#[test]
fn dynamic_versions() {
    let patches = gradle::parse_constraint("1.2.+").unwrap();
    assert!(patches.allows(&v("1.2.0")));
    assert!(patches.allows(&v("1.2.99")));
    assert!(!patches.allows(&v("1.3.0")));
    assert!(!patches.allows(&v("1.1.9")));

    let anything = gradle::parse_constraint("+").unwrap();
    assert!(anything.allows(&v("0.0.1")));
    assert!(anything.allows(&v("99")));
    assert_eq!(anything.to_string(), "(,)");
}

#[test]
fn dynamic_version_with_text_prefix_fails() {
    assert!(gradle::parse_constraint("1.beta.+").is_err());
}

#[test]
fn plain_version_opens_upward() {
    let onward = gradle::parse_constraint("2.5").unwrap();
    assert!(onward.allows(&v("2.5")));
    assert!(onward.allows(&v("3.0")));
    assert!(!onward.allows(&v("2.4.9")));
}

#[test]
fn snapshot_ordering_and_flag() {
    assert!(v("1.0-SNAPSHOT") < v("1.0"));
    assert!(v("1.0-SNAPSHOT").is_pre_release());
    let released = gradle::parse_constraint("[1.0,2.0]").unwrap();
    assert!(!released.allows(&v("1.0-SNAPSHOT")));
    assert!(released.allows(&v("2.0-SNAPSHOT")));
}

#[test]
fn mixed_token_ordering() {
    assert!(v("1.0.0-alpha") < v("1.0.0"));
    assert!(v("1.0.0-a") < v("1.0.0-b"));
    assert!(v("1.2") < v("1.11"));
    // Numbers beat text at the same position.
    assert!(v("1.alpha") < v("1.0"));
}

#[test]
fn exclusion_bracket_round_trip() {
    let open = gradle::parse_constraint("]1.0,2.0[").unwrap();
    assert_eq!(open.to_string(), "(1.0,2.0)");
    let same = gradle::parse_constraint("(1.0,2.0)").unwrap();
    assert_eq!(open, same);
}
