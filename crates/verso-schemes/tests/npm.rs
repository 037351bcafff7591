use verso_schemes::npm;
use verso_schemes::semver::{self, SemanticVersion};

fn v(s: &str) -> SemanticVersion {
    SemanticVersion::parse(s).unwrap()
}

#[test]
fn translation_table() {
    let table = [
        ("^1.2.3", ">=1.2.3 <2.0.0-0"),
        ("~1.2", ">=1.2.0 <1.3.0-0"),
        ("1.2.x", ">=1.2.0 <1.3.0-0"),
        ("*", ">=0.0.0"),
        ("latest", ">=0.0.0"),
        ("1.2.3 - 2.3", ">=1.2.3 <2.4.0-0"),
    ];
    for (input, expected) in table {
        assert_eq!(npm::translate(input).unwrap(), expected, "for {input:?}");
    }
}

#[test]
fn translated_constraints_parse_and_match() {
    let caret = semver::parse_constraint("^1.2.3").unwrap();
    assert!(caret.allows(&v("1.2.3")));
    assert!(caret.allows(&v("1.9.0")));
    assert!(!caret.allows(&v("2.0.0")));
    assert!(!caret.allows(&v("2.0.0-alpha")));

    let zero_caret = semver::parse_constraint("^0.2.3").unwrap();
    assert!(zero_caret.allows(&v("0.2.9")));
    assert!(!zero_caret.allows(&v("0.3.0")));

    let tilde = semver::parse_constraint("~1.2.3").unwrap();
    assert!(tilde.allows(&v("1.2.9")));
    assert!(!tilde.allows(&v("1.3.0")));
}

#[test]
fn upper_bounds_exclude_next_pre_releases() {
    let caret = semver::parse_constraint("^1.0.0").unwrap();
    assert!(!caret.allows(&v("2.0.0-0")));
    assert!(!caret.allows(&v("2.0.0-alpha")));
    assert!(caret.allows(&v("1.9.9")));
}

#[test]
fn caret_intersection_scenario() {
    let caret = semver::parse_constraint("^1.0.0").unwrap();
    let window = semver::parse_constraint(">=1.5.0 <3.0.0").unwrap();
    let expected = semver::parse_constraint(">=1.5.0 <2.0.0-0").unwrap();
    assert_eq!(caret.intersect(&window), expected);
}

#[test]
fn hyphen_ranges_fill_missing_positions() {
    let range = semver::parse_constraint("1.2 - 2.3.4").unwrap();
    assert!(range.allows(&v("1.2.0")));
    assert!(range.allows(&v("2.3.4")));
    assert!(!range.allows(&v("2.3.5")));
}

#[test]
fn wildcards_admit_everything() {
    for spec in ["", "*", "latest", "latest.integration"] {
        let c = semver::parse_constraint(spec).unwrap();
        assert!(c.allows(&v("0.0.1")), "{spec:?} rejected 0.0.1");
        assert!(c.allows(&v("99.0.0")), "{spec:?} rejected 99.0.0");
    }
}

#[test]
fn nonsense_is_rejected() {
    assert!(semver::parse_constraint(">2.0.0 =1.2.3").is_err());
    assert!(npm::translate("~>1.0").is_err());
}
