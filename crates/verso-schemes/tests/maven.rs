use verso_schemes::maven::{self, MavenVersion};
use verso_schemes::SchemeVersion;

fn v(s: &str) -> MavenVersion {
    MavenVersion::parse(s)
}

#[test]
fn guava_style_ordering() {
    assert!(v("31.0-jre") < v("32.0-jre"));
    assert!(v("31.0-android") < v("31.0-jre"));
}

#[test]
fn qualifier_chain() {
    let chain = [
        "1.0-alpha",
        "1.0-beta",
        "1.0-milestone",
        "1.0-rc",
        "1.0-SNAPSHOT",
        "1.0",
        "1.0-sp",
        "1.0-whatever",
    ];
    for pair in chain.windows(2) {
        assert!(v(pair[0]) < v(pair[1]), "{} should precede {}", pair[0], pair[1]);
    }
}

#[test]
fn intersection_scenario() {
    let a = maven::parse_constraint("[1.0.0,2.0.0)").unwrap();
    let b = maven::parse_constraint("[1.5.0,3.0.0)").unwrap();
    let both = a.intersect(&b);
    assert_eq!(both.to_string(), "[1.5.0,2.0.0)");
    assert!(both.allows(&v("1.5.0")));
    assert!(!both.allows(&v("2.0.0")));
}

#[test]
fn union_scenario() {
    let a = maven::parse_constraint("[1.0.0,2.0.0)").unwrap();
    let b = maven::parse_constraint("[1.5.0,3.0.0)").unwrap();
    let either = a.union(&b);
    assert_eq!(either.to_string(), "[1.0.0,3.0.0)");
}

#[test]
fn complement_of_a_window() {
    let window = maven::parse_constraint("[1.0,2.0)").unwrap();
    let outside = window.complement();
    assert_eq!(outside.to_string(), "(,1.0),[2.0,)");
    assert!(outside.allows(&v("2.0")));
    assert!(!outside.allows(&v("1.5")));
    assert_eq!(outside.complement(), window);
}

#[test]
fn multi_range_exclusion_style() {
    // The canonical Maven trick for "anything but 1.1".
    let not_1_1 = maven::parse_constraint("(,1.1),(1.1,)").unwrap();
    assert!(not_1_1.allows(&v("1.0")));
    assert!(!not_1_1.allows(&v("1.1")));
    assert!(not_1_1.allows(&v("1.2")));
}

#[test]
fn soft_requirement_is_weak() {
    let soft = maven::parse_constraint("1.2.3").unwrap();
    assert!(soft.is_weak());
    // Algebra clears the flag.
    assert!(!soft.intersect(&maven::parse_constraint("[1.0,2.0)").unwrap()).is_weak());
}

#[test]
fn subset_and_overlap_queries() {
    let wide = maven::parse_constraint("[1.0,3.0)").unwrap();
    let narrow = maven::parse_constraint("[1.5,2.0)").unwrap();
    let apart = maven::parse_constraint("[4.0,)").unwrap();

    assert!(wide.allows_all(&narrow));
    assert!(!narrow.allows_all(&wide));
    assert!(wide.allows_any(&narrow));
    assert!(!wide.allows_any(&apart));
}

#[test]
fn snapshots_sit_below_their_release() {
    let released = maven::parse_constraint("[1.0,)").unwrap();
    assert!(!released.allows(&v("1.0-SNAPSHOT")));
    assert!(released.allows(&v("1.0")));
    assert!(v("1.0-SNAPSHOT").is_pre_release());
}
