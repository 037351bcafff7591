use verso_schemes::calver::{self, CalendarVersionScheme, ComponentCategory};
use verso_schemes::SchemeVersion;

#[test]
fn documented_parse_scenario() {
    let scheme = CalendarVersionScheme::new("YYYY.MM.0D-MAJOR").unwrap();
    let version = scheme.parse("2023.2.03-4").unwrap();

    let shape: Vec<(ComponentCategory, i64)> = version
        .components()
        .iter()
        .map(|c| (c.category(), c.value()))
        .collect();
    assert_eq!(
        shape,
        vec![
            (ComponentCategory::Year, 2023),
            (ComponentCategory::Month, 2),
            (ComponentCategory::Day, 3),
            (ComponentCategory::Major, 4),
        ]
    );
    assert!(!version.is_pre_release());
    assert_eq!(version.original(), "2023.2.03-4");
}

#[test]
fn ubuntu_style_releases_order_by_date() {
    let scheme = CalendarVersionScheme::new("YY.0M").unwrap();
    let lts = scheme.parse("24.04").unwrap();
    let interim = scheme.parse("23.10").unwrap();
    assert!(interim.compare(&lts).is_lt());
    assert_eq!(lts.components()[0].value(), 2024);
}

#[test]
fn modifiers_mark_pre_releases() {
    let scheme = CalendarVersionScheme::new("YYYY.MINOR").unwrap();
    let tagged = scheme.parse("2023.4-beta.2").unwrap();
    assert!(tagged.is_pre_release());
    assert_eq!(tagged.components().last().unwrap().text(), "beta.2");

    let release = scheme.parse("2023.4").unwrap();
    assert!(!release.is_pre_release());
    assert!(tagged.compare(&release).is_lt());
}

#[test]
fn one_shot_parse_helper() {
    let version = calver::parse("YYYY.MM", "2023.7").unwrap();
    assert_eq!(version.components()[1].value(), 7);
}

#[test]
fn scheme_constraints() {
    let scheme = CalendarVersionScheme::new("YYYY.MM").unwrap();
    let this_year = scheme.parse_constraint("[2023.1,2023.12]").unwrap();
    assert!(this_year.allows(&scheme.parse("2023.7").unwrap()));
    assert!(!this_year.allows(&scheme.parse("2024.1").unwrap()));
}

#[test]
fn category_names_round_trip() {
    for category in [
        ComponentCategory::Year,
        ComponentCategory::Month,
        ComponentCategory::Week,
        ComponentCategory::Day,
        ComponentCategory::Major,
        ComponentCategory::Minor,
        ComponentCategory::Patch,
        ComponentCategory::Modifier,
    ] {
        assert_eq!(category.name().parse::<ComponentCategory>().unwrap(), category);
    }
    assert!("EPOCH".parse::<ComponentCategory>().is_err());
}

#[test]
fn bad_formats_are_rejected_up_front() {
    assert!(CalendarVersionScheme::new("").is_err());
    assert!(CalendarVersionScheme::new("YYYY.NOPE").is_err());
    assert!(CalendarVersionScheme::new("---").is_err());
}
