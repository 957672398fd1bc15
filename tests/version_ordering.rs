use std::cmp::Ordering;

use depmeta::version::{QualifierPolicy, Version, VersionComparator};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const VERSION: &str = "(0|1|2|10|[0-9]{1,3}|rc|alpha|beta|ga|final|snapshot|jre|[a-z]{1,3})([.-](0|1|[0-9]{1,2}|rc|m|ga|dev|[a-z]{1,3})){0,4}";

#[test]
fn well_known_orderings() {
    let comparator = VersionComparator::new();
    let cases = [
        ("1.0", "1.0.0", Ordering::Equal),
        ("1.0-final", "1.0", Ordering::Equal),
        ("1.0-rc", "1.0", Ordering::Less),
        ("1.0-alpha", "1.0-beta", Ordering::Less),
        ("1.0-a1", "1.0-alpha-1", Ordering::Equal),
        ("1.0-SNAPSHOT", "1.0", Ordering::Less),
        ("1.0-rc", "1.0-snapshot", Ordering::Less),
        ("1.9", "1.10", Ordering::Less),
        ("1.0.1", "1.0", Ordering::Greater),
        ("2.0-jre", "2.0", Ordering::Less),
        ("2.0-jre", "2.0-rc", Ordering::Greater),
    ];
    for (left, right, expected) in cases {
        assert_eq!(
            comparator.compare_str(left, right),
            expected,
            "{left} vs {right}"
        );
    }
}

#[test]
fn custom_qualifier_policy() {
    let comparator = VersionComparator::with_policy(QualifierPolicy::from_notation(&[
        "snapshot", "rc", "alpha",
    ]));
    assert_eq!(comparator.compare_str("1-alpha", "1-rc"), Ordering::Greater);
    assert_eq!(comparator.compare_str("1-snapshot", "1-rc"), Ordering::Less);
    // No longer recognised, so it orders after every qualifier.
    assert_eq!(comparator.compare_str("1-beta", "1-alpha"), Ordering::Greater);
}

#[test]
fn dynamic_versions() {
    let comparator = VersionComparator::new();
    for dynamic in ["1.+", "+", "[1.0,2.0)", "]1.0,)", "latest.release"] {
        assert!(comparator.is_dynamic(&Version::from(dynamic)), "{dynamic}");
    }
    for fixed in ["1.0", "1.0-rc", "2.0-jre"] {
        assert!(!comparator.is_dynamic(&Version::from(fixed)), "{fixed}");
    }
}

proptest! {
    #[test]
    fn comparison_is_reflexive(a in VERSION) {
        let comparator = VersionComparator::new();
        prop_assert_eq!(comparator.compare_str(&a, &a), Ordering::Equal);
    }

    #[test]
    fn comparison_is_antisymmetric(a in VERSION, b in VERSION) {
        let comparator = VersionComparator::new();
        prop_assert_eq!(comparator.compare_str(&a, &b), comparator.compare_str(&b, &a).reverse());
    }

    #[test]
    fn comparison_is_transitive(a in VERSION, b in VERSION, c in VERSION) {
        let comparator = VersionComparator::new();
        let mut versions = [a, b, c];
        versions.sort_by(|x, y| comparator.compare_str(x, y));
        let [low, mid, high] = &versions;
        prop_assert_ne!(comparator.compare_str(low, mid), Ordering::Greater);
        prop_assert_ne!(comparator.compare_str(mid, high), Ordering::Greater);
        prop_assert_ne!(comparator.compare_str(low, high), Ordering::Greater);
    }

    #[test]
    fn trailing_zeros_are_ignored(a in "[1-9]{1,2}(\\.[0-9]{1,2}){0,3}", zeros in 1usize..4) {
        let comparator = VersionComparator::new();
        let padded = format!("{a}{}", ".0".repeat(zeros));
        prop_assert_eq!(comparator.compare_str(&a, &padded), Ordering::Equal);
    }

    #[test]
    fn max_static_ignores_dynamic_versions(
        versions in prop::collection::vec(VERSION, 0..8),
        prefix in "[0-9]{1,2}",
    ) {
        let comparator = VersionComparator::new();
        let mut versions: Vec<Version> = versions.into_iter().map(Version::from).collect();
        versions.push(Version::from(format!("{prefix}.+")));

        let max = comparator.max_static(&versions);
        if let Some(max) = max {
            prop_assert!(!comparator.is_dynamic(max));
            for version in versions.iter().filter(|v| !comparator.is_dynamic(v)) {
                prop_assert_ne!(comparator.compare(version, max), Ordering::Greater);
            }
        }
    }
}
