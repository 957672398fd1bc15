mod constraint;
mod qualifier;

pub use constraint::VersionConstraint;
pub use qualifier::QualifierPolicy;

use std::{cmp::Ordering, fmt::Display};

use serde::{Deserialize, Serialize};

/// A version string. Only [`VersionComparator`] orders versions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    pub fn new(value: impl Into<String>) -> Self {
        Version(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Version(s.to_string())
    }
}

impl From<String> for Version {
    fn from(s: String) -> Self {
        Version(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Digits without leading zeros; empty for zero.
    Number(String),
    /// Lowercased text.
    Text(String),
}

impl Segment {
    fn is_zero(&self) -> bool {
        matches!(self, Segment::Number(digits) if digits.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SegmentClass {
    Qualifier,
    Unrecognized,
    End,
    Number,
}

fn tokenize(version: &str) -> Vec<Segment> {
    fn flush(current: &mut String, numeric: bool, segments: &mut Vec<Segment>) {
        if current.is_empty() {
            return;
        }
        let segment = if numeric {
            Segment::Number(current.trim_start_matches('0').to_string())
        } else {
            Segment::Text(current.to_lowercase())
        };
        segments.push(segment);
        current.clear();
    }

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut numeric = false;
    for c in version.chars() {
        if !c.is_alphanumeric() {
            flush(&mut current, numeric, &mut segments);
            continue;
        }
        let digit = c.is_ascii_digit();
        if !current.is_empty() && digit != numeric {
            flush(&mut current, numeric, &mut segments);
        }
        numeric = digit;
        current.push(c);
    }
    flush(&mut current, numeric, &mut segments);
    segments
}

/// Total order over version strings.
///
/// Versions are split on `.`, `-`, `_` (any non-alphanumeric character) and on
/// digit/letter boundaries. Release markers (`final`, `ga`, `release`) are
/// dropped and trailing zeros of every numeric run are ignored, so `1.0.0`,
/// `1.0` and `1-final` are equal. Segments then compare with
/// `qualifier < unrecognised text < end of version < number`, qualifiers by
/// their [`QualifierPolicy`] rank.
#[derive(Debug, Clone, Default)]
pub struct VersionComparator {
    policy: QualifierPolicy,
}

impl VersionComparator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: QualifierPolicy) -> Self {
        VersionComparator { policy }
    }

    pub fn policy(&self) -> &QualifierPolicy {
        &self.policy
    }

    pub fn compare(&self, a: &Version, b: &Version) -> Ordering {
        self.compare_str(a.as_str(), b.as_str())
    }

    pub fn compare_str(&self, a: &str, b: &str) -> Ordering {
        let left = self.canonical(a);
        let right = self.canonical(b);
        for i in 0..left.len().max(right.len()) {
            let ordering = self.compare_segments(left.get(i), right.get(i));
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Whether the version denotes a range or a "latest" selector rather than
    /// a single point. Such versions must never be picked as a resolution
    /// result.
    pub fn is_dynamic(&self, version: &Version) -> bool {
        VersionConstraint::parse(version.as_str()).is_dynamic()
    }

    /// Sorts ascending. Stable, so equal versions keep their input order.
    pub fn sort(&self, versions: &mut [Version]) {
        versions.sort_by(|a, b| self.compare(a, b));
    }

    /// Greatest non-dynamic version; the first one wins among equals.
    pub fn max_static<'a, I>(&self, versions: I) -> Option<&'a Version>
    where
        I: IntoIterator<Item = &'a Version>,
    {
        versions
            .into_iter()
            .filter(|version| !self.is_dynamic(version))
            .fold(None, |best, candidate| match best {
                Some(best) if self.compare(candidate, best) != Ordering::Greater => Some(best),
                _ => Some(candidate),
            })
    }

    fn canonical(&self, version: &str) -> Vec<Segment> {
        fn trim_zeros(segments: &mut Vec<Segment>) {
            while segments.last().is_some_and(Segment::is_zero) {
                segments.pop();
            }
        }

        let mut canonical = Vec::new();
        for segment in tokenize(version) {
            match &segment {
                Segment::Text(text) if self.policy.is_release_marker(text) => continue,
                Segment::Text(_) => trim_zeros(&mut canonical),
                Segment::Number(_) => {}
            }
            canonical.push(segment);
        }
        trim_zeros(&mut canonical);
        canonical
    }

    fn class(&self, segment: Option<&Segment>) -> SegmentClass {
        match segment {
            None => SegmentClass::End,
            Some(Segment::Number(_)) => SegmentClass::Number,
            Some(Segment::Text(text)) if self.policy.rank(text).is_some() => {
                SegmentClass::Qualifier
            }
            Some(Segment::Text(_)) => SegmentClass::Unrecognized,
        }
    }

    fn compare_segments(&self, a: Option<&Segment>, b: Option<&Segment>) -> Ordering {
        let class = self.class(a);
        match class.cmp(&self.class(b)) {
            Ordering::Equal => {}
            ordering => return ordering,
        }
        match (a, b) {
            (Some(Segment::Number(x)), Some(Segment::Number(y))) => {
                x.len().cmp(&y.len()).then_with(|| x.cmp(y))
            }
            (Some(Segment::Text(x)), Some(Segment::Text(y)))
                if class == SegmentClass::Qualifier =>
            {
                self.policy.rank(x).cmp(&self.policy.rank(y))
            }
            (Some(Segment::Text(x)), Some(Segment::Text(y))) => x.cmp(y),
            _ => Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn cmp(a: &str, b: &str) -> Ordering {
        VersionComparator::new().compare(&Version::from(a), &Version::from(b))
    }

    #[test]
    fn tokenize_boundaries() {
        assert_eq!(
            tokenize("1.02-RC_3b"),
            vec![
                Segment::Number("1".into()),
                Segment::Number("2".into()),
                Segment::Text("rc".into()),
                Segment::Number("3".into()),
                Segment::Text("b".into()),
            ]
        );
        assert_eq!(tokenize(""), Vec::<Segment>::new());
        assert_eq!(tokenize("..--"), Vec::<Segment>::new());
    }

    #[test]
    fn trailing_zeros_are_equal() {
        assert_eq!(cmp("1.0.0", "1.0"), Ordering::Equal);
        assert_eq!(cmp("1", "1.0.0.0"), Ordering::Equal);
        assert_eq!(cmp("", "0"), Ordering::Equal);
        assert_eq!(cmp("1.0.0-rc", "1-rc"), Ordering::Equal);
    }

    #[test]
    fn qualifiers_sort_below_release() {
        assert_eq!(cmp("1.0-rc", "1.0"), Ordering::Less);
        assert_eq!(cmp("1.0-beta", "1.0-rc"), Ordering::Less);
        assert_eq!(cmp("1.0-SNAPSHOT", "1.0"), Ordering::Less);
        assert_eq!(cmp("1.0-dev", "1.0-alpha"), Ordering::Less);
        assert_eq!(cmp("1.0-a1", "1.0-alpha1"), Ordering::Equal);
        assert_eq!(cmp("1.0-m2", "1.0-cr1"), Ordering::Less);
        assert_eq!(cmp("1.0-rc", "1.0-snapshot"), Ordering::Less);
    }

    #[test]
    fn release_markers_are_baseline() {
        assert_eq!(cmp("1.0-final", "1.0"), Ordering::Equal);
        assert_eq!(cmp("1.0.GA", "1.0.0.RELEASE"), Ordering::Equal);
        assert_eq!(cmp("1.0-rc", "1.0-final"), Ordering::Less);
    }

    #[test]
    fn unrecognised_text_between_qualifiers_and_release() {
        assert_eq!(cmp("1.0-snapshot", "1.0-preview"), Ordering::Less);
        assert_eq!(cmp("1.0-preview", "1.0"), Ordering::Less);
        assert_eq!(cmp("1.0-Preview", "1.0-zulu"), Ordering::Less);
        assert_eq!(cmp("1.0-PREVIEW", "1.0-preview"), Ordering::Equal);
    }

    #[test]
    fn numbers_compare_by_value() {
        assert_eq!(cmp("1.10", "1.9"), Ordering::Greater);
        assert_eq!(cmp("1.010", "1.10"), Ordering::Equal);
        assert_eq!(cmp("1.0.1", "1.0"), Ordering::Greater);
        assert_eq!(cmp("1.0.1", "1.0-rc"), Ordering::Greater);
        assert_eq!(
            cmp("1.123456789012345678901234567890", "1.99999999999999999999"),
            Ordering::Greater
        );
    }

    #[test]
    fn number_beats_text_at_same_position() {
        assert_eq!(cmp("1.1", "1.a"), Ordering::Greater);
        assert_eq!(cmp("1.0-1", "1.0-rc"), Ordering::Greater);
    }

    #[test]
    fn custom_policy() {
        let comparator =
            VersionComparator::with_policy(QualifierPolicy::from_notation(&["rc", "beta"]));
        assert_eq!(
            comparator.compare_str("1.0-beta", "1.0-rc"),
            Ordering::Greater
        );
        // "alpha" is no longer recognised, so it sorts above every qualifier.
        assert_eq!(
            comparator.compare_str("1.0-alpha", "1.0-beta"),
            Ordering::Greater
        );
    }

    #[test]
    fn dynamic_versions() {
        let comparator = VersionComparator::new();
        assert!(comparator.is_dynamic(&Version::from("1.+")));
        assert!(comparator.is_dynamic(&Version::from("[1.0,2.0)")));
        assert!(comparator.is_dynamic(&Version::from("latest.release")));
        assert!(!comparator.is_dynamic(&Version::from("1.0")));
    }

    #[test]
    fn sort_and_max_static() {
        let comparator = VersionComparator::new();
        let mut versions: Vec<Version> = ["2.0", "1.0-rc", "1.0", "1.+", "1.0.0"]
            .into_iter()
            .map(Version::from)
            .collect();
        comparator.sort(&mut versions);
        let sorted: Vec<&str> = versions.iter().map(Version::as_str).collect();
        assert_eq!(sorted, vec!["1.0-rc", "1.0", "1.+", "1.0.0", "2.0"]);

        let max = comparator.max_static(&versions);
        assert_eq!(max, Some(&Version::from("2.0")));

        let only_dynamic = [Version::from("1.+"), Version::from("latest.release")];
        assert_eq!(comparator.max_static(&only_dynamic), None);

        let ties = [Version::from("1.0"), Version::from("1.0.0")];
        assert_eq!(comparator.max_static(&ties).map(Version::as_str), Some("1.0"));
    }
}
