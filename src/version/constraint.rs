use std::{cmp::Ordering, fmt::Display, sync::OnceLock};

use regex_lite::Regex;

use super::{Version, VersionComparator};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RangeBound {
    pub version: Version,
    pub inclusive: bool,
}

/// What a dependency declaration asks for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionConstraint {
    /// A single concrete version.
    Exact(Version),
    /// `1.2.+`; the prefix is everything before the `+`.
    Prefix(String),
    /// `[1.0,2.0)`, `]1.0,)`, `[1.0]`. A missing bound is unbounded.
    Range {
        lower: Option<RangeBound>,
        upper: Option<RangeBound>,
    },
    /// `latest.<status>`, e.g. `latest.release`.
    Latest(String),
}

fn range_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?P<open>[\[\]\(])\s*(?P<lower>[^,\[\]\(\)]*?)\s*,\s*(?P<upper>[^,\[\]\(\)]*?)\s*(?P<close>[\[\]\)])$",
        )
        .unwrap()
    })
}

fn single_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\[\s*(?P<version>[^,\[\]\(\)]+?)\s*\]$").unwrap())
}

impl VersionConstraint {
    pub fn parse(notation: &str) -> VersionConstraint {
        let notation = notation.trim();
        if let Some(status) = notation.strip_prefix("latest.") {
            return VersionConstraint::Latest(status.to_string());
        }
        if let Some(prefix) = notation.strip_suffix('+') {
            return VersionConstraint::Prefix(prefix.to_string());
        }
        if let Some(captures) = single_pattern().captures(notation) {
            let bound = RangeBound {
                version: Version::from(&captures["version"]),
                inclusive: true,
            };
            return VersionConstraint::Range {
                lower: Some(bound.clone()),
                upper: Some(bound),
            };
        }
        if let Some(captures) = range_pattern().captures(notation) {
            let bound = |name: &str, inclusive: bool| {
                let value = &captures[name];
                (!value.is_empty()).then(|| RangeBound {
                    version: Version::from(value),
                    inclusive,
                })
            };
            return VersionConstraint::Range {
                lower: bound("lower", &captures["open"] == "["),
                upper: bound("upper", &captures["close"] == "]"),
            };
        }
        VersionConstraint::Exact(Version::from(notation))
    }

    pub fn is_dynamic(&self) -> bool {
        !matches!(self, VersionConstraint::Exact(_))
    }

    /// Whether a concrete candidate satisfies this constraint. Dynamic
    /// candidates never do.
    pub fn accepts(&self, candidate: &Version, comparator: &VersionComparator) -> bool {
        if comparator.is_dynamic(candidate) {
            return false;
        }
        match self {
            VersionConstraint::Exact(version) => {
                comparator.compare(candidate, version) == Ordering::Equal
            }
            VersionConstraint::Prefix(prefix) => candidate.as_str().starts_with(prefix.as_str()),
            VersionConstraint::Range { lower, upper } => {
                let above = lower.as_ref().map_or(true, |bound| {
                    match comparator.compare(candidate, &bound.version) {
                        Ordering::Greater => true,
                        Ordering::Equal => bound.inclusive,
                        Ordering::Less => false,
                    }
                });
                let below = upper.as_ref().map_or(true, |bound| {
                    match comparator.compare(candidate, &bound.version) {
                        Ordering::Less => true,
                        Ordering::Equal => bound.inclusive,
                        Ordering::Greater => false,
                    }
                });
                above && below
            }
            VersionConstraint::Latest(_) => true,
        }
    }
}

impl Display for VersionConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VersionConstraint::Exact(version) => write!(f, "{}", version),
            VersionConstraint::Prefix(prefix) => write!(f, "{}+", prefix),
            VersionConstraint::Latest(status) => write!(f, "latest.{}", status),
            VersionConstraint::Range {
                lower: Some(lower),
                upper: Some(upper),
            } if lower == upper && lower.inclusive => write!(f, "[{}]", lower.version),
            VersionConstraint::Range { lower, upper } => {
                match lower {
                    Some(RangeBound {
                        version,
                        inclusive: true,
                    }) => write!(f, "[{}", version)?,
                    Some(RangeBound { version, .. }) => write!(f, "({}", version)?,
                    None => f.write_str("(")?,
                }
                f.write_str(",")?;
                match upper {
                    Some(RangeBound {
                        version,
                        inclusive: true,
                    }) => write!(f, "{}]", version),
                    Some(RangeBound { version, .. }) => write!(f, "{})", version),
                    None => f.write_str(")"),
                }
            }
        }
    }
}

impl From<&str> for VersionConstraint {
    fn from(notation: &str) -> Self {
        VersionConstraint::parse(notation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn bound(version: &str, inclusive: bool) -> Option<RangeBound> {
        Some(RangeBound {
            version: Version::from(version),
            inclusive,
        })
    }

    #[test]
    fn parse_exact() {
        assert_eq!(
            VersionConstraint::parse(" 1.2.3 "),
            VersionConstraint::Exact(Version::from("1.2.3"))
        );
        assert_eq!(
            VersionConstraint::parse(""),
            VersionConstraint::Exact(Version::from(""))
        );
    }

    #[test]
    fn parse_dynamic_forms() {
        assert_eq!(
            VersionConstraint::parse("1.2.+"),
            VersionConstraint::Prefix("1.2.".to_string())
        );
        assert_eq!(
            VersionConstraint::parse("+"),
            VersionConstraint::Prefix(String::new())
        );
        assert_eq!(
            VersionConstraint::parse("latest.integration"),
            VersionConstraint::Latest("integration".to_string())
        );
        assert_eq!(
            VersionConstraint::parse("[1.0, 2.0)"),
            VersionConstraint::Range {
                lower: bound("1.0", true),
                upper: bound("2.0", false),
            }
        );
        assert_eq!(
            VersionConstraint::parse("]1.0,)"),
            VersionConstraint::Range {
                lower: bound("1.0", false),
                upper: None,
            }
        );
        assert_eq!(
            VersionConstraint::parse("[1.5]"),
            VersionConstraint::Range {
                lower: bound("1.5", true),
                upper: bound("1.5", true),
            }
        );
    }

    #[test]
    fn display_round_trips_notation() {
        for notation in [
            "1.0",
            "1.+",
            "latest.release",
            "[1.0,2.0)",
            "(1.0,2.0]",
            "[1.5]",
            "(,2.0)",
        ] {
            assert_eq!(VersionConstraint::parse(notation).to_string(), notation);
        }
    }

    #[test]
    fn accepts_candidates() {
        let comparator = VersionComparator::new();
        let accepts = |constraint: &str, candidate: &str| {
            VersionConstraint::parse(constraint).accepts(&Version::from(candidate), &comparator)
        };
        assert!(accepts("1.0", "1.0.0"));
        assert!(!accepts("1.0", "1.1"));
        assert!(accepts("1.2.+", "1.2.9"));
        assert!(!accepts("1.2.+", "1.3"));
        assert!(accepts("[1.0,2.0)", "1.0"));
        assert!(accepts("[1.0,2.0)", "1.9.9"));
        assert!(!accepts("[1.0,2.0)", "2.0"));
        assert!(accepts("[1.0,2.0)", "2.0-rc"));
        assert!(!accepts("]1.0,)", "1.0"));
        assert!(accepts("]1.0,)", "10"));
        assert!(accepts("latest.release", "3.0"));
        assert!(!accepts("latest.release", "1.+"));
    }
}
