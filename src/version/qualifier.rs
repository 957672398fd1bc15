use std::collections::{HashMap, HashSet};

const DEFAULT_RANKS: &[&[&str]] = &[
    &["dev"],
    &["alpha", "a"],
    &["beta", "b"],
    &["milestone", "m"],
    &["rc", "cr"],
    &["snapshot"],
];

const RELEASE_MARKERS: &[&str] = &["final", "ga", "release"];

/// Precedence of the text qualifiers that can appear in a version.
///
/// Ranked qualifiers sort below unrecognised text, which in turn sorts below
/// a plain release. Release markers such as `final` are equivalent to no
/// qualifier at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifierPolicy {
    ranks: HashMap<String, usize>,
    release: HashSet<String>,
}

impl QualifierPolicy {
    /// Builds a policy from rank groups, lowest first. Every alias in a group
    /// shares that group's rank. Matching is case-insensitive.
    pub fn new<G, S>(groups: G) -> Self
    where
        G: IntoIterator,
        G::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ranks = HashMap::new();
        for (rank, group) in groups.into_iter().enumerate() {
            for alias in group {
                ranks
                    .entry(alias.as_ref().to_lowercase())
                    .or_insert(rank);
            }
        }
        QualifierPolicy {
            ranks,
            release: RELEASE_MARKERS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Parses groups written as `alias/alias`, e.g. `["dev", "alpha/a"]`.
    pub fn from_notation<S: AsRef<str>>(groups: &[S]) -> Self {
        Self::new(groups.iter().map(|group| {
            group
                .as_ref()
                .split('/')
                .map(str::trim)
                .filter(|alias| !alias.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        }))
    }

    /// Rank of a lowercase qualifier, if it is recognised.
    pub fn rank(&self, qualifier: &str) -> Option<usize> {
        self.ranks.get(qualifier).copied()
    }

    pub fn is_release_marker(&self, qualifier: &str) -> bool {
        self.release.contains(qualifier)
    }
}

impl Default for QualifierPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RANKS.iter().map(|group| group.iter().copied()))
    }
}
