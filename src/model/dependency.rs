use std::{collections::BTreeSet, fmt::Display};

use crate::version::VersionConstraint;

use super::{artifact::ArtifactCoordinate, exclude::ExcludeRule, identifier::ModuleIdentifier};

/// What a dependency edge points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetSelector {
    /// A module fetched from outside the build.
    Module {
        id: ModuleIdentifier,
        constraint: VersionConstraint,
    },
    /// Another project of the same build, optionally a specific configuration
    /// of it.
    Project {
        path: String,
        configuration: Option<String>,
    },
}

impl Display for TargetSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetSelector::Module { id, constraint } => write!(f, "{}:{}", id, constraint),
            TargetSelector::Project {
                path,
                configuration: Some(configuration),
            } => write!(f, "project {} ({})", path, configuration),
            TargetSelector::Project {
                path,
                configuration: None,
            } => write!(f, "project {}", path),
        }
    }
}

/// One declared dependency edge with its exclusions already converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyDescriptor {
    pub from_configuration: String,
    pub target: TargetSelector,
    pub exclude_rules: Vec<ExcludeRule>,
    pub requested_artifacts: BTreeSet<ArtifactCoordinate>,
    pub transitive: bool,
    pub forced: bool,
}

impl DependencyDescriptor {
    pub fn module(&self) -> Option<&ModuleIdentifier> {
        match &self.target {
            TargetSelector::Module { id, .. } => Some(id),
            TargetSelector::Project { .. } => None,
        }
    }

    pub fn is_project(&self) -> bool {
        matches!(self.target, TargetSelector::Project { .. })
    }

    /// Whether a transitive edge to `module` is pruned by this dependency.
    pub fn excludes(&self, module: &ModuleIdentifier) -> bool {
        self.exclude_rules.iter().any(|rule| rule.matches(module))
    }
}
