use std::collections::BTreeSet;

use super::{artifact::ArtifactCoordinate, dependency::DependencyDescriptor, exclude::ExcludeRule};

/// Metadata of one configuration. Inherited content is not copied in; it is
/// reachable through the names in `extends_from`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationMetadata {
    name: String,
    extends_from: Vec<String>,
    dependencies: Vec<DependencyDescriptor>,
    artifacts: BTreeSet<ArtifactCoordinate>,
    exclude_rules: Vec<ExcludeRule>,
}

impl ConfigurationMetadata {
    pub(crate) fn new(
        name: String,
        extends_from: Vec<String>,
        dependencies: Vec<DependencyDescriptor>,
        artifacts: BTreeSet<ArtifactCoordinate>,
        exclude_rules: Vec<ExcludeRule>,
    ) -> Self {
        ConfigurationMetadata {
            name,
            extends_from,
            dependencies,
            artifacts,
            exclude_rules,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directly extended configurations, in declaration order.
    pub fn extends_from(&self) -> &[String] {
        &self.extends_from
    }

    /// Own dependencies, in declaration order.
    pub fn dependencies(&self) -> &[DependencyDescriptor] {
        &self.dependencies
    }

    pub fn artifacts(&self) -> &BTreeSet<ArtifactCoordinate> {
        &self.artifacts
    }

    pub fn exclude_rules(&self) -> &[ExcludeRule] {
        &self.exclude_rules
    }
}
