//! Raw declarations handed over by a declaration front end, before any
//! conversion or validation.

use super::{artifact::ArtifactCoordinate, exclude::ExcludePattern};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredTarget {
    Module {
        group: Option<String>,
        name: Option<String>,
        version: String,
    },
    Project {
        path: Option<String>,
        configuration: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredDependency {
    pub target: DeclaredTarget,
    pub excludes: Vec<ExcludePattern>,
    pub artifacts: Vec<ArtifactCoordinate>,
    pub transitive: bool,
    pub forced: bool,
}

impl DeclaredDependency {
    pub fn module(group: &str, name: &str, version: &str) -> Self {
        Self::new(DeclaredTarget::Module {
            group: Some(group.to_string()),
            name: Some(name.to_string()),
            version: version.to_string(),
        })
    }

    pub fn project(path: &str) -> Self {
        Self::new(DeclaredTarget::Project {
            path: Some(path.to_string()),
            configuration: None,
        })
    }

    pub fn new(target: DeclaredTarget) -> Self {
        DeclaredDependency {
            target,
            excludes: Vec::new(),
            artifacts: Vec::new(),
            transitive: true,
            forced: false,
        }
    }

    pub fn exclude(mut self, pattern: ExcludePattern) -> Self {
        self.excludes.push(pattern);
        self
    }

    pub fn artifact(mut self, artifact: ArtifactCoordinate) -> Self {
        self.artifacts.push(artifact);
        self
    }

    pub fn transitive(mut self, transitive: bool) -> Self {
        self.transitive = transitive;
        self
    }

    pub fn forced(mut self, forced: bool) -> Self {
        self.forced = forced;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredConfiguration {
    pub name: String,
    pub extends_from: Vec<String>,
    pub dependencies: Vec<DeclaredDependency>,
    pub artifacts: Vec<ArtifactCoordinate>,
    pub excludes: Vec<ExcludePattern>,
}

impl DeclaredConfiguration {
    pub fn new(name: impl Into<String>) -> Self {
        DeclaredConfiguration {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn extends_from(mut self, name: impl Into<String>) -> Self {
        self.extends_from.push(name.into());
        self
    }

    pub fn dependency(mut self, dependency: DeclaredDependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn artifact(mut self, artifact: ArtifactCoordinate) -> Self {
        self.artifacts.push(artifact);
        self
    }

    pub fn exclude(mut self, pattern: ExcludePattern) -> Self {
        self.excludes.push(pattern);
        self
    }
}
