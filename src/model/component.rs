use std::collections::{HashMap, HashSet, VecDeque};

use super::{
    configuration::ConfigurationMetadata, dependency::DependencyDescriptor,
    exclude::ExcludeRule, identifier::ComponentIdentifier,
};

/// Frozen metadata of a component.
///
/// Configurations live in an arena in declaration order; inheritance edges
/// are stored as indices into it.
#[derive(Debug, Clone)]
pub struct ComponentMetadata {
    id: ComponentIdentifier,
    configurations: Vec<ConfigurationMetadata>,
    index: HashMap<String, usize>,
    parents: Vec<Vec<usize>>,
}

impl ComponentMetadata {
    pub(crate) fn new(
        id: ComponentIdentifier,
        configurations: Vec<ConfigurationMetadata>,
        index: HashMap<String, usize>,
        parents: Vec<Vec<usize>>,
    ) -> Self {
        ComponentMetadata {
            id,
            configurations,
            index,
            parents,
        }
    }

    pub fn id(&self) -> &ComponentIdentifier {
        &self.id
    }

    pub fn configurations(&self) -> &[ConfigurationMetadata] {
        &self.configurations
    }

    pub fn configuration_names(&self) -> Vec<&str> {
        self.configurations.iter().map(|c| c.name()).collect()
    }

    pub fn configuration(&self, name: &str) -> Option<&ConfigurationMetadata> {
        self.index.get(name).map(|&i| &self.configurations[i])
    }

    /// The configuration followed by everything it extends, transitively,
    /// breadth-first. Each configuration appears once.
    pub fn hierarchy(&self, name: &str) -> Option<Vec<&ConfigurationMetadata>> {
        let start = *self.index.get(name)?;
        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        let mut result = Vec::new();
        while let Some(current) = queue.pop_front() {
            result.push(&self.configurations[current]);
            for &parent in &self.parents[current] {
                if visited.insert(parent) {
                    queue.push_back(parent);
                }
            }
        }
        Some(result)
    }

    /// Union of the exclude rules of the whole hierarchy, without structural
    /// duplicates.
    pub fn effective_excludes(&self, name: &str) -> Option<Vec<ExcludeRule>> {
        let mut seen = HashSet::new();
        Some(
            self.hierarchy(name)?
                .into_iter()
                .flat_map(|c| c.exclude_rules())
                .filter(|rule| seen.insert(*rule))
                .cloned()
                .collect(),
        )
    }

    /// Own dependencies first, then inherited ones in hierarchy order.
    pub fn effective_dependencies(&self, name: &str) -> Option<Vec<&DependencyDescriptor>> {
        Some(
            self.hierarchy(name)?
                .into_iter()
                .flat_map(|c| c.dependencies())
                .collect(),
        )
    }
}
