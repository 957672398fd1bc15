use std::{
    collections::{BTreeSet, HashMap, HashSet},
    sync::Arc,
};

use log::debug;

use crate::{
    descriptor::DependencyDescriptorFactory,
    exclude::ExcludeRuleConverter,
    model::{ConfigurationMetadata, DeclaredConfiguration, MetadataError},
};

/// The `extends_from` edges of a whole configuration set, by name.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationHierarchy {
    names: Vec<String>,
    edges: HashMap<String, Vec<String>>,
}

impl ConfigurationHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_declarations(declarations: &[DeclaredConfiguration]) -> Self {
        let mut hierarchy = Self::new();
        for declared in declarations {
            hierarchy.insert(&declared.name, declared.extends_from.iter().cloned());
        }
        hierarchy
    }

    pub fn from_metadata(configurations: &[ConfigurationMetadata]) -> Self {
        let mut hierarchy = Self::new();
        for configuration in configurations {
            hierarchy.insert(
                configuration.name(),
                configuration.extends_from().iter().cloned(),
            );
        }
        hierarchy
    }

    pub fn insert(&mut self, name: &str, extends_from: impl IntoIterator<Item = String>) {
        let previous = self
            .edges
            .insert(name.to_string(), extends_from.into_iter().collect());
        if previous.is_none() {
            self.names.push(name.to_string());
        }
    }

    /// Looks for an inheritance cycle reachable from `name`, taking its
    /// parents from `extends_from`. Unknown names are treated as leaves.
    /// Returns the cycle as a path whose first and last entries are equal.
    pub fn find_cycle(&self, name: &str, extends_from: &[String]) -> Option<Vec<String>> {
        CycleSearch::new(self, Some((name, extends_from))).search_from(name)
    }

    /// Fails on the first parent, in insertion order, that names no
    /// configuration of this hierarchy.
    pub fn check_known(&self) -> Result<(), MetadataError> {
        for name in &self.names {
            let parents = self.edges.get(name).map(Vec::as_slice).unwrap_or_default();
            if let Some(extended) = parents
                .iter()
                .find(|parent| !self.edges.contains_key(parent.as_str()))
            {
                return Err(MetadataError::UnknownExtendedConfiguration {
                    configuration: name.clone(),
                    extended: extended.clone(),
                });
            }
        }
        Ok(())
    }

    /// Checks the whole set in one pass; every configuration is visited once.
    pub fn check_acyclic(&self) -> Result<(), MetadataError> {
        let mut search = CycleSearch::new(self, None);
        for name in &self.names {
            if let Some(cycle) = search.search_from(name) {
                return Err(MetadataError::CyclicConfigurationInheritance {
                    configuration: name.clone(),
                    cycle,
                });
            }
        }
        Ok(())
    }
}

/// Iterative depth-first search. Names on the current path are indexed by
/// their position, finished names are shared across roots.
struct CycleSearch<'a> {
    hierarchy: &'a ConfigurationHierarchy,
    start: Option<(&'a str, &'a [String])>,
    done: HashSet<&'a str>,
}

impl<'a> CycleSearch<'a> {
    fn new(
        hierarchy: &'a ConfigurationHierarchy,
        start: Option<(&'a str, &'a [String])>,
    ) -> Self {
        CycleSearch {
            hierarchy,
            start,
            done: HashSet::new(),
        }
    }

    fn parents(&self, name: &str) -> &'a [String] {
        match self.start {
            Some((start, parents)) if start == name => parents,
            _ => self
                .hierarchy
                .edges
                .get(name)
                .map(Vec::as_slice)
                .unwrap_or_default(),
        }
    }

    fn search_from(&mut self, root: &'a str) -> Option<Vec<String>> {
        if self.done.contains(root) {
            return None;
        }
        let mut path: Vec<(&'a str, usize)> = vec![(root, 0)];
        let mut on_path: HashMap<&'a str, usize> = HashMap::from([(root, 0)]);

        while let Some(&(name, next)) = path.last() {
            let top = path.len() - 1;
            match self.parents(name).get(next) {
                Some(parent) => {
                    path[top].1 += 1;
                    let parent = parent.as_str();
                    if let Some(&position) = on_path.get(parent) {
                        let mut cycle: Vec<String> = path[position..]
                            .iter()
                            .map(|(entry, _)| entry.to_string())
                            .collect();
                        cycle.push(parent.to_string());
                        return Some(cycle);
                    }
                    if !self.done.contains(parent) {
                        on_path.insert(parent, path.len());
                        path.push((parent, 0));
                    }
                }
                None => {
                    path.pop();
                    on_path.remove(name);
                    self.done.insert(name);
                }
            }
        }
        None
    }
}

/// Assembles the metadata of a single configuration.
pub struct ConfigurationMetadataBuilder {
    descriptor_factory: Arc<DependencyDescriptorFactory>,
    exclude_converter: ExcludeRuleConverter,
}

impl ConfigurationMetadataBuilder {
    pub fn new(
        descriptor_factory: Arc<DependencyDescriptorFactory>,
        exclude_converter: ExcludeRuleConverter,
    ) -> Self {
        ConfigurationMetadataBuilder {
            descriptor_factory,
            exclude_converter,
        }
    }

    /// Builds the configuration after checking that its inheritance, within
    /// `hierarchy`, is acyclic. Dependency order is preserved as declared.
    pub fn build(
        &self,
        declared: &DeclaredConfiguration,
        hierarchy: &ConfigurationHierarchy,
    ) -> Result<ConfigurationMetadata, MetadataError> {
        if let Some(cycle) = hierarchy.find_cycle(&declared.name, &declared.extends_from) {
            return Err(MetadataError::CyclicConfigurationInheritance {
                configuration: declared.name.clone(),
                cycle,
            });
        }
        self.assemble(declared)
    }

    /// Builds a configuration whose inheritance was already checked as part
    /// of its whole set.
    pub(crate) fn assemble(
        &self,
        declared: &DeclaredConfiguration,
    ) -> Result<ConfigurationMetadata, MetadataError> {
        let mut extends_from: Vec<String> = Vec::with_capacity(declared.extends_from.len());
        for parent in &declared.extends_from {
            if !extends_from.contains(parent) {
                extends_from.push(parent.clone());
            }
        }

        let exclude_rules = self.exclude_converter.convert_all(&declared.excludes);

        let dependencies = declared
            .dependencies
            .iter()
            .map(|dependency| self.descriptor_factory.create(&declared.name, dependency))
            .collect::<Result<Vec<_>, _>>()?;

        let artifacts = declared.artifacts.iter().cloned().collect::<BTreeSet<_>>();

        debug!(
            "Built configuration {} ({} dependencies, {} artifacts, {} excludes)",
            declared.name,
            dependencies.len(),
            artifacts.len(),
            exclude_rules.len()
        );

        Ok(ConfigurationMetadata::new(
            declared.name.clone(),
            extends_from,
            dependencies,
            artifacts,
            exclude_rules,
        ))
    }
}
