use std::{collections::HashMap, sync::Arc};

use log::{debug, info};

use crate::model::{
    ComponentIdentifier, ComponentMetadata, ConfigurationMetadata, DeclaredConfiguration,
    MetadataError,
};

use super::configuration::{ConfigurationHierarchy, ConfigurationMetadataBuilder};

/// Aggregates configuration metadata into a [`ComponentMetadata`] snapshot.
pub struct ComponentMetadataBuilder {
    configuration_builder: Arc<ConfigurationMetadataBuilder>,
}

impl ComponentMetadataBuilder {
    pub fn new(configuration_builder: Arc<ConfigurationMetadataBuilder>) -> Self {
        ComponentMetadataBuilder {
            configuration_builder,
        }
    }

    /// Checks the declared set as a whole, then builds every configuration
    /// and aggregates them.
    pub fn build_declared(
        &self,
        id: ComponentIdentifier,
        declarations: &[DeclaredConfiguration],
    ) -> Result<ComponentMetadata, MetadataError> {
        check_unique(declarations.iter().map(|declared| declared.name.as_str()))?;
        check_hierarchy(&ConfigurationHierarchy::from_declarations(declarations))?;
        let configurations = declarations
            .iter()
            .map(|declared| self.configuration_builder.assemble(declared))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(aggregate(id, configurations))
    }

    /// Names must be unique and every `extends_from` entry must name a
    /// configuration of the set. Unknown parents are reported before cycles.
    pub fn build(
        &self,
        id: ComponentIdentifier,
        configurations: Vec<ConfigurationMetadata>,
    ) -> Result<ComponentMetadata, MetadataError> {
        check_unique(configurations.iter().map(ConfigurationMetadata::name))?;
        check_hierarchy(&ConfigurationHierarchy::from_metadata(&configurations))?;
        Ok(aggregate(id, configurations))
    }
}

fn check_hierarchy(hierarchy: &ConfigurationHierarchy) -> Result<(), MetadataError> {
    hierarchy.check_known()?;
    hierarchy.check_acyclic()
}

fn aggregate(
    id: ComponentIdentifier,
    configurations: Vec<ConfigurationMetadata>,
) -> ComponentMetadata {
    let index: HashMap<String, usize> = configurations
        .iter()
        .enumerate()
        .map(|(i, configuration)| (configuration.name().to_string(), i))
        .collect();
    let parents: Vec<Vec<usize>> = configurations
        .iter()
        .map(|configuration| {
            configuration
                .extends_from()
                .iter()
                .filter_map(|extended| index.get(extended).copied())
                .collect()
        })
        .collect();

    debug!(
        "Configurations of {}: {:?}",
        id,
        configurations
            .iter()
            .map(ConfigurationMetadata::name)
            .collect::<Vec<_>>()
    );
    info!(
        "Built metadata for {} with {} configurations",
        id,
        configurations.len()
    );

    ComponentMetadata::new(id, configurations, index, parents)
}

fn check_unique<'a>(names: impl Iterator<Item = &'a str>) -> Result<(), MetadataError> {
    let mut seen = std::collections::HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(MetadataError::DuplicateConfiguration(name.to_string()));
        }
    }
    Ok(())
}
