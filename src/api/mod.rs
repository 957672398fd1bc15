use std::{hash::Hash, sync::Arc};

use crate::{
    builder::{ComponentMetadataBuilder, ConfigurationMetadataBuilder},
    config::DepmetaConfig,
    declaration::ComponentDeclaration,
    descriptor::DependencyDescriptorFactory,
    exclude::ExcludeRuleConverter,
    guard::{ProducerGuard, ThresholdPolicy},
    model::{ComponentMetadata, MetadataError, ModuleIdentifierInterner},
    version::VersionComparator,
};

mod builder;

pub use builder::DependencyManagementServicesBuilder;

/// Shared services of one dependency-management session.
///
/// Every service is created once and shared by reference, so identifiers
/// interned through one builder compare cheaply with those of another.
pub struct DependencyManagementServices {
    interner: Arc<ModuleIdentifierInterner>,
    comparator: Arc<VersionComparator>,
    exclude_converter: ExcludeRuleConverter,
    descriptor_factory: Arc<DependencyDescriptorFactory>,
    configuration_builder: Arc<ConfigurationMetadataBuilder>,
    component_builder: Arc<ComponentMetadataBuilder>,
    escalation: ThresholdPolicy,
}

impl DependencyManagementServices {
    pub fn builder() -> DependencyManagementServicesBuilder {
        DependencyManagementServicesBuilder::default()
    }

    pub fn from_config(config: &DepmetaConfig) -> Self {
        Self::builder()
            .qualifier_policy(config.qualifier_policy())
            .escalation_policy(config.threshold_policy())
            .build()
    }

    pub fn interner(&self) -> &Arc<ModuleIdentifierInterner> {
        &self.interner
    }

    pub fn comparator(&self) -> &Arc<VersionComparator> {
        &self.comparator
    }

    pub fn exclude_converter(&self) -> ExcludeRuleConverter {
        self.exclude_converter
    }

    pub fn descriptor_factory(&self) -> &Arc<DependencyDescriptorFactory> {
        &self.descriptor_factory
    }

    pub fn configuration_builder(&self) -> &Arc<ConfigurationMetadataBuilder> {
        &self.configuration_builder
    }

    pub fn component_builder(&self) -> &Arc<ComponentMetadataBuilder> {
        &self.component_builder
    }

    /// A new adaptive guard using the session's escalation thresholds.
    pub fn producer_guard<K, V, E>(&self) -> ProducerGuard<K, V, E>
    where
        K: Eq + Hash + Clone + Send + Sync + 'static,
        V: Clone + Send + 'static,
        E: Send + Sync + 'static,
    {
        ProducerGuard::adaptive_with(self.escalation)
    }

    /// Builds the metadata of a declared component.
    pub fn component_metadata(
        &self,
        declaration: &ComponentDeclaration,
    ) -> Result<ComponentMetadata, MetadataError> {
        self.component_builder.build_declared(
            declaration.component_id(&self.interner),
            &declaration.configurations,
        )
    }
}
