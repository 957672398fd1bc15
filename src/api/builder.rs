use std::sync::Arc;

use crate::{
    builder::{ComponentMetadataBuilder, ConfigurationMetadataBuilder},
    descriptor::DependencyDescriptorFactory,
    exclude::ExcludeRuleConverter,
    guard::ThresholdPolicy,
    model::ModuleIdentifierInterner,
    version::{QualifierPolicy, VersionComparator},
    DependencyManagementServices,
};

#[derive(Default)]
pub struct DependencyManagementServicesBuilder {
    interner: Option<Arc<ModuleIdentifierInterner>>,
    qualifier_policy: Option<QualifierPolicy>,
    escalation_policy: Option<ThresholdPolicy>,
}

impl DependencyManagementServicesBuilder {
    /// Interner to share with other sessions.
    ///
    /// Defaults to a fresh, empty interner.
    pub fn interner(mut self, interner: Arc<ModuleIdentifierInterner>) -> Self {
        self.interner = Some(interner);
        self
    }

    /// Precedence of version qualifiers.
    ///
    /// Defaults to `dev < alpha < beta < milestone < rc < snapshot`.
    pub fn qualifier_policy(mut self, policy: QualifierPolicy) -> Self {
        self.qualifier_policy = Some(policy);
        self
    }

    /// Thresholds at which producer guards move to a sharded table.
    pub fn escalation_policy(mut self, policy: ThresholdPolicy) -> Self {
        self.escalation_policy = Some(policy);
        self
    }

    pub fn build(self) -> DependencyManagementServices {
        let Self {
            interner,
            qualifier_policy,
            escalation_policy,
        } = self;
        let interner = interner.unwrap_or_default();
        let comparator = Arc::new(
            qualifier_policy
                .map(VersionComparator::with_policy)
                .unwrap_or_default(),
        );
        let exclude_converter = ExcludeRuleConverter::new();
        let descriptor_factory = Arc::new(DependencyDescriptorFactory::new(
            exclude_converter,
            interner.clone(),
        ));
        let configuration_builder = Arc::new(ConfigurationMetadataBuilder::new(
            descriptor_factory.clone(),
            exclude_converter,
        ));
        let component_builder = Arc::new(ComponentMetadataBuilder::new(
            configuration_builder.clone(),
        ));

        DependencyManagementServices {
            interner,
            comparator,
            exclude_converter,
            descriptor_factory,
            configuration_builder,
            component_builder,
            escalation: escalation_policy.unwrap_or_default(),
        }
    }
}
