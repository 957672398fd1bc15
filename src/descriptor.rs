use std::{collections::BTreeSet, sync::Arc};

use log::trace;

use crate::{
    exclude::ExcludeRuleConverter,
    model::{
        ArtifactCoordinate, DeclaredDependency, DeclaredTarget, DependencyDescriptor,
        ExcludePattern, MetadataError, ModuleIdentifier, ModuleIdentifierInterner, TargetSelector,
    },
    version::VersionConstraint,
};

/// Builds [`DependencyDescriptor`]s for external modules and for projects of
/// the same build.
pub struct DependencyDescriptorFactory {
    exclude_converter: ExcludeRuleConverter,
    interner: Arc<ModuleIdentifierInterner>,
}

impl DependencyDescriptorFactory {
    pub fn new(
        exclude_converter: ExcludeRuleConverter,
        interner: Arc<ModuleIdentifierInterner>,
    ) -> Self {
        DependencyDescriptorFactory {
            exclude_converter,
            interner,
        }
    }

    /// Dispatches a raw declaration to the matching variant.
    pub fn create(
        &self,
        from_configuration: &str,
        dependency: &DeclaredDependency,
    ) -> Result<DependencyDescriptor, MetadataError> {
        match &dependency.target {
            DeclaredTarget::Module {
                group,
                name,
                version,
            } => {
                let module = name
                    .as_deref()
                    .map(|name| self.interner.intern(group.as_deref().unwrap_or(""), name));
                self.for_external_module(
                    from_configuration,
                    module,
                    VersionConstraint::parse(version),
                    &dependency.excludes,
                    &dependency.artifacts,
                    dependency.transitive,
                    dependency.forced,
                )
            }
            DeclaredTarget::Project {
                path,
                configuration,
            } => self.for_project(
                from_configuration,
                path.as_deref(),
                configuration.as_deref(),
                &dependency.excludes,
                &dependency.artifacts,
                dependency.transitive,
                dependency.forced,
            ),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn for_external_module(
        &self,
        from_configuration: &str,
        module: Option<ModuleIdentifier>,
        constraint: VersionConstraint,
        excludes: &[ExcludePattern],
        artifacts: &[ArtifactCoordinate],
        transitive: bool,
        forced: bool,
    ) -> Result<DependencyDescriptor, MetadataError> {
        check_configuration(from_configuration)?;
        let id = module.ok_or_else(|| MetadataError::InvalidDependencySpec {
            configuration: from_configuration.to_string(),
            reason: "module dependency without a module name".to_string(),
        })?;
        trace!(
            "Creating descriptor for {}:{} in configuration {}",
            id,
            constraint,
            from_configuration
        );
        Ok(self.descriptor(
            from_configuration,
            TargetSelector::Module { id, constraint },
            excludes,
            artifacts,
            transitive,
            forced,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn for_project(
        &self,
        from_configuration: &str,
        project_path: Option<&str>,
        target_configuration: Option<&str>,
        excludes: &[ExcludePattern],
        artifacts: &[ArtifactCoordinate],
        transitive: bool,
        forced: bool,
    ) -> Result<DependencyDescriptor, MetadataError> {
        check_configuration(from_configuration)?;
        let path = project_path
            .filter(|path| !path.is_empty())
            .ok_or_else(|| MetadataError::InvalidDependencySpec {
                configuration: from_configuration.to_string(),
                reason: "project dependency without a project path".to_string(),
            })?;
        trace!(
            "Creating descriptor for project {} in configuration {}",
            path,
            from_configuration
        );
        Ok(self.descriptor(
            from_configuration,
            TargetSelector::Project {
                path: path.to_string(),
                configuration: target_configuration.map(str::to_string),
            },
            excludes,
            artifacts,
            transitive,
            forced,
        ))
    }

    fn descriptor(
        &self,
        from_configuration: &str,
        target: TargetSelector,
        excludes: &[ExcludePattern],
        artifacts: &[ArtifactCoordinate],
        transitive: bool,
        forced: bool,
    ) -> DependencyDescriptor {
        DependencyDescriptor {
            from_configuration: from_configuration.to_string(),
            target,
            exclude_rules: self.exclude_converter.convert_all(excludes),
            requested_artifacts: artifacts.iter().cloned().collect::<BTreeSet<_>>(),
            transitive,
            forced,
        }
    }
}

fn check_configuration(from_configuration: &str) -> Result<(), MetadataError> {
    if from_configuration.is_empty() {
        return Err(MetadataError::InvalidDependencySpec {
            configuration: String::new(),
            reason: "dependency is not attached to a configuration".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::ExcludeRule;
    use pretty_assertions::assert_eq;

    fn factory() -> DependencyDescriptorFactory {
        DependencyDescriptorFactory::new(
            ExcludeRuleConverter::new(),
            Arc::new(ModuleIdentifierInterner::new()),
        )
    }

    #[test]
    fn external_module_descriptor() {
        let factory = factory();
        let declared = DeclaredDependency::module("org.slf4j", "slf4j-api", "2.0.+")
            .exclude(ExcludePattern::for_group("ch.qos.logback"))
            .exclude(ExcludePattern::new(Some("ch.qos.logback"), Some("*")))
            .artifact(ArtifactCoordinate::new("slf4j-api", "jar").with_classifier("sources"))
            .forced(true);

        let descriptor = factory.create("implementation", &declared).unwrap();

        assert_eq!(descriptor.from_configuration, "implementation");
        assert_eq!(
            descriptor.target,
            TargetSelector::Module {
                id: factory.interner.intern("org.slf4j", "slf4j-api"),
                constraint: VersionConstraint::Prefix("2.0.".to_string()),
            }
        );
        assert_eq!(
            descriptor.exclude_rules,
            vec![ExcludeRule {
                group: Some("ch.qos.logback".to_string()),
                module_name: None,
            }]
        );
        assert_eq!(descriptor.requested_artifacts.len(), 1);
        assert!(descriptor.transitive);
        assert!(descriptor.forced);
        let interned = factory.interner.intern("org.slf4j", "slf4j-api");
        assert!(descriptor
            .module()
            .is_some_and(|id| id.same_instance(&interned)));
    }

    #[test]
    fn project_descriptor() {
        let declared = DeclaredDependency::new(DeclaredTarget::Project {
            path: Some(":core".to_string()),
            configuration: Some("apiElements".to_string()),
        })
        .transitive(false);

        let descriptor = factory().create("api", &declared).unwrap();

        assert!(descriptor.is_project());
        assert_eq!(descriptor.module(), None);
        assert_eq!(descriptor.target.to_string(), "project :core (apiElements)");
        assert!(!descriptor.transitive);
    }

    #[test]
    fn empty_configuration_is_rejected() {
        let result = factory().create("", &DeclaredDependency::module("g", "n", "1.0"));
        assert!(matches!(
            result,
            Err(MetadataError::InvalidDependencySpec { .. })
        ));
    }

    #[test]
    fn missing_module_or_path_is_rejected() {
        let factory = factory();
        let no_name = DeclaredDependency::new(DeclaredTarget::Module {
            group: Some("g".to_string()),
            name: None,
            version: "1.0".to_string(),
        });
        let no_path = DeclaredDependency::new(DeclaredTarget::Project {
            path: None,
            configuration: None,
        });

        for declared in [no_name, no_path] {
            match factory.create("runtime", &declared) {
                Err(MetadataError::InvalidDependencySpec { configuration, .. }) => {
                    assert_eq!(configuration, "runtime")
                }
                other => panic!("unexpected result {:?}", other),
            }
        }
    }

    #[test]
    fn module_without_group_has_empty_group() {
        let declared = DeclaredDependency::new(DeclaredTarget::Module {
            group: None,
            name: Some("local".to_string()),
            version: "1".to_string(),
        });
        let descriptor = factory().create("compile", &declared).unwrap();
        assert_eq!(descriptor.module().map(|id| id.group()), Some(""));
    }
}
