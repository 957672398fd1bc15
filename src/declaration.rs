//! Component declarations written in TOML.
//!
//! ```toml
//! group = "org.example"
//! name = "app"
//! version = "1.0.0"
//!
//! [configurations.api]
//! excludes = [{ group = "commons-logging" }]
//! dependencies = [{ module = "org.slf4j:slf4j-api", version = "2.0.+" }]
//!
//! [configurations.implementation]
//! extends_from = ["api"]
//! dependencies = [{ project = ":core", configuration = "apiElements" }]
//! ```
//!
//! Configurations keep the order in which they appear in the file.

use std::path::Path;

use log::{debug, error};
use serde::Deserialize;
use toml::{Table, Value};

use crate::model::{
    ArtifactCoordinate, ComponentIdentifier, DeclaredConfiguration, DeclaredDependency,
    DeclaredTarget, ExcludePattern, ModuleIdentifierInterner, ParseError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDeclaration {
    pub group: String,
    pub name: String,
    pub version: String,
    pub configurations: Vec<DeclaredConfiguration>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfiguration {
    #[serde(default)]
    extends_from: Vec<String>,
    #[serde(default)]
    dependencies: Vec<RawDependency>,
    #[serde(default)]
    artifacts: Vec<ArtifactCoordinate>,
    #[serde(default)]
    excludes: Vec<ExcludePattern>,
}

fn default_transitive() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDependency {
    module: Option<String>,
    version: Option<String>,
    project: Option<String>,
    configuration: Option<String>,
    #[serde(default = "default_transitive")]
    transitive: bool,
    #[serde(default)]
    force: bool,
    #[serde(default)]
    excludes: Vec<ExcludePattern>,
    #[serde(default)]
    artifacts: Vec<ArtifactCoordinate>,
}

impl RawDependency {
    fn into_declared(self, configuration: &str) -> Result<DeclaredDependency, ParseError> {
        let target = match (self.module, self.project) {
            (Some(module), None) => {
                let (group, name) = match module.split_once(':') {
                    Some((group, name)) => (Some(group.to_string()), name.to_string()),
                    None => (None, module),
                };
                DeclaredTarget::Module {
                    group,
                    name: Some(name).filter(|name| !name.is_empty()),
                    version: self
                        .version
                        .ok_or_else(|| ParseError::MissingKey("version".to_string()))?,
                }
            }
            (None, Some(project)) => DeclaredTarget::Project {
                path: Some(project),
                configuration: self.configuration,
            },
            _ => return Err(ParseError::AmbiguousTarget(configuration.to_string())),
        };
        Ok(DeclaredDependency {
            target,
            excludes: self.excludes,
            artifacts: self.artifacts,
            transitive: self.transitive,
            forced: self.force,
        })
    }
}

impl ComponentDeclaration {
    pub fn from_file(path: &Path) -> Result<ComponentDeclaration, ParseError> {
        debug!(
            "Attempting to read component declaration from {}",
            path.display()
        );
        let contents = std::fs::read_to_string(path)?;

        let declaration = ComponentDeclaration::from_toml_str(&contents);
        if let Err(err) = &declaration {
            error!("Could not read a valid component declaration due to err {err}")
        }
        declaration
    }

    pub fn from_toml_str(data: &str) -> Result<ComponentDeclaration, ParseError> {
        let mut toml_value = toml::from_str::<Table>(data)?;

        let mut required = |key: &str| {
            toml_value
                .remove(key)
                .ok_or_else(|| ParseError::MissingKey(key.to_string()))
                .and_then(|v| v.try_into::<String>().map_err(ParseError::from))
        };
        let group = required("group")?;
        let name = required("name")?;
        let version = required("version")?;

        let configurations = match toml_value.remove("configurations") {
            Some(value) => value
                .try_into::<Table>()?
                .into_iter()
                .map(|(name, value)| parse_configuration(name, value))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(ComponentDeclaration {
            group,
            name,
            version,
            configurations,
        })
    }

    pub fn component_id(&self, interner: &ModuleIdentifierInterner) -> ComponentIdentifier {
        ComponentIdentifier::new(
            interner.intern(&self.group, &self.name),
            self.version.as_str(),
        )
    }
}

fn parse_configuration(name: String, value: Value) -> Result<DeclaredConfiguration, ParseError> {
    let raw = value.try_into::<RawConfiguration>()?;
    let dependencies = raw
        .dependencies
        .into_iter()
        .map(|dependency| dependency.into_declared(&name))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(DeclaredConfiguration {
        name,
        extends_from: raw.extends_from,
        dependencies,
        artifacts: raw.artifacts,
        excludes: raw.excludes,
    })
}
