use thiserror::Error;

pub mod artifact;
pub mod component;
pub mod configuration;
pub mod declared;
pub mod dependency;
pub mod exclude;
pub mod identifier;

pub use artifact::ArtifactCoordinate;
pub use component::ComponentMetadata;
pub use configuration::ConfigurationMetadata;
pub use declared::{DeclaredConfiguration, DeclaredDependency, DeclaredTarget};
pub use dependency::{DependencyDescriptor, TargetSelector};
pub use exclude::{ExcludePattern, ExcludeRule};
pub use identifier::{ComponentIdentifier, ModuleIdentifier, ModuleIdentifierInterner};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("Invalid dependency declared in configuration `{configuration}`: {reason}")]
    InvalidDependencySpec {
        configuration: String,
        reason: String,
    },
    #[error("Configuration `{configuration}` inherits from itself: {}", .cycle.join(" -> "))]
    CyclicConfigurationInheritance {
        configuration: String,
        cycle: Vec<String>,
    },
    #[error("Configuration `{0}` is declared more than once")]
    DuplicateConfiguration(String),
    #[error("Configuration `{configuration}` extends unknown configuration `{extended}`")]
    UnknownExtendedConfiguration {
        configuration: String,
        extended: String,
    },
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error reading declaration toml: {0}")]
    IO(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Missing TOML key `{0}` while parsing")]
    MissingKey(String),
    #[error("Dependency in configuration `{0}` must set exactly one of `module` or `project`")]
    AmbiguousTarget(String),
}
