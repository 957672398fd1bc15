mod component;
mod configuration;

pub use component::ComponentMetadataBuilder;
pub use configuration::{ConfigurationHierarchy, ConfigurationMetadataBuilder};
