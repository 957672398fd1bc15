pub mod builder;
pub mod cli;
pub mod config;
pub mod declaration;
pub mod descriptor;
pub mod exclude;
pub mod guard;
pub mod model;
pub mod version;

mod api;

pub use api::{DependencyManagementServices, DependencyManagementServicesBuilder};
pub use config::DepmetaConfig;
