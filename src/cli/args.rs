use std::path::PathBuf;

use clap::Parser;

/// Inspect component metadata and version ordering.
#[derive(Debug, Parser)]
#[clap(version)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub cmd: Command,
    /// Qualifier precedence, lowest first, e.g. `alpha/a,beta/b,rc`.
    /// Overrides `version.qualifiers` of the configuration file.
    #[clap(short, long, value_delimiter = ',')]
    pub qualifiers: Vec<String>,
}

#[derive(Debug, Parser)]
pub enum Command {
    /// Builds the metadata of a component declaration and prints it
    Inspect {
        /// Path to the component declaration toml file
        file: PathBuf,
        /// Only print this configuration, with its inherited excludes and dependencies
        #[clap(short, long)]
        configuration: Option<String>,
    },
    /// Compares two versions
    Compare { left: String, right: String },
    /// Sorts versions in ascending order
    Sort {
        #[clap(required = true)]
        versions: Vec<String>,
    },
}
