use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::{guard::ThresholdPolicy, version::QualifierPolicy};

const CONFIG_DIRECTORY: &str = ".depmeta";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepmetaConfig {
    pub guard_max_keys: Option<usize>,
    pub guard_max_contention: Option<usize>,
    pub version_qualifiers: Option<Vec<String>>,
}

impl DepmetaConfig {
    /// Loads `$HOME/.depmeta/config.toml`, if present, overridden by
    /// `DEPMETA_*` environment variables.
    pub fn load() -> anyhow::Result<Self> {
        let file = home::home_dir().map(|home| home.join(CONFIG_DIRECTORY).join(CONFIG_FILE));
        Ok(RawConfig::load(file.as_deref(), None)?.into())
    }

    pub fn threshold_policy(&self) -> ThresholdPolicy {
        ThresholdPolicy::new(
            self.guard_max_keys
                .unwrap_or(ThresholdPolicy::DEFAULT_MAX_KEYS),
            self.guard_max_contention
                .unwrap_or(ThresholdPolicy::DEFAULT_MAX_CONTENTION),
        )
    }

    pub fn qualifier_policy(&self) -> QualifierPolicy {
        match &self.version_qualifiers {
            Some(groups) if !groups.is_empty() => QualifierPolicy::from_notation(groups),
            _ => QualifierPolicy::default(),
        }
    }
}

impl From<RawConfig> for DepmetaConfig {
    fn from(raw: RawConfig) -> Self {
        DepmetaConfig {
            guard_max_keys: raw.guard.keys,
            guard_max_contention: raw.guard.contention,
            version_qualifiers: raw.version.qualifiers,
        }
    }
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct RawConfig {
    #[serde(default)]
    guard: GuardConfig,
    #[serde(default)]
    version: VersionConfig,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct GuardConfig {
    keys: Option<usize>,
    contention: Option<usize>,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct VersionConfig {
    qualifiers: Option<Vec<String>>,
}

impl RawConfig {
    fn load(
        file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(File::from(PathBuf::from(file)).required(false));
        }
        builder
            .add_source(
                Environment::with_prefix("DEPMETA")
                    .separator("_")
                    .list_separator(",")
                    .with_list_parse_key("version.qualifiers")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()
    }
}
