use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::identifier::ModuleIdentifier;

pub const WILDCARD: &str = "*";

/// An exclusion as written in a declaration. Absent, empty and `*` fields
/// all match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExcludePattern {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "module")]
    pub module_name: Option<String>,
}

impl ExcludePattern {
    pub fn new(group: Option<&str>, module_name: Option<&str>) -> Self {
        ExcludePattern {
            group: group.map(str::to_string),
            module_name: module_name.map(str::to_string),
        }
    }

    pub fn for_group(group: &str) -> Self {
        Self::new(Some(group), None)
    }

    pub fn for_module(group: &str, module_name: &str) -> Self {
        Self::new(Some(group), Some(module_name))
    }
}

/// Canonical exclusion. `None` is a wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExcludeRule {
    pub group: Option<String>,
    pub module_name: Option<String>,
}

impl ExcludeRule {
    pub fn matches(&self, module: &ModuleIdentifier) -> bool {
        self.group.as_deref().map_or(true, |group| group == module.group())
            && self
                .module_name
                .as_deref()
                .map_or(true, |name| name == module.name())
    }

    pub fn matches_everything(&self) -> bool {
        self.group.is_none() && self.module_name.is_none()
    }
}

impl Display for ExcludeRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}",
            self.group.as_deref().unwrap_or(WILDCARD),
            self.module_name.as_deref().unwrap_or(WILDCARD)
        )
    }
}
