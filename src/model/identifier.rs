use std::{
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
    sync::Arc,
};

use dashmap::DashMap;
use log::trace;

use crate::version::Version;

#[derive(Eq, PartialEq, Hash)]
struct ModuleKey {
    group: String,
    name: String,
}

/// A `(group, name)` pair identifying a module.
///
/// Identifiers handed out by the same [`ModuleIdentifierInterner`] share one
/// allocation, so equality between them is a pointer comparison.
#[derive(Clone)]
pub struct ModuleIdentifier(Arc<ModuleKey>);

impl ModuleIdentifier {
    pub fn group(&self) -> &str {
        &self.0.group
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// True when both identifiers point at the same interned instance.
    pub fn same_instance(&self, other: &ModuleIdentifier) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ModuleIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other) || *self.0 == *other.0
    }
}

impl Eq for ModuleIdentifier {}

impl Hash for ModuleIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl PartialOrd for ModuleIdentifier {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ModuleIdentifier {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.group(), self.name()).cmp(&(other.group(), other.name()))
    }
}

impl Display for ModuleIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.group(), self.name())
    }
}

impl Debug for ModuleIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ModuleIdentifier({})", self)
    }
}

/// Canonicalizes module identifiers. Entries are never evicted.
#[derive(Default)]
pub struct ModuleIdentifierInterner {
    table: DashMap<ModuleKey, ModuleIdentifier>,
}

impl ModuleIdentifierInterner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&self, group: &str, name: &str) -> ModuleIdentifier {
        let key = ModuleKey {
            group: group.to_owned(),
            name: name.to_owned(),
        };
        if let Some(existing) = self.table.get(&key) {
            return existing.value().clone();
        }
        self.table
            .entry(key)
            .or_insert_with(|| {
                trace!("Interning module {}:{}", group, name);
                ModuleIdentifier(Arc::new(ModuleKey {
                    group: group.to_owned(),
                    name: name.to_owned(),
                }))
            })
            .value()
            .clone()
    }

    /// Parses `group:name`. A string without a colon is taken as a name with
    /// an empty group.
    pub fn parse(&self, notation: &str) -> ModuleIdentifier {
        match notation.split_once(':') {
            Some((group, name)) => self.intern(group, name),
            None => self.intern("", notation),
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// A module at a specific version.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ComponentIdentifier {
    pub module: ModuleIdentifier,
    pub version: Version,
}

impl ComponentIdentifier {
    pub fn new(module: ModuleIdentifier, version: impl Into<Version>) -> Self {
        ComponentIdentifier {
            module,
            version: version.into(),
        }
    }
}

impl Display for ComponentIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.module, self.version)
    }
}
