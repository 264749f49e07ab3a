//! Model types for the environment provider.

use std::collections::BTreeMap;
use std::fmt;

/// Flat configuration properties exported by one service instance.
pub type PropertyMap = BTreeMap<String, String>;

/// Kinds of backing services the provider knows how to start.
///
/// The set is closed: supporting a new service means adding a variant here
/// and a provisioner for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceKind {
    RelationalDatabase,
    MessageBroker,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 2] = [ServiceKind::RelationalDatabase, ServiceKind::MessageBroker];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceKind::RelationalDatabase => "relational-database",
            ServiceKind::MessageBroker => "message-broker",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named group of properties, produced for a single label token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySource {
    /// The raw token this group was produced for.
    pub name: String,
    pub source: PropertyMap,
}

impl PropertySource {
    #[must_use]
    pub fn new(name: impl Into<String>, source: PropertyMap) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.source.get(key).map(String::as_str)
    }
}

/// Layered configuration document returned for one request.
///
/// Property sources keep the order in which tokens appeared in the label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentDocument {
    pub name: String,
    pub profiles: Vec<String>,
    pub label: Option<String>,
    pub property_sources: Vec<PropertySource>,
}

impl EnvironmentDocument {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            profiles: Vec::new(),
            label: None,
            property_sources: Vec::new(),
        }
    }

    pub fn push(&mut self, source: PropertySource) {
        self.property_sources.push(source);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.property_sources.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.property_sources.len()
    }

    /// Look up a key across all property sources; later sources shadow
    /// earlier ones.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<&str> {
        self.property_sources
            .iter()
            .rev()
            .find_map(|source| source.get(key))
    }
}

/// Read-only view of a running service instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceSummary {
    pub kind: ServiceKind,
    pub name: String,
    pub version: String,
}
