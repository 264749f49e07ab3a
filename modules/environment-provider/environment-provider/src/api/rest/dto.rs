//! REST DTOs for the environment provider.
//!
//! The environment shape matches what Spring Cloud Config clients expect
//! from `GET /{application}/{profile}/{label}`.

use std::collections::BTreeMap;

use environment_provider_sdk::{EnvironmentDocument, InstanceSummary, PropertySource};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentDto {
    pub name: String,
    pub profiles: Vec<String>,
    pub label: Option<String>,
    pub version: Option<String>,
    pub state: Option<String>,
    pub property_sources: Vec<PropertySourceDto>,
}

impl From<EnvironmentDocument> for EnvironmentDto {
    fn from(doc: EnvironmentDocument) -> Self {
        Self {
            name: doc.name,
            profiles: doc.profiles,
            label: doc.label,
            version: None,
            state: None,
            property_sources: doc
                .property_sources
                .into_iter()
                .map(PropertySourceDto::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySourceDto {
    pub name: String,
    pub source: BTreeMap<String, String>,
}

impl From<PropertySource> for PropertySourceDto {
    fn from(source: PropertySource) -> Self {
        Self {
            name: source.name,
            source: source.source,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceDto {
    pub kind: String,
    pub name: String,
    pub version: String,
}

impl From<InstanceSummary> for InstanceDto {
    fn from(summary: InstanceSummary) -> Self {
        Self {
            kind: summary.kind.as_str().to_owned(),
            name: summary.name,
            version: summary.version,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
}
