//! Environment provider SDK
//!
//! This crate provides the public API for the environment-provider module:
//! - `EnvironmentProviderClient` trait for callers that need a layered configuration
//! - Model types (`EnvironmentDocument`, `PropertySource`, `ServiceKind`, `InstanceSummary`)
//! - Error type (`EnvironmentError`)
//!
//! ```ignore
//! let doc = client.find_environment(Some("app"), Some("default"), Some("mysql-8.0-orders")).await?;
//! for source in &doc.property_sources {
//!     println!("{}: {:?}", source.name, source.source);
//! }
//! ```

#![forbid(unsafe_code)]

pub mod api;
pub mod errors;
pub mod models;

pub use api::EnvironmentProviderClient;
pub use errors::EnvironmentError;
pub use models::{EnvironmentDocument, InstanceSummary, PropertyMap, PropertySource, ServiceKind};
