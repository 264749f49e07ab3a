//! Environment Provider Module Implementation
//!
//! Starts containerized backing services (MySQL, Kafka) on demand from a
//! compact label such as `mysql-8.0-orders:kafka-7.4-events`, caches them by
//! logical name, and serves their connection parameters as a Spring Cloud
//! Config environment.
//!
//! ## Architecture
//!
//! - **Descriptor parser**: label token → `ServiceDescriptor`
//! - **Instance registry**: one running instance per `(kind, name)`, single-flight creation
//! - **Provisioners**: one per `ServiceKind`, backed by `testcontainers`
//! - **Environment service**: assembles the ordered property sources

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

// === PUBLIC API (from SDK) ===
pub use environment_provider_sdk::{
    EnvironmentDocument, EnvironmentError, EnvironmentProviderClient, InstanceSummary,
    PropertyMap, PropertySource, ServiceKind,
};

// === MODULE DEFINITION ===
pub mod module;
pub use module::EnvironmentProviderModule;

// === CONFIGURATION ===
pub mod config;
pub use config::EnvironmentProviderConfig;

// === INTERNAL MODULES ===
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
