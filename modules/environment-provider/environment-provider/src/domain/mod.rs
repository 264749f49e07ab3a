//! Domain layer for the environment provider.
//!
//! Contains label parsing, the instance registry, the provisioner contract,
//! and the service that assembles configuration documents.

pub mod descriptor;
pub mod error;
pub mod instance;
pub mod local_client;
pub mod properties;
pub mod provisioner;
pub mod registry;
pub mod service;

pub use descriptor::{ParsedToken, ServiceDescriptor};
pub use error::DomainError;
pub use instance::{Endpoint, ServiceInstance};
pub use provisioner::{Provisioner, Provisioners};
pub use registry::InstanceRegistry;
pub use service::EnvironmentService;
