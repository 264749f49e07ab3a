//! Running service instances held by the registry.

use std::any::Any;
use std::fmt;

use environment_provider_sdk::{InstanceSummary, ServiceKind};

use super::descriptor::ServiceDescriptor;

/// Connection details of a started service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Database {
        jdbc_url: String,
        username: String,
        password: String,
    },
    Broker {
        bootstrap_servers: String,
    },
}

/// One started service. The container handle, if any, lives exactly as long
/// as the instance; dropping the instance removes the container.
pub struct ServiceInstance {
    descriptor: ServiceDescriptor,
    endpoint: Endpoint,
    _container: Option<Box<dyn Any + Send + Sync>>,
}

impl fmt::Debug for ServiceInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceInstance")
            .field("descriptor", &self.descriptor)
            .field("endpoint", &self.endpoint)
            .field("has_container", &self._container.is_some())
            .finish()
    }
}

impl ServiceInstance {
    #[must_use]
    pub fn new(descriptor: ServiceDescriptor, endpoint: Endpoint) -> Self {
        Self {
            descriptor,
            endpoint,
            _container: None,
        }
    }

    /// Attach the runtime handle that keeps the container alive.
    #[must_use]
    pub fn with_container<C: Any + Send + Sync>(mut self, container: C) -> Self {
        self._container = Some(Box::new(container));
        self
    }

    #[must_use]
    pub fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub fn kind(&self) -> ServiceKind {
        self.descriptor.kind
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.descriptor.version
    }

    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    #[must_use]
    pub fn summary(&self) -> InstanceSummary {
        InstanceSummary {
            kind: self.kind(),
            name: self.descriptor.name.clone(),
            version: self.descriptor.version.clone(),
        }
    }
}
