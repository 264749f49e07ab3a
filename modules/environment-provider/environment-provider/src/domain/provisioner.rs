//! Provisioner contract and the per-kind provisioner set.

use std::sync::Arc;

use async_trait::async_trait;
use environment_provider_sdk::{PropertyMap, ServiceKind};

use super::descriptor::ServiceDescriptor;
use super::error::DomainError;
use super::instance::ServiceInstance;

/// Knows how to start services of one kind and how to describe a running
/// instance as configuration properties.
///
/// Implementations hold no lifecycle state; everything about a started
/// service lives in the returned [`ServiceInstance`].
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Start a new instance for `descriptor`. Blocks (asynchronously) until
    /// the service is ready or the container runtime gives up.
    async fn start(&self, descriptor: &ServiceDescriptor) -> anyhow::Result<ServiceInstance>;

    /// Export the connection parameters of `instance`.
    ///
    /// # Errors
    /// Returns `DomainError::EndpointMismatch` if the instance was not
    /// started by a provisioner of this kind.
    fn export(&self, instance: &ServiceInstance) -> Result<PropertyMap, DomainError>;
}

/// One provisioner per [`ServiceKind`].
#[derive(Clone)]
pub struct Provisioners {
    database: Arc<dyn Provisioner>,
    broker: Arc<dyn Provisioner>,
}

impl Provisioners {
    #[must_use]
    pub fn new(database: Arc<dyn Provisioner>, broker: Arc<dyn Provisioner>) -> Self {
        Self { database, broker }
    }

    #[must_use]
    pub fn for_kind(&self, kind: ServiceKind) -> &Arc<dyn Provisioner> {
        match kind {
            ServiceKind::RelationalDatabase => &self.database,
            ServiceKind::MessageBroker => &self.broker,
        }
    }
}
