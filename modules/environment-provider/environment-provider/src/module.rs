//! Module wiring for the environment provider.

use std::sync::Arc;

use environment_provider_sdk::EnvironmentProviderClient;
use tracing::info;

use crate::config::EnvironmentProviderConfig;
use crate::domain::local_client::LocalClient;
use crate::domain::{EnvironmentService, InstanceRegistry, Provisioners};
use crate::infra::container_provisioners;

/// Environment provider module.
///
/// Owns the instance registry. Every container started on behalf of a
/// request stays alive until the module is shut down (or dropped).
pub struct EnvironmentProviderModule {
    service: Arc<EnvironmentService>,
    client: Arc<dyn EnvironmentProviderClient>,
}

impl EnvironmentProviderModule {
    /// Create the module with container-backed provisioners.
    #[must_use]
    pub fn new(cfg: &EnvironmentProviderConfig) -> Self {
        Self::with_provisioners(cfg, container_provisioners(cfg))
    }

    /// Create the module with a custom provisioner set.
    #[must_use]
    pub fn with_provisioners(cfg: &EnvironmentProviderConfig, provisioners: Provisioners) -> Self {
        info!(environment = %cfg.name, "Initializing environment_provider module");

        let registry = Arc::new(InstanceRegistry::new());
        let service = Arc::new(EnvironmentService::new(
            registry,
            provisioners,
            cfg.name.clone(),
        ));
        let client: Arc<dyn EnvironmentProviderClient> =
            Arc::new(LocalClient::new(Arc::clone(&service)));

        Self { service, client }
    }

    #[must_use]
    pub fn client(&self) -> Arc<dyn EnvironmentProviderClient> {
        Arc::clone(&self.client)
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<InstanceRegistry> {
        self.service.registry()
    }

    pub fn register_rest(&self, router: axum::Router) -> axum::Router {
        info!("Registering environment_provider REST routes");
        crate::api::rest::routes::register_routes(router, self.client())
    }

    /// Drop the registry and with it every running container.
    ///
    /// Must be called from within the tokio runtime so container removal can
    /// complete before the process exits.
    pub fn shutdown(self) {
        let instances = self.registry().len();
        info!(instances, "Shutting down environment_provider, removing containers");
        drop(self);
    }
}
