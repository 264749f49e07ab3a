use std::sync::Arc;

use async_trait::async_trait;
use environment_provider_sdk::{
    EnvironmentDocument, EnvironmentError, EnvironmentProviderClient, InstanceSummary,
};

use crate::domain::service::EnvironmentService;

/// In-process implementation of the SDK client backed by the domain service.
pub struct LocalClient {
    service: Arc<EnvironmentService>,
}

impl LocalClient {
    #[must_use]
    pub fn new(service: Arc<EnvironmentService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl EnvironmentProviderClient for LocalClient {
    async fn find_environment(
        &self,
        application: Option<&str>,
        profile: Option<&str>,
        label: Option<&str>,
    ) -> Result<EnvironmentDocument, EnvironmentError> {
        self.service
            .find_environment(application, profile, label)
            .await
            .map_err(|e| {
                tracing::error!(error = %e.chain_message(), "Failed to construct environment");
                e.into()
            })
    }

    async fn running_instances(&self) -> Result<Vec<InstanceSummary>, EnvironmentError> {
        Ok(self.service.running_instances())
    }
}
