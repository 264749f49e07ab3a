//! `EnvironmentProviderClient` trait definition.

use async_trait::async_trait;

use crate::errors::EnvironmentError;
use crate::models::{EnvironmentDocument, InstanceSummary};

/// Public API of the environment provider.
///
/// Only `label` drives provisioning. `application` and `profile` are carried
/// into the document metadata so config-server clients see what they asked for.
#[async_trait]
pub trait EnvironmentProviderClient: Send + Sync {
    /// Resolve (and if needed start) every service named by `label` and return
    /// their connection properties, one property source per label token.
    async fn find_environment(
        &self,
        application: Option<&str>,
        profile: Option<&str>,
        label: Option<&str>,
    ) -> Result<EnvironmentDocument, EnvironmentError>;

    /// List the service instances that are currently running.
    async fn running_instances(&self) -> Result<Vec<InstanceSummary>, EnvironmentError>;
}
