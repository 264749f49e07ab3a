//! Environment Builder: turns a label into a layered configuration document.

use std::sync::Arc;

use environment_provider_sdk::{EnvironmentDocument, InstanceSummary, PropertySource};
use tracing::{debug, info, warn};

use super::descriptor::{ParsedToken, ServiceDescriptor};
use super::error::DomainError;
use super::provisioner::Provisioners;
use super::registry::InstanceRegistry;

/// Separator between service tokens in a label.
pub const TOKEN_DELIMITER: char = ':';

/// Domain service orchestrating parsing, provisioning and document assembly.
pub struct EnvironmentService {
    registry: Arc<InstanceRegistry>,
    provisioners: Provisioners,
    environment_name: String,
}

impl EnvironmentService {
    #[must_use]
    pub fn new(
        registry: Arc<InstanceRegistry>,
        provisioners: Provisioners,
        environment_name: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            provisioners,
            environment_name: environment_name.into(),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<InstanceRegistry> {
        &self.registry
    }

    /// Build the document for a config-server request.
    ///
    /// `application` is not used for provisioning; `profile` is split on
    /// commas into the document's profile list.
    ///
    /// # Errors
    /// See [`EnvironmentService::build`].
    pub async fn find_environment(
        &self,
        application: Option<&str>,
        profile: Option<&str>,
        label: Option<&str>,
    ) -> Result<EnvironmentDocument, DomainError> {
        debug!(?application, ?profile, ?label, "Finding environment");
        let mut document = self.build(label).await?;
        document.profiles = profile
            .map(|p| {
                p.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        Ok(document)
    }

    /// Resolve every token of `label` to a running service and collect the
    /// exported properties, one property source per token, in label order.
    ///
    /// Tokens with an unsupported prefix or a malformed shape are skipped
    /// with a warning. `None` yields an empty document.
    ///
    /// # Errors
    /// Returns `DomainError::ConstructionFailure` as soon as a recognized
    /// token cannot be provisioned; no partial document is returned.
    #[tracing::instrument(skip(self))]
    pub async fn build(&self, label: Option<&str>) -> Result<EnvironmentDocument, DomainError> {
        let mut document = EnvironmentDocument::new(self.environment_name.clone());

        let Some(label) = label else {
            return Ok(document);
        };
        document.label = Some(label.to_owned());

        for token in label.split(TOKEN_DELIMITER) {
            let descriptor = match ServiceDescriptor::parse(token) {
                ParsedToken::Valid(descriptor) => descriptor,
                ParsedToken::Malformed { kind, reason } => {
                    warn!(token, %kind, %reason, "Malformed container definition, skipping");
                    continue;
                }
                ParsedToken::Unknown => {
                    warn!(token, "Unsupported container definition, skipping");
                    continue;
                }
            };

            let source = self
                .property_source(token, &descriptor)
                .await
                .map_err(|e| DomainError::construction_failure(token, e))?;
            document.push(source);
        }

        Ok(document)
    }

    async fn property_source(
        &self,
        token: &str,
        descriptor: &ServiceDescriptor,
    ) -> Result<PropertySource, DomainError> {
        let provisioner = Arc::clone(self.provisioners.for_kind(descriptor.kind));

        let starter = Arc::clone(&provisioner);
        let requested = descriptor.clone();
        let instance = self
            .registry
            .get_or_create(descriptor.kind, &descriptor.name, move || async move {
                info!(
                    kind = %requested.kind,
                    name = %requested.name,
                    version = %requested.version,
                    "Starting new service instance"
                );
                starter
                    .start(&requested)
                    .await
                    .map_err(|source| DomainError::Provisioning {
                        kind: requested.kind,
                        name: requested.name.clone(),
                        version: requested.version.clone(),
                        source,
                    })
            })
            .await?;

        if instance.version() != descriptor.version {
            warn!(
                token,
                name = %descriptor.name,
                requested = %descriptor.version,
                running = %instance.version(),
                "Instance already running with a different version; reusing it"
            );
        }

        Ok(PropertySource::new(token, provisioner.export(&instance)?))
    }

    #[must_use]
    pub fn running_instances(&self) -> Vec<InstanceSummary> {
        self.registry
            .instances()
            .iter()
            .map(|instance| instance.summary())
            .collect()
    }
}
