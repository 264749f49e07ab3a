use anyhow::Context;
use async_trait::async_trait;
use environment_provider_sdk::{PropertyMap, ServiceKind};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerRequest, ImageExt};
use testcontainers_modules::kafka::{KAFKA_PORT, Kafka};

use crate::config::KafkaConfig;
use crate::domain::properties::binder_properties;
use crate::domain::{DomainError, Endpoint, Provisioner, ServiceDescriptor, ServiceInstance};

/// Starts single-node Confluent Kafka brokers.
pub struct KafkaProvisioner {
    cfg: KafkaConfig,
}

impl KafkaProvisioner {
    #[must_use]
    pub fn new(cfg: KafkaConfig) -> Self {
        Self { cfg }
    }

    fn request(&self, descriptor: &ServiceDescriptor) -> ContainerRequest<Kafka> {
        let request = Kafka::default()
            .with_name(self.cfg.image.as_str())
            .with_tag(descriptor.version.as_str());

        match self.cfg.startup_timeout() {
            Some(timeout) => request.with_startup_timeout(timeout),
            None => request,
        }
    }
}

#[async_trait]
impl Provisioner for KafkaProvisioner {
    #[tracing::instrument(skip_all, fields(name = %descriptor.name, version = %descriptor.version))]
    async fn start(&self, descriptor: &ServiceDescriptor) -> anyhow::Result<ServiceInstance> {
        let image = format!("{}:{}", self.cfg.image, descriptor.version);

        let container = self
            .request(descriptor)
            .start()
            .await
            .with_context(|| format!("container runtime failed to start {image}"))?;
        let host = container.get_host().await?;
        let port = container.get_host_port_ipv4(KAFKA_PORT).await?;

        let bootstrap_servers = format!("{host}:{port}");
        tracing::info!(%bootstrap_servers, "Kafka container ready");

        Ok(
            ServiceInstance::new(descriptor.clone(), Endpoint::Broker { bootstrap_servers })
                .with_container(container),
        )
    }

    fn export(&self, instance: &ServiceInstance) -> Result<PropertyMap, DomainError> {
        match instance.endpoint() {
            Endpoint::Broker { bootstrap_servers } => Ok(binder_properties(bootstrap_servers)),
            Endpoint::Database { .. } => Err(DomainError::EndpointMismatch {
                kind: ServiceKind::MessageBroker,
                name: instance.name().to_owned(),
            }),
        }
    }
}
