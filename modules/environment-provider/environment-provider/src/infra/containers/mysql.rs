use anyhow::Context;
use async_trait::async_trait;
use environment_provider_sdk::{PropertyMap, ServiceKind};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerRequest, ImageExt};
use testcontainers_modules::mysql::Mysql;

use crate::config::MySqlConfig;
use crate::domain::properties::datasource_properties;
use crate::domain::{DomainError, Endpoint, Provisioner, ServiceDescriptor, ServiceInstance};

const MYSQL_PORT: u16 = 3306;

/// Connection parameters appended to every JDBC URL.
const URL_PARAMS: [(&str, &str); 4] = [
    ("useSSL", "false"),
    ("autocommit", "false"),
    ("allowPublicKeyRetrieval", "true"),
    ("createDatabaseIfNotExist", "true"),
];

/// Starts MySQL containers, one database per descriptor name.
pub struct MySqlProvisioner {
    cfg: MySqlConfig,
}

impl MySqlProvisioner {
    #[must_use]
    pub fn new(cfg: MySqlConfig) -> Self {
        Self { cfg }
    }

    fn request(&self, descriptor: &ServiceDescriptor) -> ContainerRequest<Mysql> {
        let request = Mysql::default()
            .with_name(self.cfg.image.as_str())
            .with_tag(descriptor.version.as_str())
            .with_env_var("MYSQL_DATABASE", descriptor.name.as_str())
            .with_env_var("MYSQL_USER", self.cfg.username.as_str())
            .with_env_var("MYSQL_PASSWORD", self.cfg.password.as_str());

        match self.cfg.startup_timeout() {
            Some(timeout) => request.with_startup_timeout(timeout),
            None => request,
        }
    }
}

#[async_trait]
impl Provisioner for MySqlProvisioner {
    #[tracing::instrument(skip_all, fields(name = %descriptor.name, version = %descriptor.version))]
    async fn start(&self, descriptor: &ServiceDescriptor) -> anyhow::Result<ServiceInstance> {
        let image = format!("{}:{}", self.cfg.image, descriptor.version);

        let container = self
            .request(descriptor)
            .start()
            .await
            .with_context(|| format!("container runtime failed to start {image}"))?;
        let host = container.get_host().await?;
        let port = container.get_host_port_ipv4(MYSQL_PORT).await?;

        let jdbc_url = jdbc_url(&host.to_string(), port, &descriptor.name);
        tracing::info!(%jdbc_url, "MySQL container ready");

        Ok(ServiceInstance::new(
            descriptor.clone(),
            Endpoint::Database {
                jdbc_url,
                username: self.cfg.username.clone(),
                password: self.cfg.password.clone(),
            },
        )
        .with_container(container))
    }

    fn export(&self, instance: &ServiceInstance) -> Result<PropertyMap, DomainError> {
        match instance.endpoint() {
            Endpoint::Database {
                jdbc_url,
                username,
                password,
            } => Ok(datasource_properties(jdbc_url, username, password)),
            Endpoint::Broker { .. } => Err(DomainError::EndpointMismatch {
                kind: ServiceKind::RelationalDatabase,
                name: instance.name().to_owned(),
            }),
        }
    }
}

fn jdbc_url(host: &str, port: u16, database: &str) -> String {
    let params = URL_PARAMS
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("jdbc:mysql://{host}:{port}/{database}?{params}")
}
