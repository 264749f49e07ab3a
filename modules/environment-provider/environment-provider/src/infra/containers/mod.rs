//! Provisioners that start services with `testcontainers`.

mod kafka;
mod mysql;

use std::sync::Arc;

pub use kafka::KafkaProvisioner;
pub use mysql::MySqlProvisioner;

use crate::config::EnvironmentProviderConfig;
use crate::domain::Provisioners;

/// Build the provisioner set backed by real containers.
#[must_use]
pub fn container_provisioners(cfg: &EnvironmentProviderConfig) -> Provisioners {
    Provisioners::new(
        Arc::new(MySqlProvisioner::new(cfg.mysql.clone())),
        Arc::new(KafkaProvisioner::new(cfg.kafka.clone())),
    )
}
