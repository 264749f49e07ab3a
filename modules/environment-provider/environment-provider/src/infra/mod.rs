//! Infrastructure layer: container-backed provisioners.

pub mod containers;

pub use containers::{KafkaProvisioner, MySqlProvisioner, container_provisioners};
