#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use environment_provider::config::EnvironmentProviderConfig;
use environment_provider::domain::properties::{binder_properties, datasource_properties};
use environment_provider::domain::{
    DomainError, Endpoint, EnvironmentService, InstanceRegistry, Provisioner, Provisioners,
    ServiceDescriptor, ServiceInstance,
};
use environment_provider::{EnvironmentProviderModule, PropertyMap, ServiceKind};

/// Provisioner that fabricates endpoints instead of starting containers and
/// counts how often it was asked to start something.
pub struct CountingProvisioner {
    kind: ServiceKind,
    starts: AtomicUsize,
    failures_left: AtomicUsize,
    delay: Duration,
}

impl CountingProvisioner {
    pub fn new(kind: ServiceKind) -> Self {
        Self {
            kind,
            starts: AtomicUsize::new(0),
            failures_left: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    /// Make every start take `delay`, widening race windows.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fail the next `n` starts.
    pub fn failing(self, n: usize) -> Self {
        self.failures_left.store(n, Ordering::SeqCst);
        self
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provisioner for CountingProvisioner {
    async fn start(&self, descriptor: &ServiceDescriptor) -> anyhow::Result<ServiceInstance> {
        assert_eq!(descriptor.kind, self.kind, "dispatched to the wrong provisioner");
        let n = self.starts.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let should_fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if should_fail {
            anyhow::bail!("simulated container runtime failure");
        }

        let port = 40000 + n;
        let endpoint = match self.kind {
            ServiceKind::RelationalDatabase => Endpoint::Database {
                jdbc_url: format!("jdbc:mysql://localhost:{port}/{}", descriptor.name),
                username: "test".to_owned(),
                password: "test".to_owned(),
            },
            ServiceKind::MessageBroker => Endpoint::Broker {
                bootstrap_servers: format!("localhost:{port}"),
            },
        };
        Ok(ServiceInstance::new(descriptor.clone(), endpoint))
    }

    fn export(&self, instance: &ServiceInstance) -> Result<PropertyMap, DomainError> {
        match instance.endpoint() {
            Endpoint::Database {
                jdbc_url,
                username,
                password,
            } => Ok(datasource_properties(jdbc_url, username, password)),
            Endpoint::Broker { bootstrap_servers } => Ok(binder_properties(bootstrap_servers)),
        }
    }
}

pub struct Harness {
    pub database: Arc<CountingProvisioner>,
    pub broker: Arc<CountingProvisioner>,
    pub service: Arc<EnvironmentService>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(
            CountingProvisioner::new(ServiceKind::RelationalDatabase),
            CountingProvisioner::new(ServiceKind::MessageBroker),
        )
    }

    pub fn with(database: CountingProvisioner, broker: CountingProvisioner) -> Self {
        let database = Arc::new(database);
        let broker = Arc::new(broker);
        let service = Arc::new(EnvironmentService::new(
            Arc::new(InstanceRegistry::new()),
            provisioners(&database, &broker),
            "testcontainers",
        ));
        Self {
            database,
            broker,
            service,
        }
    }

    pub fn total_starts(&self) -> usize {
        self.database.starts() + self.broker.starts()
    }
}

pub fn provisioners(
    database: &Arc<CountingProvisioner>,
    broker: &Arc<CountingProvisioner>,
) -> Provisioners {
    Provisioners::new(
        Arc::clone(database) as Arc<dyn Provisioner>,
        Arc::clone(broker) as Arc<dyn Provisioner>,
    )
}

/// Module wired with counting provisioners, as the server would wire it.
pub fn create_module() -> (
    EnvironmentProviderModule,
    Arc<CountingProvisioner>,
    Arc<CountingProvisioner>,
) {
    let database = Arc::new(CountingProvisioner::new(ServiceKind::RelationalDatabase));
    let broker = Arc::new(CountingProvisioner::new(ServiceKind::MessageBroker));
    let module = EnvironmentProviderModule::with_provisioners(
        &EnvironmentProviderConfig::default(),
        provisioners(&database, &broker),
    );
    (module, database, broker)
}
