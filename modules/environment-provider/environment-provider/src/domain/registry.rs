//! Instance Registry - at most one running instance per `(kind, name)`

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use environment_provider_sdk::ServiceKind;
use tokio::sync::OnceCell;
use tokio::task::JoinError;
use tracing::Instrument;

use super::instance::ServiceInstance;

type Slot = Arc<OnceCell<Arc<ServiceInstance>>>;

/// Instances of one service kind, keyed by logical name.
///
/// Each name owns a lazily initialized slot. The map lock is only held while
/// looking the slot up; the (slow) factory runs against the slot alone, so
/// unrelated names start in parallel while callers of the same name queue
/// behind a single creation.
#[derive(Default)]
struct KindStore {
    slots: Arc<DashMap<String, Slot>>,
}

impl KindStore {
    fn existing(&self, name: &str) -> Option<Arc<ServiceInstance>> {
        self.slots.get(name).and_then(|slot| slot.get().cloned())
    }

    async fn get_or_create<F, Fut, E>(&self, name: &str, factory: F) -> Result<Arc<ServiceInstance>, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<ServiceInstance, E>> + Send + 'static,
        E: From<JoinError> + Send + 'static,
    {
        if let Some(instance) = self.existing(name) {
            return Ok(instance);
        }

        let slot: Slot = Arc::clone(&*self.slots.entry(name.to_owned()).or_default());
        let slots = Arc::clone(&self.slots);
        let name = name.to_owned();

        // Creation runs on its own task: a caller that goes away does not
        // abort a start, and the finished instance is still registered.
        let creation = tokio::spawn(
            async move {
                let result = slot
                    .get_or_try_init(|| async { factory().await.map(Arc::new) })
                    .await
                    .map(Arc::clone);
                if result.is_err() {
                    // Only this task and the map still hold the slot: nobody
                    // else is waiting on it, so the empty entry can go.
                    slots.remove_if(&name, |_, current| {
                        Arc::ptr_eq(current, &slot)
                            && Arc::strong_count(current) == 2
                            && !current.initialized()
                    });
                }
                result
            }
            .in_current_span(),
        );

        creation.await?
    }

    fn instances(&self) -> Vec<Arc<ServiceInstance>> {
        self.slots
            .iter()
            .filter_map(|entry| entry.value().get().cloned())
            .collect()
    }

    fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|entry| entry.value().initialized())
            .count()
    }
}

/// Process-wide cache of running service instances, one store per kind.
///
/// Constructed explicitly and shared via `Arc`; dropping the last reference
/// drops every instance and with it every container it owns.
#[derive(Default)]
pub struct InstanceRegistry {
    databases: KindStore,
    brokers: KindStore,
}

impl std::fmt::Debug for InstanceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceRegistry")
            .field("databases", &self.databases.len())
            .field("brokers", &self.brokers.len())
            .finish()
    }
}

impl InstanceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self, kind: ServiceKind) -> &KindStore {
        match kind {
            ServiceKind::RelationalDatabase => &self.databases,
            ServiceKind::MessageBroker => &self.brokers,
        }
    }

    /// Return the instance registered for `(kind, name)`, creating it with
    /// `factory` if there is none yet.
    ///
    /// For a given key the factory of at most one caller runs at a time, and
    /// once a factory succeeds no other factory for that key ever runs.
    /// Concurrent callers wait for the running factory and share its result.
    /// The factory runs on a spawned task, so dropping the returned future
    /// does not cancel a creation that is under way.
    ///
    /// # Errors
    /// Returns the factory's error, or the task's `JoinError` converted into
    /// `E` if the factory panicked. Nothing is registered in either case.
    pub async fn get_or_create<F, Fut, E>(
        &self,
        kind: ServiceKind,
        name: &str,
        factory: F,
    ) -> Result<Arc<ServiceInstance>, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<ServiceInstance, E>> + Send + 'static,
        E: From<JoinError> + Send + 'static,
    {
        self.store(kind).get_or_create(name, factory).await
    }

    /// Look up a running instance without creating one.
    #[must_use]
    pub fn get(&self, kind: ServiceKind, name: &str) -> Option<Arc<ServiceInstance>> {
        self.store(kind).existing(name)
    }

    /// Snapshot of every running instance, databases first.
    #[must_use]
    pub fn instances(&self) -> Vec<Arc<ServiceInstance>> {
        ServiceKind::ALL
            .iter()
            .flat_map(|kind| self.store(*kind).instances())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        ServiceKind::ALL
            .iter()
            .map(|kind| self.store(*kind).len())
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
