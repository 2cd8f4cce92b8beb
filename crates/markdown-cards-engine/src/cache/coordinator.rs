use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared, WeakShared};
use parking_lot::Mutex;

type Load<V> = Shared<BoxFuture<'static, V>>;

struct Pending<V> {
    id: u64,
    load: WeakShared<BoxFuture<'static, V>>,
}

struct Registry<K, V> {
    next_id: u64,
    pending: HashMap<K, Pending<V>>,
}

/// Coalesces concurrent loads that share a key.
///
/// The first request for a key claims it and starts the work; requests made
/// while that work is pending await the same shared result. The entry is
/// removed as soon as the work finishes, so a later request starts fresh.
///
/// Claiming happens when [`LoadCoordinator::run`] is called, not when the
/// returned future is first polled. Requests created together therefore
/// share one load however their futures are later scheduled.
///
/// The registry only holds a weak handle. Once every requester has dropped
/// its future the work is dropped with them and the key is released.
pub struct LoadCoordinator<K, V> {
    registry: Arc<Mutex<Registry<K, V>>>,
}

/// How a request was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// This request started the work.
    Started,
    /// This request joined work already in flight.
    Joined,
}

impl<K, V> LoadCoordinator<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                pending: HashMap::new(),
            })),
        }
    }

    /// Claims `key` now, calling `work` only when no load for `key` is
    /// pending. The returned future resolves to the shared result.
    pub fn run<F, Fut>(&self, key: K, work: F) -> impl Future<Output = (V, Claim)> + Send
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V> + Send + 'static,
    {
        let (load, claim) = self.claim(key, work);
        async move { (load.await, claim) }
    }

    /// Whether a load for `key` is currently pending.
    pub fn is_pending(&self, key: &K) -> bool {
        // The upgraded handle must outlive the lock: dropping the last one
        // releases the key, which locks the registry again.
        let load = self.registry.lock().pending.get(key).and_then(|p| p.load.upgrade());
        load.is_some()
    }

    pub fn pending(&self) -> usize {
        self.registry.lock().pending.len()
    }

    fn claim<F, Fut>(&self, key: K, work: F) -> (Load<V>, Claim)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V> + Send + 'static,
    {
        let mut registry = self.registry.lock();
        if let Some(load) = registry.pending.get(&key).and_then(|p| p.load.upgrade()) {
            return (load, Claim::Joined);
        }

        let work = work();
        registry.next_id += 1;
        let id = registry.next_id;
        let release = Release {
            registry: Arc::clone(&self.registry),
            key: key.clone(),
            id,
        };
        let load = async move {
            let _release = release;
            work.await
        }
        .boxed()
        .shared();

        if let Some(weak) = load.downgrade() {
            registry.pending.insert(key, Pending { id, load: weak });
        }
        (load, Claim::Started)
    }
}

impl<K, V> Default for LoadCoordinator<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Removes its load's entry when the work finishes or is dropped unfinished.
struct Release<K: Hash + Eq, V> {
    registry: Arc<Mutex<Registry<K, V>>>,
    key: K,
    id: u64,
}

impl<K: Hash + Eq, V> Drop for Release<K, V> {
    fn drop(&mut self) {
        let mut registry = self.registry.lock();
        if registry.pending.get(&self.key).is_some_and(|p| p.id == self.id) {
            registry.pending.remove(&self.key);
        }
    }
}
