use dashmap::DashMap;
use std::sync::Arc;

use crate::registry::PackageClient;

/// Registry of package clients keyed by ecosystem tag.
///
/// Thread-safe; lookups clone the `Arc` out of the map so no shard lock is
/// held across an await.
///
/// # Examples
///
/// ```
/// use vlens_core::ClientRegistry;
///
/// let registry = ClientRegistry::new();
/// assert!(registry.get("npm").is_none());
/// assert!(registry.providers().is_empty());
/// ```
#[derive(Default)]
pub struct ClientRegistry {
    clients: DashMap<&'static str, Arc<dyn PackageClient>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a client under its provider tag, replacing any previous one.
    pub fn register(&self, client: Arc<dyn PackageClient>) {
        self.clients.insert(client.provider(), client);
    }

    pub fn get(&self, provider: &str) -> Option<Arc<dyn PackageClient>> {
        self.clients.get(provider).map(|c| Arc::clone(&c))
    }

    /// Registered provider tags, sorted.
    pub fn providers(&self) -> Vec<&'static str> {
        let mut providers: Vec<_> = self.clients.iter().map(|e| *e.key()).collect();
        providers.sort_unstable();
        providers
    }
}
