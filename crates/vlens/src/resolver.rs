//! Dispatch of dependency requests to ecosystem clients.

use crate::config::VlensConfig;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;
use vlens_core::{
    ClientRegistry, HttpCache, PackageDocument, PackageRequest, Result, VlensError,
};
use vlens_dub::{DubClient, read_dub_selections};
use vlens_npm::NpmClient;
use vlens_nuget::NugetClient;
use vlens_pub::PubClient;

/// Upper bound on concurrent resolutions in [`Resolver::resolve_all`].
const MAX_CONCURRENT_RESOLUTIONS: usize = 10;

/// A declared dependency tagged with its ecosystem (`npm`, `nuget`, `dub`, `pub`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRequest {
    pub name: String,
    pub version: String,
    pub ecosystem: String,
}

impl DependencyRequest {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        ecosystem: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ecosystem: ecosystem.into(),
        }
    }

    fn package_request(&self) -> PackageRequest {
        PackageRequest::new(&self.name, &self.version)
    }
}

/// Resolves dependency requests through one registered client per
/// ecosystem. All clients share a single [`HttpCache`].
pub struct Resolver {
    clients: ClientRegistry,
    cache: Arc<HttpCache>,
}

impl Resolver {
    /// Wraps an already populated client registry.
    pub fn new(cache: Arc<HttpCache>, clients: ClientRegistry) -> Self {
        Self { clients, cache }
    }

    /// Builds the cache and every ecosystem client from configuration.
    ///
    /// Fails before any network I/O when a client cannot be constructed
    /// (no NuGet index, malformed npm registry URL) or when a configured
    /// `dub.selections.json` cannot be read.
    pub async fn from_config(config: &VlensConfig) -> Result<Self> {
        let cache = Arc::new(HttpCache::new(&config.http)?);
        let clients = ClientRegistry::new();

        clients.register(Arc::new(NpmClient::new(
            Arc::clone(&cache),
            config.npm.clone(),
        )?));
        clients.register(Arc::new(NugetClient::new(
            Arc::clone(&cache),
            config.nuget.clone(),
        )?));

        let mut dub = DubClient::new(Arc::clone(&cache), config.dub.clone());
        if let Some(path) = &config.dub.selections_path {
            dub = dub.with_selections(read_dub_selections(path).await?);
        }
        clients.register(Arc::new(dub));

        clients.register(Arc::new(PubClient::new(
            Arc::clone(&cache),
            config.pub_dev.clone(),
        )));

        tracing::debug!("Registered clients: {:?}", clients.providers());
        Ok(Self::new(cache, clients))
    }

    pub fn cache(&self) -> &HttpCache {
        &self.cache
    }

    /// Resolves one dependency.
    ///
    /// A package the registry does not know is a document, not an error.
    pub async fn resolve(&self, request: &DependencyRequest) -> Result<PackageDocument> {
        let ecosystem = request.ecosystem.to_ascii_lowercase();
        let client = self
            .clients
            .get(&ecosystem)
            .ok_or_else(|| VlensError::UnsupportedEcosystem(request.ecosystem.clone()))?;

        tracing::debug!(
            "Resolving {} {}@{}",
            ecosystem,
            request.name,
            request.version
        );
        client.fetch_package(&request.package_request()).await
    }

    /// Resolves a batch concurrently; results keep the input order.
    pub async fn resolve_all(
        &self,
        requests: &[DependencyRequest],
    ) -> Vec<Result<PackageDocument>> {
        stream::iter(requests)
            .map(|request| self.resolve(request))
            .buffered(MAX_CONCURRENT_RESOLUTIONS)
            .collect()
            .await
    }

    /// Resolves one dependency on a background task that can be cancelled.
    pub fn spawn(self: &Arc<Self>, request: DependencyRequest) -> ResolutionTask {
        let resolver = Arc::clone(self);
        let handle = tokio::spawn(async move { resolver.resolve(&request).await });
        ResolutionTask { handle }
    }
}

/// Handle to a resolution running on the tokio runtime.
///
/// Cancelling aborts the task; a cancelled task yields
/// [`VlensError::Cancelled`] and no document. Requests it shared with other
/// callers are completed by the remaining waiters; requests only it was
/// waiting on are aborted.
#[derive(Debug)]
pub struct ResolutionTask {
    handle: JoinHandle<Result<PackageDocument>>,
}

impl ResolutionTask {
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub async fn join(self) -> Result<PackageDocument> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(VlensError::Cancelled),
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use vlens_core::{HttpConfig, PackageClient, SuggestionTag, create_directory};

    struct StubClient;

    #[async_trait]
    impl PackageClient for StubClient {
        fn provider(&self) -> &'static str {
            "stub"
        }

        async fn fetch_package(&self, request: &PackageRequest) -> Result<PackageDocument> {
            Ok(create_directory("stub", request, "../local"))
        }
    }

    fn stub_resolver() -> Arc<Resolver> {
        let cache = Arc::new(HttpCache::new(&HttpConfig::default()).unwrap());
        let clients = ClientRegistry::new();
        clients.register(Arc::new(StubClient));
        Arc::new(Resolver::new(cache, clients))
    }

    #[tokio::test]
    async fn test_resolve_dispatches_by_ecosystem() {
        let resolver = stub_resolver();
        let doc = resolver
            .resolve(&DependencyRequest::new("pkg", "1.0.0", "STUB"))
            .await
            .unwrap();
        assert_eq!(doc.provider, "stub");
        assert_eq!(doc.tag(), SuggestionTag::Matches);
    }

    #[tokio::test]
    async fn test_unknown_ecosystem() {
        let resolver = stub_resolver();
        let err = resolver
            .resolve(&DependencyRequest::new("pkg", "1.0.0", "maven"))
            .await
            .unwrap_err();
        assert!(matches!(err, VlensError::UnsupportedEcosystem(ref e) if e == "maven"));
    }

    #[tokio::test]
    async fn test_resolve_all_keeps_order() {
        let resolver = stub_resolver();
        let requests = [
            DependencyRequest::new("a", "1", "stub"),
            DependencyRequest::new("b", "1", "cargo"),
            DependencyRequest::new("c", "1", "stub"),
        ];

        let results = resolver.resolve_all(&requests).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().requested.name, "a");
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().requested.name, "c");
    }

    #[tokio::test]
    async fn test_spawned_task_completes() {
        let resolver = stub_resolver();
        let task = resolver.spawn(DependencyRequest::new("pkg", "1.0.0", "stub"));
        let doc = task.join().await.unwrap();
        assert_eq!(doc.requested.name, "pkg");
    }

    #[tokio::test]
    async fn test_cancelled_task_yields_no_document() {
        let resolver = stub_resolver();
        let task = resolver.spawn(DependencyRequest::new("pkg", "1.0.0", "stub"));
        task.cancel();
        assert!(matches!(task.join().await, Err(VlensError::Cancelled)));
    }

    #[tokio::test]
    async fn test_from_config_rejects_empty_nuget_indexes() {
        let mut config = VlensConfig::default();
        config.nuget.index_urls.clear();

        let err = Resolver::from_config(&config).await.err().unwrap();
        assert!(matches!(err, VlensError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_from_config_registers_every_ecosystem() {
        let resolver = Resolver::from_config(&VlensConfig::default()).await.unwrap();
        assert_eq!(resolver.clients.providers(), ["dub", "npm", "nuget", "pub"]);
    }
}
