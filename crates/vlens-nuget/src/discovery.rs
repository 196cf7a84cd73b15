//! Service index discovery.

use crate::error::{NugetError, Result};
use crate::service::{ResolverDescriptor, ServiceIndex};
use futures::future::join_all;
use vlens_core::HttpCache;

/// A version listing service selected from one service index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredEndpoint {
    pub index_url: String,
    pub service_url: String,
    pub resolver: &'static ResolverDescriptor,
}

/// Endpoints selected across all configured indexes.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Usable endpoints in configured index order.
    pub endpoints: Vec<DiscoveredEndpoint>,
    /// First transient failure among dropped indexes.
    pub transient: Option<NugetError>,
}

/// Fetches every service index concurrently and selects one resolver per
/// index.
///
/// Indexes that fail to load or advertise no known capability are dropped.
/// The first transient index failure is kept so callers can tell an
/// unreachable feed apart from one that has nothing to offer.
pub async fn discover_endpoints(
    cache: &HttpCache,
    index_urls: &[String],
    token: Option<&str>,
) -> Discovery {
    let lookups = index_urls
        .iter()
        .map(|index_url| discover_endpoint(cache, index_url, token));

    let mut discovery = Discovery::default();
    for (result, index_url) in join_all(lookups).await.into_iter().zip(index_urls) {
        match result {
            Ok(Some(endpoint)) => discovery.endpoints.push(endpoint),
            Ok(None) => {
                tracing::debug!("no usable NuGet service advertised by {}", index_url);
            }
            Err(e) => {
                tracing::debug!("dropping NuGet index {}: {}", index_url, e);
                if e.is_transient() && discovery.transient.is_none() {
                    discovery.transient = Some(e);
                }
            }
        }
    }
    discovery
}

async fn discover_endpoint(
    cache: &HttpCache,
    index_url: &str,
    token: Option<&str>,
) -> Result<Option<DiscoveredEndpoint>> {
    let response = cache.get_with_token(index_url, &[], token).await?;
    let index: ServiceIndex = response
        .json()
        .map_err(|e| NugetError::response_parse("service index", index_url, e))?;

    Ok(index
        .select_resolver()
        .map(|(resolver, service_url)| DiscoveredEndpoint {
            index_url: index_url.to_string(),
            service_url: service_url.to_string(),
            resolver,
        }))
}
