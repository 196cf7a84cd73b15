//! NuGet ecosystem support for vlens.
//!
//! Resolves package versions through NuGet v3 service discovery: each
//! configured service index advertises resources, the most preferred
//! version listing capability is selected per index, and all selected
//! services are queried concurrently.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use vlens_core::{HttpCache, HttpConfig, PackageClient, PackageRequest};
//! use vlens_nuget::{NugetClient, NugetConfig};
//!
//! # async fn example() -> vlens_core::Result<()> {
//! let cache = Arc::new(HttpCache::new(&HttpConfig::default())?);
//! let client = NugetClient::new(cache, NugetConfig::default())?;
//!
//! let doc = client
//!     .fetch_package(&PackageRequest::new("Newtonsoft.Json", "[12.0,14.0)"))
//!     .await?;
//! println!("{:?}", doc.suggestion);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod discovery;
pub mod error;
pub mod resolvers;
pub mod service;
pub mod specifier;

pub use client::{NugetClient, PROVIDER, Selection, select_listing};
pub use config::NugetConfig;
pub use discovery::{DiscoveredEndpoint, Discovery, discover_endpoints};
pub use error::{NugetError, Result};
pub use resolvers::VersionListing;
pub use service::{ResolverDescriptor, SERVICE_RESOLVERS, ServiceCapability, ServiceIndex};
pub use specifier::parse_nuget_specifier;
