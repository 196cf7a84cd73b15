//! Core abstractions for vlens.
//!
//! This crate provides the version resolution core shared by every
//! ecosystem client (npm, NuGet, Dub, Pub).
//!
//! # Architecture
//!
//! vlens-core defines:
//! - **Specifiers**: `VersionSpecifier` and the semver-family grammar
//! - **Normalizer**: `VersionPartition` splitting raw listings into releases
//!   and prereleases
//! - **Suggestions**: `suggest` and `prerelease_candidates`
//! - **Documents**: `PackageDocument` and its pure constructors
//! - **HTTP Cache**: TTL response cache with in-flight request sharing
//! - **Traits**: `PackageClient`, implemented once per ecosystem
//! - **Error Types**: `HttpError` and `VlensError`
//!
//! # Examples
//!
//! ```
//! use vlens_core::{parse_semver, suggest, SuggestionTag, VersionPartition};
//!
//! let partition = VersionPartition::from_raw(["3.0.0-beta1", "3.0.0-beta2"]);
//! let suggestion = suggest(&parse_semver("^3.0.0"), &partition);
//!
//! assert_eq!(suggestion.tag, SuggestionTag::LatestIsPrerelease);
//! assert_eq!(suggestion.version.as_deref(), Some("3.0.0-beta2"));
//! ```

pub mod cache;
pub mod client_registry;
pub mod config;
pub mod document;
pub mod error;
pub mod registry;
pub mod resolve;
pub mod specifier;
pub mod suggestion;
pub mod version;

// Re-export commonly used types
pub use cache::{CachedResponse, HttpCache, HttpResponse, ResponseSource, cache_key};
pub use client_registry::ClientRegistry;
pub use config::HttpConfig;
pub use document::{
    PackageDocument, PackageRequest, PackageSource, ResponseStatus, create_directory,
    create_four_segment, create_not_found, create_registry_document,
};
pub use error::{ErrorReport, HttpError, Result, VlensError};
pub use registry::PackageClient;
pub use resolve::{build_document, recover_not_found};
pub use specifier::{SpecifierKind, VersionSpecifier, parse_semver};
pub use suggestion::{Suggestion, SuggestionTag, prerelease_candidates, suggest};
pub use version::VersionPartition;
