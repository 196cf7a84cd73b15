//! vlens: resolve declared dependency versions against package registries.
//!
//! The [`Resolver`] owns one client per ecosystem (npm, NuGet, Dub, Pub)
//! sharing a single response cache, and turns [`DependencyRequest`]s into
//! [`PackageDocument`](vlens_core::PackageDocument)s carrying an update
//! suggestion.

pub mod config;
pub mod resolver;

// Re-export commonly used types
pub use config::VlensConfig;
pub use resolver::{DependencyRequest, ResolutionTask, Resolver};
pub use vlens_core::{ErrorReport, PackageDocument, Result, SuggestionTag, VlensError};
