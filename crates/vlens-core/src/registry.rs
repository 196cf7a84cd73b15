use crate::document::{PackageDocument, PackageRequest};
use crate::error::Result;
use async_trait::async_trait;

/// Registry client for one package ecosystem.
///
/// Implementors turn a declared dependency into a [`PackageDocument`].
/// Package absence and unsupported specifiers are documents, not errors;
/// an `Err` means the registry could not be consulted (transport failure,
/// 5xx, unreadable response) or the client is misconfigured.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use vlens_core::document::{create_directory, PackageDocument, PackageRequest};
/// use vlens_core::PackageClient;
///
/// struct PathClient;
///
/// #[async_trait]
/// impl PackageClient for PathClient {
///     fn provider(&self) -> &'static str {
///         "path"
///     }
///
///     async fn fetch_package(
///         &self,
///         request: &PackageRequest,
///     ) -> vlens_core::Result<PackageDocument> {
///         Ok(create_directory(self.provider(), request, &request.version))
///     }
/// }
/// ```
#[async_trait]
pub trait PackageClient: Send + Sync {
    /// Ecosystem tag (`npm`, `nuget`, `dub`, `pub`).
    fn provider(&self) -> &'static str;

    /// Resolves a declared dependency against the registry.
    async fn fetch_package(&self, request: &PackageRequest) -> Result<PackageDocument>;
}
