//! NuGet v3 service index model and resolver priority table.
//!
//! See <https://learn.microsoft.com/nuget/api/overview> for the resource
//! types a service index can advertise.

use serde::Deserialize;

/// Version listing capability offered by a NuGet resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceCapability {
    /// Flat container: `{service}/{id}/index.json` with a `versions` array
    PackageBaseAddress,
    /// Autocomplete: `{service}?id={id}` with a `data` array
    SearchAutocomplete,
    /// Registration pages with `catalogEntry.version` leaves
    Registrations,
}

/// Entry of the resolver priority table.
#[derive(Debug, PartialEq, Eq)]
pub struct ResolverDescriptor {
    pub capability_type: &'static str,
    pub priority: usize,
    pub capability: ServiceCapability,
}

const fn descriptor(
    capability_type: &'static str,
    priority: usize,
    capability: ServiceCapability,
) -> ResolverDescriptor {
    ResolverDescriptor {
        capability_type,
        priority,
        capability,
    }
}

/// Resource types understood by vlens, most preferred first.
pub static SERVICE_RESOLVERS: [ResolverDescriptor; 9] = [
    descriptor("PackageBaseAddress/3.0.0", 0, ServiceCapability::PackageBaseAddress),
    descriptor("SearchAutocompleteService", 1, ServiceCapability::SearchAutocomplete),
    descriptor("SearchAutocompleteService/3.0.0-beta", 2, ServiceCapability::SearchAutocomplete),
    descriptor("SearchAutocompleteService/3.0.0-rc", 3, ServiceCapability::SearchAutocomplete),
    descriptor("RegistrationsBaseUrl", 4, ServiceCapability::Registrations),
    descriptor("RegistrationsBaseUrl/3.0.0-beta", 5, ServiceCapability::Registrations),
    descriptor("RegistrationsBaseUrl/3.0.0-rc", 6, ServiceCapability::Registrations),
    descriptor("RegistrationsBaseUrl/3.4.0", 7, ServiceCapability::Registrations),
    descriptor("RegistrationsBaseUrl/3.6.0", 8, ServiceCapability::Registrations),
];

/// `@type` of a resource: a single type name or a list of aliases.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ResourceType {
    One(String),
    Many(Vec<String>),
}

impl ResourceType {
    pub fn contains(&self, capability_type: &str) -> bool {
        match self {
            Self::One(t) => t == capability_type,
            Self::Many(types) => types.iter().any(|t| t == capability_type),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceResource {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub resource_type: ResourceType,
}

/// A NuGet v3 service index document (`index.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceIndex {
    #[serde(default)]
    pub resources: Vec<ServiceResource>,
}

impl ServiceIndex {
    /// Picks the most preferred advertised capability.
    ///
    /// The priority table is scanned in order and the first type the index
    /// advertises wins, regardless of where it appears in `resources`.
    ///
    /// # Examples
    ///
    /// ```
    /// use vlens_nuget::service::{ServiceCapability, ServiceIndex};
    ///
    /// let index: ServiceIndex = serde_json::from_str(r#"{
    ///   "resources": [
    ///     { "@id": "https://example.com/reg/", "@type": "RegistrationsBaseUrl/3.6.0" },
    ///     { "@id": "https://example.com/flat/", "@type": "PackageBaseAddress/3.0.0" }
    ///   ]
    /// }"#).unwrap();
    ///
    /// let (resolver, url) = index.select_resolver().unwrap();
    /// assert_eq!(resolver.capability, ServiceCapability::PackageBaseAddress);
    /// assert_eq!(url, "https://example.com/flat/");
    /// ```
    pub fn select_resolver(&self) -> Option<(&'static ResolverDescriptor, &str)> {
        SERVICE_RESOLVERS.iter().find_map(|resolver| {
            self.resources
                .iter()
                .find(|r| r.resource_type.contains(resolver.capability_type))
                .map(|r| (resolver, r.id.as_str()))
        })
    }
}
