//! # Versioned Descriptor Catalog
//!
//! The catalog is a read-only namespace of generated artifacts, partitioned
//! per API version. It is built once from one or more encoded
//! `FileDescriptorSet`s and then shared freely: every lookup the resolvers
//! perform is a plain map access, never an import probe.
//!
//! ## Layout
//!
//! Versions are discovered from package paths: any path segment matching
//! `v<digits>` (e.g. `adsapi.v1.resources`) starts a version slice, and the
//! segment that follows it names the sub-namespace. Each version carries the
//! same five sub-namespaces:
//!
//! * `common` - shared value messages
//! * `enums` - wrapper messages (`FooEnum`) holding one nested enum each
//! * `errors` - failure detail messages attached to response trailers
//! * `resources` - the API's addressable entities
//! * `services` - service definitions plus their request/response messages
use prost_reflect::{
    DescriptorPool, EnumDescriptor, MessageDescriptor, ServiceDescriptor,
};
use prost_types::FileDescriptorSet;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Errors that can occur while building a [`Catalog`].
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to decode file descriptor set: '{0}'")]
    Descriptor(#[from] prost_reflect::DescriptorError),
    #[error("No versioned packages (segment matching 'v<digits>') found in the descriptor set")]
    NoVersions,
}

/// The five sub-namespaces of a version slice, in lookup priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Namespace {
    Common,
    Enums,
    Errors,
    Resources,
    Services,
}

/// Fixed priority order used by type resolution: the first sub-namespace
/// containing a matching name wins.
pub const NAMESPACE_SEARCH_ORDER: [Namespace; 5] = [
    Namespace::Common,
    Namespace::Enums,
    Namespace::Errors,
    Namespace::Resources,
    Namespace::Services,
];

impl Namespace {
    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "common" => Some(Namespace::Common),
            "enums" => Some(Namespace::Enums),
            "errors" => Some(Namespace::Errors),
            "resources" => Some(Namespace::Resources),
            "services" => Some(Namespace::Services),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Common => "common",
            Namespace::Enums => "enums",
            Namespace::Errors => "errors",
            Namespace::Resources => "resources",
            Namespace::Services => "services",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default)]
struct VersionIndex {
    services: BTreeMap<String, ServiceDescriptor>,
    messages: BTreeMap<Namespace, BTreeMap<String, MessageDescriptor>>,
    // Wrapper message name -> the nested enum it holds.
    enums: BTreeMap<String, EnumDescriptor>,
    failure: Option<MessageDescriptor>,
}

#[derive(Debug)]
struct CatalogInner {
    versions: BTreeMap<String, VersionIndex>,
    // Version tags ordered newest-first.
    ordered: Vec<String>,
}

/// A versioned, read-only registry of message, enum and service descriptors.
///
/// Cheap to clone; all clones share the same immutable index.
#[derive(Debug, Clone)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
}

/// Incrementally merges descriptor sets before building a [`Catalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    pool: DescriptorPool,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes an encoded `FileDescriptorSet` into the builder's pool.
    pub fn descriptor_set(mut self, bytes: &[u8]) -> Result<Self, CatalogError> {
        self.pool.decode_file_descriptor_set(bytes)?;
        Ok(self)
    }

    pub fn build(self) -> Result<Catalog, CatalogError> {
        Catalog::from_pool(self.pool)
    }
}

impl Catalog {
    /// Builds a catalog from a single encoded `FileDescriptorSet`, discovering
    /// every version tag present in its package paths.
    pub fn from_descriptor_set(bytes: &[u8]) -> Result<Self, CatalogError> {
        let pool = DescriptorPool::decode(bytes)?;
        Self::from_pool(pool)
    }

    /// Builds a catalog from an already decoded `FileDescriptorSet`.
    pub fn from_file_descriptor_set(fd_set: FileDescriptorSet) -> Result<Self, CatalogError> {
        let pool = DescriptorPool::from_file_descriptor_set(fd_set)?;
        Self::from_pool(pool)
    }

    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    fn from_pool(pool: DescriptorPool) -> Result<Self, CatalogError> {
        let mut versions: BTreeMap<String, VersionIndex> = BTreeMap::new();

        for message in pool.all_messages() {
            let Some((version, namespace)) = split_package(message.package_name()) else {
                continue;
            };
            let index = versions.entry(version).or_default();

            if namespace == Namespace::Enums {
                if let Some(nested) = message.child_enums().next() {
                    index.enums.insert(message.name().to_string(), nested);
                }
            }
            if namespace == Namespace::Errors
                && message.name().ends_with("Failure")
                && index.failure.is_none()
            {
                index.failure = Some(message.clone());
            }

            index
                .messages
                .entry(namespace)
                .or_default()
                .entry(message.name().to_string())
                .or_insert(message);
        }

        for service in pool.services() {
            let Some((version, Namespace::Services)) = split_package(service.package_name())
            else {
                continue;
            };
            versions
                .entry(version)
                .or_default()
                .services
                .insert(service.name().to_string(), service);
        }

        if versions.is_empty() {
            return Err(CatalogError::NoVersions);
        }

        let mut ordered: Vec<String> = versions.keys().cloned().collect();
        ordered.sort_by_key(|tag| std::cmp::Reverse(version_number(tag)));

        Ok(Self {
            inner: Arc::new(CatalogInner { versions, ordered }),
        })
    }

    /// Version tags known to this catalog, newest first.
    pub fn versions(&self) -> &[String] {
        &self.inner.ordered
    }

    /// The newest version tag; used when neither the configuration nor the
    /// caller pins one.
    pub fn latest_version(&self) -> &str {
        &self.inner.ordered[0]
    }

    pub fn contains_version(&self, version: &str) -> bool {
        self.inner.versions.contains_key(version)
    }

    fn index(&self, version: &str) -> Option<&VersionIndex> {
        self.inner.versions.get(version)
    }

    /// Looks up a service definition by its simple name, e.g. `CampaignService`.
    pub fn service(&self, version: &str, name: &str) -> Option<ServiceDescriptor> {
        self.index(version)?.services.get(name).cloned()
    }

    pub fn service_names(&self, version: &str) -> Vec<String> {
        self.index(version)
            .map(|index| index.services.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Looks up a message within one sub-namespace.
    pub fn message(&self, version: &str, namespace: Namespace, name: &str) -> Option<MessageDescriptor> {
        self.index(version)?
            .messages
            .get(&namespace)?
            .get(name)
            .cloned()
    }

    /// Searches the sub-namespaces in [`NAMESPACE_SEARCH_ORDER`] and returns
    /// the first match.
    pub fn find_message(&self, version: &str, name: &str) -> Option<(Namespace, MessageDescriptor)> {
        NAMESPACE_SEARCH_ORDER
            .iter()
            .find_map(|namespace| Some((*namespace, self.message(version, *namespace, name)?)))
    }

    /// All (namespace, simple name) message pairs of a version slice.
    pub fn message_names(&self, version: &str) -> Vec<(Namespace, String)> {
        let Some(index) = self.index(version) else {
            return Vec::new();
        };
        index
            .messages
            .iter()
            .flat_map(|(namespace, names)| {
                names.keys().map(|name| (*namespace, name.clone()))
            })
            .collect()
    }

    /// The enum nested inside the wrapper message `name`, e.g. the
    /// `CampaignStatus` enum inside `CampaignStatusEnum`.
    pub fn enum_in(&self, version: &str, name: &str) -> Option<EnumDescriptor> {
        self.index(version)?.enums.get(name).cloned()
    }

    /// Sorted wrapper-message names of the version's enums namespace.
    pub fn enum_names(&self, version: &str) -> Vec<String> {
        self.index(version)
            .map(|index| index.enums.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// The failure-details message of the version's errors namespace.
    pub fn failure_descriptor(&self, version: &str) -> Option<MessageDescriptor> {
        self.index(version)?.failure.clone()
    }

    /// The trailing-metadata key carrying encoded failure details, derived
    /// from the failure message's full name: `adsapi.v1.errors.adsfailure-bin`.
    pub fn failure_trailer_key(&self, version: &str) -> Option<String> {
        let failure = self.failure_descriptor(version)?;
        Some(format!("{}-bin", failure.full_name().to_ascii_lowercase()))
    }
}

// Splits `adsapi.v1.resources` into ("v1", Resources). Packages without a
// version segment or a known namespace segment are skipped.
fn split_package(package: &str) -> Option<(String, Namespace)> {
    let mut segments = package.split('.');
    while let Some(segment) = segments.next() {
        if is_version_tag(segment) {
            let namespace = Namespace::from_segment(segments.next()?)?;
            return Some((segment.to_string(), namespace));
        }
    }
    None
}

fn is_version_tag(segment: &str) -> bool {
    segment.len() > 1
        && segment.starts_with('v')
        && segment[1..].bytes().all(|b| b.is_ascii_digit())
}

fn version_number(tag: &str) -> u64 {
    tag[1..].parse().unwrap_or(0)
}
