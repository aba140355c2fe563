//! # Enum Directory
//!
//! Lazy directory of the enum types published by one API version. Lookups go
//! through the version's enums namespace in the [`Catalog`], unwrapping the
//! wrapper-message convention so callers see the nested enum directly. The
//! sorted name listing is computed on first use and memoized; the directory
//! itself is immutable, so the memo never goes stale.
use crate::catalog::Catalog;
use prost_reflect::EnumDescriptor;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnumLookupError {
    #[error("no enum named '{name}' in version {version}")]
    NoSuchEnum { name: String, version: String },
}

/// Read-only view over the enums of a single API version.
#[derive(Debug, Clone)]
pub struct EnumDirectory {
    catalog: Catalog,
    version: String,
    names: Arc<OnceLock<Vec<String>>>,
}

impl EnumDirectory {
    pub(crate) fn new(catalog: Catalog, version: &str) -> Self {
        Self {
            catalog,
            version: version.to_owned(),
            names: Arc::new(OnceLock::new()),
        }
    }

    /// The version this directory serves.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Sorted simple names of every enum in this version.
    pub fn names(&self) -> &[String] {
        self.names
            .get_or_init(|| self.catalog.enum_names(&self.version))
    }

    /// Looks up an enum by simple name, e.g. `"CampaignStatusEnum"`.
    pub fn get(&self, name: &str) -> Result<EnumDescriptor, EnumLookupError> {
        // The memoized listing doubles as an existence check, so repeated
        // misses never rescan the descriptor pool.
        if !self.names().iter().any(|known| known == name) {
            return Err(EnumLookupError::NoSuchEnum {
                name: name.to_owned(),
                version: self.version.clone(),
            });
        }
        self.catalog
            .enum_in(&self.version, name)
            .ok_or_else(|| EnumLookupError::NoSuchEnum {
                name: name.to_owned(),
                version: self.version.clone(),
            })
    }

    /// Value names of one enum, in declaration order.
    pub fn value_names(&self, name: &str) -> Result<Vec<String>, EnumLookupError> {
        let descriptor = self.get(name)?;
        Ok(descriptor
            .values()
            .map(|value| value.name().to_owned())
            .collect())
    }
}
