//! An in-process metadata repository.
//!
//! [`InMemoryDomainRepository`] implements every importer capability. It backs tests and
//! single-node deployments that do not need durable storage.

use crate::importer::{
    AclAwareDomainImporter, AnnotationsAwareDomainImporter, DomainImporter, DomainStorageError,
};
use bihub_domain::acl::RepositoryFileAcl;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::debug;

type Bundle = BTreeMap<String, String>;

#[derive(Debug, Default)]
struct StoredDomain {
    xmi: Vec<u8>,
    acl: Option<RepositoryFileAcl>,
    annotations: Option<String>,
    locales: BTreeMap<String, Bundle>,
}

/// Thread-safe, in-memory store of metadata domains.
#[derive(Debug, Default)]
pub struct InMemoryDomainRepository {
    domains: RwLock<FxHashMap<String, StoredDomain>>,
}

impl InMemoryDomainRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored XMI of a domain.
    #[must_use]
    pub fn domain(&self, domain_id: &str) -> Option<Vec<u8>> {
        self.domains.read().get(domain_id.trim()).map(|d| d.xmi.clone())
    }

    #[must_use]
    pub fn acl(&self, domain_id: &str) -> Option<RepositoryFileAcl> {
        self.domains.read().get(domain_id.trim()).and_then(|d| d.acl.clone())
    }

    #[must_use]
    pub fn annotations(&self, domain_id: &str) -> Option<String> {
        self.domains.read().get(domain_id.trim()).and_then(|d| d.annotations.clone())
    }

    /// Message bundle of a domain for one locale.
    #[must_use]
    pub fn locale(&self, domain_id: &str, locale: &str) -> Option<Bundle> {
        self.domains.read().get(domain_id.trim()).and_then(|d| d.locales.get(locale).cloned())
    }

    /// Sorted ids of all stored domains.
    #[must_use]
    pub fn domain_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.domains.read().keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    fn put(
        &self,
        xmi: &[u8],
        domain_id: &str,
        overwrite: bool,
        acl: Option<&RepositoryFileAcl>,
    ) -> Result<(), DomainStorageError> {
        let domain_id = require_id(domain_id)?;
        let mut domains = self.domains.write();

        if !overwrite && domains.contains_key(domain_id) {
            return Err(DomainStorageError::AlreadyExists {
                message: format!("Domain [{domain_id}] already exists").into(),
                context: None,
            });
        }

        let stored = domains.entry(domain_id.to_owned()).or_default();
        stored.xmi = xmi.to_vec();
        stored.acl = acl.cloned();

        debug!(domain_id, bytes = xmi.len(), overwrite, "Domain stored");
        Ok(())
    }
}

impl DomainImporter for InMemoryDomainRepository {
    fn store_domain(
        &self,
        xmi: &[u8],
        domain_id: &str,
        overwrite: bool,
    ) -> Result<(), DomainStorageError> {
        self.put(xmi, domain_id, overwrite, None)
    }

    fn add_localization_file(
        &self,
        domain_id: &str,
        locale: &str,
        properties: &[u8],
        merge: bool,
    ) -> Result<(), DomainStorageError> {
        let domain_id = require_id(domain_id)?;
        let mut domains = self.domains.write();

        let stored = domains.get_mut(domain_id).ok_or_else(|| DomainStorageError::Storage {
            message: format!("Domain [{domain_id}] does not exist").into(),
            context: Some(format!("locale {locale}").into()),
        })?;

        let incoming = parse_properties(&String::from_utf8_lossy(properties));
        let bundle = stored.locales.entry(locale.to_owned()).or_default();
        if !merge {
            bundle.clear();
        }
        bundle.extend(incoming);

        debug!(domain_id, locale, keys = bundle.len(), merge, "Locale bundle stored");
        Ok(())
    }
}

impl AclAwareDomainImporter for InMemoryDomainRepository {
    fn store_domain_with_acl(
        &self,
        xmi: &[u8],
        domain_id: &str,
        overwrite: bool,
        acl: Option<&RepositoryFileAcl>,
    ) -> Result<(), DomainStorageError> {
        self.put(xmi, domain_id, overwrite, acl)
    }
}

impl AnnotationsAwareDomainImporter for InMemoryDomainRepository {
    fn store_annotations_xml(&self, domain_id: &str, xml: &str) -> Result<(), DomainStorageError> {
        let domain_id = require_id(domain_id)?;
        let mut domains = self.domains.write();

        let stored = domains.get_mut(domain_id).ok_or_else(|| DomainStorageError::Storage {
            message: format!("Domain [{domain_id}] does not exist").into(),
            context: Some("annotations".into()),
        })?;
        stored.annotations = Some(xml.to_owned());
        Ok(())
    }
}

fn require_id(domain_id: &str) -> Result<&str, DomainStorageError> {
    let trimmed = domain_id.trim();
    if trimmed.is_empty() {
        return Err(DomainStorageError::DomainIdNull {
            message: "Domain id must not be blank".into(),
            context: None,
        });
    }
    Ok(trimmed)
}

/// Reads `key=value` (or `key: value`) lines; `#` and `!` start comments.
fn parse_properties(text: &str) -> Bundle {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .filter_map(|line| line.split_once(['=', ':']))
        .map(|(k, v)| (k.trim().to_owned(), v.trim().to_owned()))
        .collect()
}
