//! Upload bundles handed to platform import handlers.

use crate::acl::RepositoryFileAcl;
use crate::constants::{ANNOTATIONS, DOMAIN_ID};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use typed_builder::TypedBuilder;

/// A single unit of import: a payload stream, its properties, and optional child bundles.
///
/// Bundles are produced by an uploader and consumed exactly once by a handler. The payload
/// is exposed as a stream; handlers that need to inspect it must buffer it first.
///
/// # Example
/// ```rust
/// use bihub_domain::bundle::ImportBundle;
/// use std::io::Cursor;
///
/// let bundle = ImportBundle::builder()
///     .name("sales.xmi")
///     .input(Box::new(Cursor::new(b"<xmi/>".to_vec())))
///     .property("domain-id", "sales.xmi")
///     .overwrite(true)
///     .build();
///
/// assert_eq!(bundle.domain_id(), Some("sales.xmi"));
/// ```
#[derive(TypedBuilder)]
pub struct ImportBundle {
    /// File name of the payload, e.g. `sales_en_US.properties`.
    #[builder(setter(into))]
    pub name: String,

    /// Payload stream. Defaults to an empty stream.
    #[builder(default = Box::new(std::io::empty()) as Box<dyn Read + Send>)]
    pub input: Box<dyn Read + Send>,

    #[builder(via_mutators, mutators(
        pub fn property(&mut self, key: impl Into<String>, value: impl Into<String>) {
            self.properties.insert(key.into(), value.into());
        }
    ))]
    pub properties: BTreeMap<String, String>,

    /// Keep embedded generated-schema content verbatim.
    #[builder(default)]
    pub preserve_dsw: bool,

    /// Replace an existing artifact with the same identifier.
    #[builder(default)]
    pub overwrite: bool,

    /// Apply [`ImportBundle::acl`] when the importer supports access control.
    #[builder(default)]
    pub apply_acl: bool,

    #[builder(default, setter(strip_option))]
    pub acl: Option<RepositoryFileAcl>,

    #[builder(default, setter(strip_option, into))]
    pub mime_type: Option<String>,

    #[builder(via_mutators, mutators(
        pub fn child(&mut self, bundle: ImportBundle) {
            self.children.push(bundle);
        }
    ))]
    pub children: Vec<ImportBundle>,
}

impl ImportBundle {
    /// Returns a bundle property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Returns the `domain-id` property, if present.
    #[must_use]
    pub fn domain_id(&self) -> Option<&str> {
        self.property(DOMAIN_ID)
    }

    /// Returns the `annotations` property, if present.
    #[must_use]
    pub fn annotations(&self) -> Option<&str> {
        self.property(ANNOTATIONS)
    }

    /// Returns the ACL to hand to the importer, honoring the `apply_acl` flag.
    #[must_use]
    pub const fn effective_acl(&self) -> Option<&RepositoryFileAcl> {
        if self.apply_acl { self.acl.as_ref() } else { None }
    }

    /// Takes the payload stream, leaving an empty one in its place.
    pub fn take_input(&mut self) -> Box<dyn Read + Send> {
        std::mem::replace(&mut self.input, Box::new(std::io::empty()))
    }
}

impl fmt::Debug for ImportBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportBundle")
            .field("name", &self.name)
            .field("properties", &self.properties)
            .field("preserve_dsw", &self.preserve_dsw)
            .field("overwrite", &self.overwrite)
            .field("apply_acl", &self.apply_acl)
            .field("acl", &self.acl)
            .field("mime_type", &self.mime_type)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}
