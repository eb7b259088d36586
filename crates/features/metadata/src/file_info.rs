//! File name conventions for metadata uploads.
//!
//! A domain is uploaded as `<name>.xmi`; its translations as
//! `<name>_<ll>[_<CC>].properties`, e.g. `steel-wheels_en_US.properties`.

use regex::Regex;
use std::sync::LazyLock;

static LOCALE_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<base>.+?)_(?<locale>[a-z]{2,3}(?:_[A-Z]{2})?)\.properties$")
        .expect("locale file pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataFileType {
    Xmi,
    Properties,
    Unknown,
}

/// What a metadata upload's file name says about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataFileInfo {
    path: String,
    file_type: MetadataFileType,
    locale: Option<String>,
    domain_id: Option<String>,
}

impl MetadataFileInfo {
    /// Inspects an uploaded file name. Leading directories are ignored.
    #[must_use]
    pub fn new(name: &str) -> Self {
        let file_name = name.rsplit(['/', '\\']).next().unwrap_or(name);
        let path = format!("/{}", name.trim_start_matches('/'));

        let (file_type, locale, domain_id) = if file_name.ends_with(".xmi") {
            (MetadataFileType::Xmi, None, Some(file_name.to_owned()))
        } else if file_name.ends_with(".properties") {
            let captures = LOCALE_FILE.captures(file_name);
            (
                MetadataFileType::Properties,
                captures.as_ref().map(|c| c["locale"].to_owned()),
                captures.as_ref().map(|c| format!("{}.xmi", &c["base"])),
            )
        } else {
            (MetadataFileType::Unknown, None, None)
        };

        Self { path, file_type, locale, domain_id }
    }

    /// Repository path of the file, always absolute.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub const fn file_type(&self) -> MetadataFileType {
        self.file_type
    }

    /// Locale of a translation bundle, e.g. `en_US`.
    #[must_use]
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Domain the file belongs to, derived from its name.
    #[must_use]
    pub fn domain_id(&self) -> Option<&str> {
        self.domain_id.as_deref()
    }
}
