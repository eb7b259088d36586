//! Well-known property names and MIME types shared by the slices.

/// Bundle property carrying the metadata domain identifier.
pub const DOMAIN_ID: &str = "domain-id";
/// Bundle property carrying the optional model annotations XML.
pub const ANNOTATIONS: &str = "annotations";

/// MIME type of XMI metadata documents.
pub const MIME_XMI: &str = "text/xmi+xml";
/// MIME type of locale bundles attached to a metadata import.
pub const MIME_PROPERTIES: &str = "text/x-java-properties";
