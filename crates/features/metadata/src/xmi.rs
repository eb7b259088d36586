//! # XMI Documents
//!
//! Metadata domains are exchanged as CWM XMI. A logical model is a `CWMOLAP:Schema`
//! element; its properties are `CWM:Description` (`name`/`body`) and `CWM:TaggedValue`
//! (`tag`/`value`) elements that either sit inside the model or point back at it through
//! a `CWM:Description.modelElement` reference.
//!
//! Edits are applied by cutting byte ranges out of the original text, so everything that
//! is not removed is kept exactly as uploaded.

use crate::error::XmiError;
use fxhash::FxHashMap;
use roxmltree::{Document, Node, ParsingOptions};
use std::ops::Range;

/// Marks a model produced by the data source wizard.
pub const AGILE_BI_GENERATED_SCHEMA: &str = "AGILE_BI_GENERATED_SCHEMA";
pub const AGILE_BI_VERSION: &str = "AGILE_BI_VERSION";
pub const WIZARD_GENERATED_SCHEMA: &str = "WIZARD_GENERATED_SCHEMA";
/// Present on models that carry an embedded OLAP schema.
pub const OLAP_DIMENSIONS: &str = "olap_dimensions";
/// CWMOLAP elements that put dimensions into a model.
const DIMENSION_ELEMENTS: [&str; 2] = ["Schema.dimension", "Dimension"];

/// Properties stripped from generated models that are kept.
pub const GENERATED_MARKERS: [&str; 3] =
    [AGILE_BI_GENERATED_SCHEMA, AGILE_BI_VERSION, WIZARD_GENERATED_SCHEMA];

const CWM_NS: &str = "org.omg.xmi.namespace.CWM";
const CWMOLAP_NS: &str = "org.omg.xmi.namespace.CWMOLAP";
const XMI_ID: &str = "xmi.id";
const XMI_IDREF: &str = "xmi.idref";

/// A named property attached to a logical model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelProperty {
    name: String,
    value: Option<String>,
    range: Range<usize>,
}

impl ModelProperty {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// A logical model found in an XMI document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalModel {
    id: Option<String>,
    name: Option<String>,
    range: Range<usize>,
    properties: Vec<ModelProperty>,
    /// Elements outside the model that describe it or something inside it.
    detached: Vec<Range<usize>>,
    /// Declares OLAP dimensions as child elements.
    dimensions: bool,
}

impl LogicalModel {
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&ModelProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    #[must_use]
    pub fn properties(&self) -> &[ModelProperty] {
        &self.properties
    }

    /// Whether the model carries OLAP dimensions, either as an `olap_dimensions` property
    /// or as `CWMOLAP:Dimension` elements.
    #[must_use]
    pub fn is_olap(&self) -> bool {
        self.dimensions || self.has_property(OLAP_DIMENSIONS)
    }

    fn is_generated(&self) -> bool {
        self.has_property(AGILE_BI_GENERATED_SCHEMA)
    }
}

/// A parsed XMI payload.
#[derive(Debug, Clone)]
pub struct XmiDocument {
    text: String,
    models: Vec<LogicalModel>,
}

impl XmiDocument {
    /// Parses and indexes an XMI payload.
    ///
    /// # Errors
    /// * [`XmiError::Encoding`] if the payload is not UTF-8.
    /// * [`XmiError::Parse`] if the payload is not well-formed XML.
    pub fn parse(bytes: Vec<u8>) -> Result<Self, XmiError> {
        let text = String::from_utf8(bytes).map_err(|e| XmiError::Encoding {
            source: e.utf8_error(),
            context: Some("XMI payload".into()),
        })?;
        let models = scan(&text)?;
        Ok(Self { text, models })
    }

    #[must_use]
    pub fn logical_models(&self) -> &[LogicalModel] {
        &self.models
    }

    /// Removes wizard-generated schema artifacts.
    ///
    /// Generated models that carry OLAP dimensions are dropped entirely, together with
    /// any detached descriptions of them. Other generated models lose only the marker
    /// properties. Returns `true` if the document changed.
    ///
    /// # Errors
    /// Returns [`XmiError::Parse`] if the edited document cannot be re-indexed.
    pub fn strip_generated_schema(&mut self) -> Result<bool, XmiError> {
        let mut removals = Vec::new();

        for model in self.models.iter().filter(|m| m.is_generated()) {
            if model.is_olap() {
                removals.push(model.range.clone());
                removals.extend(model.detached.iter().cloned());
            } else {
                removals.extend(
                    model
                        .properties
                        .iter()
                        .filter(|p| GENERATED_MARKERS.contains(&p.name.as_str()))
                        .map(|p| p.range.clone()),
                );
            }
        }

        if removals.is_empty() {
            return Ok(false);
        }

        self.text = splice(&self.text, removals);
        self.models = scan(&self.text)?;
        Ok(true)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn to_bytes(self) -> Vec<u8> {
        self.text.into_bytes()
    }
}

fn scan(text: &str) -> Result<Vec<LogicalModel>, XmiError> {
    let options = ParsingOptions { allow_dtd: true, ..ParsingOptions::default() };
    let doc = Document::parse_with_options(text, options)?;

    let mut models = Vec::new();
    // xmi.id of every element inside a model -> that model's index
    let mut owners: FxHashMap<&str, usize> = FxHashMap::default();

    for node in doc.descendants().filter(is_model) {
        let index = models.len();
        for id in node.descendants().filter_map(|n| n.attribute(XMI_ID)) {
            owners.insert(id, index);
        }
        models.push(LogicalModel {
            id: node.attribute(XMI_ID).map(str::to_owned),
            name: node.attribute("name").map(str::to_owned),
            range: node.range(),
            properties: Vec::new(),
            detached: Vec::new(),
            dimensions: node.descendants().any(|n| is_dimension(&n)),
        });
    }

    for node in doc.descendants() {
        let Some((name, value)) = property_of(&node) else {
            continue;
        };
        let Some(owner) = owner_of(&node) else {
            continue;
        };
        let Some(&index) = owners.get(owner) else {
            continue;
        };

        let model = &mut models[index];
        let range = node.range();
        let inside = model.range.start <= range.start && range.end <= model.range.end;

        if model.id.as_deref() == Some(owner) {
            model.properties.push(ModelProperty {
                name: name.to_owned(),
                value: value.map(str::to_owned),
                range: range.clone(),
            });
        }
        if !inside {
            model.detached.push(range);
        }
    }

    Ok(models)
}

fn is_model(node: &Node<'_, '_>) -> bool {
    node.is_element()
        && node.tag_name().name() == "Schema"
        && node.tag_name().namespace() == Some(CWMOLAP_NS)
        && node.attribute(XMI_IDREF).is_none()
}

fn is_dimension(node: &Node<'_, '_>) -> bool {
    node.is_element()
        && node.tag_name().namespace() == Some(CWMOLAP_NS)
        && DIMENSION_ELEMENTS.contains(&node.tag_name().name())
}

/// `(name, value)` of a property element.
fn property_of<'a>(node: &Node<'a, '_>) -> Option<(&'a str, Option<&'a str>)> {
    if !node.is_element() || node.tag_name().namespace() != Some(CWM_NS) {
        return None;
    }
    match node.tag_name().name() {
        "Description" => node.attribute("name").map(|name| (name, node.attribute("body"))),
        "TaggedValue" => node.attribute("tag").map(|tag| (tag, node.attribute("value"))),
        _ => None,
    }
}

/// The element a property describes: an explicit `modelElement` reference, otherwise the
/// nearest enclosing element with an id.
fn owner_of<'a>(node: &Node<'a, '_>) -> Option<&'a str> {
    let reference = node
        .children()
        .find(|c| c.is_element() && c.tag_name().name().ends_with(".modelElement"))
        .and_then(|c| c.children().find_map(|r| r.attribute(XMI_IDREF)));

    reference.or_else(|| node.ancestors().skip(1).find_map(|a| a.attribute(XMI_ID)))
}

/// Cuts `ranges` out of `text`. A removed element also takes its own indentation line
/// with it when nothing else shares that line.
fn splice(text: &str, mut ranges: Vec<Range<usize>>) -> String {
    ranges.sort_by_key(|r| (r.start, std::cmp::Reverse(r.end)));

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    for range in ranges {
        if range.end <= cursor {
            continue;
        }
        let start = line_start(text, range.start).max(cursor);
        out.push_str(&text[cursor..start]);
        cursor = range.end;
    }

    out.push_str(&text[cursor..]);
    out
}

/// Widens `start` back to the preceding line break when only whitespace lies between.
/// A `\r\n` break is taken whole.
fn line_start(text: &str, start: usize) -> usize {
    let before = &text[..start];
    match before.rfind('\n') {
        Some(nl) if before[nl + 1..].chars().all(char::is_whitespace) => {
            if before[..nl].ends_with('\r') { nl - 1 } else { nl }
        }
        _ => start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XMI: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<XMI xmlns:CWM="org.omg.xmi.namespace.CWM" xmlns:CWMOLAP="org.omg.xmi.namespace.CWMOLAP" xmi.version="1.2">
  <XMI.content>
    <CWMOLAP:Schema name="Orders" xmi.id="a1">
      <CWM:Description body="TRUE" name="AGILE_BI_GENERATED_SCHEMA" type="String" xmi.id="a2"/>
      <CWM:Description body="2.0" name="AGILE_BI_VERSION" type="String" xmi.id="a3"/>
      <CWM:Description body="Orders" name="description" type="String" xmi.id="a4"/>
    </CWMOLAP:Schema>
  </XMI.content>
</XMI>
"#;

    #[test]
    fn test_models_and_properties_are_indexed() {
        let doc = XmiDocument::parse(XMI.as_bytes().to_vec()).unwrap();

        let models = doc.logical_models();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].id(), Some("a1"));
        assert_eq!(models[0].name(), Some("Orders"));
        assert_eq!(models[0].property(AGILE_BI_VERSION).and_then(ModelProperty::value), Some("2.0"));
        assert!(!models[0].has_property(WIZARD_GENERATED_SCHEMA));
    }

    #[test]
    fn test_markers_are_stripped_and_lines_removed() {
        let mut doc = XmiDocument::parse(XMI.as_bytes().to_vec()).unwrap();

        assert!(doc.strip_generated_schema().unwrap());
        assert!(!doc.as_str().contains("AGILE_BI"));
        assert!(doc.as_str().contains(
            "<CWMOLAP:Schema name=\"Orders\" xmi.id=\"a1\">\n      <CWM:Description body=\"Orders\""
        ));

        let model = &doc.logical_models()[0];
        assert_eq!(model.properties().len(), 1);
        assert!(!doc.strip_generated_schema().unwrap(), "second pass is a no-op");
    }

    #[test]
    fn test_splice_handles_nested_and_inline_ranges() {
        let text = "a\n  <x><y/></x>\nb <z/> c";
        let x = text.find("<x>").unwrap();
        let y = text.find("<y/>").unwrap();
        let z = text.find("<z/>").unwrap();

        let out = splice(text, vec![y..y + 4, x..x + 11, z..z + 4]);
        assert_eq!(out, "a\nb  c");
    }

    #[test]
    fn test_splice_takes_crlf_line_breaks_whole() {
        let text = "a\r\n  <x/>\r\nb";
        let x = text.find("<x/>").unwrap();

        let out = splice(text, vec![x..x + 4]);
        assert_eq!(out, "a\r\nb");
        assert!(!out.contains("\r\r\n"));
    }

    #[test]
    fn test_dimension_elements_mark_a_model_as_olap() {
        let xmi = r#"<XMI xmlns:CWM="org.omg.xmi.namespace.CWM" xmlns:CWMOLAP="org.omg.xmi.namespace.CWMOLAP">
  <CWMOLAP:Schema name="Sales" xmi.id="a1">
    <CWMOLAP:Schema.dimension>
      <CWMOLAP:Dimension name="Region" xmi.id="a2"/>
    </CWMOLAP:Schema.dimension>
  </CWMOLAP:Schema>
  <CWMOLAP:Schema name="Plain" xmi.id="b1"/>
</XMI>"#;
        let doc = XmiDocument::parse(xmi.as_bytes().to_vec()).unwrap();

        let models = doc.logical_models();
        assert!(models[0].is_olap());
        assert!(!models[0].has_property(OLAP_DIMENSIONS));
        assert!(!models[1].is_olap());
    }

    #[test]
    fn test_invalid_utf8_is_an_encoding_error() {
        let err = XmiDocument::parse(vec![0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, XmiError::Encoding { .. }));
    }

    #[test]
    fn test_malformed_xml_is_a_parse_error() {
        let err = XmiDocument::parse(b"<XMI><unclosed></XMI>".to_vec()).unwrap_err();
        assert!(matches!(err, XmiError::Parse { .. }));
    }
}
