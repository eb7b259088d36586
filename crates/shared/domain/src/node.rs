//! Generic hierarchical nodes used as a persistence target for structured records.
//!
//! A [`DataNode`] holds uniquely named scalar properties and an ordered list of child
//! nodes. Nodes serialize with `serde`, so a tree can be persisted or transported as JSON.

use serde::{Deserialize, Serialize};

/// A scalar value stored on a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum PropertyValue {
    String(String),
    Long(i64),
    Double(f64),
    Boolean(bool),
}

impl PropertyValue {
    /// String view of the value. Numbers and booleans are rendered as text.
    #[must_use]
    pub fn string(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Long(v) => v.to_string(),
            Self::Double(v) => v.to_string(),
            Self::Boolean(v) => v.to_string(),
        }
    }

    /// Numeric view of the value. Unparsable text reads as `0`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn long(&self) -> i64 {
        match self {
            Self::String(s) => s.trim().parse().unwrap_or_default(),
            Self::Long(v) => *v,
            Self::Double(v) => *v as i64,
            Self::Boolean(v) => i64::from(*v),
        }
    }

    /// Boolean view of the value. Only `true` (any case) and non-zero numbers are truthy.
    #[must_use]
    pub fn boolean(&self) -> bool {
        match self {
            Self::String(s) => s.trim().eq_ignore_ascii_case("true"),
            Self::Long(v) => *v != 0,
            Self::Double(v) => *v != 0.0,
            Self::Boolean(v) => *v,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        Self::Long(i64::from(value))
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// A named scalar property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataProperty {
    pub name: String,
    pub value: PropertyValue,
}

/// A named tree node with scalar properties and child nodes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataNode {
    name: String,
    #[serde(default)]
    properties: Vec<DataProperty>,
    #[serde(default)]
    nodes: Vec<Self>,
}

impl DataNode {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), properties: Vec::new(), nodes: Vec::new() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets a property, replacing any existing property of the same name in place.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        let name = name.into();
        let value = value.into();
        match self.properties.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.value = value,
            None => self.properties.push(DataProperty { name, value }),
        }
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.iter().find(|p| p.name == name).map(|p| &p.value)
    }

    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    /// Properties in insertion order.
    #[must_use]
    pub fn properties(&self) -> &[DataProperty] {
        &self.properties
    }

    /// Appends a child node and returns a mutable handle to it.
    pub fn add_node(&mut self, name: impl Into<String>) -> &mut Self {
        self.nodes.push(Self::new(name));
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    /// Returns the first child with the given name.
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&Self> {
        self.nodes.iter().find(|n| n.name == name)
    }

    #[must_use]
    pub fn nodes(&self) -> &[Self] {
        &self.nodes
    }
}
