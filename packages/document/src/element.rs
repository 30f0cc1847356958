//! Element records and their style maps.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque element identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ElementId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A single presentation property value (`"10px"`, `"#fff"`, `1.5`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(f64),
    Text(String),
}

impl StyleValue {
    /// Numbers must be finite to survive a trip through the history engine
    pub fn is_valid(&self) -> bool {
        match self {
            StyleValue::Number(n) => n.is_finite(),
            StyleValue::Text(_) => true,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            StyleValue::Text(s) => Some(s),
            StyleValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            StyleValue::Number(n) => Some(*n),
            StyleValue::Text(_) => None,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Number(n) => write!(f, "{}", n),
            StyleValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Text(value)
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Number(value)
    }
}

/// Open set of presentation properties (position, size, color, typography, ...)
///
/// Ordered so that diffs and serialized snapshots are deterministic.
pub type Style = BTreeMap<String, StyleValue>;

/// Build a [`Style`] from `(key, value)` pairs
pub fn style<K, V, I>(pairs: I) -> Style
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<StyleValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// A positioned node in the edited document tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,

    /// Display name shown in the layers panel
    pub name: String,

    #[serde(default)]
    pub style: Style,

    /// Containing element, `None` for roots
    #[serde(default)]
    pub parent_id: Option<ElementId>,

    /// Ordered child ids (paint and layer-panel order)
    #[serde(default)]
    pub children: Vec<ElementId>,
}

impl Element {
    /// Create a detached leaf element with an empty style
    pub fn new(id: impl Into<ElementId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            style: Style::new(),
            parent_id: None,
            children: Vec::new(),
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Look up a single style property
    pub fn style_value(&self, key: &str) -> Option<&StyleValue> {
        self.style.get(key)
    }
}
