//! # Certificate Template Model
//!
//! A single type hierarchy that is both the Rust API and the persisted JSON
//! document. `Template` is constructible in Rust and deserializable from the
//! document stored by the persistence collaborator.
//!
//! ```
//! use laurea::template::Template;
//!
//! let json = r#"{"name": "Completion", "elements": [
//!     {"kind": "text", "id": 1, "x": 561.5, "y": 200.0,
//!      "value": "{course_name}", "font_size": 32.0, "is_required": true}
//! ]}"#;
//! let template = Template::from_json(json).unwrap();
//! assert_eq!(template.elements.len(), 1);
//! ```
//!
//! Element ordering has no rendering meaning (everything is positioned
//! absolutely) but insertion order is preserved across save/load.

pub mod types;

pub use types::*;

use serde::{Deserialize, Serialize};

use crate::error::LaureaError;

/// A certificate template: a named, ordered collection of positioned
/// elements. The surrounding id, thumbnail, and visibility flag are owned by
/// the persistence collaborator, not by this type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Template {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Template {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: Vec::new(),
        }
    }

    /// Serialize to the persisted document form.
    pub fn to_json(&self) -> Result<String, LaureaError> {
        serde_json::to_string(self)
            .map_err(|e| LaureaError::Parse(format!("Failed to serialize template: {}", e)))
    }

    /// Deserialize a persisted document.
    ///
    /// Malformed input yields `LaureaError::Parse` and nothing else; this
    /// is a pure constructor, so a caller's previous template is untouched.
    pub fn from_json(data: &str) -> Result<Template, LaureaError> {
        serde_json::from_str(data)
            .map_err(|e| LaureaError::Parse(format!("Malformed template document: {}", e)))
    }

    pub fn element(&self, id: u64) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn element_mut(&mut self, id: u64) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    /// Whether an element instantiating this catalog entry already exists.
    pub fn has_required_field(&self, field: RequiredField) -> bool {
        self.elements.iter().any(|e| e.required_field() == Some(field))
    }

    /// Whether an asset placeholder of this kind already exists.
    pub fn has_placeholder(&self, kind: PlaceholderKind) -> bool {
        self.elements.iter().any(|e| e.placeholder_type() == Some(kind))
    }
}
