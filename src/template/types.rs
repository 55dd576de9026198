//! Element struct types for the certificate template model.
//!
//! All types derive `Serialize + Deserialize` so the same types work for
//! both Rust API construction and the persisted JSON document. Optional
//! fields are omitted when absent, never written as null; the persisted
//! form round-trips element-for-element.

use serde::{Deserialize, Serialize};

/// Fixed canvas width in logical units (A4 landscape at 96 DPI).
pub const CANVAS_WIDTH: f64 = 1123.0;
/// Fixed canvas height in logical units.
pub const CANVAS_HEIGHT: f64 = 794.0;

/// Font weight for text elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Horizontal alignment of wrapped text within its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// The two asset placeholder kinds a template may carry (one of each, max).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderKind {
    Logo,
    Signature,
}

impl PlaceholderKind {
    pub fn label(&self) -> &'static str {
        match self {
            PlaceholderKind::Logo => "Logo",
            PlaceholderKind::Signature => "Signature",
        }
    }

    /// Source reference stored on a freshly inserted placeholder element.
    pub fn source(&self) -> &'static str {
        match self {
            PlaceholderKind::Logo => "placeholder://logo",
            PlaceholderKind::Signature => "placeholder://signature",
        }
    }

    /// Default box position when inserted: logo top-right, signature
    /// bottom-left.
    pub fn default_position(&self) -> (f64, f64) {
        match self {
            PlaceholderKind::Logo => (963.0, 130.0),
            PlaceholderKind::Signature => (280.0, 640.0),
        }
    }

    /// Default box size when inserted.
    pub fn default_size(&self) -> (f64, f64) {
        match self {
            PlaceholderKind::Logo => (150.0, 150.0),
            PlaceholderKind::Signature => (220.0, 90.0),
        }
    }
}

/// The closed catalog of required fields. Each maps to one substitution
/// token and carries the default style used when first inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    CourseName,
    StudentName,
    IssueDate,
    Instructor,
    Duration,
}

impl RequiredField {
    pub const ALL: [RequiredField; 5] = [
        RequiredField::CourseName,
        RequiredField::StudentName,
        RequiredField::IssueDate,
        RequiredField::Instructor,
        RequiredField::Duration,
    ];

    /// The literal token substituted by the resolver.
    pub fn token(&self) -> &'static str {
        match self {
            RequiredField::CourseName => "{course_name}",
            RequiredField::StudentName => "{student_name}",
            RequiredField::IssueDate => "{date}",
            RequiredField::Instructor => "{instructor}",
            RequiredField::Duration => "{duration}",
        }
    }

    /// Human-readable name shown in the editor and in the bracketed
    /// missing-value fallback.
    pub fn label(&self) -> &'static str {
        match self {
            RequiredField::CourseName => "Course Name",
            RequiredField::StudentName => "Participant Name",
            RequiredField::IssueDate => "Issue Date",
            RequiredField::Instructor => "Instructor Name",
            RequiredField::Duration => "Duration",
        }
    }

    /// Default font size when first inserted.
    pub fn default_font_size(&self) -> f32 {
        match self {
            RequiredField::CourseName => 32.0,
            RequiredField::StudentName => 40.0,
            RequiredField::IssueDate => 18.0,
            RequiredField::Instructor => 20.0,
            RequiredField::Duration => 18.0,
        }
    }

    /// Default font weight when first inserted.
    pub fn default_font_weight(&self) -> FontWeight {
        match self {
            RequiredField::CourseName | RequiredField::StudentName => FontWeight::Bold,
            _ => FontWeight::Normal,
        }
    }
}

fn default_font_family() -> String {
    "serif".to_string()
}

fn default_color() -> String {
    "#1f2937".to_string()
}

/// Positioned text unit. `value` may contain zero or more catalog tokens;
/// the resolver substitutes them without mutating the template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    pub id: u64,
    /// Anchor position in canvas space. Rendering is centered on (x, y).
    pub x: f64,
    pub y: f64,
    pub value: String,
    pub font_size: f32,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default = "default_color")]
    pub color: String,
    /// Wrap width in canvas units. ≤ 0 means intrinsic (no wrapping).
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Positioned image unit. `value` is an image source reference: a data URI,
/// an uploaded-asset URL, or a `placeholder://` reference for the generated
/// labeled box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageElement {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub value: String,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder_type: Option<PlaceholderKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// One positioned visual unit in a template.
///
/// The `#[serde(tag = "kind")]` attribute yields persisted JSON like
/// `{"kind": "text", "id": 1, "value": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    Text(TextElement),
    Image(ImageElement),
}

impl Element {
    pub fn id(&self) -> u64 {
        match self {
            Element::Text(t) => t.id,
            Element::Image(i) => i.id,
        }
    }

    pub fn position(&self) -> (f64, f64) {
        match self {
            Element::Text(t) => (t.x, t.y),
            Element::Image(i) => (i.x, i.y),
        }
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        match self {
            Element::Text(t) => {
                t.x = x;
                t.y = y;
            }
            Element::Image(i) => {
                i.x = x;
                i.y = y;
            }
        }
    }

    /// The catalog entry this element instantiates, if any. Matching is by
    /// exact token equality, which is also how uniqueness is enforced.
    pub fn required_field(&self) -> Option<RequiredField> {
        match self {
            Element::Text(t) => RequiredField::ALL.into_iter().find(|f| f.token() == t.value),
            Element::Image(_) => None,
        }
    }

    pub fn placeholder_type(&self) -> Option<PlaceholderKind> {
        match self {
            Element::Image(i) => i.placeholder_type,
            Element::Text(_) => None,
        }
    }
}

/// Classified image source reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// `data:<mime>;base64,<payload>`
    DataUri(String),
    /// `http://` or `https://` asset URL
    Url(String),
    /// Generated labeled box for an unbound asset placeholder
    Placeholder(PlaceholderKind),
}

impl ImageSource {
    /// Classify a stored source reference string.
    pub fn parse(value: &str) -> Result<ImageSource, crate::LaureaError> {
        if value == "placeholder://logo" {
            Ok(ImageSource::Placeholder(PlaceholderKind::Logo))
        } else if value == "placeholder://signature" {
            Ok(ImageSource::Placeholder(PlaceholderKind::Signature))
        } else if value.starts_with("data:") {
            Ok(ImageSource::DataUri(value.to_string()))
        } else if value.starts_with("http://") || value.starts_with("https://") {
            Ok(ImageSource::Url(value.to_string()))
        } else {
            Err(crate::LaureaError::Asset(format!(
                "Unrecognized image source reference: {}",
                value
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_tokens_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for field in RequiredField::ALL {
            assert!(seen.insert(field.token()), "duplicate token {}", field.token());
        }
    }

    #[test]
    fn element_matches_catalog_by_exact_value() {
        let el = Element::Text(TextElement {
            id: 1,
            x: 0.0,
            y: 0.0,
            value: "{student_name}".into(),
            font_size: 40.0,
            font_family: default_font_family(),
            font_weight: FontWeight::Bold,
            color: default_color(),
            width: 0.0,
            align: TextAlign::Left,
            is_required: true,
            label: Some("Participant Name".into()),
        });
        assert_eq!(el.required_field(), Some(RequiredField::StudentName));
    }

    #[test]
    fn embedded_token_is_not_a_catalog_match() {
        let el = Element::Text(TextElement {
            id: 1,
            x: 0.0,
            y: 0.0,
            value: "Awarded to {student_name}".into(),
            font_size: 20.0,
            font_family: default_font_family(),
            font_weight: FontWeight::Normal,
            color: default_color(),
            width: 0.0,
            align: TextAlign::Left,
            is_required: false,
            label: None,
        });
        assert_eq!(el.required_field(), None);
    }

    #[test]
    fn image_source_classification() {
        assert_eq!(
            ImageSource::parse("placeholder://logo").unwrap(),
            ImageSource::Placeholder(PlaceholderKind::Logo)
        );
        assert!(matches!(
            ImageSource::parse("data:image/png;base64,AAAA").unwrap(),
            ImageSource::DataUri(_)
        ));
        assert!(matches!(
            ImageSource::parse("https://example.com/logo.png").unwrap(),
            ImageSource::Url(_)
        ));
        assert!(ImageSource::parse("ftp://nope").is_err());
    }
}
