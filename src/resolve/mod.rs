//! # Template Resolver
//!
//! Binds a template to per-recipient data without mutating it. The output is
//! an ordered list of resolved visual instructions (final text, final image
//! sources, positions, styles) that any rendering surface can consume:
//! the bundled rasterizer, a preview endpoint, or the PDF exporter.
//!
//! Resolution rules:
//! 1. Catalog tokens in text are substituted with binding values; a missing
//!    value becomes a bracketed label (`[Participant Name]`), never empty
//!    text and never the raw token. Unrecognized `{..}` substrings pass
//!    through untouched.
//! 2. Logo/signature placeholder elements take the bound asset when one is
//!    provided, otherwise keep their generated placeholder graphic.
//! 3. Legacy templates with no placeholder element get a fixed-position
//!    fallback overlay for each provided asset; appended after the main
//!    list, and never emitted when a placeholder element already covers the
//!    asset (the two paths are mutually exclusive).

pub mod assets;

pub use assets::AssetResolver;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::LaureaError;
use crate::template::{
    Element, FontWeight, ImageSource, PlaceholderKind, RequiredField, Template, TextAlign,
};

/// Fallback overlay geometry for legacy templates (top-right logo,
/// bottom-area signature). Fixed offsets, not a configuration surface.
const FALLBACK_LOGO_POSITION: (f64, f64) = (983.0, 120.0);
const FALLBACK_LOGO_SIZE: (f64, f64) = (140.0, 140.0);
const FALLBACK_SIGNATURE_POSITION: (f64, f64) = (280.0, 660.0);
const FALLBACK_SIGNATURE_SIZE: (f64, f64) = (200.0, 80.0);

/// Per-recipient binding data, supplied by the calling context.
///
/// The five text fields are plain strings; empty or whitespace-only means
/// "not provided" and resolves to the bracketed fallback label.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BindingContext {
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub issue_date: String,
    #[serde(default)]
    pub instructor_name: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl BindingContext {
    /// The binding value for a catalog entry, or `None` when missing.
    fn value_for(&self, field: RequiredField) -> Option<&str> {
        let raw = match field {
            RequiredField::CourseName => &self.course_name,
            RequiredField::StudentName => &self.student_name,
            RequiredField::IssueDate => &self.issue_date,
            RequiredField::Instructor => &self.instructor_name,
            RequiredField::Duration => &self.duration,
        };
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    fn asset_for(&self, kind: PlaceholderKind) -> Option<&str> {
        match kind {
            PlaceholderKind::Logo => self.logo.as_deref(),
            PlaceholderKind::Signature => self.signature.as_deref(),
        }
    }
}

/// A resolved text run, ready for any rendering surface.
#[derive(Debug, Clone)]
pub struct TextInstruction {
    pub x: f64,
    pub y: f64,
    pub content: String,
    pub font_size: f32,
    pub font_family: String,
    pub font_weight: FontWeight,
    pub color: String,
    pub width: f32,
    pub align: TextAlign,
}

/// A resolved image box. `pixels` is populated by [`AssetResolver`] for
/// data-URI and URL sources; placeholder graphics are drawn by the
/// rasterizer directly.
#[derive(Debug, Clone)]
pub struct ImageInstruction {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub source: ImageSource,
    pub pixels: Option<DynamicImage>,
}

/// One resolved visual instruction.
#[derive(Debug, Clone)]
pub enum RenderInstruction {
    Text(TextInstruction),
    Image(ImageInstruction),
}

/// The display-ready, read-only resolved view of a template.
#[derive(Debug, Clone, Default)]
pub struct ResolvedCertificate {
    pub instructions: Vec<RenderInstruction>,
}

impl ResolvedCertificate {
    /// Count the image instructions drawing this asset kind; placeholder
    /// graphics and bound assets alike.
    pub fn count_asset_instructions(&self, kind: PlaceholderKind, ctx: &BindingContext) -> usize {
        self.instructions
            .iter()
            .filter(|i| match i {
                RenderInstruction::Image(img) => {
                    img.source == ImageSource::Placeholder(kind)
                        || ctx
                            .asset_for(kind)
                            .is_some_and(|src| source_matches(&img.source, src))
                }
                RenderInstruction::Text(_) => false,
            })
            .count()
    }
}

fn source_matches(source: &ImageSource, reference: &str) -> bool {
    match source {
        ImageSource::DataUri(s) | ImageSource::Url(s) => s == reference,
        ImageSource::Placeholder(_) => false,
    }
}

/// Substitute every catalog token found literally in `text`.
///
/// Tokens with no binding value become `[<Label>]`. Anything else, including
/// unrecognized `{..}`-shaped substrings, passes through unchanged.
pub fn substitute(text: &str, ctx: &BindingContext) -> String {
    let mut out = text.to_string();
    for field in RequiredField::ALL {
        if !out.contains(field.token()) {
            continue;
        }
        let replacement = match ctx.value_for(field) {
            Some(value) => value.to_string(),
            None => format!("[{}]", field.label()),
        };
        out = out.replace(field.token(), &replacement);
    }
    out
}

/// Resolve a template against a binding context.
///
/// The template is read-only input; the resolver never mutates it. Fails
/// only on an unparseable image source reference; a missing binding value
/// is not an error, it resolves to the bracketed fallback.
pub fn resolve(
    template: &Template,
    ctx: &BindingContext,
) -> Result<ResolvedCertificate, LaureaError> {
    let mut instructions = Vec::with_capacity(template.elements.len() + 2);

    for element in &template.elements {
        match element {
            Element::Text(text) => {
                instructions.push(RenderInstruction::Text(TextInstruction {
                    x: text.x,
                    y: text.y,
                    content: substitute(&text.value, ctx),
                    font_size: text.font_size,
                    font_family: text.font_family.clone(),
                    font_weight: text.font_weight,
                    color: text.color.clone(),
                    width: text.width,
                    align: text.align,
                }));
            }
            Element::Image(img) => {
                // A placeholder element takes the bound asset when provided,
                // otherwise keeps its own placeholder graphic.
                let source_ref = img
                    .placeholder_type
                    .and_then(|kind| ctx.asset_for(kind))
                    .unwrap_or(&img.value);
                instructions.push(RenderInstruction::Image(ImageInstruction {
                    x: img.x,
                    y: img.y,
                    width: img.width,
                    height: img.height,
                    source: ImageSource::parse(source_ref)?,
                    pixels: None,
                }));
            }
        }
    }

    // Legacy templates: overlay provided assets at fixed positions, but only
    // when no placeholder element already renders them.
    if let Some(logo) = ctx.asset_for(PlaceholderKind::Logo)
        && !template.has_placeholder(PlaceholderKind::Logo)
    {
        instructions.push(overlay(logo, FALLBACK_LOGO_POSITION, FALLBACK_LOGO_SIZE)?);
    }
    if let Some(signature) = ctx.asset_for(PlaceholderKind::Signature)
        && !template.has_placeholder(PlaceholderKind::Signature)
    {
        instructions.push(overlay(
            signature,
            FALLBACK_SIGNATURE_POSITION,
            FALLBACK_SIGNATURE_SIZE,
        )?);
    }

    Ok(ResolvedCertificate { instructions })
}

fn overlay(
    source: &str,
    position: (f64, f64),
    size: (f64, f64),
) -> Result<RenderInstruction, LaureaError> {
    Ok(RenderInstruction::Image(ImageInstruction {
        x: position.0,
        y: position.1,
        width: size.0,
        height: size.1,
        source: ImageSource::parse(source)?,
        pixels: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{ImageElement, TextElement};
    use pretty_assertions::assert_eq;

    fn text_element(id: u64, value: &str) -> Element {
        Element::Text(TextElement {
            id,
            x: 561.5,
            y: 300.0,
            value: value.into(),
            font_size: 24.0,
            font_family: "serif".into(),
            font_weight: FontWeight::Normal,
            color: "#1f2937".into(),
            width: 0.0,
            align: TextAlign::Center,
            is_required: false,
            label: None,
        })
    }

    fn logo_placeholder(id: u64) -> Element {
        Element::Image(ImageElement {
            id,
            x: 963.0,
            y: 130.0,
            value: "placeholder://logo".into(),
            width: 150.0,
            height: 150.0,
            is_required: true,
            placeholder_type: Some(PlaceholderKind::Logo),
            label: Some("Logo".into()),
        })
    }

    fn alice_binding() -> BindingContext {
        BindingContext {
            student_name: "Alice Johnson".into(),
            course_name: "Intro to Systems".into(),
            ..Default::default()
        }
    }

    fn text_contents(resolved: &ResolvedCertificate) -> Vec<&str> {
        resolved
            .instructions
            .iter()
            .filter_map(|i| match i {
                RenderInstruction::Text(t) => Some(t.content.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn tokens_substitute_with_binding_values() {
        let s = substitute(
            "Awarded to {student_name} for {course_name}",
            &alice_binding(),
        );
        assert_eq!(s, "Awarded to Alice Johnson for Intro to Systems");
    }

    #[test]
    fn missing_value_becomes_bracketed_label() {
        let ctx = BindingContext {
            course_name: "Intro to Systems".into(),
            ..Default::default()
        };
        let s = substitute("Awarded to {student_name} for {course_name}", &ctx);
        assert_eq!(s, "Awarded to [Participant Name] for Intro to Systems");
    }

    #[test]
    fn whitespace_only_value_counts_as_missing() {
        let ctx = BindingContext {
            student_name: "   ".into(),
            ..Default::default()
        };
        assert_eq!(substitute("{student_name}", &ctx), "[Participant Name]");
    }

    #[test]
    fn unrecognized_braces_pass_through() {
        let s = substitute("Score: {points} on {date}", &alice_binding());
        assert_eq!(s, "Score: {points} on [Issue Date]");
    }

    #[test]
    fn repeated_tokens_are_all_substituted() {
        let s = substitute("{student_name}; {student_name}", &alice_binding());
        assert_eq!(s, "Alice Johnson; Alice Johnson");
    }

    #[test]
    fn template_is_not_mutated() {
        let mut template = Template::new("t");
        template.elements.push(text_element(1, "{student_name}"));
        let before = template.clone();
        resolve(&template, &alice_binding()).unwrap();
        assert_eq!(template, before);
    }

    #[test]
    fn resolved_text_reflects_binding() {
        let mut template = Template::new("t");
        template
            .elements
            .push(text_element(1, "Awarded to {student_name}"));
        let resolved = resolve(&template, &alice_binding()).unwrap();
        assert_eq!(text_contents(&resolved), vec!["Awarded to Alice Johnson"]);
    }

    #[test]
    fn placeholder_takes_bound_asset_exactly_once() {
        let mut template = Template::new("t");
        template.elements.push(logo_placeholder(1));
        let ctx = BindingContext {
            logo: Some("https://cdn.example.com/logo.png".into()),
            ..Default::default()
        };
        let resolved = resolve(&template, &ctx).unwrap();
        // One instruction, at the placeholder's own position; no overlay
        assert_eq!(resolved.count_asset_instructions(PlaceholderKind::Logo, &ctx), 1);
        match &resolved.instructions[0] {
            RenderInstruction::Image(img) => {
                assert_eq!(img.x, 963.0);
                assert_eq!(
                    img.source,
                    ImageSource::Url("https://cdn.example.com/logo.png".into())
                );
            }
            other => panic!("expected image instruction, got {:?}", other),
        }
    }

    #[test]
    fn unbound_placeholder_keeps_its_graphic() {
        let mut template = Template::new("t");
        template.elements.push(logo_placeholder(1));
        let resolved = resolve(&template, &BindingContext::default()).unwrap();
        match &resolved.instructions[0] {
            RenderInstruction::Image(img) => {
                assert_eq!(img.source, ImageSource::Placeholder(PlaceholderKind::Logo));
            }
            other => panic!("expected image instruction, got {:?}", other),
        }
    }

    #[test]
    fn legacy_template_gets_fallback_overlay_exactly_once() {
        let template = Template::new("legacy");
        let ctx = BindingContext {
            logo: Some("https://cdn.example.com/logo.png".into()),
            ..Default::default()
        };
        let resolved = resolve(&template, &ctx).unwrap();
        assert_eq!(resolved.count_asset_instructions(PlaceholderKind::Logo, &ctx), 1);
        match &resolved.instructions[0] {
            RenderInstruction::Image(img) => {
                assert_eq!((img.x, img.y), FALLBACK_LOGO_POSITION);
            }
            other => panic!("expected image instruction, got {:?}", other),
        }
    }

    #[test]
    fn no_overlay_without_a_bound_asset() {
        let template = Template::new("legacy");
        let resolved = resolve(&template, &BindingContext::default()).unwrap();
        assert!(resolved.instructions.is_empty());
    }

    #[test]
    fn signature_overlay_is_independent_of_logo() {
        let mut template = Template::new("t");
        template.elements.push(logo_placeholder(1));
        let ctx = BindingContext {
            logo: Some("https://cdn.example.com/logo.png".into()),
            signature: Some("https://cdn.example.com/sig.png".into()),
            ..Default::default()
        };
        let resolved = resolve(&template, &ctx).unwrap();
        // Logo through the placeholder, signature through the overlay
        assert_eq!(resolved.count_asset_instructions(PlaceholderKind::Logo, &ctx), 1);
        assert_eq!(
            resolved.count_asset_instructions(PlaceholderKind::Signature, &ctx),
            1
        );
        match resolved.instructions.last().unwrap() {
            RenderInstruction::Image(img) => {
                assert_eq!((img.x, img.y), FALLBACK_SIGNATURE_POSITION);
            }
            other => panic!("expected image instruction, got {:?}", other),
        }
    }

    #[test]
    fn custom_elements_render_verbatim() {
        let mut template = Template::new("t");
        template.elements.push(text_element(1, "In recognition"));
        let resolved = resolve(&template, &alice_binding()).unwrap();
        assert_eq!(text_contents(&resolved), vec!["In recognition"]);
    }
}
