//! # Template Editor
//!
//! Owns the live template for one editing session: a selection state
//! machine, insert/mutate/delete operations with the uniqueness rules, and
//! the save flow (deselect → settle → thumbnail → persistence collaborator).
//!
//! The session is single-owner: the resolver and exporter only ever see
//! `&Template` snapshots, so there is no concurrent mutation to coordinate.

pub mod viewport;

pub use viewport::{CanvasPoint, DisplayPoint, Viewport};

use std::time::Duration;

use uuid::Uuid;

use crate::error::LaureaError;
use crate::render::Rasterizer;
use crate::resolve::{self, AssetResolver, BindingContext, assets};
use crate::store::{SaveTemplate, TemplateStore};
use crate::template::{
    CANVAS_HEIGHT, CANVAS_WIDTH, Element, FontWeight, ImageElement, PlaceholderKind,
    RequiredField, Template, TextAlign, TextElement,
};

/// Repaint settling time between deselect and thumbnail capture, so the
/// capture never contains selection-highlight decoration.
const SETTLE_DELAY: Duration = Duration::from_millis(60);

/// Thumbnail pixel-density multiplier (quarter-size preview).
const THUMBNAIL_SCALE: f32 = 0.25;

/// Selection state machine. Property-panel operations apply to the selected
/// element; drag moves apply to the dragging one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    Selected(u64),
    Dragging(u64),
}

impl Selection {
    pub fn element_id(&self) -> Option<u64> {
        match self {
            Selection::Idle => None,
            Selection::Selected(id) | Selection::Dragging(id) => Some(*id),
        }
    }
}

/// Partial update for the property panel. `None` fields are left untouched;
/// fields that do not apply to the element's kind are ignored.
///
/// `value` and `placeholder_type` are deliberately absent; they are fixed
/// at insertion because they carry the uniqueness invariants. Text content
/// editing goes through [`Editor::set_text`], which re-checks them.
#[derive(Debug, Clone, Default)]
pub struct ElementPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub font_size: Option<f32>,
    pub font_family: Option<String>,
    pub font_weight: Option<FontWeight>,
    pub color: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub align: Option<TextAlign>,
}

/// One editing session over one template.
pub struct Editor {
    template: Template,
    selection: Selection,
    viewport: Viewport,
    next_id: u64,
    /// Set once the session has been persisted; subsequent saves update.
    persisted_id: Option<Uuid>,
    pub is_public: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Start from an empty template.
    pub fn new() -> Self {
        Self {
            template: Template::default(),
            selection: Selection::Idle,
            viewport: Viewport::default(),
            next_id: 1,
            persisted_id: None,
            is_public: false,
        }
    }

    /// Resume editing a loaded template. The id counter continues past the
    /// highest existing id so ids are never reused within the session.
    pub fn from_template(template: Template) -> Self {
        let next_id = template.elements.iter().map(Element::id).max().unwrap_or(0) + 1;
        Self {
            template,
            selection: Selection::Idle,
            viewport: Viewport::default(),
            next_id,
            persisted_id: None,
            is_public: false,
        }
    }

    /// Resume editing a persisted record; saves become updates.
    pub fn from_persisted(id: Uuid, template: Template, is_public: bool) -> Self {
        let mut editor = Self::from_template(template);
        editor.persisted_id = Some(id);
        editor.is_public = is_public;
        editor
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The editor tracks the rendered bounding box of its canvas surface so
    /// pointer events can be mapped; call on mount, zoom, and resize.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // ── Insertion ───────────────────────────────────────────────────────

    /// Insert a required field from the catalog. A second element for the
    /// same token is rejected as a no-op: the template is untouched and the
    /// error carries the user-facing warning.
    pub fn add_required_field(&mut self, field: RequiredField) -> Result<u64, LaureaError> {
        if self.template.has_required_field(field) {
            return Err(LaureaError::DuplicateElement(format!(
                "{} is already on the certificate",
                field.label()
            )));
        }
        let id = self.take_id();
        self.template.elements.push(Element::Text(TextElement {
            id,
            x: CANVAS_WIDTH / 2.0,
            y: CANVAS_HEIGHT / 2.0,
            value: field.token().to_string(),
            font_size: field.default_font_size(),
            font_family: "serif".to_string(),
            font_weight: field.default_font_weight(),
            color: "#1f2937".to_string(),
            width: 0.0,
            align: TextAlign::Center,
            is_required: true,
            label: Some(field.label().to_string()),
        }));
        self.selection = Selection::Selected(id);
        Ok(id)
    }

    /// Insert a logo/signature placeholder at its kind-specific default
    /// region. At most one of each kind may exist.
    pub fn add_asset_placeholder(&mut self, kind: PlaceholderKind) -> Result<u64, LaureaError> {
        if self.template.has_placeholder(kind) {
            return Err(LaureaError::DuplicateElement(format!(
                "A {} placeholder is already on the certificate",
                kind.label().to_lowercase()
            )));
        }
        let id = self.take_id();
        let (x, y) = kind.default_position();
        let (width, height) = kind.default_size();
        self.template.elements.push(Element::Image(ImageElement {
            id,
            x,
            y,
            value: kind.source().to_string(),
            width,
            height,
            is_required: true,
            placeholder_type: Some(kind),
            label: Some(kind.label().to_string()),
        }));
        self.selection = Selection::Selected(id);
        Ok(id)
    }

    /// Insert a free-form text element at the canvas center.
    pub fn add_custom_text(&mut self) -> u64 {
        let id = self.take_id();
        self.template.elements.push(Element::Text(TextElement {
            id,
            x: CANVAS_WIDTH / 2.0,
            y: CANVAS_HEIGHT / 2.0,
            value: "New text".to_string(),
            font_size: 20.0,
            font_family: "serif".to_string(),
            font_weight: FontWeight::Normal,
            color: "#1f2937".to_string(),
            width: 0.0,
            align: TextAlign::Left,
            is_required: false,
            label: None,
        }));
        self.selection = Selection::Selected(id);
        id
    }

    /// Insert a free-form image (uploaded asset or data URI) at the canvas
    /// center.
    pub fn add_custom_image(
        &mut self,
        source: impl Into<String>,
        width: f64,
        height: f64,
    ) -> u64 {
        let id = self.take_id();
        self.template.elements.push(Element::Image(ImageElement {
            id,
            x: CANVAS_WIDTH / 2.0,
            y: CANVAS_HEIGHT / 2.0,
            value: source.into(),
            width,
            height,
            is_required: false,
            placeholder_type: None,
            label: None,
        }));
        self.selection = Selection::Selected(id);
        id
    }

    // ── Mutation ────────────────────────────────────────────────────────

    /// Merge a property-panel patch into an element. Returns `false` (and
    /// changes nothing) when the id is unknown.
    pub fn update_element(&mut self, id: u64, patch: ElementPatch) -> bool {
        let Some(element) = self.template.element_mut(id) else {
            return false;
        };
        match element {
            Element::Text(text) => {
                if let Some(x) = patch.x {
                    text.x = x;
                }
                if let Some(y) = patch.y {
                    text.y = y;
                }
                if let Some(size) = patch.font_size {
                    text.font_size = size;
                }
                if let Some(family) = patch.font_family {
                    text.font_family = family;
                }
                if let Some(weight) = patch.font_weight {
                    text.font_weight = weight;
                }
                if let Some(color) = patch.color {
                    text.color = color;
                }
                if let Some(width) = patch.width {
                    text.width = width as f32;
                }
                if let Some(align) = patch.align {
                    text.align = align;
                }
            }
            Element::Image(img) => {
                if let Some(x) = patch.x {
                    img.x = x;
                }
                if let Some(y) = patch.y {
                    img.y = y;
                }
                if let Some(width) = patch.width {
                    img.width = width;
                }
                if let Some(height) = patch.height {
                    img.height = height;
                }
            }
        }
        true
    }

    /// Edit a text element's content.
    ///
    /// The new value is checked against the catalog: turning a second
    /// element into an existing required field's exact token would break
    /// the one-instance invariant, so that edit is rejected.
    pub fn set_text(&mut self, id: u64, value: impl Into<String>) -> Result<(), LaureaError> {
        let value = value.into();
        if let Some(field) = RequiredField::ALL.into_iter().find(|f| f.token() == value)
            && self
                .template
                .elements
                .iter()
                .any(|e| e.id() != id && e.required_field() == Some(field))
        {
            return Err(LaureaError::DuplicateElement(format!(
                "{} is already on the certificate",
                field.label()
            )));
        }
        match self.template.element_mut(id) {
            Some(Element::Text(text)) => {
                text.value = value;
                Ok(())
            }
            Some(Element::Image(_)) => Err(LaureaError::Validation(
                "Cannot set text on an image element".to_string(),
            )),
            None => Ok(()),
        }
    }

    /// Remove the selected element and return to Idle. No-op when nothing
    /// is selected.
    pub fn delete_selected(&mut self) -> Option<u64> {
        let id = self.selection.element_id()?;
        self.template.elements.retain(|e| e.id() != id);
        self.selection = Selection::Idle;
        Some(id)
    }

    // ── Selection & drag ────────────────────────────────────────────────

    /// A click on the canvas background deselects.
    pub fn click_background(&mut self) {
        self.selection = Selection::Idle;
    }

    /// A click on an element selects it. Unknown ids are ignored.
    pub fn select(&mut self, id: u64) {
        if self.template.element(id).is_some() {
            self.selection = Selection::Selected(id);
        }
    }

    /// Pointer-down over an element starts a drag (selecting it first if
    /// needed).
    pub fn begin_drag(&mut self, id: u64) {
        if self.template.element(id).is_some() {
            self.selection = Selection::Dragging(id);
        }
    }

    /// Pointer-move while dragging: the element's anchor is overwritten
    /// with the mapped canvas position. Positions are absolute, so moves
    /// applied in arrival order can never accumulate drift, and off-canvas
    /// positions are kept as-is (no clamping).
    pub fn drag_to(&mut self, pointer: DisplayPoint) {
        let Selection::Dragging(id) = self.selection else {
            return;
        };
        let point = self.viewport.to_canvas(pointer);
        if let Some(element) = self.template.element_mut(id) {
            element.set_position(point.x, point.y);
        }
    }

    /// Pointer-up ends the drag, keeping the element selected.
    pub fn end_drag(&mut self) {
        if let Selection::Dragging(id) = self.selection {
            self.selection = Selection::Selected(id);
        }
    }

    /// The pointer leaving the canvas area ends the drag the same way as
    /// pointer-up: the last applied position is committed, never reverted.
    pub fn pointer_left(&mut self) {
        self.end_drag();
    }

    // ── Save ────────────────────────────────────────────────────────────

    /// Persist the session through the external store.
    ///
    /// Rejects an empty name before any I/O. Otherwise: deselect, let the
    /// rendering layer settle so the capture has no selection highlight,
    /// rasterize the thumbnail, then hand name + serialized document +
    /// thumbnail to the store. On failure the session state is retained so
    /// the user can retry without data loss.
    pub async fn save(
        &mut self,
        name: &str,
        store: &dyn TemplateStore,
    ) -> Result<Uuid, LaureaError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LaureaError::Validation(
                "Template name cannot be empty".to_string(),
            ));
        }

        self.selection = Selection::Idle;
        tokio::time::sleep(SETTLE_DELAY).await;

        let thumbnail = self.render_thumbnail().await?;
        self.template.name = name.to_string();
        let data = self.template.to_json()?;

        let id = store
            .save(SaveTemplate {
                id: self.persisted_id,
                name: name.to_string(),
                data,
                thumbnail,
                is_public: self.is_public,
            })
            .await?;
        self.persisted_id = Some(id);
        Ok(id)
    }

    /// Quarter-size PNG data URI of the unresolved template (tokens show as
    /// bracketed labels, placeholders as their graphics).
    async fn render_thumbnail(&self) -> Result<String, LaureaError> {
        let mut resolved = resolve::resolve(&self.template, &BindingContext::default())?;
        AssetResolver::new().materialize(&mut resolved).await?;
        let page = Rasterizer::new(THUMBNAIL_SCALE).render(&resolved)?;
        assets::encode_png_data_uri(&image::DynamicImage::ImageRgba8(page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn duplicate_required_field_is_a_no_op() {
        let mut editor = Editor::new();
        editor.add_required_field(RequiredField::StudentName).unwrap();
        let before = editor.template().elements.len();

        let err = editor
            .add_required_field(RequiredField::StudentName)
            .unwrap_err();
        assert!(matches!(err, LaureaError::DuplicateElement(_)));
        assert_eq!(editor.template().elements.len(), before);
    }

    #[test]
    fn duplicate_placeholder_is_a_no_op() {
        let mut editor = Editor::new();
        editor.add_asset_placeholder(PlaceholderKind::Logo).unwrap();
        assert!(editor.add_asset_placeholder(PlaceholderKind::Logo).is_err());
        assert_eq!(editor.template().elements.len(), 1);
        // The other kind is still available
        editor
            .add_asset_placeholder(PlaceholderKind::Signature)
            .unwrap();
        assert_eq!(editor.template().elements.len(), 2);
    }

    #[test]
    fn custom_elements_have_no_uniqueness_limit() {
        let mut editor = Editor::new();
        editor.add_custom_text();
        editor.add_custom_text();
        editor.add_custom_image("placeholder://logo", 10.0, 10.0);
        assert_eq!(editor.template().elements.len(), 3);
    }

    #[test]
    fn inserted_elements_are_selected_and_ids_monotonic() {
        let mut editor = Editor::new();
        let a = editor.add_custom_text();
        let b = editor.add_required_field(RequiredField::Duration).unwrap();
        assert!(b > a);
        assert_eq!(editor.selection(), Selection::Selected(b));
    }

    #[test]
    fn id_counter_continues_past_loaded_template() {
        let json = r#"{"name": "t", "elements": [
            {"kind": "text", "id": 7, "x": 0.0, "y": 0.0,
             "value": "hi", "font_size": 20.0}
        ]}"#;
        let mut editor = Editor::from_template(Template::from_json(json).unwrap());
        let id = editor.add_custom_text();
        assert_eq!(id, 8);
    }

    #[test]
    fn background_click_deselects() {
        let mut editor = Editor::new();
        editor.add_custom_text();
        editor.click_background();
        assert_eq!(editor.selection(), Selection::Idle);
    }

    #[test]
    fn drag_overwrites_position_through_the_viewport() {
        let mut editor = Editor::new();
        editor.set_viewport(Viewport::at_zoom(0.5));
        let id = editor.add_custom_text();
        editor.begin_drag(id);
        // Display (100, 80) at 0.5 zoom is canvas (200, 160)
        editor.drag_to(DisplayPoint { x: 100.0, y: 80.0 });
        let (x, y) = editor.template().element(id).unwrap().position();
        assert!((x - 200.0).abs() < 1e-9);
        assert!((y - 160.0).abs() < 1e-9);
        assert_eq!(editor.selection(), Selection::Dragging(id));
    }

    #[test]
    fn pointer_leave_commits_the_last_drag_position() {
        let mut editor = Editor::new();
        editor.set_viewport(Viewport::at_zoom(1.0));
        let id = editor.add_custom_text();
        editor.update_element(
            id,
            ElementPatch {
                x: Some(500.0),
                y: Some(500.0),
                ..Default::default()
            },
        );

        editor.begin_drag(id);
        editor.drag_to(DisplayPoint { x: 520.0, y: 480.0 });
        editor.pointer_left();

        // The drag exits to Selected and keeps (520, 480), not (500, 500)
        assert_eq!(editor.selection(), Selection::Selected(id));
        let (x, y) = editor.template().element(id).unwrap().position();
        assert!((x - 520.0).abs() < 0.5);
        assert!((y - 480.0).abs() < 0.5);
    }

    #[test]
    fn drag_moves_apply_in_order_without_drift() {
        let mut editor = Editor::new();
        editor.set_viewport(Viewport::at_zoom(1.0));
        let id = editor.add_custom_text();
        editor.begin_drag(id);
        for step in 0..20 {
            editor.drag_to(DisplayPoint {
                x: 100.0 + step as f64,
                y: 100.0,
            });
        }
        editor.end_drag();
        let (x, _) = editor.template().element(id).unwrap().position();
        assert!((x - 119.0).abs() < 1e-9);
    }

    #[test]
    fn delete_selected_returns_to_idle() {
        let mut editor = Editor::new();
        let id = editor.add_custom_text();
        assert_eq!(editor.delete_selected(), Some(id));
        assert_eq!(editor.selection(), Selection::Idle);
        assert!(editor.template().elements.is_empty());
        // Deleting with nothing selected is a no-op
        assert_eq!(editor.delete_selected(), None);
    }

    #[test]
    fn deleting_a_required_field_frees_its_slot() {
        let mut editor = Editor::new();
        editor.add_required_field(RequiredField::IssueDate).unwrap();
        editor.delete_selected();
        assert!(editor.add_required_field(RequiredField::IssueDate).is_ok());
    }

    #[test]
    fn update_unknown_id_is_a_no_op() {
        let mut editor = Editor::new();
        editor.add_custom_text();
        let before = editor.template().clone();
        assert!(!editor.update_element(
            999,
            ElementPatch {
                x: Some(1.0),
                ..Default::default()
            }
        ));
        assert_eq!(*editor.template(), before);
    }

    #[test]
    fn patch_merges_only_given_fields() {
        let mut editor = Editor::new();
        let id = editor.add_custom_text();
        editor.update_element(
            id,
            ElementPatch {
                font_size: Some(36.0),
                color: Some("#aa0000".into()),
                ..Default::default()
            },
        );
        match editor.template().element(id).unwrap() {
            Element::Text(text) => {
                assert_eq!(text.font_size, 36.0);
                assert_eq!(text.color, "#aa0000");
                assert_eq!(text.value, "New text");
            }
            other => panic!("expected text element, got {:?}", other),
        }
    }

    #[test]
    fn set_text_rejects_an_existing_catalog_token() {
        let mut editor = Editor::new();
        editor.add_required_field(RequiredField::StudentName).unwrap();
        let custom = editor.add_custom_text();
        let err = editor.set_text(custom, "{student_name}").unwrap_err();
        assert!(matches!(err, LaureaError::DuplicateElement(_)));
        // A token with no existing instance is fine
        editor.set_text(custom, "{duration}").unwrap();
    }

    #[tokio::test]
    async fn save_rejects_empty_name_before_any_store_call() {
        let mut editor = Editor::new();
        editor.add_custom_text();
        let store = MemoryStore::new();
        let err = editor.save("   ", &store).await.unwrap_err();
        assert!(matches!(err, LaureaError::Validation(_)));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_deselects_and_persists_document_with_thumbnail() {
        let mut editor = Editor::new();
        editor.add_required_field(RequiredField::StudentName).unwrap();
        editor.add_asset_placeholder(PlaceholderKind::Logo).unwrap();

        let store = MemoryStore::new();
        let id = editor.save("Completion", &store).await.unwrap();

        assert_eq!(editor.selection(), Selection::Idle);
        let record = store.fetch(id).await.unwrap();
        assert_eq!(record.name, "Completion");
        assert!(record.thumbnail.starts_with("data:image/png;base64,"));

        let restored = Template::from_json(&record.data).unwrap();
        assert_eq!(restored, *editor.template());
    }

    #[tokio::test]
    async fn second_save_updates_the_same_record() {
        let mut editor = Editor::new();
        editor.add_custom_text();
        let store = MemoryStore::new();

        let first = editor.save("v1", &store).await.unwrap();
        editor.add_custom_text();
        let second = editor.save("v2", &store).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.list().await.unwrap().len(), 1);
        assert_eq!(store.fetch(first).await.unwrap().name, "v2");
    }
}
