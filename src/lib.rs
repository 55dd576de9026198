//! # Laurea - Certificate Template Engine
//!
//! Laurea is a Rust library for designing certificate templates and turning
//! them into per-recipient certificates. It provides:
//!
//! - **Element model**: absolutely-positioned text and image elements with
//!   a stable JSON serialization
//! - **Editor**: selection, drag, and insertion rules for building a
//!   template, including the one-instance guarantees for required fields
//! - **Resolver**: token substitution and asset binding against recipient
//!   data, with graceful fallbacks for anything missing
//! - **Rasterizer**: deterministic bitmap-font rendering of a resolved
//!   certificate onto an A4-landscape page
//! - **Exporter**: single-page PDF wrapping of the rendered raster
//!
//! ## Quick Start
//!
//! ```
//! use laurea::editor::Editor;
//! use laurea::export;
//! use laurea::render::Rasterizer;
//! use laurea::resolve::{self, BindingContext};
//! use laurea::template::RequiredField;
//!
//! // Design a template
//! let mut editor = Editor::new();
//! editor.add_required_field(RequiredField::StudentName)?;
//! editor.add_required_field(RequiredField::CourseName)?;
//!
//! // Bind it to a recipient
//! let binding = BindingContext {
//!     student_name: "Ada Lovelace".to_string(),
//!     course_name: "Analytical Engines 101".to_string(),
//!     ..Default::default()
//! };
//! let resolved = resolve::resolve(editor.template(), &binding)?;
//!
//! // Render and export
//! let page = Rasterizer::new(2.0).render(&resolved)?;
//! let pdf = export::export_pdf(&page, Some("Ada Lovelace"))?;
//! assert_eq!(pdf.file_name, "Certificate-Ada Lovelace.pdf");
//!
//! # Ok::<(), laurea::error::LaureaError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`template`] | Element model and JSON document format |
//! | [`editor`] | Editing session: selection, drag, insertion rules |
//! | [`resolve`] | Token substitution and asset binding |
//! | [`render`] | Bitmap-font rasterizer |
//! | [`export`] | PDF wrapping |
//! | [`store`] | Persistence collaborator boundary |
//! | [`server`] | HTTP API |
//! | [`error`] | Error types |

pub mod editor;
pub mod error;
pub mod export;
pub mod render;
pub mod resolve;
pub mod server;
pub mod store;
pub mod template;

// Re-exports for convenience
pub use error::LaureaError;
pub use template::Template;
