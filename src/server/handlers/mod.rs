//! HTTP request handlers, grouped by API area.

pub mod assets;
pub mod certificates;
pub mod templates;
