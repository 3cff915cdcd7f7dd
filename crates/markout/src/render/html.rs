//! HTML markup renderer.

use markout_tags::{is_quoted, parse, Tag};

use super::TagRenderer;
use crate::error::Result;
use crate::layout::Layout;

/// Renders tags as HTML elements, each in its own indented box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlRenderer {
    indent: usize,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

impl HtmlRenderer {
    /// Creates a renderer whose element boxes indent by `indent` columns.
    pub fn new(indent: usize) -> Self {
        Self { indent }
    }

    /// `<name k="v" ...>`, attributes in order. Quoted values are kept as
    /// written; bare values get quoted.
    pub fn open_markup(&self, tag: &Tag) -> String {
        if tag.is_bare() {
            return format!("<{}>", tag.name());
        }
        let attrs: Vec<String> = tag
            .attributes()
            .iter()
            .map(|(key, value)| {
                if is_quoted(value) {
                    format!("{}={}", key, value)
                } else {
                    format!("{}=\"{}\"", key, value)
                }
            })
            .collect();
        format!("<{} {}>", tag.name(), attrs.join(" "))
    }

    pub fn close_markup(&self, tag: &Tag) -> String {
        format!("</{}>", tag.name())
    }
}

impl TagRenderer for HtmlRenderer {
    fn open_text(&self, payload: &str) -> Result<String> {
        Ok(self.open_markup(&parse(payload)?))
    }

    fn close_text(&self, payload: &str) -> Result<String> {
        Ok(self.close_markup(&parse(payload)?))
    }

    fn on_open(&self, _payload: &str, layout: &mut dyn Layout) -> Result<()> {
        layout.open_box(self.indent)?;
        layout.soft_break()
    }

    fn on_close(&self, _payload: &str, layout: &mut dyn Layout) -> Result<()> {
        layout.close_box()?;
        layout.soft_break()
    }
}
