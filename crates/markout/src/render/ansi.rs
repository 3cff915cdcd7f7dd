//! ANSI color renderer.
//!
//! Attribute tags have the payload form `.<attribute> <rest>`. Only
//! attributes registered in the renderer's [`AttributeSet`] are acted on;
//! everything else is ignored, so documents can carry attribute vocabularies
//! this renderer does not know.
//!
//! The color reset is not done here. It is done by the printer's
//! [`ColorSink`](crate::ColorSink) on the next newline.

use std::collections::BTreeSet;

use super::TagRenderer;
use crate::error::Result;
use crate::layout::Layout;

/// Attribute names an [`AnsiRenderer`] acts on. Grows only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributeSet {
    names: BTreeSet<String>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `name`. Returns false if it was already registered.
    pub fn register(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for AttributeSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.names.extend(iter.into_iter().map(Into::into));
    }
}

/// Emits color escapes for `.foreground` / `.background` attribute tags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnsiRenderer {
    attributes: AttributeSet,
}

impl AnsiRenderer {
    pub fn new(attributes: AttributeSet) -> Self {
        Self { attributes }
    }

    /// Adds an attribute name to the allow-list. Idempotent.
    pub fn register_attribute(&mut self, name: impl Into<String>) {
        self.attributes.register(name);
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    /// The word after the leading `.` of an attribute payload.
    pub fn attribute_name(payload: &str) -> Option<&str> {
        let rest = payload.strip_prefix('.')?;
        let name = rest.split_whitespace().next()?;
        // `split_whitespace` skips leading blanks; `. foo` has no name.
        rest.starts_with(name).then_some(name)
    }

    /// The escape of a `.foreground <value>` or `.background <value>` payload.
    ///
    /// The value must follow the name after exactly one space and hold no
    /// whitespace itself. Any other spacing, such as `.foreground  X` or a
    /// trailing blank, is not a color payload and falls back to raw text.
    fn color_value(payload: &str) -> Option<&str> {
        let value = payload
            .strip_prefix(".foreground ")
            .or_else(|| payload.strip_prefix(".background "))?;
        (!value.is_empty() && !value.contains(char::is_whitespace)).then_some(value)
    }
}

impl TagRenderer for AnsiRenderer {
    fn open_text(&self, payload: &str) -> Result<String> {
        Ok(format!("<{}>", payload))
    }

    fn close_text(&self, payload: &str) -> Result<String> {
        Ok(format!("</{}>", payload))
    }

    fn on_open(&self, payload: &str, layout: &mut dyn Layout) -> Result<()> {
        let Some(name) = Self::attribute_name(payload) else {
            tracing::trace!(payload, "not an attribute tag");
            return Ok(());
        };
        if !self.attributes.contains(name) {
            tracing::trace!(attribute = name, "ignoring unregistered attribute");
            return Ok(());
        }

        match Self::color_value(payload) {
            Some(escape) => layout.print_escape(escape),
            None => {
                tracing::debug!(attribute = name, "attribute is not a color directive");
                layout.print(payload)?;
                layout.newline()
            }
        }
    }

    fn on_close(&self, _payload: &str, _layout: &mut dyn Layout) -> Result<()> {
        Ok(())
    }
}
