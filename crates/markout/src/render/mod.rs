//! Tag renderers.
//!
//! Each renderer answers the four hook calls the engine makes for a tag:
//! literal text at the open and close boundary ([`TagRenderer::open_text`],
//! [`TagRenderer::close_text`]) and layout effects ([`TagRenderer::on_open`],
//! [`TagRenderer::on_close`]). [`Renderer`] is the closed set of variants a
//! [`Printer`](crate::Printer) can have bound.

mod ansi;
mod html;
mod text;

pub use ansi::{AnsiRenderer, AttributeSet};
pub use html::HtmlRenderer;
pub use text::TextRenderer;

use crate::error::Result;
use crate::layout::Layout;

/// Hook interface between the engine and a rendering mode.
pub trait TagRenderer {
    /// Literal text inserted where the tag opens.
    fn open_text(&self, payload: &str) -> Result<String>;

    /// Literal text inserted where the tag closes.
    fn close_text(&self, payload: &str) -> Result<String>;

    /// Layout effect when the tag opens.
    fn on_open(&self, payload: &str, layout: &mut dyn Layout) -> Result<()>;

    /// Layout effect when the tag closes.
    fn on_close(&self, payload: &str, layout: &mut dyn Layout) -> Result<()>;
}

/// The renderer bound to a printer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Renderer {
    Html(HtmlRenderer),
    Text(TextRenderer),
    Attr(AnsiRenderer),
    /// Tags produce no text and no layout effect.
    #[default]
    Disabled,
}

impl TagRenderer for Renderer {
    fn open_text(&self, payload: &str) -> Result<String> {
        match self {
            Renderer::Html(r) => r.open_text(payload),
            Renderer::Text(r) => r.open_text(payload),
            Renderer::Attr(r) => r.open_text(payload),
            Renderer::Disabled => Ok(String::new()),
        }
    }

    fn close_text(&self, payload: &str) -> Result<String> {
        match self {
            Renderer::Html(r) => r.close_text(payload),
            Renderer::Text(r) => r.close_text(payload),
            Renderer::Attr(r) => r.close_text(payload),
            Renderer::Disabled => Ok(String::new()),
        }
    }

    fn on_open(&self, payload: &str, layout: &mut dyn Layout) -> Result<()> {
        match self {
            Renderer::Html(r) => r.on_open(payload, layout),
            Renderer::Text(r) => r.on_open(payload, layout),
            Renderer::Attr(r) => r.on_open(payload, layout),
            Renderer::Disabled => Ok(()),
        }
    }

    fn on_close(&self, payload: &str, layout: &mut dyn Layout) -> Result<()> {
        match self {
            Renderer::Html(r) => r.on_close(payload, layout),
            Renderer::Text(r) => r.on_close(payload, layout),
            Renderer::Attr(r) => r.on_close(payload, layout),
            Renderer::Disabled => Ok(()),
        }
    }
}
