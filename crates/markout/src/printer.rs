//! A small box-model printer with tag hooks.
//!
//! [`Printer`] is the engine side of tag rendering: document code prints text,
//! opens and closes boxes, and opens and closes tags; the printer calls into
//! whatever [`Renderer`] is bound for the tag hooks. All output goes through a
//! [`ColorSink`], so an active color is reset before every newline no matter
//! which primitive produced it.
//!
//! Line breaking is deliberately simple: a soft break turns into a newline
//! only when the next text would run past the margin. Widths are measured
//! with escape sequences excluded.

use std::io::Write;

use console::measure_text_width;

use crate::config::StreamConfig;
use crate::error::Result;
use crate::layout::Layout;
use crate::mode::Mode;
use crate::render::{AnsiRenderer, AttributeSet, Renderer, TagRenderer};
use crate::sink::{is_reset_sgr, ColorSink, ColorState};

pub const DEFAULT_MARGIN: usize = 78;
pub const DEFAULT_BOX_INDENT: usize = 2;

/// The tag hooks bound to a printer: renderer plus enable flags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Hooks {
    pub mode: Mode,
    pub renderer: Renderer,
    /// Insert the renderer's open/close text.
    pub mark_tags: bool,
    /// Call the renderer's layout hooks.
    pub print_tags: bool,
}

/// Cursor and box state over the output sink.
#[derive(Debug)]
struct Output<W: Write> {
    sink: ColorSink<W>,
    margin: usize,
    boxes: Vec<usize>,
    column: usize,
    at_line_start: bool,
    pending_break: bool,
    /// Escapes printed while a break is pending, held until the break is
    /// decided so they land on the line their text goes to.
    queued_escapes: Vec<String>,
}

impl<W: Write> Output<W> {
    fn new(writer: W) -> Self {
        Self {
            sink: ColorSink::new(writer),
            margin: DEFAULT_MARGIN,
            boxes: Vec::new(),
            column: 0,
            at_line_start: true,
            pending_break: false,
            queued_escapes: Vec::new(),
        }
    }

    fn color_state(&self) -> ColorState {
        if self.queued_escapes.iter().any(|e| !is_reset_sgr(e)) {
            ColorState::Dirty
        } else {
            self.sink.state()
        }
    }

    fn write_queued_escapes(&mut self) -> Result<()> {
        for escape in std::mem::take(&mut self.queued_escapes) {
            self.sink.write_escape(&escape)?;
        }
        Ok(())
    }

    fn finish(mut self) -> Result<W> {
        self.write_queued_escapes()?;
        Ok(self.sink.finish()?)
    }

    fn indent(&self) -> usize {
        self.boxes.last().copied().unwrap_or(0)
    }

    fn write_indent(&mut self) -> Result<()> {
        if self.at_line_start {
            let indent = self.indent();
            write!(self.sink, "{:indent$}", "", indent = indent)?;
            self.column = indent;
            self.at_line_start = false;
        }
        Ok(())
    }

    fn print_line(&mut self, piece: &str) -> Result<()> {
        if piece.is_empty() {
            return Ok(());
        }
        let width = measure_text_width(piece);
        if std::mem::take(&mut self.pending_break)
            && !self.at_line_start
            && self.column + width > self.margin
        {
            self.newline()?;
        }
        self.write_indent()?;
        self.write_queued_escapes()?;
        self.sink.write_all(piece.as_bytes())?;
        self.column += width;
        Ok(())
    }
}

impl<W: Write> Layout for Output<W> {
    fn open_box(&mut self, indent: usize) -> Result<()> {
        let base = self.indent();
        self.boxes.push(base + indent);
        Ok(())
    }

    fn close_box(&mut self) -> Result<()> {
        self.boxes.pop();
        Ok(())
    }

    fn soft_break(&mut self) -> Result<()> {
        self.pending_break = true;
        Ok(())
    }

    fn newline(&mut self) -> Result<()> {
        self.write_queued_escapes()?;
        self.sink.newline()?;
        self.column = 0;
        self.at_line_start = true;
        self.pending_break = false;
        Ok(())
    }

    fn print(&mut self, text: &str) -> Result<()> {
        let mut lines = text.split('\n');
        if let Some(first) = lines.next() {
            self.print_line(first)?;
        }
        for line in lines {
            self.newline()?;
            self.print_line(line)?;
        }
        Ok(())
    }

    fn print_escape(&mut self, escape: &str) -> Result<()> {
        if self.pending_break {
            self.queued_escapes.push(escape.to_string());
            return Ok(());
        }
        self.write_indent()?;
        self.sink.write_escape(escape)?;
        Ok(())
    }
}

/// Pretty-printing stream with a bound tag renderer.
///
/// # Example
///
/// ```rust
/// use markout::{Layout, Mode, Printer};
///
/// let mut printer = Printer::new(Vec::new()).mode(Mode::Html);
/// printer.open_tag(r#"(p ((id "intro")))"#)?;
/// printer.print("hello")?;
/// printer.close_tag(r#"(p ((id "intro")))"#)?;
///
/// let out = String::from_utf8(printer.finish()?).unwrap();
/// assert_eq!(out, r#"<p id="intro">hello</p>"#);
/// # Ok::<(), markout::Error>(())
/// ```
#[derive(Debug)]
pub struct Printer<W: Write> {
    out: Output<W>,
    hooks: Hooks,
    attributes: AttributeSet,
    box_indent: usize,
}

impl<W: Write> Printer<W> {
    /// Creates a printer with tags disabled ([`Mode::None`]).
    pub fn new(writer: W) -> Self {
        Self {
            out: Output::new(writer),
            hooks: Hooks::default(),
            attributes: AttributeSet::new(),
            box_indent: DEFAULT_BOX_INDENT,
        }
    }

    /// Creates a printer from configuration and installs its mode.
    pub fn from_config(writer: W, config: &StreamConfig) -> Self {
        let mut printer = Self::new(writer)
            .margin(config.margin)
            .box_indent(config.box_indent);
        printer.attributes.extend(config.attributes.iter().cloned());
        printer.install(config.mode);
        printer
    }

    /// Sets the right margin used to decide soft breaks.
    pub fn margin(mut self, margin: usize) -> Self {
        self.out.margin = margin;
        self
    }

    /// Sets the indentation of boxes opened by tag renderers.
    ///
    /// Takes effect at the next [`install`](Self::install).
    pub fn box_indent(mut self, indent: usize) -> Self {
        self.box_indent = indent;
        self
    }

    /// Installs `mode` and returns the printer.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.install(mode);
        self
    }

    /// Registers an ANSI attribute name and returns the printer.
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.register_attribute(name);
        self
    }

    /// Binds the renderer and enable flags for `mode`.
    pub fn install(&mut self, mode: Mode) {
        tracing::debug!(%mode, "installing tag mode");
        self.hooks = mode.hooks(self.box_indent, &self.attributes);
    }

    /// Grows this printer's ANSI allow-list, including the renderer
    /// currently bound if it is the ANSI one.
    pub fn register_attribute(&mut self, name: impl Into<String>) {
        let name = name.into();
        if let Renderer::Attr(ansi) = &mut self.hooks.renderer {
            ansi.register_attribute(name.clone());
        }
        self.attributes.register(name);
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Binds previously saved hooks again.
    ///
    /// A saved ANSI renderer gets the printer's current allow-list, so names
    /// registered since the save are kept.
    pub(crate) fn restore_hooks(&mut self, mut hooks: Hooks) {
        if let Renderer::Attr(ansi) = &mut hooks.renderer {
            *ansi = AnsiRenderer::new(self.attributes.clone());
        }
        self.hooks = hooks;
    }

    pub fn current_mode(&self) -> Mode {
        self.hooks.mode
    }

    pub fn color_state(&self) -> ColorState {
        self.out.color_state()
    }

    /// The underlying writer.
    pub fn get_ref(&self) -> &W {
        self.out.sink.get_ref()
    }

    /// Opens a tag: inserts its open text, then applies its layout effect.
    pub fn open_tag(&mut self, payload: &str) -> Result<()> {
        if self.hooks.mark_tags {
            let text = self.hooks.renderer.open_text(payload)?;
            self.out.print(&text)?;
        }
        if self.hooks.print_tags {
            self.hooks.renderer.on_open(payload, &mut self.out)?;
        }
        Ok(())
    }

    /// Closes a tag: applies its layout effect, then inserts its close text.
    pub fn close_tag(&mut self, payload: &str) -> Result<()> {
        if self.hooks.print_tags {
            self.hooks.renderer.on_close(payload, &mut self.out)?;
        }
        if self.hooks.mark_tags {
            let text = self.hooks.renderer.close_text(payload)?;
            self.out.print(&text)?;
        }
        Ok(())
    }

    /// Runs `body` between [`open_tag`](Self::open_tag) and
    /// [`close_tag`](Self::close_tag).
    pub fn tagged<F>(&mut self, payload: &str, body: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.open_tag(payload)?;
        body(self)?;
        self.close_tag(payload)
    }

    /// Resets any active color, flushes, and returns the writer.
    pub fn finish(self) -> Result<W> {
        self.out.finish()
    }
}

impl<W: Write> Layout for Printer<W> {
    fn open_box(&mut self, indent: usize) -> Result<()> {
        self.out.open_box(indent)
    }

    fn close_box(&mut self) -> Result<()> {
        self.out.close_box()
    }

    fn soft_break(&mut self) -> Result<()> {
        self.out.soft_break()
    }

    fn newline(&mut self) -> Result<()> {
        self.out.newline()
    }

    fn print(&mut self, text: &str) -> Result<()> {
        self.out.print(text)
    }

    fn print_escape(&mut self, escape: &str) -> Result<()> {
        self.out.print_escape(escape)
    }
}
