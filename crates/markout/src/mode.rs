//! Mode selection and installation.
//!
//! A [`Mode`] picks which renderer a [`Printer`] has bound and which of its
//! tag hooks are enabled:
//!
//! | Mode   | Renderer         | open/close text | layout hooks |
//! |--------|------------------|-----------------|--------------|
//! | `Html` | [`HtmlRenderer`] | yes             | yes          |
//! | `Text` | [`TextRenderer`] | yes             | yes          |
//! | `Attr` | [`AnsiRenderer`] | no              | yes          |
//! | `None` | none             | no              | no           |
//!
//! [`with_mode`] switches mode for the duration of a closure and puts the
//! previous hooks back afterwards, however the closure exits.

use std::fmt;
use std::io::Write;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use console::Term;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::printer::{Hooks, Printer};
use crate::render::{AnsiRenderer, AttributeSet, HtmlRenderer, Renderer, TextRenderer};

/// How tags are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// HTML elements.
    Html,
    /// `begin(label)` / `end(label)` markers.
    Text,
    /// ANSI color escapes for registered attributes.
    Attr,
    /// Tags are stripped.
    #[default]
    None,
}

impl Mode {
    /// `Attr` when stdout supports colors, `None` otherwise.
    pub fn auto() -> Mode {
        if Term::stdout().features().colors_supported() {
            Mode::Attr
        } else {
            Mode::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Html => "html",
            Mode::Text => "text",
            Mode::Attr => "attr",
            Mode::None => "none",
        }
    }

    /// Builds the hooks this mode binds.
    pub(crate) fn hooks(self, box_indent: usize, attributes: &AttributeSet) -> Hooks {
        let (renderer, mark_tags, print_tags) = match self {
            Mode::Html => (Renderer::Html(HtmlRenderer::new(box_indent)), true, true),
            Mode::Text => (Renderer::Text(TextRenderer::new(box_indent)), true, true),
            Mode::Attr => (
                Renderer::Attr(AnsiRenderer::new(attributes.clone())),
                false,
                true,
            ),
            Mode::None => (Renderer::Disabled, false, false),
        };
        Hooks {
            mode: self,
            renderer,
            mark_tags,
            print_tags,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(Mode::Html),
            "text" => Ok(Mode::Text),
            "attr" => Ok(Mode::Attr),
            "none" => Ok(Mode::None),
            _ => Err(Error::UnknownMode(s.to_string())),
        }
    }
}

/// Binds `mode`'s hooks onto `printer`.
pub fn install<W: Write>(printer: &mut Printer<W>, mode: Mode) {
    printer.install(mode);
}

/// Installs `mode` on `printer` until the returned guard is dropped.
///
/// The guard derefs to the printer. Dropping it, including during a panic,
/// restores the hooks that were bound before.
pub fn scoped<W: Write>(printer: &mut Printer<W>, mode: Mode) -> ModeGuard<'_, W> {
    let saved = printer.hooks().clone();
    printer.install(mode);
    ModeGuard {
        printer,
        saved: Some(saved),
    }
}

/// Runs `body` with `mode` installed, then restores the previous hooks.
///
/// ```rust
/// use markout::{with_mode, Layout, Mode, Printer};
///
/// let mut printer = Printer::new(Vec::new()).mode(Mode::Html);
/// with_mode(&mut printer, Mode::Text, |p| {
///     p.tagged("(section (id s1))", |p| p.print("body"))
/// })?;
/// assert_eq!(printer.current_mode(), Mode::Html);
/// # Ok::<(), markout::Error>(())
/// ```
pub fn with_mode<W, F, R>(printer: &mut Printer<W>, mode: Mode, body: F) -> R
where
    W: Write,
    F: FnOnce(&mut Printer<W>) -> R,
{
    let mut guard = scoped(printer, mode);
    body(&mut *guard)
}

/// Restores a printer's previous hooks on drop. See [`scoped`].
pub struct ModeGuard<'p, W: Write> {
    printer: &'p mut Printer<W>,
    saved: Option<Hooks>,
}

impl<W: Write> Deref for ModeGuard<'_, W> {
    type Target = Printer<W>;

    fn deref(&self) -> &Self::Target {
        self.printer
    }
}

impl<W: Write> DerefMut for ModeGuard<'_, W> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.printer
    }
}

impl<W: Write> Drop for ModeGuard<'_, W> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            tracing::trace!(mode = %saved.mode, "restoring tag mode");
            self.printer.restore_hooks(saved);
        }
    }
}
