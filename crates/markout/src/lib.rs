//! # Markout - Tag Rendering for Pretty-Printed Output
//!
//! Document code marks regions of pretty-printed output with tags such as
//! `(section ((id intro)))` or `.foreground \x1b[31m`. At render time the
//! installed [`Mode`] decides what a tag becomes:
//!
//! - [`Mode::Html`]: `<section id="intro">` ... `</section>`, each element in
//!   an indented box
//! - [`Mode::Text`]: `begin(intro) ` ... `end(intro)` for tags with a `title`
//!   or `id`, nothing for the rest
//! - [`Mode::Attr`]: raw terminal color escapes for registered attributes
//! - [`Mode::None`]: nothing at all
//!
//! ## Quick Start
//!
//! ```rust
//! use markout::{Layout, Mode, Printer};
//!
//! let mut printer = Printer::new(Vec::new()).mode(Mode::Text);
//! printer.tagged("(section (title Intro))", |p| p.print("Hello"))?;
//!
//! let out = String::from_utf8(printer.finish()?).unwrap();
//! assert_eq!(out, "begin(Intro) Helloend(Intro)");
//! # Ok::<(), markout::Error>(())
//! ```
//!
//! ## Terminal Colors
//!
//! The ANSI renderer only acts on attribute names registered with the
//! printer. A color stays active until the next newline, where the printer's
//! [`ColorSink`] writes [`RESET`] first. This holds for every newline,
//! including the ones the layout introduces on its own.
//!
//! ```rust
//! use markout::{Layout, Mode, Printer};
//!
//! let mut printer = Printer::new(Vec::new())
//!     .attribute("foreground")
//!     .mode(Mode::Attr);
//! printer.open_tag(".foreground \x1b[31m")?;
//! printer.print("error")?;
//! printer.close_tag(".foreground \x1b[31m")?;
//! printer.newline()?;
//!
//! let out = String::from_utf8(printer.finish()?).unwrap();
//! assert_eq!(out, "\x1b[31merror\x1b[39;49m\n");
//! # Ok::<(), markout::Error>(())
//! ```
//!
//! Tag payloads are parsed by [`markout_tags`], re-exported as [`tags`].

pub mod config;
mod error;
mod layout;
pub mod mode;
mod printer;
pub mod render;
mod sink;

pub use markout_tags as tags;

pub use config::StreamConfig;
pub use error::{Error, Result};
pub use layout::Layout;
pub use mode::{install, scoped, with_mode, Mode, ModeGuard};
pub use printer::{Hooks, Printer, DEFAULT_BOX_INDENT, DEFAULT_MARGIN};
pub use render::{
    AnsiRenderer, AttributeSet, HtmlRenderer, Renderer, TagRenderer, TextRenderer,
};
pub use sink::{ColorSink, ColorState, RESET};
