//! The layout surface renderers call back into.
//!
//! [`Layout`] is the set of box and printing primitives a pretty-printing
//! engine exposes to tag hooks. [`Printer`](crate::Printer) is the engine in
//! this crate; renderers only ever see `&mut dyn Layout`.

use crate::error::Result;

/// Box, break and printing primitives of a pretty-printing engine.
pub trait Layout {
    /// Opens a box whose continuation lines are indented `indent` columns
    /// past the enclosing box.
    fn open_box(&mut self, indent: usize) -> Result<()>;

    /// Closes the innermost box. Closing with no open box does nothing.
    fn close_box(&mut self) -> Result<()>;

    /// Marks a point where the line may break if the next text does not fit.
    fn soft_break(&mut self) -> Result<()>;

    /// Forces a line break.
    fn newline(&mut self) -> Result<()>;

    /// Prints text. Embedded `\n` characters break the line.
    fn print(&mut self, text: &str) -> Result<()>;

    /// Emits a terminal color escape that occupies no columns and leaves the
    /// output in a non-default color.
    fn print_escape(&mut self, escape: &str) -> Result<()>;
}
