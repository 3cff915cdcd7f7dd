//! Printer configuration.
//!
//! [`StreamConfig`] holds everything needed to build a [`Printer`](crate::Printer)
//! with [`Printer::from_config`](crate::Printer::from_config). It deserializes
//! from any serde format; missing fields take their defaults.
//!
//! ```yaml
//! mode: attr
//! margin: 100
//! box_indent: 4
//! attributes: [foreground, background]
//! ```

use serde::{Deserialize, Serialize};

use crate::mode::Mode;
use crate::printer::{DEFAULT_BOX_INDENT, DEFAULT_MARGIN};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Mode installed at construction.
    pub mode: Mode,
    /// Right margin for soft breaks.
    pub margin: usize,
    /// Indentation of boxes opened by tag renderers.
    pub box_indent: usize,
    /// Attribute names the ANSI renderer acts on.
    pub attributes: Vec<String>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            mode: Mode::None,
            margin: DEFAULT_MARGIN,
            box_indent: DEFAULT_BOX_INDENT,
            attributes: Vec::new(),
        }
    }
}
