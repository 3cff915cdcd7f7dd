//! Plain-text begin/end marker renderer.
//!
//! A tag with a `title` or `id` attribute renders as `begin(label) ` at the
//! open boundary and `end(label)` at the close, inside its own box. Tags
//! without a label leave no trace in text or layout.

use markout_tags::{parse, unquote, Tag};

use super::TagRenderer;
use crate::error::Result;
use crate::layout::Layout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRenderer {
    indent: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

impl TextRenderer {
    pub fn new(indent: usize) -> Self {
        Self { indent }
    }

    /// The label of a tag: its `title`, or failing that its `id`.
    ///
    /// A key that occurs more than once counts as ambiguous and yields no
    /// label, even when the other key is present once.
    pub fn label(tag: &Tag) -> Option<String> {
        let mut titles = Vec::new();
        let mut ids = Vec::new();
        for (key, value) in tag.attributes() {
            match key.as_str() {
                "title" => titles.push(value),
                "id" => ids.push(value),
                _ => {}
            }
        }
        match (titles.as_slice(), ids.as_slice()) {
            ([title], _) => Some(unquote(title).into_owned()),
            ([], [id]) => Some(unquote(id).into_owned()),
            _ => None,
        }
    }

    fn payload_label(payload: &str) -> Result<Option<String>> {
        Ok(Self::label(&parse(payload)?))
    }
}

impl TagRenderer for TextRenderer {
    fn open_text(&self, payload: &str) -> Result<String> {
        Ok(Self::payload_label(payload)?
            .map(|label| format!("begin({}) ", label))
            .unwrap_or_default())
    }

    fn close_text(&self, payload: &str) -> Result<String> {
        Ok(Self::payload_label(payload)?
            .map(|label| format!("end({})", label))
            .unwrap_or_default())
    }

    fn on_open(&self, payload: &str, layout: &mut dyn Layout) -> Result<()> {
        if Self::payload_label(payload)?.is_some() {
            layout.open_box(self.indent)?;
            layout.soft_break()?;
        }
        Ok(())
    }

    fn on_close(&self, payload: &str, layout: &mut dyn Layout) -> Result<()> {
        if Self::payload_label(payload)?.is_some() {
            layout.close_box()?;
            layout.soft_break()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::{Call, Recorder};

    mod label {
        use super::*;

        fn label_of(payload: &str) -> Option<String> {
            TextRenderer::label(&parse(payload).unwrap())
        }

        #[test]
        fn id_only() {
            assert_eq!(label_of("(section (id sec1))"), Some("sec1".into()));
        }

        #[test]
        fn title_wins_over_id() {
            assert_eq!(
                label_of("(section (title intro) (id sec1))"),
                Some("intro".into())
            );
            assert_eq!(
                label_of("(section (id sec1) (title intro))"),
                Some("intro".into())
            );
        }

        #[test]
        fn neither() {
            assert_eq!(label_of("(section (class wide))"), None);
        }

        #[test]
        fn bare_atom() {
            assert_eq!(label_of("section"), None);
        }

        #[test]
        fn quoted_value_unquoted() {
            assert_eq!(
                label_of(r#"(h1 ((title "Getting started")))"#),
                Some("Getting started".into())
            );
        }

        #[test]
        fn duplicate_title_is_ambiguous() {
            assert_eq!(label_of("(s (title a) (title b))"), None);
            assert_eq!(label_of("(s (title a) (title b) (id c))"), None);
        }

        #[test]
        fn duplicate_id_is_ambiguous() {
            assert_eq!(label_of("(s (id a) (id b))"), None);
        }

        #[test]
        fn single_title_beats_duplicate_ids() {
            assert_eq!(label_of("(s (id a) (id b) (title t))"), Some("t".into()));
        }
    }

    #[test]
    fn labelled_markers() {
        let text = TextRenderer::default();
        assert_eq!(text.open_text("(section (id sec1))").unwrap(), "begin(sec1) ");
        assert_eq!(text.close_text("(section (id sec1))").unwrap(), "end(sec1)");
    }

    #[test]
    fn unlabelled_is_transparent() {
        let text = TextRenderer::default();
        let mut layout = Recorder::default();
        assert_eq!(text.open_text("em").unwrap(), "");
        assert_eq!(text.close_text("em").unwrap(), "");
        text.on_open("em", &mut layout).unwrap();
        text.on_close("em", &mut layout).unwrap();
        assert!(layout.calls.is_empty());
    }

    #[test]
    fn labelled_opens_box() {
        let text = TextRenderer::new(3);
        let mut layout = Recorder::default();
        text.on_open("(s (title t))", &mut layout).unwrap();
        text.on_close("(s (title t))", &mut layout).unwrap();
        assert_eq!(
            layout.calls,
            vec![
                Call::OpenBox(3),
                Call::SoftBreak,
                Call::CloseBox,
                Call::SoftBreak
            ]
        );
    }

    #[test]
    fn malformed_payload_is_error() {
        assert!(TextRenderer::default().open_text("(s (id))").is_err());
    }
}
