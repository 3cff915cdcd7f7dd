//! Color-tracking output sink.
//!
//! The layout engine can break a line without a matching tag close, so the
//! reset of a terminal color cannot be tied to tag closing. [`ColorSink`]
//! wraps the output writer instead: it knows whether a color is active, and
//! writes [`RESET`] in front of every newline byte while one is.

use std::io::{self, Write};

/// Restores the default foreground and background colors.
pub const RESET: &str = "\x1b[39;49m";

/// Whether the terminal is currently at its default colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorState {
    /// Default colors; newlines pass through untouched.
    #[default]
    Clean,
    /// A color is active and must be reset before the next newline.
    Dirty,
}

/// Scanner state for SGR (`ESC [ params m`) sequences crossing writes.
#[derive(Debug, Clone, Default)]
enum Scan {
    #[default]
    Ground,
    Escape,
    Csi(String),
}

/// Which color channels are away from their default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Colors {
    foreground: bool,
    background: bool,
}

impl Colors {
    fn state(self) -> ColorState {
        if self.foreground || self.background {
            ColorState::Dirty
        } else {
            ColorState::Clean
        }
    }

    /// Applies the parameters of one SGR sequence.
    fn apply_sgr(&mut self, params: &str) {
        let mut codes = params.split(';');
        while let Some(code) = codes.next() {
            match code {
                "" | "0" => *self = Colors::default(),
                "39" => self.foreground = false,
                "49" => self.background = false,
                "38" => {
                    self.foreground = true;
                    skip_extended_color(&mut codes);
                }
                "48" => {
                    self.background = true;
                    skip_extended_color(&mut codes);
                }
                _ => match code.parse::<u8>() {
                    Ok(30..=37 | 90..=97) => self.foreground = true,
                    Ok(40..=47 | 100..=107) => self.background = true,
                    _ => {}
                },
            }
        }
    }
}

/// Skips the `5;n` or `2;r;g;b` arguments of a `38`/`48` code.
fn skip_extended_color<'a>(codes: &mut impl Iterator<Item = &'a str>) {
    match codes.next() {
        Some("5") => {
            codes.next();
        }
        Some("2") => {
            codes.nth(2);
        }
        _ => {}
    }
}

/// Writer decorator that resets colors before newlines.
///
/// Every byte written goes through the sink. SGR sequences in the stream
/// update the foreground and background separately: `ESC[0m` and `ESC[m`
/// clear both, `39` and `49` clear one each, any color code sets its channel.
/// The state is dirty while either channel is set.
#[derive(Debug)]
pub struct ColorSink<W: Write> {
    inner: W,
    colors: Colors,
    scan: Scan,
}

impl<W: Write> ColorSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            colors: Colors::default(),
            scan: Scan::Ground,
        }
    }

    pub fn state(&self) -> ColorState {
        self.colors.state()
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Writes a color escape and marks the state dirty.
    ///
    /// The escape is taken as already resolved. An SGR escape updates the
    /// channels it names; anything else that is not a reset counts as a
    /// foreground color.
    pub fn write_escape(&mut self, escape: &str) -> io::Result<()> {
        self.inner.write_all(escape.as_bytes())?;
        if let Some(params) = sgr_params(escape) {
            self.colors.apply_sgr(params);
        }
        if self.colors.state() == ColorState::Clean && !is_reset_sgr(escape) {
            self.colors.foreground = true;
        }
        Ok(())
    }

    /// Writes a newline, preceded by [`RESET`] if a color is active.
    pub fn newline(&mut self) -> io::Result<()> {
        self.write_all(b"\n")
    }

    /// Resets a dangling color, flushes, and returns the wrapped writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.reset_if_dirty()?;
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn reset_if_dirty(&mut self) -> io::Result<()> {
        if self.colors.state() == ColorState::Dirty {
            self.inner.write_all(RESET.as_bytes())?;
            self.colors = Colors::default();
        }
        Ok(())
    }

    fn observe(&mut self, byte: u8) {
        self.scan = match std::mem::take(&mut self.scan) {
            Scan::Ground if byte == 0x1b => Scan::Escape,
            Scan::Ground => Scan::Ground,
            Scan::Escape if byte == b'[' => Scan::Csi(String::new()),
            Scan::Escape => Scan::Ground,
            Scan::Csi(params) => match byte {
                b'm' => {
                    self.colors.apply_sgr(&params);
                    Scan::Ground
                }
                0x40..=0x7e => Scan::Ground,
                _ => {
                    let mut params = params;
                    params.push(byte as char);
                    Scan::Csi(params)
                }
            },
        };
    }
}

impl<W: Write> Write for ColorSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for chunk in buf.split_inclusive(|b| *b == b'\n') {
            let (text, newline) = match chunk.split_last() {
                Some((b'\n', text)) => (text, true),
                _ => (chunk, false),
            };
            self.inner.write_all(text)?;
            for byte in text {
                self.observe(*byte);
            }
            if newline {
                self.reset_if_dirty()?;
                self.inner.write_all(b"\n")?;
                self.scan = Scan::Ground;
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn sgr_params(escape: &str) -> Option<&str> {
    escape
        .strip_prefix("\x1b[")
        .and_then(|rest| rest.strip_suffix('m'))
}

/// True for an SGR escape made only of reset codes.
pub(crate) fn is_reset_sgr(escape: &str) -> bool {
    sgr_params(escape).is_some_and(|params| {
        params
            .split(';')
            .all(|p| matches!(p, "" | "0" | "39" | "49"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(sink: ColorSink<Vec<u8>>) -> String {
        String::from_utf8(sink.finish().unwrap()).unwrap()
    }

    #[test]
    fn clean_newline_passes_through() {
        let mut sink = ColorSink::new(Vec::new());
        sink.write_all(b"a\nb").unwrap();
        sink.newline().unwrap();
        assert_eq!(sink.state(), ColorState::Clean);
        assert_eq!(written(sink), "a\nb\n");
    }

    #[test]
    fn escape_marks_dirty_and_newline_resets() {
        let mut sink = ColorSink::new(Vec::new());
        sink.write_escape("\x1b[31m").unwrap();
        assert_eq!(sink.state(), ColorState::Dirty);
        sink.write_all(b"red").unwrap();
        sink.newline().unwrap();
        assert_eq!(sink.state(), ColorState::Clean);
        sink.newline().unwrap();
        assert_eq!(written(sink), "\x1b[31mred\x1b[39;49m\n\n");
    }

    #[test]
    fn unrecognized_escape_value_still_dirty() {
        let mut sink = ColorSink::new(Vec::new());
        sink.write_escape("<red>").unwrap();
        assert_eq!(sink.state(), ColorState::Dirty);
    }

    #[test]
    fn partial_reset_escape_keeps_other_channel() {
        let mut sink = ColorSink::new(Vec::new());
        sink.write_escape("\x1b[44m").unwrap();
        sink.write_escape("\x1b[39m").unwrap();
        assert_eq!(sink.state(), ColorState::Dirty);
        sink.write_escape("\x1b[49m").unwrap();
        assert_eq!(sink.state(), ColorState::Clean);
    }

    #[test]
    fn writing_reset_escape_stays_clean() {
        let mut sink = ColorSink::new(Vec::new());
        sink.write_escape(RESET).unwrap();
        assert_eq!(sink.state(), ColorState::Clean);
    }

    #[test]
    fn embedded_newline_gets_reset() {
        let mut sink = ColorSink::new(Vec::new());
        sink.write_escape("\x1b[44m").unwrap();
        sink.write_all(b"one\ntwo\nthree").unwrap();
        assert_eq!(written(sink), "\x1b[44mone\x1b[39;49m\ntwo\nthree");
    }

    mod observed {
        use super::*;

        #[test]
        fn sgr_in_text_marks_dirty() {
            let mut sink = ColorSink::new(Vec::new());
            sink.write_all(b"x\x1b[1;32my").unwrap();
            assert_eq!(sink.state(), ColorState::Dirty);
        }

        #[test]
        fn sgr_reset_in_text_marks_clean() {
            let mut sink = ColorSink::new(Vec::new());
            sink.write_all(b"\x1b[31mred\x1b[0m\n").unwrap();
            assert_eq!(sink.state(), ColorState::Clean);
            assert_eq!(written(sink), "\x1b[31mred\x1b[0m\n");
        }

        #[test]
        fn sequence_split_across_writes() {
            let mut sink = ColorSink::new(Vec::new());
            sink.write_all(b"\x1b[3").unwrap();
            assert_eq!(sink.state(), ColorState::Clean);
            sink.write_all(b"4m").unwrap();
            assert_eq!(sink.state(), ColorState::Dirty);
        }

        #[test]
        fn foreground_reset_keeps_background_dirty() {
            let mut sink = ColorSink::new(Vec::new());
            sink.write_all(b"\x1b[44mx\x1b[39my").unwrap();
            assert_eq!(sink.state(), ColorState::Dirty);
            sink.newline().unwrap();
            assert_eq!(sink.state(), ColorState::Clean);
            assert_eq!(written(sink), "\x1b[44mx\x1b[39my\x1b[39;49m\n");
        }

        #[test]
        fn both_channel_resets_clean() {
            let mut sink = ColorSink::new(Vec::new());
            sink.write_all(b"\x1b[31;44mx\x1b[49m").unwrap();
            assert_eq!(sink.state(), ColorState::Dirty);
            sink.write_all(b"\x1b[39m").unwrap();
            assert_eq!(sink.state(), ColorState::Clean);
        }

        #[test]
        fn extended_color_arguments_skipped() {
            let mut sink = ColorSink::new(Vec::new());
            // `49` here is the blue component, not a background reset.
            sink.write_all(b"\x1b[48;2;10;20;49m").unwrap();
            assert_eq!(sink.state(), ColorState::Dirty);
            sink.write_all(b"\x1b[38;5;208m\x1b[49m").unwrap();
            assert_eq!(sink.state(), ColorState::Dirty);
        }

        #[test]
        fn non_color_sgr_stays_clean() {
            let mut sink = ColorSink::new(Vec::new());
            sink.write_all(b"\x1b[1mbold\x1b[22m").unwrap();
            assert_eq!(sink.state(), ColorState::Clean);
        }

        #[test]
        fn non_sgr_csi_ignored() {
            let mut sink = ColorSink::new(Vec::new());
            sink.write_all(b"\x1b[2K").unwrap();
            assert_eq!(sink.state(), ColorState::Clean);
        }

        #[test]
        fn console_styled_text_ends_clean() {
            let styled = console::Style::new()
                .red()
                .force_styling(true)
                .apply_to("warn")
                .to_string();
            let mut sink = ColorSink::new(Vec::new());
            sink.write_all(styled.as_bytes()).unwrap();
            assert_eq!(sink.state(), ColorState::Clean);
        }
    }

    #[test]
    fn finish_resets_dangling_color() {
        let mut sink = ColorSink::new(Vec::new());
        sink.write_escape("\x1b[31m").unwrap();
        sink.write_all(b"x").unwrap();
        assert_eq!(written(sink), "\x1b[31mx\x1b[39;49m");
    }

    #[test]
    fn reset_recognition() {
        assert!(is_reset_sgr("\x1b[0m"));
        assert!(is_reset_sgr("\x1b[m"));
        assert!(is_reset_sgr(RESET));
        assert!(!is_reset_sgr("\x1b[31m"));
        assert!(!is_reset_sgr("plain"));
    }
}
