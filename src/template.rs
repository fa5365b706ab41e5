//! Line formatting for the meter.
//!
//! A caller supplies a format containing one `%d` placeholder (e.g. `"Processing %d
//! files"`). The meter augments it with two trailing cells so that every render has the
//! shape:
//!
//! ```text
//! <head><count><tail>   <status>                    <terminator>
//! ```
//!
//! The fixed padding around the status cell is what keeps a shorter render from leaving
//! stray characters of a longer one on screen.

use std::fmt::Write as _;

use compact_str::CompactString;

/// Spacing between the caller's text and the status cell.
const STATUS_PAD: &str = "   ";
/// Spacing between the status cell and the line terminator.
const TRAILER_PAD: &str = "                    ";

/// Terminator of a periodic render: return to column 0 so the next render overwrites it.
pub const OVERWRITE: &str = "\r";
/// Terminator of the final render: keep the line.
pub const NEWLINE: &str = "\n";
/// Status cell of the final render, blanking any spinner glyph.
pub const CLEAR_STATUS: &str = " ";

/// The classic spinner animation, shown while nothing has been counted yet.
pub const DEFAULT_GLYPHS: [&str; 12] = ["|", "(", "<", "-", "<", "(", "|", ")", ">", "-", ">", ")"];

/// Widest padding a placeholder may request.
const MAX_WIDTH: usize = 64;

/// How the count fills a placeholder wider than its digits.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum Pad {
    /// `%5d`
    #[default]
    Right,
    /// `%-5d`
    Left,
    /// `%05d`
    Zeros,
}

/// The `%[-0][width]d` placeholder.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
struct CountSpec {
    width: usize,
    pad: Pad,
}

impl CountSpec {
    /// Parses the text following a `%`, returning the spec and the bytes it used.
    fn parse(s: &str) -> Option<(Self, usize)> {
        let (pad, flag) = match s.as_bytes().first() {
            Some(b'-') => (Pad::Left, 1),
            Some(b'0') => (Pad::Zeros, 1),
            _ => (Pad::Right, 0),
        };
        let digits = s[flag..].bytes().take_while(u8::is_ascii_digit).count();
        let end = flag + digits;
        if s.as_bytes().get(end) != Some(&b'd') {
            return None;
        }
        let width = if digits == 0 {
            0
        } else {
            s[flag..end].parse::<usize>().map_or(MAX_WIDTH, |w| w.min(MAX_WIDTH))
        };
        Some((Self { width, pad }, end + 1))
    }

    fn write(self, line: &mut String, count: i64) {
        let width = self.width;
        // Writing into a String cannot fail.
        let _ = match self.pad {
            Pad::Right => write!(line, "{count:>width$}"),
            Pad::Left => write!(line, "{count:<width$}"),
            Pad::Zeros => write!(line, "{count:0width$}"),
        };
    }
}

/// A parsed display template, split around the count placeholder.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Template {
    head: CompactString,
    tail: CompactString,
    count: Option<CountSpec>,
}

impl Template {
    /// Parses `format`, locating the first `%d`.
    ///
    /// The placeholder may carry a width and a `-` (left-align) or `0` (zero-fill)
    /// flag, as in `%8d`, `%-8d` or `%08d`; widths are capped at 64. `%%` renders a
    /// literal `%`. Any other `%` sequence, and any placeholder after the first, is
    /// kept verbatim. A format without a placeholder renders as plain text.
    #[must_use]
    pub fn parse(format: &str) -> Self {
        let mut template = Self::default();
        let mut rest = format;

        while let Some(pos) = rest.find('%') {
            template.push_text(&rest[..pos]);
            let after = &rest[pos + 1..];
            if let Some(tail) = after.strip_prefix('%') {
                template.push_text("%");
                rest = tail;
                continue;
            }
            match CountSpec::parse(after).filter(|_| template.count.is_none()) {
                Some((spec, used)) => {
                    template.count = Some(spec);
                    rest = &after[used..];
                }
                None => {
                    template.push_text("%");
                    rest = after;
                }
            }
        }
        template.push_text(rest);
        template
    }

    fn push_text(&mut self, text: &str) {
        if self.count.is_some() {
            self.tail.push_str(text);
        } else {
            self.head.push_str(text);
        }
    }

    /// Renders one complete line.
    #[must_use]
    pub fn render(&self, count: i64, status: &str, terminator: &str) -> String {
        let mut line = String::with_capacity(
            self.head.len() + self.tail.len() + STATUS_PAD.len() + TRAILER_PAD.len() + 24,
        );
        line.push_str(&self.head);
        if let Some(spec) = self.count {
            spec.write(&mut line, count);
        }
        line.push_str(&self.tail);
        line.push_str(STATUS_PAD);
        line.push_str(status);
        line.push_str(TRAILER_PAD);
        line.push_str(terminator);
        line
    }
}

/// A cyclic sequence of spinner glyphs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Glyphs(Vec<CompactString>);

impl Glyphs {
    /// Builds a glyph sequence. An empty sequence yields a blank status cell.
    pub fn new<I, S>(glyphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        Self(glyphs.into_iter().map(Into::into).collect())
    }

    /// Advances `index` by one (wrapping) and returns the glyph it now points at.
    pub fn advance(&self, index: &mut usize) -> &str {
        if self.0.is_empty() {
            return "";
        }
        *index = (*index + 1) % self.0.len();
        &self.0[*index]
    }

    /// Number of glyphs in one cycle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no glyphs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Glyphs {
    fn default() -> Self {
        Self::new(DEFAULT_GLYPHS)
    }
}
