use std::sync::LazyLock;

use regex::Regex;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#{3}(?:[^#]|$)").unwrap());
static BANNER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#+").unwrap());
static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^- ").unwrap());
static CONTINUATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ {5,}\S").unwrap());

pub const DIMENSION_MARKER: &str = "Dimension translations:";

/// Width of the indent that marks a code-table continuation line.
pub const CONTINUATION_INDENT: &str = "     ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `### ...` feature heading.
    Heading,
    /// Any other `#` heading level (document title, part banners).
    Banner,
    Bullet,
    Continuation,
    DimensionMarker,
    Text,
    Blank,
}

#[derive(Debug, Clone, Copy)]
pub struct Line<'a> {
    pub kind: LineKind,
    pub text: &'a str,
    /// Byte range in the document, including the line terminator.
    pub start: usize,
    pub end: usize,
}

pub fn classify(line: &str) -> LineKind {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }
    if HEADING_RE.is_match(line) {
        return LineKind::Heading;
    }
    if BANNER_RE.is_match(line) {
        return LineKind::Banner;
    }
    if BULLET_RE.is_match(line) {
        return LineKind::Bullet;
    }
    if CONTINUATION_RE.is_match(line) {
        return LineKind::Continuation;
    }
    if line.trim() == DIMENSION_MARKER {
        return LineKind::DimensionMarker;
    }
    LineKind::Text
}

/// Walks a document line by line, keeping byte offsets so zones can be sliced
/// straight out of the source.
pub struct Lines<'a> {
    doc: &'a str,
    pos: usize,
}

impl<'a> Lines<'a> {
    pub fn new(doc: &'a str) -> Self {
        Self { doc, pos: 0 }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.doc.len() {
            return None;
        }
        let rest = &self.doc[self.pos..];
        let len = rest.find('\n').map(|i| i + 1).unwrap_or(rest.len());
        let start = self.pos;
        let end = start + len;
        self.pos = end;

        let text = rest[..len].trim_end_matches(['\n', '\r']);
        Some(Line {
            kind: classify(text),
            text,
            start,
            end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings() {
        assert_eq!(classify("### 1.1. AGER_TYP"), LineKind::Heading);
        assert_eq!(classify("###"), LineKind::Heading);
        assert_eq!(classify("## 1. Person-level features"), LineKind::Banner);
        assert_eq!(classify("#### deeper"), LineKind::Banner);
        assert_eq!(classify("# Data Dictionary"), LineKind::Banner);
    }

    #[test]
    fn bullets_and_continuations() {
        assert_eq!(classify("- -1: unknown"), LineKind::Bullet);
        assert_eq!(classify("-  1: low"), LineKind::Bullet);
        assert_eq!(classify("     (Mainstream, E+W)"), LineKind::Continuation);
        assert_eq!(classify("    four spaces"), LineKind::Text);
    }

    #[test]
    fn marker_blank_and_text() {
        assert_eq!(classify("Dimension translations:"), LineKind::DimensionMarker);
        assert_eq!(classify("   "), LineKind::Blank);
        assert_eq!(classify("Best-ager typology"), LineKind::Text);
    }

    #[test]
    fn offsets_cover_document() {
        let doc = "### A\r\ntext\nlast";
        let lines: Vec<_> = Lines::new(doc).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].text, "### A");
        assert_eq!(lines[0].end, lines[1].start);
        assert_eq!(lines[2].text, "last");
        assert_eq!(lines[2].end, doc.len());
    }
}
