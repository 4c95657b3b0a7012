use std::iter::Peekable;

use super::lines::{Line, LineKind, Lines};
use crate::error::{CodexError, EmptyReason};

/// One of the four captured regions of a section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Zone<'a> {
    #[default]
    Absent,
    Present(&'a str),
}

impl<'a> Zone<'a> {
    /// Whitespace-only text is the same as no text at all.
    pub fn new(text: &'a str) -> Self {
        if text.trim().is_empty() {
            Zone::Absent
        } else {
            Zone::Present(text)
        }
    }

    fn slice(doc: &'a str, span: Option<Span>) -> Self {
        span.map(|s| Zone::new(&doc[s.start..s.end]))
            .unwrap_or_default()
    }

    pub fn as_str(self) -> Option<&'a str> {
        match self {
            Zone::Absent => None,
            Zone::Present(text) => Some(text),
        }
    }

    pub fn is_absent(self) -> bool {
        matches!(self, Zone::Absent)
    }
}

#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
}

fn extend(span: &mut Option<Span>, line: &Line<'_>) {
    match span {
        Some(s) => s.end = line.end,
        None => {
            *span = Some(Span {
                start: line.start,
                end: line.end,
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    pub heading: Zone<'a>,
    pub definition: Zone<'a>,
    pub codes: Zone<'a>,
    pub dimensions: Zone<'a>,
    /// Whole section as it appears in the document.
    pub raw: &'a str,
}

impl<'a> Section<'a> {
    /// First heading line, for error messages and logs.
    pub fn heading_line(&self) -> &'a str {
        self.heading
            .as_str()
            .unwrap_or(self.raw)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
    }

    pub fn has_content(&self) -> bool {
        !(self.definition.is_absent() && self.codes.is_absent() && self.dimensions.is_absent())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Heading,
    Definition,
    Codes,
    Dimensions,
}

/// Lazy, single-pass walk over the sections of a document, in order.
pub struct Segmenter<'a> {
    doc: &'a str,
    lines: Peekable<Lines<'a>>,
}

/// Start segmenting `doc`. A document without a single `###` heading is an error.
pub fn segment(doc: &str) -> Result<Segmenter<'_>, CodexError> {
    if !Lines::new(doc).any(|l| l.kind == LineKind::Heading) {
        return Err(CodexError::EmptyDocument(EmptyReason::NoSections));
    }
    Ok(Segmenter {
        doc,
        lines: Lines::new(doc).peekable(),
    })
}

impl<'a> Iterator for Segmenter<'a> {
    type Item = Section<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        // Preamble and part banners sit outside every section.
        let first = loop {
            let line = self.lines.next()?;
            if line.kind == LineKind::Heading {
                break line;
            }
        };

        let mut heading = None;
        let mut definition = None;
        let mut codes = None;
        let mut dimensions = None;
        extend(&mut heading, &first);
        let mut end = first.end;
        let mut stage = Stage::Heading;

        while let Some(line) = self.lines.peek().copied() {
            match (stage, line.kind) {
                (Stage::Heading, LineKind::Heading) => extend(&mut heading, &line),
                (_, LineKind::Heading | LineKind::Banner) => break,
                (Stage::Heading | Stage::Definition, LineKind::Bullet) => {
                    stage = Stage::Codes;
                    extend(&mut codes, &line);
                }
                (Stage::Heading | Stage::Definition | Stage::Codes, LineKind::DimensionMarker) => {
                    stage = Stage::Dimensions;
                    // The marker itself is not part of the zone.
                    dimensions = Some(Span {
                        start: line.end,
                        end: line.end,
                    });
                }
                (Stage::Heading | Stage::Definition, _) => {
                    stage = Stage::Definition;
                    extend(&mut definition, &line);
                }
                (Stage::Codes, _) => extend(&mut codes, &line),
                (Stage::Dimensions, _) => extend(&mut dimensions, &line),
            }
            end = line.end;
            self.lines.next();
        }

        Some(Section {
            heading: Zone::slice(self.doc, heading),
            definition: Zone::slice(self.doc, definition),
            codes: Zone::slice(self.doc, codes),
            dimensions: Zone::slice(self.doc, dimensions),
            raw: &self.doc[first.start..end],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections(doc: &str) -> Vec<Section<'_>> {
        segment(doc).unwrap().collect()
    }

    #[test]
    fn four_zones() {
        let doc = "### 1.8. FINANZ_SPARER, FINANZ_ANLEGER\n\
                   Financial typology, for each dimension:\n\
                   - -1: unknown\n\
                   -  1: very high\n\
                   \n\
                   Dimension translations:\n\
                   - SPARER: money-saver\n\
                   - ANLEGER: investor\n";
        let s = sections(doc);
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].heading.as_str(), Some("### 1.8. FINANZ_SPARER, FINANZ_ANLEGER\n"));
        assert_eq!(
            s[0].definition.as_str(),
            Some("Financial typology, for each dimension:\n")
        );
        assert!(s[0].codes.as_str().unwrap().starts_with("- -1: unknown\n"));
        assert_eq!(
            s[0].dimensions.as_str(),
            Some("- SPARER: money-saver\n- ANLEGER: investor\n")
        );
    }

    #[test]
    fn multi_line_heading_is_one_zone() {
        let doc = "### 1.8. A, B,\n### C\nshared\n";
        let s = sections(doc);
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].heading.as_str(), Some("### 1.8. A, B,\n### C\n"));
    }

    #[test]
    fn whitespace_zones_are_absent() {
        let doc = "### 1.1. A\n   \n\n### 1.2. B\nDefinition\n";
        let s = sections(doc);
        assert_eq!(s.len(), 2);
        assert!(s[0].definition.is_absent());
        assert!(s[0].codes.is_absent());
        assert!(!s[0].has_content());
        assert_eq!(s[1].definition.as_str(), Some("Definition\n"));
    }

    #[test]
    fn banners_and_preamble_are_skipped() {
        let doc = "# Title\n\nIntro text\n## 1. Part\n### 1.1. A\n- 1: x\n## 2. Part\nnotes\n### 2.1. B\n";
        let s = sections(doc);
        assert_eq!(s.len(), 2);
        assert_eq!(s[0].codes.as_str(), Some("- 1: x\n"));
        assert_eq!(s[1].heading_line(), "### 2.1. B");
    }

    #[test]
    fn continuation_stays_in_code_zone() {
        let doc = "### 1.1. A\n-  1: first part\n     second part\n-  2: b\n";
        let s = sections(doc);
        assert_eq!(
            s[0].codes.as_str(),
            Some("-  1: first part\n     second part\n-  2: b\n")
        );
    }

    #[test]
    fn marker_without_bullets_is_absent() {
        let doc = "### 1.1. A\ndef\nDimension translations:\n\n";
        let s = sections(doc);
        assert!(s[0].dimensions.is_absent());
    }

    #[test]
    fn no_heading_is_an_error() {
        let err = segment("just text\n- 1: x\n").err().unwrap();
        assert!(matches!(err, CodexError::EmptyDocument(EmptyReason::NoSections)));
    }

    #[test]
    fn raw_spans_the_section() {
        let doc = "### 1.1. A\ndef\n### 1.2. B\n";
        let s = sections(doc);
        assert_eq!(s[0].raw, "### 1.1. A\ndef\n");
        assert_eq!(s[1].raw, "### 1.2. B\n");
    }
}
