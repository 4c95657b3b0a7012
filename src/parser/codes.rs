use std::sync::LazyLock;

use indexmap::map::Entry;
use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;

use super::lines::CONTINUATION_INDENT;
use crate::error::StructuralError;

// "-  2: very likely", "- -1: unknown", "- XX: unknown"
static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^- {1,2}(-?\d+|[0-9A-Za-z]+):\s*(.*)$").unwrap());
// "- missing data encoded as 0"
static PROSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^- +\S").unwrap());

/// Entry synthesized when a table only describes its missing-value sentinel in prose.
pub const MISSING_SYMBOL: &str = "0";
pub const MISSING_DESCRIPTION: &str = "missing";

/// Ordered symbol → description mapping of one feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CodeTable {
    entries: IndexMap<String, String>,
    #[serde(skip)]
    duplicates: Vec<String>,
}

impl CodeTable {
    pub fn get(&self, symbol: &str) -> Option<&str> {
        self.entries.get(symbol).map(String::as_str)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Symbols that appeared more than once. The first description was kept.
    pub fn duplicate_symbols(&self) -> &[String] {
        &self.duplicates
    }

    fn insert(&mut self, symbol: String, description: String) {
        match self.entries.entry(symbol) {
            Entry::Vacant(slot) => {
                slot.insert(description);
            }
            Entry::Occupied(slot) => self.duplicates.push(slot.key().clone()),
        }
    }
}

impl<S: Into<String>, D: Into<String>> FromIterator<(S, D)> for CodeTable {
    fn from_iter<I: IntoIterator<Item = (S, D)>>(iter: I) -> Self {
        let mut table = CodeTable::default();
        for (symbol, description) in iter {
            table.insert(symbol.into(), description.into());
        }
        table
    }
}

/// What the previous non-blank line was, so continuations bind backwards only.
enum Tail {
    Start,
    Entry,
    Prose,
}

/// Parse a non-absent code-table zone.
///
/// `- SYMBOL: text` bullets are the primary grammar; lines indented by five
/// spaces continue the bullet right above them. A table made of exactly one
/// prose bullet is the "missing data encoded as 0" idiom and becomes
/// `{"0": "missing"}`. Anything else is an error carrying the zone text.
pub fn parse_code_table(zone: &str) -> Result<CodeTable, StructuralError> {
    let mut entries: Vec<(String, String)> = Vec::new();
    let mut prose = 0;
    let mut tail = Tail::Start;

    for line in zone.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix(CONTINUATION_INDENT) {
            match tail {
                Tail::Entry => {
                    if let Some((_, description)) = entries.last_mut() {
                        if !description.is_empty() {
                            description.push(' ');
                        }
                        description.push_str(rest.trim());
                    }
                }
                Tail::Prose => {}
                Tail::Start => {
                    return Err(StructuralError::OrphanContinuation {
                        raw: zone.to_string(),
                    })
                }
            }
            continue;
        }

        if let Some(caps) = ENTRY_RE.captures(line) {
            entries.push((caps[1].to_string(), caps[2].trim_end().to_string()));
            tail = Tail::Entry;
        } else if PROSE_RE.is_match(line) {
            prose += 1;
            tail = Tail::Prose;
        } else {
            return Err(StructuralError::UnparseableCodeTable {
                raw: zone.to_string(),
            });
        }
    }

    match (entries.is_empty(), prose) {
        (false, 0) => Ok(entries.into_iter().collect()),
        (false, _) => Err(StructuralError::MixedCodeTable {
            raw: zone.to_string(),
        }),
        (true, 1) => Ok(CodeTable::from_iter([(MISSING_SYMBOL, MISSING_DESCRIPTION)])),
        (true, _) => Err(StructuralError::UnparseableCodeTable {
            raw: zone.to_string(),
        }),
    }
}
