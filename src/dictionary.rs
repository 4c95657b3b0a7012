use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{CodexError, EmptyReason};
use crate::parser::codes::CodeTable;
use crate::parser::section::{is_table_of_contents, parse_section};
use crate::parser::segment::segment;

/// One row of the data dictionary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub feature_name: String,
    pub section_no: String,
    pub definition: Option<String>,
    pub codes: Option<CodeTable>,
    pub dim_translation: Option<Vec<String>>,
}

/// Data-quality conditions that do not stop a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QualityIssue {
    DuplicateSymbol { section_no: String, symbol: String },
    MissingSummary { feature: String },
    SummaryOnly { feature: String },
}

impl fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateSymbol { section_no, symbol } => {
                write!(f, "section {section_no}: code `{symbol}` listed more than once")
            }
            Self::MissingSummary { feature } => {
                write!(f, "{feature}: no feature summary row")
            }
            Self::SummaryOnly { feature } => {
                write!(f, "{feature}: in the feature summary but not in the dictionary")
            }
        }
    }
}

/// Every feature record of a document, in document order. Names may repeat.
#[derive(Debug, Clone, Default)]
pub struct DataDictionary {
    records: Vec<FeatureRecord>,
    sections: usize,
    issues: Vec<QualityIssue>,
}

impl DataDictionary {
    /// Segment and parse a whole document.
    ///
    /// The first section is dropped when it is the table of contents. Any
    /// malformed section aborts the build.
    pub fn build(document: &str) -> Result<Self, CodexError> {
        let mut dictionary = DataDictionary::default();

        for (idx, section) in segment(document)?.enumerate() {
            if idx == 0 && is_table_of_contents(&section) {
                debug!("skipping table of contents");
                continue;
            }
            dictionary.sections += 1;

            let records = parse_section(&section).map_err(|source| CodexError::Structural {
                heading: section.heading_line().to_string(),
                source,
            })?;
            debug!(
                heading = section.heading_line(),
                features = records.len(),
                "parsed section"
            );

            // Records of one section share their code table.
            if let Some(first) = records.first() {
                for symbol in first.codes.iter().flat_map(CodeTable::duplicate_symbols) {
                    let issue = QualityIssue::DuplicateSymbol {
                        section_no: first.section_no.clone(),
                        symbol: symbol.clone(),
                    };
                    warn!("{issue}");
                    dictionary.issues.push(issue);
                }
            }
            dictionary.records.extend(records);
        }

        if dictionary.records.is_empty() {
            return Err(CodexError::EmptyDocument(EmptyReason::NoRecords));
        }
        info!(
            "Parsed {} features from {} sections",
            dictionary.records.len(),
            dictionary.sections
        );
        Ok(dictionary)
    }

    pub fn records(&self) -> &[FeatureRecord] {
        &self.records
    }

    pub fn section_count(&self) -> usize {
        self.sections
    }

    pub fn issues(&self) -> &[QualityIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Vec<FeatureRecord>, Vec<QualityIssue>) {
        (self.records, self.issues)
    }
}

#[cfg(test)]
impl DataDictionary {
    pub(crate) fn from_records(records: Vec<FeatureRecord>) -> Self {
        DataDictionary {
            records,
            sections: 0,
            issues: Vec::new(),
        }
    }
}
