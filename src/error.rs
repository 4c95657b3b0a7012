use std::fmt;

use thiserror::Error;

/// A zone was present but did not follow its grammar. Carries the raw zone text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("code table is not empty but no entry could be parsed:\n{raw}")]
    UnparseableCodeTable { raw: String },

    #[error("code table mixes `SYMBOL: text` entries with prose bullets:\n{raw}")]
    MixedCodeTable { raw: String },

    #[error("continuation line has no preceding bullet:\n{raw}")]
    OrphanContinuation { raw: String },

    #[error("section has content but its heading names no feature:\n{raw}")]
    UnnamedSection { raw: String },

    #[error("dimension translations contain a line that is not a bullet:\n{raw}")]
    UnparseableDimensions { raw: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// No `###` heading anywhere in the document.
    NoSections,
    /// Sections were found but none of them named a feature.
    NoRecords,
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSections => write!(f, "no sections found"),
            Self::NoRecords => write!(f, "no parseable entries"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("failed to read feature summary: {0}")]
    Csv(#[from] csv::Error),

    #[error("feature summary has no `{0}` column")]
    MissingColumn(String),

    #[error("feature summary line {line}: empty feature name")]
    EmptyFeatureName { line: u64 },

    #[error("feature `{feature}`: malformed missing_or_unknown list `{raw}`")]
    MalformedMissingList { feature: String, raw: String },
}

/// Anything that stops a codex from being built. There is no partial codex.
#[derive(Debug, Error)]
pub enum CodexError {
    #[error("malformed section `{heading}`: {source}")]
    Structural {
        heading: String,
        #[source]
        source: StructuralError,
    },

    #[error("empty document: {0}")]
    EmptyDocument(EmptyReason),

    #[error("feature `{feature}` is defined twice (sections {first_section} and {second_section})")]
    DuplicateFeature {
        feature: String,
        first_section: String,
        second_section: String,
    },

    #[error("feature `{feature}` has more than one feature summary row")]
    DuplicateSummaryRow { feature: String },

    #[error(transparent)]
    Summary(#[from] SummaryError),
}

/// The part of a record a query asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Facet {
    Codes,
    Definition,
    Summary,
    Value(String),
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codes => write!(f, "code table"),
            Self::Definition => write!(f, "definition"),
            Self::Summary => write!(f, "feature summary row"),
            Self::Value(symbol) => write!(f, "code `{symbol}`"),
        }
    }
}

/// Query-time outcomes. Never fatal to the codex.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("feature `{feature}` is not in the codex")]
    NotFound { feature: String },

    #[error("feature `{feature}` has no {facet}")]
    Absent { feature: String, facet: Facet },
}

impl QueryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_display() {
        let err = CodexError::EmptyDocument(EmptyReason::NoRecords);
        assert_eq!(err.to_string(), "empty document: no parseable entries");
    }

    #[test]
    fn structural_error_keeps_raw_text() {
        let err = CodexError::Structural {
            heading: "### 1.1. AGER_TYP".to_string(),
            source: StructuralError::UnparseableCodeTable {
                raw: "- ???".to_string(),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("AGER_TYP"));
        assert!(msg.contains("- ???"));
    }

    #[test]
    fn query_error_kinds() {
        let missing = QueryError::NotFound {
            feature: "UNKNOWN".into(),
        };
        let absent = QueryError::Absent {
            feature: "AGER_TYP".into(),
            facet: Facet::Value("9".into()),
        };
        assert!(missing.is_not_found() && !missing.is_absent());
        assert!(absent.is_absent() && !absent.is_not_found());
        assert_eq!(absent.to_string(), "feature `AGER_TYP` has no code `9`");
    }
}
