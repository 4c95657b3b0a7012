use std::fmt;
use std::io;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::error::SummaryError;

/// Accepted names for the feature-name column, in order of preference.
const NAME_COLUMNS: &[&str] = &["attribute", "feature_name"];
const TYPE_COLUMN: &str = "type";
const LEVEL_COLUMN: &str = "information_level";
const MISSING_COLUMN: &str = "missing_or_unknown";

pub const DEFAULT_DELIMITER: u8 = b';';

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeatureType {
    Categorical,
    Ordinal,
    Numeric,
    Mixed,
    Interval,
    Other(String),
}

impl FeatureType {
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "categorical" => Self::Categorical,
            "ordinal" => Self::Ordinal,
            "numeric" => Self::Numeric,
            "mixed" => Self::Mixed,
            "interval" => Self::Interval,
            _ => Self::Other(tag.trim().to_string()),
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Categorical => write!(f, "categorical"),
            Self::Ordinal => write!(f, "ordinal"),
            Self::Numeric => write!(f, "numeric"),
            Self::Mixed => write!(f, "mixed"),
            Self::Interval => write!(f, "interval"),
            Self::Other(tag) => write!(f, "{tag}"),
        }
    }
}

impl Serialize for FeatureType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One row of the feature summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub feature_name: String,
    #[serde(rename = "type")]
    pub feature_type: FeatureType,
    pub information_level: Option<String>,
    pub missing_or_unknown: Vec<String>,
    /// Columns this crate has no special meaning for, in header order.
    pub extra: IndexMap<String, String>,
}

impl SummaryRow {
    pub fn new(feature_name: impl Into<String>, feature_type: FeatureType) -> Self {
        SummaryRow {
            feature_name: feature_name.into(),
            feature_type,
            information_level: None,
            missing_or_unknown: Vec::new(),
            extra: IndexMap::new(),
        }
    }
}

/// `[-1,0]` → `["-1", "0"]`, `[]` → `[]`. `None` when the brackets are missing.
pub fn parse_missing_list(raw: &str) -> Option<Vec<String>> {
    let inner = raw.trim().strip_prefix('[')?.strip_suffix(']')?;
    Some(
        inner
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Per-feature classification table, as loaded from the summary file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSummary {
    rows: Vec<SummaryRow>,
}

impl FeatureSummary {
    pub fn new(rows: Vec<SummaryRow>) -> Self {
        FeatureSummary { rows }
    }

    pub fn from_path(path: impl AsRef<Path>, delimiter: u8) -> Result<Self, SummaryError> {
        let reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_path(path)?;
        Self::from_csv(reader)
    }

    pub fn from_reader<R: io::Read>(reader: R, delimiter: u8) -> Result<Self, SummaryError> {
        let reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);
        Self::from_csv(reader)
    }

    fn from_csv<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Self, SummaryError> {
        let headers = reader.headers()?.clone();
        let position = |name: &str| headers.iter().position(|h| h == name);

        let name_idx = NAME_COLUMNS
            .iter()
            .find_map(|c| position(c))
            .ok_or_else(|| SummaryError::MissingColumn(NAME_COLUMNS.join("` or `")))?;
        let type_idx =
            position(TYPE_COLUMN).ok_or_else(|| SummaryError::MissingColumn(TYPE_COLUMN.into()))?;
        let level_idx = position(LEVEL_COLUMN);
        let missing_idx = position(MISSING_COLUMN);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let field = |idx: usize| record.get(idx).unwrap_or_default();

            let feature_name = field(name_idx).to_string();
            if feature_name.is_empty() {
                return Err(SummaryError::EmptyFeatureName {
                    line: record.position().map(|p| p.line()).unwrap_or_default(),
                });
            }

            let missing_or_unknown = match missing_idx {
                Some(idx) => parse_missing_list(field(idx)).ok_or_else(|| {
                    SummaryError::MalformedMissingList {
                        feature: feature_name.clone(),
                        raw: field(idx).to_string(),
                    }
                })?,
                None => Vec::new(),
            };

            let extra = headers
                .iter()
                .enumerate()
                .filter(|(idx, _)| {
                    *idx != name_idx
                        && *idx != type_idx
                        && Some(*idx) != level_idx
                        && Some(*idx) != missing_idx
                })
                .map(|(idx, header)| (header.to_string(), field(idx).to_string()))
                .collect();

            rows.push(SummaryRow {
                feature_type: FeatureType::parse(field(type_idx)),
                information_level: level_idx
                    .map(|idx| field(idx).to_string())
                    .filter(|s| !s.is_empty()),
                missing_or_unknown,
                extra,
                feature_name,
            });
        }

        Ok(FeatureSummary { rows })
    }

    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<SummaryRow> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_types() {
        assert_eq!(FeatureType::parse("ordinal"), FeatureType::Ordinal);
        assert_eq!(FeatureType::parse(" Mixed "), FeatureType::Mixed);
        assert_eq!(FeatureType::parse("interval"), FeatureType::Interval);
        assert_eq!(
            FeatureType::parse("binary"),
            FeatureType::Other("binary".to_string())
        );
        assert_eq!(FeatureType::Other("binary".into()).to_string(), "binary");
    }

    #[test]
    fn missing_lists() {
        assert_eq!(parse_missing_list("[-1,0]"), Some(vec!["-1".into(), "0".into()]));
        assert_eq!(parse_missing_list("[-1,XX]"), Some(vec!["-1".into(), "XX".into()]));
        assert_eq!(parse_missing_list("[]"), Some(vec![]));
        assert_eq!(parse_missing_list("-1,0"), None);
    }

    #[test]
    fn load_fixture() {
        let summary =
            FeatureSummary::from_path("tests/fixtures/feature_summary.csv", DEFAULT_DELIMITER)
                .unwrap();
        assert_eq!(summary.len(), 15);
        let cameo = &summary.rows()[12];
        assert_eq!(cameo.feature_name, "CAMEO_DEU_2015");
        assert_eq!(cameo.feature_type, FeatureType::Categorical);
        assert_eq!(cameo.information_level.as_deref(), Some("microcell_rr4"));
        assert_eq!(cameo.missing_or_unknown, vec!["-1", "XX"]);
        assert!(cameo.extra.is_empty());
    }

    #[test]
    fn feature_name_column_and_extras() {
        let text = "feature_name;type;notes\nEXAMPLE_FEATURE;ordinal;hand-checked\n";
        let summary = FeatureSummary::from_reader(text.as_bytes(), b';').unwrap();
        let row = &summary.rows()[0];
        assert_eq!(row.feature_name, "EXAMPLE_FEATURE");
        assert_eq!(row.information_level, None);
        assert!(row.missing_or_unknown.is_empty());
        assert_eq!(row.extra.get("notes").map(String::as_str), Some("hand-checked"));
    }

    #[test]
    fn missing_type_column() {
        let err = FeatureSummary::from_reader("attribute;level\nA;person\n".as_bytes(), b';')
            .unwrap_err();
        assert!(matches!(err, SummaryError::MissingColumn(c) if c == "type"));
    }

    #[test]
    fn malformed_missing_list() {
        let text = "attribute;type;missing_or_unknown\nA;ordinal;-1,0\n";
        let err = FeatureSummary::from_reader(text.as_bytes(), b';').unwrap_err();
        assert!(matches!(err, SummaryError::MalformedMissingList { feature, .. } if feature == "A"));
    }

    #[test]
    fn empty_feature_name() {
        let text = "attribute;type\n;ordinal\n";
        let err = FeatureSummary::from_reader(text.as_bytes(), b';').unwrap_err();
        assert!(matches!(err, SummaryError::EmptyFeatureName { line: 2 }));
    }
}
