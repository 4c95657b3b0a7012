use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{info, warn};

use crate::dictionary::{DataDictionary, FeatureRecord, QualityIssue};
use crate::error::{CodexError, Facet, QueryError};
use crate::parser::codes::CodeTable;
use crate::summary::{FeatureSummary, FeatureType, SummaryRow};

/// Converts an observed value into the string form used as a code-table key.
pub trait ToSymbol {
    fn to_symbol(&self) -> String;
}

macro_rules! integer_symbol {
    ($($t:ty),*) => {
        $(impl ToSymbol for $t {
            fn to_symbol(&self) -> String {
                self.to_string()
            }
        })*
    };
}

integer_symbol!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl ToSymbol for f64 {
    /// Whole floats drop their fraction: `2.0` → `"2"`.
    fn to_symbol(&self) -> String {
        if self.is_finite() && self.fract() == 0.0 {
            format!("{self:.0}")
        } else {
            self.to_string()
        }
    }
}

impl ToSymbol for f32 {
    fn to_symbol(&self) -> String {
        f64::from(*self).to_symbol()
    }
}

impl ToSymbol for str {
    fn to_symbol(&self) -> String {
        self.trim().to_string()
    }
}

impl ToSymbol for String {
    fn to_symbol(&self) -> String {
        self.as_str().to_symbol()
    }
}

impl<T: ToSymbol + ?Sized> ToSymbol for &T {
    fn to_symbol(&self) -> String {
        (**self).to_symbol()
    }
}

/// A dictionary record joined with its feature summary row, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodexRecord {
    #[serde(flatten)]
    pub feature: FeatureRecord,
    pub summary: Option<SummaryRow>,
}

impl CodexRecord {
    pub fn feature_name(&self) -> &str {
        &self.feature.feature_name
    }

    pub fn feature_type(&self) -> Option<&FeatureType> {
        self.summary.as_ref().map(|s| &s.feature_type)
    }
}

/// Feature-name index over the joined dictionary and feature summary.
///
/// Built once and never mutated; share it freely between readers.
#[derive(Debug, Clone)]
pub struct Codex {
    records: Vec<CodexRecord>,
    index: HashMap<String, usize>,
    issues: Vec<QualityIssue>,
}

impl Codex {
    /// Left-join `dictionary` with `summary` on feature name.
    ///
    /// Fails on a feature defined in two dictionary sections or a feature
    /// with two summary rows. Summary rows without a dictionary entry are
    /// dropped and reported as issues.
    pub fn construct(dictionary: DataDictionary, summary: FeatureSummary) -> Result<Self, CodexError> {
        let (features, mut issues) = dictionary.into_parts();

        let mut first_seen: HashMap<&str, &str> = HashMap::with_capacity(features.len());
        for record in &features {
            if let Some(first_section) =
                first_seen.insert(&record.feature_name, &record.section_no)
            {
                return Err(CodexError::DuplicateFeature {
                    feature: record.feature_name.clone(),
                    first_section: first_section.to_string(),
                    second_section: record.section_no.clone(),
                });
            }
        }
        let known: HashSet<&str> = first_seen.into_keys().collect();

        let mut right: HashMap<String, SummaryRow> = HashMap::new();
        let mut join_issues = Vec::new();
        for row in summary.into_rows() {
            if !known.contains(row.feature_name.as_str()) {
                join_issues.push(QualityIssue::SummaryOnly {
                    feature: row.feature_name,
                });
                continue;
            }
            if right.contains_key(&row.feature_name) {
                return Err(CodexError::DuplicateSummaryRow {
                    feature: row.feature_name,
                });
            }
            right.insert(row.feature_name.clone(), row);
        }

        let mut records = Vec::with_capacity(features.len());
        let mut index = HashMap::with_capacity(features.len());
        for feature in features {
            let summary = right.remove(&feature.feature_name);
            if summary.is_none() {
                join_issues.push(QualityIssue::MissingSummary {
                    feature: feature.feature_name.clone(),
                });
            }
            index.insert(feature.feature_name.clone(), records.len());
            records.push(CodexRecord { feature, summary });
        }

        for issue in &join_issues {
            warn!("{issue}");
        }
        issues.extend(join_issues);
        info!(
            "Codex ready: {} features, {} quality issues",
            records.len(),
            issues.len()
        );

        Ok(Codex {
            records,
            index,
            issues,
        })
    }

    /// Parse `document` and join it with `summary` in one step.
    pub fn from_document(document: &str, summary: FeatureSummary) -> Result<Self, CodexError> {
        let dictionary = DataDictionary::build(document)?;
        Self::construct(dictionary, summary)
    }

    pub fn lookup(&self, feature: &str) -> Result<&CodexRecord, QueryError> {
        self.index
            .get(feature)
            .and_then(|&idx| self.records.get(idx))
            .ok_or_else(|| QueryError::NotFound {
                feature: feature.to_string(),
            })
    }

    pub fn codes_for(&self, feature: &str) -> Result<&CodeTable, QueryError> {
        let record = self.lookup(feature)?;
        record
            .feature
            .codes
            .as_ref()
            .ok_or_else(|| absent(feature, Facet::Codes))
    }

    pub fn definition_of(&self, feature: &str) -> Result<&str, QueryError> {
        let record = self.lookup(feature)?;
        record
            .feature
            .definition
            .as_deref()
            .ok_or_else(|| absent(feature, Facet::Definition))
    }

    /// Human description of an observed `value` of `feature`.
    pub fn meaning_of(&self, feature: &str, value: impl ToSymbol) -> Result<&str, QueryError> {
        let codes = self.codes_for(feature)?;
        let symbol = value.to_symbol();
        codes
            .get(&symbol)
            .ok_or_else(|| absent(feature, Facet::Value(symbol)))
    }

    pub fn summary_for(&self, feature: &str) -> Result<&SummaryRow, QueryError> {
        let record = self.lookup(feature)?;
        record
            .summary
            .as_ref()
            .ok_or_else(|| absent(feature, Facet::Summary))
    }

    /// Symbols the feature summary lists as missing or unknown for `feature`.
    pub fn missing_codes_for(&self, feature: &str) -> Result<&[String], QueryError> {
        Ok(&self.summary_for(feature)?.missing_or_unknown)
    }

    pub fn is_missing(&self, feature: &str, value: impl ToSymbol) -> Result<bool, QueryError> {
        let symbol = value.to_symbol();
        Ok(self
            .missing_codes_for(feature)?
            .iter()
            .any(|code| *code == symbol))
    }

    /// All joined records, in document order.
    pub fn records(&self) -> &[CodexRecord] {
        &self.records
    }

    pub fn features_of_type<'a>(
        &'a self,
        feature_type: &'a FeatureType,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.records
            .iter()
            .filter(move |r| r.feature_type() == Some(feature_type))
            .map(CodexRecord::feature_name)
    }

    pub fn issues(&self) -> &[QualityIssue] {
        &self.issues
    }

    pub fn contains(&self, feature: &str) -> bool {
        self.index.contains_key(feature)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn absent(feature: &str, facet: Facet) -> QueryError {
    QueryError::Absent {
        feature: feature.to_string(),
        facet,
    }
}
