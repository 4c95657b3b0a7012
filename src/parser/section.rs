use std::sync::LazyLock;

use regex::Regex;

use super::codes::{parse_code_table, CodeTable};
use super::segment::{Section, Zone};
use crate::dictionary::FeatureRecord;
use crate::error::StructuralError;

static SECTION_NO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)*\.?)(?:\s+|$)").unwrap());
static FEATURE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z][A-Za-z0-9_]*\b").unwrap());

pub const TABLE_OF_CONTENTS: &str = "### Table of Contents";

pub fn is_table_of_contents(section: &Section<'_>) -> bool {
    section
        .heading
        .as_str()
        .is_some_and(|h| h.starts_with(TABLE_OF_CONTENTS))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub section_no: String,
    pub names: Vec<String>,
}

/// Everything a section says once, before it is copied to each of its features.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionContent {
    pub section_no: String,
    pub definition: Option<String>,
    pub codes: Option<CodeTable>,
    pub dim_translation: Option<Vec<String>>,
}

/// `### 1.8. FINANZ_MINIMALIST, FINANZ_SPARER,` / `### FINANZ_ANLEGER`
pub fn parse_heading(zone: &str) -> Heading {
    let mut section_no = String::new();
    let mut names = Vec::new();

    for line in zone.lines() {
        let mut rest = line.trim_start_matches('#').trim();
        if let Some(caps) = SECTION_NO_RE.captures(rest) {
            if section_no.is_empty() {
                section_no = caps[1].to_string();
            }
            rest = &rest[caps[0].len()..];
        }
        names.extend(FEATURE_NAME_RE.find_iter(rest).map(|m| m.as_str().to_string()));
    }

    Heading { section_no, names }
}

pub fn parse_definition(zone: Zone<'_>) -> Option<String> {
    let text = zone.as_str()?;
    let definition = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    Some(definition)
}

pub fn parse_dimensions(zone: Zone<'_>) -> Result<Option<Vec<String>>, StructuralError> {
    let Some(text) = zone.as_str() else {
        return Ok(None);
    };
    let mut translations = Vec::new();
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        match line.strip_prefix("- ") {
            Some(entry) if !entry.trim().is_empty() => translations.push(entry.trim().to_string()),
            _ => {
                return Err(StructuralError::UnparseableDimensions {
                    raw: text.to_string(),
                })
            }
        }
    }
    Ok(Some(translations))
}

/// Parse one section into one record per feature name in its heading.
pub fn parse_section(section: &Section<'_>) -> Result<Vec<FeatureRecord>, StructuralError> {
    let Some(heading_zone) = section.heading.as_str() else {
        return Ok(Vec::new());
    };
    if is_table_of_contents(section) {
        return Ok(Vec::new());
    }

    let heading = parse_heading(heading_zone);
    if heading.names.is_empty() {
        if section.has_content() {
            return Err(StructuralError::UnnamedSection {
                raw: section.raw.to_string(),
            });
        }
        return Ok(Vec::new());
    }

    let codes = match section.codes.as_str() {
        Some(zone) => Some(parse_code_table(zone)?),
        None => None,
    };
    let content = SectionContent {
        section_no: heading.section_no,
        definition: parse_definition(section.definition),
        codes,
        dim_translation: parse_dimensions(section.dimensions)?,
    };

    Ok(fan_out(heading.names, &content))
}

/// Copy shared section content onto every feature name.
pub fn fan_out(names: Vec<String>, content: &SectionContent) -> Vec<FeatureRecord> {
    names
        .into_iter()
        .map(|feature_name| FeatureRecord {
            feature_name,
            section_no: content.section_no.clone(),
            definition: content.definition.clone(),
            codes: content.codes.clone(),
            dim_translation: content.dim_translation.clone(),
        })
        .collect()
}
