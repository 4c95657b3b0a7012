//! Parse a feature data dictionary and join it with a feature summary table.
//!
//! ```no_run
//! use feature_codex::{Codex, FeatureSummary};
//!
//! # fn main() -> anyhow::Result<()> {
//! let document = std::fs::read_to_string("data/Data_Dictionary.md")?;
//! let summary = FeatureSummary::from_path("data/AZDIAS_Feature_Summary.csv", b';')?;
//! let codex = Codex::from_document(&document, summary)?;
//!
//! assert_eq!(codex.meaning_of("OST_WEST_KZ", "W")?, "West (FRG)");
//! # Ok(())
//! # }
//! ```

pub mod codex;
pub mod dictionary;
pub mod error;
pub mod parser;
pub mod settings;
pub mod summary;

pub use codex::{Codex, CodexRecord, ToSymbol};
pub use dictionary::{DataDictionary, FeatureRecord, QualityIssue};
pub use error::{CodexError, EmptyReason, Facet, QueryError, StructuralError, SummaryError};
pub use parser::codes::CodeTable;
pub use summary::{FeatureSummary, FeatureType, SummaryRow};
