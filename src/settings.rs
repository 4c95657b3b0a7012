use std::path::PathBuf;

use ::config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_DICTIONARY_PATH: &str = "data/Data_Dictionary.md";
pub const DEFAULT_SUMMARY_PATH: &str = "data/AZDIAS_Feature_Summary.csv";

/// Where the codex sources live. Read from defaults, an optional `codex.toml`,
/// then `CODEX_*` environment variables, later sources winning.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub dictionary_path: PathBuf,
    pub summary_path: PathBuf,
    pub summary_delimiter: String,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("dictionary_path", DEFAULT_DICTIONARY_PATH)?
            .set_default("summary_path", DEFAULT_SUMMARY_PATH)?
            .set_default("summary_delimiter", ";")?
            .add_source(File::with_name("codex").required(false))
            .add_source(Environment::with_prefix("CODEX"))
            .build()?
            .try_deserialize()
    }

    /// The summary delimiter as a single byte, the only form `csv` accepts.
    pub fn delimiter(&self) -> Result<u8, ConfigError> {
        match self.summary_delimiter.as_bytes() {
            [byte] => Ok(*byte),
            _ => Err(ConfigError::Message(format!(
                "summary_delimiter must be a single ASCII character, got `{}`",
                self.summary_delimiter
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(delimiter: &str) -> Settings {
        Settings {
            dictionary_path: DEFAULT_DICTIONARY_PATH.into(),
            summary_path: DEFAULT_SUMMARY_PATH.into(),
            summary_delimiter: delimiter.to_string(),
        }
    }

    #[test]
    fn defaults_load() {
        let s = Settings::load().unwrap();
        assert!(!s.summary_delimiter.is_empty());
        assert!(!s.dictionary_path.as_os_str().is_empty());
    }

    #[test]
    fn delimiter_must_be_one_byte() {
        assert_eq!(settings(";").delimiter().unwrap(), b';');
        assert_eq!(settings(",").delimiter().unwrap(), b',');
        assert!(settings("").delimiter().is_err());
        assert!(settings(";;").delimiter().is_err());
        assert!(settings("§").delimiter().is_err());
    }
}
