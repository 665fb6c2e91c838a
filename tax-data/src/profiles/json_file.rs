use std::path::{Path, PathBuf};

use serde::Deserialize;
use tax_core::ProfileRecord;

use super::{ExtractionAdapter, ProfileLoadError, read_document};

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonDocument {
    Many(Vec<ProfileRecord>),
    One(ProfileRecord),
}

/// Parses a single record object or an array of them.
///
/// Amounts may be JSON numbers or strings.
pub fn parse_json_profiles(input: &str) -> Result<Vec<ProfileRecord>, ProfileLoadError> {
    match serde_json::from_str(input)? {
        JsonDocument::Many(records) => Ok(records),
        JsonDocument::One(record) => Ok(vec![record]),
    }
}

/// A JSON profile document on disk.
#[derive(Debug, Clone)]
pub struct JsonProfileFile {
    path: PathBuf,
}

impl JsonProfileFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExtractionAdapter for JsonProfileFile {
    fn source(&self) -> String {
        self.path.display().to_string()
    }

    fn extract(&self) -> Result<Vec<ProfileRecord>, ProfileLoadError> {
        parse_json_profiles(&read_document(&self.path)?)
    }
}
