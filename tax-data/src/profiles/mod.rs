//! Taxpayer profiles from extracted documents.
//!
//! Each [`ExtractionAdapter`] turns one source document into raw
//! [`ProfileRecord`]s. Several documents for the same return are merged with
//! [`combine_records`], which checks every record before it is summed.

mod combine;
mod csv_file;
mod json_file;

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use tax_core::ProfileRecord;
use thiserror::Error;
use tracing::{debug, warn};

pub use combine::combine_records;
pub use csv_file::{CsvProfileFile, parse_csv_profiles};
pub use json_file::{JsonProfileFile, parse_json_profiles};

#[derive(Debug, Error)]
pub enum ProfileLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid JSON profile: {0}")]
    Json(#[from] serde_json::Error),

    /// `row` is 1-based, header excluded.
    #[error("invalid {column} '{value}' on row {row}")]
    InvalidCell {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("unsupported profile document {0}: expected a .csv or .json file")]
    UnsupportedFormat(PathBuf),
}

/// A source of raw profile data.
///
/// Implementations only extract; validation happens when the combined record
/// is converted into a `FilingProfile`.
pub trait ExtractionAdapter {
    /// Human-readable origin, used in logs and error context.
    fn source(&self) -> String;

    fn extract(&self) -> Result<Vec<ProfileRecord>, ProfileLoadError>;
}

/// Picks an adapter from the file extension.
pub fn adapter_for_path(path: &Path) -> Result<Box<dyn ExtractionAdapter>, ProfileLoadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("csv") => Ok(Box::new(CsvProfileFile::new(path))),
        Some("json") => Ok(Box::new(JsonProfileFile::new(path))),
        _ => Err(ProfileLoadError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Runs every adapter in order and collects their records.
pub fn extract_all(
    adapters: &[Box<dyn ExtractionAdapter>]
) -> Result<Vec<ProfileRecord>, ProfileLoadError> {
    let mut records = Vec::new();

    for adapter in adapters {
        let extracted = adapter.extract()?;
        let source = adapter.source();

        if extracted.iter().all(|record| *record == ProfileRecord::default()) {
            warn!(%source, "document contributed no profile data");
        } else {
            debug!(%source, records = extracted.len(), "extracted profile data");
        }
        records.extend(extracted);
    }

    Ok(records)
}

/// Parses a monetary amount the way people type them.
///
/// Trims whitespace, strips `$` and thousands separators. Empty input is zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_data::profiles::parse_amount;
///
/// assert_eq!(parse_amount(" $26,263.00 ").unwrap(), dec!(26263.00));
/// assert_eq!(parse_amount("").unwrap(), dec!(0));
/// ```
pub fn parse_amount(s: &str) -> Result<Decimal, rust_decimal::Error> {
    let normalized = s.trim().replace([',', '$'], "");
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse()
}

fn read_document(path: &Path) -> Result<String, ProfileLoadError> {
    std::fs::read_to_string(path).map_err(|source| ProfileLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
