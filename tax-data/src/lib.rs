//! Loading for the Form 1040 engine: rule tables from TOML and CSV, and
//! taxpayer profiles from extracted documents.

pub mod brackets;
pub mod config;
pub mod profiles;

pub use brackets::{TaxBracketLoader, TaxBracketLoaderError, TaxBracketRecord};
pub use config::{ConfigLoadError, TaxYearConfigLoader, TaxYearFile};
pub use profiles::{
    CsvProfileFile, ExtractionAdapter, JsonProfileFile, ProfileLoadError, adapter_for_path,
    combine_records, extract_all, parse_amount, parse_csv_profiles, parse_json_profiles,
};
