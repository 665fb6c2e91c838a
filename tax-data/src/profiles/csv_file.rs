//! Profile documents as CSV.
//!
//! Headers are matched by name and every column is optional; an absent
//! column or empty cell takes the input-contract default. Each data row is
//! one extracted document.
//!
//! | Column | Type | Default |
//! |------------------------|---------|----------|
//! | `taxpayer_name` | string | empty |
//! | `taxpayer_ssn` | string | empty |
//! | `filing_status` | string | `single` |
//! | `dependent_count` | integer | `0` |
//! | `wages` | decimal | `0` |
//! | `federal_tax_withheld` | decimal | `0` |
//! | `interest_income` | decimal | `0` |
//! | `dividends` | decimal | `0` |
//! | `daycare_expenses` | decimal | `0` |
//!
//! Amounts may carry `$` and thousands separators (`"26,263.00"`).
//!
//! ```csv
//! taxpayer_name,filing_status,dependent_count,wages,federal_tax_withheld
//! Whitney M. Refund,head_of_household,1,"26,263.00",264.00
//! ```

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::ProfileRecord;

use super::{ExtractionAdapter, ProfileLoadError, parse_amount, read_document};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
    taxpayer_name: Option<String>,
    taxpayer_ssn: Option<String>,
    filing_status: Option<String>,
    dependent_count: Option<String>,
    wages: Option<String>,
    federal_tax_withheld: Option<String>,
    interest_income: Option<String>,
    dividends: Option<String>,
    daycare_expenses: Option<String>,
}

fn amount_cell(
    cell: Option<String>,
    column: &'static str,
    row: usize,
) -> Result<Decimal, ProfileLoadError> {
    let Some(value) = cell else {
        return Ok(Decimal::ZERO);
    };
    parse_amount(&value).map_err(|_| ProfileLoadError::InvalidCell { row, column, value })
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<ProfileRecord, ProfileLoadError> {
    let dependent_count = match row.dependent_count {
        Some(value) if !value.trim().is_empty() => {
            value
                .trim()
                .parse()
                .map_err(|_| ProfileLoadError::InvalidCell {
                    row: row_number,
                    column: "dependent_count",
                    value,
                })?
        }
        _ => 0,
    };

    Ok(ProfileRecord {
        taxpayer_name: row.taxpayer_name.unwrap_or_default(),
        taxpayer_ssn: row.taxpayer_ssn.unwrap_or_default(),
        filing_status: row.filing_status.filter(|s| !s.trim().is_empty()),
        dependent_count,
        wages: amount_cell(row.wages, "wages", row_number)?,
        federal_tax_withheld: amount_cell(
            row.federal_tax_withheld,
            "federal_tax_withheld",
            row_number,
        )?,
        interest_income: amount_cell(row.interest_income, "interest_income", row_number)?,
        dividends: amount_cell(row.dividends, "dividends", row_number)?,
        daycare_expenses: amount_cell(row.daycare_expenses, "daycare_expenses", row_number)?,
    })
}

/// Parses CSV text into one record per data row, in file order.
pub fn parse_csv_profiles(input: &str) -> Result<Vec<ProfileRecord>, ProfileLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// A CSV profile document on disk.
#[derive(Debug, Clone)]
pub struct CsvProfileFile {
    path: PathBuf,
}

impl CsvProfileFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExtractionAdapter for CsvProfileFile {
    fn source(&self) -> String {
        self.path.display().to_string()
    }

    fn extract(&self) -> Result<Vec<ProfileRecord>, ProfileLoadError> {
        parse_csv_profiles(&read_document(&self.path)?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const WHITNEY_CSV: &str = "\
taxpayer_name,taxpayer_ssn,filing_status,dependent_count,wages,federal_tax_withheld,daycare_expenses
Whitney M. Refund,400-00-4702,head_of_household,1,\"26,263.00\",264.00,\"3,100.00\"
";

    #[test]
    fn parses_full_row() {
        let records = parse_csv_profiles(WHITNEY_CSV).unwrap();

        assert_eq!(
            records,
            vec![ProfileRecord {
                taxpayer_name: "Whitney M. Refund".to_string(),
                taxpayer_ssn: "400-00-4702".to_string(),
                filing_status: Some("head_of_household".to_string()),
                dependent_count: 1,
                wages: dec!(26263.00),
                federal_tax_withheld: dec!(264.00),
                daycare_expenses: dec!(3100.00),
                ..ProfileRecord::default()
            }]
        );
    }

    #[test]
    fn missing_columns_take_defaults() {
        let records = parse_csv_profiles("wages\n50000\n").unwrap();

        assert_eq!(
            records,
            vec![ProfileRecord {
                wages: dec!(50000),
                ..ProfileRecord::default()
            }]
        );
    }

    #[test]
    fn empty_cells_take_defaults() {
        let records =
            parse_csv_profiles("filing_status,dependent_count,wages,dividends\n,,1200.50,\n").unwrap();

        assert_eq!(records[0].filing_status, None);
        assert_eq!(records[0].dependent_count, 0);
        assert_eq!(records[0].wages, dec!(1200.50));
        assert_eq!(records[0].dividends, dec!(0));
    }

    #[test]
    fn each_row_is_a_document() {
        let records = parse_csv_profiles(
            "wages,interest_income\n20000,\n,45.10\n",
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].interest_income, dec!(45.10));
    }

    #[test]
    fn negative_dependent_count_is_kept_for_validation() {
        let records = parse_csv_profiles("dependent_count\n-1\n").unwrap();

        assert_eq!(records[0].dependent_count, -1);
    }

    #[test]
    fn invalid_amount_names_row_and_column() {
        let err = parse_csv_profiles("wages,dividends\n100,\n200,lots\n").unwrap_err();

        let ProfileLoadError::InvalidCell { row, column, value } = err else {
            panic!("expected InvalidCell, got {err:?}");
        };
        assert_eq!(row, 2);
        assert_eq!(column, "dividends");
        assert_eq!(value, "lots");
    }

    #[test]
    fn invalid_dependent_count_rejected() {
        let err = parse_csv_profiles("dependent_count\n1.5\n").unwrap_err();

        assert_eq!(err.to_string(), "invalid dependent_count '1.5' on row 1");
    }

    #[test]
    fn ragged_row_rejected() {
        let result = parse_csv_profiles("wages,dividends\n100\n");

        assert!(matches!(result, Err(ProfileLoadError::Csv(_))));
    }
}
