use std::collections::BTreeMap;
use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{BracketSchedule, ConfigurationError, FilingStatus, ScheduleSet, TaxBracket};
use thiserror::Error;
use tracing::info;

/// Errors that can occur when loading tax bracket data.
#[derive(Debug, Error)]
pub enum TaxBracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("no bracket rows for tax year {0}")]
    TaxYearNotFound(i32),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl From<csv::Error> for TaxBracketLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxBracketLoaderError::CsvParse(err.to_string())
    }
}

/// Where the brackets of one schedule code end up in a [`ScheduleSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScheduleTarget {
    Default,
    Statuses(&'static [FilingStatus]),
}

/// Maps IRS schedule codes to filing statuses.
///
/// - Schedule X → Single
/// - Schedule Y-1 → Married Filing Jointly and Qualifying Surviving Spouse
/// - Schedule Y-2 → Married Filing Separately
/// - Schedule Z → Head of Household
/// - `DEFAULT` → the schedule used for any status without its own
fn schedule_target(schedule: &str) -> Result<ScheduleTarget, TaxBracketLoaderError> {
    match schedule.trim().to_ascii_uppercase().as_str() {
        "X" => Ok(ScheduleTarget::Statuses(&[FilingStatus::Single])),
        "Y-1" => Ok(ScheduleTarget::Statuses(&[
            FilingStatus::MarriedFilingJointly,
            FilingStatus::QualifyingSurvivingSpouse,
        ])),
        "Y-2" => Ok(ScheduleTarget::Statuses(&[FilingStatus::MarriedFilingSeparately])),
        "Z" => Ok(ScheduleTarget::Statuses(&[FilingStatus::HeadOfHousehold])),
        "DEFAULT" => Ok(ScheduleTarget::Default),
        _ => Err(TaxBracketLoaderError::InvalidSchedule(schedule.to_string())),
    }
}

/// A single record from the tax brackets CSV file.
///
/// - `tax_year`: The tax year (e.g., 2025)
/// - `schedule`: The IRS schedule code (X, Y-1, Y-2, Z) or `DEFAULT`
/// - `min_income`: The minimum income for this bracket
/// - `max_income`: The maximum income for this bracket (empty for unlimited)
/// - `rate`: The marginal tax rate as a decimal (e.g., 0.10 for 10%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBracketRecord {
    pub tax_year: i32,
    pub schedule: String,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for bracket schedules from CSV files.
///
/// Rows are grouped by schedule code, sorted by `min_income` and validated
/// into [`BracketSchedule`]s before they replace anything in a
/// [`ScheduleSet`].
pub struct TaxBracketLoader;

impl TaxBracketLoader {
    /// Parse tax bracket records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or a
    /// byte slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxBracketRecord>, TaxBracketLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxBracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Builds one validated schedule per schedule code from the rows for
    /// `tax_year`. Rows for other years are ignored.
    ///
    /// # Errors
    ///
    /// [`TaxBracketLoaderError::TaxYearNotFound`] when no row matches,
    /// [`TaxBracketLoaderError::InvalidSchedule`] for an unknown code and
    /// [`TaxBracketLoaderError::Configuration`] when a schedule's brackets
    /// are not a valid progression.
    pub fn schedules(
        records: &[TaxBracketRecord],
        tax_year: i32,
    ) -> Result<BTreeMap<String, BracketSchedule>, TaxBracketLoaderError> {
        let mut groups: BTreeMap<String, Vec<TaxBracket>> = BTreeMap::new();

        for record in records.iter().filter(|r| r.tax_year == tax_year) {
            schedule_target(&record.schedule)?;
            groups
                .entry(record.schedule.trim().to_ascii_uppercase())
                .or_default()
                .push(TaxBracket::new(record.min_income, record.max_income, record.rate));
        }

        if groups.is_empty() {
            return Err(TaxBracketLoaderError::TaxYearNotFound(tax_year));
        }

        let mut schedules = BTreeMap::new();
        for (code, mut brackets) in groups {
            brackets.sort_by(|a, b| a.min_income.cmp(&b.min_income));
            let schedule = BracketSchedule::new(brackets).map_err(|source| {
                ConfigurationError::schedule(format!("schedule {code} ({tax_year})"), source)
            })?;
            schedules.insert(code, schedule);
        }

        Ok(schedules)
    }

    /// Replaces the schedules in `set` with those found in `records`.
    ///
    /// `DEFAULT` replaces the fallback schedule; IRS codes install overrides
    /// for their filing statuses. Statuses not named keep what `set` had.
    pub fn overlay(
        records: &[TaxBracketRecord],
        tax_year: i32,
        mut set: ScheduleSet,
    ) -> Result<ScheduleSet, TaxBracketLoaderError> {
        for (code, schedule) in Self::schedules(records, tax_year)? {
            info!(schedule = %code, tax_year, brackets = schedule.len(), "loaded bracket schedule");

            match schedule_target(&code)? {
                ScheduleTarget::Default => set.default = schedule,
                ScheduleTarget::Statuses(statuses) => {
                    for status in statuses {
                        set.overrides.insert(*status, schedule.clone());
                    }
                }
            }
        }

        Ok(set)
    }
}
