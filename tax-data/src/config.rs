//! Tax-year rule tables from TOML.
//!
//! Every section is optional. A present section replaces the matching
//! built-in values, an absent one keeps them:
//!
//! ```toml
//! tax_year = 2025
//!
//! [standard_deduction]
//! head_of_household = "21900"
//!
//! [child_tax_credit]
//! credit_per_dependent = "2000"
//! refundable_cap_per_dependent = "1600"
//!
//! [earned_income_credit]
//! phase_out_rate_with_dependents = "0.1598"
//! phase_out_rate_without_dependents = "0.0765"
//!
//! [[earned_income_credit.tiers]]
//! max_income = "17900"
//! max_credit = "632"
//!
//! [[brackets.default]]
//! min_income = "0"
//! tax_rate = "0.10"
//!
//! [[brackets.single]]
//! min_income = "0"
//! max_income = "11925"
//! tax_rate = "0.10"
//! ```
//!
//! Bracket tables are keyed by `default` or a filing status token.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{
    BracketSchedule, ConfigurationError, EitcTable, EitcTier, FilingStatus, TaxBracket,
    TaxYearConfig,
};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StandardDeductionSection {
    pub single: Option<Decimal>,
    pub married_joint: Option<Decimal>,
    pub married_separate: Option<Decimal>,
    pub head_of_household: Option<Decimal>,
    pub surviving_spouse: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ChildTaxCreditSection {
    pub credit_per_dependent: Option<Decimal>,
    pub refundable_cap_per_dependent: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EarnedIncomeCreditSection {
    pub tiers: Option<Vec<EitcTier>>,
    pub phase_out_rate_with_dependents: Option<Decimal>,
    pub phase_out_rate_without_dependents: Option<Decimal>,
}

/// Parsed, not yet validated, contents of a tax-year TOML file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TaxYearFile {
    pub tax_year: Option<i32>,
    pub standard_deduction: Option<StandardDeductionSection>,
    pub child_tax_credit: Option<ChildTaxCreditSection>,
    pub earned_income_credit: Option<EarnedIncomeCreditSection>,
    #[serde(default)]
    pub brackets: BTreeMap<String, Vec<TaxBracket>>,
}

pub struct TaxYearConfigLoader;

impl TaxYearConfigLoader {
    pub fn parse(input: &str) -> Result<TaxYearFile, ConfigLoadError> {
        Ok(toml::from_str(input)?)
    }

    /// Merges `file` onto `base` and validates the result.
    pub fn apply(
        file: TaxYearFile,
        mut base: TaxYearConfig,
    ) -> Result<TaxYearConfig, ConfigLoadError> {
        if let Some(tax_year) = file.tax_year {
            base.tax_year = tax_year;
        }

        if let Some(section) = file.standard_deduction {
            let table = &mut base.standard_deductions;
            for (slot, value) in [
                (&mut table.single, section.single),
                (&mut table.married_filing_jointly, section.married_joint),
                (&mut table.married_filing_separately, section.married_separate),
                (&mut table.head_of_household, section.head_of_household),
                (&mut table.qualifying_surviving_spouse, section.surviving_spouse),
            ] {
                if let Some(value) = value {
                    *slot = value;
                }
            }
        }

        if let Some(section) = file.child_tax_credit {
            let rules = &mut base.child_tax_credit;
            if let Some(value) = section.credit_per_dependent {
                rules.credit_per_dependent = value;
            }
            if let Some(value) = section.refundable_cap_per_dependent {
                rules.refundable_cap_per_dependent = value;
            }
        }

        if let Some(section) = file.earned_income_credit {
            let current = &base.earned_income_credit;
            base.earned_income_credit = EitcTable::new(
                section.tiers.unwrap_or_else(|| current.tiers().to_vec()),
                section
                    .phase_out_rate_with_dependents
                    .unwrap_or(current.phase_out_rate_with_dependents()),
                section
                    .phase_out_rate_without_dependents
                    .unwrap_or(current.phase_out_rate_without_dependents()),
            )?;
        }

        for (key, brackets) in file.brackets {
            let schedule = BracketSchedule::new(brackets)
                .map_err(|source| ConfigurationError::schedule(format!("brackets.{key}"), source))?;

            if key == "default" {
                base.schedules.default = schedule;
                continue;
            }

            let status = FilingStatus::parse(&key)
                .ok_or_else(|| ConfigurationError::UnknownFilingStatus(key.clone()))?;
            base.schedules.overrides.insert(status, schedule);
        }

        base.validate()?;

        info!(
            tax_year = base.tax_year,
            overrides = base.schedules.overrides.len(),
            "loaded tax year configuration"
        );

        Ok(base)
    }

    /// Parses `input` and merges it onto the built-in 2025 tables.
    pub fn load_str(input: &str) -> Result<TaxYearConfig, ConfigLoadError> {
        Self::apply(Self::parse(input)?, TaxYearConfig::tax_year_2025())
    }

    pub fn load_file(path: &Path) -> Result<TaxYearConfig, ConfigLoadError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_str(&contents)
    }
}
