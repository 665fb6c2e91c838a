use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::{
    BracketSchedule, ChildTaxCreditRules, EitcTable, ScheduleError, ScheduleSet,
    StandardDeductionTable,
};

/// A rule table that cannot be used for computation. Always fatal at load time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("invalid bracket schedule for {context}: {source}")]
    Schedule {
        context: String,
        #[source]
        source: ScheduleError,
    },

    #[error("earned income credit table has no tiers")]
    EmptyEitcTable,

    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: String, value: Decimal },

    #[error("{field} must be a fraction between 0 and 1, got {rate}")]
    InvalidRate { field: String, rate: Decimal },

    #[error("unrecognised filing status '{0}' in rule tables")]
    UnknownFilingStatus(String),
}

impl ConfigurationError {
    pub fn schedule(
        context: impl Into<String>,
        source: ScheduleError,
    ) -> Self {
        Self::Schedule {
            context: context.into(),
            source,
        }
    }
}

/// Every table the engine reads for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxYearConfig {
    pub tax_year: i32,
    pub standard_deductions: StandardDeductionTable,
    pub child_tax_credit: ChildTaxCreditRules,
    pub earned_income_credit: EitcTable,
    pub schedules: ScheduleSet,
}

impl TaxYearConfig {
    /// Built-in 2025 rule set. One bracket schedule serves every filing status.
    pub fn tax_year_2025() -> Self {
        Self {
            tax_year: 2025,
            standard_deductions: StandardDeductionTable::tax_year_2025(),
            child_tax_credit: ChildTaxCreditRules::tax_year_2025(),
            earned_income_credit: EitcTable::tax_year_2025(),
            schedules: ScheduleSet::new(BracketSchedule::tax_year_2025_default()),
        }
    }

    /// Checks the parts of the config that are plain public data.
    ///
    /// Bracket schedules and the EITC table are validated when constructed;
    /// this covers the standard deduction and child credit amounts.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::NegativeAmount`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (status, amount) in self.standard_deductions.entries() {
            ensure_non_negative(&format!("standard_deduction.{status}"), amount)?;
        }

        ensure_non_negative(
            "child_tax_credit.credit_per_dependent",
            self.child_tax_credit.credit_per_dependent,
        )?;
        ensure_non_negative(
            "child_tax_credit.refundable_cap_per_dependent",
            self.child_tax_credit.refundable_cap_per_dependent,
        )?;

        Ok(())
    }
}

impl Default for TaxYearConfig {
    fn default() -> Self {
        Self::tax_year_2025()
    }
}

fn ensure_non_negative(
    field: &str,
    value: Decimal,
) -> Result<(), ConfigurationError> {
    if value < Decimal::ZERO {
        return Err(ConfigurationError::NegativeAmount {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}
