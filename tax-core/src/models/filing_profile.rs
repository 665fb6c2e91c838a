use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::FilingStatus;

/// Largest value accepted for any monetary field: one trillion dollars.
///
/// Keeps every sum and product the engine forms far inside `Decimal` range.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

/// A profile the engine refuses to compute. Raised before any arithmetic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidProfile {
    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    #[error("{field} must not exceed {max}, got {value}", max = MAX_AMOUNT)]
    AmountTooLarge { field: &'static str, value: Decimal },

    #[error("dependent_count must not be negative, got {0}")]
    NegativeDependentCount(i64),

    #[error("unrecognised filing status '{0}'")]
    UnknownFilingStatus(String),
}

/// Raw profile as supplied by document extraction or manual entry.
///
/// Absent fields take the defaults of the input contract. The filing status
/// stays `None` until conversion so that combining documents can tell a
/// missing status from an explicit `single`. Nothing is validated here;
/// convert with [`FilingProfile::try_from`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileRecord {
    pub taxpayer_name: String,
    pub taxpayer_ssn: String,
    pub filing_status: Option<String>,
    pub dependent_count: i64,
    pub wages: Decimal,
    pub federal_tax_withheld: Decimal,
    pub interest_income: Decimal,
    pub dividends: Decimal,
    pub daycare_expenses: Decimal,
}

impl Default for ProfileRecord {
    fn default() -> Self {
        Self {
            taxpayer_name: String::new(),
            taxpayer_ssn: String::new(),
            filing_status: None,
            dependent_count: 0,
            wages: Decimal::ZERO,
            federal_tax_withheld: Decimal::ZERO,
            interest_income: Decimal::ZERO,
            dividends: Decimal::ZERO,
            daycare_expenses: Decimal::ZERO,
        }
    }
}

impl ProfileRecord {
    /// Checks the fields of a single document before it is merged with others.
    ///
    /// # Errors
    ///
    /// [`InvalidProfile::NegativeDependentCount`], then the first amount
    /// outside `0..=MAX_AMOUNT` in input-contract order.
    pub fn validate(&self) -> Result<(), InvalidProfile> {
        if self.dependent_count < 0 {
            return Err(InvalidProfile::NegativeDependentCount(self.dependent_count));
        }
        check_amounts([
            ("wages", self.wages),
            ("federal_tax_withheld", self.federal_tax_withheld),
            ("interest_income", self.interest_income),
            ("dividends", self.dividends),
            ("daycare_expenses", self.daycare_expenses),
        ])
    }
}

fn check_amounts(amounts: [(&'static str, Decimal); 5]) -> Result<(), InvalidProfile> {
    for (field, value) in amounts {
        if value < Decimal::ZERO {
            return Err(InvalidProfile::NegativeAmount { field, value });
        }
        if value > MAX_AMOUNT {
            return Err(InvalidProfile::AmountTooLarge { field, value });
        }
    }
    Ok(())
}

/// Validated income and household facts for one return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingProfile {
    pub taxpayer_name: String,
    pub taxpayer_ssn: String,
    pub filing_status: FilingStatus,
    pub dependent_count: u32,

    /// Earned income. The only income the current rule set taxes.
    pub wages: Decimal,
    pub federal_tax_withheld: Decimal,

    /// Reported on line 2b; not added to taxable income.
    pub interest_income: Decimal,
    /// Reported on line 3b; not added to taxable income.
    pub dividends: Decimal,

    /// Collected for interface compatibility. No deduction or credit reads it.
    pub daycare_expenses: Decimal,
}

impl FilingProfile {
    /// Profile with the given status and wages, every other field zero.
    pub fn new(
        filing_status: FilingStatus,
        wages: Decimal,
    ) -> Self {
        Self {
            taxpayer_name: String::new(),
            taxpayer_ssn: String::new(),
            filing_status,
            dependent_count: 0,
            wages,
            federal_tax_withheld: Decimal::ZERO,
            interest_income: Decimal::ZERO,
            dividends: Decimal::ZERO,
            daycare_expenses: Decimal::ZERO,
        }
    }

    pub fn with_dependents(
        mut self,
        dependent_count: u32,
    ) -> Self {
        self.dependent_count = dependent_count;
        self
    }

    pub fn with_withholding(
        mut self,
        federal_tax_withheld: Decimal,
    ) -> Self {
        self.federal_tax_withheld = federal_tax_withheld;
        self
    }

    /// Rejects monetary amounts below zero or above [`MAX_AMOUNT`].
    ///
    /// # Errors
    ///
    /// [`InvalidProfile::NegativeAmount`] or [`InvalidProfile::AmountTooLarge`]
    /// for the first offending field, in input-contract order.
    pub fn validate(&self) -> Result<(), InvalidProfile> {
        check_amounts([
            ("wages", self.wages),
            ("federal_tax_withheld", self.federal_tax_withheld),
            ("interest_income", self.interest_income),
            ("dividends", self.dividends),
            ("daycare_expenses", self.daycare_expenses),
        ])
    }
}

impl TryFrom<ProfileRecord> for FilingProfile {
    type Error = InvalidProfile;

    fn try_from(record: ProfileRecord) -> Result<Self, Self::Error> {
        let filing_status = match record.filing_status.as_deref().map(str::trim) {
            None | Some("") => FilingStatus::Single,
            Some(token) => FilingStatus::parse(token)
                .ok_or_else(|| InvalidProfile::UnknownFilingStatus(token.to_string()))?,
        };

        let dependent_count = u32::try_from(record.dependent_count)
            .map_err(|_| InvalidProfile::NegativeDependentCount(record.dependent_count))?;

        let profile = FilingProfile {
            taxpayer_name: record.taxpayer_name,
            taxpayer_ssn: record.taxpayer_ssn,
            filing_status,
            dependent_count,
            wages: record.wages,
            federal_tax_withheld: record.federal_tax_withheld,
            interest_income: record.interest_income,
            dividends: record.dividends,
            daycare_expenses: record.daycare_expenses,
        };
        profile.validate()?;

        Ok(profile)
    }
}
