use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::FilingStatus;

/// Standard deduction amount for every filing status.
///
/// One field per status so the lookup is a total `match`; there is no
/// fallback amount for an unrecognised status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardDeductionTable {
    pub single: Decimal,
    #[serde(rename = "married_joint")]
    pub married_filing_jointly: Decimal,
    #[serde(rename = "married_separate")]
    pub married_filing_separately: Decimal,
    pub head_of_household: Decimal,
    #[serde(rename = "surviving_spouse")]
    pub qualifying_surviving_spouse: Decimal,
}

impl StandardDeductionTable {
    pub fn tax_year_2025() -> Self {
        Self {
            single: dec!(14600.00),
            married_filing_jointly: dec!(29200.00),
            married_filing_separately: dec!(14600.00),
            head_of_household: dec!(21900.00),
            qualifying_surviving_spouse: dec!(29200.00),
        }
    }

    pub fn amount(
        &self,
        status: FilingStatus,
    ) -> Decimal {
        match status {
            FilingStatus::Single => self.single,
            FilingStatus::MarriedFilingJointly => self.married_filing_jointly,
            FilingStatus::MarriedFilingSeparately => self.married_filing_separately,
            FilingStatus::HeadOfHousehold => self.head_of_household,
            FilingStatus::QualifyingSurvivingSpouse => self.qualifying_surviving_spouse,
        }
    }

    pub(crate) fn entries(&self) -> [(FilingStatus, Decimal); 5] {
        [
            (FilingStatus::Single, self.single),
            (FilingStatus::MarriedFilingJointly, self.married_filing_jointly),
            (FilingStatus::MarriedFilingSeparately, self.married_filing_separately),
            (FilingStatus::HeadOfHousehold, self.head_of_household),
            (FilingStatus::QualifyingSurvivingSpouse, self.qualifying_surviving_spouse),
        ]
    }
}
