use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FilingStatus {
    #[serde(rename = "single")]
    Single,
    #[serde(rename = "married_joint")]
    MarriedFilingJointly,
    #[serde(rename = "married_separate")]
    MarriedFilingSeparately,
    #[serde(rename = "head_of_household")]
    HeadOfHousehold,
    #[serde(rename = "surviving_spouse")]
    QualifyingSurvivingSpouse,
}

impl FilingStatus {
    pub fn all() -> &'static [FilingStatus] {
        &[
            Self::Single,
            Self::MarriedFilingJointly,
            Self::MarriedFilingSeparately,
            Self::HeadOfHousehold,
            Self::QualifyingSurvivingSpouse,
        ]
    }

    /// Canonical token used by the profile input contract.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::MarriedFilingJointly => "married_joint",
            Self::MarriedFilingSeparately => "married_separate",
            Self::HeadOfHousehold => "head_of_household",
            Self::QualifyingSurvivingSpouse => "surviving_spouse",
        }
    }

    /// IRS short code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Single => "S",
            Self::MarriedFilingJointly => "MFJ",
            Self::MarriedFilingSeparately => "MFS",
            Self::HeadOfHousehold => "HOH",
            Self::QualifyingSurvivingSpouse => "QSS",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::MarriedFilingJointly => "Married Filing Jointly",
            Self::MarriedFilingSeparately => "Married Filing Separately",
            Self::HeadOfHousehold => "Head of Household",
            Self::QualifyingSurvivingSpouse => "Qualifying Surviving Spouse",
        }
    }

    /// Parses a filing status token.
    ///
    /// Accepts the canonical tokens (`head_of_household`), the IRS short codes
    /// (`HOH`, any case) and display labels (`Head of Household`). Returns
    /// `None` for anything else; callers must not substitute a default.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s
            .trim()
            .to_ascii_lowercase()
            .replace([' ', '-'], "_");

        match normalized.as_str() {
            "single" | "s" => Some(Self::Single),
            "married_joint" | "married_filing_jointly" | "mfj" => {
                Some(Self::MarriedFilingJointly)
            }
            "married_separate" | "married_filing_separately" | "mfs" => {
                Some(Self::MarriedFilingSeparately)
            }
            "head_of_household" | "hoh" => Some(Self::HeadOfHousehold),
            "surviving_spouse" | "qualifying_surviving_spouse" | "qss" => {
                Some(Self::QualifyingSurvivingSpouse)
            }
            _ => None,
        }
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
