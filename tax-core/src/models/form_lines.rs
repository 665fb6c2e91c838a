use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Form 1040 lines the engine populates, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FormLine {
    #[serde(rename = "1")]
    Wages,
    #[serde(rename = "2b")]
    TaxableInterest,
    #[serde(rename = "3b")]
    OrdinaryDividends,
    #[serde(rename = "7")]
    TotalIncome,
    #[serde(rename = "11")]
    AdjustedGrossIncome,
    #[serde(rename = "12")]
    StandardDeduction,
    #[serde(rename = "15")]
    TaxableIncome,
    #[serde(rename = "16")]
    Tax,
    #[serde(rename = "19")]
    ChildTaxCredit,
    #[serde(rename = "24")]
    TotalTax,
    #[serde(rename = "25a")]
    FederalTaxWithheld,
    #[serde(rename = "27")]
    EarnedIncomeCredit,
    #[serde(rename = "28")]
    AdditionalChildTaxCredit,
    #[serde(rename = "31")]
    TotalPayments,
    #[serde(rename = "34")]
    Refund,
    #[serde(rename = "37")]
    AmountOwed,
}

impl FormLine {
    pub fn all() -> &'static [FormLine] {
        &[
            Self::Wages,
            Self::TaxableInterest,
            Self::OrdinaryDividends,
            Self::TotalIncome,
            Self::AdjustedGrossIncome,
            Self::StandardDeduction,
            Self::TaxableIncome,
            Self::Tax,
            Self::ChildTaxCredit,
            Self::TotalTax,
            Self::FederalTaxWithheld,
            Self::EarnedIncomeCredit,
            Self::AdditionalChildTaxCredit,
            Self::TotalPayments,
            Self::Refund,
            Self::AmountOwed,
        ]
    }

    /// Line identifier as printed on the form.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Wages => "1",
            Self::TaxableInterest => "2b",
            Self::OrdinaryDividends => "3b",
            Self::TotalIncome => "7",
            Self::AdjustedGrossIncome => "11",
            Self::StandardDeduction => "12",
            Self::TaxableIncome => "15",
            Self::Tax => "16",
            Self::ChildTaxCredit => "19",
            Self::TotalTax => "24",
            Self::FederalTaxWithheld => "25a",
            Self::EarnedIncomeCredit => "27",
            Self::AdditionalChildTaxCredit => "28",
            Self::TotalPayments => "31",
            Self::Refund => "34",
            Self::AmountOwed => "37",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Wages => "Wages, salaries, tips",
            Self::TaxableInterest => "Taxable interest",
            Self::OrdinaryDividends => "Ordinary dividends",
            Self::TotalIncome => "Total income",
            Self::AdjustedGrossIncome => "Adjusted gross income",
            Self::StandardDeduction => "Standard deduction",
            Self::TaxableIncome => "Taxable income",
            Self::Tax => "Tax",
            Self::ChildTaxCredit => "Child tax credit",
            Self::TotalTax => "Total tax",
            Self::FederalTaxWithheld => "Federal income tax withheld",
            Self::EarnedIncomeCredit => "Earned income credit",
            Self::AdditionalChildTaxCredit => "Additional child tax credit",
            Self::TotalPayments => "Total payments",
            Self::Refund => "Refund",
            Self::AmountOwed => "Amount you owe",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|line| line.key() == key)
    }
}

impl fmt::Display for FormLine {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Sparse map of form line to amount. Serialises with the line keys
/// (`"1"`, `"25a"`, ...) in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormLines(BTreeMap<FormLine, Decimal>);

impl FormLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(
        &mut self,
        line: FormLine,
        amount: Decimal,
    ) {
        self.0.insert(line, amount);
    }

    pub fn get(
        &self,
        line: FormLine,
    ) -> Option<Decimal> {
        self.0.get(&line).copied()
    }

    /// Looks a line up by its printed identifier.
    pub fn get_key(
        &self,
        key: &str,
    ) -> Option<Decimal> {
        FormLine::from_key(key).and_then(|line| self.get(line))
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormLine, Decimal)> + '_ {
        self.0.iter().map(|(line, amount)| (*line, *amount))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
