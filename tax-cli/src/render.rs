//! Output formats for a computed return.

use std::fmt::Write as _;

use anyhow::Result;
use chrono::{DateTime, FixedOffset, Local};
use rust_decimal::Decimal;
use serde::Serialize;
use tax_core::{FilingProfile, FilingStatus, FormLine, TaxComputationResult};

use crate::utils::{format_currency, mask_ssn};

/// Turns a profile and its computed result into a document.
pub trait FormRenderer {
    fn render(
        &self,
        profile: &FilingProfile,
        result: &TaxComputationResult,
    ) -> Result<String>;
}

const RULE_WIDTH: usize = 56;

const SECTIONS: &[(&str, &[FormLine])] = &[
    (
        "INCOME",
        &[
            FormLine::Wages,
            FormLine::TaxableInterest,
            FormLine::OrdinaryDividends,
            FormLine::TotalIncome,
            FormLine::AdjustedGrossIncome,
        ],
    ),
    (
        "DEDUCTIONS & TAX",
        &[FormLine::StandardDeduction, FormLine::TaxableIncome, FormLine::Tax],
    ),
    (
        "CREDITS",
        &[
            FormLine::ChildTaxCredit,
            FormLine::EarnedIncomeCredit,
            FormLine::AdditionalChildTaxCredit,
            FormLine::TotalTax,
        ],
    ),
    (
        "PAYMENTS",
        &[FormLine::FederalTaxWithheld, FormLine::TotalPayments],
    ),
];

/// Plain-text summary for the terminal.
#[derive(Debug, Clone, Default)]
pub struct TextSummary {
    generated_at: Option<DateTime<FixedOffset>>,
}

impl TextSummary {
    /// Stamps each summary with the time it is rendered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamps every summary with `generated_at`.
    pub fn with_timestamp(generated_at: DateTime<FixedOffset>) -> Self {
        Self {
            generated_at: Some(generated_at),
        }
    }

    fn timestamp(&self) -> DateTime<FixedOffset> {
        self.generated_at
            .unwrap_or_else(|| Local::now().fixed_offset())
    }
}

fn write_line(
    out: &mut String,
    result: &TaxComputationResult,
    line: FormLine,
) -> std::fmt::Result {
    let amount = result.form_lines.get(line).unwrap_or(Decimal::ZERO);
    writeln!(
        out,
        "  Line {:<4} {:<30} {:>14}",
        line.key(),
        line.description(),
        format_currency(amount)
    )
}

impl FormRenderer for TextSummary {
    fn render(
        &self,
        profile: &FilingProfile,
        result: &TaxComputationResult,
    ) -> Result<String> {
        let rule = "-".repeat(RULE_WIDTH);
        let mut out = String::new();

        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(out, "FORM 1040 TAX CALCULATION SUMMARY")?;
        writeln!(out, "Generated: {}", self.timestamp().format("%Y-%m-%d %H:%M:%S %:z"))?;
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;

        let name = if profile.taxpayer_name.is_empty() {
            "N/A"
        } else {
            profile.taxpayer_name.as_str()
        };
        let ssn = if profile.taxpayer_ssn.is_empty() {
            "N/A".to_string()
        } else {
            mask_ssn(&profile.taxpayer_ssn)
        };

        writeln!(out, "TAXPAYER")?;
        writeln!(out, "  Name:           {name}")?;
        writeln!(out, "  SSN:            {ssn}")?;
        writeln!(out, "  Filing status:  {}", result.filing_status.label())?;
        writeln!(out, "  Dependents:     {}", profile.dependent_count)?;

        for (title, lines) in SECTIONS {
            writeln!(out, "{rule}")?;
            writeln!(out, "{title}")?;
            for line in *lines {
                write_line(&mut out, result, *line)?;
            }
        }

        writeln!(out, "{rule}")?;
        if result.is_refund() {
            writeln!(out, "RESULT: REFUND of {}", format_currency(result.refund))?;
            write_line(&mut out, result, FormLine::Refund)?;
        } else {
            writeln!(out, "RESULT: AMOUNT OWED {}", format_currency(result.amount_owed))?;
            write_line(&mut out, result, FormLine::AmountOwed)?;
        }
        writeln!(out, "{rule}")?;

        Ok(out)
    }
}

#[derive(Serialize)]
struct TaxpayerSummary<'a> {
    name: &'a str,
    ssn: String,
    filing_status: FilingStatus,
    dependent_count: u32,
    daycare_expenses: Decimal,
}

#[derive(Serialize)]
struct Report<'a> {
    taxpayer: TaxpayerSummary<'a>,
    result: &'a TaxComputationResult,
}

/// JSON document with the taxpayer block and the full result.
///
/// The SSN is masked the same way as in [`TextSummary`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReport;

impl FormRenderer for JsonReport {
    fn render(
        &self,
        profile: &FilingProfile,
        result: &TaxComputationResult,
    ) -> Result<String> {
        let report = Report {
            taxpayer: TaxpayerSummary {
                name: &profile.taxpayer_name,
                ssn: if profile.taxpayer_ssn.is_empty() {
                    String::new()
                } else {
                    mask_ssn(&profile.taxpayer_ssn)
                },
                filing_status: profile.filing_status,
                dependent_count: profile.dependent_count,
                daycare_expenses: profile.daycare_expenses,
            },
            result,
        };

        let mut json = serde_json::to_string_pretty(&report)?;
        json.push('\n');
        Ok(json)
    }
}
