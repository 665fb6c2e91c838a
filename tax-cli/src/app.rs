//! Glue between the command line, the loaders and the engine.

use std::fmt::Write as _;
use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tax_core::{
    FilingProfile, FilingStatus, Form1040Calculator, ProfileRecord, TaxComputationResult,
    TaxYearConfig,
};
use tax_data::{
    TaxBracketLoader, TaxYearConfigLoader, adapter_for_path, combine_records, extract_all,
};
use tracing::{debug, info};

use crate::render::{FormRenderer, JsonReport, TextSummary};

/// Optional table files layered over the built-in 2025 rule set.
#[derive(Debug, Clone, Default)]
pub struct TableSources {
    pub config: Option<PathBuf>,
    pub brackets: Option<PathBuf>,
}

/// Profile fields given directly on the command line. Each one present
/// replaces the value extracted from documents.
#[derive(Debug, Clone, Default)]
pub struct ManualEntry {
    pub name: Option<String>,
    pub ssn: Option<String>,
    pub filing_status: Option<String>,
    pub dependents: Option<i64>,
    pub wages: Option<Decimal>,
    pub withheld: Option<Decimal>,
    pub interest: Option<Decimal>,
    pub dividends: Option<Decimal>,
    pub daycare: Option<Decimal>,
}

impl ManualEntry {
    fn apply(
        self,
        mut record: ProfileRecord,
    ) -> ProfileRecord {
        if let Some(name) = self.name {
            record.taxpayer_name = name;
        }
        if let Some(ssn) = self.ssn {
            record.taxpayer_ssn = ssn;
        }
        if self.filing_status.is_some() {
            record.filing_status = self.filing_status;
        }
        if let Some(dependents) = self.dependents {
            record.dependent_count = dependents;
        }

        for (slot, value) in [
            (&mut record.wages, self.wages),
            (&mut record.federal_tax_withheld, self.withheld),
            (&mut record.interest_income, self.interest),
            (&mut record.dividends, self.dividends),
            (&mut record.daycare_expenses, self.daycare),
        ] {
            if let Some(value) = value {
                *slot = value;
            }
        }

        record
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Built-in tables, then the TOML file, then the bracket CSV.
pub fn load_config(sources: &TableSources) -> Result<TaxYearConfig> {
    let mut config = match &sources.config {
        Some(path) => TaxYearConfigLoader::load_file(path)
            .with_context(|| format!("failed to load tax tables from {}", path.display()))?,
        None => TaxYearConfig::tax_year_2025(),
    };

    if let Some(path) = &sources.brackets {
        let file = File::open(path)
            .with_context(|| format!("failed to open bracket file {}", path.display()))?;
        let records = TaxBracketLoader::parse(file)
            .with_context(|| format!("failed to parse bracket file {}", path.display()))?;
        config.schedules = TaxBracketLoader::overlay(&records, config.tax_year, config.schedules)
            .with_context(|| format!("invalid brackets in {}", path.display()))?;
    }

    info!(tax_year = config.tax_year, "tax tables ready");
    Ok(config)
}

/// Extracts and combines `inputs`, applies `manual`, and validates the result.
pub fn collect_profile(
    inputs: &[PathBuf],
    manual: ManualEntry,
) -> Result<FilingProfile> {
    let adapters = inputs
        .iter()
        .map(|path| adapter_for_path(path))
        .collect::<Result<Vec<_>, _>>()?;
    let records = extract_all(&adapters).context("failed to extract profile documents")?;
    debug!(documents = adapters.len(), records = records.len(), "extracted documents");

    let combined = combine_records(&records).context("invalid taxpayer profile")?;
    let record = manual.apply(combined);
    let profile = FilingProfile::try_from(record).context("invalid taxpayer profile")?;

    info!(
        filing_status = %profile.filing_status,
        dependents = profile.dependent_count,
        documents = inputs.len(),
        "profile collected"
    );
    Ok(profile)
}

/// Reference head-of-household return with one dependent.
pub fn example_profile() -> FilingProfile {
    FilingProfile {
        taxpayer_name: "Whitney M. Refund".to_string(),
        taxpayer_ssn: "400-00-4702".to_string(),
        daycare_expenses: dec!(3100.00),
        ..FilingProfile::new(FilingStatus::HeadOfHousehold, dec!(26263.00))
            .with_dependents(1)
            .with_withholding(dec!(264.00))
    }
}

pub fn compute(
    config: &TaxYearConfig,
    profile: &FilingProfile,
) -> Result<TaxComputationResult> {
    Form1040Calculator::new(config)
        .calculate(profile)
        .context("invalid taxpayer profile")
}

pub fn render(
    format: OutputFormat,
    profile: &FilingProfile,
    result: &TaxComputationResult,
) -> Result<String> {
    match format {
        OutputFormat::Text => TextSummary::new().render(profile, result),
        OutputFormat::Json => JsonReport.render(profile, result),
    }
}

/// Human-readable dump of the effective tables.
pub fn describe_tables(config: &TaxYearConfig) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "Tax year {}", config.tax_year)?;

    writeln!(out, "\nStandard deduction")?;
    for status in FilingStatus::all() {
        writeln!(
            out,
            "  {:<28} {:>12}",
            status.label(),
            config.standard_deductions.amount(*status)
        )?;
    }

    let rules = &config.child_tax_credit;
    writeln!(out, "\nChild tax credit")?;
    writeln!(out, "  per dependent                {:>12}", rules.credit_per_dependent)?;
    writeln!(out, "  refundable cap per dependent {:>12}", rules.refundable_cap_per_dependent)?;

    let eitc = &config.earned_income_credit;
    writeln!(out, "\nEarned income credit")?;
    for (dependents, tier) in eitc.tiers().iter().enumerate() {
        writeln!(
            out,
            "  {dependents} dependents: full credit {:>10} up to {:>10}",
            tier.max_credit, tier.max_income
        )?;
    }
    writeln!(
        out,
        "  phase-out rate {} with dependents, {} without",
        eitc.phase_out_rate_with_dependents(),
        eitc.phase_out_rate_without_dependents()
    )?;

    for status in FilingStatus::all() {
        let schedule = config.schedules.schedule_for(*status);
        let source = if config.schedules.overrides.contains_key(status) {
            "override"
        } else {
            "default"
        };
        writeln!(out, "\nBrackets: {} ({source})", status.label())?;
        for bracket in schedule.brackets() {
            let upper = bracket
                .max_income
                .map(|max| max.to_string())
                .unwrap_or_else(|| "and over".to_string());
            writeln!(
                out,
                "  {:>10} - {:<10} {:>6}",
                bracket.min_income, upper, bracket.tax_rate
            )?;
        }
    }

    Ok(out)
}
