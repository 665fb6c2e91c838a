use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{debug, info};

use tax_cli::app::{self, ManualEntry, OutputFormat, TableSources};
use tax_cli::logging::{self, LoggingOptions};
use tax_cli::utils::parse_decimal;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Form 1040 tax calculator.
///
/// Computes taxable income, tax, child and earned income credits, and the
/// resulting refund or balance due from extracted documents or manual entry.
#[derive(Debug, Parser)]
#[command(name = "form1040", version)]
struct Cli {
    /// Log level or filter directive (e.g. `debug`, `warn,tax_core=debug`).
    /// Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log records to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute a return from documents and/or command-line values.
    Compute(ComputeArgs),

    /// Compute the built-in reference return (head of household, one child).
    Example(OutputArgs),

    /// Print the effective rule tables after loading any table files.
    Tables(TableArgs),
}

#[derive(Debug, Args)]
struct TableArgs {
    /// TOML file with tax-year tables layered over the built-in 2025 set.
    #[arg(long)]
    config: Option<PathBuf>,

    /// CSV bracket schedules (tax_year,schedule,min_income,max_income,rate).
    #[arg(long)]
    brackets: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct OutputArgs {
    #[command(flatten)]
    tables: TableArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write the report here instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ComputeArgs {
    /// Extracted profile documents (.csv or .json). Several are combined.
    #[arg(long = "input", short, num_args = 1..)]
    inputs: Vec<PathBuf>,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    ssn: Option<String>,

    /// `single`, `married_joint`, `married_separate`, `head_of_household`,
    /// `surviving_spouse`, an IRS code or a label such as "Head of Household".
    #[arg(long)]
    filing_status: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    dependents: Option<i64>,

    #[arg(long, value_parser = parse_decimal, allow_negative_numbers = true)]
    wages: Option<Decimal>,

    #[arg(long, value_parser = parse_decimal, allow_negative_numbers = true)]
    withheld: Option<Decimal>,

    #[arg(long, value_parser = parse_decimal, allow_negative_numbers = true)]
    interest: Option<Decimal>,

    #[arg(long, value_parser = parse_decimal, allow_negative_numbers = true)]
    dividends: Option<Decimal>,

    #[arg(long, value_parser = parse_decimal, allow_negative_numbers = true)]
    daycare: Option<Decimal>,

    #[command(flatten)]
    output: OutputArgs,
}

impl ComputeArgs {
    fn manual_entry(&self) -> ManualEntry {
        ManualEntry {
            name: self.name.clone(),
            ssn: self.ssn.clone(),
            filing_status: self.filing_status.clone(),
            dependents: self.dependents,
            wages: self.wages,
            withheld: self.withheld,
            interest: self.interest,
            dividends: self.dividends,
            daycare: self.daycare,
        }
    }
}

impl TableArgs {
    fn sources(&self) -> TableSources {
        TableSources {
            config: self.config.clone(),
            brackets: self.brackets.clone(),
        }
    }
}

// ─── commands ────────────────────────────────────────────────────────────────

fn emit(
    report: &str,
    output: Option<&PathBuf>,
) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, report)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => print!("{report}"),
    }
    Ok(())
}

fn run_compute(
    profile: tax_core::FilingProfile,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    let config = app::load_config(&output.tables.sources())?;
    let result = app::compute(&config, &profile)?;
    debug!(refund = %result.refund, amount_owed = %result.amount_owed, "return computed");

    let report = app::render(output.format, &profile, &result)?;
    emit(&report, output.output.as_ref())
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging(&LoggingOptions {
        level: cli.log_level.clone(),
        file: cli.log_file.clone(),
    })?;

    match cli.command {
        Command::Compute(args) => {
            let profile = app::collect_profile(&args.inputs, args.manual_entry())?;
            run_compute(profile, &args.output)
        }
        Command::Example(output) => run_compute(app::example_profile(), &output),
        Command::Tables(tables) => {
            let config = app::load_config(&tables.sources())?;
            print!("{}", app::describe_tables(&config)?);
            Ok(())
        }
    }
}
