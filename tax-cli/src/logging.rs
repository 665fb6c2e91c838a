use std::{
    fs::File,
    io::{self, IsTerminal},
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

const DEFAULT_FILTER: &str = "info";

// --- Formatter ---

/// `<local time> <LEVEL> <target>: <fields>`, colored when the writer supports it.
struct LocalFmt;

impl<S, N> FormatEvent<S, N> for LocalFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();

        if ansi {
            write!(writer, "\x1b[2m")?
        }
        write!(
            writer,
            "{} ",
            Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )?;
        if ansi {
            write!(writer, "\x1b[0m")?
        }

        let (pre, post) = if ansi {
            match *meta.level() {
                Level::ERROR => ("\x1b[1;31m", "\x1b[0m"),
                Level::WARN => ("\x1b[1;33m", "\x1b[0m"),
                Level::INFO => ("\x1b[1;32m", "\x1b[0m"),
                Level::DEBUG => ("\x1b[1;34m", "\x1b[0m"),
                Level::TRACE => ("\x1b[1;35m", "\x1b[0m"),
            }
        } else {
            ("", "")
        };
        write!(writer, "{}{:>5}{} ", pre, meta.level(), post)?;

        if ansi {
            write!(writer, "\x1b[36m{}\x1b[0m: ", meta.target())?;
        } else {
            write!(writer, "{}: ", meta.target())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

// --- Setup ---

/// Where log records go and how much of them.
#[derive(Debug, Clone, Default)]
pub struct LoggingOptions {
    /// A bare level (`debug`) or any `EnvFilter` directive. Overrides `RUST_LOG`.
    pub level: Option<String>,
    /// Appends plain-text records to this file in addition to stderr.
    pub file: Option<PathBuf>,
}

/// Builds the global filter: explicit level first, then `RUST_LOG`, then `info`.
pub fn make_filter(level: Option<&str>) -> Result<EnvFilter> {
    match level {
        Some(level) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level '{level}'")),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))
}

/// Installs the global subscriber. Call once at startup.
///
/// Records go to stderr so report output on stdout stays machine-readable.
pub fn init_logging(options: &LoggingOptions) -> Result<()> {
    let filter = make_filter(options.level.as_deref())?;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    let file_layer = options
        .file
        .as_deref()
        .map(open_log_file)
        .transpose()?
        .map(|file| {
            tracing_subscriber::fmt::layer()
                .event_format(LocalFmt)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("logging already initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_filter_accepts_bare_level() {
        assert!(make_filter(Some("debug")).is_ok());
    }

    #[test]
    fn make_filter_accepts_directives() {
        assert!(make_filter(Some("warn,tax_core=debug")).is_ok());
    }

    #[test]
    fn make_filter_rejects_unknown_level() {
        let err = make_filter(Some("tax_core=loud")).unwrap_err();

        assert!(err.to_string().contains("invalid log level 'tax_core=loud'"));
    }

    #[test]
    fn open_log_file_reports_path() {
        let err = open_log_file(Path::new("/nonexistent/dir/form1040.log")).unwrap_err();

        assert!(err.to_string().contains("/nonexistent/dir/form1040.log"));
    }
}
