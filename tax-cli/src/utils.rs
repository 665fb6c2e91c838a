use rust_decimal::Decimal;
use thiserror::Error;

use tax_core::calculations::common::round_half_up;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid amount '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Parses a command-line amount.
///
/// Handles `$` and comma thousands separators (e.g. `"1,234.56"`).
/// Empty or whitespace-only input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    tax_data::parse_amount(s).map_err(|source| {
        tracing::error!(input = %s, "invalid amount: {}", source);
        ParseDecimalError {
            input: s.to_string(),
            source,
        }
    })
}

/// Formats an amount as US currency: `$6,084.70`, `-$12.50`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let text = rounded.abs().to_string();
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{cents}")
}

/// Hides all but the last four digits of an SSN: `***-**-4702`.
pub fn mask_ssn(ssn: &str) -> String {
    let digits: Vec<char> = ssn.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 4 {
        return "***-**-****".to_string();
    }
    let last_four: String = digits[digits.len() - 4..].iter().collect();
    format!("***-**-{last_four}")
}
