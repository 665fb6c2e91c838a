//! Progressive tax over a marginal-rate schedule.
//!
//! Walks the brackets in ascending order, taxing the slice of income that
//! falls inside each one. The running total is rounded once at the end so
//! that per-bracket rounding never compounds.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::{BracketSchedule, bracket_tax};
//!
//! let schedule = BracketSchedule::tax_year_2025_default();
//!
//! // 11600 * 0.10 + (20000 - 11600) * 0.12
//! assert_eq!(bracket_tax(dec!(20000.00), &schedule), dec!(2168.00));
//! ```

use rust_decimal::Decimal;

use crate::BracketSchedule;
use crate::calculations::common::{max, min, round_half_up};

/// Total progressive tax on `taxable_income`, rounded to the cent.
///
/// Non-positive income yields zero.
pub fn bracket_tax(
    taxable_income: Decimal,
    schedule: &BracketSchedule,
) -> Decimal {
    let mut tax = Decimal::ZERO;
    let mut prev_boundary = Decimal::ZERO;

    for bracket in schedule.brackets() {
        if taxable_income <= bracket.min_income {
            break;
        }

        let upper = match bracket.max_income {
            Some(max_income) => min(taxable_income, max_income),
            None => taxable_income,
        };
        let taxed_portion = upper - max(bracket.min_income, prev_boundary);
        tax += taxed_portion * bracket.tax_rate;

        match bracket.max_income {
            Some(max_income) => prev_boundary = max_income,
            None => break,
        }
    }

    round_half_up(tax)
}
