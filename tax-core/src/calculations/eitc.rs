//! Earned income tax credit.
//!
//! Flat credit up to the tier's income threshold, then a straight-line
//! phase-out. The phase-in region of the real credit is not modelled.

use rust_decimal::Decimal;

use crate::EitcTable;
use crate::calculations::common::{non_negative, round_half_up};

/// Refundable earned income credit for `wages` and `dependent_count`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::{EitcTable, earned_income_credit};
///
/// let table = EitcTable::tax_year_2025();
///
/// assert_eq!(earned_income_credit(dec!(26263.00), 1, &table), dec!(4257.00));
/// ```
pub fn earned_income_credit(
    wages: Decimal,
    dependent_count: u32,
    table: &EitcTable,
) -> Decimal {
    let tier = table.tier_for(dependent_count);

    if wages <= tier.max_income {
        return round_half_up(tier.max_credit);
    }

    let excess = wages - tier.max_income;
    let reduction = excess * table.phase_out_rate(dependent_count);

    round_half_up(non_negative(tier.max_credit - reduction))
}
