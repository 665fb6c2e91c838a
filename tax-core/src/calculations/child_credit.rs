//! Child tax credit and additional (refundable) child tax credit.
//!
//! The full credit is a flat amount per dependent. The non-refundable part is
//! limited to the tax it offsets; whatever is left may be refunded up to a
//! separate per-dependent cap, independent of how much was already absorbed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ChildTaxCreditRules;
use crate::calculations::common::{min, non_negative, round_half_up};

/// Split of the child tax credit into its two parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildTaxCredit {
    /// Credit available before any limit (`credit_per_dependent × dependents`).
    pub total: Decimal,
    /// Applied against tax (line 19).
    pub nonrefundable: Decimal,
    /// Credit left after the non-refundable part.
    pub remaining: Decimal,
    /// Additional child tax credit (line 28).
    pub refundable: Decimal,
}

/// Resolves the child tax credit for `dependent_count` dependents against
/// `tax_before_credits`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::{ChildTaxCreditRules, resolve_child_tax_credit};
///
/// let credit = resolve_child_tax_credit(dec!(436.30), 1, &ChildTaxCreditRules::tax_year_2025());
///
/// assert_eq!(credit.nonrefundable, dec!(436.30));
/// assert_eq!(credit.refundable, dec!(1563.70));
/// ```
pub fn resolve_child_tax_credit(
    tax_before_credits: Decimal,
    dependent_count: u32,
    rules: &ChildTaxCreditRules,
) -> ChildTaxCredit {
    let dependents = Decimal::from(dependent_count);

    let total = round_half_up(rules.credit_per_dependent * dependents);
    let nonrefundable = min(total, non_negative(tax_before_credits));
    let remaining = total - nonrefundable;
    let refundable_cap = round_half_up(rules.refundable_cap_per_dependent * dependents);
    let refundable = min(remaining, refundable_cap);

    ChildTaxCredit {
        total,
        nonrefundable: round_half_up(nonrefundable),
        remaining: round_half_up(remaining),
        refundable: round_half_up(refundable),
    }
}
