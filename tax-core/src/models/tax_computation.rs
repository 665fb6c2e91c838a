use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{FilingStatus, FormLines};

/// Fully resolved outcome of one Form 1040 computation.
///
/// Every amount is rounded to the cent. `refund` and `amount_owed` are never
/// both positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComputationResult {
    pub filing_status: FilingStatus,

    pub total_income: Decimal,
    pub agi: Decimal,
    pub standard_deduction: Decimal,
    pub taxable_income: Decimal,

    /// Bracket tax before any credit (line 16).
    pub tax_before_credits: Decimal,
    pub nonrefundable_child_credit: Decimal,
    pub additional_child_credit: Decimal,
    pub eitc: Decimal,
    /// Full child tax credit plus EITC, before the refundable cap is applied.
    pub total_credits: Decimal,

    /// Tax after non-refundable credits (line 24).
    pub total_tax: Decimal,
    pub total_payments: Decimal,
    pub refund: Decimal,
    pub amount_owed: Decimal,

    pub form_lines: FormLines,
}

impl TaxComputationResult {
    pub fn is_refund(&self) -> bool {
        self.refund > Decimal::ZERO
    }

    /// Refund as a positive amount, amount owed as a negative one.
    pub fn net_position(&self) -> Decimal {
        self.refund - self.amount_owed
    }
}
