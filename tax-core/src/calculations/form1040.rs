//! Form 1040 tax determination.
//!
//! Turns a validated [`FilingProfile`] into a [`TaxComputationResult`]. The
//! steps run in a fixed order, each consuming the previous step's rounded
//! output:
//!
//! | Step | Line | Description |
//! |------|------|-------------|
//! | 1    | 12   | Standard deduction for the filing status |
//! | 2    | 15   | Taxable income (wages - deduction, minimum 0) |
//! | 3    | 16   | Tax from the bracket schedule |
//! | 4    | 19, 28 | Child tax credit split into non-refundable and refundable parts |
//! | 5    | 27   | Earned income credit |
//! | 6    | 24   | Tax after non-refundable credits (minimum 0) |
//! | 7    | 31   | Total payments (withholding + refundable credits) |
//! | 8    | 34, 37 | Refund or amount owed |
//!
//! Interest (line 2b) and dividends (line 3b) are reported but not taxed, and
//! daycare expenses are not read by any step.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::{FilingProfile, FilingStatus, Form1040Calculator, TaxYearConfig};
//!
//! let config = TaxYearConfig::tax_year_2025();
//! let calculator = Form1040Calculator::new(&config);
//!
//! let profile = FilingProfile::new(FilingStatus::HeadOfHousehold, dec!(26263.00))
//!     .with_dependents(1)
//!     .with_withholding(dec!(264.00));
//!
//! let result = calculator.calculate(&profile).unwrap();
//!
//! assert_eq!(result.taxable_income, dec!(4363.00));
//! assert_eq!(result.tax_before_credits, dec!(436.30));
//! assert_eq!(result.refund, dec!(6084.70));
//! assert_eq!(result.amount_owed, dec!(0.00));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::child_credit::{ChildTaxCredit, resolve_child_tax_credit};
use crate::calculations::common::{non_negative, round_half_up};
use crate::calculations::{bracket_tax, earned_income_credit};
use crate::{
    BracketSchedule, FilingProfile, FilingStatus, FormLine, FormLines, InvalidProfile,
    TaxComputationResult, TaxYearConfig,
};

/// Refund or balance due. At most one side is positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Settlement {
    refund: Decimal,
    amount_owed: Decimal,
}

/// Calculator for Form 1040.
///
/// Holds only a shared reference to immutable tables. The filing status comes
/// from each profile, so one calculator can serve concurrent computations for
/// different statuses.
#[derive(Debug, Clone, Copy)]
pub struct Form1040Calculator<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> Form1040Calculator<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &'a TaxYearConfig {
        self.config
    }

    /// Computes the return using the schedule configured for the profile's
    /// filing status.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidProfile`] if any monetary amount is negative or above
    /// [`MAX_AMOUNT`](crate::MAX_AMOUNT). No partial result is produced.
    pub fn calculate(
        &self,
        profile: &FilingProfile,
    ) -> Result<TaxComputationResult, InvalidProfile> {
        let schedule = self.config.schedules.schedule_for(profile.filing_status);
        self.calculate_with_schedule(profile, schedule)
    }

    /// Computes the return against an explicit bracket schedule.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidProfile`] if any monetary amount is negative or above
    /// [`MAX_AMOUNT`](crate::MAX_AMOUNT).
    pub fn calculate_with_schedule(
        &self,
        profile: &FilingProfile,
        schedule: &BracketSchedule,
    ) -> Result<TaxComputationResult, InvalidProfile> {
        profile.validate()?;

        let wages = round_half_up(profile.wages);
        let withheld = round_half_up(profile.federal_tax_withheld);

        let deduction = self.standard_deduction(profile.filing_status);
        let taxable_income = self.taxable_income(wages, deduction);
        let tax_before_credits = bracket_tax(taxable_income, schedule);
        debug!(
            filing_status = %profile.filing_status,
            %wages,
            %deduction,
            %taxable_income,
            %tax_before_credits,
            "computed tax before credits"
        );

        let child_credit = self.child_tax_credit(tax_before_credits, profile.dependent_count);
        let eitc = earned_income_credit(wages, profile.dependent_count, &self.config.earned_income_credit);
        debug!(
            dependents = profile.dependent_count,
            child_credit_total = %child_credit.total,
            nonrefundable = %child_credit.nonrefundable,
            additional = %child_credit.refundable,
            %eitc,
            "resolved credits"
        );

        let total_tax = self.tax_after_nonrefundable(tax_before_credits, child_credit.nonrefundable);
        let total_payments = self.total_payments(withheld, child_credit.refundable, eitc);
        let settlement = self.settle(total_tax, total_payments);
        debug!(
            %total_tax,
            %total_payments,
            refund = %settlement.refund,
            amount_owed = %settlement.amount_owed,
            "settled return"
        );

        let mut result = TaxComputationResult {
            filing_status: profile.filing_status,
            total_income: wages,
            agi: wages,
            standard_deduction: deduction,
            taxable_income,
            tax_before_credits,
            nonrefundable_child_credit: child_credit.nonrefundable,
            additional_child_credit: child_credit.refundable,
            eitc,
            total_credits: round_half_up(child_credit.total + eitc),
            total_tax,
            total_payments,
            refund: settlement.refund,
            amount_owed: settlement.amount_owed,
            form_lines: FormLines::new(),
        };
        result.form_lines = self.form_lines(profile, &result);

        Ok(result)
    }

    /// Step 1: line 12.
    fn standard_deduction(
        &self,
        status: FilingStatus,
    ) -> Decimal {
        round_half_up(self.config.standard_deductions.amount(status))
    }

    /// Step 2: line 15.
    fn taxable_income(
        &self,
        wages: Decimal,
        deduction: Decimal,
    ) -> Decimal {
        round_half_up(non_negative(wages - deduction))
    }

    /// Step 4: lines 19 and 28.
    fn child_tax_credit(
        &self,
        tax_before_credits: Decimal,
        dependent_count: u32,
    ) -> ChildTaxCredit {
        resolve_child_tax_credit(
            tax_before_credits,
            dependent_count,
            &self.config.child_tax_credit,
        )
    }

    /// Step 6: line 24. The clamp only matters if the credit ever exceeds tax.
    fn tax_after_nonrefundable(
        &self,
        tax_before_credits: Decimal,
        nonrefundable_credit: Decimal,
    ) -> Decimal {
        round_half_up(non_negative(tax_before_credits - nonrefundable_credit))
    }

    /// Step 7: line 31.
    fn total_payments(
        &self,
        withheld: Decimal,
        additional_child_credit: Decimal,
        eitc: Decimal,
    ) -> Decimal {
        round_half_up(withheld + additional_child_credit + eitc)
    }

    /// Step 8: lines 34 and 37.
    fn settle(
        &self,
        total_tax: Decimal,
        total_payments: Decimal,
    ) -> Settlement {
        if total_tax == Decimal::ZERO {
            return Settlement {
                refund: total_payments,
                amount_owed: round_half_up(Decimal::ZERO),
            };
        }

        Settlement {
            refund: round_half_up(non_negative(total_payments - total_tax)),
            amount_owed: round_half_up(non_negative(total_tax - total_payments)),
        }
    }

    /// Step 9: form line map.
    fn form_lines(
        &self,
        profile: &FilingProfile,
        result: &TaxComputationResult,
    ) -> FormLines {
        let mut lines = FormLines::new();

        lines.set(FormLine::Wages, result.total_income);
        lines.set(FormLine::TaxableInterest, round_half_up(profile.interest_income));
        lines.set(FormLine::OrdinaryDividends, round_half_up(profile.dividends));
        lines.set(FormLine::TotalIncome, result.total_income);
        lines.set(FormLine::AdjustedGrossIncome, result.agi);
        lines.set(FormLine::StandardDeduction, result.standard_deduction);
        lines.set(FormLine::TaxableIncome, result.taxable_income);
        lines.set(FormLine::Tax, result.tax_before_credits);
        lines.set(FormLine::ChildTaxCredit, result.nonrefundable_child_credit);
        lines.set(FormLine::TotalTax, result.total_tax);
        lines.set(
            FormLine::FederalTaxWithheld,
            round_half_up(profile.federal_tax_withheld),
        );
        lines.set(FormLine::EarnedIncomeCredit, result.eitc);
        lines.set(FormLine::AdditionalChildTaxCredit, result.additional_child_credit);
        lines.set(FormLine::TotalPayments, result.total_payments);
        lines.set(FormLine::Refund, result.refund);
        lines.set(FormLine::AmountOwed, result.amount_owed);

        lines
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{ScheduleSet, TaxBracket};

    fn config() -> TaxYearConfig {
        TaxYearConfig::tax_year_2025()
    }

    fn whitney() -> FilingProfile {
        FilingProfile {
            taxpayer_name: "Whitney M. Refund".to_string(),
            taxpayer_ssn: "400-00-4702".to_string(),
            ..FilingProfile::new(FilingStatus::HeadOfHousehold, dec!(26263.00))
                .with_dependents(1)
                .with_withholding(dec!(264.00))
        }
    }

    // =========================================================================
    // standard_deduction tests
    // =========================================================================

    #[test]
    fn standard_deduction_uses_filing_status() {
        let config = config();
        let calculator = Form1040Calculator::new(&config);

        assert_eq!(
            calculator.standard_deduction(FilingStatus::HeadOfHousehold),
            dec!(21900.00)
        );
        assert_eq!(
            calculator.standard_deduction(FilingStatus::MarriedFilingJointly),
            dec!(29200.00)
        );
    }

    // =========================================================================
    // taxable_income tests
    // =========================================================================

    #[test]
    fn taxable_income_subtracts_deduction() {
        let config = config();
        let calculator = Form1040Calculator::new(&config);

        assert_eq!(
            calculator.taxable_income(dec!(26263.00), dec!(21900.00)),
            dec!(4363.00)
        );
    }

    #[test]
    fn taxable_income_is_zero_when_deduction_exceeds_wages() {
        let config = config();
        let calculator = Form1040Calculator::new(&config);

        assert_eq!(
            calculator.taxable_income(dec!(10000.00), dec!(14600.00)),
            dec!(0.00)
        );
    }

    // =========================================================================
    // tax_after_nonrefundable tests
    // =========================================================================

    #[test]
    fn tax_after_nonrefundable_subtracts_credit() {
        let config = config();
        let calculator = Form1040Calculator::new(&config);

        assert_eq!(
            calculator.tax_after_nonrefundable(dec!(5000.00), dec!(2000.00)),
            dec!(3000.00)
        );
    }

    #[test]
    fn tax_after_nonrefundable_never_negative() {
        let config = config();
        let calculator = Form1040Calculator::new(&config);

        assert_eq!(
            calculator.tax_after_nonrefundable(dec!(100.00), dec!(2000.00)),
            dec!(0.00)
        );
    }

    // =========================================================================
    // settle tests
    // =========================================================================

    #[test]
    fn settle_refunds_all_payments_when_no_tax() {
        let config = config();
        let calculator = Form1040Calculator::new(&config);

        assert_eq!(
            calculator.settle(dec!(0.00), dec!(6084.70)),
            Settlement {
                refund: dec!(6084.70),
                amount_owed: dec!(0.00),
            }
        );
    }

    #[test]
    fn settle_refunds_overpayment() {
        let config = config();
        let calculator = Form1040Calculator::new(&config);

        assert_eq!(
            calculator.settle(dec!(1000.00), dec!(1500.00)),
            Settlement {
                refund: dec!(500.00),
                amount_owed: dec!(0.00),
            }
        );
    }

    #[test]
    fn settle_reports_balance_due() {
        let config = config();
        let calculator = Form1040Calculator::new(&config);

        assert_eq!(
            calculator.settle(dec!(1500.00), dec!(1000.00)),
            Settlement {
                refund: dec!(0.00),
                amount_owed: dec!(500.00),
            }
        );
    }

    #[test]
    fn settle_exact_payment_is_neither() {
        let config = config();
        let calculator = Form1040Calculator::new(&config);

        assert_eq!(
            calculator.settle(dec!(1200.00), dec!(1200.00)),
            Settlement {
                refund: dec!(0.00),
                amount_owed: dec!(0.00),
            }
        );
    }

    // =========================================================================
    // calculate tests
    // =========================================================================

    #[test]
    fn calculate_whitney_scenario() {
        let config = config();
        let calculator = Form1040Calculator::new(&config);

        let result = calculator.calculate(&whitney()).unwrap();

        assert_eq!(result.filing_status, FilingStatus::HeadOfHousehold);
        assert_eq!(result.total_income, dec!(26263.00));
        assert_eq!(result.agi, dec!(26263.00));
        assert_eq!(result.standard_deduction, dec!(21900.00));
        assert_eq!(result.taxable_income, dec!(4363.00));
        assert_eq!(result.tax_before_credits, dec!(436.30));
        assert_eq!(result.nonrefundable_child_credit, dec!(436.30));
        assert_eq!(result.additional_child_credit, dec!(1563.70));
        assert_eq!(result.eitc, dec!(4257.00));
        assert_eq!(result.total_credits, dec!(6257.00));
        assert_eq!(result.total_tax, dec!(0.00));
        assert_eq!(result.total_payments, dec!(6084.70));
        assert_eq!(result.refund, dec!(6084.70));
        assert_eq!(result.amount_owed, dec!(0.00));
    }

    #[test]
    fn calculate_whitney_form_lines() {
        let config = config();
        let calculator = Form1040Calculator::new(&config);

        let lines = calculator.calculate(&whitney()).unwrap().form_lines;

        let expected = [
            ("1", dec!(26263.00)),
            ("2b", dec!(0.00)),
            ("3b", dec!(0.00)),
            ("7", dec!(26263.00)),
            ("11", dec!(26263.00)),
            ("12", dec!(21900.00)),
            ("15", dec!(4363.00)),
            ("16", dec!(436.30)),
            ("19", dec!(436.30)),
            ("24", dec!(0.00)),
            ("25a", dec!(264.00)),
            ("27", dec!(4257.00)),
            ("28", dec!(1563.70)),
            ("31", dec!(6084.70)),
            ("34", dec!(6084.70)),
            ("37", dec!(0.00)),
        ];
        assert_eq!(lines.len(), expected.len());
        for (key, amount) in expected {
            assert_eq!(lines.get_key(key), Some(amount), "line {key}");
        }
    }

    #[test]
    fn calculate_balance_due_without_dependents() {
        let config = config();
        let calculator = Form1040Calculator::new(&config);
        let profile = FilingProfile::new(FilingStatus::Single, dec!(80000.00))
            .with_withholding(dec!(5000.00));

        let result = calculator.calculate(&profile).unwrap();

        // 80000 - 14600 = 65400; 1160 + 4266 + (65400 - 47150) * 0.22 = 9441
        assert_eq!(result.taxable_income, dec!(65400.00));
        assert_eq!(result.tax_before_credits, dec!(9441.00));
        assert_eq!(result.eitc, dec!(0.00));
        assert_eq!(result.total_tax, dec!(9441.00));
        assert_eq!(result.total_payments, dec!(5000.00));
        assert_eq!(result.refund, dec!(0.00));
        assert_eq!(result.amount_owed, dec!(4441.00));
        assert_eq!(result.form_lines.get(FormLine::AmountOwed), Some(dec!(4441.00)));
        assert_eq!(result.form_lines.get(FormLine::Refund), Some(dec!(0.00)));
    }

    #[test]
    fn calculate_wages_below_deduction_refunds_capped_child_credit() {
        let config = config();
        let calculator = Form1040Calculator::new(&config);
        let profile = FilingProfile::new(FilingStatus::MarriedFilingJointly, dec!(20000.00))
            .with_dependents(2);

        let result = calculator.calculate(&profile).unwrap();

        assert_eq!(result.taxable_income, dec!(0.00));
        assert_eq!(result.tax_before_credits, dec!(0.00));
        assert_eq!(result.nonrefundable_child_credit, dec!(0.00));
        assert_eq!(result.additional_child_credit, dec!(3200.00));
        assert_eq!(result.eitc, dec!(7043.00));
        assert_eq!(result.refund, dec!(10243.00));
    }

    #[test]
    fn calculate_reports_interest_and_dividends_without_taxing_them() {
        let config = config();
        let calculator = Form1040Calculator::new(&config);
        let mut profile = FilingProfile::new(FilingStatus::Single, dec!(30000.00));
        profile.interest_income = dec!(1200.555);
        profile.dividends = dec!(800.00);
        let baseline = FilingProfile::new(FilingStatus::Single, dec!(30000.00));

        let result = calculator.calculate(&profile).unwrap();
        let baseline = calculator.calculate(&baseline).unwrap();

        assert_eq!(result.form_lines.get(FormLine::TaxableInterest), Some(dec!(1200.56)));
        assert_eq!(result.form_lines.get(FormLine::OrdinaryDividends), Some(dec!(800.00)));
        assert_eq!(result.total_income, baseline.total_income);
        assert_eq!(result.tax_before_credits, baseline.tax_before_credits);
    }

    #[test]
    fn calculate_ignores_daycare_expenses() {
        let config = config();
        let calculator = Form1040Calculator::new(&config);
        let mut with_daycare = whitney();
        with_daycare.daycare_expenses = dec!(3100.00);

        assert_eq!(
            calculator.calculate(&with_daycare).unwrap(),
            calculator.calculate(&whitney()).unwrap()
        );
    }

    #[test]
    fn calculate_rejects_negative_withholding() {
        let config = config();
        let calculator = Form1040Calculator::new(&config);
        let profile = whitney().with_withholding(dec!(-264.00));

        assert_eq!(
            calculator.calculate(&profile),
            Err(InvalidProfile::NegativeAmount {
                field: "federal_tax_withheld",
                value: dec!(-264.00),
            })
        );
    }

    #[test]
    fn calculate_rejects_withholding_beyond_supported_range() {
        let config = config();
        let calculator = Form1040Calculator::new(&config);
        let profile =
            FilingProfile::new(FilingStatus::Single, Decimal::ZERO).with_withholding(Decimal::MAX);

        assert_eq!(
            calculator.calculate(&profile),
            Err(InvalidProfile::AmountTooLarge {
                field: "federal_tax_withheld",
                value: Decimal::MAX,
            })
        );
    }

    #[test]
    fn calculate_at_maximum_amounts_completes() {
        let config = config();
        let calculator = Form1040Calculator::new(&config);
        let profile = FilingProfile {
            interest_income: crate::MAX_AMOUNT,
            dividends: crate::MAX_AMOUNT,
            ..FilingProfile::new(FilingStatus::HeadOfHousehold, crate::MAX_AMOUNT)
                .with_dependents(3)
                .with_withholding(crate::MAX_AMOUNT)
        };

        let result = calculator.calculate(&profile).unwrap();

        assert_eq!(result.eitc, dec!(0.00));
        assert_eq!(result.total_income, dec!(1000000000000.00));
        assert_eq!(result.total_payments, dec!(1000000000000.00));
        assert!(result.refund > Decimal::ZERO);
        assert_eq!(result.amount_owed, dec!(0.00));
    }

    #[test]
    fn calculate_uses_status_override_schedule() {
        let mut config = config();
        let flat = BracketSchedule::new(vec![TaxBracket::new(dec!(0), None, dec!(0.20))]).unwrap();
        config.schedules = ScheduleSet::new(BracketSchedule::tax_year_2025_default())
            .with_override(FilingStatus::Single, flat);
        let calculator = Form1040Calculator::new(&config);

        let single = calculator
            .calculate(&FilingProfile::new(FilingStatus::Single, dec!(24600.00)))
            .unwrap();
        let separate = calculator
            .calculate(&FilingProfile::new(FilingStatus::MarriedFilingSeparately, dec!(24600.00)))
            .unwrap();

        // Same deduction (14600), different schedules.
        assert_eq!(single.tax_before_credits, dec!(2000.00));
        assert_eq!(separate.tax_before_credits, dec!(1000.00));
    }

    #[test]
    fn calculate_with_schedule_ignores_configured_schedules() {
        let config = config();
        let calculator = Form1040Calculator::new(&config);
        let flat = BracketSchedule::new(vec![TaxBracket::new(dec!(0), None, dec!(0.50))]).unwrap();

        let result = calculator
            .calculate_with_schedule(&FilingProfile::new(FilingStatus::Single, dec!(15600.00)), &flat)
            .unwrap();

        assert_eq!(result.tax_before_credits, dec!(500.00));
    }
}
