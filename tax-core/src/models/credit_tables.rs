use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::ConfigurationError;

/// Child tax credit amounts, applied per dependent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildTaxCreditRules {
    /// Flat credit per dependent. No income phase-out is modelled.
    pub credit_per_dependent: Decimal,

    /// Cap on the refundable (additional child tax credit) portion, per dependent.
    pub refundable_cap_per_dependent: Decimal,
}

impl ChildTaxCreditRules {
    pub fn tax_year_2025() -> Self {
        Self {
            credit_per_dependent: dec!(2000.00),
            refundable_cap_per_dependent: dec!(1600.00),
        }
    }
}

/// One row of the earned income credit table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EitcTier {
    /// Wages up to and including this amount receive the full credit.
    pub max_income: Decimal,
    pub max_credit: Decimal,
}

impl EitcTier {
    pub fn new(
        max_income: Decimal,
        max_credit: Decimal,
    ) -> Self {
        Self {
            max_income,
            max_credit,
        }
    }
}

/// Earned income credit table keyed by dependent tier.
///
/// Tier `n` applies to `n` dependents; counts beyond the last tier use the
/// last tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EitcTable {
    tiers: Vec<EitcTier>,
    phase_out_rate_with_dependents: Decimal,
    phase_out_rate_without_dependents: Decimal,
}

impl EitcTable {
    /// # Errors
    ///
    /// [`ConfigurationError::EmptyEitcTable`] when `tiers` is empty,
    /// [`ConfigurationError::NegativeAmount`] for a negative threshold or
    /// credit, and [`ConfigurationError::InvalidRate`] for a phase-out rate
    /// outside `[0, 1]`.
    pub fn new(
        tiers: Vec<EitcTier>,
        phase_out_rate_with_dependents: Decimal,
        phase_out_rate_without_dependents: Decimal,
    ) -> Result<Self, ConfigurationError> {
        if tiers.is_empty() {
            return Err(ConfigurationError::EmptyEitcTable);
        }

        for (tier, row) in tiers.iter().enumerate() {
            if row.max_income < Decimal::ZERO {
                return Err(ConfigurationError::NegativeAmount {
                    field: format!("earned_income_credit.tiers[{tier}].max_income"),
                    value: row.max_income,
                });
            }
            if row.max_credit < Decimal::ZERO {
                return Err(ConfigurationError::NegativeAmount {
                    field: format!("earned_income_credit.tiers[{tier}].max_credit"),
                    value: row.max_credit,
                });
            }
        }

        for (field, rate) in [
            ("phase_out_rate_with_dependents", phase_out_rate_with_dependents),
            ("phase_out_rate_without_dependents", phase_out_rate_without_dependents),
        ] {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(ConfigurationError::InvalidRate {
                    field: field.to_string(),
                    rate,
                });
            }
        }

        Ok(Self {
            tiers,
            phase_out_rate_with_dependents,
            phase_out_rate_without_dependents,
        })
    }

    pub fn tax_year_2025() -> Self {
        Self {
            tiers: vec![
                EitcTier::new(dec!(17900), dec!(632.00)),
                EitcTier::new(dec!(47900), dec!(4257.00)),
                EitcTier::new(dec!(53900), dec!(7043.00)),
                EitcTier::new(dec!(57900), dec!(7931.00)),
            ],
            phase_out_rate_with_dependents: dec!(0.1598),
            phase_out_rate_without_dependents: dec!(0.0765),
        }
    }

    pub fn tiers(&self) -> &[EitcTier] {
        &self.tiers
    }

    /// Highest dependent count with its own row.
    pub fn max_tier(&self) -> u32 {
        u32::try_from(self.tiers.len().saturating_sub(1)).unwrap_or(u32::MAX)
    }

    /// Row for `dependent_count`, clamped to the last tier.
    pub fn tier_for(
        &self,
        dependent_count: u32,
    ) -> &EitcTier {
        let index = dependent_count.min(self.max_tier()) as usize;
        &self.tiers[index]
    }

    pub fn phase_out_rate_with_dependents(&self) -> Decimal {
        self.phase_out_rate_with_dependents
    }

    pub fn phase_out_rate_without_dependents(&self) -> Decimal {
        self.phase_out_rate_without_dependents
    }

    pub fn phase_out_rate(
        &self,
        dependent_count: u32,
    ) -> Decimal {
        if dependent_count > 0 {
            self.phase_out_rate_with_dependents
        } else {
            self.phase_out_rate_without_dependents
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn tier_for_returns_matching_row() {
        let table = EitcTable::tax_year_2025();

        assert_eq!(table.tier_for(0), &EitcTier::new(dec!(17900), dec!(632.00)));
        assert_eq!(table.tier_for(1), &EitcTier::new(dec!(47900), dec!(4257.00)));
        assert_eq!(table.tier_for(2), &EitcTier::new(dec!(53900), dec!(7043.00)));
        assert_eq!(table.tier_for(3), &EitcTier::new(dec!(57900), dec!(7931.00)));
    }

    #[test]
    fn tier_for_clamps_to_last_tier() {
        let table = EitcTable::tax_year_2025();

        assert_eq!(table.max_tier(), 3);
        assert_eq!(table.tier_for(7), table.tier_for(3));
        assert_eq!(table.tier_for(u32::MAX), table.tier_for(3));
    }

    #[test]
    fn phase_out_rate_depends_on_having_dependents() {
        let table = EitcTable::tax_year_2025();

        assert_eq!(table.phase_out_rate(0), dec!(0.0765));
        assert_eq!(table.phase_out_rate(1), dec!(0.1598));
        assert_eq!(table.phase_out_rate(5), dec!(0.1598));
    }

    #[test]
    fn new_rejects_empty_tiers() {
        let result = EitcTable::new(vec![], dec!(0.1598), dec!(0.0765));

        assert_eq!(result, Err(ConfigurationError::EmptyEitcTable));
    }

    #[test]
    fn new_rejects_negative_credit() {
        let result = EitcTable::new(
            vec![EitcTier::new(dec!(17900), dec!(-1))],
            dec!(0.1598),
            dec!(0.0765),
        );

        assert_eq!(
            result,
            Err(ConfigurationError::NegativeAmount {
                field: "earned_income_credit.tiers[0].max_credit".to_string(),
                value: dec!(-1),
            })
        );
    }

    #[test]
    fn new_rejects_rate_above_one() {
        let result = EitcTable::new(
            vec![EitcTier::new(dec!(17900), dec!(632))],
            dec!(15.98),
            dec!(0.0765),
        );

        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidRate { ref field, .. })
                if field == "phase_out_rate_with_dependents"
        ));
    }

    #[test]
    fn new_accepts_built_in_rows() {
        let built_in = EitcTable::tax_year_2025();

        let rebuilt = EitcTable::new(built_in.tiers().to_vec(), dec!(0.1598), dec!(0.0765));

        assert_eq!(rebuilt, Ok(built_in));
    }
}
