use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::FilingStatus;

/// Problems found while validating a bracket schedule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("bracket schedule is empty")]
    Empty,

    #[error("first bracket must start at 0, starts at {0}")]
    DoesNotStartAtZero(Decimal),

    #[error("bracket {index} is not ascending: {min_income} to {max_income}")]
    NotAscending {
        index: usize,
        min_income: Decimal,
        max_income: Decimal,
    },

    #[error("bracket {index} starts at {found}, previous bracket ends at {expected}")]
    NotContiguous {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("bracket {0} is unbounded but is not the last bracket")]
    UnboundedBeforeEnd(usize),

    #[error("last bracket must be unbounded, ends at {0}")]
    BoundedFinalBracket(Decimal),

    #[error("bracket {index} has rate {rate}, expected a fraction between 0 and 1")]
    InvalidRate { index: usize, rate: Decimal },
}

/// A single marginal-rate band. `max_income` is `None` for the top band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        min_income: Decimal,
        max_income: Option<Decimal>,
        tax_rate: Decimal,
    ) -> Self {
        Self {
            min_income,
            max_income,
            tax_rate,
        }
    }
}

/// Ordered, contiguous bracket table. Only constructible through validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct BracketSchedule {
    brackets: Vec<TaxBracket>,
}

impl BracketSchedule {
    /// Validates and wraps `brackets`.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] when the brackets are empty, do not start at
    /// zero, are not ascending or contiguous, have a rate outside `[0, 1]`, or
    /// when any bracket other than the last is unbounded (or the last is not).
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, ScheduleError> {
        let first = brackets.first().ok_or(ScheduleError::Empty)?;
        if first.min_income != Decimal::ZERO {
            return Err(ScheduleError::DoesNotStartAtZero(first.min_income));
        }

        let last_index = brackets.len() - 1;
        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.tax_rate < Decimal::ZERO || bracket.tax_rate > Decimal::ONE {
                return Err(ScheduleError::InvalidRate {
                    index,
                    rate: bracket.tax_rate,
                });
            }

            match bracket.max_income {
                Some(max_income) if max_income <= bracket.min_income => {
                    return Err(ScheduleError::NotAscending {
                        index,
                        min_income: bracket.min_income,
                        max_income,
                    });
                }
                Some(max_income) if index == last_index => {
                    return Err(ScheduleError::BoundedFinalBracket(max_income));
                }
                Some(max_income) => {
                    let next = &brackets[index + 1];
                    if next.min_income != max_income {
                        return Err(ScheduleError::NotContiguous {
                            index: index + 1,
                            expected: max_income,
                            found: next.min_income,
                        });
                    }
                }
                None if index != last_index => {
                    return Err(ScheduleError::UnboundedBeforeEnd(index));
                }
                None => {}
            }
        }

        Ok(Self { brackets })
    }

    /// Wraps brackets that are known to be valid (built-in tables).
    pub(crate) fn from_trusted(brackets: Vec<TaxBracket>) -> Self {
        debug_assert!(Self::new(brackets.clone()).is_ok());
        Self { brackets }
    }

    /// The reference rule set's marginal table, applied to every filing status.
    pub fn tax_year_2025_default() -> Self {
        Self::from_trusted(vec![
            TaxBracket::new(dec!(0), Some(dec!(11600)), dec!(0.10)),
            TaxBracket::new(dec!(11600), Some(dec!(47150)), dec!(0.12)),
            TaxBracket::new(dec!(47150), Some(dec!(100525)), dec!(0.22)),
            TaxBracket::new(dec!(100525), Some(dec!(191950)), dec!(0.24)),
            TaxBracket::new(dec!(191950), Some(dec!(243725)), dec!(0.32)),
            TaxBracket::new(dec!(243725), Some(dec!(609350)), dec!(0.35)),
            TaxBracket::new(dec!(609350), None, dec!(0.37)),
        ])
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }
}

impl TryFrom<Vec<TaxBracket>> for BracketSchedule {
    type Error = ScheduleError;

    fn try_from(brackets: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<BracketSchedule> for Vec<TaxBracket> {
    fn from(schedule: BracketSchedule) -> Self {
        schedule.brackets
    }
}

/// A default schedule plus optional per-status replacements.
///
/// The reference rule set applies one table to every filing status. Overrides
/// let a caller plug in per-status schedules without touching the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSet {
    pub default: BracketSchedule,
    #[serde(default)]
    pub overrides: BTreeMap<FilingStatus, BracketSchedule>,
}

impl ScheduleSet {
    pub fn new(default: BracketSchedule) -> Self {
        Self {
            default,
            overrides: BTreeMap::new(),
        }
    }

    pub fn with_override(
        mut self,
        status: FilingStatus,
        schedule: BracketSchedule,
    ) -> Self {
        self.overrides.insert(status, schedule);
        self
    }

    pub fn schedule_for(
        &self,
        status: FilingStatus,
    ) -> &BracketSchedule {
        self.overrides.get(&status).unwrap_or(&self.default)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn two_brackets() -> Vec<TaxBracket> {
        vec![
            TaxBracket::new(dec!(0), Some(dec!(10000)), dec!(0.10)),
            TaxBracket::new(dec!(10000), None, dec!(0.20)),
        ]
    }

    // =========================================================================
    // BracketSchedule::new
    // =========================================================================

    #[test]
    fn new_accepts_contiguous_schedule() {
        let schedule = BracketSchedule::new(two_brackets()).expect("valid schedule");

        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule.brackets()[1].min_income, dec!(10000));
    }

    #[test]
    fn new_accepts_single_unbounded_bracket() {
        let result = BracketSchedule::new(vec![TaxBracket::new(dec!(0), None, dec!(0.15))]);

        assert!(result.is_ok());
    }

    #[test]
    fn new_rejects_empty_schedule() {
        assert_eq!(BracketSchedule::new(vec![]), Err(ScheduleError::Empty));
    }

    #[test]
    fn new_rejects_schedule_not_starting_at_zero() {
        let mut brackets = two_brackets();
        brackets[0].min_income = dec!(500);

        assert_eq!(
            BracketSchedule::new(brackets),
            Err(ScheduleError::DoesNotStartAtZero(dec!(500)))
        );
    }

    #[test]
    fn new_rejects_gap_between_brackets() {
        let mut brackets = two_brackets();
        brackets[1].min_income = dec!(12000);

        assert_eq!(
            BracketSchedule::new(brackets),
            Err(ScheduleError::NotContiguous {
                index: 1,
                expected: dec!(10000),
                found: dec!(12000),
            })
        );
    }

    #[test]
    fn new_rejects_overlapping_brackets() {
        let mut brackets = two_brackets();
        brackets[1].min_income = dec!(9000);

        assert!(matches!(
            BracketSchedule::new(brackets),
            Err(ScheduleError::NotContiguous { index: 1, .. })
        ));
    }

    #[test]
    fn new_rejects_descending_bracket() {
        let brackets = vec![
            TaxBracket::new(dec!(0), Some(dec!(0)), dec!(0.10)),
            TaxBracket::new(dec!(0), None, dec!(0.20)),
        ];

        assert_eq!(
            BracketSchedule::new(brackets),
            Err(ScheduleError::NotAscending {
                index: 0,
                min_income: dec!(0),
                max_income: dec!(0),
            })
        );
    }

    #[test]
    fn new_rejects_unbounded_middle_bracket() {
        let brackets = vec![
            TaxBracket::new(dec!(0), None, dec!(0.10)),
            TaxBracket::new(dec!(10000), None, dec!(0.20)),
        ];

        assert_eq!(
            BracketSchedule::new(brackets),
            Err(ScheduleError::UnboundedBeforeEnd(0))
        );
    }

    #[test]
    fn new_rejects_bounded_final_bracket() {
        let mut brackets = two_brackets();
        brackets[1].max_income = Some(dec!(50000));

        assert_eq!(
            BracketSchedule::new(brackets),
            Err(ScheduleError::BoundedFinalBracket(dec!(50000)))
        );
    }

    #[test]
    fn new_rejects_rate_above_one() {
        let mut brackets = two_brackets();
        brackets[1].tax_rate = dec!(37);

        assert_eq!(
            BracketSchedule::new(brackets),
            Err(ScheduleError::InvalidRate {
                index: 1,
                rate: dec!(37),
            })
        );
    }

    #[test]
    fn built_in_default_is_valid() {
        let built_in = BracketSchedule::tax_year_2025_default();

        assert_eq!(BracketSchedule::new(built_in.brackets().to_vec()), Ok(built_in));
    }

    #[test]
    fn deserialize_validates_brackets() {
        let json = r#"[
            {"min_income": "0", "max_income": "100", "tax_rate": "0.1"},
            {"min_income": "150", "max_income": null, "tax_rate": "0.2"}
        ]"#;

        let result: Result<BracketSchedule, _> = serde_json::from_str(json);

        let err = result.expect_err("gap should be rejected");
        assert!(err.to_string().contains("previous bracket ends at 100"));
    }

    // =========================================================================
    // ScheduleSet
    // =========================================================================

    #[test]
    fn schedule_for_falls_back_to_default() {
        let set = ScheduleSet::new(BracketSchedule::tax_year_2025_default());

        for status in FilingStatus::all() {
            assert_eq!(set.schedule_for(*status), &set.default);
        }
    }

    #[test]
    fn schedule_for_prefers_override() {
        let single = BracketSchedule::new(two_brackets()).unwrap();
        let set = ScheduleSet::new(BracketSchedule::tax_year_2025_default())
            .with_override(FilingStatus::Single, single.clone());

        assert_eq!(set.schedule_for(FilingStatus::Single), &single);
        assert_eq!(
            set.schedule_for(FilingStatus::HeadOfHousehold),
            &BracketSchedule::tax_year_2025_default()
        );
    }
}
