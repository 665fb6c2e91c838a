mod credit_tables;
mod filing_profile;
mod filing_status;
mod form_lines;
mod standard_deduction;
mod tax_bracket;
mod tax_computation;
mod tax_year_config;

pub use credit_tables::{ChildTaxCreditRules, EitcTable, EitcTier};
pub use filing_profile::{FilingProfile, InvalidProfile, MAX_AMOUNT, ProfileRecord};
pub use filing_status::FilingStatus;
pub use form_lines::{FormLine, FormLines};
pub use standard_deduction::StandardDeductionTable;
pub use tax_bracket::{BracketSchedule, ScheduleError, ScheduleSet, TaxBracket};
pub use tax_computation::TaxComputationResult;
pub use tax_year_config::{ConfigurationError, TaxYearConfig};
