pub mod bracket_tax;
pub mod child_credit;
pub mod common;
pub mod eitc;
pub mod form1040;

pub use bracket_tax::bracket_tax;
pub use child_credit::{ChildTaxCredit, resolve_child_tax_credit};
pub use eitc::earned_income_credit;
pub use form1040::Form1040Calculator;
