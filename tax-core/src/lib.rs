pub mod calculations;
pub mod models;

pub use calculations::{
    ChildTaxCredit, Form1040Calculator, bracket_tax, earned_income_credit,
    resolve_child_tax_credit,
};
pub use models::*;
