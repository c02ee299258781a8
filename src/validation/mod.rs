//! Validation of executable documents against a [`Schema`](crate::schema::Schema).
//!
//! Rules are [`OperationVisitor`](crate::ast::OperationVisitor)s bundled into a
//! [`ValidationPlan`]; they report [`ValidationError`]s instead of failing.

pub mod rules;
pub mod utils;
pub mod validate;

#[cfg(test)]
pub mod test_utils;

pub use self::rules::*;
pub use self::utils::*;
pub use self::validate::*;
