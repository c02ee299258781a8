pub mod defaults;
pub mod fields_on_correct_type;
pub mod leaf_field_selections;
/// Utilities validating GraphQL documents/operations
pub mod rule;

pub use self::defaults::*;
pub use self::fields_on_correct_type::*;
pub use self::leaf_field_selections::*;
pub use self::rule::*;
