//! The executable document model and the typed walk over it.

mod nodes;
mod operation_visitor;
mod parse;

pub use self::nodes::*;
pub use self::operation_visitor::*;
pub use self::parse::*;
