mod introspection;

pub use self::introspection::*;
