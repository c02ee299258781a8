mod coerced;
mod resolver;
mod variables;

pub use self::coerced::*;
pub use self::resolver::*;
pub use self::variables::*;
