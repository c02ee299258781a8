//! graphql-coercion
//! ================
//!
//! Type-aware validation and value coercion for GraphQL documents.
//!
//! A [`Schema`](schema::Schema) is built from registered types or from SDL.
//! Executable documents are parsed into the owned tree in [`ast`], checked by
//! the rules in [`validation`], and their variables and argument literals are
//! coerced into host values through [`execution::VariableResolver`] and
//! [`types::GraphQLType::get_from_ast`].
//!

pub mod ast;

mod error;

pub mod execution;

pub mod introspection;

pub mod schema;

pub mod types;

pub mod validation;

pub use error::{ResolutionError, SchemaError};
