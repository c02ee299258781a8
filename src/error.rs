use thiserror::Error;

/// A value could not be produced at all. These stop the coercion of the value
/// being built and are returned to the caller, unlike validation diagnostics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolutionError {
    #[error("Variable \"${0}\" is not defined.")]
    UndeclaredVariable(String),

    #[error("Variable \"${name}\" of required type \"{type_name}\" was not provided.")]
    MissingVariable { name: String, type_name: String },

    #[error("Operation kind \"{0}\" is not supported by the schema.")]
    UnsupportedOperationKind(String),

    #[error("Expected value of type \"{type_name}\", found {found}.")]
    NotRepresentable { type_name: String, found: String },

    #[error("Expected non-nullable type \"{type_name}\" not to be null.")]
    NullValue { type_name: String },

    #[error("Unknown type \"{0}\".")]
    UnknownType(String),

    #[error("No schema type is registered for host type \"{0}\".")]
    UnknownHostType(String),

    #[error("Variable \"${0}\" cannot be resolved outside of an operation.")]
    NoVariableResolver(String),

    #[error("Cannot convert {found} into host type \"{expected}\".")]
    HostConversion { expected: String, found: String },

    #[error("Value nesting exceeds the maximum depth of {0}.")]
    DepthLimitExceeded(usize),
}

impl ResolutionError {
    pub(crate) fn not_representable(
        type_name: impl ToString,
        found: impl ToString,
    ) -> ResolutionError {
        ResolutionError::NotRepresentable {
            type_name: type_name.to_string(),
            found: found.to_string(),
        }
    }

    pub(crate) fn host_conversion<T>(found: impl ToString) -> ResolutionError {
        ResolutionError::HostConversion {
            expected: std::any::type_name::<T>().to_string(),
            found: found.to_string(),
        }
    }
}

/// Raised while building a schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("Type \"{0}\" is wrapped in NonNull twice.")]
    NestedNonNull(String),

    #[error("Type \"{0}\" is defined more than once.")]
    DuplicateType(String),

    #[error("Field \"{field}\" is defined more than once on \"{type_name}\".")]
    DuplicateField { type_name: String, field: String },

    #[error("Schema does not contain a Query root type \"{0}\".")]
    MissingQueryRoot(String),

    #[error("Unknown type \"{type_name}\" referenced by \"{referenced_by}\".")]
    UnknownType {
        type_name: String,
        referenced_by: String,
    },

    #[error("Failed to parse schema: {0}")]
    Sdl(String),
}

#[test]
fn error_messages() {
    assert_eq!(
        ResolutionError::UndeclaredVariable("y".to_string()).to_string(),
        "Variable \"$y\" is not defined."
    );
    assert_eq!(
        ResolutionError::not_representable("Int", "\"abc\"").to_string(),
        "Expected value of type \"Int\", found \"abc\"."
    );
    assert_eq!(
        SchemaError::NestedNonNull("Int!".to_string()).to_string(),
        "Type \"Int!\" is wrapped in NonNull twice."
    );
}
