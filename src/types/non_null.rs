use std::sync::Arc;

use super::GraphQLType;
use crate::ast::Value;
use crate::execution::CoercedValue;
use crate::schema::SchemaRepository;
use crate::{ResolutionError, SchemaError};

#[derive(Debug, Clone)]
pub struct NonNullType {
    of_type: Arc<GraphQLType>,
}

impl NonNullType {
    /// Fails when `of_type` is itself non-null.
    pub fn new(of_type: impl Into<Arc<GraphQLType>>) -> Result<Self, SchemaError> {
        let of_type = of_type.into();

        if let GraphQLType::NonNull(_) = of_type.as_ref() {
            return Err(SchemaError::NestedNonNull(of_type.to_string()));
        }

        Ok(NonNullType { of_type })
    }

    pub fn of_type(&self) -> &Arc<GraphQLType> {
        &self.of_type
    }

    pub(crate) fn coerce_literal(
        &self,
        value: &Value,
        repository: &SchemaRepository,
        depth: usize,
    ) -> Result<CoercedValue, ResolutionError> {
        if value.is_null() {
            return Err(ResolutionError::NullValue {
                type_name: format!("{}!", self.of_type),
            });
        }

        self.of_type.coerce_literal(value, repository, depth)
    }
}
