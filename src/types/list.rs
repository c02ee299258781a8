use std::sync::Arc;

use tracing::trace;

use super::GraphQLType;
use crate::ast::Value;
use crate::execution::CoercedValue;
use crate::schema::SchemaRepository;
use crate::ResolutionError;

/// An ordered sequence of `of_type` values.
#[derive(Debug, Clone)]
pub struct ListType {
    of_type: Arc<GraphQLType>,
}

impl ListType {
    pub fn new(of_type: impl Into<Arc<GraphQLType>>) -> Self {
        ListType {
            of_type: of_type.into(),
        }
    }

    pub fn of_type(&self) -> &Arc<GraphQLType> {
        &self.of_type
    }

    /// A literal that is itself a valid member value becomes a list of one.
    /// Otherwise a list literal is coerced element by element, in order.
    pub(crate) fn coerce_literal(
        &self,
        value: &Value,
        repository: &SchemaRepository,
        depth: usize,
    ) -> Result<CoercedValue, ResolutionError> {
        match self.of_type.coerce_literal(value, repository, depth + 1) {
            Ok(single) if !single.is_null() => {
                trace!(member = %self.of_type, "coerced single value into a list");
                Ok(CoercedValue::List(vec![single]))
            }
            probed => match value {
                Value::List(items) => items
                    .iter()
                    .map(|item| self.of_type.coerce_literal(item, repository, depth + 1))
                    .collect::<Result<Vec<_>, _>>()
                    .map(CoercedValue::List),
                _ => probed,
            },
        }
    }
}
