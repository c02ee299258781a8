//! The schema type graph.
//!
//! Named types are shared through `Arc`; members of objects and input objects
//! refer to other types by their type expression and are resolved through the
//! [`Schema`], so the graph never holds a reference cycle.

mod enum_type;
mod input_object;
mod list;
mod non_null;
mod object;
mod scalar;

use std::fmt;

pub use self::enum_type::*;
pub use self::input_object::*;
pub use self::list::*;
pub use self::non_null::*;
pub use self::object::*;
pub use self::scalar::*;

use crate::ast::Value;
use crate::execution::CoercedValue;
use crate::introspection::{IntrospectedType, TypeKind};
use crate::schema::{Schema, SchemaRepository};
use crate::ResolutionError;

#[derive(Debug, Clone)]
pub enum GraphQLType {
    Scalar(ScalarType),
    Enum(EnumType),
    List(ListType),
    NonNull(NonNullType),
    InputObject(InputObjectType),
    Object(ObjectType),
}

impl GraphQLType {
    /// Name of a named type; wrappers have none.
    pub fn name(&self) -> Option<&str> {
        match self {
            GraphQLType::Scalar(t) => Some(t.name()),
            GraphQLType::Enum(t) => Some(t.name()),
            GraphQLType::InputObject(t) => Some(t.name()),
            GraphQLType::Object(t) => Some(t.name()),
            GraphQLType::List(_) | GraphQLType::NonNull(_) => None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            GraphQLType::Scalar(t) => t.description(),
            GraphQLType::Enum(t) => t.description(),
            GraphQLType::InputObject(t) => t.description(),
            GraphQLType::Object(t) => t.description(),
            GraphQLType::List(_) | GraphQLType::NonNull(_) => None,
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            GraphQLType::Scalar(_) => TypeKind::SCALAR,
            GraphQLType::Enum(_) => TypeKind::ENUM,
            GraphQLType::List(_) => TypeKind::LIST,
            GraphQLType::NonNull(_) => TypeKind::NON_NULL,
            GraphQLType::InputObject(_) => TypeKind::INPUT_OBJECT,
            GraphQLType::Object(object) => match object.composite_kind() {
                CompositeKind::Object => TypeKind::OBJECT,
                CompositeKind::Interface => TypeKind::INTERFACE,
                CompositeKind::Union => TypeKind::UNION,
            },
        }
    }

    /// Whether a selection on this type must stop here. Wrappers answer for
    /// the type they wrap.
    pub fn is_leaf_type(&self) -> bool {
        match self {
            GraphQLType::Scalar(_) | GraphQLType::Enum(_) => true,
            GraphQLType::List(list) => list.of_type().is_leaf_type(),
            GraphQLType::NonNull(non_null) => non_null.of_type().is_leaf_type(),
            GraphQLType::InputObject(_) | GraphQLType::Object(_) => false,
        }
    }

    pub fn is_input_type(&self) -> bool {
        match self {
            GraphQLType::Scalar(_) | GraphQLType::Enum(_) | GraphQLType::InputObject(_) => true,
            GraphQLType::List(list) => list.of_type().is_input_type(),
            GraphQLType::NonNull(non_null) => non_null.of_type().is_input_type(),
            GraphQLType::Object(_) => false,
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, GraphQLType::NonNull(_))
    }

    /// The named type beneath any list and non-null wrappers.
    pub fn named_type(&self) -> &GraphQLType {
        match self {
            GraphQLType::List(list) => list.of_type().named_type(),
            GraphQLType::NonNull(non_null) => non_null.of_type().named_type(),
            named => named,
        }
    }

    /// Coerces a literal from a document into a value of this type.
    ///
    /// Variable references are resolved through the repository's variable
    /// resolver; without one they fail with
    /// [`ResolutionError::NoVariableResolver`].
    pub fn get_from_ast(
        &self,
        value: &Value,
        repository: &SchemaRepository,
    ) -> Result<CoercedValue, ResolutionError> {
        self.coerce_literal(value, repository, 0)
    }

    pub(crate) fn coerce_literal(
        &self,
        value: &Value,
        repository: &SchemaRepository,
        depth: usize,
    ) -> Result<CoercedValue, ResolutionError> {
        let max_depth = repository.limits().max_depth;
        if depth > max_depth {
            return Err(ResolutionError::DepthLimitExceeded(max_depth));
        }

        if let Value::Variable(name) = value {
            let resolver = repository
                .variable_resolver()
                .ok_or_else(|| ResolutionError::NoVariableResolver(name.clone()))?;
            let resolved = resolver.resolve(name)?;

            if resolved.is_null() && self.is_non_null() {
                return Err(ResolutionError::NullValue {
                    type_name: self.to_string(),
                });
            }

            return Ok(resolved);
        }

        match self {
            GraphQLType::NonNull(non_null) => non_null.coerce_literal(value, repository, depth),
            _ if value.is_null() => Ok(CoercedValue::Null),
            GraphQLType::Scalar(scalar) => scalar.parse_literal(value),
            GraphQLType::Enum(enum_type) => enum_type.parse_literal(value),
            GraphQLType::List(list) => list.coerce_literal(value, repository, depth),
            GraphQLType::InputObject(input_object) => {
                input_object.coerce_literal(value, repository, depth)
            }
            GraphQLType::Object(object) => {
                Err(ResolutionError::not_representable(object.name(), value))
            }
        }
    }

    /// Describes this type. Wrappers describe the type they wrap in `ofType`.
    pub fn introspect(&self, schema: &Schema) -> IntrospectedType {
        match self {
            GraphQLType::Scalar(scalar) => scalar.introspect(),
            GraphQLType::Enum(enum_type) => enum_type.introspect(),
            GraphQLType::List(list) => {
                IntrospectedType::wrapping(TypeKind::LIST, list.of_type().introspect(schema))
            }
            GraphQLType::NonNull(non_null) => IntrospectedType::wrapping(
                TypeKind::NON_NULL,
                non_null.of_type().introspect(schema),
            ),
            GraphQLType::InputObject(input_object) => input_object.introspect(schema),
            GraphQLType::Object(object) => object.introspect(schema),
        }
    }
}

impl fmt::Display for GraphQLType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphQLType::List(list) => write!(f, "[{}]", list.of_type()),
            GraphQLType::NonNull(non_null) => write!(f, "{}!", non_null.of_type()),
            named => f.write_str(named.name().unwrap_or_default()),
        }
    }
}

impl From<ScalarType> for GraphQLType {
    fn from(scalar: ScalarType) -> Self {
        GraphQLType::Scalar(scalar)
    }
}

impl From<EnumType> for GraphQLType {
    fn from(enum_type: EnumType) -> Self {
        GraphQLType::Enum(enum_type)
    }
}

impl From<ListType> for GraphQLType {
    fn from(list: ListType) -> Self {
        GraphQLType::List(list)
    }
}

impl From<NonNullType> for GraphQLType {
    fn from(non_null: NonNullType) -> Self {
        GraphQLType::NonNull(non_null)
    }
}

impl From<InputObjectType> for GraphQLType {
    fn from(input_object: InputObjectType) -> Self {
        GraphQLType::InputObject(input_object)
    }
}

#[cfg(test)]
use std::sync::Arc;
#[cfg(test)]
use pretty_assertions::assert_eq;
#[cfg(test)]
use crate::ast::Type;
#[cfg(test)]
use crate::execution::DynamicInputObject;
#[cfg(test)]
use crate::schema::SchemaBuilder;
#[cfg(test)]
use crate::SchemaError;

#[cfg(test)]
#[derive(Debug, Clone, Default, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

#[cfg(test)]
fn test_schema() -> Schema {
    let mut builder = SchemaBuilder::new();
    builder
        .add_type(
            InputObjectType::typed::<Point>("Point")
                .field("x", Type::named("Int"), |p: &mut Point, x: i32| p.x = x)
                .field("y", Type::named("Int"), |p: &mut Point, y: i32| p.y = y),
        )
        .and_then(|b| {
            b.add_type(
                InputObjectType::dynamic("Filter")
                    .dynamic_field("name", Type::named("String"))
                    .dynamic_field("limit", Type::non_null(Type::named("Int"))),
            )
        })
        .and_then(|b| {
            b.add_type(
                ObjectType::new("Query")
                    .field(FieldDescriptor::new("name", Type::named("String"))),
            )
        })
        .expect("failed to register types");
    builder.set_query_type("Query");
    builder.build().expect("failed to build schema")
}

#[cfg(test)]
fn int_list() -> GraphQLType {
    GraphQLType::List(ListType::new(GraphQLType::Scalar(ScalarType::int())))
}

#[test]
fn list_literals_keep_length_and_order() {
    let schema = test_schema();
    let repository = SchemaRepository::new(&schema);

    let value = Value::List(vec![Value::Int(3), Value::Int(1), Value::Int(2)]);

    assert_eq!(
        int_list().get_from_ast(&value, &repository),
        Ok(CoercedValue::List(vec![
            CoercedValue::Int(3),
            CoercedValue::Int(1),
            CoercedValue::Int(2)
        ]))
    );
    assert_eq!(
        int_list().get_from_ast(&Value::List(vec![]), &repository),
        Ok(CoercedValue::List(vec![]))
    );
}

#[test]
fn single_member_values_become_lists_of_one() {
    let schema = test_schema();
    let repository = SchemaRepository::new(&schema);

    assert_eq!(
        int_list().get_from_ast(&Value::Int(5), &repository),
        Ok(CoercedValue::List(vec![CoercedValue::Int(5)]))
    );
    assert_eq!(
        int_list().get_from_ast(&Value::Null, &repository),
        Ok(CoercedValue::Null)
    );
    assert!(int_list()
        .get_from_ast(&Value::String("x".to_string()), &repository)
        .is_err());
    assert!(int_list()
        .get_from_ast(&Value::List(vec![Value::Int(1), Value::Boolean(true)]), &repository)
        .is_err());
}

#[test]
fn non_null_rejects_null_and_nesting() {
    let schema = test_schema();
    let repository = SchemaRepository::new(&schema);
    let int = Arc::new(GraphQLType::Scalar(ScalarType::int()));
    let non_null = NonNullType::new(int.clone()).expect("valid wrapper");

    assert_eq!(
        GraphQLType::NonNull(non_null.clone()).get_from_ast(&Value::Null, &repository),
        Err(ResolutionError::NullValue {
            type_name: "Int!".to_string()
        })
    );
    assert_eq!(
        NonNullType::new(GraphQLType::NonNull(non_null)).err(),
        Some(SchemaError::NestedNonNull("Int!".to_string()))
    );
}

#[test]
fn input_objects_accept_any_subset_of_fields_in_any_order() {
    let schema = test_schema();
    let repository = SchemaRepository::new(&schema);
    let point = schema
        .resolve_input_type_by_name("Point")
        .expect("Point is registered");

    let cases = [
        ("{ x: 1, y: 2 }", Point { x: 1, y: 2 }),
        ("{ y: 2, x: 1 }", Point { x: 1, y: 2 }),
        ("{ y: 7 }", Point { x: 0, y: 7 }),
        ("{ }", Point::default()),
        ("{ x: 4, z: 9 }", Point { x: 4, y: 0 }),
    ];

    for (literal, expected) in cases {
        let value = parse_value(literal);
        let coerced = point
            .get_from_ast(&value, &repository)
            .expect("failed to coerce");

        assert_eq!(coerced.into_host::<Point>(), Ok(expected), "{}", literal);
    }

    assert!(point
        .get_from_ast(&Value::List(vec![]), &repository)
        .is_err());
    assert!(point
        .get_from_ast(&parse_value("{ x: \"one\" }"), &repository)
        .is_err());
}

#[test]
fn dynamic_input_objects_coerce_against_declared_types() {
    let schema = test_schema();
    let repository = SchemaRepository::new(&schema);
    let filter = schema
        .resolve_input_type_by_name("Filter")
        .expect("Filter is registered");

    let coerced = filter
        .get_from_ast(&parse_value("{ limit: 10, name: \"rex\" }"), &repository)
        .expect("failed to coerce");
    let dynamic = coerced
        .as_object()
        .and_then(|object| object.as_dynamic())
        .cloned()
        .unwrap_or_default();

    assert_eq!(dynamic.get("limit"), Some(&CoercedValue::Int(10)));
    assert_eq!(
        dynamic.get("name"),
        Some(&CoercedValue::String("rex".to_string()))
    );
    assert_eq!(
        filter.get_from_ast(&parse_value("{ limit: null }"), &repository),
        Err(ResolutionError::NullValue {
            type_name: "Int!".to_string()
        })
    );
    assert_eq!(DynamicInputObject::default().get("limit"), None);
}

#[test]
fn variables_require_a_resolver() {
    let schema = test_schema();
    let repository = SchemaRepository::new(&schema);

    assert_eq!(
        int_list().get_from_ast(&Value::Variable("ids".to_string()), &repository),
        Err(ResolutionError::NoVariableResolver("ids".to_string()))
    );
}

#[test]
fn introspection_reports_kind_and_wrapped_types() {
    let schema = test_schema();
    let nested = GraphQLType::NonNull(
        NonNullType::new(GraphQLType::List(ListType::new(GraphQLType::NonNull(
            NonNullType::new(GraphQLType::Scalar(ScalarType::int())).expect("valid wrapper"),
        ))))
        .expect("valid wrapper"),
    );

    let introspected = nested.introspect(&schema);
    assert_eq!(nested.to_string(), "[Int!]!");
    assert_eq!(introspected.kind, TypeKind::NON_NULL);

    let list = introspected.of_type.expect("non-null wraps a list");
    assert_eq!(list.kind, TypeKind::LIST);

    let inner = list.of_type.expect("list wraps a non-null");
    assert_eq!(inner.kind, TypeKind::NON_NULL);
    assert_eq!(
        inner.of_type.map(|t| (t.kind, t.name)),
        Some((TypeKind::SCALAR, Some("Int".to_string())))
    );

    for name in ["Point", "Filter"] {
        let input = schema.resolve_input_type_by_name(name).expect("registered");
        assert_eq!(input.introspect(&schema).kind, input.kind());
    }
    assert_eq!(
        schema.query_type().introspect(&schema).kind,
        TypeKind::OBJECT
    );
}

#[cfg(test)]
fn parse_value(literal: &str) -> Value {
    let document = crate::ast::parse_query(&format!("{{ f(v: {}) }}", literal))
        .expect("failed to parse literal");
    let operation = document.operation(None).expect("missing operation");

    match operation.selection_set.items.first() {
        Some(crate::ast::Selection::Field(field)) => field.arguments[0].value.clone(),
        _ => panic!("expected a field"),
    }
}
