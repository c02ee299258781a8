use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};

use super::{CoercedValue, VariableValue, Variables};
use crate::ast::{OperationDefinition, Type, VariableDefinition};
use crate::schema::{Schema, SchemaRepository};
use crate::types::{GraphQLType, HostType, InputObjectType, ListType, NonNullType};
use crate::ResolutionError;

/// Resolves the variables of one operation against their declarations.
///
/// Supplied values are coerced to the declared type; an absent variable takes
/// its declared default, or null when its type is nullable.
pub struct VariableResolver<'a> {
    schema: &'a Schema,
    variables: &'a Variables,
    definitions: &'a [VariableDefinition],
}

impl<'a> VariableResolver<'a> {
    pub fn bind(
        variables: &'a Variables,
        definitions: &'a [VariableDefinition],
        schema: &'a Schema,
    ) -> Self {
        VariableResolver {
            schema,
            variables,
            definitions,
        }
    }

    pub fn for_operation(
        variables: &'a Variables,
        operation: &'a OperationDefinition,
        schema: &'a Schema,
    ) -> Self {
        VariableResolver::bind(variables, &operation.variable_definitions, schema)
    }

    pub fn definition(&self, name: &str) -> Option<&'a VariableDefinition> {
        self.definitions.iter().find(|definition| definition.name == name)
    }

    /// Names of supplied variables that the operation does not declare.
    pub fn unused_variables(&self) -> IndexSet<&'a str> {
        self.variables
            .keys()
            .filter(|name| self.definition(name).is_none())
            .map(String::as_str)
            .collect()
    }

    pub fn resolve(&self, name: &str) -> Result<CoercedValue, ResolutionError> {
        let definition = self
            .definition(name)
            .ok_or_else(|| ResolutionError::UndeclaredVariable(name.to_string()))?;
        let declared_type = self.declared_type(&definition.var_type)?;

        debug!(variable = name, declared_type = %declared_type, "resolving variable");

        match (self.variables.get(name), &definition.default_value) {
            (Some(raw), _) => self.coerce(raw, &declared_type, 0),
            (None, Some(default_value)) => {
                declared_type.get_from_ast(default_value, &SchemaRepository::new(self.schema))
            }
            (None, None) if declared_type.is_non_null() => Err(ResolutionError::MissingVariable {
                name: name.to_string(),
                type_name: declared_type.to_string(),
            }),
            (None, None) => Ok(CoercedValue::Null),
        }
    }

    /// Resolves every declared variable, in declaration order.
    pub fn resolve_all(&self) -> Result<IndexMap<String, CoercedValue>, ResolutionError> {
        self.definitions
            .iter()
            .map(|definition| Ok((definition.name.clone(), self.resolve(&definition.name)?)))
            .collect()
    }

    /// Coerces a raw value to the schema type registered for a Rust type.
    pub fn resolve_by_host_type(
        &self,
        raw: &VariableValue,
        host_type: HostType,
    ) -> Result<CoercedValue, ResolutionError> {
        let t = self
            .schema
            .resolve_input_type_for_host_type(host_type)
            .ok_or_else(|| ResolutionError::UnknownHostType(host_type.name().to_string()))?;

        self.coerce(raw, &t, 0)
    }

    fn declared_type(&self, t: &Type) -> Result<Arc<GraphQLType>, ResolutionError> {
        match t {
            Type::NamedType(name) => self
                .schema
                .resolve_input_type_by_name(name)
                .ok_or_else(|| ResolutionError::UnknownType(name.clone())),
            Type::ListType(of_type) => Ok(Arc::new(GraphQLType::List(ListType::new(
                self.declared_type(of_type)?,
            )))),
            Type::NonNullType(of_type) => NonNullType::new(self.declared_type(of_type)?)
                .map(|non_null| Arc::new(GraphQLType::NonNull(non_null)))
                .map_err(|_| ResolutionError::UnknownType(t.to_string())),
        }
    }

    fn coerce(
        &self,
        raw: &VariableValue,
        t: &GraphQLType,
        depth: usize,
    ) -> Result<CoercedValue, ResolutionError> {
        let max_depth = self.schema.limits().max_depth;
        if depth > max_depth {
            return Err(ResolutionError::DepthLimitExceeded(max_depth));
        }

        match t {
            GraphQLType::NonNull(non_null) => match raw {
                VariableValue::Null => Err(ResolutionError::NullValue {
                    type_name: t.to_string(),
                }),
                _ => self.coerce(raw, non_null.of_type(), depth),
            },
            _ if raw.is_null() => Ok(CoercedValue::Null),
            GraphQLType::List(list) => match raw {
                VariableValue::List(items) => items
                    .iter()
                    .map(|item| self.coerce(item, list.of_type(), depth + 1))
                    .collect::<Result<Vec<_>, _>>()
                    .map(CoercedValue::List),
                single => Ok(CoercedValue::List(vec![self.coerce(
                    single,
                    list.of_type(),
                    depth + 1,
                )?])),
            },
            GraphQLType::InputObject(input_object) => match raw {
                VariableValue::Object(fields) => self.create_object(input_object, fields, depth + 1),
                other => Err(ResolutionError::not_representable(input_object.name(), other)),
            },
            GraphQLType::Scalar(scalar) => scalar.parse_value(raw),
            GraphQLType::Enum(enum_type) => enum_type.parse_value(raw),
            GraphQLType::Object(object) => {
                Err(ResolutionError::not_representable(object.name(), raw))
            }
        }
    }

    /// Builds a host record from a map of raw field values, each coerced to
    /// the field's declared schema type.
    fn create_object(
        &self,
        input_object: &InputObjectType,
        fields: &IndexMap<String, VariableValue>,
        depth: usize,
    ) -> Result<CoercedValue, ResolutionError> {
        let max_depth = self.schema.limits().max_depth;
        if depth > max_depth {
            return Err(ResolutionError::DepthLimitExceeded(max_depth));
        }

        let mut host = input_object.construct();

        for field in input_object.fields() {
            let Some(raw) = fields.get(field.name()) else {
                continue;
            };

            let field_type = self
                .schema
                .resolve_input_type(field.value_type())
                .ok_or_else(|| ResolutionError::UnknownType(field.value_type().to_string()))?;
            let value = self.coerce(raw, &field_type, depth)?;

            trace!(object = input_object.name(), field = field.name(), "assigning field");
            field.assign(host.as_mut(), value)?;
        }

        Ok(input_object.finish(host))
    }
}

#[cfg(test)]
use pretty_assertions::assert_eq;
#[cfg(test)]
use crate::ast::parse_query;
#[cfg(test)]
use crate::execution::{variables_from_json, Host};
#[cfg(test)]
use crate::schema::SchemaBuilder;
#[cfg(test)]
use crate::types::{EnumType, FieldDescriptor, ObjectType};

#[cfg(test)]
#[derive(Debug, Clone, Default, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

#[cfg(test)]
#[derive(Debug, Clone, Default, PartialEq)]
struct Segment {
    from: Point,
    to: Point,
    label: Option<String>,
}

#[cfg(test)]
#[derive(Debug, Clone, Default, PartialEq)]
struct Lookup {
    id: String,
    color: String,
    count: i32,
}

#[cfg(test)]
fn schema() -> Schema {
    let mut builder = SchemaBuilder::new();
    builder
        .add_type(
            InputObjectType::typed::<Point>("Point")
                .field("x", Type::named("Int"), |p: &mut Point, x: i32| p.x = x)
                .field("y", Type::named("Int"), |p: &mut Point, y: i32| p.y = y),
        )
        .expect("valid type");
    builder
        .add_type(
            InputObjectType::typed::<Segment>("Segment")
                .field(
                    "from",
                    Type::named("Point"),
                    |s: &mut Segment, Host(p): Host<Point>| s.from = p,
                )
                .field(
                    "to",
                    Type::named("Point"),
                    |s: &mut Segment, Host(p): Host<Point>| s.to = p,
                )
                .field(
                    "label",
                    Type::named("String"),
                    |s: &mut Segment, label: Option<String>| s.label = label,
                ),
        )
        .expect("valid type");
    builder
        .add_type(EnumType::new("Color").value("RED", None).value("GREEN", None))
        .expect("valid type");
    builder
        .add_type(
            InputObjectType::typed::<Lookup>("Lookup")
                .field("id", Type::named("ID"), |l: &mut Lookup, id: String| l.id = id)
                .field("color", Type::named("Color"), |l: &mut Lookup, color: String| {
                    l.color = color
                })
                .field(
                    "count",
                    Type::non_null(Type::named("Int")),
                    |l: &mut Lookup, count: i32| l.count = count,
                ),
        )
        .expect("valid type");
    builder
        .add_type(
            ObjectType::new("Query").field(FieldDescriptor::new("ok", Type::named("Boolean"))),
        )
        .expect("valid type");
    builder.build().expect("valid schema")
}

#[cfg(test)]
fn definitions(query: &str) -> Vec<VariableDefinition> {
    parse_query(query)
        .expect("failed to parse")
        .operation(None)
        .map(|operation| operation.variable_definitions.clone())
        .unwrap_or_default()
}

#[test]
fn list_variables_keep_order() {
    let schema = schema();
    let variables = variables_from_json(r#"{"ids": [1, 2, 3]}"#).expect("valid json");
    let definitions = definitions("query($ids: [Int]) { ok }");
    let resolver = VariableResolver::bind(&variables, &definitions, &schema);

    assert_eq!(
        resolver.resolve("ids"),
        Ok(CoercedValue::List(vec![
            CoercedValue::Int(1),
            CoercedValue::Int(2),
            CoercedValue::Int(3)
        ]))
    );
}

#[test]
fn single_values_are_wrapped_for_list_variables() {
    let schema = schema();
    let variables = variables_from_json(r#"{"ids": 4}"#).expect("valid json");
    let definitions = definitions("query($ids: [Int!]!) { ok }");
    let resolver = VariableResolver::bind(&variables, &definitions, &schema);

    assert_eq!(
        resolver.resolve("ids"),
        Ok(CoercedValue::List(vec![CoercedValue::Int(4)]))
    );
}

#[test]
fn undeclared_variables_are_rejected() {
    let schema = schema();
    let variables = variables_from_json(r#"{"x": 1}"#).expect("valid json");
    let definitions = definitions("query($x: Int) { ok }");
    let resolver = VariableResolver::bind(&variables, &definitions, &schema);

    assert_eq!(
        resolver.resolve("y"),
        Err(ResolutionError::UndeclaredVariable("y".to_string()))
    );
}

#[test]
fn typed_input_objects_are_built_from_maps() {
    let schema = schema();
    let variables = variables_from_json(
        r#"{"p": {"x": 1, "y": 2}, "s": {"to": {"y": 5}, "from": {"x": 3}, "label": "a"}}"#,
    )
    .expect("valid json");
    let definitions = definitions("query($p: Point, $s: Segment!) { ok }");
    let resolver = VariableResolver::bind(&variables, &definitions, &schema);

    let point = resolver.resolve("p").expect("failed to resolve $p");
    assert_eq!(point.into_host::<Point>(), Ok(Point { x: 1, y: 2 }));

    let segment = resolver.resolve("s").expect("failed to resolve $s");
    assert_eq!(
        segment.into_host::<Segment>(),
        Ok(Segment {
            from: Point { x: 3, y: 0 },
            to: Point { x: 0, y: 5 },
            label: Some("a".to_string()),
        })
    );
}

#[test]
fn variables_inside_literals_resolve_end_to_end() {
    let schema = schema();
    let variables = variables_from_json(r#"{"x": 1, "y": 2}"#).expect("valid json");
    let document =
        parse_query("query($x: Int, $y: Int) { ok(p: { x: $x, y: $y }) }").expect("failed to parse");
    let operation = document.operation(None).expect("missing operation");
    let resolver = VariableResolver::for_operation(&variables, operation, &schema);
    let repository = SchemaRepository::new(&schema).with_variable_resolver(&resolver);

    let crate::ast::Selection::Field(field) = &operation.selection_set.items[0] else {
        panic!("expected a field");
    };
    let point_type = schema
        .resolve_input_type_by_name("Point")
        .expect("Point is registered");

    let point = point_type
        .get_from_ast(&field.arguments[0].value, &repository)
        .expect("failed to coerce");

    assert_eq!(point.into_host::<Point>(), Ok(Point { x: 1, y: 2 }));
}

#[test]
fn typed_fields_use_their_declared_types() {
    let schema = schema();
    let definitions = definitions("query($l: Lookup) { ok }");
    let repository = SchemaRepository::new(&schema);
    let lookup_type = schema
        .resolve_input_type_by_name("Lookup")
        .expect("Lookup is registered");

    let variables =
        variables_from_json(r#"{"l": {"id": 42, "color": "RED", "count": 1}}"#).expect("valid json");
    let resolver = VariableResolver::bind(&variables, &definitions, &schema);
    let expected = Lookup {
        id: "42".to_string(),
        color: "RED".to_string(),
        count: 1,
    };
    assert_eq!(
        resolver.resolve("l").and_then(|l| l.into_host::<Lookup>()),
        Ok(expected.clone())
    );

    let literal = parse_value_literal("{ id: 42, color: RED, count: 1 }");
    assert_eq!(
        lookup_type
            .get_from_ast(&literal, &repository)
            .and_then(|l| l.into_host::<Lookup>()),
        Ok(expected)
    );
}

#[test]
fn typed_fields_reject_values_outside_their_declared_types() {
    let schema = schema();
    let definitions = definitions("query($l: Lookup) { ok }");

    let variables = variables_from_json(r#"{"l": {"color": "PURPLE"}}"#).expect("valid json");
    let resolver = VariableResolver::bind(&variables, &definitions, &schema);
    assert!(matches!(
        resolver.resolve("l"),
        Err(ResolutionError::NotRepresentable { type_name, .. }) if type_name == "Color"
    ));

    let variables = variables_from_json(r#"{"l": {"count": null}}"#).expect("valid json");
    let resolver = VariableResolver::bind(&variables, &definitions, &schema);
    assert_eq!(
        resolver.resolve("l"),
        Err(ResolutionError::NullValue {
            type_name: "Int!".to_string()
        })
    );
}

#[test]
fn variables_inside_list_literals_keep_their_position() {
    let schema = schema();
    let variables = variables_from_json(r#"{"a": 1, "b": 3}"#).expect("valid json");
    let document = parse_query("query($a: Int, $b: Int, $c: Int) { ok(ids: [$a, 2, $b], ns: [$c]) }")
        .expect("failed to parse");
    let operation = document.operation(None).expect("missing operation");
    let resolver = VariableResolver::for_operation(&variables, operation, &schema);
    let repository = SchemaRepository::new(&schema).with_variable_resolver(&resolver);

    let crate::ast::Selection::Field(field) = &operation.selection_set.items[0] else {
        panic!("expected a field");
    };
    let int = schema.resolve_input_type_by_name("Int").expect("Int is builtin");
    let ints = GraphQLType::List(ListType::new(int.clone()));
    let non_null_ints = GraphQLType::List(ListType::new(GraphQLType::NonNull(
        NonNullType::new(int).expect("Int is nullable"),
    )));

    assert_eq!(
        ints.get_from_ast(&field.arguments[0].value, &repository),
        Ok(CoercedValue::List(vec![
            CoercedValue::Int(1),
            CoercedValue::Int(2),
            CoercedValue::Int(3)
        ]))
    );
    assert_eq!(
        ints.get_from_ast(&field.arguments[1].value, &repository),
        Ok(CoercedValue::List(vec![CoercedValue::Null]))
    );
    assert_eq!(
        non_null_ints.get_from_ast(&field.arguments[1].value, &repository),
        Err(ResolutionError::NullValue {
            type_name: "Int!".to_string()
        })
    );
}

#[test]
fn absent_variables_follow_declaration() {
    let schema = schema();
    let variables = Variables::new();
    let definitions =
        definitions("query($a: Int, $b: Int = 3, $c: Int!, $d: Point = { x: 9 }) { ok }");
    let resolver = VariableResolver::bind(&variables, &definitions, &schema);

    assert_eq!(resolver.resolve("a"), Ok(CoercedValue::Null));
    assert_eq!(resolver.resolve("b"), Ok(CoercedValue::Int(3)));
    assert_eq!(
        resolver.resolve("c"),
        Err(ResolutionError::MissingVariable {
            name: "c".to_string(),
            type_name: "Int!".to_string()
        })
    );
    assert_eq!(
        resolver
            .resolve("d")
            .and_then(|point| point.into_host::<Point>()),
        Ok(Point { x: 9, y: 0 })
    );
    assert!(resolver.resolve_all().is_err());
}

#[test]
fn null_is_rejected_for_non_null_variables() {
    let schema = schema();
    let variables = variables_from_json(r#"{"c": null, "ids": [1, null]}"#).expect("valid json");
    let definitions = definitions("query($c: Int!, $ids: [Int!]) { ok }");
    let resolver = VariableResolver::bind(&variables, &definitions, &schema);

    assert_eq!(
        resolver.resolve("c"),
        Err(ResolutionError::NullValue {
            type_name: "Int!".to_string()
        })
    );
    assert!(matches!(
        resolver.resolve("ids"),
        Err(ResolutionError::NullValue { .. })
    ));
}

#[test]
fn host_types_select_the_schema_type() {
    let schema = schema();
    let variables = Variables::new();
    let resolver = VariableResolver::bind(&variables, &[], &schema);

    let raw = VariableValue::from(serde_json::json!({"x": 7}));
    assert_eq!(
        resolver
            .resolve_by_host_type(&raw, HostType::of::<Point>())
            .and_then(|point| point.into_host::<Point>()),
        Ok(Point { x: 7, y: 0 })
    );
    assert_eq!(
        resolver.resolve_by_host_type(&VariableValue::Int(3), HostType::of::<f64>()),
        Ok(CoercedValue::Float(3.0))
    );
    assert!(matches!(
        resolver.resolve_by_host_type(&raw, HostType::of::<u8>()),
        Err(ResolutionError::UnknownHostType(_))
    ));
}

#[test]
fn unknown_variable_types_and_unused_variables() {
    let schema = schema();
    let variables = variables_from_json(r#"{"a": 1, "extra": true}"#).expect("valid json");
    let definitions = definitions("query($a: Missing) { ok }");
    let resolver = VariableResolver::bind(&variables, &definitions, &schema);

    assert_eq!(
        resolver.resolve("a"),
        Err(ResolutionError::UnknownType("Missing".to_string()))
    );
    assert_eq!(
        resolver.unused_variables().into_iter().collect::<Vec<_>>(),
        vec!["extra"]
    );
}

#[test]
fn deep_values_hit_the_depth_limit() {
    let mut builder = SchemaBuilder::new();
    builder
        .add_type(
            ObjectType::new("Query").field(FieldDescriptor::new("ok", Type::named("Boolean"))),
        )
        .expect("valid type");
    builder.set_limits(crate::schema::Limits { max_depth: 3 });
    let schema = builder.build().expect("valid schema");

    let variables =
        variables_from_json(r#"{"deep": [[[[[1]]]]]}"#).expect("valid json");
    let definitions = definitions("query($deep: [[[[[Int]]]]]) { ok }");
    let resolver = VariableResolver::bind(&variables, &definitions, &schema);

    assert_eq!(
        resolver.resolve("deep"),
        Err(ResolutionError::DepthLimitExceeded(3))
    );
}

#[cfg(test)]
fn parse_value_literal(literal: &str) -> crate::ast::Value {
    let document = parse_query(&format!("{{ ok(v: {}) }}", literal)).expect("failed to parse");
    let operation = document.operation(None).expect("missing operation");
    let crate::ast::Selection::Field(field) = &operation.selection_set.items[0] else {
        panic!("expected a field");
    };
    field.arguments[0].value.clone()
}
