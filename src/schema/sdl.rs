use std::collections::HashMap;

use graphql_parser::schema as sdl;
use lazy_static::lazy_static;
use tracing::debug;

use super::{DirectiveDescriptor, Schema, SchemaBuilder};
use crate::ast::{convert_type, convert_value};
use crate::introspection::DirectiveLocation;
use crate::types::{
    ArgumentDescriptor, EnumType, FieldDescriptor, GraphQLType, InputObjectType, ObjectType,
    ScalarType,
};
use crate::SchemaError;

lazy_static! {
    static ref DEFAULT_SCHEMA_DEFINITION: sdl::SchemaDefinition<'static, String> =
        sdl::SchemaDefinition {
            position: graphql_parser::Pos { line: 0, column: 0 },
            directives: vec![],
            query: Some("Query".to_string()),
            mutation: Some("Mutation".to_string()),
            subscription: Some("Subscription".to_string()),
        };
}

const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

impl Schema {
    /// Builds a schema from a type system document.
    ///
    /// Input objects are dynamic. Without a `schema` definition the roots are
    /// the types named `Query`, `Mutation` and `Subscription`, where present.
    pub fn from_sdl(source: &str) -> Result<Schema, SchemaError> {
        let document = graphql_parser::parse_schema::<String>(source)
            .map_err(|err| SchemaError::Sdl(err.to_string()))?;

        let mut builder = SchemaBuilder::new();
        let mut possible_types: HashMap<&str, Vec<&str>> = HashMap::new();

        for definition in &document.definitions {
            if let sdl::Definition::TypeDefinition(sdl::TypeDefinition::Object(object)) = definition
            {
                for interface in &object.implements_interfaces {
                    possible_types
                        .entry(interface.as_str())
                        .or_default()
                        .push(object.name.as_str());
                }
            }
        }

        let mut schema_definition = None;

        for definition in &document.definitions {
            match definition {
                sdl::Definition::SchemaDefinition(definition) => {
                    schema_definition = Some(definition)
                }
                sdl::Definition::TypeDefinition(type_definition) => {
                    if let Some(t) = convert_type_definition(type_definition, &possible_types) {
                        builder.add_type(t)?;
                    }
                }
                // @skip and @include are always present
                sdl::Definition::DirectiveDefinition(directive)
                    if matches!(directive.name.as_str(), "skip" | "include") => {}
                sdl::Definition::DirectiveDefinition(directive) => {
                    builder.add_directive(convert_directive(directive))?;
                }
                sdl::Definition::TypeExtension(_) => {}
            }
        }

        // An explicit schema definition names its roots; otherwise the
        // conventional names apply only to types that exist.
        let (query, mutation, subscription) = match schema_definition {
            Some(definition) => (
                definition.query.as_deref(),
                definition.mutation.as_deref(),
                definition.subscription.as_deref(),
            ),
            None => (
                DEFAULT_SCHEMA_DEFINITION.query.as_deref(),
                DEFAULT_SCHEMA_DEFINITION
                    .mutation
                    .as_deref()
                    .filter(|name| builder.has_type(name)),
                DEFAULT_SCHEMA_DEFINITION
                    .subscription
                    .as_deref()
                    .filter(|name| builder.has_type(name)),
            ),
        };

        if let Some(query) = query {
            builder.set_query_type(query);
        }
        if let Some(mutation) = mutation {
            builder.set_mutation_type(mutation);
        }
        if let Some(subscription) = subscription {
            builder.set_subscription_type(subscription);
        }

        debug!(definitions = document.definitions.len(), "loaded schema document");

        builder.build()
    }
}

fn convert_type_definition(
    definition: &sdl::TypeDefinition<'_, String>,
    possible_types: &HashMap<&str, Vec<&str>>,
) -> Option<GraphQLType> {
    let t: GraphQLType = match definition {
        sdl::TypeDefinition::Scalar(scalar) => {
            if BUILTIN_SCALARS.contains(&scalar.name.as_str()) {
                return None;
            }
            let mut t = ScalarType::custom(&scalar.name);
            if let Some(description) = &scalar.description {
                t = t.with_description(description);
            }
            t.into()
        }
        sdl::TypeDefinition::Enum(enum_type) => {
            let mut t = EnumType::new(&enum_type.name);
            if let Some(description) = &enum_type.description {
                t = t.with_description(description);
            }
            for value in &enum_type.values {
                t = t.value(&value.name, value.description.clone());
            }
            t.into()
        }
        sdl::TypeDefinition::Object(object) => {
            let mut t = with_fields(ObjectType::new(&object.name), &object.fields);
            for interface in &object.implements_interfaces {
                t = t.implements(interface);
            }
            with_description(t, &object.description).into()
        }
        sdl::TypeDefinition::Interface(interface) => {
            let mut t = with_fields(ObjectType::interface(&interface.name), &interface.fields);
            for name in possible_types.get(interface.name.as_str()).into_iter().flatten() {
                t = t.possible_type(*name);
            }
            with_description(t, &interface.description).into()
        }
        sdl::TypeDefinition::Union(union_type) => {
            let mut t = ObjectType::union(&union_type.name);
            for name in &union_type.types {
                t = t.possible_type(name);
            }
            with_description(t, &union_type.description).into()
        }
        sdl::TypeDefinition::InputObject(input_object) => {
            let mut t = InputObjectType::dynamic(&input_object.name);
            for field in &input_object.fields {
                t = t.dynamic_field(&field.name, convert_type(&field.value_type));
                if let Some(description) = &field.description {
                    t = t.field_description(&field.name, description);
                }
                if let Some(default_value) = &field.default_value {
                    t = t.default_value(&field.name, convert_value(default_value));
                }
            }
            if let Some(description) = &input_object.description {
                t = t.description(description);
            }
            t.into()
        }
    };

    Some(t)
}

fn with_fields(mut t: ObjectType, fields: &[sdl::Field<'_, String>]) -> ObjectType {
    for field in fields {
        let mut descriptor = FieldDescriptor::new(&field.name, convert_type(&field.field_type));
        if let Some(description) = &field.description {
            descriptor = descriptor.with_description(description);
        }
        for argument in &field.arguments {
            descriptor = descriptor.argument(convert_input_value(argument));
        }
        t = t.field(descriptor);
    }
    t
}

fn with_description(t: ObjectType, description: &Option<String>) -> ObjectType {
    match description {
        Some(description) => t.with_description(description),
        None => t,
    }
}

fn convert_input_value(value: &sdl::InputValue<'_, String>) -> ArgumentDescriptor {
    let mut argument = ArgumentDescriptor::new(&value.name, convert_type(&value.value_type));
    if let Some(default_value) = &value.default_value {
        argument = argument.with_default(convert_value(default_value));
    }
    if let Some(description) = &value.description {
        argument = argument.with_description(description);
    }
    argument
}

fn convert_directive(directive: &sdl::DirectiveDefinition<'_, String>) -> DirectiveDescriptor {
    let locations = directive
        .locations
        .iter()
        .filter_map(|location| DirectiveLocation::from_name(location.as_str()))
        .collect();

    let mut descriptor = DirectiveDescriptor::new(&directive.name, locations);
    if let Some(description) = &directive.description {
        descriptor = descriptor.with_description(description);
    }
    if directive.repeatable {
        descriptor = descriptor.repeatable();
    }
    for argument in &directive.arguments {
        descriptor = descriptor.argument(convert_input_value(argument));
    }
    descriptor
}

#[cfg(test)]
use pretty_assertions::assert_eq;
#[cfg(test)]
use crate::introspection::TypeKind;
#[cfg(test)]
use crate::types::CompositeKind;

#[test]
fn loads_types_roots_and_directives() {
    let schema = Schema::from_sdl(
        "
        \"\"\"A date in ISO 8601 form\"\"\"
        scalar Date

        enum Color { RED GREEN }

        interface Named { name: String }

        type Dog implements Named { name: String, born: Date, color: Color }
        type Cat implements Named { name: String }

        union Pet = Dog | Cat

        input Filter { name: String, limit: Int = 10 }

        type Query {
          pets(filter: Filter): [Pet]
          named: Named
        }

        type Mutation { adopt(name: String!): Pet }

        directive @cached(ttl: Int) on FIELD | QUERY
        ",
    )
    .expect("failed to load schema");

    assert_eq!(schema.query_type().to_string(), "Query");
    assert_eq!(
        schema.mutation_type().map(|t| t.to_string()),
        Some("Mutation".to_string())
    );
    assert!(schema.subscription_type().is_none());

    let date = schema
        .resolve_output_type_by_name("Date")
        .expect("Date is loaded");
    assert!(date.is_leaf_type());
    assert_eq!(date.description(), Some("A date in ISO 8601 form"));

    let Some(GraphQLType::Object(named)) =
        schema.resolve_output_type_by_name("Named").as_deref().cloned()
    else {
        panic!("Named is an interface");
    };
    assert_eq!(named.composite_kind(), CompositeKind::Interface);
    assert_eq!(named.possible_types(), &["Dog".to_string(), "Cat".to_string()]);

    let pet = schema.introspect_type("Pet").expect("Pet is loaded");
    assert_eq!(pet.kind, TypeKind::UNION);
    assert_eq!(pet.possible_types.map(|types| types.len()), Some(2));

    let filter = schema.introspect_type("Filter").expect("Filter is loaded");
    let fields = filter.input_fields.expect("input fields");
    assert_eq!(fields[1].default_value.as_deref(), Some("10"));

    let cached = schema.resolve_directive("cached").expect("directive is loaded");
    assert_eq!(
        cached.locations,
        vec![DirectiveLocation::FIELD, DirectiveLocation::QUERY]
    );
}

#[test]
fn explicit_schema_definition_names_the_roots() {
    let schema = Schema::from_sdl(
        "
        schema { query: QueryRoot subscription: Events }
        type QueryRoot { ok: Boolean }
        type Events { tick: Int }
        type Mutation { ignored: Int }
        ",
    )
    .expect("failed to load schema");

    assert_eq!(schema.query_type().to_string(), "QueryRoot");
    assert!(schema.mutation_type().is_none());
    assert_eq!(
        schema.subscription_type().map(|t| t.to_string()),
        Some("Events".to_string())
    );
}

#[test]
fn invalid_documents_are_rejected() {
    assert!(matches!(
        Schema::from_sdl("type Query {"),
        Err(SchemaError::Sdl(_))
    ));
    assert_eq!(
        Schema::from_sdl("type Query { a: Missing }").err(),
        Some(SchemaError::UnknownType {
            type_name: "Missing".to_string(),
            referenced_by: "Query.a".to_string()
        })
    );
    assert_eq!(
        Schema::from_sdl("type Other { a: Int }").err(),
        Some(SchemaError::MissingQueryRoot("Query".to_string()))
    );
}
