//! Conversion from `graphql_parser` documents into the crate's own AST.
//!
//! Character-level lexing and the grammar live in `graphql_parser`; this module
//! only reshapes its output so that optional parts (leaf selection sets,
//! missing type conditions) are explicit.

use graphql_parser::query as parser;
pub use graphql_parser::query::ParseError;

use super::nodes::*;

/// Parses an executable document.
pub fn parse_query(source: &str) -> Result<Document, ParseError> {
    let document = graphql_parser::parse_query::<String>(source)?;

    Ok(Document::from(&document))
}

impl<'a> From<&parser::Document<'a, String>> for Document {
    fn from(document: &parser::Document<'a, String>) -> Self {
        Document {
            definitions: document
                .definitions
                .iter()
                .map(|definition| match definition {
                    parser::Definition::Operation(operation) => {
                        Definition::Operation(convert_operation(operation))
                    }
                    parser::Definition::Fragment(fragment) => {
                        Definition::Fragment(convert_fragment(fragment))
                    }
                })
                .collect(),
        }
    }
}

fn convert_operation(operation: &parser::OperationDefinition<'_, String>) -> OperationDefinition {
    match operation {
        parser::OperationDefinition::SelectionSet(selection_set) => OperationDefinition {
            position: selection_set.span.0.into(),
            operation_type: OperationType::Query,
            name: None,
            variable_definitions: vec![],
            directives: vec![],
            selection_set: convert_selection_set(selection_set),
        },
        parser::OperationDefinition::Query(query) => OperationDefinition {
            position: query.position.into(),
            operation_type: OperationType::Query,
            name: query.name.clone(),
            variable_definitions: convert_variable_definitions(&query.variable_definitions),
            directives: convert_directives(&query.directives),
            selection_set: convert_selection_set(&query.selection_set),
        },
        parser::OperationDefinition::Mutation(mutation) => OperationDefinition {
            position: mutation.position.into(),
            operation_type: OperationType::Mutation,
            name: mutation.name.clone(),
            variable_definitions: convert_variable_definitions(&mutation.variable_definitions),
            directives: convert_directives(&mutation.directives),
            selection_set: convert_selection_set(&mutation.selection_set),
        },
        parser::OperationDefinition::Subscription(subscription) => OperationDefinition {
            position: subscription.position.into(),
            operation_type: OperationType::Subscription,
            name: subscription.name.clone(),
            variable_definitions: convert_variable_definitions(
                &subscription.variable_definitions,
            ),
            directives: convert_directives(&subscription.directives),
            selection_set: convert_selection_set(&subscription.selection_set),
        },
    }
}

fn convert_fragment(fragment: &parser::FragmentDefinition<'_, String>) -> FragmentDefinition {
    let parser::TypeCondition::On(type_condition) = &fragment.type_condition;

    FragmentDefinition {
        position: fragment.position.into(),
        name: fragment.name.clone(),
        type_condition: type_condition.clone(),
        directives: convert_directives(&fragment.directives),
        selection_set: convert_selection_set(&fragment.selection_set),
    }
}

fn convert_variable_definitions(
    definitions: &[parser::VariableDefinition<'_, String>],
) -> Vec<VariableDefinition> {
    definitions
        .iter()
        .map(|definition| VariableDefinition {
            position: definition.position.into(),
            name: definition.name.clone(),
            var_type: convert_type(&definition.var_type),
            default_value: definition.default_value.as_ref().map(convert_value),
        })
        .collect()
}

fn convert_selection_set(selection_set: &parser::SelectionSet<'_, String>) -> SelectionSet {
    SelectionSet {
        position: selection_set.span.0.into(),
        items: selection_set
            .items
            .iter()
            .map(convert_selection)
            .collect(),
    }
}

fn convert_selection(selection: &parser::Selection<'_, String>) -> Selection {
    match selection {
        parser::Selection::Field(field) => Selection::Field(Field {
            position: field.position.into(),
            alias: field.alias.clone(),
            name: field.name.clone(),
            arguments: convert_arguments(&field.arguments),
            directives: convert_directives(&field.directives),
            selection_set: match field.selection_set.items.is_empty() {
                true => None,
                false => Some(convert_selection_set(&field.selection_set)),
            },
        }),
        parser::Selection::FragmentSpread(spread) => Selection::FragmentSpread(FragmentSpread {
            position: spread.position.into(),
            fragment_name: spread.fragment_name.clone(),
            directives: convert_directives(&spread.directives),
        }),
        parser::Selection::InlineFragment(inline) => Selection::InlineFragment(InlineFragment {
            position: inline.position.into(),
            type_condition: inline
                .type_condition
                .as_ref()
                .map(|parser::TypeCondition::On(name)| name.clone()),
            directives: convert_directives(&inline.directives),
            selection_set: convert_selection_set(&inline.selection_set),
        }),
    }
}

fn convert_directives(directives: &[parser::Directive<'_, String>]) -> Vec<Directive> {
    directives
        .iter()
        .map(|directive| Directive {
            position: directive.position.into(),
            name: directive.name.clone(),
            arguments: convert_arguments(&directive.arguments),
        })
        .collect()
}

fn convert_arguments(arguments: &[(String, parser::Value<'_, String>)]) -> Vec<Argument> {
    arguments
        .iter()
        .map(|(name, value)| Argument {
            name: name.clone(),
            value: convert_value(value),
        })
        .collect()
}

/// Converts a type expression. Schema documents share this representation.
pub fn convert_type(t: &parser::Type<'_, String>) -> Type {
    match t {
        parser::Type::NamedType(name) => Type::NamedType(name.clone()),
        parser::Type::ListType(inner) => Type::ListType(Box::new(convert_type(inner))),
        parser::Type::NonNullType(inner) => Type::NonNullType(Box::new(convert_type(inner))),
    }
}

/// Converts a value literal. Schema documents share this representation.
pub fn convert_value(value: &parser::Value<'_, String>) -> Value {
    match value {
        parser::Value::Variable(name) => Value::Variable(name.clone()),
        // graphql_parser rejects integer literals outside i64 while parsing,
        // so as_i64 always holds a value here
        parser::Value::Int(number) => Value::Int(number.as_i64().unwrap_or_default()),
        parser::Value::Float(v) => Value::Float(*v),
        parser::Value::String(v) => Value::String(v.clone()),
        parser::Value::Boolean(v) => Value::Boolean(*v),
        parser::Value::Null => Value::Null,
        parser::Value::Enum(v) => Value::Enum(v.clone()),
        parser::Value::List(items) => Value::List(items.iter().map(convert_value).collect()),
        parser::Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(name, value)| (name.clone(), convert_value(value)))
                .collect(),
        ),
    }
}

#[test]
fn converts_leaf_and_composite_selections() {
    let document = parse_query(
        "query Q($id: ID!, $tags: [String] = [\"a\"]) {
          user(id: $id) {
            name
            ... on User { age }
            ... @include(if: true) { age }
          }
        }",
    )
    .expect("failed to parse");

    let operation = document.operation(None).expect("missing operation");
    assert_eq!(operation.operation_type, OperationType::Query);
    assert_eq!(operation.name.as_deref(), Some("Q"));
    assert_eq!(
        operation.variable_definitions[0].var_type,
        Type::non_null(Type::named("ID"))
    );
    assert_eq!(
        operation.variable_definitions[1].default_value,
        Some(Value::List(vec![Value::String("a".to_string())]))
    );

    let Selection::Field(user) = &operation.selection_set.items[0] else {
        panic!("expected a field");
    };
    assert_eq!(user.arguments[0].value, Value::Variable("id".to_string()));

    let selections = user
        .selection_set
        .as_ref()
        .expect("user has a selection set")
        .selections()
        .collect::<Vec<_>>();
    assert_eq!(selections.len(), 3);

    let Selection::Field(name) = selections[0] else {
        panic!("expected a field");
    };
    assert_eq!(name.selection_set, None);

    let Selection::InlineFragment(with_condition) = selections[1] else {
        panic!("expected an inline fragment");
    };
    assert_eq!(with_condition.type_condition.as_deref(), Some("User"));

    let Selection::InlineFragment(without_condition) = selections[2] else {
        panic!("expected an inline fragment");
    };
    assert_eq!(without_condition.type_condition, None);
    assert_eq!(without_condition.directives[0].name, "include");
}

#[test]
fn converts_shorthand_query_and_fragments() {
    let document = parse_query(
        "{ dog { ...DogFields } }
        fragment DogFields on Dog { name }",
    )
    .expect("failed to parse");

    assert_eq!(document.operations().count(), 1);
    assert_eq!(
        document.operations().next().map(|o| o.operation_type),
        Some(OperationType::Query)
    );

    let fragment = document.fragments().next().expect("missing fragment");
    assert_eq!(fragment.name, "DogFields");
    assert_eq!(fragment.type_condition, "Dog");
    assert_eq!(fragment.kind(), AstNodeKind::FragmentDefinition);
}

#[test]
fn parse_errors_are_returned() {
    assert!(parse_query("query {").is_err());
}

#[test]
fn integer_literals_cover_i64() {
    let document = parse_query("{ a(n: 9223372036854775807) }").expect("failed to parse");
    let operation = document.operation(None).expect("missing operation");
    let Selection::Field(a) = &operation.selection_set.items[0] else {
        panic!("expected a field");
    };
    assert_eq!(a.arguments[0].value, Value::Int(i64::MAX));

    assert!(parse_query("{ a(n: 9223372036854775808) }").is_err());
}
