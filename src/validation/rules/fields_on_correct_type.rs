use super::ValidationRule;
use crate::ast::{visit_document, Field, OperationVisitor, OperationVisitorContext};
use crate::validation::utils::{
    NodeRef, ValidationError, ValidationErrorContext, ValidationErrorKind,
};
use crate::ResolutionError;

/// Fields on correct type
///
/// A GraphQL document is only valid if all fields selected are defined by the
/// parent type, or are an allowed meta field such as __typename.
///
/// See https://spec.graphql.org/draft/#sec-Field-Selections
pub struct FieldsOnCorrectType;

impl FieldsOnCorrectType {
    pub fn new() -> Self {
        FieldsOnCorrectType
    }
}

impl Default for FieldsOnCorrectType {
    fn default() -> Self {
        FieldsOnCorrectType::new()
    }
}

impl<'a> OperationVisitor<'a, ValidationErrorContext> for FieldsOnCorrectType {
    fn enter_field(
        &mut self,
        visitor_context: &mut OperationVisitorContext<'a>,
        user_context: &mut ValidationErrorContext,
        field: &'a Field,
    ) {
        if field.name == "__typename" || visitor_context.current_field().is_some() {
            return;
        }

        if let Some(parent_type) = visitor_context.parent_type() {
            let parent_type = visitor_context.underlying_type(parent_type);
            if parent_type.is_leaf_type() {
                return;
            }

            user_context.report_error(ValidationError {
                kind: ValidationErrorKind::UnknownField,
                message: format!(
                    "Cannot query field \"{}\" on type \"{}\".",
                    field.name, parent_type
                ),
                nodes: vec![NodeRef::new(field, field.position)],
            });
        }
    }
}

impl ValidationRule for FieldsOnCorrectType {
    fn error_code<'a>(&self) -> &'a str {
        "FieldsOnCorrectType"
    }

    fn validate<'a>(
        &self,
        ctx: &mut OperationVisitorContext<'a>,
        error_collector: &mut ValidationErrorContext,
    ) -> Result<(), ResolutionError> {
        visit_document(
            &mut FieldsOnCorrectType::new(),
            ctx.operation,
            ctx,
            error_collector,
        )
    }
}

#[test]
fn defined_and_meta_fields_are_valid() {
    use crate::validation::test_utils::*;

    let plan = create_plan_from_rule(Box::new(FieldsOnCorrectType::new()));
    let errors = test_operation_with_schema(
        "fragment onDog on Dog {
          __typename
          tn: __typename
          name
          otherName: name
          name: nickname
        }
        fragment onPet on Pet {
          __typename
          name
          ... on Dog { barkVolume }
          ... { name }
        }
        fragment onUnion on CatOrDog {
          __typename
          ... on Cat { meows }
        }",
        TEST_SCHEMA,
        &plan,
    );

    assert_eq!(get_messages(&errors).len(), 0);
}

#[test]
fn unknown_fields_on_objects() {
    use crate::validation::test_utils::*;

    let plan = create_plan_from_rule(Box::new(FieldsOnCorrectType::new()));
    let errors = test_operation_with_schema(
        "fragment onDog on Dog {
          meowVolume
          volume: mooVolume
          barkVolume: kawVolume
          unknown_field {
            deeper_unknown_field
          }
        }
        fragment onHuman on Human {
          pets {
            unknown_field
          }
        }",
        TEST_SCHEMA,
        &plan,
    );

    assert_eq!(
        get_messages(&errors),
        vec![
            "Cannot query field \"meowVolume\" on type \"Dog\".",
            "Cannot query field \"mooVolume\" on type \"Dog\".",
            "Cannot query field \"kawVolume\" on type \"Dog\".",
            "Cannot query field \"unknown_field\" on type \"Dog\".",
            "Cannot query field \"unknown_field\" on type \"Pet\"."
        ]
    );
}

#[test]
fn fields_of_implementors_are_unknown_on_abstract_types() {
    use crate::validation::test_utils::*;

    let plan = create_plan_from_rule(Box::new(FieldsOnCorrectType::new()));
    let errors = test_operation_with_schema(
        "fragment onPet on Pet {
          tailLength
          nickname
          ... on Dog {
            meowVolume
          }
        }
        fragment onUnion on CatOrDog {
          directField
          name
        }",
        TEST_SCHEMA,
        &plan,
    );

    assert_eq!(
        get_messages(&errors),
        vec![
            "Cannot query field \"tailLength\" on type \"Pet\".",
            "Cannot query field \"nickname\" on type \"Pet\".",
            "Cannot query field \"meowVolume\" on type \"Dog\".",
            "Cannot query field \"directField\" on type \"CatOrDog\".",
            "Cannot query field \"name\" on type \"CatOrDog\"."
        ]
    );
}

#[test]
fn unknown_type_conditions_are_skipped() {
    use crate::validation::test_utils::*;

    let plan = create_plan_from_rule(Box::new(FieldsOnCorrectType::new()));
    let errors = test_operation_with_schema(
        "fragment unknownSelection on UnknownType {
          unknownField
          ... on Cat {
            unknown_cat_field
          }
        }",
        TEST_SCHEMA,
        &plan,
    );

    assert_eq!(
        get_messages(&errors),
        vec!["Cannot query field \"unknown_cat_field\" on type \"Cat\"."]
    );
}

#[test]
fn reports_field_node_of_unknown_root_field() {
    use crate::ast::{AstNodeKind, Pos};
    use crate::validation::test_utils::*;

    let plan = create_plan_from_rule(Box::new(FieldsOnCorrectType::new()));
    let errors = test_operation_with_schema(
        "{
  human { name }
  alien
}",
        TEST_SCHEMA,
        &plan,
    );

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ValidationErrorKind::UnknownField);
    assert_eq!(
        errors[0].message,
        "Cannot query field \"alien\" on type \"QueryRoot\"."
    );
    assert_eq!(errors[0].nodes[0].kind, AstNodeKind::Field);
    assert_eq!(errors[0].locations(), vec![Pos { line: 3, column: 3 }]);
}

#[test]
fn meta_fields_on_query_root() {
    use crate::validation::test_utils::*;

    let plan = create_plan_from_rule(Box::new(FieldsOnCorrectType::new()));
    let errors = test_operation_with_schema(
        "{
          __typename
          __schema { queryType { name } }
          __type(name: \"Dog\") { name }
        }",
        TEST_SCHEMA,
        &plan,
    );

    assert_eq!(get_messages(&errors).len(), 0);
}
