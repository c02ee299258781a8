use super::ValidationRule;
use crate::ast::{visit_document, Field, OperationVisitor, OperationVisitorContext};
use crate::validation::utils::{
    NodeRef, ValidationError, ValidationErrorContext, ValidationErrorKind,
};
use crate::ResolutionError;

/// Leaf Field Selections
///
/// Field selections on scalars or enums are never allowed, because they are the leaf nodes of any GraphQL operation.
/// Fields of any other type must select subfields.
///
/// https://spec.graphql.org/draft/#sec-Leaf-Field-Selections
pub struct LeafFieldSelections;

impl LeafFieldSelections {
    pub fn new() -> Self {
        LeafFieldSelections
    }
}

impl Default for LeafFieldSelections {
    fn default() -> Self {
        LeafFieldSelections::new()
    }
}

impl<'a> OperationVisitor<'a, ValidationErrorContext> for LeafFieldSelections {
    fn leave_field(
        &mut self,
        visitor_context: &mut OperationVisitorContext<'a>,
        user_context: &mut ValidationErrorContext,
        field: &'a Field,
    ) {
        // unknown fields are reported elsewhere
        let Some(field_type) = visitor_context.current_type() else {
            return;
        };

        match (&field.selection_set, field_type.is_leaf_type()) {
            (Some(selection_set), true) if !selection_set.is_empty() => {
                user_context.report_error(ValidationError {
                    kind: ValidationErrorKind::LeafWithSubselection,
                    message: format!(
                        "Field \"{}\" must not have a selection since type \"{}\" has no subfields.",
                        field.name, field_type
                    ),
                    nodes: vec![NodeRef::new(selection_set, selection_set.position)],
                });
            }
            (None, false) => {
                user_context.report_error(ValidationError {
                    kind: ValidationErrorKind::CompositeRequiresSubselection,
                    message: format!(
                        "Field \"{}\" of type \"{}\" must have a selection of subfields. Did you mean \"{} {{ ... }}\"?",
                        field.name, field_type, field.name
                    ),
                    nodes: vec![NodeRef::new(field, field.position)],
                });
            }
            _ => {}
        }
    }
}

impl ValidationRule for LeafFieldSelections {
    fn error_code<'a>(&self) -> &'a str {
        "LeafFieldSelections"
    }

    fn validate<'a>(
        &self,
        ctx: &mut OperationVisitorContext<'a>,
        error_collector: &mut ValidationErrorContext,
    ) -> Result<(), ResolutionError> {
        visit_document(
            &mut LeafFieldSelections::new(),
            ctx.operation,
            ctx,
            error_collector,
        )
    }
}

#[test]
fn valid_scalar_selection() {
    use crate::validation::test_utils::*;

    let mut plan = create_plan_from_rule(Box::new(LeafFieldSelections {}));
    let errors = test_operation_with_schema(
        "fragment scalarSelection on Dog {
          barks
        }",
        TEST_SCHEMA,
        &mut plan,
    );

    assert_eq!(get_messages(&errors).len(), 0);
}

#[test]
fn object_type_missing_selection() {
    use crate::validation::test_utils::*;

    let mut plan = create_plan_from_rule(Box::new(LeafFieldSelections {}));
    let errors = test_operation_with_schema(
        "query directQueryOnObjectWithoutSubFields {
          human
        }",
        TEST_SCHEMA,
        &mut plan,
    );

    let messages = get_messages(&errors);
    assert_eq!(messages.len(), 1);
    assert_eq!(
        messages,
        vec!["Field \"human\" of type \"Human\" must have a selection of subfields. Did you mean \"human { ... }\"?"]
    );
}

#[test]
fn interface_type_missing_selection() {
    use crate::validation::test_utils::*;

    let mut plan = create_plan_from_rule(Box::new(LeafFieldSelections {}));
    let errors = test_operation_with_schema(
        "{
          human { pets }
        }",
        TEST_SCHEMA,
        &mut plan,
    );

    let messages = get_messages(&errors);
    assert_eq!(messages.len(), 1);
    assert_eq!(
        messages,
        vec!["Field \"pets\" of type \"[Pet]\" must have a selection of subfields. Did you mean \"pets { ... }\"?"]
    );
}

#[test]
fn valid_scalar_selection_with_args() {
    use crate::validation::test_utils::*;

    let mut plan = create_plan_from_rule(Box::new(LeafFieldSelections {}));
    let errors = test_operation_with_schema(
        "fragment scalarSelectionWithArgs on Dog {
          doesKnowCommand(dogCommand: SIT)
        }",
        TEST_SCHEMA,
        &mut plan,
    );

    assert_eq!(get_messages(&errors).len(), 0);
}

#[test]
fn scalar_selection_not_allowed_on_boolean() {
    use crate::validation::test_utils::*;

    let mut plan = create_plan_from_rule(Box::new(LeafFieldSelections {}));
    let errors = test_operation_with_schema(
        "fragment scalarSelectionsNotAllowedOnBoolean on Dog {
          barks { sinceWhen }
        }",
        TEST_SCHEMA,
        &mut plan,
    );

    let messages = get_messages(&errors);
    assert_eq!(messages.len(), 1);
    assert_eq!(
        messages,
        vec!["Field \"barks\" must not have a selection since type \"Boolean\" has no subfields."]
    );
}

#[test]
fn scalar_selection_not_allowed_on_enum() {
    use crate::validation::test_utils::*;

    let mut plan = create_plan_from_rule(Box::new(LeafFieldSelections {}));
    let errors = test_operation_with_schema(
        "fragment scalarSelectionsNotAllowedOnEnum on Cat {
          furColor { inHexDec }
        }",
        TEST_SCHEMA,
        &mut plan,
    );

    let messages = get_messages(&errors);
    assert_eq!(messages.len(), 1);
    assert_eq!(
        messages,
        vec!["Field \"furColor\" must not have a selection since type \"FurColor\" has no subfields."]
    );
}

#[test]
fn scalar_selection_not_allowed_with_args() {
    use crate::validation::test_utils::*;

    let mut plan = create_plan_from_rule(Box::new(LeafFieldSelections {}));
    let errors = test_operation_with_schema(
        "fragment scalarSelectionsNotAllowedWithArgs on Dog {
          doesKnowCommand(dogCommand: SIT) { sinceWhen }
        }",
        TEST_SCHEMA,
        &mut plan,
    );

    let messages = get_messages(&errors);
    assert_eq!(messages.len(), 1);
    assert_eq!(
        messages,
        vec!["Field \"doesKnowCommand\" must not have a selection since type \"Boolean\" has no subfields."]
    );
}

#[test]
fn scalar_selection_not_allowed_on_non_null_list() {
    use crate::validation::test_utils::*;

    let mut plan = create_plan_from_rule(Box::new(LeafFieldSelections {}));
    let errors = test_operation_with_schema(
        "{
          complicatedArgs { tags { length } }
        }",
        "
        type ComplicatedArgs { tags: [String!]! }
        type Query { complicatedArgs: ComplicatedArgs }
        ",
        &mut plan,
    );

    let messages = get_messages(&errors);
    assert_eq!(
        messages,
        vec!["Field \"tags\" must not have a selection since type \"[String!]!\" has no subfields."]
    );
}

#[test]
fn selection_diagnostics_reference_their_nodes() {
    use crate::ast::{AstNodeKind, Pos};
    use crate::validation::test_utils::*;

    let mut plan = create_plan_from_rule(Box::new(LeafFieldSelections {}));
    let errors = test_operation_with_schema(
        "{
  dog {
    name { length }
  }
  cat
}",
        TEST_SCHEMA,
        &mut plan,
    );

    assert_eq!(errors.len(), 2);

    assert_eq!(errors[0].kind, ValidationErrorKind::LeafWithSubselection);
    assert_eq!(errors[0].nodes[0].kind, AstNodeKind::SelectionSet);
    assert_eq!(errors[0].locations(), vec![Pos { line: 3, column: 10 }]);

    assert_eq!(
        errors[1].kind,
        ValidationErrorKind::CompositeRequiresSubselection
    );
    assert_eq!(errors[1].nodes[0].kind, AstNodeKind::Field);
    assert_eq!(errors[1].locations(), vec![Pos { line: 5, column: 3 }]);
}

#[test]
fn unknown_fields_are_ignored() {
    use crate::validation::test_utils::*;

    let mut plan = create_plan_from_rule(Box::new(LeafFieldSelections {}));
    let errors = test_operation_with_schema(
        "{
          dog { unknown { deeper } }
          unknownRoot
        }",
        TEST_SCHEMA,
        &mut plan,
    );

    assert_eq!(get_messages(&errors).len(), 0);
}
