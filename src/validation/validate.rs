use tracing::debug;

use super::{
    rules::ValidationRule,
    utils::{ValidationError, ValidationErrorContext},
};
use crate::ast::{Document, OperationVisitorContext};
use crate::schema::Schema;
use crate::ResolutionError;

pub struct ValidationPlan {
    pub rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationPlan {
    pub fn new() -> Self {
        Self { rules: vec![] }
    }

    pub fn from(rules: Vec<Box<dyn ValidationRule>>) -> Self {
        Self { rules }
    }

    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }
}

impl Default for ValidationPlan {
    fn default() -> Self {
        ValidationPlan::new()
    }
}

/// Runs every rule of the plan over the document and collects their
/// diagnostics. Only a walk that cannot proceed at all is an `Err`.
pub fn validate<'a>(
    schema: &'a Schema,
    operation: &'a Document,
    validation_plan: &'a ValidationPlan,
) -> Result<Vec<ValidationError>, ResolutionError> {
    let mut validation_context = OperationVisitorContext::new(operation, schema);
    let mut error_collector = ValidationErrorContext::new();

    for rule in &validation_plan.rules {
        let reported = error_collector.errors.len();
        rule.validate(&mut validation_context, &mut error_collector)?;
        debug!(
            rule = rule.error_code(),
            errors = error_collector.errors.len() - reported,
            "validation rule finished"
        );
    }

    Ok(error_collector.errors)
}

#[test]
fn test_validate_valid_query() {
    use crate::validation::rules::default_rules_validation_plan;
    use crate::validation::test_utils::*;

    let mut default_plan = default_rules_validation_plan();
    let errors = test_operation_without_schema(
        "
    query test {
      dummy
    }
    ",
        &mut default_plan,
    );

    assert_eq!(errors.len(), 0);
}

#[test]
fn test_validate_collects_errors_of_every_rule() {
    use crate::validation::rules::default_rules_validation_plan;
    use crate::validation::test_utils::*;

    let mut default_plan = default_rules_validation_plan();
    let errors = test_operation_with_schema(
        "{
          dog { unknownField }
          human
        }",
        TEST_SCHEMA,
        &mut default_plan,
    );

    assert_eq!(
        get_messages(&errors),
        vec![
            "Field \"human\" of type \"Human\" must have a selection of subfields. Did you mean \"human { ... }\"?",
            "Cannot query field \"unknownField\" on type \"Dog\".",
        ]
    );
}

#[test]
fn test_validate_unsupported_operation() {
    use crate::ast::parse_query;
    use crate::validation::rules::default_rules_validation_plan;

    let schema = Schema::from_sdl("type Query { dummy: String }").expect("valid schema");
    let operation = parse_query("subscription { dummy }").expect("valid query");

    assert_eq!(
        validate(&schema, &operation, &default_rules_validation_plan()),
        Err(ResolutionError::UnsupportedOperationKind(
            "subscription".to_string()
        ))
    );
}
