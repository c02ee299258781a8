use crate::validation::validate::ValidationPlan;

use super::{FieldsOnCorrectType, LeafFieldSelections};

pub fn default_rules_validation_plan() -> ValidationPlan {
    let mut plan = ValidationPlan { rules: vec![] };

    plan.add_rule(Box::new(LeafFieldSelections {}));
    plan.add_rule(Box::new(FieldsOnCorrectType {}));

    plan
}
