use indexmap::IndexMap;

use super::Schema;
use crate::ast::Type;
use crate::introspection::{DirectiveLocation, IntrospectedDirective};
use crate::types::ArgumentDescriptor;

#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveDescriptor {
    pub name: String,
    pub description: Option<String>,
    pub locations: Vec<DirectiveLocation>,
    pub arguments: IndexMap<String, ArgumentDescriptor>,
    pub repeatable: bool,
}

impl DirectiveDescriptor {
    pub fn new(name: impl Into<String>, locations: Vec<DirectiveLocation>) -> Self {
        DirectiveDescriptor {
            name: name.into(),
            description: None,
            locations,
            arguments: IndexMap::new(),
            repeatable: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn argument(mut self, argument: ArgumentDescriptor) -> Self {
        self.arguments.insert(argument.name.clone(), argument);
        self
    }

    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    pub fn get_argument(&self, name: &str) -> Option<&ArgumentDescriptor> {
        self.arguments.get(name)
    }

    pub fn skip() -> Self {
        DirectiveDescriptor::new(
            "skip",
            vec![
                DirectiveLocation::FIELD,
                DirectiveLocation::FRAGMENT_SPREAD,
                DirectiveLocation::INLINE_FRAGMENT,
            ],
        )
        .with_description("Directs the executor to skip this field or fragment when the `if` argument is true.")
        .argument(
            ArgumentDescriptor::new("if", Type::non_null(Type::named("Boolean")))
                .with_description("Skipped when true."),
        )
    }

    pub fn include() -> Self {
        DirectiveDescriptor::new(
            "include",
            vec![
                DirectiveLocation::FIELD,
                DirectiveLocation::FRAGMENT_SPREAD,
                DirectiveLocation::INLINE_FRAGMENT,
            ],
        )
        .with_description("Directs the executor to include this field or fragment only when the `if` argument is true.")
        .argument(
            ArgumentDescriptor::new("if", Type::non_null(Type::named("Boolean")))
                .with_description("Included when true."),
        )
    }

    pub fn introspect(&self, schema: &Schema) -> IntrospectedDirective {
        IntrospectedDirective {
            name: self.name.clone(),
            description: self.description.clone(),
            locations: self.locations.clone(),
            args: self
                .arguments
                .values()
                .map(|argument| argument.introspect(schema))
                .collect(),
        }
    }
}
