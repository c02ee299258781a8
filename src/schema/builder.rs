use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use super::{DirectiveDescriptor, Limits, Schema};
use crate::ast::Type;
use crate::types::{GraphQLType, HostType, ScalarType};
use crate::SchemaError;

/// Collects types and directives, then checks them into an immutable [`Schema`].
///
/// A new builder already holds the builtin scalars and the `@skip` and
/// `@include` directives.
pub struct SchemaBuilder {
    query_type: String,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
    input_types: IndexMap<String, Arc<GraphQLType>>,
    output_types: IndexMap<String, Arc<GraphQLType>>,
    input_host_types: HashMap<TypeId, Type>,
    output_host_types: HashMap<TypeId, Type>,
    directives: IndexMap<String, DirectiveDescriptor>,
    limits: Limits,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        SchemaBuilder::new()
    }
}

impl SchemaBuilder {
    pub fn new() -> Self {
        let mut builder = SchemaBuilder {
            query_type: "Query".to_string(),
            mutation_type: None,
            subscription_type: None,
            input_types: IndexMap::new(),
            output_types: IndexMap::new(),
            input_host_types: HashMap::new(),
            output_host_types: HashMap::new(),
            directives: IndexMap::new(),
            limits: Limits::default(),
        };

        for scalar in [
            ScalarType::int(),
            ScalarType::float(),
            ScalarType::string(),
            ScalarType::boolean(),
            ScalarType::id(),
        ] {
            builder.insert_named(GraphQLType::Scalar(scalar));
        }

        builder.register_host_type::<i32>(Type::named("Int"));
        builder.register_host_type::<i64>(Type::named("Int"));
        builder.register_host_type::<f64>(Type::named("Float"));
        builder.register_host_type::<String>(Type::named("String"));
        builder.register_host_type::<bool>(Type::named("Boolean"));

        for directive in [DirectiveDescriptor::skip(), DirectiveDescriptor::include()] {
            builder.directives.insert(directive.name.clone(), directive);
        }

        builder
    }

    pub fn set_query_type(&mut self, name: impl Into<String>) -> &mut Self {
        self.query_type = name.into();
        self
    }

    pub fn set_mutation_type(&mut self, name: impl Into<String>) -> &mut Self {
        self.mutation_type = Some(name.into());
        self
    }

    pub fn set_subscription_type(&mut self, name: impl Into<String>) -> &mut Self {
        self.subscription_type = Some(name.into());
        self
    }

    pub fn set_limits(&mut self, limits: Limits) -> &mut Self {
        self.limits = limits;
        self
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.input_types.contains_key(name) || self.output_types.contains_key(name)
    }

    /// Registers a named type in the namespaces it belongs to, along with the
    /// host types it is bound to.
    pub fn add_type(&mut self, t: impl Into<GraphQLType>) -> Result<&mut Self, SchemaError> {
        let t = t.into();
        let name = t
            .name()
            .map(str::to_string)
            .ok_or_else(|| SchemaError::UnknownType {
                type_name: t.to_string(),
                referenced_by: "schema".to_string(),
            })?;

        if self.has_type(&name) {
            return Err(SchemaError::DuplicateType(name));
        }

        let duplicate_field = match &t {
            GraphQLType::InputObject(input_object) => input_object.duplicate_field(),
            GraphQLType::Object(object) => object.duplicate_field(),
            _ => None,
        };
        if let Some(field) = duplicate_field {
            return Err(SchemaError::DuplicateField {
                type_name: name,
                field: field.to_string(),
            });
        }

        match &t {
            GraphQLType::InputObject(input_object) => {
                self.input_host_types
                    .insert(input_object.host_type().id(), Type::named(&name));
            }
            GraphQLType::Object(object) => {
                if let Some(host_type) = object.host_type() {
                    self.output_host_types
                        .insert(host_type.id(), Type::named(&name));
                }
            }
            _ => {}
        }

        self.insert_named(t);
        Ok(self)
    }

    /// Binds a Rust type to the schema type denoted by `t`.
    pub fn register_host_type<T: 'static>(&mut self, t: Type) -> &mut Self {
        self.input_host_types.insert(HostType::of::<T>().id(), t);
        self
    }

    pub fn add_directive(
        &mut self,
        directive: DirectiveDescriptor,
    ) -> Result<&mut Self, SchemaError> {
        if self.directives.contains_key(&directive.name) {
            return Err(SchemaError::DuplicateType(format!("@{}", directive.name)));
        }

        self.directives.insert(directive.name.clone(), directive);
        Ok(self)
    }

    fn insert_named(&mut self, t: GraphQLType) {
        let Some(name) = t.name().map(str::to_string) else {
            return;
        };
        let t = Arc::new(t);

        match t.as_ref() {
            GraphQLType::Scalar(_) | GraphQLType::Enum(_) => {
                self.input_types.insert(name.clone(), t.clone());
                self.output_types.insert(name, t);
            }
            GraphQLType::InputObject(_) => {
                self.input_types.insert(name, t);
            }
            GraphQLType::Object(_) => {
                self.output_types.insert(name, t);
            }
            GraphQLType::List(_) | GraphQLType::NonNull(_) => {}
        }
    }

    fn check_reference(
        &self,
        t: &Type,
        input: bool,
        referenced_by: impl FnOnce() -> String,
    ) -> Result<(), SchemaError> {
        let name = t.inner_type();
        let known = match input {
            true => self.input_types.contains_key(name),
            false => self.output_types.contains_key(name),
        };

        match known {
            true => Ok(()),
            false => Err(SchemaError::UnknownType {
                type_name: name.to_string(),
                referenced_by: referenced_by(),
            }),
        }
    }

    fn root(&self, name: &str) -> Result<Arc<GraphQLType>, SchemaError> {
        match self.output_types.get(name) {
            Some(t) if matches!(t.as_ref(), GraphQLType::Object(_)) => Ok(t.clone()),
            _ => Err(SchemaError::UnknownType {
                type_name: name.to_string(),
                referenced_by: "schema".to_string(),
            }),
        }
    }

    /// Checks that the query root exists and that every type reference
    /// resolves.
    pub fn build(self) -> Result<Schema, SchemaError> {
        let query_type = self
            .root(&self.query_type)
            .map_err(|_| SchemaError::MissingQueryRoot(self.query_type.clone()))?;
        let mutation_type = self
            .mutation_type
            .as_deref()
            .map(|name| self.root(name))
            .transpose()?;
        let subscription_type = self
            .subscription_type
            .as_deref()
            .map(|name| self.root(name))
            .transpose()?;

        for t in self.output_types.values() {
            let GraphQLType::Object(object) = t.as_ref() else {
                continue;
            };

            for field in object.fields() {
                self.check_reference(&field.field_type, false, || {
                    format!("{}.{}", object.name(), field.name)
                })?;

                for argument in field.arguments.values() {
                    self.check_reference(&argument.value_type, true, || {
                        format!("{}.{}({}:)", object.name(), field.name, argument.name)
                    })?;
                }
            }

            for name in object.interfaces().iter().chain(object.possible_types()) {
                self.check_reference(&Type::named(name), false, || object.name().to_string())?;
            }
        }

        for t in self.input_types.values() {
            let GraphQLType::InputObject(input_object) = t.as_ref() else {
                continue;
            };

            for field in input_object.fields() {
                self.check_reference(field.value_type(), true, || {
                    format!("{}.{}", input_object.name(), field.name())
                })?;
            }
        }

        for directive in self.directives.values() {
            for argument in directive.arguments.values() {
                self.check_reference(&argument.value_type, true, || {
                    format!("@{}({}:)", directive.name, argument.name)
                })?;
            }
        }

        debug!(
            input_types = self.input_types.len(),
            output_types = self.output_types.len(),
            directives = self.directives.len(),
            "schema built"
        );

        Ok(Schema {
            query_type,
            mutation_type,
            subscription_type,
            input_types: self.input_types,
            output_types: self.output_types,
            input_host_types: self.input_host_types,
            output_host_types: self.output_host_types,
            directives: self.directives,
            limits: self.limits,
        })
    }
}

#[cfg(test)]
use pretty_assertions::assert_eq;
#[cfg(test)]
use crate::introspection::DirectiveLocation;
#[cfg(test)]
use crate::types::{FieldDescriptor, ObjectType};

#[cfg(test)]
fn query() -> ObjectType {
    ObjectType::new("Query").field(FieldDescriptor::new("ok", Type::named("Boolean")))
}

#[test]
fn new_builder_holds_builtins() {
    let mut builder = SchemaBuilder::new();
    builder.add_type(query()).expect("query is added");
    let schema = builder.build().expect("schema builds");

    for name in ["Int", "Float", "String", "Boolean", "ID"] {
        assert!(schema.resolve_input_type_by_name(name).is_some(), "{}", name);
        assert!(schema.resolve_output_type_by_name(name).is_some(), "{}", name);
    }
    assert!(schema.resolve_directive("skip").is_some());
    assert!(schema.resolve_directive("include").is_some());
}

#[test]
fn duplicates_are_rejected() {
    let mut builder = SchemaBuilder::new();
    builder.add_type(query()).expect("query is added");

    assert_eq!(
        builder.add_type(query()).err(),
        Some(SchemaError::DuplicateType("Query".to_string()))
    );
    assert_eq!(
        builder
            .add_type(
                ObjectType::new("Other")
                    .field(FieldDescriptor::new("a", Type::named("Int")))
                    .field(FieldDescriptor::new("a", Type::named("String")))
            )
            .err(),
        Some(SchemaError::DuplicateField {
            type_name: "Other".to_string(),
            field: "a".to_string()
        })
    );
    assert_eq!(
        builder
            .add_directive(DirectiveDescriptor::new(
                "skip",
                vec![DirectiveLocation::FIELD]
            ))
            .err(),
        Some(SchemaError::DuplicateType("@skip".to_string()))
    );
}

#[test]
fn roots_must_be_registered_objects() {
    let mut builder = SchemaBuilder::new();
    builder.add_type(query()).expect("query is added");
    builder.set_mutation_type("Int");

    assert_eq!(
        builder.build().err(),
        Some(SchemaError::UnknownType {
            type_name: "Int".to_string(),
            referenced_by: "schema".to_string()
        })
    );
}

#[test]
fn interface_references_are_checked() {
    let mut builder = SchemaBuilder::new();
    builder
        .add_type(query().implements("Node"))
        .expect("query is added");

    assert_eq!(
        builder.build().err(),
        Some(SchemaError::UnknownType {
            type_name: "Node".to_string(),
            referenced_by: "Query".to_string()
        })
    );
}

#[test]
fn duplicate_arguments_are_rejected() {
    use crate::types::ArgumentDescriptor;

    let mut builder = SchemaBuilder::new();
    let field = FieldDescriptor::new("a", Type::named("Int"))
        .argument(ArgumentDescriptor::new("x", Type::named("Int")))
        .argument(ArgumentDescriptor::new("x", Type::named("String")));

    assert_eq!(
        builder.add_type(ObjectType::new("Other").field(field)).err(),
        Some(SchemaError::DuplicateField {
            type_name: "Other".to_string(),
            field: "a(x:)".to_string()
        })
    );
}
