//! The immutable schema and the per-request repository view over it.

mod builder;
mod directive;
mod meta;
mod sdl;

use std::any::TypeId;
use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use self::builder::SchemaBuilder;
pub use self::directive::DirectiveDescriptor;
pub use self::meta::{SCHEMA_META_FIELD, TYPE_META_FIELD};

use crate::ast::{OperationType, Type};
use crate::execution::VariableResolver;
use crate::introspection::{IntrospectedSchema, IntrospectedType, TypeKind};
use crate::types::{GraphQLType, HostType, ListType, NonNullType};

/// Bounds applied while walking values and documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Limits {
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits { max_depth: 64 }
    }
}

/// Input and output types live in separate namespaces; scalars and enums are
/// registered in both.
#[derive(Debug)]
pub struct Schema {
    query_type: Arc<GraphQLType>,
    mutation_type: Option<Arc<GraphQLType>>,
    subscription_type: Option<Arc<GraphQLType>>,
    input_types: IndexMap<String, Arc<GraphQLType>>,
    output_types: IndexMap<String, Arc<GraphQLType>>,
    input_host_types: HashMap<TypeId, Type>,
    output_host_types: HashMap<TypeId, Type>,
    directives: IndexMap<String, DirectiveDescriptor>,
    limits: Limits,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    pub fn query_type(&self) -> Arc<GraphQLType> {
        self.query_type.clone()
    }

    pub fn mutation_type(&self) -> Option<Arc<GraphQLType>> {
        self.mutation_type.clone()
    }

    pub fn subscription_type(&self) -> Option<Arc<GraphQLType>> {
        self.subscription_type.clone()
    }

    pub fn root_type(&self, operation_type: OperationType) -> Option<Arc<GraphQLType>> {
        match operation_type {
            OperationType::Query => Some(self.query_type()),
            OperationType::Mutation => self.mutation_type(),
            OperationType::Subscription => self.subscription_type(),
        }
    }

    pub fn is_query_root(&self, t: &GraphQLType) -> bool {
        matches!(t, GraphQLType::Object(_)) && t.name() == self.query_type.name()
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn resolve_input_type_by_name(&self, name: &str) -> Option<Arc<GraphQLType>> {
        self.input_types.get(name).cloned()
    }

    pub fn resolve_output_type_by_name(&self, name: &str) -> Option<Arc<GraphQLType>> {
        self.output_types.get(name).cloned()
    }

    /// Builds the input type denoted by a type expression.
    pub fn resolve_input_type(&self, t: &Type) -> Option<Arc<GraphQLType>> {
        self.resolve_type(t, &|name: &str| self.resolve_input_type_by_name(name))
    }

    /// Builds the output type denoted by a type expression.
    pub fn resolve_output_type(&self, t: &Type) -> Option<Arc<GraphQLType>> {
        self.resolve_type(t, &|name: &str| self.resolve_output_type_by_name(name))
    }

    fn resolve_type(
        &self,
        t: &Type,
        named: &dyn Fn(&str) -> Option<Arc<GraphQLType>>,
    ) -> Option<Arc<GraphQLType>> {
        match t {
            Type::NamedType(name) => named(name),
            Type::ListType(of_type) => Some(Arc::new(GraphQLType::List(ListType::new(
                self.resolve_type(of_type, named)?,
            )))),
            Type::NonNullType(of_type) => NonNullType::new(self.resolve_type(of_type, named)?)
                .ok()
                .map(|non_null| Arc::new(GraphQLType::NonNull(non_null))),
        }
    }

    pub fn resolve_input_type_for_host_type(&self, host_type: HostType) -> Option<Arc<GraphQLType>> {
        self.input_host_types
            .get(&host_type.id())
            .and_then(|t| self.resolve_input_type(t))
    }

    pub fn resolve_input_type_for<T: 'static>(&self) -> Option<Arc<GraphQLType>> {
        self.resolve_input_type_for_host_type(HostType::of::<T>())
    }

    pub fn resolve_output_type_for_host_type(
        &self,
        host_type: HostType,
    ) -> Option<Arc<GraphQLType>> {
        self.output_host_types
            .get(&host_type.id())
            .and_then(|t| self.resolve_output_type(t))
    }

    pub fn resolve_directive(&self, name: &str) -> Option<&DirectiveDescriptor> {
        self.directives.get(name)
    }

    pub fn directives(&self) -> impl Iterator<Item = &DirectiveDescriptor> {
        self.directives.values()
    }

    /// Every named type, output types first.
    pub fn types(&self) -> impl Iterator<Item = &Arc<GraphQLType>> {
        self.output_types.values().chain(
            self.input_types
                .iter()
                .filter(|(name, _)| !self.output_types.contains_key(name.as_str()))
                .map(|(_, t)| t),
        )
    }

    pub fn introspect(&self) -> IntrospectedSchema {
        let root_ref = |t: &Arc<GraphQLType>| {
            IntrospectedType::named_ref(t.kind(), t.name().unwrap_or_default())
        };

        IntrospectedSchema {
            query_type: root_ref(&self.query_type),
            mutation_type: self.mutation_type.as_ref().map(root_ref),
            subscription_type: self.subscription_type.as_ref().map(root_ref),
            types: self.types().map(|t| t.introspect(self)).collect(),
            directives: self
                .directives
                .values()
                .map(|directive| directive.introspect(self))
                .collect(),
        }
    }

    pub fn introspect_type(&self, name: &str) -> Option<IntrospectedType> {
        self.resolve_output_type_by_name(name)
            .or_else(|| self.resolve_input_type_by_name(name))
            .map(|t| t.introspect(self))
    }

    /// A shallow reference to the type denoted by `t`, as used for the types of
    /// fields and arguments.
    pub fn introspect_type_ref(&self, t: &Type) -> IntrospectedType {
        match t {
            Type::NamedType(name) => {
                let kind = self
                    .output_types
                    .get(name)
                    .or_else(|| self.input_types.get(name))
                    .map(|t| t.kind())
                    .unwrap_or(TypeKind::SCALAR);
                IntrospectedType::named_ref(kind, name)
            }
            Type::ListType(of_type) => {
                IntrospectedType::wrapping(TypeKind::LIST, self.introspect_type_ref(of_type))
            }
            Type::NonNullType(of_type) => {
                IntrospectedType::wrapping(TypeKind::NON_NULL, self.introspect_type_ref(of_type))
            }
        }
    }
}

/// The schema as seen while resolving one request: lookups go to the schema,
/// variable references go to the request's variable resolver.
#[derive(Clone, Copy)]
pub struct SchemaRepository<'a> {
    schema: &'a Schema,
    variable_resolver: Option<&'a VariableResolver<'a>>,
}

impl<'a> SchemaRepository<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        SchemaRepository {
            schema,
            variable_resolver: None,
        }
    }

    pub fn with_variable_resolver(mut self, variable_resolver: &'a VariableResolver<'a>) -> Self {
        self.variable_resolver = Some(variable_resolver);
        self
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn variable_resolver(&self) -> Option<&'a VariableResolver<'a>> {
        self.variable_resolver
    }
}

impl<'a> Deref for SchemaRepository<'a> {
    type Target = Schema;

    fn deref(&self) -> &Self::Target {
        self.schema
    }
}

#[cfg(test)]
use pretty_assertions::assert_eq;
#[cfg(test)]
use crate::introspection::DirectiveLocation;
#[cfg(test)]
use crate::types::{FieldDescriptor, InputObjectType, ObjectType, ScalarType};
#[cfg(test)]
use crate::SchemaError;

#[cfg(test)]
#[derive(Debug, Clone, Default)]
struct Pagination {
    first: Option<i32>,
}

#[cfg(test)]
fn schema() -> Schema {
    let mut builder = Schema::builder();
    builder
        .add_type(
            InputObjectType::typed::<Pagination>("Pagination").field(
                "first",
                Type::named("Int"),
                |p: &mut Pagination, first: Option<i32>| p.first = first,
            ),
        )
        .expect("valid type");
    builder
        .add_type(
            ObjectType::new("Query")
                .field(FieldDescriptor::new("tags", Type::list(Type::named("String")))),
        )
        .expect("valid type");
    builder.set_query_type("Query");
    builder.build().expect("valid schema")
}

#[test]
fn named_types_resolve_in_their_namespace() {
    let schema = schema();

    assert!(schema.resolve_input_type_by_name("Pagination").is_some());
    assert!(schema.resolve_output_type_by_name("Pagination").is_none());
    assert!(schema.resolve_output_type_by_name("Query").is_some());
    assert!(schema.resolve_input_type_by_name("Query").is_none());
    assert!(schema.resolve_input_type_by_name("Int").is_some());
    assert!(schema.resolve_output_type_by_name("Int").is_some());
    assert!(schema.resolve_input_type_by_name("Missing").is_none());
}

#[test]
fn type_expressions_resolve_to_wrapped_types() {
    let schema = schema();
    let t = Type::non_null(Type::list(Type::named("Pagination")));

    let resolved = schema.resolve_input_type(&t).expect("resolvable");
    assert_eq!(resolved.to_string(), "[Pagination]!");
    assert_eq!(schema.resolve_output_type(&t).map(|t| t.to_string()), None);
}

#[test]
fn host_types_map_to_schema_types() {
    let schema = schema();

    assert_eq!(
        schema.resolve_input_type_for::<Pagination>().map(|t| t.to_string()),
        Some("Pagination".to_string())
    );
    assert_eq!(
        schema.resolve_input_type_for::<i32>().map(|t| t.to_string()),
        Some("Int".to_string())
    );
    assert_eq!(
        schema.resolve_input_type_for::<f64>().map(|t| t.to_string()),
        Some("Float".to_string())
    );
    assert!(schema.resolve_input_type_for::<Vec<u8>>().is_none());
}

#[test]
fn builtin_directives_are_registered() {
    let schema = schema();
    let skip = schema.resolve_directive("skip").expect("skip is builtin");

    assert_eq!(
        skip.get_argument("if").map(|a| a.value_type.to_string()),
        Some("Boolean!".to_string())
    );
    assert!(skip.locations.contains(&DirectiveLocation::FIELD));
    assert!(schema.resolve_directive("include").is_some());
    assert!(schema.resolve_directive("defer").is_none());
}

#[test]
fn schema_introspection_lists_roots_and_types() {
    let schema = schema();
    let introspected = schema.introspect();

    assert_eq!(introspected.query_type.name.as_deref(), Some("Query"));
    assert_eq!(introspected.mutation_type, None);
    assert!(introspected
        .types
        .iter()
        .any(|t| t.name.as_deref() == Some("Pagination") && t.kind == TypeKind::INPUT_OBJECT));
    assert_eq!(
        introspected
            .types
            .iter()
            .filter(|t| t.name.as_deref() == Some("Int"))
            .count(),
        1
    );

    let query = schema.introspect_type("Query").expect("Query exists");
    let tags = &query.fields.expect("objects list fields")[0];
    assert_eq!(tags.type_ref.kind, TypeKind::LIST);
    assert_eq!(
        tags.type_ref.of_type.as_ref().and_then(|t| t.name.clone()),
        Some("String".to_string())
    );
}

#[test]
fn repositories_without_resolver_defer_to_the_schema() {
    let schema = schema();
    let repository = SchemaRepository::new(&schema);

    assert!(repository.variable_resolver().is_none());
    assert!(repository.resolve_input_type_by_name("Pagination").is_some());
    assert_eq!(repository.limits(), Limits::default());
}

#[test]
fn limits_deserialize_with_defaults() {
    let limits: Limits = serde_json::from_str(r#"{"maxDepth": 8}"#).expect("valid limits");
    assert_eq!(limits.max_depth, 8);

    let limits: Limits = serde_json::from_str("{}").expect("valid limits");
    assert_eq!(limits, Limits::default());
}

#[test]
fn builder_rejects_invalid_schemas() {
    let mut builder = Schema::builder();
    builder
        .add_type(ObjectType::new("Query").field(FieldDescriptor::new(
            "user",
            Type::named("User"),
        )))
        .expect("valid type");
    builder.set_query_type("Query");
    assert_eq!(
        builder.build().err(),
        Some(SchemaError::UnknownType {
            type_name: "User".to_string(),
            referenced_by: "Query.user".to_string()
        })
    );

    let mut builder = Schema::builder();
    assert_eq!(
        builder.add_type(ScalarType::int()).err(),
        Some(SchemaError::DuplicateType("Int".to_string()))
    );
    assert_eq!(
        builder.build().err(),
        Some(SchemaError::MissingQueryRoot("Query".to_string()))
    );

    let mut builder = Schema::builder();
    assert_eq!(
        builder
            .add_type(
                ObjectType::new("Query")
                    .field(FieldDescriptor::new("a", Type::named("Int")))
                    .field(FieldDescriptor::new("a", Type::named("String"))),
            )
            .err(),
        Some(SchemaError::DuplicateField {
            type_name: "Query".to_string(),
            field: "a".to_string()
        })
    );
}
