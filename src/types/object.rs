use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::{GraphQLType, HostType, InputField};
use crate::ast::{Type, Value};
use crate::execution::CoercedValue;
use crate::introspection::{IntrospectedField, IntrospectedInputValue, IntrospectedType, TypeKind};
use crate::schema::{Schema, SchemaRepository};
use crate::ResolutionError;

/// Produces a field's value from its coerced arguments.
pub type FieldResolver = Arc<
    dyn Fn(&SchemaRepository, &IndexMap<String, CoercedValue>) -> Result<serde_json::Value, ResolutionError>
        + Send
        + Sync,
>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositeKind {
    Object,
    Interface,
    Union,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentDescriptor {
    pub name: String,
    pub description: Option<String>,
    pub value_type: Type,
    pub default_value: Option<Value>,
}

impl ArgumentDescriptor {
    pub fn new(name: impl Into<String>, value_type: Type) -> Self {
        ArgumentDescriptor {
            name: name.into(),
            description: None,
            value_type,
            default_value: None,
        }
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn introspect(&self, schema: &Schema) -> IntrospectedInputValue {
        IntrospectedInputValue {
            name: self.name.clone(),
            description: self.description.clone(),
            type_ref: schema.introspect_type_ref(&self.value_type),
            default_value: self.default_value.as_ref().map(|value| value.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub description: Option<String>,
    pub field_type: Type,
    pub arguments: IndexMap<String, ArgumentDescriptor>,
    resolver: Option<FieldResolver>,
    duplicate_argument: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: Type) -> Self {
        FieldDescriptor {
            name: name.into(),
            description: None,
            field_type,
            arguments: IndexMap::new(),
            resolver: None,
            duplicate_argument: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn argument(mut self, argument: ArgumentDescriptor) -> Self {
        if self.arguments.contains_key(&argument.name) {
            self.duplicate_argument
                .get_or_insert_with(|| format!("{}({}:)", self.name, argument.name));
            return self;
        }

        self.arguments.insert(argument.name.clone(), argument);
        self
    }

    pub fn with_resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&SchemaRepository, &IndexMap<String, CoercedValue>) -> Result<serde_json::Value, ResolutionError>
            + Send
            + Sync
            + 'static,
    {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Exposes an input object's field through the same lookup as output fields.
    pub fn from_input_field(field: &InputField) -> Self {
        FieldDescriptor {
            name: field.name().to_string(),
            description: field.description().map(str::to_string),
            field_type: field.value_type().clone(),
            arguments: IndexMap::new(),
            resolver: None,
            duplicate_argument: None,
        }
    }

    pub fn get_argument(&self, name: &str) -> Option<&ArgumentDescriptor> {
        self.arguments.get(name)
    }

    pub fn has_resolver(&self) -> bool {
        self.resolver.is_some()
    }

    /// Runs the field's resolver; fields without one resolve to null.
    pub fn resolve(
        &self,
        repository: &SchemaRepository,
        arguments: &IndexMap<String, CoercedValue>,
    ) -> Result<serde_json::Value, ResolutionError> {
        match &self.resolver {
            Some(resolver) => resolver(repository, arguments),
            None => Ok(serde_json::Value::Null),
        }
    }

    pub fn introspect(&self, schema: &Schema) -> IntrospectedField {
        IntrospectedField {
            name: self.name.clone(),
            description: self.description.clone(),
            args: self
                .arguments
                .values()
                .map(|argument| argument.introspect(schema))
                .collect(),
            type_ref: schema.introspect_type_ref(&self.field_type),
        }
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .field("arguments", &self.arguments)
            .field("resolver", &self.resolver.is_some())
            .finish()
    }
}

/// Objects, interfaces and unions: anything a selection set can be made on.
#[derive(Debug, Clone)]
pub struct ObjectType {
    name: String,
    description: Option<String>,
    composite_kind: CompositeKind,
    fields: IndexMap<String, Arc<FieldDescriptor>>,
    interfaces: Vec<String>,
    possible_types: Vec<String>,
    host_type: Option<HostType>,
    duplicate_field: Option<String>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        ObjectType::with_kind(name, CompositeKind::Object)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        ObjectType::with_kind(name, CompositeKind::Interface)
    }

    pub fn union(name: impl Into<String>) -> Self {
        ObjectType::with_kind(name, CompositeKind::Union)
    }

    fn with_kind(name: impl Into<String>, composite_kind: CompositeKind) -> Self {
        ObjectType {
            name: name.into(),
            description: None,
            composite_kind,
            fields: IndexMap::new(),
            interfaces: vec![],
            possible_types: vec![],
            host_type: None,
            duplicate_field: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Duplicate field names, and duplicate argument names within a field,
    /// are kept aside and reported when the type is added to a schema.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        if self.fields.contains_key(&field.name) {
            self.duplicate_field.get_or_insert_with(|| field.name.clone());
            return self;
        }
        if let Some(argument) = &field.duplicate_argument {
            self.duplicate_field.get_or_insert_with(|| argument.clone());
        }

        self.fields.insert(field.name.clone(), Arc::new(field));
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn possible_type(mut self, name: impl Into<String>) -> Self {
        self.possible_types.push(name.into());
        self
    }

    /// Binds the Rust type whose values this object describes.
    pub fn bound_to<T: 'static>(mut self) -> Self {
        self.host_type = Some(HostType::of::<T>());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn composite_kind(&self) -> CompositeKind {
        self.composite_kind
    }

    pub fn fields(&self) -> impl Iterator<Item = &Arc<FieldDescriptor>> {
        self.fields.values()
    }

    pub fn get_field(&self, name: &str) -> Option<&Arc<FieldDescriptor>> {
        self.fields.get(name)
    }

    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    pub fn possible_types(&self) -> &[String] {
        &self.possible_types
    }

    pub fn host_type(&self) -> Option<HostType> {
        self.host_type
    }

    pub(crate) fn duplicate_field(&self) -> Option<&str> {
        self.duplicate_field.as_deref()
    }

    pub fn introspect(&self, schema: &Schema) -> IntrospectedType {
        let kind = match self.composite_kind {
            CompositeKind::Object => TypeKind::OBJECT,
            CompositeKind::Interface => TypeKind::INTERFACE,
            CompositeKind::Union => TypeKind::UNION,
        };
        let fields = match self.composite_kind {
            CompositeKind::Union => None,
            _ => Some(
                self.fields
                    .values()
                    .map(|field| field.introspect(schema))
                    .collect(),
            ),
        };
        let interfaces = match self.composite_kind {
            CompositeKind::Object => Some(
                self.interfaces
                    .iter()
                    .map(|name| IntrospectedType::named_ref(TypeKind::INTERFACE, name))
                    .collect(),
            ),
            _ => None,
        };
        let possible_types = match self.composite_kind {
            CompositeKind::Object => None,
            _ => Some(
                self.possible_types
                    .iter()
                    .map(|name| IntrospectedType::named_ref(TypeKind::OBJECT, name))
                    .collect(),
            ),
        };

        IntrospectedType {
            description: self.description.clone(),
            fields,
            interfaces,
            possible_types,
            ..IntrospectedType::named_ref(kind, &self.name)
        }
    }
}

impl From<ObjectType> for GraphQLType {
    fn from(object: ObjectType) -> Self {
        GraphQLType::Object(object)
    }
}
