use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use indexmap::IndexMap;

use super::GraphQLType;
use crate::ast::{Type, Value};
use crate::execution::{CoercedValue, DynamicInputObject, FromCoerced, HostObject};
use crate::introspection::{IntrospectedInputValue, IntrospectedType, TypeKind};
use crate::schema::{Schema, SchemaRepository};
use crate::ResolutionError;

/// Identifies the Rust type a schema type is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostType {
    id: TypeId,
    name: &'static str,
}

impl HostType {
    pub fn of<T: 'static>() -> Self {
        HostType {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

type HostConstructor = Arc<dyn Fn() -> Box<dyn Any + Send + Sync> + Send + Sync>;
type FieldSetter = Arc<
    dyn Fn(&mut (dyn Any + Send + Sync), CoercedValue) -> Result<(), ResolutionError>
        + Send
        + Sync,
>;

#[derive(Clone)]
pub struct InputField {
    name: String,
    description: Option<String>,
    value_type: Type,
    default_value: Option<Value>,
    host_type: Option<HostType>,
    setter: FieldSetter,
}

impl InputField {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn value_type(&self) -> &Type {
        &self.value_type
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// The Rust type of the host record's member, for typed input objects.
    pub fn host_type(&self) -> Option<HostType> {
        self.host_type
    }

    pub fn assign(
        &self,
        host: &mut (dyn Any + Send + Sync),
        value: CoercedValue,
    ) -> Result<(), ResolutionError> {
        (self.setter)(host, value)
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

impl fmt::Debug for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputField")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("host_type", &self.host_type)
            .finish()
    }
}

/// An input object type. Coercion builds a fresh host record per value and
/// assigns each supplied field through the field's setter.
#[derive(Clone)]
pub struct InputObjectType {
    name: String,
    description: Option<String>,
    fields: IndexMap<String, InputField>,
    host_type: HostType,
    construct: HostConstructor,
    duplicate_field: Option<String>,
}

impl InputObjectType {
    /// An input object bound to the host record `H`.
    pub fn typed<H>(name: impl Into<String>) -> InputObjectBuilder<H>
    where
        H: Default + Send + Sync + 'static,
    {
        InputObjectBuilder {
            object: InputObjectType {
                name: name.into(),
                description: None,
                fields: IndexMap::new(),
                host_type: HostType::of::<H>(),
                construct: Arc::new(|| Box::new(H::default()) as Box<dyn Any + Send + Sync>),
                duplicate_field: None,
            },
            host: PhantomData,
        }
    }

    /// An input object whose values are collected into a [`DynamicInputObject`].
    pub fn dynamic(name: impl Into<String>) -> InputObjectBuilder<DynamicInputObject> {
        InputObjectType::typed::<DynamicInputObject>(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn fields(&self) -> impl Iterator<Item = &InputField> {
        self.fields.values()
    }

    pub fn field(&self, name: &str) -> Option<&InputField> {
        self.fields.get(name)
    }

    pub fn host_type(&self) -> HostType {
        self.host_type
    }

    pub(crate) fn duplicate_field(&self) -> Option<&str> {
        self.duplicate_field.as_deref()
    }

    /// A new host record with every member at its default.
    pub fn construct(&self) -> Box<dyn Any + Send + Sync> {
        (self.construct)()
    }

    pub fn finish(&self, host: Box<dyn Any + Send + Sync>) -> CoercedValue {
        CoercedValue::Object(HostObject::from_boxed(&self.name, host))
    }

    /// Only object literals are accepted. Fields absent from the literal keep
    /// the host record's default, unknown keys are ignored.
    pub(crate) fn coerce_literal(
        &self,
        value: &Value,
        repository: &SchemaRepository,
        depth: usize,
    ) -> Result<CoercedValue, ResolutionError> {
        if !matches!(value, Value::Object(_)) {
            return Err(ResolutionError::not_representable(&self.name, value));
        }

        let mut host = self.construct();

        for field in self.fields.values() {
            let Some(field_value) = value.object_field(&field.name) else {
                continue;
            };

            let field_type = repository
                .resolve_input_type(&field.value_type)
                .ok_or_else(|| ResolutionError::UnknownType(field.value_type.to_string()))?;
            let coerced = field_type.coerce_literal(field_value, repository, depth + 1)?;

            field.assign(host.as_mut(), coerced)?;
        }

        Ok(self.finish(host))
    }

    pub fn introspect(&self, schema: &Schema) -> IntrospectedType {
        IntrospectedType {
            description: self.description.clone(),
            input_fields: Some(
                self.fields
                    .values()
                    .map(|field| field.introspect(schema))
                    .collect(),
            ),
            ..IntrospectedType::named_ref(TypeKind::INPUT_OBJECT, &self.name)
        }
    }
}

impl fmt::Debug for InputObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputObjectType")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("host_type", &self.host_type)
            .finish()
    }
}

pub struct InputObjectBuilder<H> {
    object: InputObjectType,
    host: PhantomData<fn() -> H>,
}

impl<H> InputObjectBuilder<H>
where
    H: Send + Sync + 'static,
{
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.object.description = Some(description.into());
        self
    }

    /// Declares a field stored into the host record by `set`.
    pub fn field<T, F>(self, name: impl Into<String>, value_type: Type, set: F) -> Self
    where
        T: FromCoerced + 'static,
        F: Fn(&mut H, T) + Send + Sync + 'static,
    {
        let setter: FieldSetter = Arc::new(
            move |host: &mut (dyn Any + Send + Sync), value: CoercedValue| {
                let host = host.downcast_mut::<H>().ok_or_else(|| {
                    ResolutionError::host_conversion::<H>("a foreign host record")
                })?;
                set(host, T::from_coerced(value)?);
                Ok(())
            },
        );

        self.push_field(name.into(), value_type, Some(HostType::of::<T>()), setter)
    }

    pub fn default_value(mut self, field: &str, value: Value) -> Self {
        if let Some(field) = self.object.fields.get_mut(field) {
            field.default_value = Some(value);
        }
        self
    }

    pub fn field_description(mut self, field: &str, description: impl Into<String>) -> Self {
        if let Some(field) = self.object.fields.get_mut(field) {
            field.description = Some(description.into());
        }
        self
    }

    pub fn build(self) -> InputObjectType {
        self.object
    }

    fn push_field(
        mut self,
        name: String,
        value_type: Type,
        host_type: Option<HostType>,
        setter: FieldSetter,
    ) -> Self {
        if self.object.fields.contains_key(&name) {
            self.object.duplicate_field.get_or_insert_with(|| name.clone());
            return self;
        }

        self.object.fields.insert(
            name.clone(),
            InputField {
                name,
                description: None,
                value_type,
                default_value: None,
                host_type,
                setter,
            },
        );
        self
    }
}

impl InputObjectBuilder<DynamicInputObject> {
    /// Declares a field coerced against its schema type and stored by name.
    pub fn dynamic_field(self, name: impl Into<String>, value_type: Type) -> Self {
        let name = name.into();
        let key = name.clone();
        let setter: FieldSetter = Arc::new(
            move |host: &mut (dyn Any + Send + Sync), value: CoercedValue| {
                let host = host.downcast_mut::<DynamicInputObject>().ok_or_else(|| {
                    ResolutionError::host_conversion::<DynamicInputObject>("a foreign host record")
                })?;
                host.0.insert(key.clone(), value);
                Ok(())
            },
        );

        self.push_field(name, value_type, None, setter)
    }
}

impl<H> From<InputObjectBuilder<H>> for GraphQLType {
    fn from(builder: InputObjectBuilder<H>) -> Self {
        GraphQLType::InputObject(builder.object)
    }
}
