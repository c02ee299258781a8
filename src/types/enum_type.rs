use crate::ast::Value;
use crate::execution::{CoercedValue, VariableValue};
use crate::introspection::{IntrospectedEnumValue, IntrospectedType, TypeKind};
use crate::ResolutionError;

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    name: String,
    description: Option<String>,
    values: Vec<EnumValue>,
}

impl EnumType {
    pub fn new(name: impl Into<String>) -> Self {
        EnumType {
            name: name.into(),
            description: None,
            values: vec![],
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn value(mut self, name: impl Into<String>, description: Option<String>) -> Self {
        self.values.push(EnumValue {
            name: name.into(),
            description,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn values(&self) -> &[EnumValue] {
        &self.values
    }

    pub fn has_value(&self, name: &str) -> bool {
        self.values.iter().any(|value| value.name == name)
    }

    pub fn parse_literal(&self, value: &Value) -> Result<CoercedValue, ResolutionError> {
        match value {
            Value::Null => Ok(CoercedValue::Null),
            Value::Enum(name) if self.has_value(name) => Ok(CoercedValue::Enum(name.clone())),
            other => Err(ResolutionError::not_representable(&self.name, other)),
        }
    }

    /// Variables carry enum values as strings.
    pub fn parse_value(&self, value: &VariableValue) -> Result<CoercedValue, ResolutionError> {
        match value {
            VariableValue::Null => Ok(CoercedValue::Null),
            VariableValue::String(name) if self.has_value(name) => {
                Ok(CoercedValue::Enum(name.clone()))
            }
            other => Err(ResolutionError::not_representable(&self.name, other)),
        }
    }

    pub fn introspect(&self) -> IntrospectedType {
        IntrospectedType {
            description: self.description.clone(),
            enum_values: Some(
                self.values
                    .iter()
                    .map(|value| IntrospectedEnumValue {
                        name: value.name.clone(),
                        description: value.description.clone(),
                        is_deprecated: false,
                    })
                    .collect(),
            ),
            ..IntrospectedType::named_ref(TypeKind::ENUM, &self.name)
        }
    }
}

#[test]
fn accepts_declared_values_only() {
    let color = EnumType::new("Color").value("RED", None).value("GREEN", None);

    assert_eq!(
        color.parse_literal(&Value::Enum("RED".to_string())),
        Ok(CoercedValue::Enum("RED".to_string()))
    );
    assert!(color.parse_literal(&Value::Enum("BLUE".to_string())).is_err());
    assert!(color.parse_literal(&Value::String("RED".to_string())).is_err());
    assert_eq!(
        color.parse_value(&VariableValue::String("GREEN".to_string())),
        Ok(CoercedValue::Enum("GREEN".to_string()))
    );
}
