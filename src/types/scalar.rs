use crate::ast::Value;
use crate::execution::{CoercedValue, VariableValue};
use crate::introspection::{IntrospectedType, TypeKind};
use crate::ResolutionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Int,
    Float,
    String,
    Boolean,
    Id,
    /// Accepts any scalar literal unchanged.
    Custom,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarType {
    name: String,
    description: Option<String>,
    scalar_kind: ScalarKind,
}

impl ScalarType {
    pub fn int() -> Self {
        ScalarType::builtin(
            "Int",
            "The `Int` scalar type represents non-fractional signed whole numeric values.",
            ScalarKind::Int,
        )
    }

    pub fn float() -> Self {
        ScalarType::builtin(
            "Float",
            "The `Float` scalar type represents signed double-precision fractional values.",
            ScalarKind::Float,
        )
    }

    pub fn string() -> Self {
        ScalarType::builtin(
            "String",
            "The `String` scalar type represents textual data, represented as UTF-8 character sequences.",
            ScalarKind::String,
        )
    }

    pub fn boolean() -> Self {
        ScalarType::builtin(
            "Boolean",
            "The `Boolean` scalar type represents `true` or `false`.",
            ScalarKind::Boolean,
        )
    }

    pub fn id() -> Self {
        ScalarType::builtin(
            "ID",
            "The `ID` scalar type represents a unique identifier.",
            ScalarKind::Id,
        )
    }

    pub fn custom(name: impl Into<String>) -> Self {
        ScalarType {
            name: name.into(),
            description: None,
            scalar_kind: ScalarKind::Custom,
        }
    }

    fn builtin(name: &str, description: &str, scalar_kind: ScalarKind) -> Self {
        ScalarType {
            name: name.to_string(),
            description: Some(description.to_string()),
            scalar_kind,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn scalar_kind(&self) -> ScalarKind {
        self.scalar_kind
    }

    /// Coerces a literal written in a document.
    pub fn parse_literal(&self, value: &Value) -> Result<CoercedValue, ResolutionError> {
        let coerced = match (self.scalar_kind, value) {
            (_, Value::Null) => Some(CoercedValue::Null),
            (ScalarKind::Int, Value::Int(i)) => int_in_range(*i),
            (ScalarKind::Float, Value::Int(i)) => Some(CoercedValue::Float(*i as f64)),
            (ScalarKind::Float, Value::Float(f)) => Some(CoercedValue::Float(*f)),
            (ScalarKind::String, Value::String(s)) => Some(CoercedValue::String(s.clone())),
            (ScalarKind::Boolean, Value::Boolean(b)) => Some(CoercedValue::Boolean(*b)),
            (ScalarKind::Id, Value::String(s)) => Some(CoercedValue::String(s.clone())),
            (ScalarKind::Id, Value::Int(i)) => Some(CoercedValue::String(i.to_string())),
            (ScalarKind::Custom, Value::Int(i)) => Some(CoercedValue::Int(*i)),
            (ScalarKind::Custom, Value::Float(f)) => Some(CoercedValue::Float(*f)),
            (ScalarKind::Custom, Value::String(s)) | (ScalarKind::Custom, Value::Enum(s)) => {
                Some(CoercedValue::String(s.clone()))
            }
            (ScalarKind::Custom, Value::Boolean(b)) => Some(CoercedValue::Boolean(*b)),
            _ => None,
        };

        coerced.ok_or_else(|| ResolutionError::not_representable(&self.name, value))
    }

    /// Coerces a value supplied as a request variable.
    pub fn parse_value(&self, value: &VariableValue) -> Result<CoercedValue, ResolutionError> {
        let coerced = match (self.scalar_kind, value) {
            (_, VariableValue::Null) => Some(CoercedValue::Null),
            (ScalarKind::Int, VariableValue::Int(i)) => int_in_range(*i),
            (ScalarKind::Int, VariableValue::Float(f)) if f.fract() == 0.0 => {
                int_in_range(*f as i64)
            }
            (ScalarKind::Float, VariableValue::Int(i)) => Some(CoercedValue::Float(*i as f64)),
            (ScalarKind::Float, VariableValue::Float(f)) => Some(CoercedValue::Float(*f)),
            (ScalarKind::String, VariableValue::String(s)) => Some(CoercedValue::String(s.clone())),
            (ScalarKind::Boolean, VariableValue::Boolean(b)) => Some(CoercedValue::Boolean(*b)),
            (ScalarKind::Id, VariableValue::String(s)) => Some(CoercedValue::String(s.clone())),
            (ScalarKind::Id, VariableValue::Int(i)) => Some(CoercedValue::String(i.to_string())),
            (ScalarKind::Custom, VariableValue::Int(i)) => Some(CoercedValue::Int(*i)),
            (ScalarKind::Custom, VariableValue::Float(f)) => Some(CoercedValue::Float(*f)),
            (ScalarKind::Custom, VariableValue::String(s)) => Some(CoercedValue::String(s.clone())),
            (ScalarKind::Custom, VariableValue::Boolean(b)) => Some(CoercedValue::Boolean(*b)),
            _ => None,
        };

        coerced.ok_or_else(|| ResolutionError::not_representable(&self.name, value))
    }

    pub fn introspect(&self) -> IntrospectedType {
        IntrospectedType {
            description: self.description.clone(),
            ..IntrospectedType::named_ref(TypeKind::SCALAR, &self.name)
        }
    }
}

// Int is a signed 32-bit integer
fn int_in_range(value: i64) -> Option<CoercedValue> {
    i32::try_from(value).ok().map(|v| CoercedValue::Int(v as i64))
}

#[test]
fn literals_matching_the_scalar_are_accepted() {
    assert_eq!(ScalarType::int().parse_literal(&Value::Int(7)), Ok(CoercedValue::Int(7)));
    assert_eq!(
        ScalarType::float().parse_literal(&Value::Int(2)),
        Ok(CoercedValue::Float(2.0))
    );
    assert_eq!(
        ScalarType::id().parse_literal(&Value::Int(42)),
        Ok(CoercedValue::String("42".to_string()))
    );
    assert_eq!(
        ScalarType::boolean().parse_literal(&Value::Null),
        Ok(CoercedValue::Null)
    );
    assert_eq!(
        ScalarType::custom("Date").parse_literal(&Value::String("2020-01-01".to_string())),
        Ok(CoercedValue::String("2020-01-01".to_string()))
    );
}

#[test]
fn literals_of_another_kind_are_rejected() {
    assert_eq!(
        ScalarType::int().parse_literal(&Value::String("abc".to_string())),
        Err(ResolutionError::not_representable("Int", "\"abc\""))
    );
    assert!(ScalarType::int().parse_literal(&Value::Int(i64::from(i32::MAX) + 1)).is_err());
    assert!(ScalarType::string().parse_literal(&Value::Int(1)).is_err());
    assert!(ScalarType::boolean().parse_literal(&Value::Enum("TRUE".to_string())).is_err());
    assert!(ScalarType::custom("Json").parse_literal(&Value::List(vec![])).is_err());
}

#[test]
fn variable_values_are_converted() {
    assert_eq!(
        ScalarType::int().parse_value(&VariableValue::Float(3.0)),
        Ok(CoercedValue::Int(3))
    );
    assert!(ScalarType::int().parse_value(&VariableValue::Float(3.5)).is_err());
    assert_eq!(
        ScalarType::float().parse_value(&VariableValue::Int(1)),
        Ok(CoercedValue::Float(1.0))
    );
    assert!(ScalarType::string().parse_value(&VariableValue::Boolean(true)).is_err());
}

#[test]
fn builtins_introspect_as_scalars() {
    let introspected = ScalarType::string().introspect();

    assert_eq!(introspected.kind, TypeKind::SCALAR);
    assert_eq!(introspected.name.as_deref(), Some("String"));
    assert!(introspected.description.is_some());
    assert_eq!(introspected.fields, None);
}
