use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::ResolutionError;

/// A value coerced against a schema type, ready for execution.
#[derive(Debug, Clone, PartialEq)]
pub enum CoercedValue {
    Null,
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Enum(String),
    List(Vec<CoercedValue>),
    Object(HostObject),
}

impl CoercedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CoercedValue::Null)
    }

    pub fn as_list(&self) -> Option<&[CoercedValue]> {
        match self {
            CoercedValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HostObject> {
        match self {
            CoercedValue::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Takes the host record out of an input object value.
    pub fn into_host<H>(self) -> Result<H, ResolutionError>
    where
        H: Any + Clone,
    {
        match &self {
            CoercedValue::Object(object) => object
                .downcast_ref::<H>()
                .cloned()
                .ok_or_else(|| ResolutionError::host_conversion::<H>(object.type_name())),
            other => Err(ResolutionError::host_conversion::<H>(other)),
        }
    }
}

impl fmt::Display for CoercedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoercedValue::Null => f.write_str("null"),
            CoercedValue::Int(v) => write!(f, "{}", v),
            CoercedValue::Float(v) => write!(f, "{}", v),
            CoercedValue::String(v) => write!(f, "{:?}", v),
            CoercedValue::Boolean(v) => write!(f, "{}", v),
            CoercedValue::Enum(v) => f.write_str(v),
            CoercedValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            CoercedValue::Object(object) => write!(f, "{} {{...}}", object.type_name()),
        }
    }
}

/// The host record built for an input object.
///
/// Typed input objects hold the user's record type; SDL-built ones hold a
/// [`DynamicInputObject`].
#[derive(Clone)]
pub struct HostObject {
    type_name: String,
    value: Arc<dyn Any + Send + Sync>,
}

impl HostObject {
    pub fn new<H>(type_name: impl Into<String>, value: H) -> Self
    where
        H: Any + Send + Sync,
    {
        HostObject {
            type_name: type_name.into(),
            value: Arc::new(value),
        }
    }

    pub(crate) fn from_boxed(type_name: &str, value: Box<dyn Any + Send + Sync>) -> Self {
        HostObject {
            type_name: type_name.to_string(),
            value: Arc::from(value),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn downcast_ref<H: Any>(&self) -> Option<&H> {
        self.value.downcast_ref::<H>()
    }

    pub fn as_dynamic(&self) -> Option<&DynamicInputObject> {
        self.downcast_ref::<DynamicInputObject>()
    }
}

impl fmt::Debug for HostObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_dynamic() {
            Some(dynamic) => f
                .debug_tuple(&self.type_name)
                .field(&dynamic.0)
                .finish(),
            None => write!(f, "{}(..)", self.type_name),
        }
    }
}

impl PartialEq for HostObject {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.value, &other.value) {
            return true;
        }

        match (self.as_dynamic(), other.as_dynamic()) {
            (Some(a), Some(b)) => self.type_name == other.type_name && a == b,
            _ => false,
        }
    }
}

/// Host record of an input object registered without a Rust type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicInputObject(pub IndexMap<String, CoercedValue>);

impl DynamicInputObject {
    pub fn get(&self, name: &str) -> Option<&CoercedValue> {
        self.0.get(name)
    }
}

/// Conversion of a coerced value into the type of a host record field.
pub trait FromCoerced: Sized {
    fn from_coerced(value: CoercedValue) -> Result<Self, ResolutionError>;
}

impl FromCoerced for CoercedValue {
    fn from_coerced(value: CoercedValue) -> Result<Self, ResolutionError> {
        Ok(value)
    }
}

impl FromCoerced for HostObject {
    fn from_coerced(value: CoercedValue) -> Result<Self, ResolutionError> {
        match value {
            CoercedValue::Object(object) => Ok(object),
            other => Err(ResolutionError::host_conversion::<HostObject>(other)),
        }
    }
}

impl FromCoerced for i64 {
    fn from_coerced(value: CoercedValue) -> Result<Self, ResolutionError> {
        match value {
            CoercedValue::Int(i) => Ok(i),
            other => Err(ResolutionError::host_conversion::<i64>(other)),
        }
    }
}

impl FromCoerced for i32 {
    fn from_coerced(value: CoercedValue) -> Result<Self, ResolutionError> {
        match value {
            CoercedValue::Int(i) => {
                i32::try_from(i).map_err(|_| ResolutionError::host_conversion::<i32>(i))
            }
            other => Err(ResolutionError::host_conversion::<i32>(other)),
        }
    }
}

impl FromCoerced for f64 {
    fn from_coerced(value: CoercedValue) -> Result<Self, ResolutionError> {
        match value {
            CoercedValue::Float(f) => Ok(f),
            CoercedValue::Int(i) => Ok(i as f64),
            other => Err(ResolutionError::host_conversion::<f64>(other)),
        }
    }
}

impl FromCoerced for bool {
    fn from_coerced(value: CoercedValue) -> Result<Self, ResolutionError> {
        match value {
            CoercedValue::Boolean(b) => Ok(b),
            other => Err(ResolutionError::host_conversion::<bool>(other)),
        }
    }
}

impl FromCoerced for String {
    fn from_coerced(value: CoercedValue) -> Result<Self, ResolutionError> {
        match value {
            CoercedValue::String(s) | CoercedValue::Enum(s) => Ok(s),
            other => Err(ResolutionError::host_conversion::<String>(other)),
        }
    }
}

impl<T: FromCoerced> FromCoerced for Option<T> {
    fn from_coerced(value: CoercedValue) -> Result<Self, ResolutionError> {
        match value {
            CoercedValue::Null => Ok(None),
            other => T::from_coerced(other).map(Some),
        }
    }
}

impl<T: FromCoerced> FromCoerced for Vec<T> {
    fn from_coerced(value: CoercedValue) -> Result<Self, ResolutionError> {
        match value {
            CoercedValue::List(items) => items.into_iter().map(T::from_coerced).collect(),
            other => Ok(vec![T::from_coerced(other)?]),
        }
    }
}

/// A nested input object's host record, taken out of its coerced value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Host<H>(pub H);

impl<H: Any + Clone> FromCoerced for Host<H> {
    fn from_coerced(value: CoercedValue) -> Result<Self, ResolutionError> {
        value.into_host::<H>().map(Host)
    }
}

#[test]
fn converts_into_host_types() {
    assert_eq!(f64::from_coerced(CoercedValue::Int(3)), Ok(3.0));
    assert_eq!(
        Option::<i32>::from_coerced(CoercedValue::Null),
        Ok(None::<i32>)
    );
    assert_eq!(
        Vec::<String>::from_coerced(CoercedValue::List(vec![
            CoercedValue::String("a".to_string()),
            CoercedValue::Enum("B".to_string()),
        ])),
        Ok(vec!["a".to_string(), "B".to_string()])
    );
    assert!(i32::from_coerced(CoercedValue::Int(i64::MAX)).is_err());
    assert!(bool::from_coerced(CoercedValue::String("true".to_string())).is_err());
}

#[test]
fn host_objects_downcast() {
    #[derive(Debug, Clone, PartialEq)]
    struct Point {
        x: i32,
    }

    let value = CoercedValue::Object(HostObject::new("Point", Point { x: 4 }));

    assert_eq!(value.clone().into_host::<Point>(), Ok(Point { x: 4 }));
    assert_eq!(value, value.clone());
    assert!(value.into_host::<String>().is_err());
}
