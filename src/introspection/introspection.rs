#![allow(non_camel_case_types)]

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Result;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    SCALAR,
    OBJECT,
    INTERFACE,
    UNION,
    ENUM,
    INPUT_OBJECT,
    LIST,
    NON_NULL,
}

/// Client facing description of one schema type.
#[serde_with::skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IntrospectedType {
    pub kind: TypeKind,
    pub name: Option<String>,
    pub description: Option<String>,
    pub fields: Option<Vec<IntrospectedField>>,
    pub interfaces: Option<Vec<IntrospectedType>>,
    #[serde(rename = "possibleTypes")]
    pub possible_types: Option<Vec<IntrospectedType>>,
    #[serde(rename = "enumValues")]
    pub enum_values: Option<Vec<IntrospectedEnumValue>>,
    #[serde(rename = "inputFields")]
    pub input_fields: Option<Vec<IntrospectedInputValue>>,
    #[serde(rename = "ofType")]
    pub of_type: Option<Box<IntrospectedType>>,
}

impl IntrospectedType {
    pub fn new(kind: TypeKind) -> Self {
        IntrospectedType {
            kind,
            name: None,
            description: None,
            fields: None,
            interfaces: None,
            possible_types: None,
            enum_values: None,
            input_fields: None,
            of_type: None,
        }
    }

    /// A reference to a named type, without its members.
    pub fn named_ref(kind: TypeKind, name: &str) -> Self {
        IntrospectedType {
            name: Some(name.to_string()),
            ..IntrospectedType::new(kind)
        }
    }

    pub fn wrapping(kind: TypeKind, of_type: IntrospectedType) -> Self {
        IntrospectedType {
            of_type: Some(Box::new(of_type)),
            ..IntrospectedType::new(kind)
        }
    }
}

#[serde_with::skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IntrospectedField {
    pub name: String,
    pub description: Option<String>,
    pub args: Vec<IntrospectedInputValue>,
    #[serde(rename = "type")]
    pub type_ref: IntrospectedType,
}

#[serde_with::skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IntrospectedInputValue {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub type_ref: IntrospectedType,
    #[serde(rename = "defaultValue")]
    pub default_value: Option<String>,
}

#[serde_with::skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IntrospectedEnumValue {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "isDeprecated")]
    pub is_deprecated: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveLocation {
    QUERY,
    MUTATION,
    SUBSCRIPTION,
    FIELD,
    FRAGMENT_DEFINITION,
    FRAGMENT_SPREAD,
    INLINE_FRAGMENT,
    VARIABLE_DEFINITION,
    /** Type System Definitions */
    SCHEMA,
    SCALAR,
    OBJECT,
    FIELD_DEFINITION,
    ARGUMENT_DEFINITION,
    INTERFACE,
    UNION,
    ENUM,
    ENUM_VALUE,
    INPUT_OBJECT,
    INPUT_FIELD_DEFINITION,
}

impl DirectiveLocation {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "QUERY" => DirectiveLocation::QUERY,
            "MUTATION" => DirectiveLocation::MUTATION,
            "SUBSCRIPTION" => DirectiveLocation::SUBSCRIPTION,
            "FIELD" => DirectiveLocation::FIELD,
            "FRAGMENT_DEFINITION" => DirectiveLocation::FRAGMENT_DEFINITION,
            "FRAGMENT_SPREAD" => DirectiveLocation::FRAGMENT_SPREAD,
            "INLINE_FRAGMENT" => DirectiveLocation::INLINE_FRAGMENT,
            "VARIABLE_DEFINITION" => DirectiveLocation::VARIABLE_DEFINITION,
            "SCHEMA" => DirectiveLocation::SCHEMA,
            "SCALAR" => DirectiveLocation::SCALAR,
            "OBJECT" => DirectiveLocation::OBJECT,
            "FIELD_DEFINITION" => DirectiveLocation::FIELD_DEFINITION,
            "ARGUMENT_DEFINITION" => DirectiveLocation::ARGUMENT_DEFINITION,
            "INTERFACE" => DirectiveLocation::INTERFACE,
            "UNION" => DirectiveLocation::UNION,
            "ENUM" => DirectiveLocation::ENUM,
            "ENUM_VALUE" => DirectiveLocation::ENUM_VALUE,
            "INPUT_OBJECT" => DirectiveLocation::INPUT_OBJECT,
            "INPUT_FIELD_DEFINITION" => DirectiveLocation::INPUT_FIELD_DEFINITION,
            _ => return None,
        })
    }
}

#[serde_with::skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IntrospectedDirective {
    pub name: String,
    pub description: Option<String>,
    pub locations: Vec<DirectiveLocation>,
    pub args: Vec<IntrospectedInputValue>,
}

#[serde_with::skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IntrospectedSchema {
    #[serde(rename = "queryType")]
    pub query_type: IntrospectedType,
    #[serde(rename = "mutationType")]
    pub mutation_type: Option<IntrospectedType>,
    #[serde(rename = "subscriptionType")]
    pub subscription_type: Option<IntrospectedType>,
    pub types: Vec<IntrospectedType>,
    pub directives: Vec<IntrospectedDirective>,
}

pub fn parse_introspection<R>(input: R) -> Result<IntrospectedSchema>
where
    R: io::Read,
{
    serde_json::from_reader::<R, IntrospectedSchema>(input)
}

pub fn parse_introspected_type<R>(input: R) -> Result<IntrospectedType>
where
    R: io::Read,
{
    serde_json::from_reader::<R, IntrospectedType>(input)
}

#[test]
fn wrapper_types_serialize_without_empty_members() {
    let list = IntrospectedType::wrapping(
        TypeKind::LIST,
        IntrospectedType::named_ref(TypeKind::SCALAR, "Int"),
    );

    assert_eq!(
        serde_json::to_string(&list).expect("failed to serialize"),
        r#"{"kind":"LIST","ofType":{"kind":"SCALAR","name":"Int"}}"#
    );
}

#[test]
fn parses_schema_descriptor() {
    let json = r#"{
      "queryType": { "kind": "OBJECT", "name": "Query" },
      "types": [
        { "kind": "SCALAR", "name": "Int" },
        { "kind": "ENUM", "name": "Color", "enumValues": [{ "name": "RED", "isDeprecated": false }] }
      ],
      "directives": [
        { "name": "skip", "locations": ["FIELD", "INLINE_FRAGMENT"], "args": [] }
      ]
    }"#;

    let schema = parse_introspection(json.as_bytes()).expect("failed to parse introspection json");

    assert_eq!(schema.query_type.name.as_deref(), Some("Query"));
    assert_eq!(schema.mutation_type, None);
    assert_eq!(schema.types[1].kind, TypeKind::ENUM);
    assert_eq!(
        schema.directives[0].locations,
        vec![DirectiveLocation::FIELD, DirectiveLocation::INLINE_FRAGMENT]
    );
}
