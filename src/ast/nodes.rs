use std::fmt;

use serde::Serialize;

/// Line and column of a node in the source text, both 1-indexed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

impl From<graphql_parser::Pos> for Pos {
    fn from(pos: graphql_parser::Pos) -> Self {
        Pos {
            line: pos.line,
            column: pos.column,
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AstNodeKind {
    Document,
    OperationDefinition,
    SelectionSet,
    Field,
    FragmentSpread,
    FragmentDefinition,
    InlineFragment,
    Directive,
    Argument,
    VariableDefinition,
    NamedType,
    ListType,
    NonNullType,
    Variable,
    IntValue,
    FloatValue,
    StringValue,
    BooleanValue,
    EnumValue,
    NullValue,
    ListValue,
    ObjectValue,
}

/// Every node of the tree reports its kind tag.
pub trait AstNode {
    fn kind(&self) -> AstNodeKind;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub definitions: Vec<Definition>,
}

impl Document {
    pub fn operations(&self) -> impl Iterator<Item = &OperationDefinition> {
        self.definitions.iter().filter_map(|definition| match definition {
            Definition::Operation(operation) => Some(operation),
            Definition::Fragment(_) => None,
        })
    }

    pub fn fragments(&self) -> impl Iterator<Item = &FragmentDefinition> {
        self.definitions.iter().filter_map(|definition| match definition {
            Definition::Fragment(fragment) => Some(fragment),
            Definition::Operation(_) => None,
        })
    }

    /// Finds an operation by name, or the only operation when `name` is `None`.
    pub fn operation(&self, name: Option<&str>) -> Option<&OperationDefinition> {
        match name {
            Some(name) => self
                .operations()
                .find(|operation| operation.name.as_deref() == Some(name)),
            None => {
                let mut operations = self.operations();
                let first = operations.next();

                match operations.next() {
                    Some(_) => None,
                    None => first,
                }
            }
        }
    }
}

impl AstNode for Document {
    fn kind(&self) -> AstNodeKind {
        AstNodeKind::Document
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    Operation(OperationDefinition),
    Fragment(FragmentDefinition),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Query => "query",
            OperationType::Mutation => "mutation",
            OperationType::Subscription => "subscription",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperationType {
    type Err = crate::ResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "query" => Ok(OperationType::Query),
            "mutation" => Ok(OperationType::Mutation),
            "subscription" => Ok(OperationType::Subscription),
            other => Err(crate::ResolutionError::UnsupportedOperationKind(
                other.to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationDefinition {
    pub position: Pos,
    pub operation_type: OperationType,
    pub name: Option<String>,
    pub variable_definitions: Vec<VariableDefinition>,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
}

impl AstNode for OperationDefinition {
    fn kind(&self) -> AstNodeKind {
        AstNodeKind::OperationDefinition
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSet {
    pub position: Pos,
    pub items: Vec<Selection>,
}

impl SelectionSet {
    pub fn selections(&self) -> std::slice::Iter<'_, Selection> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl AstNode for SelectionSet {
    fn kind(&self) -> AstNodeKind {
        AstNodeKind::SelectionSet
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Field(Field),
    FragmentSpread(FragmentSpread),
    InlineFragment(InlineFragment),
}

impl AstNode for Selection {
    fn kind(&self) -> AstNodeKind {
        match self {
            Selection::Field(_) => AstNodeKind::Field,
            Selection::FragmentSpread(_) => AstNodeKind::FragmentSpread,
            Selection::InlineFragment(_) => AstNodeKind::InlineFragment,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub position: Pos,
    pub alias: Option<String>,
    pub name: String,
    pub arguments: Vec<Argument>,
    pub directives: Vec<Directive>,
    /// `None` for a leaf selection such as `{ name }`.
    pub selection_set: Option<SelectionSet>,
}

impl Field {
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

impl AstNode for Field {
    fn kind(&self) -> AstNodeKind {
        AstNodeKind::Field
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FragmentSpread {
    pub position: Pos,
    pub fragment_name: String,
    pub directives: Vec<Directive>,
}

impl AstNode for FragmentSpread {
    fn kind(&self) -> AstNodeKind {
        AstNodeKind::FragmentSpread
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FragmentDefinition {
    pub position: Pos,
    pub name: String,
    pub type_condition: String,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
}

impl AstNode for FragmentDefinition {
    fn kind(&self) -> AstNodeKind {
        AstNodeKind::FragmentDefinition
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InlineFragment {
    pub position: Pos,
    pub type_condition: Option<String>,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
}

impl AstNode for InlineFragment {
    fn kind(&self) -> AstNodeKind {
        AstNodeKind::InlineFragment
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub position: Pos,
    pub name: String,
    pub arguments: Vec<Argument>,
}

impl AstNode for Directive {
    fn kind(&self) -> AstNodeKind {
        AstNodeKind::Directive
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: String,
    pub value: Value,
}

impl AstNode for Argument {
    fn kind(&self) -> AstNodeKind {
        AstNodeKind::Argument
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefinition {
    pub position: Pos,
    pub name: String,
    pub var_type: Type,
    pub default_value: Option<Value>,
}

impl AstNode for VariableDefinition {
    fn kind(&self) -> AstNodeKind {
        AstNodeKind::VariableDefinition
    }
}

/// A type expression as written in a document, e.g. `[Int!]!`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    NamedType(String),
    ListType(Box<Type>),
    NonNullType(Box<Type>),
}

impl Type {
    pub fn named(name: impl Into<String>) -> Self {
        Type::NamedType(name.into())
    }

    pub fn list(of_type: Type) -> Self {
        Type::ListType(Box::new(of_type))
    }

    pub fn non_null(of_type: Type) -> Self {
        Type::NonNullType(Box::new(of_type))
    }

    pub fn inner_type(&self) -> &str {
        match self {
            Type::NamedType(name) => name,
            Type::ListType(child) | Type::NonNullType(child) => child.inner_type(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, Type::NonNullType(_))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::NamedType(name) => f.write_str(name),
            Type::ListType(child) => write!(f, "[{}]", child),
            Type::NonNullType(child) => write!(f, "{}!", child),
        }
    }
}

impl AstNode for Type {
    fn kind(&self) -> AstNodeKind {
        match self {
            Type::NamedType(_) => AstNodeKind::NamedType,
            Type::ListType(_) => AstNodeKind::ListType,
            Type::NonNullType(_) => AstNodeKind::NonNullType,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Variable(String),
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Enum(String),
    Null,
    List(Vec<Value>),
    Object(Vec<(String, Value)>),
}

impl Value {
    pub fn object_field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Object(fields) => fields
                .iter()
                .find(|(field_name, _)| field_name == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl AstNode for Value {
    fn kind(&self) -> AstNodeKind {
        match self {
            Value::Variable(_) => AstNodeKind::Variable,
            Value::Int(_) => AstNodeKind::IntValue,
            Value::Float(_) => AstNodeKind::FloatValue,
            Value::String(_) => AstNodeKind::StringValue,
            Value::Boolean(_) => AstNodeKind::BooleanValue,
            Value::Enum(_) => AstNodeKind::EnumValue,
            Value::Null => AstNodeKind::NullValue,
            Value::List(_) => AstNodeKind::ListValue,
            Value::Object(_) => AstNodeKind::ObjectValue,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Variable(name) => write!(f, "${}", name),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{:?}", v),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Enum(v) => f.write_str(v),
            Value::Null => f.write_str("null"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Object(fields) => {
                f.write_str("{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

#[test]
fn type_expression_display() {
    let t = Type::non_null(Type::list(Type::non_null(Type::named("Int"))));

    assert_eq!(t.to_string(), "[Int!]!");
    assert_eq!(t.inner_type(), "Int");
    assert_eq!(t.kind(), AstNodeKind::NonNullType);
}

#[test]
fn value_kinds() {
    assert_eq!(Value::Null.kind(), AstNodeKind::NullValue);
    assert_eq!(Value::Variable("a".into()).kind(), AstNodeKind::Variable);
    assert_eq!(
        Value::Object(vec![("x".into(), Value::Int(1))]).kind(),
        AstNodeKind::ObjectValue
    );
    assert_eq!(
        Value::List(vec![Value::Int(1), Value::Enum("RED".into())]).to_string(),
        "[1, RED]"
    );
}
