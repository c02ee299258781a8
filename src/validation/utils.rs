use serde::Serialize;

use crate::ast::{AstNode, AstNodeKind, Pos};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValidationErrorKind {
    LeafWithSubselection,
    CompositeRequiresSubselection,
    UnknownField,
}

/// The offending node of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeRef {
    pub kind: AstNodeKind,
    pub position: Pos,
}

impl NodeRef {
    pub fn new<N: AstNode>(node: &N, position: Pos) -> Self {
        NodeRef {
            kind: node.kind(),
            position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub message: String,
    pub nodes: Vec<NodeRef>,
}

impl ValidationError {
    pub fn locations(&self) -> Vec<Pos> {
        self.nodes.iter().map(|node| node.position).collect()
    }
}

pub struct ValidationErrorContext {
    pub errors: Vec<ValidationError>,
}

impl ValidationErrorContext {
    pub fn new() -> ValidationErrorContext {
        ValidationErrorContext { errors: vec![] }
    }

    pub fn report_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }
}

impl Default for ValidationErrorContext {
    fn default() -> Self {
        ValidationErrorContext::new()
    }
}
