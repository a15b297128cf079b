use std::rc::Rc;

use crate::diagnostic::Span;
use crate::token::InfixOp;

/// How a member expression names its property: `obj.key` is `Literal`,
/// `obj[expr]` is `Computed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Literal,
    Computed,
}

/// A syntax-tree node: a kind plus the span of source text it covers. Nodes
/// are built by the parser and never mutated afterwards; every node owns its
/// children outright.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A whole parse: the ordered statement sequence of the source text.
    Program {
        body: Vec<Expr>,
    },
    /// `let name = value`
    LetDeclaration {
        identifier: Rc<str>,
        value: Box<Expr>,
    },
    /// `fun name ( params ) { body* }`
    FunDeclaration {
        name: Rc<str>,
        parameters: Vec<Rc<str>>,
        body: Vec<Expr>,
    },
    /// `left op right`; the span is always `[left.start, right.end]`.
    Infix {
        left: Box<Expr>,
        right: Box<Expr>,
        operator: InfixOp,
    },
    Identifier(Rc<str>),
    NumericLiteral(f64),
    StringLiteral(Rc<str>),
    /// One entry of an object literal. A missing value marks the shorthand
    /// form, resolved by scope lookup of `key` at evaluation time. Only ever
    /// constructed inside an `ObjectLiteral`.
    Property {
        key: Rc<str>,
        value: Option<Box<Expr>>,
    },
    ObjectLiteral {
        properties: Vec<Expr>,
    },
    Call {
        caller: Box<Expr>,
        args: Vec<Expr>,
    },
    Member {
        object: Box<Expr>,
        property: Box<Expr>,
        kind: MemberKind,
    },
}

impl ExprKind {
    /// The node's tag, for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ExprKind::Program { .. } => "Program",
            ExprKind::LetDeclaration { .. } => "LetDeclaration",
            ExprKind::FunDeclaration { .. } => "FunDeclaration",
            ExprKind::Infix { .. } => "InfixExpr",
            ExprKind::Identifier(_) => "Identifier",
            ExprKind::NumericLiteral(_) => "NumericLiteral",
            ExprKind::StringLiteral(_) => "StringLiteral",
            ExprKind::Property { .. } => "Property",
            ExprKind::ObjectLiteral { .. } => "ObjectLiteral",
            ExprKind::Call { .. } => "CallExpr",
            ExprKind::Member { .. } => "MemberExpr",
        }
    }
}
