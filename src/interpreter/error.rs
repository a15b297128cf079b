use std::fmt;

use crate::diagnostic::{Diagnostic, Label, Span};

/// A failure raised during evaluation. Every variant carries the span of the
/// node it arose at; errors raised below the evaluator (environment
/// operations) start with a dummy span that the evaluator fills in via
/// `with_span`.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    UnresolvedName {
        name: String,
        span: Span,
    },
    DuplicateBinding {
        name: String,
        span: Span,
    },
    TypeMismatch {
        left: &'static str,
        right: &'static str,
        span: Span,
    },
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        span: Span,
    },
    NotCallable {
        kind: &'static str,
        span: Span,
    },
    NotAnObject {
        kind: &'static str,
        span: Span,
    },
    MissingKey {
        key: String,
        span: Span,
    },
    NonStringKey {
        kind: &'static str,
        span: Span,
    },
    /// An AST shape with no evaluation rule. This is an internal invariant
    /// breach, not a user error; it cannot be produced by parsed programs.
    Unevaluable {
        kind: &'static str,
        span: Span,
    },
}

impl RuntimeError {
    pub fn unresolved_name(name: impl Into<String>, span: Span) -> Self {
        Self::UnresolvedName {
            name: name.into(),
            span,
        }
    }

    pub fn duplicate_binding(name: impl Into<String>) -> Self {
        Self::DuplicateBinding {
            name: name.into(),
            span: Span::dummy(),
        }
    }

    pub fn type_mismatch(left: &'static str, right: &'static str, span: Span) -> Self {
        Self::TypeMismatch { left, right, span }
    }

    pub fn arity_mismatch(name: impl Into<String>, expected: usize, found: usize, span: Span) -> Self {
        Self::ArityMismatch {
            name: name.into(),
            expected,
            found,
            span,
        }
    }

    pub fn not_callable(kind: &'static str, span: Span) -> Self {
        Self::NotCallable { kind, span }
    }

    pub fn not_an_object(kind: &'static str, span: Span) -> Self {
        Self::NotAnObject { kind, span }
    }

    pub fn missing_key(key: impl Into<String>, span: Span) -> Self {
        Self::MissingKey {
            key: key.into(),
            span,
        }
    }

    pub fn non_string_key(kind: &'static str, span: Span) -> Self {
        Self::NonStringKey { kind, span }
    }

    pub fn unevaluable(kind: &'static str, span: Span) -> Self {
        Self::Unevaluable { kind, span }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnresolvedName { span, .. }
            | Self::DuplicateBinding { span, .. }
            | Self::TypeMismatch { span, .. }
            | Self::ArityMismatch { span, .. }
            | Self::NotCallable { span, .. }
            | Self::NotAnObject { span, .. }
            | Self::MissingKey { span, .. }
            | Self::NonStringKey { span, .. }
            | Self::Unevaluable { span, .. } => *span,
        }
    }

    /// Attaches `span` if the error was raised without one.
    pub fn with_span(mut self, span: Span) -> Self {
        let slot = match &mut self {
            Self::UnresolvedName { span, .. }
            | Self::DuplicateBinding { span, .. }
            | Self::TypeMismatch { span, .. }
            | Self::ArityMismatch { span, .. }
            | Self::NotCallable { span, .. }
            | Self::NotAnObject { span, .. }
            | Self::MissingKey { span, .. }
            | Self::NonStringKey { span, .. }
            | Self::Unevaluable { span, .. } => span,
        };
        if slot.is_dummy() {
            *slot = span;
        }
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::UnresolvedName { name, span } => {
                Diagnostic::error(format!("variable `{}` is not in scope", name))
                    .with_code("E0201")
                    .with_label(Label::primary(*span, "not found in this scope"))
            }
            Self::DuplicateBinding { name, span } => {
                Diagnostic::error(format!("cannot redeclare variable `{}`", name))
                    .with_code("E0202")
                    .with_label(Label::primary(*span, "already declared in this scope"))
            }
            Self::TypeMismatch { left, right, span } => {
                Diagnostic::error(format!("type mismatch: {} and {} are incompatible", left, right))
                    .with_code("E0203")
                    .with_label(Label::primary(*span, "expected two numbers"))
            }
            Self::ArityMismatch {
                name,
                expected,
                found,
                span,
            } => Diagnostic::error(format!(
                "argument count mismatch calling `{}`: expected {}, found {}",
                name, expected, found
            ))
            .with_code("E0204")
            .with_label(Label::primary(*span, format!("takes {} argument(s)", expected))),
            Self::NotCallable { kind, span } => {
                Diagnostic::error(format!("{} is not callable", kind))
                    .with_code("E0205")
                    .with_label(Label::primary(*span, "cannot be called"))
            }
            Self::NotAnObject { kind, span } => {
                Diagnostic::error(format!("{} is not an object", kind))
                    .with_code("E0206")
                    .with_label(Label::primary(*span, "member access needs an object"))
            }
            Self::MissingKey { key, span } => {
                Diagnostic::error(format!("no key `{}` in object", key))
                    .with_code("E0207")
                    .with_label(Label::primary(*span, "unknown key"))
            }
            Self::NonStringKey { kind, span } => {
                Diagnostic::error(format!("computed member key must be a string, found {}", kind))
                    .with_code("E0208")
                    .with_label(Label::primary(*span, ""))
            }
            Self::Unevaluable { kind, span } => {
                Diagnostic::error(format!("no evaluation rule for {} node", kind))
                    .with_code("E0209")
                    .with_label(Label::primary(*span, "internal error"))
                    .with_note("this is a bug in the interpreter, not in the evaluated program")
            }
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedName { name, .. } => {
                write!(f, "variable `{}` is not in scope", name)
            }
            Self::DuplicateBinding { name, .. } => {
                write!(f, "cannot redeclare variable `{}`", name)
            }
            Self::TypeMismatch { left, right, .. } => {
                write!(f, "type mismatch: {} and {} are incompatible", left, right)
            }
            Self::ArityMismatch {
                name,
                expected,
                found,
                ..
            } => write!(
                f,
                "argument count mismatch calling `{}`: expected {}, found {}",
                name, expected, found
            ),
            Self::NotCallable { kind, .. } => write!(f, "{} is not callable", kind),
            Self::NotAnObject { kind, .. } => write!(f, "{} is not an object", kind),
            Self::MissingKey { key, .. } => write!(f, "no key `{}` in object", key),
            Self::NonStringKey { kind, .. } => {
                write!(f, "computed member key must be a string, found {}", kind)
            }
            Self::Unevaluable { kind, .. } => write!(f, "no evaluation rule for {} node", kind),
        }
    }
}

impl std::error::Error for RuntimeError {}
