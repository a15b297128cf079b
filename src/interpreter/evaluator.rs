use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

use super::environment::Environment;
use super::error::RuntimeError;
use super::parser::{self, TokenParser};
use crate::ast::{Expr, ExprKind, MemberKind};
use crate::diagnostic::{Diagnostic, Span};
use crate::lexer;
use crate::token::InfixOp;
use crate::value::{Function, Value};

/// Reduces one node to a value.
///
/// The environment is threaded explicitly: every case returns the value it
/// produced together with the environment the *next* sibling must evaluate
/// against. Declarations are the reason — `let` and `fun` have to be visible
/// to the statements after them without any hidden global state. From the
/// caller's perspective the input environment is never mutated out from
/// under it.
pub fn evaluate(node: &Expr, env: Environment) -> Result<(Value, Environment), RuntimeError> {
    match &node.kind {
        ExprKind::NumericLiteral(value) => Ok((Value::Number(*value), env)),
        ExprKind::StringLiteral(value) => Ok((Value::String(value.clone()), env)),
        ExprKind::Identifier(symbol) => eval_identifier(symbol, node.span, env),
        ExprKind::Infix {
            left,
            right,
            operator,
        } => eval_infix_expr(left, right, *operator, node.span, env),
        ExprKind::ObjectLiteral { properties } => eval_object_literal(properties, env),
        ExprKind::LetDeclaration { identifier, value } => {
            eval_let_declaration(identifier, value, node.span, env)
        }
        ExprKind::FunDeclaration {
            name,
            parameters,
            body,
        } => eval_fun_declaration(name, parameters, body, node.span, env),
        ExprKind::Call { caller, args } => eval_call_expr(caller, args, env),
        ExprKind::Member {
            object,
            property,
            kind,
        } => eval_member_expr(object, property, *kind, env),
        ExprKind::Program { body } => eval_program(body, env),
        // Property nodes only make sense inside an object literal; reaching
        // one here means the tree was built by hand, not by the parser.
        ExprKind::Property { .. } => Err(RuntimeError::unevaluable(node.kind.name(), node.span)),
    }
}

fn eval_identifier(
    symbol: &str,
    span: Span,
    env: Environment,
) -> Result<(Value, Environment), RuntimeError> {
    let value = env
        .lookup(symbol)
        .ok_or_else(|| RuntimeError::unresolved_name(symbol, span))?;
    Ok((value, env))
}

fn eval_infix_expr(
    left: &Expr,
    right: &Expr,
    operator: InfixOp,
    span: Span,
    env: Environment,
) -> Result<(Value, Environment), RuntimeError> {
    let (lhs, env) = evaluate(left, env)?;
    let (rhs, env) = evaluate(right, env)?;

    match (lhs, rhs) {
        (Value::Number(lhs), Value::Number(rhs)) => {
            Ok((Value::Number(eval_numeric_op(lhs, rhs, operator)), env))
        }
        (lhs, rhs) => Err(RuntimeError::type_mismatch(
            lhs.type_name(),
            rhs.type_name(),
            span,
        )),
    }
}

/// `^` is bitwise XOR on truncated operands, not exponentiation; division by
/// zero follows IEEE float semantics.
fn eval_numeric_op(lhs: f64, rhs: f64, operator: InfixOp) -> f64 {
    match operator {
        InfixOp::Add => lhs + rhs,
        InfixOp::Sub => lhs - rhs,
        InfixOp::Mul => lhs * rhs,
        InfixOp::Div => lhs / rhs,
        InfixOp::Rem => lhs % rhs,
        InfixOp::Caret => ((lhs as i64) ^ (rhs as i64)) as f64,
    }
}

/// Folds the properties left-to-right against the running environment. A
/// keyed property evaluates its expression; a shorthand property resolves
/// its key from scope. Duplicate keys collapse last-write-wins; insertion
/// order is preserved for iteration.
fn eval_object_literal(
    properties: &[Expr],
    env: Environment,
) -> Result<(Value, Environment), RuntimeError> {
    let mut entries = IndexMap::new();
    let mut env = env;

    for property in properties {
        let (key, value) = match &property.kind {
            ExprKind::Property { key, value } => (key, value),
            other => return Err(RuntimeError::unevaluable(other.name(), property.span)),
        };

        let evaluated = match value {
            Some(expr) => {
                let (value, next) = evaluate(expr, env)?;
                env = next;
                value
            }
            None => env
                .lookup(key)
                .ok_or_else(|| RuntimeError::unresolved_name(key.as_ref(), property.span))?,
        };
        entries.insert(key.to_string(), evaluated);
    }

    Ok((Value::Object(Rc::new(RefCell::new(entries))), env))
}

fn eval_let_declaration(
    identifier: &str,
    value: &Expr,
    span: Span,
    env: Environment,
) -> Result<(Value, Environment), RuntimeError> {
    let (value, env) = evaluate(value, env)?;
    let declared = env
        .declare(identifier, value)
        .map_err(|error| error.with_span(span))?;
    Ok((declared, env))
}

/// Captures the environment active *now* — not at call time — and declares
/// the function under its own name, so the closure can already see itself.
fn eval_fun_declaration(
    name: &Rc<str>,
    parameters: &[Rc<str>],
    body: &[Expr],
    span: Span,
    env: Environment,
) -> Result<(Value, Environment), RuntimeError> {
    let function = Function {
        name: name.clone(),
        parameters: parameters.to_vec(),
        declaration_env: env.clone(),
        body: body.to_vec(),
    };
    let declared = env
        .declare(name, Value::Function(Rc::new(function)))
        .map_err(|error| error.with_span(span))?;
    Ok((declared, env))
}

fn eval_call_expr(
    caller: &Expr,
    args: &[Expr],
    env: Environment,
) -> Result<(Value, Environment), RuntimeError> {
    // Arguments first, then the callee, threading the environment through
    // the whole sequence.
    let mut evaluated_args = Vec::with_capacity(args.len());
    let mut env = env;
    for arg in args {
        let (value, next) = evaluate(arg, env)?;
        evaluated_args.push(value);
        env = next;
    }
    let (callee, env) = evaluate(caller, env)?;

    match callee {
        Value::NativeFunction(native) => {
            let value = native.invoke(&evaluated_args, &env)?;
            Ok((value, env))
        }
        Value::Function(function) => {
            if evaluated_args.len() != function.parameters.len() {
                return Err(RuntimeError::arity_mismatch(
                    function.name.as_ref(),
                    function.parameters.len(),
                    evaluated_args.len(),
                    caller.span,
                ));
            }

            let scope = Environment::with_parent(&function.declaration_env);
            for (parameter, value) in function.parameters.iter().zip(evaluated_args) {
                scope
                    .declare(parameter, value)
                    .map_err(|error| error.with_span(caller.span))?;
            }

            let mut result = Value::Unit;
            let mut body_env = scope;
            for statement in &function.body {
                let (value, next) = evaluate(statement, body_env)?;
                result = value;
                body_env = next;
            }

            // The call scope dies here; the caller carries on with the
            // environment it had outside the call.
            Ok((result, env))
        }
        other => Err(RuntimeError::not_callable(other.type_name(), caller.span)),
    }
}

fn eval_member_expr(
    object: &Expr,
    property: &Expr,
    kind: MemberKind,
    env: Environment,
) -> Result<(Value, Environment), RuntimeError> {
    let (target, mut env) = evaluate(object, env)?;

    let key: Rc<str> = match kind {
        MemberKind::Literal => match &property.kind {
            ExprKind::Identifier(symbol) => symbol.clone(),
            other => return Err(RuntimeError::unevaluable(other.name(), property.span)),
        },
        MemberKind::Computed => {
            let (value, next) = evaluate(property, env)?;
            env = next;
            match value {
                Value::String(key) => key,
                other => {
                    return Err(RuntimeError::non_string_key(
                        other.type_name(),
                        property.span,
                    ))
                }
            }
        }
    };

    match &target {
        Value::Object(entries) => {
            let value = entries
                .borrow()
                .get(key.as_ref())
                .cloned()
                .ok_or_else(|| RuntimeError::missing_key(key.as_ref(), property.span))?;
            Ok((value, env))
        }
        other => Err(RuntimeError::not_an_object(other.type_name(), object.span)),
    }
}

fn eval_program(body: &[Expr], env: Environment) -> Result<(Value, Environment), RuntimeError> {
    let mut result = Value::Unit;
    let mut env = env;
    for statement in body {
        let (value, next) = evaluate(statement, env)?;
        result = value;
        env = next;
    }
    Ok((result, env))
}

/// Parse and evaluate `source` against `env`, with stringly errors for
/// callers that don't need diagnostics.
pub fn parse_and_eval(source: &str, env: Environment) -> Result<(Value, Environment), String> {
    let program = parser::parse_source(source).map_err(|error| error.to_string())?;
    evaluate(&program, env).map_err(|error| format!("runtime error: {}", error))
}

/// Parse and evaluate `source`, collecting failures from every stage as
/// renderable diagnostics. Unlike `parse_and_eval`, a lexing stop fails the
/// whole request: a partial token stream is never evaluated here.
pub fn parse_and_eval_with_diagnostics(
    source: &str,
    env: Environment,
) -> Result<(Value, Environment), Vec<Diagnostic>> {
    let lexed = lexer::tokenize(source);
    let mut diagnostics = Vec::new();
    if let Some(error) = lexed.error {
        diagnostics.push(error.to_diagnostic());
    }

    match TokenParser::new(lexed.tokens).parse_program() {
        Ok(program) => {
            if !diagnostics.is_empty() {
                return Err(diagnostics);
            }
            evaluate(&program, env).map_err(|error| vec![error.to_diagnostic()])
        }
        Err(error) => {
            diagnostics.push(error.to_diagnostic());
            Err(diagnostics)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(source: &str) -> Value {
        let (value, _) = parse_and_eval(source, Environment::new()).expect("evaluation failed");
        value
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval("10 + 5 * 2"), Value::Number(20.0));
        assert_eq!(eval("10 % 3"), Value::Number(1.0));
    }

    #[test]
    fn test_empty_program_is_unit() {
        assert_eq!(eval(""), Value::Unit);
    }

    #[test]
    fn test_caret_is_xor() {
        assert_eq!(eval("2 ^ 3"), Value::Number(1.0));
    }

    #[test]
    fn test_let_yields_the_bound_value() {
        assert_eq!(eval("let x = 7"), Value::Number(7.0));
    }

    #[test]
    fn test_threading_across_statements() {
        let env = Environment::new();
        let (_, env) = parse_and_eval("let x = 5", env).unwrap();
        let (value, _) = parse_and_eval("x + 1", env).unwrap();
        assert_eq!(value, Value::Number(6.0));
    }

    #[test]
    fn test_property_node_is_unevaluable() {
        use crate::ast::{Expr, ExprKind};
        let node = Expr::new(
            ExprKind::Property {
                key: Rc::from("a"),
                value: None,
            },
            Span::new(0, 1),
        );
        let err = evaluate(&node, Environment::new()).unwrap_err();
        assert!(matches!(err, RuntimeError::Unevaluable { kind: "Property", .. }));
    }

    #[test]
    fn test_lex_stop_fails_the_diagnostics_pipeline() {
        let result = parse_and_eval_with_diagnostics("1 + 1 ~", Environment::new());
        let diagnostics = result.unwrap_err();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("unrecognised character"));
    }
}
