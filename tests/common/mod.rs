#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use quill::format::display_value;
use quill::interpreter::{parse_and_eval, Environment};
use quill::value::{native, Value};

/// Evaluates `source` against a bare environment and returns the final value.
pub fn eval(source: &str) -> Value {
    let (value, _) = parse_and_eval(source, Environment::new()).expect("evaluation failed");
    value
}

/// Evaluates `source` expecting a failure; returns the error text.
pub fn eval_err(source: &str) -> String {
    parse_and_eval(source, Environment::new())
        .expect_err("evaluation unexpectedly succeeded")
}

pub fn number(value: &Value) -> f64 {
    value.as_number().expect("expected a number")
}

/// An environment whose `print` captures its lines instead of writing to
/// stdout, so tests can assert on output.
pub fn capture_env() -> (Environment, Rc<RefCell<Vec<String>>>) {
    let captured: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = captured.clone();

    let env = Environment::new();
    env.declare(
        "print",
        native("print", move |args, _env| {
            let line = args
                .iter()
                .map(display_value)
                .collect::<Vec<String>>()
                .join(" ");
            sink.borrow_mut().push(line);
            Ok(Value::Unit)
        }),
    )
    .expect("fresh environment");

    (env, captured)
}
