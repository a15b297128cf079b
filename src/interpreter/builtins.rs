use super::environment::Environment;
use super::error::RuntimeError;
use crate::format;
use crate::value::{native, Value};

/// A fresh root environment with the standard native capabilities installed.
pub fn global_environment() -> Result<Environment, RuntimeError> {
    let env = Environment::new();
    install(&env)?;
    Ok(env)
}

/// Declares the built-in natives in `env`. Fails if one of the names is
/// already bound there.
pub fn install(env: &Environment) -> Result<(), RuntimeError> {
    env.declare("print", native("print", builtin_print))?;
    Ok(())
}

/// Writes its arguments to stdout, space-separated, and returns `Unit`. This
/// is the host effect boundary: the evaluator itself never touches I/O.
pub fn builtin_print(args: &[Value], _env: &Environment) -> Result<Value, RuntimeError> {
    let rendered: Vec<String> = args.iter().map(format::display_value).collect();
    println!("{}", rendered.join(" "));
    Ok(Value::Unit)
}
