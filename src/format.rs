use crate::value::Value;

/// Renders a value the way the REPL and `print` show it.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Unit => "()".to_string(),
        Value::Number(numeric_value) => format_number(*numeric_value),
        Value::Bool(bool_value) => bool_value.to_string(),
        Value::String(string_value) => format!("\"{}\"", escape_string(string_value)),
        Value::Object(object) => {
            let entries = object.borrow();
            if entries.is_empty() {
                return "{}".to_string();
            }
            let fields: Vec<String> = entries
                .iter()
                .map(|(key, value)| format!("{}: {}", key, display_value(value)))
                .collect();
            format!("{{ {} }}", fields.join(", "))
        }
        Value::Function(function) => {
            let parameters: Vec<&str> =
                function.parameters.iter().map(|p| p.as_ref()).collect();
            format!("<fun {}({})>", function.name, parameters.join(" "))
        }
        Value::NativeFunction(function) => format!("<native {}>", function.name),
    }
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

pub fn escape_string(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}
