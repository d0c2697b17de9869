//! Parameter discovery in notebooks.
//!
//! Parameters are declared in code cells tagged `parameters`, one per line,
//! using the Colab forms notation:
//!
//! ```text
//! dataset = "iris.csv" #@param {type:"string",label:"Dataset"}
//! k = 3 #@param [1,3,5] {type:"integer"}
//! ```

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Number, Value};

use crate::notebook::model::Notebook;

/// Tag marking the cells that hold parameter declarations.
pub const PARAMETERS_TAG: &str = "parameters";

/// A notebook parameter as sent to the projects service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "type")]
    pub variable_type: String,

    pub default: Value,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn declaration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(.*?)\s*#@param\s*(?:\[([^\]]*)\])?\s*(?:\{(.*)\})?\s*$",
        )
        .unwrap()
    })
}

fn property_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"(\w+)\s*:\s*"((?:[^"\\]|\\.)*)""#).unwrap())
}

/// Collect every parameter declared in the notebook's `parameters` cells,
/// in document order.
pub fn parse_parameters(notebook: &Notebook) -> Vec<Parameter> {
    notebook
        .cells()
        .iter()
        .filter(|cell| cell.is_code() && cell.has_tag(PARAMETERS_TAG))
        .flat_map(|cell| {
            cell.source
                .text()
                .lines()
                .filter_map(parse_declaration)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Parse one `name = value #@param ...` line.
pub fn parse_declaration(line: &str) -> Option<Parameter> {
    let captures = declaration_pattern().captures(line)?;

    let name = captures.get(1)?.as_str().to_string();
    let default = parse_literal(captures.get(2).map_or("", |m| m.as_str()));

    let options = captures
        .get(3)
        .map(|m| {
            m.as_str()
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(parse_literal)
                .collect()
        })
        .unwrap_or_default();

    let mut properties: HashMap<String, String> = captures
        .get(4)
        .map(|m| {
            property_pattern()
                .captures_iter(m.as_str())
                .map(|c| (c[1].to_string(), c[2].replace("\\\"", "\"")))
                .collect()
        })
        .unwrap_or_default();

    let variable_type = properties
        .remove("type")
        .unwrap_or_else(|| infer_type(&default).to_string());

    Some(Parameter {
        name,
        variable_type,
        default,
        options,
        label: properties.remove("label"),
        description: properties.remove("description"),
    })
}

/// Turn a Python literal into JSON. Anything unrecognised stays a string.
fn parse_literal(text: &str) -> Value {
    let text = text.trim();

    match text {
        "" | "None" => return Value::Null,
        "True" => return Value::Bool(true),
        "False" => return Value::Bool(false),
        _ => {}
    }

    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return Value::String(text[1..text.len() - 1].to_string());
        }
    }

    if let Ok(i) = text.parse::<i64>() {
        return Value::Number(i.into());
    }

    if let Some(n) = text.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(n);
    }

    Value::String(text.to_string())
}

fn infer_type(value: &Value) -> &'static str {
    match value {
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() => "integer",
        Value::Number(_) => "number",
        _ => "string",
    }
}
