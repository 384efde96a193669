//! Tree-walking renderer for parsed templates

use serde_json::{Map, Value};

use super::parser::{parse, Node};
use super::types::{RenderedEmail, Template};

/// Expand subject, HTML and text bodies of `template` against `variables`.
///
/// Pure and infallible: unknown placeholders stay as literal `{{name}}`.
pub fn process_template(template: &Template, variables: &Map<String, Value>) -> RenderedEmail {
    RenderedEmail {
        subject: render_str(&template.subject, variables),
        html_content: render_str(&template.html_content, variables),
        text_content: render_str(&template.text_content, variables),
    }
}

/// Parse and render a single template string
pub fn render_str(source: &str, variables: &Map<String, Value>) -> String {
    render(&parse(source), variables)
}

/// Render an already parsed tree
pub fn render(nodes: &[Node], variables: &Map<String, Value>) -> String {
    let mut scope = Scope {
        bindings: vec![Binding::Record(variables)],
    };
    let mut out = String::new();
    render_nodes(nodes, &mut scope, &mut out);
    out
}

#[derive(Clone, Copy)]
enum Binding<'a> {
    /// Top-level bag or a record element of an each-block
    Record(&'a Map<String, Value>),
    /// Scalar element of an each-block, reachable as `this`
    Scalar(&'a Value),
}

/// Innermost binding first, then the enclosing ones
struct Scope<'a> {
    bindings: Vec<Binding<'a>>,
}

impl<'a> Scope<'a> {
    fn lookup(&self, name: &str) -> Option<&'a Value> {
        self.bindings.iter().rev().find_map(|binding| match *binding {
            Binding::Record(map) => map.get(name),
            Binding::Scalar(value) => (name == "this").then_some(value),
        })
    }
}

fn render_nodes<'a>(nodes: &[Node], scope: &mut Scope<'a>, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Placeholder(name) => match scope.lookup(name) {
                Some(value) => out.push_str(&stringify(value)),
                None => {
                    out.push_str("{{");
                    out.push_str(name);
                    out.push_str("}}");
                }
            },
            Node::If { name, body } => {
                if scope.lookup(name).is_some_and(is_truthy) {
                    render_nodes(body, scope, out);
                }
            }
            Node::Each { name, body } => {
                let Some(Value::Array(items)) = scope.lookup(name) else {
                    continue;
                };
                for item in items {
                    let binding = match item {
                        Value::Object(map) => Binding::Record(map),
                        other => Binding::Scalar(other),
                    };
                    scope.bindings.push(binding);
                    render_nodes(body, scope, out);
                    scope.bindings.pop();
                }
            }
        }
    }
}

/// Truthiness of a variable for `{{#if}}`
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

/// Text form of a variable for `{{name}}`
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => stringify_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Integral floats print without a fraction: `7.0` becomes "7"
fn stringify_number(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 && f.abs() < 1e15 => {
            (f as i64).to_string()
        }
        _ => n.to_string(),
    }
}
