//! TypeScript text emission helpers.

use crate::shape::{PLACEHOLDER, Shape};
use serde_json::Value;

const INDENT: &str = "  ";

const RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "enum", "export", "extends", "false", "finally", "for", "function", "if", "import",
    "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw", "true",
    "try", "typeof", "var", "void", "while", "with",
];

/// Whether `name` can be used as a bare TypeScript binding.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        && !RESERVED_WORDS.contains(&name)
}

/// The identifier a locale constant is exported under.
///
/// Characters outside `[A-Za-z0-9_$]` become `_`, a leading digit gets a `_`
/// prefix and reserved words get a `_` suffix. `None` for an empty name.
pub fn binding_name(name: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }
    if is_identifier(name) {
        return Some(name.to_string());
    }

    let mut binding: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if binding.starts_with(|c: char| c.is_ascii_digit()) {
        binding.insert(0, '_');
    }
    if RESERVED_WORDS.contains(&binding.as_str()) {
        binding.push('_');
    }

    Some(binding)
}

/// Renders an object key, quoting it when it is not a plain identifier.
pub fn property_key(key: &str) -> String {
    let mut chars = key.chars();
    let plain = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

    if plain {
        key.to_string()
    } else {
        string_literal(key)
    }
}

/// A double quoted string literal. JSON string escaping is valid TypeScript.
pub fn string_literal(text: &str) -> String {
    Value::String(text.to_string()).to_string()
}

/// A template literal substituting every `{name}` with `${args.name}`.
pub fn template_literal(text: &str) -> String {
    let mut out = String::from("`");
    let mut last = 0;

    for captures in PLACEHOLDER.captures_iter(text) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        escape_template_chunk(&text[last..whole.start()], &mut out);
        out.push_str(&format!("${{args.{}}}", &captures[1]));
        last = whole.end();
    }
    escape_template_chunk(&text[last..], &mut out);

    out.push('`');
    out
}

fn escape_template_chunk(chunk: &str, out: &mut String) {
    let mut chars = chunk.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '`' => out.push_str("\\`"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
}

/// Renders the TypeScript type for a shape at the given nesting depth.
pub fn type_of(shape: &Shape, depth: usize) -> String {
    match shape {
        Shape::Text => "string".to_string(),
        Shape::Template(args) => {
            let fields = args
                .iter()
                .map(|arg| format!("{}: string", property_key(arg)))
                .collect::<Vec<_>>()
                .join("; ");
            format!("(args: {{ {fields} }}) => string")
        },
        Shape::Number => "number".to_string(),
        Shape::Boolean => "boolean".to_string(),
        Shape::List(item) => format!("ReadonlyArray<{}>", type_of(item, depth)),
        Shape::Record(fields) => {
            let mut out = String::from("{\n");
            for (key, field) in fields {
                out.push_str(&format!(
                    "{}{}: {}\n",
                    INDENT.repeat(depth + 1),
                    property_key(key),
                    type_of(field, depth + 1)
                ));
            }
            out.push_str(&INDENT.repeat(depth));
            out.push('}');
            out
        },
    }
}

/// Renders a locale value as a TypeScript expression at the given depth.
pub fn value_of(value: &Value, depth: usize) -> String {
    match value {
        Value::String(text) => match Shape::of_text(text) {
            Shape::Template(_) => format!("(args) => {}", template_literal(text)),
            _ => string_literal(text),
        },
        Value::Array(items) => {
            let rendered = items
                .iter()
                .map(|item| value_of(item, depth))
                .collect::<Vec<_>>()
                .join(", ");
            format!("[{rendered}]")
        },
        Value::Object(map) => {
            let mut out = String::from("{\n");
            for (key, item) in map {
                out.push_str(&format!(
                    "{}{}: {},\n",
                    INDENT.repeat(depth + 1),
                    property_key(key),
                    value_of(item, depth + 1)
                ));
            }
            out.push_str(&INDENT.repeat(depth));
            out.push('}');
            out
        },
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("en", true)]
    #[case("en_US", true)]
    #[case("$root", true)]
    #[case("en-US", false)]
    #[case("1st", false)]
    #[case("default", false)]
    #[case("", false)]
    fn test_is_identifier(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_identifier(name), expected);
    }

    #[rstest]
    #[case("en", Some("en"))]
    #[case("en-US", Some("en_US"))]
    #[case("zh-Hant-TW", Some("zh_Hant_TW"))]
    #[case("sr.latn", Some("sr_latn"))]
    #[case("1st", Some("_1st"))]
    #[case("default", Some("default_"))]
    #[case("", None)]
    fn test_binding_name(#[case] name: &str, #[case] expected: Option<&str>) {
        assert_eq!(binding_name(name).as_deref(), expected);
    }

    #[test]
    fn test_property_key_quotes_when_needed() {
        assert_eq!(property_key("title"), "title");
        assert_eq!(property_key("default"), "default");
        assert_eq!(property_key("sign-in"), "\"sign-in\"");
        assert_eq!(property_key("2fa"), "\"2fa\"");
    }

    #[test]
    fn test_template_literal_escapes() {
        assert_eq!(
            template_literal("Hi {name}, `cost` is ${price}"),
            "`Hi ${args.name}, \\`cost\\` is $${args.price}`"
        );
    }

    #[test]
    fn test_value_of_nested() {
        let rendered = value_of(&json!({ "a": "x", "b": { "c": 1 } }), 0);
        assert_eq!(rendered, "{\n  a: \"x\",\n  b: {\n    c: 1,\n  },\n}");
    }
}
