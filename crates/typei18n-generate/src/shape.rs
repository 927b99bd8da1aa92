use crate::error::GenerateError;
use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Matches `{name}` placeholders inside a translation string.
pub(crate) static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\s*([A-Za-z_$][A-Za-z0-9_$]*)\s*\}").expect("placeholder pattern is valid")
});

/// The type of a locale value, as it appears in the generated interface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Shape {
    Text,
    /// A string with placeholders, generated as a function of its arguments.
    Template(BTreeSet<String>),
    Number,
    Boolean,
    List(Box<Shape>),
    Record(IndexMap<String, Shape>),
}

impl Shape {
    /// Infers the shape of a whole locale. The root has to be a mapping.
    pub fn of_locale(locale: &str, value: &Value) -> Result<Self, GenerateError> {
        if !value.is_object() {
            return Err(GenerateError::NotAMapping {
                locale: locale.to_string(),
                found: kind_of(value),
            });
        }

        Self::infer(locale, value, &mut Vec::new())
    }

    fn infer(locale: &str, value: &Value, path: &mut Vec<String>) -> Result<Self, GenerateError> {
        match value {
            Value::Null => Err(GenerateError::NullValue {
                locale: locale.to_string(),
                key: path.join("."),
            }),
            Value::Bool(_) => Ok(Shape::Boolean),
            Value::Number(_) => Ok(Shape::Number),
            Value::String(text) => Ok(Self::of_text(text)),
            Value::Array(items) => {
                let mut element: Option<Shape> = None;
                for (index, item) in items.iter().enumerate() {
                    path.push(index.to_string());
                    let shape = Self::infer(locale, item, path)?;
                    path.pop();

                    match &element {
                        Some(existing) if *existing != shape => {
                            return Err(GenerateError::MixedList {
                                locale: locale.to_string(),
                                key: path.join("."),
                            });
                        },
                        Some(_) => {},
                        None => element = Some(shape),
                    }
                }

                element
                    .map(|shape| Shape::List(Box::new(shape)))
                    .ok_or_else(|| GenerateError::EmptyList {
                        locale: locale.to_string(),
                        key: path.join("."),
                    })
            },
            Value::Object(map) => {
                let mut fields = IndexMap::with_capacity(map.len());
                for (key, item) in map {
                    path.push(key.clone());
                    let shape = Self::infer(locale, item, path)?;
                    path.pop();
                    fields.insert(key.clone(), shape);
                }
                Ok(Shape::Record(fields))
            },
        }
    }

    pub(crate) fn of_text(text: &str) -> Self {
        let placeholders: BTreeSet<String> = PLACEHOLDER
            .captures_iter(text)
            .map(|captures| captures[1].to_string())
            .collect();

        if placeholders.is_empty() {
            Shape::Text
        } else {
            Shape::Template(placeholders)
        }
    }

    /// Checks that `other` (the shape of `locale`) matches `self` (the shape
    /// of `reference`).
    pub fn ensure_matches(
        &self,
        other: &Shape,
        reference: &str,
        locale: &str,
    ) -> Result<(), GenerateError> {
        compare(self, other, reference, locale, &mut Vec::new())
    }

    pub fn describe(&self) -> String {
        match self {
            Shape::Text => "a string".to_string(),
            Shape::Template(args) => format!(
                "a template with {}",
                args.iter()
                    .map(|arg| format!("{{{arg}}}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Shape::Number => "a number".to_string(),
            Shape::Boolean => "a boolean".to_string(),
            Shape::List(_) => "a list".to_string(),
            Shape::Record(_) => "a mapping".to_string(),
        }
    }
}

fn compare(
    expected: &Shape,
    found: &Shape,
    reference: &str,
    locale: &str,
    path: &mut Vec<String>,
) -> Result<(), GenerateError> {
    match (expected, found) {
        (Shape::Record(expected_fields), Shape::Record(found_fields)) => {
            for (key, expected_field) in expected_fields {
                path.push(key.clone());
                let Some(found_field) = found_fields.get(key) else {
                    return Err(GenerateError::MissingKey {
                        locale: locale.to_string(),
                        reference: reference.to_string(),
                        key: path.join("."),
                    });
                };
                compare(expected_field, found_field, reference, locale, path)?;
                path.pop();
            }

            if let Some(extra) = found_fields
                .keys()
                .find(|key| !expected_fields.contains_key(*key))
            {
                path.push(extra.clone());
                return Err(GenerateError::UnexpectedKey {
                    locale: locale.to_string(),
                    reference: reference.to_string(),
                    key: path.join("."),
                });
            }

            Ok(())
        },
        (Shape::List(expected_item), Shape::List(found_item)) => {
            compare(expected_item, found_item, reference, locale, path)
        },
        _ if expected == found => Ok(()),
        _ => Err(GenerateError::ShapeMismatch {
            locale: locale.to_string(),
            reference: reference.to_string(),
            key: path.join("."),
            expected: expected.describe(),
            found: found.describe(),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_infers_nested_shapes() {
        let shape = Shape::of_locale(
            "en",
            &json!({
                "title": "Home",
                "welcome": "Hello {name}, you have {count} messages",
                "menu": { "open": "Open", "items": ["a", "b"] },
                "max": 3,
                "beta": false,
            }),
        )
        .unwrap();

        let Shape::Record(fields) = shape else {
            panic!("expected a record");
        };
        assert_eq!(fields["title"], Shape::Text);
        assert_eq!(
            fields["welcome"],
            Shape::Template(BTreeSet::from(["count".to_string(), "name".to_string()]))
        );
        assert_eq!(fields["max"], Shape::Number);
        assert_eq!(fields["beta"], Shape::Boolean);
        assert!(matches!(&fields["menu"], Shape::Record(menu) if menu["items"] == Shape::List(Box::new(Shape::Text))));
    }

    #[test]
    fn test_placeholders_tolerate_inner_whitespace() {
        assert_eq!(
            Shape::of_text("Hi { user }!"),
            Shape::Template(BTreeSet::from(["user".to_string()]))
        );
        assert_eq!(Shape::of_text("{} and { 1x }"), Shape::Text);
    }

    #[test]
    fn test_root_must_be_mapping() {
        assert_eq!(
            Shape::of_locale("en", &json!("hello")),
            Err(GenerateError::NotAMapping {
                locale: "en".to_string(),
                found: "a string",
            })
        );
    }

    #[test]
    fn test_null_reports_key_path() {
        assert_eq!(
            Shape::of_locale("en", &json!({ "menu": { "open": null } })),
            Err(GenerateError::NullValue {
                locale: "en".to_string(),
                key: "menu.open".to_string(),
            })
        );
    }

    #[test]
    fn test_list_rules() {
        assert!(matches!(
            Shape::of_locale("en", &json!({ "days": [] })),
            Err(GenerateError::EmptyList { key, .. }) if key == "days"
        ));
        assert!(matches!(
            Shape::of_locale("en", &json!({ "days": ["mon", 2] })),
            Err(GenerateError::MixedList { key, .. }) if key == "days"
        ));
    }

    #[test]
    fn test_compare_reports_missing_and_extra_keys() {
        let en = Shape::of_locale("en", &json!({ "a": "x", "b": { "c": "y" } })).unwrap();
        let missing = Shape::of_locale("fr", &json!({ "a": "x", "b": {} })).unwrap();
        let extra = Shape::of_locale("de", &json!({ "a": "x", "b": { "c": "y" }, "z": "q" }))
            .unwrap();

        assert!(matches!(
            en.ensure_matches(&missing, "en", "fr"),
            Err(GenerateError::MissingKey { key, .. }) if key == "b.c"
        ));
        assert!(matches!(
            en.ensure_matches(&extra, "en", "de"),
            Err(GenerateError::UnexpectedKey { key, .. }) if key == "z"
        ));
    }

    #[test]
    fn test_compare_reports_placeholder_mismatch() {
        let en = Shape::of_locale("en", &json!({ "hi": "Hello {name}" })).unwrap();
        let fr = Shape::of_locale("fr", &json!({ "hi": "Bonjour" })).unwrap();

        assert_eq!(
            en.ensure_matches(&fr, "en", "fr"),
            Err(GenerateError::ShapeMismatch {
                locale: "fr".to_string(),
                reference: "en".to_string(),
                key: "hi".to_string(),
                expected: "a template with {name}".to_string(),
                found: "a string".to_string(),
            })
        );
    }
}
