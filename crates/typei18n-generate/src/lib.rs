#![doc = include_str!("../README.md")]

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

pub mod error;
mod formatting;
mod shape;

use error::GenerateError;
pub use formatting::{binding_name, is_identifier};
pub use shape::Shape;

/// First line of every generated file.
pub const HEADER: &str = "// This file is generated by typei18n. Do not edit it by hand.";

/// The code generation template.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Eq,
    PartialEq,
    Serialize,
    ValueEnum,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Target {
    /// A `Locale` interface, one constant per locale and a `Provider` class.
    #[default]
    Provider,
    /// Only the `Locale` interface and the `LocaleName` union.
    Types,
}

/// One locale: its identifier and its parsed content.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedValue {
    pub name: String,
    pub value: Value,
}

impl NamedValue {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Generates TypeScript source for the given locales.
///
/// The first locale is the reference: every other locale must have exactly
/// its shape, and it is the provider's initial locale.
///
/// Names that are not TypeScript identifiers (`pt-BR`) keep their name in
/// the `locales` table and bind their constant to [`binding_name`].
pub fn generate(values: &[NamedValue], target: Target) -> Result<String, GenerateError> {
    let Some(reference) = values.first() else {
        return Err(GenerateError::NoLocales);
    };

    let mut names = HashSet::with_capacity(values.len());
    let mut bindings: HashMap<String, &str> = HashMap::with_capacity(values.len());
    let mut locales = Vec::with_capacity(values.len());
    for named in values {
        if !names.insert(named.name.as_str()) {
            return Err(GenerateError::DuplicateName(named.name.clone()));
        }
        let Some(binding) = formatting::binding_name(&named.name) else {
            return Err(GenerateError::InvalidName(named.name.clone()));
        };
        if let Some(other) = bindings.insert(binding.clone(), &named.name) {
            return Err(GenerateError::AmbiguousName {
                first: other.to_string(),
                second: named.name.clone(),
                binding,
            });
        }
        locales.push((named, binding));
    }

    let reference_shape = Shape::of_locale(&reference.name, &reference.value)?;
    for named in &values[1..] {
        let shape = Shape::of_locale(&named.name, &named.value)?;
        reference_shape.ensure_matches(&shape, &reference.name, &named.name)?;
    }

    let mut out = format!(
        "{HEADER}\n\nexport interface Locale {}\n\n",
        formatting::type_of(&reference_shape, 0)
    );

    match target {
        Target::Provider => write_provider(&mut out, &locales, &reference.name),
        Target::Types => {
            let names = values
                .iter()
                .map(|named| formatting::string_literal(&named.name))
                .collect::<Vec<_>>()
                .join(" | ");
            out.push_str(&format!("export type LocaleName = {names}\n"));
        },
    }

    Ok(out)
}

fn write_provider(out: &mut String, locales: &[(&NamedValue, String)], default_locale: &str) {
    for (named, binding) in locales {
        out.push_str(&format!(
            "export const {binding}: Locale = {}\n\n",
            formatting::value_of(&named.value, 0)
        ));
    }

    out.push_str("export const locales = {\n");
    for (named, binding) in locales {
        let key = formatting::property_key(&named.name);
        if key == *binding {
            out.push_str(&format!("  {binding},\n"));
        } else {
            out.push_str(&format!("  {key}: {binding},\n"));
        }
    }
    out.push_str("} as const\n\n");
    out.push_str("export type LocaleName = keyof typeof locales\n\n");

    out.push_str(&format!(
        "export class Provider {{\n  constructor(public locale: LocaleName = {}) {{}}\n\n  get t(): Locale {{\n    return locales[this.locale]\n  }}\n\n  setLocale(locale: LocaleName): void {{\n    this.locale = locale\n  }}\n}}\n",
        formatting::string_literal(default_locale)
    ));
}
