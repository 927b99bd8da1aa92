use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("No locales to generate from")]
    NoLocales,

    #[error("Locale name '{0}' cannot be turned into a TypeScript identifier")]
    InvalidName(String),

    #[error("Locales '{first}' and '{second}' would both be exported as '{binding}'")]
    AmbiguousName {
        first: String,
        second: String,
        binding: String,
    },

    #[error("Locale '{0}' is defined more than once")]
    DuplicateName(String),

    #[error("Locale '{locale}' must be a mapping at its root, found {found}")]
    NotAMapping { locale: String, found: &'static str },

    #[error("Locale '{locale}' has a null value at '{key}'")]
    NullValue { locale: String, key: String },

    #[error("Locale '{locale}' has an empty list at '{key}', its element type cannot be inferred")]
    EmptyList { locale: String, key: String },

    #[error("Locale '{locale}' mixes element shapes in the list at '{key}'")]
    MixedList { locale: String, key: String },

    #[error("Locale '{locale}' is missing '{key}' (defined by '{reference}')")]
    MissingKey {
        locale: String,
        reference: String,
        key: String,
    },

    #[error("Locale '{locale}' defines '{key}' which '{reference}' does not")]
    UnexpectedKey {
        locale: String,
        reference: String,
        key: String,
    },

    #[error(
        "Locale '{locale}' has {found} at '{key}' but '{reference}' has {expected}"
    )]
    ShapeMismatch {
        locale: String,
        reference: String,
        key: String,
        expected: String,
        found: String,
    },
}
