use regex::Regex;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use typei18n_generate::Target;
use typei18n_toml::{DEFAULT_CONTEXT, DEFAULT_FILENAME, TypeI18nConfig, TypeI18nConfigError};

/// Prefix of every message sent to the [`Logger`].
pub const LOG_PREFIX: &str = "[typei18n]";

/// Sink for the verbose progress messages.
///
/// The default forwards to `tracing` at info level.
#[derive(Clone)]
pub struct Logger(Arc<dyn Fn(&str) + Send + Sync>);

impl Logger {
    pub fn new(sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self(Arc::new(sink))
    }

    pub fn log(&self, message: &str) {
        (self.0)(message)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(|message| tracing::info!(target: "typei18n", "{message}"))
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Logger(..)")
    }
}

/// Settings of one generator instance.
#[derive(Clone, Debug, bon::Builder)]
pub struct Options {
    /// Locale directory, relative to the host's build context unless absolute.
    #[builder(into, default = PathBuf::from(DEFAULT_CONTEXT))]
    pub context: PathBuf,
    /// Generated file, relative to `context` unless absolute.
    #[builder(into, default = PathBuf::from(DEFAULT_FILENAME))]
    pub filename: PathBuf,
    /// Locale files whose absolute path matches one of these are ignored.
    #[builder(default)]
    pub exclude: Vec<Regex>,
    #[builder(default)]
    pub logger: Logger,
    #[builder(default = true)]
    pub verbose: bool,
    #[builder(default)]
    pub target: Target,
}

impl Default for Options {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Options {
    /// Options described by a `typei18n.toml`, with the default logger.
    pub fn from_config(config: &TypeI18nConfig) -> Result<Self, TypeI18nConfigError> {
        Ok(Self::builder()
            .context(config.context.clone())
            .filename(config.filename.clone())
            .exclude(config.exclude_patterns()?)
            .verbose(config.verbose)
            .target(config.target)
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.context, PathBuf::from("./locales"));
        assert_eq!(options.filename, PathBuf::from("./index.ts"));
        assert!(options.exclude.is_empty());
        assert!(options.verbose);
        assert_eq!(options.target, Target::Provider);
    }

    #[test]
    fn test_from_config() {
        let config = TypeI18nConfig {
            context: PathBuf::from("i18n"),
            exclude: vec!["draft".to_string()],
            verbose: false,
            target: Target::Types,
            ..Default::default()
        };

        let options = Options::from_config(&config).unwrap();
        assert_eq!(options.context, PathBuf::from("i18n"));
        assert_eq!(options.filename, PathBuf::from("./index.ts"));
        assert_eq!(options.exclude[0].as_str(), "draft");
        assert!(!options.verbose);
        assert_eq!(options.target, Target::Types);
    }

    #[test]
    fn test_custom_logger_receives_messages() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let logger = Logger::new(move |message| sink.lock().unwrap().push(message.to_string()));

        logger.log("hello");
        logger.clone().log("again");

        assert_eq!(*seen.lock().unwrap(), vec!["hello", "again"]);
    }
}
