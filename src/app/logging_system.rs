use super::config::{LogFormat, LogLevel};
use thiserror::Error;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_DIRECTIVES: [(&str, LogLevel); 3] = [
    ("hyper", LogLevel::Warn),
    ("reqwest", LogLevel::Warn),
    ("h2", LogLevel::Warn),
];

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid log directive '{directive}': {source}")]
    InvalidDirective {
        directive: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("Failed to install tracing subscriber: {0}")]
    InitFailed(String),
}

/// Builds the filter and installs the global tracing subscriber.
///
/// Logs go to stderr so command output on stdout stays machine readable.
#[derive(Debug, Clone)]
pub struct LoggingSystem {
    level: LogLevel,
    format: LogFormat,
    directives: Vec<String>,
}

impl LoggingSystem {
    pub fn new(level: LogLevel, format: LogFormat) -> Self {
        Self {
            level,
            format,
            directives: Vec::new(),
        }
    }

    /// Default directives followed by `extra`, each checked as it is added.
    pub fn configured(
        level: LogLevel,
        format: LogFormat,
        extra: &[String],
    ) -> Result<Self, LoggingError> {
        let mut system = Self::new(level, format);
        system.add_default_directives();
        for directive in extra {
            system.add_directive(directive)?;
        }
        Ok(system)
    }

    pub fn add_directive(&mut self, directive: &str) -> Result<(), LoggingError> {
        directive
            .parse::<Directive>()
            .map_err(|source| LoggingError::InvalidDirective {
                directive: directive.to_string(),
                source,
            })?;
        self.directives.push(directive.to_string());
        Ok(())
    }

    /// Quiet the HTTP stack unless asked otherwise.
    pub fn add_default_directives(&mut self) {
        for (target, level) in DEFAULT_DIRECTIVES {
            self.directives.push(format!("{target}={}", level.as_str()));
        }
    }

    pub fn directive_count(&self) -> usize {
        self.directives.len()
    }

    pub fn build_filter_string(&self) -> String {
        let mut parts = Vec::with_capacity(self.directives.len() + 1);
        parts.push(self.level.as_str().to_string());
        parts.extend(self.directives.iter().cloned());
        parts.join(",")
    }

    /// `RUST_LOG` wins over the configured level when it is set and parses.
    pub fn build_filter(&self) -> Result<EnvFilter, LoggingError> {
        if let Ok(from_env) = std::env::var("RUST_LOG")
            && let Ok(filter) = EnvFilter::try_new(&from_env)
        {
            return Ok(filter);
        }

        let filter_string = self.build_filter_string();
        EnvFilter::try_new(&filter_string).map_err(|source| LoggingError::InvalidDirective {
            directive: filter_string,
            source,
        })
    }

    pub fn init(&self) -> Result<(), LoggingError> {
        let filter = self.build_filter()?;
        let registry = tracing_subscriber::registry().with(filter);

        let result = match self.format {
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .flatten_event(true)
                        .with_current_span(true)
                        .with_writer(std::io::stderr),
                )
                .try_init(),
            LogFormat::Compact => registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(true)
                        .with_writer(std::io::stderr),
                )
                .try_init(),
        };

        result.map_err(|e| LoggingError::InitFailed(e.to_string()))
    }
}

/// Install logging for the given level and format, the default directives and
/// any `extra` ones.
pub fn setup_logging(
    level: LogLevel,
    format: LogFormat,
    extra: &[String],
) -> Result<(), LoggingError> {
    LoggingSystem::configured(level, format, extra)?.init()
}
