//! Error types for configuration loading and validation

use std::path::PathBuf;
use thiserror::Error;
use validator::ValidationErrors;

/// Unified configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File not found error.
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// Configuration validation error.
    #[error("Invalid configuration:\n{}", format_validation_errors(.0))]
    Validation(#[source] ValidationErrors),

    /// Figment parsing error.
    #[error("Configuration parsing error: {0}")]
    Parsing(#[from] figment::Error),
}

fn format_validation_errors(errors: &ValidationErrors) -> String {
    use std::fmt::Write;

    let mut output = String::new();
    for (field, errors) in errors.errors() {
        let _ = writeln!(output, "Field '{}':", field);
        for message in describe(errors) {
            let _ = writeln!(output, "  - {}", message);
        }
    }
    output
}

fn describe(kind: &validator::ValidationErrorsKind) -> Vec<String> {
    use validator::ValidationErrorsKind;

    match kind {
        ValidationErrorsKind::Field(errors) => errors
            .iter()
            .map(|error| match &error.message {
                Some(msg) => msg.to_string(),
                None => error.code.to_string(),
            })
            .collect(),
        ValidationErrorsKind::Struct(nested) => nested
            .errors()
            .iter()
            .flat_map(|(field, kind)| {
                describe(kind)
                    .into_iter()
                    .map(move |message| format!("{}: {}", field, message))
            })
            .collect(),
        ValidationErrorsKind::List(items) => items
            .values()
            .flat_map(|nested| nested.errors().values().flat_map(describe))
            .collect(),
    }
}

impl From<ValidationErrors> for ConfigError {
    fn from(errors: ValidationErrors) -> Self {
        ConfigError::Validation(errors)
    }
}
