//! Error types for the catalog-synth application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Construct errors
    #[error("Invalid {description} for resource {path}, {message}")]
    Validation {
        description: String,
        path: String,
        message: String,
    },

    #[error("Invalid construct id: {0}")]
    ConstructId(String),

    #[error("Duplicate logical id '{0}' in stack")]
    DuplicateLogicalId(String),

    #[error("Missing required Portfolio ID from Portfolio ARN: {0}")]
    Arn(String),

    // Template sources
    #[error("Template error: {0}")]
    TemplateSource(String),

    // Asset errors
    #[error("Asset error: {0}")]
    Asset(String),

    #[error("Invalid filename (path traversal attempt): {0}")]
    InvalidFilename(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a construct validation error for the resource at `path`.
    pub fn validation(
        description: impl Into<String>,
        path: impl std::fmt::Display,
        message: impl Into<String>,
    ) -> Self {
        Error::Validation {
            description: description.into(),
            path: path.to_string(),
            message: message.into(),
        }
    }

    /// Process exit code reported for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_)
            | Error::ConfigValidation { .. }
            | Error::MissingConfig(_)
            | Error::TomlParse(_)
            | Error::TemplateSource(_) => exit_codes::CONFIG_ERROR,
            Error::Validation { .. }
            | Error::ConstructId(_)
            | Error::DuplicateLogicalId(_)
            | Error::Arn(_)
            | Error::UrlParse(_) => exit_codes::VALIDATION_ERROR,
            Error::Asset(_) | Error::InvalidFilename(_) | Error::Io(_) => exit_codes::PUBLISH_ERROR,
            Error::Json(_) => exit_codes::UNEXPECTED_ERROR,
        }
    }
}

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const CONFIG_ERROR: i32 = 3;
    pub const VALIDATION_ERROR: i32 = 4;
    pub const PUBLISH_ERROR: i32 = 5;
    pub const UNEXPECTED_ERROR: i32 = 6;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_path() {
        let err = Error::validation("support email", "Stack/MyProduct", "expected a valid email");
        assert_eq!(
            err.to_string(),
            "Invalid support email for resource Stack/MyProduct, expected a valid email"
        );
    }

    #[test]
    fn test_arn_message() {
        let err = Error::Arn("arn:aws:catalog:region:account-id:product".into());
        assert_eq!(
            err.to_string(),
            "Missing required Portfolio ID from Portfolio ARN: arn:aws:catalog:region:account-id:product"
        );
    }

    #[test]
    fn test_unreadable_template_is_an_input_error() {
        let err = Error::TemplateSource("Failed to read template missing.json".into());
        assert_eq!(err.exit_code(), exit_codes::CONFIG_ERROR);
        assert_eq!(Error::Asset("hashing failed".into()).exit_code(), exit_codes::PUBLISH_ERROR);
    }
}
