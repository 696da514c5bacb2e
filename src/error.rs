use thiserror::Error;

/// Main error type for oneconfig operations
#[derive(Debug, Error)]
pub enum OneConfigError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid key: {name}")]
    InvalidKey { name: String },

    #[error("Invalid environment: {name}")]
    InvalidEnv { name: String },

    #[error("Invalid version '{version}': {details}")]
    InvalidVersion { version: String, details: String },

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("Failed to parse {content_type} content: {details}")]
    ParseError {
        content_type: String,
        details: String,
    },

    #[error("Backend '{backend}' is read-only")]
    ReadOnlyBackend { backend: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration loading error: {0}")]
    ConfigLoadError(#[from] config::ConfigError),
}

impl OneConfigError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn invalid_key<S: Into<String>>(name: S) -> Self {
        Self::InvalidKey { name: name.into() }
    }

    pub fn invalid_env<S: Into<String>>(name: S) -> Self {
        Self::InvalidEnv { name: name.into() }
    }

    pub fn invalid_version<S: Into<String>, D: Into<String>>(version: S, details: D) -> Self {
        Self::InvalidVersion {
            version: version.into(),
            details: details.into(),
        }
    }

    pub fn unsupported_content_type<S: Into<String>>(content_type: S) -> Self {
        Self::UnsupportedContentType(content_type.into())
    }

    pub fn parse<S: Into<String>, D: Into<String>>(content_type: S, details: D) -> Self {
        Self::ParseError {
            content_type: content_type.into(),
            details: details.into(),
        }
    }

    pub fn read_only<S: Into<String>>(backend: S) -> Self {
        Self::ReadOnlyBackend {
            backend: backend.into(),
        }
    }

    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Self::SerializationError(msg.into())
    }
}

/// Result type alias for oneconfig operations
pub type Result<T> = std::result::Result<T, OneConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_errors_convert() {
        let io: OneConfigError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(io, OneConfigError::IoError(_)));

        let json: OneConfigError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(json, OneConfigError::JsonError(_)));
    }

    #[test]
    fn test_version_and_parse_messages() {
        let err = OneConfigError::invalid_version("1.x", "unexpected character");
        assert_eq!(err.to_string(), "Invalid version '1.x': unexpected character");

        let err = OneConfigError::parse("toml", "expected `=`");
        assert_eq!(err.to_string(), "Failed to parse toml content: expected `=`");
    }
}
