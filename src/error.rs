use thiserror::Error;

/// Unified error type for get-build-number operations
#[derive(Error, Debug)]
pub enum BuildNumberError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment error: {0}")]
    Environment(String),

    #[error("Storage error: {0}")]
    Store(String),

    #[error("Encoding error: {0}")]
    Codec(String),

    #[error("Could not get the highest existing buildtrain and minor from storage")]
    NoFallbackKey,

    #[error("Build counter for '{0}' cannot be incremented any further")]
    CounterOverflow(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in get-build-number
pub type Result<T> = std::result::Result<T, BuildNumberError>;

impl BuildNumberError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        BuildNumberError::Config(msg.into())
    }

    /// Create an environment error with context
    pub fn environment(msg: impl Into<String>) -> Self {
        BuildNumberError::Environment(msg.into())
    }

    /// Create a storage error with context
    pub fn store(msg: impl Into<String>) -> Self {
        BuildNumberError::Store(msg.into())
    }

    /// Create an encoding error with context
    pub fn codec(msg: impl Into<String>) -> Self {
        BuildNumberError::Codec(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BuildNumberError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BuildNumberError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_no_fallback_key_message() {
        let err = BuildNumberError::NoFallbackKey;
        assert!(err.to_string().contains("highest existing buildtrain"));
    }

    #[test]
    fn test_counter_overflow_names_key() {
        let err = BuildNumberError::CounterOverflow("0A".to_string());
        assert!(err.to_string().contains("'0A'"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (BuildNumberError::config("x"), "Configuration error"),
            (BuildNumberError::environment("x"), "Environment error"),
            (BuildNumberError::store("x"), "Storage error"),
            (BuildNumberError::codec("x"), "Encoding error"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }

    #[test]
    fn test_error_empty_messages() {
        let errors = vec![
            BuildNumberError::config(""),
            BuildNumberError::environment(""),
            BuildNumberError::store(""),
        ];

        for err in errors {
            // Even with empty message, the error type prefix should be present
            assert!(!err.to_string().is_empty());
        }
    }
}
