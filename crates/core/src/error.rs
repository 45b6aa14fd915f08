use std::io;
use std::path::PathBuf;

/// Exit status used by a worker when it finished normally.
pub const EXIT_OK: i32 = 0;
/// Exit status used by a worker when the engine reported failing tests.
pub const EXIT_TESTS_FAILED: i32 = 1;
/// Exit status for errors that do not belong to the hand-off taxonomy.
pub const EXIT_OTHER: i32 = 2;
pub const EXIT_TRANSPORT: i32 = 10;
pub const EXIT_FORMAT: i32 = 11;
pub const EXIT_CONFIGURATION_CORRUPT: i32 = 12;
pub const EXIT_ENCODING: i32 = 13;

/// Errors that can occur while handing a configuration to a forked worker
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Encoding error: {field}: {reason}")]
    Encoding { field: String, reason: String },

    #[error("Transport error at {}: {source}", path.display())]
    Transport {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Format error on line {line}: {reason}")]
    Format { line: usize, reason: String },

    #[error("Configuration corrupt: missing key '{key}'")]
    MissingKey { key: String },

    #[error("Configuration corrupt: key '{key}' has value '{value}', expected {expected}")]
    MalformedValue {
        key: String,
        value: String,
        expected: String,
    },

    #[error("Hand-off error: {0}")]
    Handoff(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn encoding(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Encoding {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn transport(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Transport {
            path: path.into(),
            source,
        }
    }

    pub fn missing_key(key: impl Into<String>) -> Self {
        Error::MissingKey { key: key.into() }
    }

    pub fn malformed(
        key: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Error::MalformedValue {
            key: key.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// True for the decode failures that mean the persisted configuration
    /// cannot be trusted: a required key is absent or unparseable.
    pub fn is_configuration_corrupt(&self) -> bool {
        matches!(self, Error::MissingKey { .. } | Error::MalformedValue { .. })
    }

    /// The key path a corrupt configuration error refers to.
    pub fn key(&self) -> Option<&str> {
        match self {
            Error::MissingKey { key } | Error::MalformedValue { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Worker exit status for this error, so the parent can tell the
    /// failure classes apart without parsing output.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Transport { .. } => EXIT_TRANSPORT,
            Error::Format { .. } => EXIT_FORMAT,
            Error::MissingKey { .. } | Error::MalformedValue { .. } => EXIT_CONFIGURATION_CORRUPT,
            Error::Encoding { .. } => EXIT_ENCODING,
            _ => EXIT_OTHER,
        }
    }
}

/// Result type alias for forkboot operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_classification() {
        let missing = Error::missing_key("startup.providerClassName");
        assert!(missing.is_configuration_corrupt());
        assert_eq!(missing.key(), Some("startup.providerClassName"));
        assert!(missing.to_string().contains("startup.providerClassName"));

        let malformed = Error::malformed("fork.number", "x", "an integer");
        assert!(malformed.is_configuration_corrupt());

        let format = Error::Format {
            line: 3,
            reason: "missing '='".to_string(),
        };
        assert!(!format.is_configuration_corrupt());
        assert_eq!(format.key(), None);
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [
            Error::transport("/tmp/x", io::Error::from(io::ErrorKind::NotFound)).exit_code(),
            Error::Format {
                line: 1,
                reason: String::new(),
            }
            .exit_code(),
            Error::missing_key("a").exit_code(),
            Error::encoding("a", "b").exit_code(),
            Error::Handoff("x".to_string()).exit_code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            assert_ne!(*a, EXIT_OK);
            assert_ne!(*a, EXIT_TESTS_FAILED);
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
