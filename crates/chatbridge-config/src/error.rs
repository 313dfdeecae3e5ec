//! Configuration errors.

use thiserror::Error;

/// Everything that can go wrong while building a [`Config`](crate::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("Missing required environment variable '{key}'")]
    Missing {
        /// Variable name.
        key: &'static str,
    },

    /// A variable is set but does not hold a value of the expected kind.
    #[error("Environment variable '{key}' must be {expected}, got '{value}'")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// Human readable description of the accepted values.
        expected: &'static str,
        /// The rejected value.
        value: String,
    },

    /// Several variables failed at once.
    #[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ConfigError>),

    /// A cross-field rule was violated.
    #[error("Invalid configuration: {0}")]
    Validation(String),

    /// The `.env` file exists but could not be read.
    #[error("Failed to read .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
}

impl ConfigError {
    /// Collapses a list of errors, keeping a single one unwrapped.
    pub fn from_list(mut errors: Vec<Self>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Multiple(errors)),
        }
    }

    /// Iterates over the individual errors.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &Self> + '_> {
        match self {
            Self::Multiple(errors) => Box::new(errors.iter()),
            other => Box::new(std::iter::once(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_error_is_not_wrapped() {
        let err = ConfigError::from_list(vec![ConfigError::Missing { key: "DEV_MODE" }]).unwrap();
        assert!(matches!(err, ConfigError::Missing { key: "DEV_MODE" }));
    }

    #[test]
    fn test_multiple_errors_join_messages() {
        let err = ConfigError::from_list(vec![
            ConfigError::Missing { key: "A" },
            ConfigError::Missing { key: "B" },
        ])
        .unwrap();

        assert_eq!(err.iter().count(), 2);
        assert_eq!(
            err.to_string(),
            "Missing required environment variable 'A'; Missing required environment variable 'B'"
        );
    }

    #[test]
    fn test_empty_list_is_none() {
        assert!(ConfigError::from_list(Vec::new()).is_none());
    }
}
