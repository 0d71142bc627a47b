//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic checks (serde handles syntactic ones)
//! - Runs before the configuration is accepted by the manager
//!
//! # Design Decisions
//! - Validation is a pure function over the config value

use thiserror::Error;

use crate::config::schema::TraceConfig;

/// Error raised when a configuration value is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The service name is empty or whitespace-only.
    #[error("service name must not be empty")]
    EmptyServiceName,
}

/// Validate a configuration value.
pub fn validate_config(config: &TraceConfig) -> Result<(), ConfigError> {
    if config.service_name.trim().is_empty() {
        return Err(ConfigError::EmptyServiceName);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(validate_config(&TraceConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_service_name_rejected() {
        let config = TraceConfig {
            service_name: String::new(),
            ..TraceConfig::default()
        };
        assert_eq!(
            validate_config(&config),
            Err(ConfigError::EmptyServiceName)
        );
    }

    #[test]
    fn test_whitespace_service_name_rejected() {
        let config = TraceConfig {
            service_name: "   ".to_string(),
            ..TraceConfig::default()
        };
        assert_eq!(
            validate_config(&config),
            Err(ConfigError::EmptyServiceName)
        );
    }
}
