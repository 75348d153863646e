use std::net::SocketAddr;

use crate::ConfigResult;

/// Trait for configuration validation
pub trait ConfigValidator {
    fn validate(&self) -> ConfigResult<()>;
}

/// General validation utilities
pub struct ValidationUtils;

impl ValidationUtils {
    /// Validate that a string is not empty
    pub fn validate_not_empty(value: &str, field_name: &str) -> ConfigResult<()> {
        if value.trim().is_empty() {
            return Err(crate::ConfigError::Validation(format!(
                "{field_name} cannot be empty"
            )));
        }
        Ok(())
    }

    /// Validate that a timeout is reasonable
    pub fn validate_timeout_seconds(timeout_seconds: u64) -> ConfigResult<()> {
        if timeout_seconds == 0 {
            return Err(crate::ConfigError::Validation(
                "timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if timeout_seconds > 3600 {
            return Err(crate::ConfigError::Validation(
                "timeout_seconds must be less than or equal to 3600".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_socket_addr(value: &str, field_name: &str) -> ConfigResult<()> {
        value.parse::<SocketAddr>().map(|_| ()).map_err(|e| {
            crate::ConfigError::Validation(format!(
                "{field_name} is not a valid socket address ({value}): {e}"
            ))
        })
    }

    /// Validate that an endpoint path starts with '/'
    pub fn validate_endpoint_path(value: &str, field_name: &str) -> ConfigResult<()> {
        if !value.starts_with('/') {
            return Err(crate::ConfigError::Validation(format!(
                "{field_name} must start with '/'"
            )));
        }
        Ok(())
    }
}
