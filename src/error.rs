//! Error type for environments loaded or validated at runtime.
//!
//! The baked `ENVIRONMENT` never produces these; build.rs rejects bad
//! values before the crate compiles.

/// Error type for environment operations
#[derive(Debug)]
pub enum EnvironmentError {
    Io(String),
    Parse(String),
    UnknownVariant(String),
    MissingField(&'static str),
    EmptyField(&'static str),
    InvalidUrl { field: &'static str, reason: String },
    InvalidTenant(String),
}

impl std::fmt::Display for EnvironmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvironmentError::Io(e) => write!(f, "Failed to read environment manifest: {}", e),
            EnvironmentError::Parse(e) => write!(f, "Invalid environment manifest: {}", e),
            EnvironmentError::UnknownVariant(name) => {
                write!(f, "Unknown environment variant: {}", name)
            }
            EnvironmentError::MissingField(field) => {
                write!(f, "Environment field {} is required", field)
            }
            EnvironmentError::EmptyField(field) => {
                write!(f, "Environment field {} cannot be empty", field)
            }
            EnvironmentError::InvalidUrl { field, reason } => {
                write!(f, "Environment field {} is not an absolute URL: {}", field, reason)
            }
            EnvironmentError::InvalidTenant(value) => {
                write!(f, "Auth0 tenant prefix is malformed: {}", value)
            }
        }
    }
}

impl std::error::Error for EnvironmentError {}

impl EnvironmentError {
    /// Stable upper-snake-case code for protocol responses
    pub fn code(&self) -> &'static str {
        match self {
            EnvironmentError::Io(_) => "MANIFEST_IO_ERROR",
            EnvironmentError::Parse(_) => "MANIFEST_PARSE_ERROR",
            EnvironmentError::UnknownVariant(_) => "UNKNOWN_VARIANT",
            EnvironmentError::MissingField(_) => "MISSING_FIELD",
            EnvironmentError::EmptyField(_) => "EMPTY_FIELD",
            EnvironmentError::InvalidUrl { .. } => "INVALID_URL",
            EnvironmentError::InvalidTenant(_) => "INVALID_TENANT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_field() {
        let err = EnvironmentError::EmptyField("auth0.clientId");
        assert_eq!(err.to_string(), "Environment field auth0.clientId cannot be empty");

        let err = EnvironmentError::InvalidUrl {
            field: "apiServerUrl",
            reason: "relative URL without a base".to_string(),
        };
        assert!(err.to_string().contains("apiServerUrl"));
        assert_eq!(err.code(), "INVALID_URL");
    }
}
