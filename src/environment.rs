//! Environment Record
//!
//! The read-only record the front-end shell threads into its HTTP client
//! (`apiServerUrl`) and identity-provider client (`auth0.*`).
//!
//! ## Wire Shape
//!
//! Serializes to the same keys the front-end `environment` export uses:
//!
//! ```json
//! {
//!   "production": false,
//!   "apiServerUrl": "http://127.0.0.1:5000",
//!   "auth0": { "url": "...", "audience": "...", "clientId": "...", "callbackURL": "..." }
//! }
//! ```

use crate::bake;
use crate::config;
use crate::error::EnvironmentError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;

// =============================================================================
// Types
// =============================================================================

/// Build target an environment record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    /// Variant selected when this crate was built
    pub fn current() -> Self {
        if config::variant() == "production" {
            Environment::Production
        } else {
            Environment::Development
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = EnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            other => Err(EnvironmentError::UnknownVariant(other.to_string())),
        }
    }
}

/// Identity-provider parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auth0Config {
    /// Tenant domain prefix (e.g., "dev-q5n2ze8g.us")
    pub url: Cow<'static, str>,
    pub audience: Cow<'static, str>,
    #[serde(rename = "clientId")]
    pub client_id: Cow<'static, str>,
    /// Base URL of the running front-end; Auth0 redirects here after login
    #[serde(rename = "callbackURL")]
    pub callback_url: Cow<'static, str>,
}

/// Environment-specific values for the front-end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentConfig {
    pub production: bool,
    pub api_server_url: Cow<'static, str>,
    pub auth0: Auth0Config,
}

/// The environment baked into this build
pub const ENVIRONMENT: EnvironmentConfig = EnvironmentConfig {
    production: config::production(),
    api_server_url: Cow::Borrowed(config::api_server_url()),
    auth0: Auth0Config {
        url: Cow::Borrowed(config::auth0_url()),
        audience: Cow::Borrowed(config::auth0_audience()),
        client_id: Cow::Borrowed(config::auth0_client_id()),
        callback_url: Cow::Borrowed(config::auth0_callback_url()),
    },
};

static BAKED: EnvironmentConfig = ENVIRONMENT;

/// Shared reference to the baked environment
pub fn environment() -> &'static EnvironmentConfig {
    &BAKED
}

// =============================================================================
// Validation
// =============================================================================

impl EnvironmentConfig {
    /// Check the record invariants: every string non-empty, both URLs
    /// absolute http(s), tenant prefix well formed.
    pub fn validate(&self) -> Result<(), EnvironmentError> {
        require_non_empty("apiServerUrl", &self.api_server_url)?;
        require_non_empty("auth0.url", &self.auth0.url)?;
        require_non_empty("auth0.audience", &self.auth0.audience)?;
        require_non_empty("auth0.clientId", &self.auth0.client_id)?;
        require_non_empty("auth0.callbackURL", &self.auth0.callback_url)?;

        parse_absolute_url("apiServerUrl", &self.api_server_url)?;
        parse_absolute_url("auth0.callbackURL", &self.auth0.callback_url)?;

        if !bake::is_valid_tenant(&self.auth0.url) {
            return Err(EnvironmentError::InvalidTenant(self.auth0.url.to_string()));
        }

        Ok(())
    }

    /// Copy of this record with only the deployment flag changed
    pub fn with_production(&self, production: bool) -> Self {
        Self {
            production,
            ..self.clone()
        }
    }

    /// Absolute URL of a backend route (e.g., "/drinks", "drinks/1")
    pub fn api_url(&self, path: &str) -> Result<url::Url, EnvironmentError> {
        let mut base = parse_absolute_url("apiServerUrl", &self.api_server_url)?;
        // Keep any base path segment; join() would drop it without a trailing slash
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        let joined = base
            .join(path.trim_start_matches('/'))
            .map_err(|e| EnvironmentError::InvalidUrl {
                field: "apiServerUrl",
                reason: e.to_string(),
            })?;

        // Absolute URLs and `..` segments must not escape the API base
        if !joined.as_str().starts_with(base.as_str()) {
            return Err(EnvironmentError::InvalidUrl {
                field: "apiServerUrl",
                reason: format!("route '{}' resolves outside {}", path, base),
            });
        }

        Ok(joined)
    }
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), EnvironmentError> {
    if value.trim().is_empty() {
        return Err(EnvironmentError::EmptyField(field));
    }
    Ok(())
}

pub(crate) fn parse_absolute_url(
    field: &'static str,
    value: &str,
) -> Result<url::Url, EnvironmentError> {
    let parsed = url::Url::parse(value).map_err(|e| EnvironmentError::InvalidUrl {
        field,
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
        return Err(EnvironmentError::InvalidUrl {
            field,
            reason: format!("expected http(s) URL with a host, got '{}'", value),
        });
    }

    Ok(parsed)
}
