//! Environment Manifest
//!
//! Runtime reader for `environment.config.json`, the same file build.rs
//! bakes from. Used by tooling and tests that need to inspect a variant
//! other than the one compiled in.
//!
//! Variants may be partial; `resolve` reports the first missing field.

use crate::environment::{Auth0Config, Environment, EnvironmentConfig};
use crate::error::EnvironmentError;
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartialAuth0 {
    url: Option<String>,
    audience: Option<String>,
    client_id: Option<String>,
    #[serde(rename = "callbackURL")]
    callback_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartialEnvironment {
    production: Option<bool>,
    api_server_url: Option<String>,
    #[serde(default)]
    auth0: PartialAuth0,
}

/// All environment variants declared in a manifest
#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentManifest {
    environments: BTreeMap<Environment, PartialEnvironment>,
}

impl EnvironmentManifest {
    pub fn from_file(path: &Path) -> Result<Self, EnvironmentError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| EnvironmentError::Io(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(
            op = "environment.manifest.load",
            path = %path.display(),
            "Loading environment manifest"
        );

        content.parse()
    }

    /// Variants present in the manifest, in declaration-independent order
    pub fn variants(&self) -> impl Iterator<Item = Environment> + '_ {
        self.environments.keys().copied()
    }

    /// Build and validate the record for one variant.
    ///
    /// `production` defaults to `env == Production` when the variant omits it.
    pub fn resolve(&self, env: Environment) -> Result<EnvironmentConfig, EnvironmentError> {
        let partial = self
            .environments
            .get(&env)
            .ok_or_else(|| EnvironmentError::UnknownVariant(env.to_string()))?;

        let config = EnvironmentConfig {
            production: partial
                .production
                .unwrap_or(env == Environment::Production),
            api_server_url: required("apiServerUrl", &partial.api_server_url)?,
            auth0: Auth0Config {
                url: required("auth0.url", &partial.auth0.url)?,
                audience: required("auth0.audience", &partial.auth0.audience)?,
                client_id: required("auth0.clientId", &partial.auth0.client_id)?,
                callback_url: required("auth0.callbackURL", &partial.auth0.callback_url)?,
            },
        };

        if let Err(e) = config.validate() {
            tracing::warn!(
                op = "environment.manifest.invalid",
                variant = %env,
                error = %e,
                "Environment variant failed validation"
            );
            return Err(e);
        }

        Ok(config)
    }
}

impl std::str::FromStr for EnvironmentManifest {
    type Err = EnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map_err(|e| EnvironmentError::Parse(e.to_string()))
    }
}

fn required(
    field: &'static str,
    value: &Option<String>,
) -> Result<Cow<'static, str>, EnvironmentError> {
    value
        .clone()
        .map(Cow::Owned)
        .ok_or(EnvironmentError::MissingField(field))
}
