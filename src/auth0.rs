//! Auth0 hosted-login parameters
//!
//! Derives the tenant domain and the `/authorize` link the front-end opens.
//! Token handling stays with the front-end's identity client.

use crate::environment::Auth0Config;
use crate::error::EnvironmentError;

const AUTH0_DOMAIN_SUFFIX: &str = "auth0.com";

impl Auth0Config {
    /// Full tenant domain (e.g., "dev-q5n2ze8g.us.auth0.com")
    pub fn tenant_domain(&self) -> String {
        format!("{}.{}", self.url, AUTH0_DOMAIN_SUFFIX)
    }

    /// Hosted-login URL using the implicit token flow
    pub fn authorize_url(&self) -> Result<url::Url, EnvironmentError> {
        let base = format!("https://{}/authorize", self.tenant_domain());
        url::Url::parse_with_params(
            &base,
            &[
                ("audience", &*self.audience),
                ("response_type", "token"),
                ("client_id", &*self.client_id),
                ("redirect_uri", &*self.callback_url),
            ],
        )
        .map_err(|e| EnvironmentError::InvalidUrl {
            field: "auth0.url",
            reason: e.to_string(),
        })
    }
}
