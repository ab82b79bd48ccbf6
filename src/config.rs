//! Compile-time environment values
//!
//! All values are baked at build time from environment.config.json
//! (plus any `COFFEESHOP_*` overrides). Nothing here is read at runtime.

macro_rules! baked_config {
    ($name:ident, $env:literal) => {
        pub const fn $name() -> &'static str {
            // Missing means build.rs did not run; see environment.config.json
            env!($env)
        }
    };
}

// Variant the build selected ("development" or "production")
baked_config!(variant, "COFFEESHOP_BAKED_VARIANT");

// Backend API base (e.g., "http://127.0.0.1:5000")
baked_config!(api_server_url, "COFFEESHOP_BAKED_API_SERVER_URL");

// Auth0 tenant domain prefix (e.g., "dev-q5n2ze8g.us")
baked_config!(auth0_url, "COFFEESHOP_BAKED_AUTH0_URL");

// Auth0 API audience (e.g., "coffeeshop")
baked_config!(auth0_audience, "COFFEESHOP_BAKED_AUTH0_AUDIENCE");

// Auth0 public client id
baked_config!(auth0_client_id, "COFFEESHOP_BAKED_AUTH0_CLIENT_ID");

// Where Auth0 redirects after login (e.g., "http://localhost:8100")
baked_config!(auth0_callback_url, "COFFEESHOP_BAKED_AUTH0_CALLBACK_URL");

/// Deployment-mode flag, fixed by the variant's `production` literal
pub const fn production() -> bool {
    cfg!(coffeeshop_production)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baked_values_present() {
        for value in [
            variant(),
            api_server_url(),
            auth0_url(),
            auth0_audience(),
            auth0_client_id(),
            auth0_callback_url(),
        ] {
            assert!(!value.trim().is_empty());
        }
    }

    #[test]
    fn test_baked_tenant_passes_build_check() {
        // build.rs rejects the build otherwise, so this pins both sides to one rule
        assert!(crate::bake::is_valid_tenant(auth0_url()));
    }

    #[test]
    fn test_production_matches_variant() {
        // Shipped manifest only sets production=true on the production variant
        assert_eq!(production(), variant() == "production");
    }
}
