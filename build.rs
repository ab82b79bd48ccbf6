use std::env;
use std::fs;
use std::path::Path;

#[path = "src/bake.rs"]
mod bake;

use bake::FieldProblem;

/// (JSON path, build-time override, baked env var)
const STRING_FIELDS: [(&str, &str, &str); 5] = [
    ("apiServerUrl", "COFFEESHOP_API_SERVER_URL", "COFFEESHOP_BAKED_API_SERVER_URL"),
    ("auth0.url", "COFFEESHOP_AUTH0_URL", "COFFEESHOP_BAKED_AUTH0_URL"),
    ("auth0.audience", "COFFEESHOP_AUTH0_AUDIENCE", "COFFEESHOP_BAKED_AUTH0_AUDIENCE"),
    ("auth0.clientId", "COFFEESHOP_AUTH0_CLIENT_ID", "COFFEESHOP_BAKED_AUTH0_CLIENT_ID"),
    ("auth0.callbackURL", "COFFEESHOP_AUTH0_CALLBACK_URL", "COFFEESHOP_BAKED_AUTH0_CALLBACK_URL"),
];

const URL_FIELDS: [&str; 2] = ["apiServerUrl", "auth0.callbackURL"];

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let config_path = Path::new(&manifest_dir).join("environment.config.json");

    // Rerun if config or any override changes
    println!("cargo:rerun-if-changed={}", config_path.display());
    println!("cargo:rerun-if-changed=src/bake.rs");
    println!("cargo:rerun-if-env-changed=COFFEESHOP_ENV");
    for (_, override_var, _) in STRING_FIELDS {
        println!("cargo:rerun-if-env-changed={}", override_var);
    }
    println!("cargo:rustc-check-cfg=cfg(coffeeshop_production)");

    // 1. Read environment.config.json
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|_| {
        panic!(
            "\n\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  BUILD ERROR: environment.config.json not found                  ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            ║  This file lists the environment variants baked into the app.    ║\n\
            ║  Restore it from version control before building.                ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n\n"
        )
    });

    let config: serde_json::Value = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        panic!("\n\nBUILD ERROR: Invalid environment.config.json: {}\n\n", e)
    });

    // 2. Select the variant
    let variant = env::var("COFFEESHOP_ENV").unwrap_or_else(|_| "development".to_string());
    if variant != "development" && variant != "production" {
        panic!(
            "\n\nBUILD ERROR: COFFEESHOP_ENV must be 'development' or 'production', got '{}'\n\n",
            variant
        );
    }

    let environments = config
        .get("environments")
        .expect("environment.config.json missing 'environments' section");
    let empty = serde_json::Value::Object(Default::default());
    let selected = environments.get(&variant).unwrap_or(&empty);

    // 3. Resolve each field: override > manifest literal
    let mut resolved = Vec::with_capacity(STRING_FIELDS.len());
    for (path, override_var, baked_var) in STRING_FIELDS {
        let value = match bake::resolve_field(env::var(override_var).ok(), selected, path) {
            Ok(value) => value,
            Err(FieldProblem::Missing) => panic!(
                "\n\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  BUILD ERROR: environment value missing                          ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║  variant:  {:<54}║\n\
                ║  field:    {:<54}║\n\
                ║                                                                  ║\n\
                ║  Set it in environment.config.json or export {:<20}║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n\n",
                variant, path, override_var
            ),
            Err(FieldProblem::WrongType(found)) => panic!(
                "\n\nBUILD ERROR: environments.{}.{} must be a string, got {}\n\n",
                variant, path, found
            ),
        };

        if path == "auth0.url" && !bake::is_valid_tenant(&value) {
            panic!(
                "\n\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  BUILD ERROR: auth0.url is not an Auth0 tenant prefix            ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║  got:      {:<54}║\n\
                ║                                                                  ║\n\
                ║  Expected lowercase prefix like \"dev-q5n2ze8g.us\" (no scheme,   ║\n\
                ║  no .auth0.com). Fix environment.config.json or export           ║\n\
                ║  COFFEESHOP_AUTH0_URL.                                           ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n\n",
                value
            );
        }

        if URL_FIELDS.contains(&path) {
            validate_url(path, &value);
        }

        resolved.push((baked_var, value));
    }

    let production = match selected.get("production") {
        Some(serde_json::Value::Bool(flag)) => *flag,
        Some(other) => panic!(
            "\n\nBUILD ERROR: environments.{}.production must be a boolean literal, got {}\n\n",
            variant, other
        ),
        None => variant == "production",
    };

    // 4. Bake values into binary at compile time
    println!("cargo:rustc-env=COFFEESHOP_BAKED_VARIANT={}", variant);
    for (baked_var, value) in resolved {
        println!("cargo:rustc-env={}={}", baked_var, value);
    }
    if production {
        println!("cargo:rustc-cfg=coffeeshop_production");
    }
}

fn validate_url(path: &str, value: &str) {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => {}
        Ok(parsed) => panic!(
            "\n\nBUILD ERROR: {} must be an absolute http(s) URL, got scheme '{}' in '{}'\n\n",
            path,
            parsed.scheme(),
            value
        ),
        Err(e) => panic!(
            "\n\nBUILD ERROR: {} is not a valid URL ('{}'): {}\n\n",
            path, value, e
        ),
    }
}
