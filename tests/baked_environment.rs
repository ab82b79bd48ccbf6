//! Checks on the record compiled into this build.

use coffeeshop_environment::{config, environment, Environment, ENVIRONMENT};

fn is_default_build() -> bool {
    option_env!("COFFEESHOP_ENV").map_or(true, |v| v == "development")
        && option_env!("COFFEESHOP_API_SERVER_URL").is_none()
        && option_env!("COFFEESHOP_AUTH0_CALLBACK_URL").is_none()
}

#[test]
fn test_development_values() {
    if !is_default_build() {
        return;
    }

    assert_eq!(Environment::current(), Environment::Development);
    assert!(!ENVIRONMENT.production);
    assert_eq!(ENVIRONMENT.api_server_url, "http://127.0.0.1:5000");
    assert_eq!(ENVIRONMENT.auth0.callback_url, "http://localhost:8100");
}

#[test]
fn test_all_strings_non_empty() {
    let env = environment();
    for value in [
        &env.api_server_url,
        &env.auth0.url,
        &env.auth0.audience,
        &env.auth0.client_id,
        &env.auth0.callback_url,
    ] {
        assert!(!value.trim().is_empty());
    }
}

#[test]
fn test_urls_are_absolute() {
    for value in [&ENVIRONMENT.api_server_url, &ENVIRONMENT.auth0.callback_url] {
        let parsed = url::Url::parse(value).unwrap();
        assert!(parsed.has_host());
        assert!(matches!(parsed.scheme(), "http" | "https"));
    }
    assert!(ENVIRONMENT.validate().is_ok());
}

#[test]
fn test_flag_is_independent_of_other_fields() {
    let flipped = ENVIRONMENT.with_production(!ENVIRONMENT.production);

    assert_ne!(flipped.production, ENVIRONMENT.production);
    assert_eq!(flipped.api_server_url, ENVIRONMENT.api_server_url);
    assert_eq!(flipped.auth0, ENVIRONMENT.auth0);
}

#[test]
fn test_record_is_shared_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| environment().api_server_url.to_string()))
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), config::api_server_url());
    }
}
