//! Rules shared by build.rs and the runtime validator.
//!
//! build.rs pulls this file in with `#[path]`, so it may only depend on
//! crates listed under both `[dependencies]` and `[build-dependencies]`.

#![allow(dead_code)] // resolve_field is only called from build.rs

use serde_json::Value;

lazy_static::lazy_static! {
    static ref TENANT_RE: regex::Regex =
        regex::Regex::new(r"^[a-z0-9][a-z0-9-]*(\.[a-z]{2})?$").unwrap();
}

/// Auth0 tenant prefix such as "dev-q5n2ze8g.us" (no scheme, no auth0.com)
pub fn is_valid_tenant(value: &str) -> bool {
    TENANT_RE.is_match(value)
}

#[derive(Debug, PartialEq)]
pub enum FieldProblem {
    Missing,
    WrongType(&'static str),
}

/// Resolve one string field: non-empty override > manifest literal.
///
/// An override set to "" counts as unset.
pub fn resolve_field(
    override_value: Option<String>,
    variant: &Value,
    path: &str,
) -> Result<String, FieldProblem> {
    if let Some(value) = override_value.filter(|v| !v.trim().is_empty()) {
        return Ok(value);
    }

    match lookup(variant, path) {
        None | Some(Value::Null) => Err(FieldProblem::Missing),
        Some(Value::String(s)) if s.trim().is_empty() => Err(FieldProblem::Missing),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(FieldProblem::WrongType(json_type(other))),
    }
}

/// Look up a dotted path such as `auth0.clientId`
fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |node, key| node.get(key))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_shapes() {
        assert!(is_valid_tenant("dev-q5n2ze8g.us"));
        assert!(is_valid_tenant("coffee-shop"));

        assert!(!is_valid_tenant("Coffee_Shop.example"));
        assert!(!is_valid_tenant("https://dev-q5n2ze8g.us.auth0.com"));
        assert!(!is_valid_tenant("-leading-dash"));
        assert!(!is_valid_tenant(""));
    }

    #[test]
    fn test_resolve_field_override_wins() {
        let variant = serde_json::json!({ "apiServerUrl": "http://127.0.0.1:5000" });

        let value = resolve_field(Some("https://api.example.com".to_string()), &variant, "apiServerUrl");
        assert_eq!(value, Ok("https://api.example.com".to_string()));
    }

    #[test]
    fn test_resolve_field_empty_override_falls_back() {
        let variant = serde_json::json!({ "auth0": { "audience": "coffeeshop" } });

        assert_eq!(
            resolve_field(Some(String::new()), &variant, "auth0.audience"),
            Ok("coffeeshop".to_string())
        );
        assert_eq!(
            resolve_field(Some("  ".to_string()), &variant, "auth0.audience"),
            Ok("coffeeshop".to_string())
        );
    }

    #[test]
    fn test_resolve_field_missing_and_wrong_type() {
        let variant = serde_json::json!({
            "apiServerUrl": 5000,
            "auth0": { "url": "", "clientId": null, "audience": ["coffeeshop"] }
        });

        assert_eq!(
            resolve_field(None, &variant, "apiServerUrl"),
            Err(FieldProblem::WrongType("number"))
        );
        assert_eq!(
            resolve_field(None, &variant, "auth0.audience"),
            Err(FieldProblem::WrongType("array"))
        );
        assert_eq!(resolve_field(None, &variant, "auth0.url"), Err(FieldProblem::Missing));
        assert_eq!(resolve_field(None, &variant, "auth0.clientId"), Err(FieldProblem::Missing));
        assert_eq!(resolve_field(None, &variant, "auth0.callbackURL"), Err(FieldProblem::Missing));
    }
}
