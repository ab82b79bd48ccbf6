//! Coffee Shop Environment Core
//!
//! Serves the baked environment record to the front-end shell via
//! JSON-RPC over stdio.
//!
//! # Protocol
//!
//! Request (one JSON object per line on stdin):
//!   { "id": "<string>", "op": "<string>", "payload": {...} }
//!
//! Response (one JSON object per line on stdout):
//!   { "id": "<string>", "ok": true|false, "result": {...}|null, "error": {...}|null }
//!
//! # Handled Operations
//!
//! - environment.get
//! - environment.variant
//! - environment.validate
//! - auth0.authorizeUrl
//! - api.url
//! - debug.isDevMode

use coffeeshop_environment::{environment, Environment, EnvironmentConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{self, BufRead, Write};

// =============================================================================
// Protocol Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct Request {
    id: String,
    op: String,
    #[serde(default)]
    payload: Value,
}

#[derive(Debug, Serialize)]
struct Response {
    id: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ResponseError>,
}

/// `code` is upper snake case (`UNKNOWN_OP`, `INVALID_PAYLOAD`, ...)
#[derive(Debug, Serialize)]
struct ResponseError {
    code: String,
    message: String,
}

impl Response {
    fn ok(id: String, result: Value) -> Self {
        Self {
            id,
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    fn err(id: String, code: &str, message: &str) -> Self {
        Self {
            id,
            ok: false,
            result: None,
            error: Some(ResponseError {
                code: code.to_string(),
                message: message.to_string(),
            }),
        }
    }
}

// =============================================================================
// Op Dispatch
// =============================================================================

fn dispatch(req: &Request) -> Response {
    match req.op.as_str() {
        "environment.get" => handle_environment_get(&req.id),
        "environment.variant" => handle_environment_variant(&req.id),
        "environment.validate" => handle_environment_validate(&req.id, &req.payload),
        "auth0.authorizeUrl" => handle_authorize_url(&req.id),
        "api.url" => handle_api_url(&req.id, &req.payload),
        "debug.isDevMode" => handle_is_dev_mode(&req.id),
        _ => Response::err(
            req.id.clone(),
            "UNKNOWN_OP",
            &format!("Environment Core does not handle op: {}", req.op),
        ),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// environment.get: the baked record, in the front-end's key shape
fn handle_environment_get(id: &str) -> Response {
    tracing::info!(op = "core.environment.get", "Handling environment.get");

    match serde_json::to_value(environment()) {
        Ok(value) => Response::ok(id.to_string(), value),
        Err(e) => Response::err(id.to_string(), "SERIALIZE_ERROR", &e.to_string()),
    }
}

/// environment.variant: which build target was baked
fn handle_environment_variant(id: &str) -> Response {
    tracing::info!(op = "core.environment.variant", "Handling environment.variant");

    Response::ok(
        id.to_string(),
        serde_json::json!({
            "variant": Environment::current(),
            "production": environment().production,
        }),
    )
}

/// environment.validate: check `payload.config`, or the baked record when absent
fn handle_environment_validate(id: &str, payload: &Value) -> Response {
    tracing::info!(op = "core.environment.validate", "Handling environment.validate");

    let config: EnvironmentConfig = match payload.get("config") {
        Some(raw) => match serde_json::from_value(raw.clone()) {
            Ok(c) => c,
            Err(e) => {
                return Response::err(
                    id.to_string(),
                    "INVALID_PAYLOAD",
                    &format!("config is not an environment record: {}", e),
                )
            }
        },
        None => environment().clone(),
    };

    match config.validate() {
        Ok(()) => Response::ok(id.to_string(), serde_json::json!({ "valid": true })),
        Err(e) => {
            tracing::warn!(
                op = "core.environment.invalid",
                reason = e.code(),
                error = %e,
                "Environment record failed validation"
            );
            Response::err(
                id.to_string(),
                "INVALID_ENVIRONMENT",
                &format!("{}: {}", e.code(), e),
            )
        }
    }
}

/// auth0.authorizeUrl: hosted-login link for the baked tenant
fn handle_authorize_url(id: &str) -> Response {
    tracing::info!(op = "core.auth0.authorizeUrl", "Handling auth0.authorizeUrl");

    match environment().auth0.authorize_url() {
        Ok(url) => Response::ok(id.to_string(), serde_json::json!({ "url": url.as_str() })),
        Err(e) => Response::err(id.to_string(), "INVALID_ENVIRONMENT", &e.to_string()),
    }
}

/// api.url: absolute backend URL for `payload.path`
fn handle_api_url(id: &str, payload: &Value) -> Response {
    tracing::info!(op = "core.api.url", "Handling api.url");

    let path = match payload.get("path").and_then(|v| v.as_str()) {
        Some(p) => p,
        None => return Response::err(id.to_string(), "INVALID_PAYLOAD", "path is required"),
    };

    match environment().api_url(path) {
        Ok(url) => Response::ok(id.to_string(), serde_json::json!({ "url": url.as_str() })),
        Err(e) => Response::err(id.to_string(), "INVALID_PAYLOAD", &e.to_string()),
    }
}

/// debug.isDevMode: inverse of the baked production flag
fn handle_is_dev_mode(id: &str) -> Response {
    tracing::info!(op = "core.debug.isDevMode", "Handling debug.isDevMode");

    Response::ok(
        id.to_string(),
        serde_json::json!({ "isDevMode": !environment().production }),
    )
}

// =============================================================================
// Main Loop
// =============================================================================

/// Handle one raw input line; `None` for blank lines
fn handle_line(raw: &[u8]) -> Option<Response> {
    let line = match std::str::from_utf8(raw) {
        Ok(l) => l,
        Err(e) => {
            return Some(Response::err(
                String::new(),
                "PARSE_ERROR",
                &format!("Request is not valid UTF-8: {}", e),
            ));
        }
    };

    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let req: Request = match serde_json::from_str(trimmed) {
        Ok(r) => r,
        Err(e) => {
            // Can't correlate to an ID, respond with empty ID
            return Some(Response::err(
                String::new(),
                "PARSE_ERROR",
                &format!("Invalid JSON request: {}", e),
            ));
        }
    };

    tracing::debug!(op = "core.dispatch", id = %req.id, op_name = %req.op, "Dispatching");

    Some(dispatch(&req))
}

/// Answer requests until EOF. Only I/O failures end the loop early.
fn serve<R: BufRead, W: Write>(mut input: R, mut output: W) -> anyhow::Result<()> {
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        let Some(resp) = handle_line(&buf) else {
            continue;
        };

        if resp.id.is_empty() {
            tracing::warn!(op = "core.request.unparsed", "Answered unparseable request line");
        }

        serde_json::to_writer(&mut output, &resp)?;
        output.write_all(b"\n")?;
        output.flush()?;
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    if dotenvy::from_filename(".env.local").is_err() {
        let _ = dotenvy::from_filename("../.env.local");
    }

    // Initialize tracing to stderr (stdout is reserved for JSON-RPC)
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("coffeeshop_env_core=info".parse()?),
        )
        .with_target(true)
        .init();

    tracing::info!(
        op = "core.startup",
        variant = %Environment::current(),
        "Environment Core starting (stdio JSON-RPC)"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();

    if let Err(e) = serve(stdin.lock(), stdout.lock()) {
        tracing::error!(op = "core.stdio.error", error = %e, "Stdio loop failed");
        return Err(e);
    }

    tracing::info!(op = "core.shutdown", "Environment Core shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffeeshop_environment::ENVIRONMENT;

    fn request(op: &str, payload: Value) -> Request {
        Request {
            id: "req-1".to_string(),
            op: op.to_string(),
            payload,
        }
    }

    #[test]
    fn test_environment_get_returns_frontend_shape() {
        let resp = dispatch(&request("environment.get", Value::Null));
        assert!(resp.ok);

        let result = resp.result.unwrap();
        assert_eq!(result["apiServerUrl"], &*ENVIRONMENT.api_server_url);
        assert_eq!(result["auth0"]["callbackURL"], &*ENVIRONMENT.auth0.callback_url);
        assert_eq!(result["auth0"]["clientId"], &*ENVIRONMENT.auth0.client_id);
        assert_eq!(result["production"], ENVIRONMENT.production);
    }

    #[test]
    fn test_variant_and_dev_mode_agree() {
        let variant = dispatch(&request("environment.variant", Value::Null)).result.unwrap();
        let dev = dispatch(&request("debug.isDevMode", Value::Null)).result.unwrap();

        assert_eq!(variant["production"], !dev["isDevMode"].as_bool().unwrap());
        assert_eq!(variant["variant"], Environment::current().as_str());
    }

    #[test]
    fn test_validate_baked_and_payload() {
        let resp = dispatch(&request("environment.validate", serde_json::json!({})));
        assert!(resp.ok);

        let mut bad = serde_json::to_value(&ENVIRONMENT).unwrap();
        bad["apiServerUrl"] = Value::String(String::new());
        let resp = dispatch(&request("environment.validate", serde_json::json!({ "config": bad })));
        assert!(!resp.ok);
        let error = resp.error.unwrap();
        assert_eq!(error.code, "INVALID_ENVIRONMENT");
        assert!(error.message.contains("apiServerUrl"));

        // Missing field is a payload error, not a validation error
        let resp = dispatch(&request(
            "environment.validate",
            serde_json::json!({ "config": { "production": false } }),
        ));
        assert_eq!(resp.error.unwrap().code, "INVALID_PAYLOAD");
    }

    #[test]
    fn test_api_url() {
        let resp = dispatch(&request("api.url", serde_json::json!({ "path": "/drinks" })));
        let url = resp.result.unwrap()["url"].as_str().unwrap().to_string();
        assert!(url.ends_with("/drinks"));
        assert!(url.starts_with(ENVIRONMENT.api_server_url.trim_end_matches('/')));

        let resp = dispatch(&request("api.url", serde_json::json!({})));
        assert_eq!(resp.error.unwrap().code, "INVALID_PAYLOAD");
    }

    #[test]
    fn test_authorize_url() {
        let resp = dispatch(&request("auth0.authorizeUrl", Value::Null));
        let url = resp.result.unwrap()["url"].as_str().unwrap().to_string();
        assert!(url.starts_with(&format!("https://{}/authorize?", ENVIRONMENT.auth0.tenant_domain())));
    }

    #[test]
    fn test_unknown_op() {
        let resp = dispatch(&request("drinks.list", Value::Null));
        assert!(!resp.ok);
        assert_eq!(resp.id, "req-1");
        assert_eq!(resp.error.unwrap().code, "UNKNOWN_OP");
    }

    #[test]
    fn test_serve_loop() {
        let input = concat!(
            "{\"id\":\"a\",\"op\":\"debug.isDevMode\"}\n",
            "\n",
            "not json\n",
            "{\"id\":\"b\",\"op\":\"environment.get\",\"payload\":{}}\n",
        );
        let mut output = Vec::new();
        serve(input.as_bytes(), &mut output).unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["id"], "a");
        assert_eq!(lines[0]["ok"], true);
        assert_eq!(lines[1]["id"], "");
        assert_eq!(lines[1]["error"]["code"], "PARSE_ERROR");
        assert_eq!(lines[2]["id"], "b");
        assert!(lines[2].get("error").is_none());
    }

    #[test]
    fn test_serve_loop_survives_invalid_utf8() {
        let mut input = b"\xff\xfe\n".to_vec();
        input.extend_from_slice(b"{\"id\":\"after\",\"op\":\"debug.isDevMode\"}");
        let mut output = Vec::new();
        serve(input.as_slice(), &mut output).unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["id"], "");
        assert_eq!(lines[0]["error"]["code"], "PARSE_ERROR");
        // Last line has no trailing newline and is still answered
        assert_eq!(lines[1]["id"], "after");
        assert_eq!(lines[1]["result"]["isDevMode"], !ENVIRONMENT.production);
    }
}
