//! JSON-RPC request handlers, split by domain.

mod repositories;
mod status;

use crate::server::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use repohub_core::HubError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// JSON-RPC code for an unknown method.
const METHOD_NOT_FOUND: i32 = -32601;

// ============================================================================
// JSON-RPC types
// ============================================================================

/// JSON-RPC 2.0 request structure.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 error structure.
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data: None,
            }),
            id,
        }
    }
}

/// Why a call produced no result.
enum DispatchError {
    UnknownMethod,
    Hub(HubError),
}

impl From<HubError> for DispatchError {
    fn from(err: HubError) -> Self {
        DispatchError::Hub(err)
    }
}

// ============================================================================
// Parameter extraction helpers
// ============================================================================

/// Extract an optional string parameter, supporting both snake_case and camelCase.
///
/// JSON `null` counts as absent.
pub(crate) fn get_str_param<'a>(params: &'a Value, snake: &str, camel: &str) -> Option<&'a str> {
    params
        .get(snake)
        .or_else(|| params.get(camel))
        .and_then(|v| v.as_str())
}

/// Extract a required string parameter or return an error.
pub(crate) fn require_str_param(
    params: &Value,
    snake: &str,
    camel: &str,
) -> repohub_core::Result<String> {
    get_str_param(params, snake, camel)
        .map(String::from)
        .ok_or_else(|| HubError::InvalidParams {
            message: format!("Missing required parameter: {}", snake),
        })
}

// ============================================================================
// HTTP entry points
// ============================================================================

/// Health check endpoint.
pub async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// Main JSON-RPC handler.
pub async fn handle_rpc(
    State(state): State<Arc<AppState>>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    let method = &request.method;
    let params = request.params.unwrap_or(Value::Object(Default::default()));
    let id = request.id.clone();

    debug!("RPC call: {}({:?})", method, params);

    if method == "health_check" {
        return (
            StatusCode::OK,
            Json(JsonRpcResponse::success(id, json!({"status": "ok"}))),
        );
    }

    match dispatch_method(&state, method, &params).await {
        Ok(value) => (StatusCode::OK, Json(JsonRpcResponse::success(id, value))),
        Err(DispatchError::UnknownMethod) => {
            warn!("Method not found: {}", method);
            (
                StatusCode::OK,
                Json(JsonRpcResponse::error(
                    id,
                    METHOD_NOT_FOUND,
                    format!("Method not found: {}", method),
                )),
            )
        }
        Err(DispatchError::Hub(e)) => {
            error!("RPC error for {}: {}", method, e);
            (
                StatusCode::OK,
                Json(JsonRpcResponse::error(id, e.to_rpc_error_code(), e.to_string())),
            )
        }
    }
}

// ============================================================================
// Method dispatcher
// ============================================================================

/// Dispatch a method call to the appropriate domain handler.
async fn dispatch_method(
    state: &AppState,
    method: &str,
    params: &Value,
) -> Result<Value, DispatchError> {
    let value = match method {
        // Repositories
        "get_repository_information" => {
            repositories::get_repository_information(state, params).await?
        }
        "prepare_to_receive_repository" => {
            repositories::prepare_to_receive_repository(state, params).await?
        }
        "list_repositories" => repositories::list_repositories(state, params).await?,

        // Status
        "get_status" => status::get_status(state, params).await?,

        _ => return Err(DispatchError::UnknownMethod),
    };
    Ok(value)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_str_param_prefers_snake_case() {
        let params = json!({"search_url": "a", "searchUrl": "b"});
        assert_eq!(get_str_param(&params, "search_url", "searchUrl"), Some("a"));

        let params = json!({"searchUrl": "b"});
        assert_eq!(get_str_param(&params, "search_url", "searchUrl"), Some("b"));

        let params = json!({"search_url": null});
        assert_eq!(get_str_param(&params, "search_url", "searchUrl"), None);
    }

    #[test]
    fn test_require_str_param_reports_missing_name() {
        let err = require_str_param(&json!({}), "directory_name", "directoryName").unwrap_err();
        assert_eq!(err.to_rpc_error_code(), -32602);
        assert!(err.to_string().contains("directory_name"));
    }

    #[test]
    fn test_error_response_shape() {
        let response = JsonRpcResponse::error(Some(json!(7)), METHOD_NOT_FOUND, "nope".into());
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["id"], 7);
        assert_eq!(value["error"]["code"], -32601);
        assert!(value.get("result").is_none());
    }
}
