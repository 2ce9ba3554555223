//! The JSON-RPC 2.0 endpoint.
//!
//! One route, `POST /mcp`. Handler-level outcomes (including validation and
//! upstream failures) ride inside a `ToolResult` with HTTP 200; only a
//! panicking handler produces a JSON-RPC error object with HTTP 500. The
//! request `id` is echoed byte-for-byte, null included.

use std::{panic::AssertUnwindSafe, sync::Arc};

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{ToolContext, result::ToolResult};

const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const SERVER_ERROR: i32 = -32000;

#[derive(Debug, Deserialize)]
struct RpcRequest {
    #[serde(default)]
    id: Value,
    method: String,
    #[serde(default)]
    params: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

#[derive(Debug, Serialize)]
struct RpcResponse {
    jsonrpc: &'static str,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<ToolResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

#[derive(Debug, Serialize)]
struct RpcError {
    code: i32,
    message: String,
}

/// Build the `/mcp` router over the shared tool context.
pub fn router(ctx: Arc<ToolContext>) -> Router {
    Router::new().route("/mcp", post(call)).with_state(ctx)
}

fn success(id: Value, result: ToolResult) -> Response {
    let body = RpcResponse {
        jsonrpc: "2.0",
        id,
        result: Some(result),
        error: None,
    };

    (StatusCode::OK, Json(body)).into_response()
}

fn failure(id: Value, code: i32, message: impl Into<String>, status: StatusCode) -> Response {
    let body = RpcResponse {
        jsonrpc: "2.0",
        id,
        result: None,
        error: Some(RpcError {
            code,
            message: message.into(),
        }),
    };

    (status, Json(body)).into_response()
}

async fn call(State(ctx): State<Arc<ToolContext>>, body: Bytes) -> Response {
    let request: RpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(_) => return failure(Value::Null, PARSE_ERROR, "Parse error", StatusCode::OK),
    };

    let id = request.id;

    if request.method != "tools/call" {
        return failure(id, METHOD_NOT_FOUND, "Method not found", StatusCode::OK);
    }

    let params: CallParams = match request.params {
        Some(params) => match serde_json::from_value(params) {
            Ok(params) => params,
            Err(err) => {
                return failure(id, INVALID_PARAMS, format!("Invalid params: {err}"), StatusCode::OK);
            }
        },
        None => return failure(id, INVALID_PARAMS, "Invalid params: missing `params`", StatusCode::OK),
    };

    if !crate::is_known_tool(&params.name) {
        return failure(
            id,
            METHOD_NOT_FOUND,
            format!("Unknown tool: {}", params.name),
            StatusCode::OK,
        );
    }

    let arguments = params.arguments.unwrap_or_else(|| json!({}));

    // Panic isolation: a bug in one handler must not take the server down
    // or leak a stack trace onto the wire. The future itself stays on this
    // task, so a disconnecting caller still cancels outstanding work.
    let outcome = AssertUnwindSafe(crate::run_tool(&ctx, &params.name, arguments))
        .catch_unwind()
        .await;

    match outcome {
        Ok(result) => success(id, result),
        Err(_) => {
            log::error!("tool `{}` panicked", params.name);

            failure(
                id,
                SERVER_ERROR,
                "Server error: tool handler failed",
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    use super::*;

    fn test_router() -> Router {
        let config = config::Config::default();
        router(Arc::new(ToolContext::new(&config)))
    }

    async fn post_rpc(body: &str) -> (StatusCode, Value) {
        let response = test_router()
            .oneshot(
                Request::post("/mcp")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn malformed_json_is_a_parse_error() {
        let (status, body) = post_rpc("{not json").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"]["code"], -32700);
        assert_eq!(body["id"], Value::Null);
    }

    #[tokio::test]
    async fn unknown_methods_are_rejected() {
        let (status, body) =
            post_rpc(r#"{"jsonrpc":"2.0","id":7,"method":"tools/list","params":{}}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"]["code"], -32601);
        assert_eq!(body["error"]["message"], "Method not found");
        assert_eq!(body["id"], 7);
    }

    #[tokio::test]
    async fn unknown_tools_are_rejected_with_their_name() {
        let (status, body) = post_rpc(
            r#"{"jsonrpc":"2.0","id":"abc","method":"tools/call","params":{"name":"doesNotExist","arguments":{}}}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"]["code"], -32601);
        assert_eq!(body["error"]["message"], "Unknown tool: doesNotExist");
        assert_eq!(body["id"], "abc");
    }

    #[tokio::test]
    async fn validation_failures_ride_inside_tool_results() {
        let (status, body) = post_rpc(
            r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"getMLBPlayerLastN","arguments":{"player_ids":[]}}}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let result = &body["result"];
        assert_eq!(result["ok"], false);
        assert_eq!(result["error"], "invalid `player_ids`: must not be empty");
        assert!(result.get("data").is_none());
    }

    #[tokio::test]
    async fn null_ids_echo_as_null() {
        let (_, body) =
            post_rpc(r#"{"jsonrpc":"2.0","id":null,"method":"nope"}"#).await;

        assert!(body["id"].is_null());
        assert!(body.as_object().unwrap().contains_key("id"));
    }

    #[tokio::test]
    async fn zero_count_is_a_validation_error() {
        let (_, body) = post_rpc(
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"getMLBPlayerLastN","arguments":{"player_ids":[592450],"count":0}}}"#,
        )
        .await;

        let result = &body["result"];
        assert_eq!(result["ok"], false);
        assert_eq!(result["error"], "invalid `count`: must be at least 1");
    }
}
