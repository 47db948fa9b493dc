//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: health check and path matching, method
//! validation, body decoding and hand-off to the tool dispatcher.

use crate::config::{AppState, HealthConfig};
use crate::http;
use crate::logger;
use crate::tools::{DispatchError, ToolOutput, ToolRequest};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, StatusCode};
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Success body: `{"result": ...}`
#[derive(Serialize)]
struct ToolResponse<'a> {
    result: &'a ToolOutput,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let server_name = state.config.http.server_name.as_str();
    let routes = &state.config.routes;
    let path = req.uri().path();

    // 0. Health check endpoints (highest priority, always fast)
    if let Some(resp) = check_health(path, &routes.health, server_name) {
        return Ok(resp);
    }

    // 1. Only the tool endpoint is served
    if path != routes.endpoint {
        logger::log_debug(&format!("No route for path: {path}"));
        return Ok(http::build_404_response(server_name));
    }

    // 2. Check HTTP method
    if let Some(resp) = check_http_method(req.method(), server_name) {
        return Ok(resp);
    }

    // 3. Check declared body size before reading anything
    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size, server_name) {
        return Ok(resp);
    }

    // 4. Decode the body and run the tool
    let request = match read_tool_request(req, state.config.http.max_body_size).await {
        Ok(request) => request,
        Err(err) => return Ok(error_response(&err, None, server_name)),
    };

    let response = match state.dispatcher.dispatch(&request).await {
        Ok(output) => http::build_json_response(
            StatusCode::OK,
            &ToolResponse { result: &output },
            server_name,
        ),
        Err(err) => error_response(&err, request.tool.as_deref(), server_name),
    };
    Ok(response)
}

fn check_health(
    path: &str,
    health: &HealthConfig,
    server_name: &str,
) -> Option<Response<Full<Bytes>>> {
    if !health.enabled {
        return None;
    }
    if path == health.liveness_path || path == health.readiness_path {
        return Some(http::build_health_response("ok", server_name));
    }
    None
}

/// Answer preflight and reject everything that is not a POST
fn check_http_method(method: &Method, server_name: &str) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::POST => None,
        Method::OPTIONS => Some(http::build_preflight_response(server_name)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_error_response(
                &DispatchError::MethodNotAllowed,
                server_name,
            ))
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(
    req: &Request<B>,
    max_body_size: u64,
    server_name: &str,
) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get(hyper::header::CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_error_response(
                    &DispatchError::PayloadTooLarge,
                    server_name,
                ))
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Collect the body (bounded by `max_body_size`) and decode it.
/// An empty body decodes like `{}`.
async fn read_tool_request<B>(req: Request<B>, max_body_size: u64) -> Result<ToolRequest, DispatchError>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let bytes = Limited::new(req.into_body(), limit)
        .collect()
        .await
        .map_err(|e| {
            if e.downcast_ref::<LengthLimitError>().is_some() {
                DispatchError::PayloadTooLarge
            } else {
                DispatchError::UnreadableBody(e.to_string())
            }
        })?
        .to_bytes();

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(ToolRequest::default());
    }

    serde_json::from_slice(&bytes).map_err(|e| DispatchError::InvalidBody(e.to_string()))
}

fn error_response(
    err: &DispatchError,
    tool: Option<&str>,
    server_name: &str,
) -> Response<Full<Bytes>> {
    logger::log_tool_failure(tool, err.status().as_u16(), &err.to_string());
    http::build_error_response(err, server_name)
}
