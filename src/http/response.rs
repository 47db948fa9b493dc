//! HTTP response building module
//!
//! Provides builders for the responses the tool endpoint and its health checks
//! produce. Builders never fail: a response that cannot be assembled is
//! logged and replaced by a bare one.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};
use serde::Serialize;

use super::cors;
use crate::tools::DispatchError;

/// Start a response carrying the CORS set and the `Server` header
fn endpoint_builder(status: StatusCode, server_name: &str) -> Builder {
    cors::apply(Response::builder().status(status)).header("Server", server_name)
}

/// Build a JSON response with CORS headers
pub fn build_json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
    server_name: &str,
) -> Response<Full<Bytes>> {
    let json = match serde_json::to_vec(body) {
        Ok(json) => json,
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            return build_error_message(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                server_name,
            );
        }
    };

    endpoint_builder(status, server_name)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build `{"error": message}` with the given status
pub fn build_error_message(
    status: StatusCode,
    message: &str,
    server_name: &str,
) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "error": message });
    endpoint_builder(status, server_name)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Map a dispatch failure to its status and public message
pub fn build_error_response(err: &DispatchError, server_name: &str) -> Response<Full<Bytes>> {
    build_error_message(err.status(), &err.public_message(), server_name)
}

/// Build the preflight answer: 200 with an empty body
pub fn build_preflight_response(server_name: &str) -> Response<Full<Bytes>> {
    endpoint_builder(StatusCode::OK, server_name)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response(server_name: &str) -> Response<Full<Bytes>> {
    build_error_message(StatusCode::NOT_FOUND, "Not Found", server_name)
}

/// Build health check response, with the same CORS headers as the tool endpoint
pub fn build_health_response(status: &'static str, server_name: &str) -> Response<Full<Bytes>> {
    endpoint_builder(StatusCode::OK, server_name)
        .header("Content-Type", "text/plain")
        .header("Cache-Control", "no-cache")
        .body(Full::new(Bytes::from_static(status.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error("health", &e);
            Response::new(Full::new(Bytes::from_static(status.as_bytes())))
        })
}

fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(resp: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_json_response_headers() {
        let resp = build_json_response(
            StatusCode::OK,
            &serde_json::json!({ "result": "done" }),
            "creator-tools/test",
        );
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "application/json");
        assert_eq!(resp.headers()["server"], "creator-tools/test");
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        assert_eq!(body_json(resp).await["result"], "done");
    }

    #[tokio::test]
    async fn test_error_response_uses_public_message() {
        let resp = build_error_response(&DispatchError::InvalidTool("x".into()), "s");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(resp).await,
            serde_json::json!({ "error": "Invalid tool request" })
        );
    }

    #[tokio::test]
    async fn test_preflight_is_empty() {
        let resp = build_preflight_response("s");
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("access-control-allow-headers"));
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_404_body() {
        let resp = build_404_response("s");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["error"], "Not Found");
    }

    #[tokio::test]
    async fn test_health_response_carries_cors() {
        let resp = build_health_response("ok", "s");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        assert_eq!(resp.headers()["server"], "s");
        assert_eq!(resp.headers()["content-type"], "text/plain");
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(bytes, Bytes::from_static(b"ok"));
    }
}
