//! Cross-origin headers
//!
//! The tool endpoint is called directly from browser front-ends, so every
//! response it produces carries the same permissive header set.

use hyper::http::response::Builder;

pub const ALLOW_CREDENTIALS: &str = "true";
pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET,OPTIONS,PATCH,DELETE,POST,PUT";
pub const ALLOW_HEADERS: &str = "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, Content-Length, Content-MD5, Content-Type, Date, X-Api-Version";

/// Attach the CORS header set to a response builder
pub fn apply(builder: Builder) -> Builder {
    builder
        .header("Access-Control-Allow-Credentials", ALLOW_CREDENTIALS)
        .header("Access-Control-Allow-Origin", ALLOW_ORIGIN)
        .header("Access-Control-Allow-Methods", ALLOW_METHODS)
        .header("Access-Control-Allow-Headers", ALLOW_HEADERS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::Response;

    #[test]
    fn test_apply_sets_all_headers() {
        let resp = apply(Response::builder()).body(()).unwrap();
        let headers = resp.headers();
        assert_eq!(headers["access-control-allow-credentials"], "true");
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(
            headers["access-control-allow-methods"],
            "GET,OPTIONS,PATCH,DELETE,POST,PUT"
        );
        assert!(headers["access-control-allow-headers"]
            .to_str()
            .unwrap()
            .starts_with("X-CSRF-Token, X-Requested-With"));
    }
}
