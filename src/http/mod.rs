//! HTTP protocol layer module
//!
//! Response builders and the cross-origin header set, decoupled from the
//! tool logic.

pub mod cors;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_404_response, build_error_response, build_health_response, build_json_response,
    build_preflight_response,
};
