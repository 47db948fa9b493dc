//! Request handler module
//!
//! Responsible for request routing and handing tool requests to the
//! dispatcher.

pub mod router;

// Re-export main entry point
pub use router::handle_request;
