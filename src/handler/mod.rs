//! Request handler module
//!
//! Turns hyper requests into router dispatches and router outcomes into responses.

pub mod request;

// Re-export main entry point
pub use request::handle_request;
