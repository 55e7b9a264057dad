//! HTTP protocol layer module
//!
//! Transport-level responses, decoupled from the router and its handlers.

pub mod response;

pub use response::{build_400_response, build_404_response, build_413_response, build_500_response};
