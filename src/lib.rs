//! Exact-path GET routing over hyper
//!
//! [`Router`] maps literal URL paths to handlers and dispatches GET requests
//! to them. Handlers answer through a [`RequestContext`], which writes an
//! already-serialized body with an `application/json` content type. The
//! [`server`] module is the transport: it accepts connections, feeds each
//! request to the router, and answers misses with 404.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod router;
pub mod server;

pub use error::{RouteNotFound, ServerError};
pub use router::{Handler, RequestContext, RequestInfo, ResponseWriter, Router};
