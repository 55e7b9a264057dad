//! Request handling dispatch module
//!
//! Bridges hyper and the router: reads the request, dispatches it, and turns
//! the outcome (handler response, not found, handler panic) into a response.

use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::router::{RequestContext, RequestInfo, ResponseWriter, Router};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, HeaderName, CONTENT_LENGTH, REFERER, USER_AGENT};
use hyper::{Request, Response, Version};
use percent_encoding::percent_decode_str;
use std::any::Any;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let started = Instant::now();
    let (parts, body) = req.into_parts();

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        parts.method.to_string(),
        parts.uri.path().to_string(),
    );
    entry.query = parts.uri.query().map(ToString::to_string);
    entry.http_version = version_label(parts.version).to_string();
    entry.referer = header_string(&parts.headers, &REFERER);
    entry.user_agent = header_string(&parts.headers, &USER_AGENT);

    let response = match decode_path(parts.uri.path()) {
        Ok(path) => match read_body(&parts.headers, body, state.config.http.max_body_size).await {
            Ok(bytes) => {
                let request = RequestInfo {
                    method: parts.method.as_str().to_string(),
                    path,
                    headers: parts.headers,
                    body: bytes,
                };
                dispatch(&state.router, &request)
            }
            Err(response) => response,
        },
        Err(response) => response,
    };

    if state.config.logging.access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or_default();
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.access_format);
    }

    Ok(response)
}

/// Run the router for one request, catching handler panics
fn dispatch(router: &Router, request: &RequestInfo) -> Response<Full<Bytes>> {
    let mut writer = ResponseWriter::new();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut ctx = RequestContext::new(request, &mut writer);
        router.dispatch(&request.method, &request.path, &mut ctx)
    }));

    match outcome {
        Ok(Ok(())) => writer.into_response(),
        Ok(Err(not_found)) => {
            logger::log_route_not_found(&not_found);
            http::build_404_response()
        }
        Err(payload) => {
            logger::log_handler_panic(&request.method, &request.path, panic_reason(payload.as_ref()));
            http::build_500_response()
        }
    }
}

/// Percent-decode the URL path; the router matches the decoded form literally
fn decode_path(raw: &str) -> Result<String, Response<Full<Bytes>>> {
    match percent_decode_str(raw).decode_utf8() {
        Ok(path) => Ok(path.into_owned()),
        Err(e) => {
            logger::log_warning(&format!("Request path {raw} is not valid UTF-8 once decoded: {e}"));
            Err(http::build_400_response())
        }
    }
}

/// Collect the request body, enforcing `max_body_size`
async fn read_body<B>(
    headers: &HeaderMap,
    body: B,
    max_body_size: u64,
) -> Result<Bytes, Response<Full<Bytes>>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    if let Some(declared) = declared_length(headers) {
        if declared > max_body_size {
            logger::log_warning(&format!(
                "Request body too large: {declared} bytes (max: {max_body_size})"
            ));
            return Err(http::build_413_response());
        }
    }

    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_warning(&format!("Request body exceeded {max_body_size} bytes"));
            Err(http::build_413_response())
        }
        Err(err) => {
            logger::log_warning(&format!("Failed to read request body: {err}"));
            Err(http::build_400_response())
        }
    }
}

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers.get(CONTENT_LENGTH)?.to_str().ok()?.trim().parse().ok()
}

fn header_string(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic payload"
    }
}
