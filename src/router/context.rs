//! Per-request context
//!
//! A `RequestContext` borrows the inbound request description and the response
//! sink for exactly one dispatch. Handlers read the request through it and
//! write their response with [`RequestContext::json`].

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};

use crate::logger;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Inbound request as seen by the router and its handlers
#[derive(Debug, Clone)]
pub struct RequestInfo {
    /// Method exactly as received (not normalized)
    pub method: String,
    /// URL path without query string
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RequestInfo {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

/// Response sink filled in by a handler
///
/// Status defaults to 200 with an empty body, so a handler that writes nothing
/// still produces a valid response.
#[derive(Debug)]
pub struct ResponseWriter {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    written: bool,
}

impl Default for ResponseWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            written: false,
        }
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    pub const fn is_written(&self) -> bool {
        self.written
    }

    /// Record status, content type and body. Only the first call takes effect.
    ///
    /// Returns `false` when the response had already been written.
    pub fn write(&mut self, status: StatusCode, content_type: &'static str, body: Bytes) -> bool {
        if self.written {
            return false;
        }
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        self.status = status;
        self.body = body;
        self.written = true;
        true
    }

    /// Finalize into the hyper response handed back to the connection
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// Request data plus response sink, valid for the duration of one dispatch
pub struct RequestContext<'a> {
    request: &'a RequestInfo,
    writer: &'a mut ResponseWriter,
}

impl<'a> RequestContext<'a> {
    pub fn new(request: &'a RequestInfo, writer: &'a mut ResponseWriter) -> Self {
        Self { request, writer }
    }

    pub fn request(&self) -> &RequestInfo {
        self.request
    }

    pub fn method(&self) -> &str {
        &self.request.method
    }

    pub fn path(&self) -> &str {
        &self.request.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.request.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.request.body
    }

    /// Write `body` verbatim with the given status and an `application/json` content type.
    ///
    /// The body must already be serialized; it is neither validated nor escaped.
    /// A status outside 100..=999 is answered with 500 and an empty body.
    /// Writes after the first one are dropped with a warning.
    pub fn json(&mut self, status: u16, body: impl Into<Bytes>) {
        let (status, body) = match StatusCode::from_u16(status) {
            Ok(code) => (code, body.into()),
            Err(_) => {
                logger::log_error(&format!(
                    "Handler for {} wrote invalid status code {status}",
                    self.request.path
                ));
                (StatusCode::INTERNAL_SERVER_ERROR, Bytes::new())
            }
        };

        if !self.writer.write(status, JSON_CONTENT_TYPE, body) {
            logger::log_warning(&format!(
                "Superfluous response write ignored for {} {}",
                self.request.method, self.request.path
            ));
        }
    }
}
