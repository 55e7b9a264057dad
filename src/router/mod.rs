//! Exact-path GET router
//!
//! Maps literal URL paths to handlers. A request reaches a handler only when
//! its path is byte-for-byte equal to a registered path and its method is GET
//! (case-insensitive). There is no normalization, no wildcard and no
//! parameter extraction.

mod context;

pub use context::{RequestContext, RequestInfo, ResponseWriter};

use std::collections::HashMap;
use std::fmt;

use crate::error::RouteNotFound;

/// Handler invoked with the per-request context
pub type Handler = Box<dyn Fn(&mut RequestContext<'_>) + Send + Sync>;

/// Route registry
///
/// Registration takes `&mut self` and dispatch takes `&self`, so once the
/// router is shared behind an `Arc` the registry is frozen.
#[derive(Default)]
pub struct Router {
    routes: HashMap<String, Handler>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for GET requests on exactly `path`.
    ///
    /// Any previous handler for the same path is replaced. The path is stored
    /// as given; the empty string is a valid key.
    pub fn register_get<F>(&mut self, path: impl Into<String>, handler: F)
    where
        F: Fn(&mut RequestContext<'_>) + Send + Sync + 'static,
    {
        self.routes.insert(path.into(), Box::new(handler));
    }

    /// Run the handler registered for `path` if `method` is GET.
    ///
    /// The handler runs to completion before this returns. On a miss nothing
    /// is written to the context; the caller decides how to answer.
    pub fn dispatch(
        &self,
        method: &str,
        path: &str,
        ctx: &mut RequestContext<'_>,
    ) -> Result<(), RouteNotFound> {
        match self.routes.get(path) {
            Some(handler) if method.eq_ignore_ascii_case("GET") => {
                handler(ctx);
                Ok(())
            }
            _ => Err(RouteNotFound::new(method, path)),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.routes.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Registered paths in sorted order
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.paths())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Dispatch a bare request and hand back the outcome and the filled writer
    fn run(router: &Router, method: &str, path: &str) -> (Result<(), RouteNotFound>, ResponseWriter) {
        let request = RequestInfo::new(method, path);
        let mut writer = ResponseWriter::new();
        let result = {
            let mut ctx = RequestContext::new(&request, &mut writer);
            router.dispatch(method, path, &mut ctx)
        };
        (result, writer)
    }

    fn recording_router(paths: &[&'static str]) -> (Router, Arc<Mutex<Vec<&'static str>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut router = Router::new();
        for &path in paths {
            let calls = Arc::clone(&calls);
            router.register_get(path, move |_ctx| calls.lock().unwrap().push(path));
        }
        (router, calls)
    }

    #[test]
    fn test_get_invokes_only_matching_handler_once() {
        let (router, calls) = recording_router(&["/a", "/b", "/c"]);

        let (result, _) = run(&router, "GET", "/b");

        assert!(result.is_ok());
        assert_eq!(*calls.lock().unwrap(), vec!["/b"]);
    }

    #[test]
    fn test_unregistered_path_is_not_found() {
        let (router, calls) = recording_router(&["/hello"]);

        let (result, writer) = run(&router, "GET", "/missing");

        assert_eq!(result, Err(RouteNotFound::new("GET", "/missing")));
        assert!(calls.lock().unwrap().is_empty());
        assert!(!writer.is_written());
    }

    #[test]
    fn test_non_get_methods_are_not_found() {
        let (router, calls) = recording_router(&["/hello"]);

        for method in ["POST", "PUT", "DELETE", "HEAD", "OPTIONS", "PATCH", "post", ""] {
            let (result, writer) = run(&router, method, "/hello");
            assert!(result.is_err(), "{method} should not reach the handler");
            assert!(!writer.is_written());
        }
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_method_match_is_case_insensitive() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut router = Router::new();
        let c = Arc::clone(&counter);
        router.register_get("/p", move |_ctx| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        for method in ["get", "Get", "GET", "gEt"] {
            let (result, _) = run(&router, method, "/p");
            assert!(result.is_ok(), "{method} should match");
        }
        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_shared_router_serves_threads_concurrently() {
        const THREADS: usize = 8;
        const REQUESTS_PER_THREAD: usize = 50;

        let counter = Arc::new(AtomicUsize::new(0));
        let mut router = Router::new();
        let c = Arc::clone(&counter);
        router.register_get("/hello", move |ctx| {
            c.fetch_add(1, Ordering::SeqCst);
            ctx.json(200, r#"{"message":"Hello, World!"}"#);
        });
        let router = Arc::new(router);

        std::thread::scope(|scope| {
            for _ in 0..THREADS {
                let router = Arc::clone(&router);
                scope.spawn(move || {
                    for _ in 0..REQUESTS_PER_THREAD {
                        let (result, writer) = run(&router, "GET", "/hello");
                        assert!(result.is_ok());
                        assert_eq!(writer.status(), 200);
                        assert!(run(&router, "GET", "/missing").0.is_err());
                    }
                });
            }
        });

        assert_eq!(counter.load(Ordering::SeqCst), THREADS * REQUESTS_PER_THREAD);
    }

    #[test]
    fn test_reregistration_overwrites() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut router = Router::new();
        let a = Arc::clone(&calls);
        router.register_get("/x", move |_ctx| a.lock().unwrap().push("A"));
        let b = Arc::clone(&calls);
        router.register_get("/x", move |_ctx| b.lock().unwrap().push("B"));

        let (result, _) = run(&router, "GET", "/x");

        assert!(result.is_ok());
        assert_eq!(*calls.lock().unwrap(), vec!["B"]);
        assert_eq!(router.len(), 1);
    }

    #[test]
    fn test_path_match_is_literal() {
        let (router, calls) = recording_router(&["/about"]);

        for path in ["/about/", "/About", "/about/team", "about", "/about?x=1", "//about"] {
            let (result, _) = run(&router, "GET", path);
            assert!(result.is_err(), "{path} should not match /about");
        }
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_empty_path_is_a_valid_route() {
        let (router, calls) = recording_router(&[""]);

        assert!(run(&router, "GET", "").0.is_ok());
        assert!(run(&router, "GET", "/").0.is_err());
        assert_eq!(*calls.lock().unwrap(), vec![""]);
    }

    #[test]
    fn test_hello_scenario() {
        let mut router = Router::new();
        router.register_get("/hello", |ctx| {
            ctx.json(200, r#"{"message":"Hello, World!"}"#);
        });

        let (result, writer) = run(&router, "GET", "/hello");
        assert!(result.is_ok());
        let response = writer.into_response();
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["content-type"], "application/json");

        let (result, _) = run(&router, "POST", "/hello");
        assert_eq!(result, Err(RouteNotFound::new("POST", "/hello")));
    }

    #[test]
    fn test_handler_sees_request_data() {
        let seen = Arc::new(Mutex::new(None));
        let mut router = Router::new();
        let s = Arc::clone(&seen);
        router.register_get("/echo", move |ctx| {
            *s.lock().unwrap() = Some((ctx.method().to_string(), ctx.path().to_string()));
            let body = ctx.body().clone();
            ctx.json(200, body);
        });

        let request = RequestInfo::new("get", "/echo").with_body("ping");
        let mut writer = ResponseWriter::new();
        let mut ctx = RequestContext::new(&request, &mut writer);
        router.dispatch("get", "/echo", &mut ctx).unwrap();

        assert_eq!(writer.body().as_ref(), b"ping");
        assert_eq!(
            *seen.lock().unwrap(),
            Some(("get".to_string(), "/echo".to_string()))
        );
    }

    #[test]
    fn test_routers_are_independent() {
        let (first, _) = recording_router(&["/one"]);
        let (second, _) = recording_router(&["/two"]);

        assert!(first.contains("/one") && !first.contains("/two"));
        assert!(second.contains("/two") && !second.contains("/one"));
    }

    #[test]
    fn test_paths_are_sorted() {
        let (router, _) = recording_router(&["/z", "/a", "/m"]);
        assert_eq!(router.paths(), vec!["/a", "/m", "/z"]);
        assert!(!router.is_empty());
        assert!(Router::new().is_empty());
    }
}
