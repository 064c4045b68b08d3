//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. Static segments win over
//! parameters, so `/favicon.ico` and `/{page_name}` can live side by side.
//! `HEAD` requests without a `HEAD` route are answered by the `GET` route
//! with the body dropped.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Body;
use matchit::Router as MatchitRouter;
use tracing::{debug, info};

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve),
/// or drive it directly with [`Router::handle`].
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    fallback: Option<BoxedHandler>,
    body_limit: usize,
}

/// Largest request body read before answering `413`.
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

type Matched = (BoxedHandler, HashMap<String, String>);

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), fallback: None, body_limit: DEFAULT_BODY_LIMIT }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax and are read back with
    /// `req.param("name")`; `{*name}` captures the rest of the path.
    ///
    /// # Panics
    ///
    /// Panics if `path` conflicts with an already registered route. Routes
    /// are fixed at startup, so this is a programming error.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, Arc::new(handler) as BoxedHandler)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Handler for requests no route matches under any method. Without one
    /// they get an empty `404 Not Found`.
    pub fn fallback(mut self, handler: impl Handler) -> Self {
        self.fallback = Some(Arc::new(handler));
        self
    }

    /// Caps the request body size. Larger bodies get `413` and never reach a
    /// handler.
    pub fn body_limit(mut self, bytes: usize) -> Self {
        self.body_limit = bytes;
        self
    }

    pub(crate) fn lookup(&self, method: Method, path: &str) -> Option<Matched> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }

    /// The fallback, unless `path` exists under another method (that is a 405).
    fn fallback_for(&self, method: Method, path: &str) -> Option<Matched> {
        if self.allowed_elsewhere(method, path) {
            return None;
        }
        self.fallback.as_ref().map(|h| (Arc::clone(h), HashMap::new()))
    }

    /// The route for `method`, or the `GET` route for a `HEAD` request.
    fn resolve(&self, method: Method, path: &str) -> Option<Matched> {
        self.lookup(method, path)
            .or_else(|| match method {
                Method::Head => self.lookup(Method::Get, path),
                _ => None,
            })
            .or_else(|| self.fallback_for(method, path))
    }

    /// True when `path` is registered under some method other than `method`.
    fn allowed_elsewhere(&self, method: Method, path: &str) -> bool {
        self.routes.iter()
            .any(|(m, tree)| *m != method && tree.at(path).is_ok())
    }

    /// Routes one request and produces one response.
    ///
    /// Every failure becomes a response (404, 405, 413 for an oversized
    /// body, 400 for an unreadable one), so callers never see an error.
    pub async fn handle<B>(&self, req: http::Request<B>) -> http::Response<Full<Bytes>>
    where
        B: Body<Data = Bytes>,
        B::Error: Into<Box<dyn StdError + Send + Sync>>,
    {
        let started = Instant::now();
        let (parts, body) = req.into_parts();
        let path = parts.uri.path().to_owned();

        let response = match Method::try_from(&parts.method) {
            Err(()) => Response::status(Status::MethodNotAllowed),
            Ok(method) => {
                let response = match self.resolve(method, &path) {
                    None if self.allowed_elsewhere(method, &path) => {
                        Response::status(Status::MethodNotAllowed)
                    }
                    None => Response::status(Status::NotFound),
                    Some((handler, params)) => {
                        match Limited::new(body, self.body_limit).collect().await {
                            Ok(collected) => {
                                let req = Request::new(
                                    method,
                                    path.clone(),
                                    parts.headers,
                                    collected.to_bytes(),
                                    params,
                                );
                                handler.call(req).await
                            }
                            Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
                                debug!(limit = self.body_limit, "request body too large");
                                Response::status(Status::PayloadTooLarge)
                            }
                            Err(e) => {
                                debug!(error = %e, "failed to read request body");
                                Response::status(Status::BadRequest)
                            }
                        }
                    }
                };
                match method {
                    Method::Head => response.without_body(),
                    _ => response,
                }
            }
        };

        info!(
            method = %parts.method,
            path = %path,
            status = response.status_code().code(),
            latency_us = started.elapsed().as_micros() as u64,
            "request",
        );

        response.into_inner()
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
