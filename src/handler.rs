//! Route handlers.
//!
//! A handler is anything that turns a [`Request`] into a boxed future of a
//! [`Response`]. The router stores them as `Arc<dyn Handler>`, one per route.
//!
//! Two shapes implement it:
//!
//! - any `async fn(Request) -> impl IntoResponse` (or closure of that shape);
//! - [`SiteRoute`], a [`Site`] method bound to the shared site. Its
//!   `Err(SiteError)` results are rendered by the site itself, so every
//!   route answers with the same 404 page and error bodies.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::site::{Site, SiteError};

/// The future a handler hands back to the router.
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

pub(crate) type BoxedHandler = Arc<dyn Handler>;

/// A routable request handler.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request) -> BoxFuture;
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = self(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

/// A [`Site`] method, e.g. `Site::work`, bound to the site it runs against.
pub(crate) struct SiteRoute<F> {
    site: Arc<Site>,
    method: F,
}

impl<F> SiteRoute<F> {
    pub(crate) fn new(site: &Arc<Site>, method: F) -> Self {
        Self { site: Arc::clone(site), method }
    }
}

impl<F, Fut> Handler for SiteRoute<F>
where
    F: Fn(Arc<Site>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, SiteError>> + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let site = Arc::clone(&self.site);
        let fut = (self.method)(Arc::clone(&site), req);
        Box::pin(async move {
            match fut.await {
                Ok(res) => res,
                Err(e) => site.error_response(e),
            }
        })
    }
}
