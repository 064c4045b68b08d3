//! The portfolio site: routes, handlers and request-level errors.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET  | `/`               | render `index.html` |
//! | GET  | `/favicon.ico`    | `favicon.ico` from the asset directory |
//! | GET  | `/{page_name}`    | render `page_name` if it ends in `.html` |
//! | POST | `/submit_form`    | validate, append to the store, redirect to `/thankyou.html` |
//! | GET  | `/work/{slug}`    | `work-{slug}.html`, else `work.html` with the catalog record |
//! | GET  | `/static/{*path}` | any file from the asset directory |

use std::io;
use std::sync::Arc;

use minijinja::context;
use tracing::{debug, error, warn};

use crate::assets::{Assets, content_type_for};
use crate::catalog::Catalog;
use crate::form::{ContactForm, MissingField};
use crate::handler::SiteRoute;
use crate::method::Method;
use crate::request::Request;
use crate::response::{ContentType, IntoResponse, Response};
use crate::router::Router;
use crate::status::Status;
use crate::store::ContactStore;
use crate::templates::{RenderError, Templates};

pub const THANK_YOU_PAGE: &str = "/thankyou.html";
pub const NOT_FOUND_TEMPLATE: &str = "404.html";

const NOT_FOUND_BODY: &str = "<!doctype html>\n<title>404 Not Found</title>\n\
    <h1>Not Found</h1>\n<p>The requested URL was not found on the server.</p>\n";
const SAVE_FAILED_BODY: &str = "Did not save to database";
const FORM_ENCODING: &str = "application/x-www-form-urlencoded";

/// Request-level failures. Each one maps to exactly one HTTP response.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("`{0}` is not an .html page")]
    InvalidPageName(String),

    #[error("template `{0}` not found")]
    TemplateMissing(String),

    #[error(transparent)]
    Validation(#[from] MissingField),

    #[error("failed to store submission: {0}")]
    Persistence(#[source] io::Error),

    #[error("template `{name}` failed to render: {source}")]
    Render {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

impl SiteError {
    fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::InvalidPageName(_) | Self::TemplateMissing(_))
    }
}

impl From<RenderError> for SiteError {
    fn from(e: RenderError) -> Self {
        match e {
            RenderError::Missing(name) => Self::TemplateMissing(name),
            RenderError::Failed { name, source } => Self::Render { name, source },
        }
    }
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        match self {
            e if e.is_not_found() => Response::builder()
                .status(Status::NotFound)
                .html(NOT_FOUND_BODY),
            Self::Validation(missing) => Response::builder()
                .status(Status::BadRequest)
                .text(missing.to_string()),
            Self::Persistence(_) => Response::builder()
                .status(Status::InternalServerError)
                .text(SAVE_FAILED_BODY),
            _ => Response::builder()
                .status(Status::InternalServerError)
                .text("Internal Server Error"),
        }
    }
}

type SiteResult = Result<Response, SiteError>;

/// Everything a handler needs, shared read-only across requests.
pub struct Site {
    templates: Templates,
    catalog: Catalog,
    store: ContactStore,
    assets: Assets,
}

impl Site {
    pub fn new(templates: Templates, catalog: Catalog, store: ContactStore, assets: Assets) -> Self {
        Self { templates, catalog, store, assets }
    }

    /// Builds the router with every site route registered.
    pub fn router(self: Arc<Self>) -> Router {
        Router::new()
            .on(Method::Get,  "/",                SiteRoute::new(&self, Self::index))
            .on(Method::Get,  "/favicon.ico",     SiteRoute::new(&self, Self::favicon))
            .on(Method::Get,  "/{page_name}",     SiteRoute::new(&self, Self::page))
            .on(Method::Post, "/submit_form",     SiteRoute::new(&self, Self::submit_form))
            .on(Method::Get,  "/work/{slug}",     SiteRoute::new(&self, Self::work))
            .on(Method::Get,  "/static/{*path}",  SiteRoute::new(&self, Self::static_file))
            .fallback(SiteRoute::new(&self, Self::not_found))
    }

    async fn index(self: Arc<Self>, _req: Request) -> SiteResult {
        self.render("index.html", context! {})
    }

    async fn favicon(self: Arc<Self>, _req: Request) -> SiteResult {
        self.serve_asset("favicon.ico").await
    }

    async fn page(self: Arc<Self>, req: Request) -> SiteResult {
        let name = req.param("page_name").unwrap_or_default();
        if !name.ends_with(".html") {
            return Err(SiteError::InvalidPageName(name.to_owned()));
        }
        self.render(name, context! {})
    }

    async fn submit_form(self: Arc<Self>, req: Request) -> SiteResult {
        // Bodies in any other encoding carry no form fields.
        let form = match req.header("content-type") {
            Some(ct) if !is_form_encoded(ct) => ContactForm::default(),
            _ => ContactForm::from_urlencoded(req.body()),
        };
        let submission = form.validate()?;
        self.store.append(&submission).await.map_err(SiteError::Persistence)?;
        Ok(Response::redirect(THANK_YOU_PAGE))
    }

    async fn work(self: Arc<Self>, req: Request) -> SiteResult {
        let slug = req.param("slug").unwrap_or_default();

        match self.templates.render(&format!("work-{slug}.html"), context! {}) {
            Ok(body) => return Ok(Response::html(body)),
            Err(RenderError::Missing(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let project = self
            .catalog
            .lookup(slug)
            .ok_or_else(|| SiteError::NotFound(format!("project `{slug}`")))?;
        self.render("work.html", context! { p => project, slug => slug })
    }

    async fn static_file(self: Arc<Self>, req: Request) -> SiteResult {
        let path = req.param("path").unwrap_or_default();
        self.serve_asset(path).await
    }

    async fn not_found(self: Arc<Self>, req: Request) -> SiteResult {
        Err(SiteError::NotFound(format!("path `{}`", req.path())))
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> SiteResult {
        Ok(Response::html(self.templates.render(name, ctx)?))
    }

    async fn serve_asset(&self, rel: &str) -> SiteResult {
        match self.assets.read(rel).await {
            Ok(bytes) => Ok(Response::builder().bytes(content_type_for(rel), bytes)),
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!(asset = rel, error = %e, "failed to read asset");
                }
                Err(SiteError::NotFound(format!("asset `{rel}`")))
            }
        }
    }

    /// Turns a handler error into its response. Not-found kinds use the
    /// site's `404.html` when it has one.
    pub(crate) fn error_response(&self, err: SiteError) -> Response {
        match &err {
            SiteError::Persistence(_) | SiteError::Render { .. } => error!(error = %err, "request failed"),
            _ => debug!(error = %err, "request rejected"),
        }

        if err.is_not_found() {
            if let Ok(body) = self.templates.render(NOT_FOUND_TEMPLATE, context! {}) {
                return Response::builder()
                    .status(Status::NotFound)
                    .bytes(ContentType::Html, body.into_bytes());
            }
        }
        err.into_response()
    }
}

/// Compares the media type only, ignoring case and parameters such as
/// `charset`.
fn is_form_encoded(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|media| media.trim().eq_ignore_ascii_case(FORM_ENCODING))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_kinds_are_404_html() {
        for err in [
            SiteError::NotFound("x".into()),
            SiteError::InvalidPageName("about".into()),
            SiteError::TemplateMissing("about.html".into()),
        ] {
            let res = err.into_response();
            assert_eq!(res.status_code(), Status::NotFound);
            assert_eq!(res.header("content-type"), Some(ContentType::Html.as_str()));
        }
    }

    #[test]
    fn validation_is_400_plain_text() {
        let res = SiteError::from(MissingField::Email).into_response();
        assert_eq!(res.status_code(), Status::BadRequest);
        assert_eq!(res.body(), b"email is required");
    }

    #[test]
    fn form_media_type_ignores_case_and_parameters() {
        assert!(is_form_encoded("application/x-www-form-urlencoded"));
        assert!(is_form_encoded("Application/X-WWW-Form-Urlencoded"));
        assert!(is_form_encoded("application/x-www-form-urlencoded; charset=UTF-8"));
        assert!(!is_form_encoded("application/json"));
        assert!(!is_form_encoded("application/x-www-form-urlencoded-extra"));
    }

    #[test]
    fn persistence_is_500_with_fixed_message() {
        let err = SiteError::Persistence(io::Error::other("disk full"));
        let res = err.into_response();
        assert_eq!(res.status_code(), Status::InternalServerError);
        assert_eq!(res.body(), SAVE_FAILED_BODY.as_bytes());
    }
}
