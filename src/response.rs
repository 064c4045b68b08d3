//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Handlers build a [`Response`] and return it. The server turns it into a
//! hyper response at the very end of dispatch.

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http_body_util::Full;
use tracing::warn;

use crate::status::Status;

// ── ContentType ───────────────────────────────────────────────────────────────

/// Content-type values the site sends, for use with [`ResponseBuilder::bytes`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContentType {
    Css,          // text/css
    Gif,          // image/gif
    Html,         // text/html; charset=utf-8
    Icon,         // image/vnd.microsoft.icon
    Javascript,   // text/javascript
    Jpeg,         // image/jpeg
    Json,         // application/json
    OctetStream,  // application/octet-stream
    Pdf,          // application/pdf
    Png,          // image/png
    Svg,          // image/svg+xml
    Text,         // text/plain; charset=utf-8
    Webp,         // image/webp
    Woff2,        // font/woff2
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Css         => "text/css",
            Self::Gif         => "image/gif",
            Self::Html        => "text/html; charset=utf-8",
            Self::Icon        => "image/vnd.microsoft.icon",
            Self::Javascript  => "text/javascript",
            Self::Jpeg        => "image/jpeg",
            Self::Json        => "application/json",
            Self::OctetStream => "application/octet-stream",
            Self::Pdf         => "application/pdf",
            Self::Png         => "image/png",
            Self::Svg         => "image/svg+xml",
            Self::Text        => "text/plain; charset=utf-8",
            Self::Webp        => "image/webp",
            Self::Woff2       => "font/woff2",
        }
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// # Shortcuts (200 OK)
///
/// ```rust
/// use folio::{Response, Status};
///
/// Response::html("<h1>hello</h1>");
/// Response::text("hello");
/// Response::status(Status::NotFound);
/// Response::redirect("/thankyou.html");
/// ```
///
/// # Builder (custom status or headers)
///
/// ```rust
/// use folio::{ContentType, Response, Status};
///
/// Response::builder()
///     .status(Status::BadRequest)
///     .text("email is required");
///
/// Response::builder()
///     .bytes(ContentType::Icon, vec![0, 0, 1, 0]);
/// ```
pub struct Response {
    pub(crate) body: Vec<u8>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) status: Status,
}

impl Response {
    /// `200 OK` with `text/html; charset=utf-8`.
    pub fn html(body: impl Into<String>) -> Self {
        Self::builder().bytes(ContentType::Html, body.into().into_bytes())
    }

    /// `200 OK` with `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::builder().text(body)
    }

    /// Response with no body.
    pub fn status(code: Status) -> Self {
        Self { body: Vec::new(), headers: Vec::new(), status: code }
    }

    /// `302 Found` pointing at `location`.
    pub fn redirect(location: &str) -> Self {
        Self::builder()
            .status(Status::Found)
            .header("location", location)
            .no_body()
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: Vec::new(), status: Status::Ok }
    }

    pub fn status_code(&self) -> Status { self.status }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The same response with its body dropped and `content-length` still
    /// describing it, as a `HEAD` answer.
    pub(crate) fn without_body(mut self) -> Self {
        if !self.body.is_empty() && self.header("content-length").is_none() {
            self.headers.push(("content-length".to_owned(), self.body.len().to_string()));
        }
        self.body.clear();
        self
    }

    /// Converts into the hyper response type. Headers that are not valid HTTP
    /// are dropped with a warning rather than failing the whole response.
    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(Bytes::from(self.body)));
        *res.status_mut() = self.status.into();

        for (name, value) in self.headers {
            match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(&value)) {
                (Ok(name), Ok(value)) => {
                    res.headers_mut().append(name, value);
                }
                _ => warn!(header = %name, "dropping invalid response header"),
            }
        }
        res
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `Status::Ok` (200).
/// Terminated by a typed body method.
pub struct ResponseBuilder {
    headers: Vec<(String, String)>,
    status: Status,
}

impl ResponseBuilder {
    pub fn status(mut self, code: Status) -> Self {
        self.status = code;
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Terminate with an HTML body.
    pub fn html(self, body: impl Into<String>) -> Response {
        self.bytes(ContentType::Html, body.into().into_bytes())
    }

    /// Terminate with a plain-text body (`text/plain; charset=utf-8`).
    pub fn text(self, body: impl Into<String>) -> Response {
        self.bytes(ContentType::Text, body.into().into_bytes())
    }

    /// Terminate with a typed body. Use this for icons, images, stylesheets.
    pub fn bytes(self, content_type: ContentType, body: Vec<u8>) -> Response {
        let mut headers = vec![("content-type".to_owned(), content_type.as_str().to_owned())];
        headers.extend(self.headers);
        Response { body, headers, status: self.status }
    }

    /// Terminate with no body (e.g. `Status::Found`).
    pub fn no_body(self) -> Response {
        Response { body: Vec::new(), headers: self.headers, status: self.status }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Plain handlers return any `IntoResponse`; `SiteError` implements it so a
/// failed request renders the same way from every route.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}
