//! HTTP status codes the site answers with.
//!
//! Use [`Status`] anywhere a status code is accepted: `Response::status()` or
//! `Response::builder().status()`.
//!
//! ```rust
//! use folio::{Response, Status};
//!
//! Response::status(Status::NotFound);
//!
//! Response::builder()
//!     .status(Status::Found)
//!     .header("location", "/thankyou.html")
//!     .no_body();
//! ```

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    Ok,                   // 200
    Found,                // 302
    BadRequest,           // 400
    NotFound,             // 404
    MethodNotAllowed,     // 405
    PayloadTooLarge,      // 413
    InternalServerError,  // 500
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Self::Ok                  => 200,
            Self::Found               => 302,
            Self::BadRequest          => 400,
            Self::NotFound            => 404,
            Self::MethodNotAllowed    => 405,
            Self::PayloadTooLarge     => 413,
            Self::InternalServerError => 500,
        }
    }
}

impl From<Status> for http::StatusCode {
    fn from(s: Status) -> http::StatusCode {
        match s {
            Status::Ok                  => http::StatusCode::OK,
            Status::Found               => http::StatusCode::FOUND,
            Status::BadRequest          => http::StatusCode::BAD_REQUEST,
            Status::NotFound            => http::StatusCode::NOT_FOUND,
            Status::MethodNotAllowed    => http::StatusCode::METHOD_NOT_ALLOWED,
            Status::PayloadTooLarge     => http::StatusCode::PAYLOAD_TOO_LARGE,
            Status::InternalServerError => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
