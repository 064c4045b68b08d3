//! # folio
//!
//! A personal portfolio website: rendered pages, one detail page per project,
//! and a contact form that appends each submission to a local file.
//!
//! ## Pieces
//!
//! - [`Router`] / [`Server`]: radix-tree routing via [`matchit`] on top of
//!   hyper, with graceful shutdown on SIGTERM / Ctrl-C.
//! - [`Templates`]: named HTML templates rendered with minijinja.
//! - [`Catalog`]: the immutable slug → [`Project`] table behind `/work/{slug}`.
//! - [`ContactStore`]: append-only CSV and/or text storage for the form.
//! - [`Site`]: the handlers tying it all together.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use folio::{Assets, Catalog, ContactStore, Server, Site, Templates};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), folio::Error> {
//!     let site = Site::new(
//!         Templates::from_dir("templates"),
//!         Catalog::builtin(),
//!         ContactStore::new(".", Default::default()),
//!         Assets::new("static"),
//!     );
//!
//!     Server::bind("127.0.0.1:5000".parse().unwrap())
//!         .serve(Arc::new(site).router())
//!         .await
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod assets;
pub mod catalog;
pub mod config;
pub mod form;
pub mod site;
pub mod store;
pub mod templates;

pub use assets::Assets;
pub use catalog::{Catalog, Project};
pub use config::Config;
pub use error::Error;
pub use form::{ContactForm, Submission};
pub use handler::{BoxFuture, Handler};
pub use method::Method;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response};
pub use router::{DEFAULT_BODY_LIMIT, Router};
pub use server::Server;
pub use site::{Site, SiteError};
pub use status::Status;
pub use store::{ContactStore, StoreFormat, StoreFormats};
pub use templates::Templates;
