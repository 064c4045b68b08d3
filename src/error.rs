//! Unified error type.

/// The error type returned by folio's fallible startup and serving operations.
///
/// Request-level failures (404, 400, 500) are expressed as HTTP
/// [`Response`](crate::Response) values through
/// [`SiteError`](crate::site::SiteError), not as `Error`s. This type surfaces
/// infrastructure failures: reading configuration, loading the catalog,
/// binding to a port.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: {0}")]
    Config(String),

    #[error("catalog: {0}")]
    Catalog(#[from] serde_json::Error),
}
