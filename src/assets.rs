//! Static files from the asset directory.

use std::io;
use std::path::{Component, Path, PathBuf};

use crate::response::ContentType;

#[derive(Clone, Debug)]
pub struct Assets {
    root: PathBuf,
}

impl Assets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Reads `rel` below the asset root. Paths that are absolute or walk
    /// upwards are reported as not found.
    pub async fn read(&self, rel: &str) -> io::Result<Vec<u8>> {
        let path = self.resolve(rel).ok_or(io::ErrorKind::NotFound)?;
        tokio::fs::read(path).await
    }

    fn resolve(&self, rel: &str) -> Option<PathBuf> {
        let rel = Path::new(rel);
        let clean = rel.components().all(|c| matches!(c, Component::Normal(_)));
        (clean && !rel.as_os_str().is_empty()).then(|| self.root.join(rel))
    }
}

/// Content type by file extension; unknown extensions are sent as bytes.
pub fn content_type_for(path: &str) -> ContentType {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("css")           => ContentType::Css,
        Some("gif")           => ContentType::Gif,
        Some("htm" | "html")  => ContentType::Html,
        Some("ico")           => ContentType::Icon,
        Some("js" | "mjs")    => ContentType::Javascript,
        Some("jpg" | "jpeg")  => ContentType::Jpeg,
        Some("json")          => ContentType::Json,
        Some("pdf")           => ContentType::Pdf,
        Some("png")           => ContentType::Png,
        Some("svg")           => ContentType::Svg,
        Some("txt")           => ContentType::Text,
        Some("webp")          => ContentType::Webp,
        Some("woff2")         => ContentType::Woff2,
        _                     => ContentType::OctetStream,
    }
}
