//! Process configuration.
//!
//! Read once at startup from the environment (after `.env`, if present).
//! Every setting has a default, so an empty environment serves the site from
//! the working directory on `127.0.0.1:5000`.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::Error;
use crate::store::StoreFormats;

pub const ENV_ADDR: &str = "FOLIO_ADDR";
pub const ENV_TEMPLATES: &str = "FOLIO_TEMPLATES";
pub const ENV_STATIC: &str = "FOLIO_STATIC";
pub const ENV_DATA_DIR: &str = "FOLIO_DATA_DIR";
pub const ENV_STORE: &str = "FOLIO_STORE";
pub const ENV_CATALOG: &str = "FOLIO_CATALOG";

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub templates_dir: PathBuf,
    pub static_dir: PathBuf,
    pub data_dir: PathBuf,
    pub store_formats: StoreFormats,
    /// JSON catalog replacing the built-in projects.
    pub catalog_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            templates_dir: PathBuf::from("templates"),
            static_dir: PathBuf::from("static"),
            data_dir: PathBuf::from("."),
            store_formats: StoreFormats::default(),
            catalog_file: None,
        }
    }
}

impl Config {
    /// Loads `.env` (if any) and then reads the process environment.
    pub fn from_env() -> Result<Self, Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Unset keys keep their
    /// defaults; set keys must parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut cfg = Self::default();

        if let Some(addr) = lookup(ENV_ADDR) {
            cfg.addr = addr
                .parse()
                .map_err(|e| Error::Config(format!("{ENV_ADDR}=`{addr}`: {e}")))?;
        }
        if let Some(dir) = lookup(ENV_TEMPLATES) {
            cfg.templates_dir = dir.into();
        }
        if let Some(dir) = lookup(ENV_STATIC) {
            cfg.static_dir = dir.into();
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            cfg.data_dir = dir.into();
        }
        if let Some(formats) = lookup(ENV_STORE) {
            cfg.store_formats = formats
                .parse()
                .map_err(|e| Error::Config(format!("{ENV_STORE}: {e}")))?;
        }
        cfg.catalog_file = lookup(ENV_CATALOG).map(PathBuf::from);

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::store::StoreFormat;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config, Error> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let cfg = from_pairs(&[]).unwrap();
        assert_eq!(cfg.addr, "127.0.0.1:5000".parse().unwrap());
        assert_eq!(cfg.templates_dir, PathBuf::from("templates"));
        assert_eq!(cfg.static_dir, PathBuf::from("static"));
        assert_eq!(cfg.data_dir, PathBuf::from("."));
        assert_eq!(cfg.store_formats.as_slice(), [StoreFormat::Csv]);
        assert!(cfg.catalog_file.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = from_pairs(&[
            (ENV_ADDR, "0.0.0.0:8080"),
            (ENV_DATA_DIR, "/var/lib/folio"),
            (ENV_STORE, "both"),
            (ENV_CATALOG, "projects.json"),
        ])
        .unwrap();
        assert_eq!(cfg.addr.port(), 8080);
        assert_eq!(cfg.data_dir, PathBuf::from("/var/lib/folio"));
        assert_eq!(cfg.store_formats.as_slice().len(), 2);
        assert_eq!(cfg.catalog_file, Some(PathBuf::from("projects.json")));
    }

    #[test]
    fn bad_values_are_startup_errors() {
        assert!(matches!(from_pairs(&[(ENV_ADDR, "localhost")]), Err(Error::Config(_))));
        assert!(matches!(from_pairs(&[(ENV_STORE, "sqlite")]), Err(Error::Config(_))));
    }
}
