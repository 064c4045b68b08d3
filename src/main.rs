use std::sync::Arc;

use folio::{Assets, Catalog, Config, ContactStore, Server, Site, Templates};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), folio::Error> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "folio=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let catalog = match &config.catalog_file {
        Some(path) => Catalog::from_json_file(path)?,
        None => Catalog::builtin(),
    };
    info!(
        projects = catalog.len(),
        templates = %config.templates_dir.display(),
        assets = %config.static_dir.display(),
        data = %config.data_dir.display(),
        "site configured",
    );

    let site = Site::new(
        Templates::from_dir(&config.templates_dir),
        catalog,
        ContactStore::new(&config.data_dir, config.store_formats.clone()),
        Assets::new(&config.static_dir),
    );

    Server::bind(config.addr).serve(Arc::new(site).router()).await
}
