use std::path::Path;

use policy_domain::{Catalog, CatalogError};

const BUILTIN_CATALOG: &str = include_str!("../catalog.json");

/// The 25-question HR policy battery compiled into the binary.
pub fn builtin_catalog() -> Result<Catalog, CatalogError> {
    Catalog::from_json(BUILTIN_CATALOG)
}

/// Loads the catalog at `path`, or the built-in one when no path is given.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog, CatalogError> {
    match path {
        Some(path) => {
            let catalog = Catalog::from_path(path)?;
            tracing::info!(path = %path.display(), cases = catalog.len(), "Catalog loaded");
            Ok(catalog)
        }
        None => builtin_catalog(),
    }
}
