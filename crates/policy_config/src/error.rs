use std::path::PathBuf;

use policy_domain::CatalogError;

/// Faults that stop a run before any question is asked.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Set the {0} environment variable")]
    MissingCredential(&'static str),

    #[error("Failed to read knowledge base {path}")]
    KnowledgeBase {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read instruction template {path}")]
    Instructions {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
