use thiserror::Error;

/// Errors raised while assembling a service.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("store error: {0}")]
    Store(#[from] minigql_store::StoreError),

    #[error("schema error: {0}")]
    Schema(#[from] minigql_schema::SchemaError),

    #[error("unknown service: {0}")]
    UnknownService(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
