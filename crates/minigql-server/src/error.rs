use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("catalog error: {0}")]
    Catalog(#[from] minigql_catalog::CatalogError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;
