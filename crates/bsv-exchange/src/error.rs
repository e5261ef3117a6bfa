use bsv_types::Cid;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("block not available from peers: {0}")]
    NotFound(Cid),

    #[error("exchange does not support {0}")]
    Unsupported(&'static str),

    #[error("exchange {0} timed out")]
    Timeout(&'static str),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("peer store error: {0}")]
    Store(#[from] bsv_store::StoreError),
}

pub type ExchangeResult<T> = Result<T, ExchangeError>;
