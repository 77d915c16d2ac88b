//! Errors raised while preparing or binding request metadata.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum ContextError {
    /// The metadata preparer failed; the wrapped target was never invoked.
    #[error("metadata preparation failed: {0}")]
    Preparation(#[source] BoxError),

    #[error("arguments match no recognized calling convention: {0}")]
    ShapeMismatch(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ContextError {
    pub fn preparation<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Preparation(err.into())
    }
}

pub type Result<T> = std::result::Result<T, ContextError>;
