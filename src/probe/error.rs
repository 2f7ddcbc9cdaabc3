use thiserror::Error;

/// Errors raised by a [`Driver`](super::Driver).
///
/// The `Display` text is what the connectivity endpoint reports to the caller.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("invalid datasource URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}
