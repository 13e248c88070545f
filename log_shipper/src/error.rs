use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
    /// A create call lost a race with another creator.
    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("{0} not found")]
    NotFound(String),

    /// Transport, credential or service-reported failure.
    #[error("CloudWatch Logs request failed: {0}")]
    Request(#[source] BoxError),
}

pub(crate) fn request_error<E>(err: E) -> Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    Error::Request(Box::new(err))
}
