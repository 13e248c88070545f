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
    #[error("DynamoDB request failed: {0}")]
    Request(#[source] BoxError),

    /// An item could not be converted to or from its attribute map.
    #[error("item conversion failed: {0}")]
    Conversion(#[from] serde_dynamo::Error),

    #[error("JSON rendering failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("system clock error: {0}")]
    Clock(#[from] std::time::SystemTimeError),

    #[error("invalid {name}={value}: {reason}")]
    Config {
        name: &'static str,
        value: String,
        reason: String,
    },
}

pub(crate) fn request_error<E>(err: E) -> Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    Error::Request(Box::new(err))
}
