use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store connection failed: {0}")]
    Connection(String),

    #[error("store unavailable after {attempts} attempts: {details}")]
    Unavailable { attempts: u32, details: String },

    #[error("collection create failed with status {status}: {body}")]
    CollectionCreateFailed { status: u16, body: String },

    #[error("unexpected response from store ({status}): {body}")]
    Backend { status: u16, body: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Connection-level failures are worth retrying while the store starts
    /// up; anything the store actually answered is not.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Connection(_) => true,
            StoreError::Http(error) => error.is_connect() || error.is_timeout(),
            _ => false,
        }
    }
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
