use thiserror::Error;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote store returned {status} for {operation}: {body}")]
    RemoteStatus {
        operation: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("entry content must not be blank")]
    BlankContent,

    #[error("entry is marked as located but has neither coordinates nor a place name")]
    IncompleteLocation,

    #[error("image exceeds the {limit} byte limit")]
    ImageTooLarge { limit: usize },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, JournalError>;
