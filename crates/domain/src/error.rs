/// Shared error type used across all chatwidget crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("delivery to {endpoint} failed ({status}): {body}")]
    Delivery {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("config: {0}")]
    Config(String),

    #[error("topic table: {0}")]
    TopicTable(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
