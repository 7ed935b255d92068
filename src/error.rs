use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("cannot write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),
}

impl Error {
    /// True when the server rejected a create because the record is already there.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        match self {
            Error::Api { status, message } => {
                let message = message.to_lowercase();
                *status == 409 || message.contains("already exists") || message.contains("duplicate")
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
