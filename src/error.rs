use thiserror::Error;

/// Everything that can go wrong while loading results or rendering a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GET {url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("invalid results JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("not an element: {0}")]
    InvalidChild(String),

    #[error("unknown status tag: {0}")]
    UnknownStatus(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;
