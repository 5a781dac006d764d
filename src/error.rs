use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// Rejected locally before any request was made.
    #[error("{0}")]
    Validation(String),

    #[error("A submission is already in progress")]
    Busy,

    /// Non-success response from the analysis service.
    #[error("{0}")]
    Service(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl DashboardError {
    pub fn validation(message: impl Into<String>) -> Self {
        DashboardError::Validation(message.into())
    }

    pub fn service(message: impl Into<String>) -> Self {
        DashboardError::Service(message.into())
    }

    /// True when the failure happened before anything was sent.
    pub fn is_local(&self) -> bool {
        matches!(self, DashboardError::Validation(_) | DashboardError::Busy)
    }
}
