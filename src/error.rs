//! Error types for the page enhancer

use thiserror::Error;

/// Result type alias for enhancer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or enhancing a page
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to load a page
    #[error("Failed to load page: {0}")]
    LoadError(String),

    /// A CSS selector could not be parsed
    #[error("Invalid selector `{selector}`: {message}")]
    SelectorError { selector: String, message: String },

    /// No element matched a selector that had to match
    #[error("No element matches `{0}`")]
    ElementNotFound(String),

    /// A chart attribute did not hold a JSON array
    #[error("Malformed chart data in `{attribute}`: {message}")]
    ChartData { attribute: String, message: String },

    /// The chart renderer failed
    #[error("Chart rendering failed: {0}")]
    RenderError(String),

    /// A navigation target could not be resolved
    #[error("Navigation failed: {0}")]
    NavigationError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Network error
    #[cfg(feature = "fetch")]
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn chart_data(attribute: &str, err: serde_json::Error) -> Self {
        Error::ChartData {
            attribute: attribute.to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(feature = "fetch")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::NetworkError(err.to_string())
    }
}
