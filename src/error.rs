use thiserror::Error;

/// Output bounds were configured with `min > max`.
///
/// The controller keeps its previous bounds when this is returned.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("min: {min} is greater than max: {max}")]
pub struct InvalidRangeError {
    pub min: f64,
    pub max: f64,
}

/// Failure while loading or validating a scenario.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Scenario file could not be read
    #[error("Io error: {0}")]
    Io(#[from] std::io::Error),

    /// Scenario file is not valid JSON for the expected schema
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Controller output bounds are inverted
    #[error("Invalid output range: {0}")]
    Range(#[from] InvalidRangeError),

    /// Values that parse but make no sense (non-positive step, ...)
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Convenient alias over [`Result`] using [`ConfigError`]
pub type Result<T> = std::result::Result<T, ConfigError>;
