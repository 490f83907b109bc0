use thiserror::Error;

/// Main error type for edgeval
#[derive(Error, Debug)]
pub enum EdgevalError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Agent API errors (load/describe/list/unload/predict)
    #[error("Agent API error: {0}")]
    Agent(String),

    /// Model is already loaded on the agent. Expected on repeated runs;
    /// callers may treat this as non-fatal.
    #[error("model '{0}' is already loaded")]
    ModelAlreadyLoaded(String),

    /// Anomaly-detection API errors
    #[error("Inference API error: {0}")]
    Inference(String),

    /// Parse errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Zero items evaluated; latency and metrics are undefined
    #[error("no items were evaluated; metrics are undefined")]
    EmptyRun,
}

/// Convenient Result type using EdgevalError
pub type Result<T> = std::result::Result<T, EdgevalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EdgevalError::Config("Test error".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("Test error"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let edgeval_err: EdgevalError = io_err.into();
        assert!(matches!(edgeval_err, EdgevalError::Io(_)));
    }

    #[test]
    fn test_already_loaded_names_model() {
        let err = EdgevalError::ModelAlreadyLoaded("defect-detector".to_string());
        assert!(err.to_string().contains("defect-detector"));
        assert!(err.to_string().contains("already loaded"));
    }
}
