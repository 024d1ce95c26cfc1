//! Error types for mdplay

use thiserror::Error;

/// Main error type for mdplay operations
#[derive(Error, Debug)]
pub enum PlaygroundError {
    /// IO error during file or pipe operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The interpreter process could not be started
    #[error("Could not start interpreter `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// No code block encloses the requested cursor position
    #[error("No code block at offset {offset}; place the cursor inside a fenced code block")]
    NoCodeBlock { offset: usize },

    /// Invalid command-line input
    #[error("Invalid argument: {0}")]
    Cli(String),
}

/// Result type alias for mdplay operations
pub type Result<T> = std::result::Result<T, PlaygroundError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: PlaygroundError = io.into();
        assert!(matches!(err, PlaygroundError::Io(_)));
        assert_eq!(err.to_string(), "IO error: gone");
    }

    #[test]
    fn test_no_code_block_message() {
        let err = PlaygroundError::NoCodeBlock { offset: 12 };
        assert!(err.to_string().contains("offset 12"));
    }

    #[test]
    fn test_spawn_message_names_program() {
        let err = PlaygroundError::Spawn {
            program: "swift".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(
            err.to_string(),
            "Could not start interpreter `swift`: not found"
        );
    }
}
