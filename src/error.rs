/// Error types for the wildac library
use std::fmt;

/// Result type alias for wildcard search operations
pub type Result<T> = std::result::Result<T, WildcardError>;

/// Main error type for automaton construction and wildcard search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WildcardError {
    /// Pattern has no literal fragments, or no patterns were supplied
    InvalidPattern(String),

    /// Attempt to insert a zero-length fragment into the trie
    EmptyFragment,

    /// Malformed caller input (missing tokens, multi-byte wildcard, ...)
    InvalidInput(String),

    /// I/O errors
    Io(String),
}

impl fmt::Display for WildcardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WildcardError::InvalidPattern(msg) => write!(f, "Invalid pattern: {}", msg),
            WildcardError::EmptyFragment => write!(f, "Empty fragment cannot be inserted"),
            WildcardError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            WildcardError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for WildcardError {}

impl From<std::io::Error> for WildcardError {
    fn from(err: std::io::Error) -> Self {
        WildcardError::Io(err.to_string())
    }
}
