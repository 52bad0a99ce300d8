use thiserror::Error;

/// Errors returned by board, game and rollout operations.
///
/// Memory exhaustion has no variant: allocation failure aborts through the
/// global allocator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("illegal move at ({x},{y}): {reason}")]
    IllegalMove { x: u8, y: u8, reason: &'static str },
}

/// Convenience Result type for game operations
pub type Result<T> = std::result::Result<T, GameError>;
