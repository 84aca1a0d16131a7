use thiserror::Error;

/// Rejected game configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Board size {0} is below the minimum of {min}", min = crate::consts::MIN_BOARD_SIZE)]
    BoardTooSmall(usize),
    #[error("Board size {0} exceeds the maximum of {max}", max = crate::consts::MAX_BOARD_SIZE)]
    BoardTooLarge(usize),
    #[error("Tick interval must be positive")]
    InvalidTickInterval,
    #[error("Initial snake needs at least one segment")]
    EmptySnake,
    #[error("Initial snake does not fit on a {0}x{0} board")]
    SnakeOutOfBounds(usize),
    #[error("Input queue needs room for at least one turn")]
    ZeroQueueCap,
}

/// Failure reported by the score persistence boundary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("Score rejected by backend: {0}")]
    Rejected(String),
}

pub type Result<T> = core::result::Result<T, ConfigError>;
