use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board dimensions must be non-zero")]
    InvalidDimensions,
    #[error("Mine placed on the safe starting cell")]
    MineOnSafeCell,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Mines can only be placed before any cell is opened")]
    AlreadyStarted,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;
