use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Mine count must be smaller than the number of cells")]
    TooManyMines,
    #[error("Mine count leaves no room outside the safe zone")]
    SafeZoneTooTight,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = std::result::Result<T, GameError>;
