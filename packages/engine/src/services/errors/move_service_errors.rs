use std::fmt;

/// Rejection reasons from the move pipeline. Every variant is recoverable:
/// the caller rejects the move, informs the user, and allows a retry. No
/// variant leaves the game partially mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    NullMove,
    OutOfBounds,
    AllyOccupiesDestination,
    IllegalPattern,
    PathObstructed,
    ExposesOwnKing,
    NotPlayersTurn,
    UndoTargetNotMostRecent,
    GameOver,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MoveError::NullMove => write!(f, "Destination equals current position"),
            MoveError::OutOfBounds => write!(f, "Destination is off the board"),
            MoveError::AllyOccupiesDestination => write!(f, "Ally occupies destination"),
            MoveError::IllegalPattern => write!(f, "Illegal pattern for piece type"),
            MoveError::PathObstructed => write!(f, "Path blocked"),
            MoveError::ExposesOwnKing => write!(f, "Move exposes own king"),
            MoveError::NotPlayersTurn => write!(f, "Not your turn"),
            MoveError::UndoTargetNotMostRecent => {
                write!(f, "Only the most recent move can be undone")
            }
            MoveError::GameOver => write!(f, "Game is already over"),
        }
    }
}

impl std::error::Error for MoveError {}
