use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::services::errors::move_service_errors::MoveError;

#[derive(Debug)]
pub enum GameServiceError {
    GameNotFound,
    MoveRejected(MoveError),
    RepositoryError(GameRepositoryError),
    ValidationError(String),
}

impl std::fmt::Display for GameServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameServiceError::GameNotFound => write!(f, "Game not found"),
            GameServiceError::MoveRejected(err) => write!(f, "Move rejected: {}", err),
            GameServiceError::RepositoryError(err) => write!(f, "Repository error: {}", err),
            GameServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for GameServiceError {}

impl From<MoveError> for GameServiceError {
    fn from(err: MoveError) -> Self {
        GameServiceError::MoveRejected(err)
    }
}

impl From<GameRepositoryError> for GameServiceError {
    fn from(err: GameRepositoryError) -> Self {
        GameServiceError::RepositoryError(err)
    }
}
