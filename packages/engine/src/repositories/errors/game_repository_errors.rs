#[derive(Debug)]
pub enum GameRepositoryError {
    NotFound,
    AlreadyExists,
    Serialization(String),
    Storage(String),
}

impl std::fmt::Display for GameRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameRepositoryError::NotFound => write!(f, "Game not found"),
            GameRepositoryError::AlreadyExists => write!(f, "Game already exists"),
            GameRepositoryError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            GameRepositoryError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for GameRepositoryError {}
