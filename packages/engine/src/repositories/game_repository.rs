use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::game::Game;
use crate::repositories::errors::game_repository_errors::GameRepositoryError;

#[cfg(test)]
use mockall::automock;

/// Persistence boundary for games. A game is loaded and stored whole —
/// its piece set and move log travel with it — and each call is assumed
/// transactional by the service layer.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait GameRepository: Send + Sync {
    async fn create_game(&self, game: &Game) -> Result<(), GameRepositoryError>;
    async fn get_game(&self, game_id: &str) -> Result<Option<Game>, GameRepositoryError>;
    async fn update_game(&self, game: &Game) -> Result<(), GameRepositoryError>;
}

/// In-process store keyed by game id. The storage technology behind the
/// trait is deployment-specific; this implementation backs tests and
/// single-process embedders.
pub struct InMemoryGameRepository {
    games: RwLock<HashMap<String, Game>>,
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self {
            games: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    async fn create_game(&self, game: &Game) -> Result<(), GameRepositoryError> {
        let mut games = self.games.write().await;
        if games.contains_key(&game.game_id) {
            return Err(GameRepositoryError::AlreadyExists);
        }
        games.insert(game.game_id.clone(), game.clone());
        Ok(())
    }

    async fn get_game(&self, game_id: &str) -> Result<Option<Game>, GameRepositoryError> {
        let games = self.games.read().await;
        Ok(games.get(game_id).cloned())
    }

    async fn update_game(&self, game: &Game) -> Result<(), GameRepositoryError> {
        let mut games = self.games.write().await;
        if !games.contains_key(&game.game_id) {
            return Err(GameRepositoryError::NotFound);
        }
        games.insert(game.game_id.clone(), game.clone());
        Ok(())
    }
}
