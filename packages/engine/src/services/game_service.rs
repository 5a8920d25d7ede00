use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::models::game::Game;
use crate::models::piece::Piece;
use crate::models::square::Square;
use crate::repositories::game_repository::GameRepository;
use crate::services::errors::game_service_errors::GameServiceError;
use crate::services::errors::move_service_errors::MoveError;
use crate::services::move_service::{AppliedMove, CastleSide, MoveService};
use crate::services::notification_service::NotificationService;

/// Orchestrates a match: loads and persists games, serializes access per
/// game, binds the second player, populates the board lazily, runs the
/// move engine, and emits turn-change notifications.
#[derive(Clone)]
pub struct GameService {
    repository: Arc<dyn GameRepository + Send + Sync>,
    notifications: NotificationService,
    move_service: MoveService,
    game_locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl GameService {
    pub fn new(
        repository: Arc<dyn GameRepository + Send + Sync>,
        notifications: NotificationService,
    ) -> Self {
        GameService {
            repository,
            notifications,
            move_service: MoveService::new(),
            game_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn create_game(&self, white_player_id: &str) -> Result<Game, GameServiceError> {
        let game = Game::new(white_player_id);
        self.repository.create_game(&game).await?;
        info!("Created game {} for player {}", game.game_id, white_player_id);
        Ok(game)
    }

    pub async fn get_game(&self, game_id: &str) -> Result<Game, GameServiceError> {
        self.load(game_id).await
    }

    /// Every piece of the game, captured ones included, for rendering.
    pub async fn get_pieces(&self, game_id: &str) -> Result<Vec<Piece>, GameServiceError> {
        let game = self.load(game_id).await?;
        Ok(game.pieces)
    }

    /// Binds `player_id` to the open black seat. Joining a game you are
    /// already part of is a no-op.
    pub async fn join_game(&self, game_id: &str, player_id: &str) -> Result<Game, GameServiceError> {
        let lock = self.lock_for(game_id).await;
        let _guard = lock.lock().await;

        let mut game = self.load(game_id).await?;
        if !game.join(player_id) {
            return Err(GameServiceError::ValidationError(
                "Game already has two players".to_string(),
            ));
        }
        self.repository.update_game(&game).await?;
        Ok(game)
    }

    /// Full move cycle: join/populate if needed, resolve the piece on the
    /// source square, run the pipeline, re-evaluate the game status,
    /// persist, and notify. The per-game lock covers the whole sequence.
    pub async fn make_move(
        &self,
        game_id: &str,
        player_id: &str,
        from: Square,
        to: Square,
    ) -> Result<AppliedMove, GameServiceError> {
        let lock = self.lock_for(game_id).await;
        let _guard = lock.lock().await;

        let mut game = self.load(game_id).await?;
        if !game.join(player_id) {
            return Err(GameServiceError::ValidationError(
                "Player is not a participant in this game".to_string(),
            ));
        }
        if game.black_player_id.is_none() {
            return Err(GameServiceError::ValidationError(
                "Waiting for an opponent to join".to_string(),
            ));
        }
        if game.pieces.is_empty() {
            game.populate_board();
            self.repository.update_game(&game).await?;
        }

        let player_color = game
            .player_color(player_id)
            .expect("participant has a color");
        let piece = game.piece_at(from).ok_or_else(|| {
            GameServiceError::ValidationError("No piece at source square".to_string())
        })?;
        if piece.color != player_color {
            return Err(GameServiceError::MoveRejected(MoveError::NotPlayersTurn));
        }
        let piece_id = piece.id.clone();

        let applied = self.move_service.attempt_move(&mut game, &piece_id, to)?;

        let (status, winner) = self.move_service.evaluate_status(&game);
        game.status = status;
        game.winner = winner;

        self.repository.update_game(&game).await?;
        info!(
            "Move {} applied in game {} ({:?} to play)",
            applied.move_number, game_id, game.turn
        );

        self.notify_turn_changed(&game).await;
        Ok(applied)
    }

    /// Castle on behalf of `player_id`. Same persistence and
    /// notification cycle as a regular move.
    pub async fn castle(
        &self,
        game_id: &str,
        player_id: &str,
        side: CastleSide,
    ) -> Result<AppliedMove, GameServiceError> {
        let lock = self.lock_for(game_id).await;
        let _guard = lock.lock().await;

        let mut game = self.load(game_id).await?;
        let player_color = game.player_color(player_id).ok_or_else(|| {
            GameServiceError::ValidationError("Player is not a participant in this game".to_string())
        })?;

        let applied = self.move_service.castle(&mut game, player_color, side)?;

        let (status, winner) = self.move_service.evaluate_status(&game);
        game.status = status;
        game.winner = winner;

        self.repository.update_game(&game).await?;
        self.notify_turn_changed(&game).await;
        Ok(applied)
    }

    /// Undo the most recent move of the game. Strictly LIFO; anything
    /// else is rejected by the engine.
    pub async fn undo_last_move(
        &self,
        game_id: &str,
        player_id: &str,
    ) -> Result<(), GameServiceError> {
        let lock = self.lock_for(game_id).await;
        let _guard = lock.lock().await;

        let mut game = self.load(game_id).await?;
        if game.player_color(player_id).is_none() {
            return Err(GameServiceError::ValidationError(
                "Player is not a participant in this game".to_string(),
            ));
        }

        self.move_service.undo_last_move(&mut game)?;
        self.repository.update_game(&game).await?;
        info!("Undid last move in game {}", game_id);
        Ok(())
    }

    /// Concede the game. Idempotent: forfeiting a finished game changes
    /// nothing.
    pub async fn forfeit(&self, game_id: &str, player_id: &str) -> Result<Game, GameServiceError> {
        let lock = self.lock_for(game_id).await;
        let _guard = lock.lock().await;

        let mut game = self.load(game_id).await?;
        game.forfeit(player_id);
        self.repository.update_game(&game).await?;
        info!("Player {} forfeited game {}", player_id, game_id);
        Ok(game)
    }

    async fn load(&self, game_id: &str) -> Result<Game, GameServiceError> {
        self.repository
            .get_game(game_id)
            .await?
            .ok_or(GameServiceError::GameNotFound)
    }

    /// Delivery failure must not roll back an already-persisted move.
    async fn notify_turn_changed(&self, game: &Game) {
        if let Err(e) = self
            .notifications
            .notify_turn_changed(&game.game_id, game.turn, Utc::now())
            .await
        {
            warn!(
                "Failed to deliver turn-change notification for game {}: {}",
                game.game_id, e
            );
        }
    }

    async fn lock_for(&self, game_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.game_locks.lock().await;
        locks
            .entry(game_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
