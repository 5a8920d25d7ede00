use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::move_record::MoveRecord;
use crate::models::piece::{Color, Piece, PieceKind};
use crate::models::square::Square;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Ongoing,
    Checkmate,
    Stalemate,
    Forfeited,
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub game_id: String,
    pub white_player_id: String,
    pub black_player_id: Option<String>,
    pub turn: Color,
    pub status: GameStatus,
    pub winner: Option<String>,
    pub pieces: Vec<Piece>,
    pub moves: Vec<MoveRecord>,
    pub created_at: DateTime<Utc>,
}

impl Game {
    pub fn new(white_player_id: &str) -> Self {
        Game {
            game_id: Uuid::new_v4().to_string(),
            white_player_id: white_player_id.to_string(),
            black_player_id: None,
            turn: Color::White,
            status: GameStatus::Ongoing,
            winner: None,
            pieces: vec![],
            moves: vec![],
            created_at: Utc::now(),
        }
    }

    /// Binds `player_id` as the black player if the seat is open and the
    /// caller is not the creator. Returns whether the player is now a
    /// participant.
    pub fn join(&mut self, player_id: &str) -> bool {
        if self.white_player_id == player_id {
            return true;
        }
        match &self.black_player_id {
            Some(black) => black == player_id,
            None => {
                self.black_player_id = Some(player_id.to_string());
                true
            }
        }
    }

    /// Lays out the standard 16-piece-per-side starting position. Requires
    /// both players to be bound; does nothing on a non-empty board.
    pub fn populate_board(&mut self) {
        let black_player_id = match &self.black_player_id {
            Some(id) => id.clone(),
            None => return,
        };
        if !self.pieces.is_empty() {
            return;
        }

        let game_id = self.game_id.clone();
        let white_player_id = self.white_player_id.clone();
        let sides = [
            (Color::White, white_player_id),
            (Color::Black, black_player_id),
        ];
        for (color, owner_id) in &sides {
            for (col, kind) in BACK_RANK.iter().enumerate() {
                self.pieces.push(Piece::new(
                    *kind,
                    *color,
                    Square::new(color.home_rank(), col as i8),
                    owner_id,
                    &game_id,
                ));
            }
            for col in 0..8 {
                self.pieces.push(Piece::new(
                    PieceKind::Pawn,
                    *color,
                    Square::new(color.pawn_rank(), col),
                    owner_id,
                    &game_id,
                ));
            }
        }
    }

    pub fn live_pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().filter(|p| !p.captured)
    }

    /// The non-captured occupant of `square`, if any.
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.live_pieces().find(|p| p.square() == square)
    }

    pub fn piece_by_id(&self, piece_id: &str) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == piece_id)
    }

    pub fn piece_index(&self, piece_id: &str) -> Option<usize> {
        self.pieces.iter().position(|p| p.id == piece_id)
    }

    pub fn player_color(&self, player_id: &str) -> Option<Color> {
        if self.white_player_id == player_id {
            Some(Color::White)
        } else if self.black_player_id.as_deref() == Some(player_id) {
            Some(Color::Black)
        } else {
            None
        }
    }

    pub fn player_id_for(&self, color: Color) -> Option<String> {
        match color {
            Color::White => Some(self.white_player_id.clone()),
            Color::Black => self.black_player_id.clone(),
        }
    }

    pub fn next_move_number(&self) -> u32 {
        self.moves.last().map(|m| m.move_number).unwrap_or(0) + 1
    }

    pub fn is_over(&self) -> bool {
        self.status != GameStatus::Ongoing
    }

    /// Concede the game in favor of the opponent. A no-op on a game that
    /// already reached a terminal state, and for callers who are not
    /// participants.
    pub fn forfeit(&mut self, player_id: &str) {
        if self.is_over() {
            return;
        }
        let conceding = match self.player_color(player_id) {
            Some(color) => color,
            None => return,
        };
        self.status = GameStatus::Forfeited;
        self.winner = self.player_id_for(conceding.opponent());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_defaults() {
        let game = Game::new("white-player");

        assert!(!game.game_id.is_empty());
        assert_eq!(game.white_player_id, "white-player");
        assert!(game.black_player_id.is_none());
        assert_eq!(game.turn, Color::White);
        assert_eq!(game.status, GameStatus::Ongoing);
        assert!(game.winner.is_none());
        assert!(game.pieces.is_empty());
        assert!(game.moves.is_empty());
    }

    #[test]
    fn test_game_ids_are_unique() {
        assert_ne!(Game::new("a").game_id, Game::new("a").game_id);
    }

    #[test]
    fn test_join_binds_black_seat_once() {
        let mut game = Game::new("white-player");

        assert!(game.join("black-player"));
        assert_eq!(game.black_player_id.as_deref(), Some("black-player"));

        // The seat stays bound to the first joiner.
        assert!(!game.join("third-player"));
        assert_eq!(game.black_player_id.as_deref(), Some("black-player"));
    }

    #[test]
    fn test_creator_joining_does_not_take_black_seat() {
        let mut game = Game::new("white-player");

        assert!(game.join("white-player"));
        assert!(game.black_player_id.is_none());
    }

    #[test]
    fn test_populate_board_standard_layout() {
        let mut game = Game::new("white-player");
        game.join("black-player");
        game.populate_board();

        assert_eq!(game.pieces.len(), 32);
        assert_eq!(
            game.pieces.iter().filter(|p| p.color == Color::White).count(),
            16
        );
        assert_eq!(
            game.pieces.iter().filter(|p| p.kind == PieceKind::Pawn).count(),
            16
        );

        let white_king = game.piece_at(Square::new(0, 4)).unwrap();
        assert_eq!(white_king.kind, PieceKind::King);
        assert_eq!(white_king.owner_id, "white-player");

        let black_king = game.piece_at(Square::new(7, 4)).unwrap();
        assert_eq!(black_king.kind, PieceKind::King);
        assert_eq!(black_king.owner_id, "black-player");

        let white_queen = game.piece_at(Square::new(0, 3)).unwrap();
        assert_eq!(white_queen.kind, PieceKind::Queen);
    }

    #[test]
    fn test_populate_board_requires_black_player() {
        let mut game = Game::new("white-player");
        game.populate_board();
        assert!(game.pieces.is_empty());
    }

    #[test]
    fn test_populate_board_is_lazy() {
        let mut game = Game::new("white-player");
        game.join("black-player");
        game.populate_board();
        game.populate_board();
        assert_eq!(game.pieces.len(), 32);
    }

    #[test]
    fn test_piece_at_ignores_captured_pieces() {
        let mut game = Game::new("white-player");
        game.join("black-player");
        game.pieces.push(Piece::new(
            PieceKind::Rook,
            Color::White,
            Square::new(3, 3),
            "white-player",
            &game.game_id,
        ));
        game.pieces[0].captured = true;

        assert!(game.piece_at(Square::new(3, 3)).is_none());
    }

    #[test]
    fn test_player_color_lookup() {
        let mut game = Game::new("white-player");
        game.join("black-player");

        assert_eq!(game.player_color("white-player"), Some(Color::White));
        assert_eq!(game.player_color("black-player"), Some(Color::Black));
        assert_eq!(game.player_color("stranger"), None);
    }

    #[test]
    fn test_next_move_number_starts_at_one() {
        let game = Game::new("white-player");
        assert_eq!(game.next_move_number(), 1);
    }

    #[test]
    fn test_forfeit_awards_opponent() {
        let mut game = Game::new("white-player");
        game.join("black-player");

        game.forfeit("white-player");

        assert_eq!(game.status, GameStatus::Forfeited);
        assert_eq!(game.winner.as_deref(), Some("black-player"));
    }

    #[test]
    fn test_forfeit_is_idempotent() {
        let mut game = Game::new("white-player");
        game.join("black-player");

        game.forfeit("black-player");
        let winner = game.winner.clone();

        // A second forfeit, even by the other player, changes nothing.
        game.forfeit("white-player");

        assert_eq!(game.status, GameStatus::Forfeited);
        assert_eq!(game.winner, winner);
        assert_eq!(game.winner.as_deref(), Some("white-player"));
    }

    #[test]
    fn test_forfeit_by_non_participant_is_ignored() {
        let mut game = Game::new("white-player");
        game.join("black-player");

        game.forfeit("stranger");

        assert_eq!(game.status, GameStatus::Ongoing);
        assert!(game.winner.is_none());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut game = Game::new("white-player");
        game.join("black-player");
        game.populate_board();

        let serialized = serde_json::to_string(&game).unwrap();
        let deserialized: Game = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized.game_id, game.game_id);
        assert_eq!(deserialized.pieces.len(), 32);
        assert_eq!(deserialized.turn, Color::White);
    }
}
