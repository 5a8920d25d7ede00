use serde::{Deserialize, Serialize};

use crate::models::board::Board;
use crate::models::game::{Game, GameStatus};
use crate::models::move_record::MoveRecord;
use crate::models::piece::{Color, PieceKind};
use crate::models::square::Square;
use crate::services::errors::move_service_errors::MoveError;

/// Summary of a finalized move, returned to the caller and suitable for
/// rendering to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedMove {
    pub move_number: u32,
    pub piece_id: String,
    pub from: Square,
    pub to: Square,
    pub captured_piece_id: Option<String>,
    pub promoted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    fn rook_home_col(&self) -> i8 {
        match self {
            CastleSide::Queenside => 0,
            CastleSide::Kingside => 7,
        }
    }

    fn king_target_col(&self) -> i8 {
        match self {
            CastleSide::Queenside => 2,
            CastleSide::Kingside => 6,
        }
    }

    /// Columns the king crosses or lands on, in crossing order.
    fn king_transit_cols(&self) -> [i8; 2] {
        match self {
            CastleSide::Queenside => [3, 2],
            CastleSide::Kingside => [5, 6],
        }
    }
}

/// Move-validation and game-state engine. Stateless; every method takes
/// the game it operates on.
#[derive(Clone)]
pub struct MoveService;

impl MoveService {
    pub fn new() -> Self {
        MoveService
    }

    /// Validate and apply a move. Runs the pipeline in order — null move,
    /// bounds, ally destination, movement pattern, path obstruction,
    /// self-check — short-circuiting on the first failure. On success the
    /// capture is resolved first, the mover relocates (promoting a pawn
    /// that reaches the far rank), a move record is appended, and the
    /// turn advances. A rejected move leaves the game untouched.
    pub fn attempt_move(
        &self,
        game: &mut Game,
        piece_id: &str,
        to: Square,
    ) -> Result<AppliedMove, MoveError> {
        if game.is_over() {
            return Err(MoveError::GameOver);
        }
        let index = game
            .piece_index(piece_id)
            .expect("piece does not belong to this game");
        assert!(!game.pieces[index].captured, "captured piece cannot move");

        if game.pieces[index].color != game.turn {
            return Err(MoveError::NotPlayersTurn);
        }

        self.validate(game, index, to)?;

        let color = game.pieces[index].color;
        let from = game.pieces[index].square();
        let captured_piece_id = self.capture_occupant(game, color, to);

        let move_number = game.next_move_number();
        let game_id = game.game_id.clone();
        let piece = &mut game.pieces[index];
        piece.set_square(to);
        let mut promoted = false;
        if piece.kind == PieceKind::Pawn && to.row == color.promotion_rank() {
            piece.kind = PieceKind::Queen;
            promoted = true;
        }

        let mut record = MoveRecord::new(move_number, &piece.id, from, to, &game_id);
        record.captured_piece_id = captured_piece_id.clone();
        record.promoted = promoted;
        let applied = AppliedMove {
            move_number,
            piece_id: record.piece_id.clone(),
            from,
            to,
            captured_piece_id,
            promoted,
        };
        game.moves.push(record);
        game.turn = game.turn.opponent();

        Ok(applied)
    }

    /// Checks 1-5 mutate nothing; check 6 runs against a board snapshot,
    /// so no partial state is ever observable.
    fn validate(&self, game: &Game, index: usize, to: Square) -> Result<(), MoveError> {
        let piece = &game.pieces[index];
        let from = piece.square();

        if to == from {
            return Err(MoveError::NullMove);
        }
        if !to.on_board() {
            return Err(MoveError::OutOfBounds);
        }

        let occupant = game.piece_at(to);
        if let Some(other) = occupant {
            if other.color == piece.color {
                return Err(MoveError::AllyOccupiesDestination);
            }
        }
        let capturing = occupant.is_some();

        if !piece.kind.pattern_legal(from, to, piece.color, capturing) {
            return Err(MoveError::IllegalPattern);
        }

        let board = Board::from_game(game);
        let double_step = piece.kind == PieceKind::Pawn && (to.row - from.row).abs() == 2;
        if (piece.kind.slides() || double_step) && !board.path_clear(from, to) {
            return Err(MoveError::PathObstructed);
        }

        if board.with_move_applied(from, to).in_check(piece.color) {
            return Err(MoveError::ExposesOwnKing);
        }

        Ok(())
    }

    /// Flags the enemy occupant of `target` as captured and returns its
    /// id. The occupant keeps its position for a potential undo. An ally
    /// occupant is never captured.
    fn capture_occupant(&self, game: &mut Game, mover_color: Color, target: Square) -> Option<String> {
        let occupant_id = match game.piece_at(target) {
            Some(piece) if piece.color != mover_color => piece.id.clone(),
            _ => return None,
        };
        let index = game
            .piece_index(&occupant_id)
            .expect("occupant disappeared from the game");
        game.pieces[index].captured = true;
        Some(occupant_id)
    }

    /// True if no destination square passes validation for the piece —
    /// either nothing is geometrically reachable or every reachable
    /// square is vetoed by self-check. Turn-independent, so either side
    /// can be evaluated.
    pub fn cant_move(&self, game: &Game, piece_id: &str) -> bool {
        let index = game
            .piece_index(piece_id)
            .expect("piece does not belong to this game");
        for row in 0..8 {
            for col in 0..8 {
                if self.validate(game, index, Square::new(row, col)).is_ok() {
                    return false;
                }
            }
        }
        true
    }

    pub fn in_check(&self, game: &Game, color: Color) -> bool {
        Board::from_game(game).in_check(color)
    }

    /// Terminal-state evaluation for the side to move: checkmate when in
    /// check with no piece able to move, stalemate when not in check with
    /// no piece able to move. Returns the status and the winner, if any.
    pub fn evaluate_status(&self, game: &Game) -> (GameStatus, Option<String>) {
        let side = game.turn;
        let piece_ids: Vec<String> = game
            .live_pieces()
            .filter(|p| p.color == side)
            .map(|p| p.id.clone())
            .collect();
        if piece_ids.is_empty() {
            return (GameStatus::Ongoing, None);
        }

        let all_stuck = piece_ids.iter().all(|id| self.cant_move(game, id));
        if !all_stuck {
            return (GameStatus::Ongoing, None);
        }

        if self.in_check(game, side) {
            (GameStatus::Checkmate, game.player_id_for(side.opponent()))
        } else {
            (GameStatus::Stalemate, None)
        }
    }

    /// Reverse the most recent move. `move_number` must identify the tail
    /// of the log; undoing out of order fails with
    /// `UndoTargetNotMostRecent`. Restores the mover's square and kind, a
    /// captured piece's flag, a castled rook's home square, the turn, and
    /// the game status.
    pub fn undo_move(&self, game: &mut Game, move_number: u32) -> Result<(), MoveError> {
        let record = match game.moves.last() {
            Some(record) if record.move_number == move_number => record.clone(),
            _ => return Err(MoveError::UndoTargetNotMostRecent),
        };

        let index = game
            .piece_index(&record.piece_id)
            .expect("move log references a piece missing from the game");
        let mover_color = game.pieces[index].color;
        game.pieces[index].set_square(record.from);
        if record.promoted {
            game.pieces[index].kind = PieceKind::Pawn;
        }

        if let Some(captured_id) = &record.captured_piece_id {
            let captured_index = game
                .piece_index(captured_id)
                .expect("move log references a captured piece missing from the game");
            game.pieces[captured_index].captured = false;
        }

        if let Some(rook_id) = &record.castled_rook_id {
            let rook_index = game
                .piece_index(rook_id)
                .expect("move log references a rook missing from the game");
            let home_col = if record.to.col == 2 { 0 } else { 7 };
            game.pieces[rook_index].set_square(Square::new(record.from.row, home_col));
        }

        game.moves.pop();
        game.turn = mover_color;
        game.status = GameStatus::Ongoing;
        game.winner = None;
        Ok(())
    }

    pub fn undo_last_move(&self, game: &mut Game) -> Result<(), MoveError> {
        let move_number = game
            .moves
            .last()
            .map(|record| record.move_number)
            .ok_or(MoveError::UndoTargetNotMostRecent)?;
        self.undo_move(game, move_number)
    }

    /// Narrow castling primitive: if the path from the rook to `king_col`
    /// on the rook's rank is unobstructed, relocate the rook to its
    /// post-castle column (3 for the queenside rook at column 0, 5 for
    /// the kingside rook at column 7) and return true. Bypasses the rook
    /// movement pattern; invoked by `castle`, which also relocates the
    /// king.
    pub fn can_castle_to(&self, game: &mut Game, rook_id: &str, king_col: i8) -> bool {
        let index = match game.piece_index(rook_id) {
            Some(index) => index,
            None => return false,
        };
        let rook = &game.pieces[index];
        if rook.kind != PieceKind::Rook || rook.captured {
            return false;
        }
        let from = rook.square();

        let board = Board::from_game(game);
        if !board.path_clear(from, Square::new(from.row, king_col)) {
            return false;
        }

        let new_col = if from.col == 0 { 3 } else { 5 };
        game.pieces[index].set_square(Square::new(from.row, new_col));
        true
    }

    /// Castling coordinator. Requires king and rook on their home
    /// squares, a clear path between them, and a king that is not in
    /// check and does not cross or land on an attacked square. Relocates
    /// both pieces, records one move for the king, and advances the turn.
    pub fn castle(
        &self,
        game: &mut Game,
        color: Color,
        side: CastleSide,
    ) -> Result<AppliedMove, MoveError> {
        if game.is_over() {
            return Err(MoveError::GameOver);
        }
        if color != game.turn {
            return Err(MoveError::NotPlayersTurn);
        }

        let home = color.home_rank();
        let king_from = Square::new(home, 4);
        let rook_from = Square::new(home, side.rook_home_col());

        let king_id = match game.piece_at(king_from) {
            Some(piece) if piece.kind == PieceKind::King && piece.color == color => piece.id.clone(),
            _ => return Err(MoveError::IllegalPattern),
        };
        let rook_id = match game.piece_at(rook_from) {
            Some(piece) if piece.kind == PieceKind::Rook && piece.color == color => piece.id.clone(),
            _ => return Err(MoveError::IllegalPattern),
        };

        let board = Board::from_game(game);
        if !board.path_clear(rook_from, king_from) {
            return Err(MoveError::PathObstructed);
        }

        let enemy = color.opponent();
        if board.is_attacked(king_from, enemy) {
            return Err(MoveError::ExposesOwnKing);
        }
        for col in side.king_transit_cols() {
            if board.is_attacked(Square::new(home, col), enemy) {
                return Err(MoveError::ExposesOwnKing);
            }
        }

        if !self.can_castle_to(game, &rook_id, king_from.col) {
            return Err(MoveError::PathObstructed);
        }

        let king_to = Square::new(home, side.king_target_col());
        let move_number = game.next_move_number();
        let game_id = game.game_id.clone();
        let king_index = game
            .piece_index(&king_id)
            .expect("king disappeared from the game");
        game.pieces[king_index].set_square(king_to);

        let mut record = MoveRecord::new(move_number, &king_id, king_from, king_to, &game_id);
        record.castled_rook_id = Some(rook_id);
        game.moves.push(record);
        game.turn = game.turn.opponent();

        Ok(AppliedMove {
            move_number,
            piece_id: king_id,
            from: king_from,
            to: king_to,
            captured_piece_id: None,
            promoted: false,
        })
    }
}
