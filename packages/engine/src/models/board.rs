use crate::models::game::Game;
use crate::models::piece::{Color, PieceKind};
use crate::models::square::Square;

/// Kind and color of a piece as seen by the board snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupant {
    pub kind: PieceKind,
    pub color: Color,
}

/// Immutable occupancy snapshot of a game's live pieces, indexed by
/// square. Move candidates are simulated here so that live game state is
/// never mutated, and never observable mid-validation.
#[derive(Debug, Clone)]
pub struct Board {
    squares: [[Option<Occupant>; 8]; 8],
}

impl Board {
    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    pub fn from_game(game: &Game) -> Self {
        let mut board = Board::empty();
        for piece in game.live_pieces() {
            board.place(
                piece.square(),
                Occupant {
                    kind: piece.kind,
                    color: piece.color,
                },
            );
        }
        board
    }

    pub fn place(&mut self, square: Square, occupant: Occupant) {
        self.squares[square.row as usize][square.col as usize] = Some(occupant);
    }

    pub fn occupant(&self, square: Square) -> Option<Occupant> {
        if !square.on_board() {
            return None;
        }
        self.squares[square.row as usize][square.col as usize]
    }

    /// Whether every square strictly between `from` and `to` is empty.
    pub fn path_clear(&self, from: Square, to: Square) -> bool {
        from.between(to)
            .into_iter()
            .all(|square| self.occupant(square).is_none())
    }

    /// The snapshot after moving the occupant of `from` onto `to`. Any
    /// occupant of `to` is removed first, so the result is the
    /// post-capture position.
    pub fn with_move_applied(&self, from: Square, to: Square) -> Board {
        let mut next = self.clone();
        let mover = next.squares[from.row as usize][from.col as usize].take();
        next.squares[to.row as usize][to.col as usize] = mover;
        next
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        for row in 0..8i8 {
            for col in 0..8i8 {
                let square = Square::new(row, col);
                if let Some(occupant) = self.occupant(square) {
                    if occupant.kind == PieceKind::King && occupant.color == color {
                        return Some(square);
                    }
                }
            }
        }
        None
    }

    /// Whether any piece of `by` has a legal capture pattern onto
    /// `square` with an unobstructed path.
    pub fn is_attacked(&self, square: Square, by: Color) -> bool {
        for row in 0..8i8 {
            for col in 0..8i8 {
                let from = Square::new(row, col);
                let occupant = match self.occupant(from) {
                    Some(occupant) if occupant.color == by => occupant,
                    _ => continue,
                };
                if !occupant.kind.pattern_legal(from, square, by, true) {
                    continue;
                }
                if occupant.kind.slides() && !self.path_clear(from, square) {
                    continue;
                }
                return true;
            }
        }
        false
    }

    pub fn in_check(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(king) => self.is_attacked(king, color.opponent()),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: i8, col: i8) -> Square {
        Square::new(row, col)
    }

    fn occ(kind: PieceKind, color: Color) -> Occupant {
        Occupant { kind, color }
    }

    #[test]
    fn test_from_game_skips_captured_pieces() {
        use crate::models::piece::Piece;

        let mut game = Game::new("white-player");
        game.join("black-player");
        let mut pawn = Piece::new(
            PieceKind::Pawn,
            Color::White,
            sq(1, 1),
            "white-player",
            &game.game_id,
        );
        pawn.captured = true;
        game.pieces.push(pawn);

        let board = Board::from_game(&game);
        assert!(board.occupant(sq(1, 1)).is_none());
    }

    #[test]
    fn test_occupant_off_board_is_none() {
        let board = Board::empty();
        assert!(board.occupant(sq(-1, 0)).is_none());
        assert!(board.occupant(sq(0, 8)).is_none());
    }

    #[test]
    fn test_path_clear() {
        let mut board = Board::empty();
        board.place(sq(6, 3), occ(PieceKind::Pawn, Color::White));

        assert!(!board.path_clear(sq(6, 1), sq(6, 7)));
        assert!(board.path_clear(sq(6, 1), sq(6, 3)));
        assert!(board.path_clear(sq(0, 0), sq(7, 7)));
    }

    #[test]
    fn test_with_move_applied_resolves_capture() {
        let mut board = Board::empty();
        board.place(sq(0, 0), occ(PieceKind::Rook, Color::White));
        board.place(sq(0, 5), occ(PieceKind::Pawn, Color::Black));

        let next = board.with_move_applied(sq(0, 0), sq(0, 5));

        assert!(next.occupant(sq(0, 0)).is_none());
        assert_eq!(
            next.occupant(sq(0, 5)),
            Some(occ(PieceKind::Rook, Color::White))
        );
        // The source snapshot is untouched.
        assert_eq!(
            board.occupant(sq(0, 0)),
            Some(occ(PieceKind::Rook, Color::White))
        );
    }

    #[test]
    fn test_king_square() {
        let mut board = Board::empty();
        board.place(sq(0, 4), occ(PieceKind::King, Color::White));

        assert_eq!(board.king_square(Color::White), Some(sq(0, 4)));
        assert_eq!(board.king_square(Color::Black), None);
    }

    #[test]
    fn test_rook_attacks_along_open_lines() {
        let mut board = Board::empty();
        board.place(sq(0, 0), occ(PieceKind::Rook, Color::Black));

        assert!(board.is_attacked(sq(0, 7), Color::Black));
        assert!(board.is_attacked(sq(5, 0), Color::Black));
        assert!(!board.is_attacked(sq(1, 1), Color::Black));
    }

    #[test]
    fn test_blocked_rook_does_not_attack() {
        let mut board = Board::empty();
        board.place(sq(0, 0), occ(PieceKind::Rook, Color::Black));
        board.place(sq(0, 3), occ(PieceKind::Pawn, Color::White));

        assert!(!board.is_attacked(sq(0, 7), Color::Black));
        assert!(board.is_attacked(sq(0, 3), Color::Black));
    }

    #[test]
    fn test_pawn_attacks_diagonally_only() {
        let mut board = Board::empty();
        board.place(sq(3, 3), occ(PieceKind::Pawn, Color::White));

        assert!(board.is_attacked(sq(4, 2), Color::White));
        assert!(board.is_attacked(sq(4, 4), Color::White));
        assert!(!board.is_attacked(sq(4, 3), Color::White));
    }

    #[test]
    fn test_in_check() {
        let mut board = Board::empty();
        board.place(sq(0, 0), occ(PieceKind::King, Color::White));
        board.place(sq(0, 7), occ(PieceKind::Rook, Color::Black));

        assert!(board.in_check(Color::White));

        let blocked = {
            let mut blocked = board.clone();
            blocked.place(sq(0, 3), occ(PieceKind::Bishop, Color::White));
            blocked
        };
        assert!(!blocked.in_check(Color::White));
    }

    #[test]
    fn test_in_check_without_king_is_false() {
        let board = Board::empty();
        assert!(!board.in_check(Color::White));
    }
}
