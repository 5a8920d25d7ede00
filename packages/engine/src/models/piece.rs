use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::square::Square;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row direction pawns of this color advance in.
    pub fn forward(&self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Rank the color's pawns start on.
    pub fn pawn_rank(&self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Rank the color's back-rank pieces start on.
    pub fn home_rank(&self) -> i8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Rank an advancing pawn of this color promotes on.
    pub fn promotion_rank(&self) -> i8 {
        self.opponent().home_rank()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceKind {
    /// Whether the kind moves an arbitrary distance along a line and is
    /// therefore subject to the path-obstruction scan.
    pub fn slides(&self) -> bool {
        matches!(self, PieceKind::Rook | PieceKind::Bishop | PieceKind::Queen)
    }

    /// Geometric movement-pattern predicate, independent of obstruction.
    /// `capturing` is true when the destination holds an enemy piece; it
    /// only matters for pawns, whose capture pattern differs from their
    /// advance pattern.
    pub fn pattern_legal(&self, from: Square, to: Square, color: Color, capturing: bool) -> bool {
        let dr = to.row - from.row;
        let dc = to.col - from.col;

        match self {
            PieceKind::Rook => (dr == 0) != (dc == 0),
            PieceKind::Bishop => dr != 0 && dr.abs() == dc.abs(),
            PieceKind::Queen => {
                PieceKind::Rook.pattern_legal(from, to, color, capturing)
                    || PieceKind::Bishop.pattern_legal(from, to, color, capturing)
            }
            PieceKind::Knight => {
                (dr.abs() == 1 && dc.abs() == 2) || (dr.abs() == 2 && dc.abs() == 1)
            }
            PieceKind::King => dr.abs().max(dc.abs()) == 1,
            PieceKind::Pawn => {
                let forward = color.forward();
                if capturing {
                    dr == forward && dc.abs() == 1
                } else {
                    dc == 0 && (dr == forward || (dr == 2 * forward && from.row == color.pawn_rank()))
                }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Piece {
    pub id: String,
    pub kind: PieceKind,
    pub color: Color,
    pub row: i8,
    pub col: i8,
    pub captured: bool,
    pub owner_id: String,
    pub game_id: String,
    pub created_at: DateTime<Utc>,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color, square: Square, owner_id: &str, game_id: &str) -> Self {
        Piece {
            id: Uuid::new_v4().to_string(),
            kind,
            color,
            row: square.row,
            col: square.col,
            captured: false,
            owner_id: owner_id.to_string(),
            game_id: game_id.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn square(&self) -> Square {
        Square::new(self.row, self.col)
    }

    pub fn set_square(&mut self, square: Square) {
        self.row = square.row;
        self.col = square.col;
    }
}
