use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::square::Square;

/// One entry of a game's ordered move log. Records everything needed to
/// reverse the move: the mover, the squares, any captured piece, a
/// promotion, and the rook relocated alongside a castling king move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRecord {
    pub move_number: u32,
    pub piece_id: String,
    pub from: Square,
    pub to: Square,
    pub captured_piece_id: Option<String>,
    pub promoted: bool,
    pub castled_rook_id: Option<String>,
    pub game_id: String,
    pub created_at: DateTime<Utc>,
}

impl MoveRecord {
    pub fn new(move_number: u32, piece_id: &str, from: Square, to: Square, game_id: &str) -> Self {
        MoveRecord {
            move_number,
            piece_id: piece_id.to_string(),
            from,
            to,
            captured_piece_id: None,
            promoted: false,
            castled_rook_id: None,
            game_id: game_id.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_move_record_defaults() {
        let record = MoveRecord::new(1, "piece-1", Square::new(1, 1), Square::new(2, 1), "game-1");

        assert_eq!(record.move_number, 1);
        assert_eq!(record.piece_id, "piece-1");
        assert_eq!(record.from, Square::new(1, 1));
        assert_eq!(record.to, Square::new(2, 1));
        assert!(record.captured_piece_id.is_none());
        assert!(!record.promoted);
        assert!(record.castled_rook_id.is_none());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut record =
            MoveRecord::new(3, "piece-9", Square::new(4, 4), Square::new(5, 5), "game-1");
        record.captured_piece_id = Some("piece-2".to_string());

        let serialized = serde_json::to_string(&record).unwrap();
        let deserialized: MoveRecord = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized.move_number, 3);
        assert_eq!(deserialized.captured_piece_id, Some("piece-2".to_string()));
        assert_eq!(deserialized.to, Square::new(5, 5));
    }
}
