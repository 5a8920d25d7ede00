pub mod errors;
pub mod game_repository;
pub mod notification_repository;
