pub mod errors;
pub mod game_service;
pub mod move_service;
pub mod notification_service;
