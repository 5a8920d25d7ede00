pub mod game_service_errors;
pub mod move_service_errors;
