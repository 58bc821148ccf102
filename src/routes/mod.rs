pub mod auth;
pub mod fixtures;
pub mod heroes;
pub mod logos;
pub mod player_stats;
pub mod players;
pub mod predictions;
pub mod schedules;
pub mod table;
