pub mod draw;
pub mod player_totals;
pub mod predictions;
pub mod standings;
pub mod versions;
