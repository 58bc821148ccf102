pub mod admin;
pub mod asset;
pub mod fixture;
pub mod player;
pub mod player_stat;
pub mod prediction;
pub mod schedule;
pub mod standings;
pub mod version;
