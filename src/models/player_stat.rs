use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

// One player's line in one game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStat {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub match_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_day: Option<u32>,
    #[serde(default = "default_game_number")]
    pub game_number: u32,
    pub team_name: String,
    pub player_name: String,
    #[serde(default)]
    pub hero_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub deaths: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub gold: u64,
    #[serde(default)]
    pub damage: u64,
    #[serde(default)]
    pub mvp: bool,
    /// Seconds.
    #[serde(default)]
    pub game_duration: u32,
    #[serde(default)]
    pub win: bool,
    /// Games this record stands for. Missing means one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub games_played: Option<u32>,
    pub created_at: DateTime<Utc>,
}

fn default_game_number() -> u32 {
    1
}

// Incoming stat line, before timestamps and day are attached
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerStat {
    pub match_id: String,
    pub match_day: Option<u32>,
    #[serde(default = "default_game_number")]
    pub game_number: u32,
    pub team_name: String,
    pub player_name: String,
    #[serde(default)]
    pub hero_name: String,
    pub role: Option<String>,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub deaths: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub gold: u64,
    #[serde(default)]
    pub damage: u64,
    #[serde(default)]
    pub mvp: bool,
    #[serde(default)]
    pub game_duration: u32,
    #[serde(default)]
    pub win: bool,
    pub games_played: Option<u32>,
}

impl CreatePlayerStat {
    pub fn check(&self) -> Result<(), String> {
        if self.match_id.trim().is_empty() {
            return Err("matchId is required".to_string());
        }
        if self.player_name.trim().is_empty() {
            return Err("playerName is required".to_string());
        }
        if self.team_name.trim().is_empty() {
            return Err(format!("teamName is required for {}", self.player_name));
        }
        Ok(())
    }

    pub fn into_stat(self, created_at: DateTime<Utc>) -> PlayerStat {
        let match_day = self.match_day.or_else(|| day_from_match_id(&self.match_id));
        PlayerStat {
            id: None,
            match_id: self.match_id.trim().to_string(),
            match_day,
            game_number: self.game_number,
            team_name: self.team_name.trim().to_string(),
            player_name: self.player_name.trim().to_string(),
            hero_name: self.hero_name,
            role: self.role,
            kills: self.kills,
            deaths: self.deaths,
            assists: self.assists,
            gold: self.gold,
            damage: self.damage,
            mvp: self.mvp,
            game_duration: self.game_duration,
            win: self.win,
            games_played: self.games_played,
            created_at,
        }
    }
}

/// The leading day number of a `"<day>_<blue>_vs_<red>"` match id.
pub fn day_from_match_id(match_id: &str) -> Option<u32> {
    match_id.split('_').next()?.parse().ok()
}

// Body of POST /api/player-stats/sync: every line of a single game
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncGameStats {
    pub match_id: String,
    pub game_number: u32,
    pub players: Vec<CreatePlayerStat>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatQuery {
    pub match_id: Option<String>,
    pub player_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    pub limit: Option<usize>,
}

// Per-player totals, computed on read
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerTotals {
    pub player_name: String,
    pub team: String,
    pub role: Option<String>,
    pub games_played: u32,
    pub wins: u32,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub mvp_count: u32,
    pub gold: u64,
    pub damage: u64,
    pub minutes_played: f64,
    pub kda: f64,
    pub gold_per_min: f64,
    pub avg_kills: f64,
    pub avg_deaths: f64,
    pub avg_assists: f64,
    pub avg_damage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSummary {
    pub role: String,
    pub players: usize,
    pub avg_kda: f64,
    pub avg_gold_per_min: f64,
    pub top_player: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub totals: PlayerTotals,
    pub games: Vec<PlayerStat>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_is_read_from_match_id() {
        assert_eq!(day_from_match_id("12_Alpha_vs_Bravo"), Some(12));
        assert_eq!(day_from_match_id("Alpha_vs_Bravo"), None);
    }

    #[test]
    fn missing_counters_default_to_zero() {
        let json = r#"{ "matchId": "1_A_vs_B", "teamName": "A", "playerName": "Shadow" }"#;
        let stat: CreatePlayerStat = serde_json::from_str(json).unwrap();
        assert_eq!(stat.game_number, 1);
        assert_eq!(stat.kills, 0);
        assert!(stat.games_played.is_none());
        assert_eq!(stat.into_stat(Utc::now()).match_day, Some(1));
    }
}
