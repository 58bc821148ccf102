use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormResult {
    W,
    L,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStanding {
    pub team: String,
    #[serde(default)]
    pub played: u32,
    #[serde(default)]
    pub match_wins: u32,
    #[serde(default)]
    pub match_losses: u32,
    #[serde(default)]
    pub game_wins: u32,
    #[serde(default)]
    pub game_losses: u32,
    #[serde(default)]
    pub game_diff: i64,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub form: Vec<FormResult>,
    #[serde(default)]
    pub rank: u32,
}

impl TeamStanding {
    pub fn new(team: impl Into<String>) -> Self {
        TeamStanding {
            team: team.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StandingsSource {
    Manual,
    Fixtures,
}

// Stored table. Always this one shape; manual edits and fixture syncs share it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub standings: Vec<TeamStanding>,
    pub source: StandingsSource,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SaveStandings {
    pub standings: Vec<TeamStanding>,
}
