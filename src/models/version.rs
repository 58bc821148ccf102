use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

// Which stored document is the live one for a given kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentVersion {
    #[serde(rename = "_id")]
    pub kind: String,
    pub target: ObjectId,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionedKind {
    Schedule,
    Standings,
}

impl VersionedKind {
    pub fn key(&self) -> &'static str {
        match self {
            VersionedKind::Schedule => "schedule",
            VersionedKind::Standings => "standings",
        }
    }

    pub fn collection(&self) -> &'static str {
        match self {
            VersionedKind::Schedule => "schedules",
            VersionedKind::Standings => "standings",
        }
    }
}
