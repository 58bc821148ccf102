use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::fixture::MatchStatus;

// Schedule document - one per generated or hand-built season calendar
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub teams: Vec<String>,
    pub schedule: Vec<ScheduleDay>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDay {
    pub day: u32,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub matches: Vec<ScheduledMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledMatch {
    pub blue: String,
    pub red: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team1_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team2_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MatchStatus>,
}

impl ScheduledMatch {
    pub fn new(blue: impl Into<String>, red: impl Into<String>) -> Self {
        ScheduledMatch {
            blue: blue.into(),
            red: red.into(),
            date: None,
            team1_score: None,
            team2_score: None,
            status: None,
        }
    }

    pub fn reset(&mut self) {
        self.team1_score = None;
        self.team2_score = None;
        self.status = None;
    }
}

impl Schedule {
    pub fn day_mut(&mut self, day: u32) -> Option<&mut ScheduleDay> {
        self.schedule.iter_mut().find(|d| d.day == day)
    }

    pub fn day(&self, day: u32) -> Option<&ScheduleDay> {
        self.schedule.iter().find(|d| d.day == day)
    }
}

// For creating or rewriting a schedule
#[derive(Debug, Deserialize)]
pub struct SaveSchedule {
    pub teams: Vec<String>,
    pub schedule: Vec<ScheduleDay>,
}

// Body of POST /api/schedules/generate
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSchedule {
    pub teams: Vec<String>,
    pub start_date: Option<String>,
    pub days_between: Option<u32>,
    #[serde(default)]
    pub save: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchScoreUpdate {
    pub day: u32,
    pub match_index: usize,
    pub team1_score: u32,
    pub team2_score: u32,
    pub status: Option<MatchStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetMatch {
    pub day: u32,
    pub match_index: usize,
}

#[derive(Debug, Deserialize)]
pub struct ResetDay {
    pub day: u32,
}
