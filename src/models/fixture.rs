use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    #[serde(alias = "Scheduled", alias = "upcoming")]
    Scheduled,
    #[serde(alias = "Live")]
    Live,
    #[serde(alias = "Completed", alias = "finished")]
    Completed,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::Live => "live",
            MatchStatus::Completed => "completed",
        }
    }
}

// One Bo3/Bo5 series between two teams. Also the stored match result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub match_id: String,
    pub match_day: u32,
    #[serde(default)]
    pub match_no: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub team_blue: String,
    pub team_red: String,
    #[serde(default)]
    pub score_blue: u32,
    #[serde(default)]
    pub score_red: u32,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub loser: Option<String>,
    #[serde(default)]
    pub is_bye_win: bool,
    #[serde(default)]
    pub status: MatchStatus,
    #[serde(default)]
    pub game_details: Vec<GameDetail>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDetail {
    pub game_number: u32,
    pub winner: String,
    pub loser: String,
    /// Game length in seconds.
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub mvp_player: Option<String>,
    #[serde(default)]
    pub mvp_team: Option<String>,
}

/// Identity of a match: `"<day>_<blue>_vs_<red>"` with all whitespace removed.
pub fn match_id(day: u32, blue: &str, red: &str) -> String {
    format!("{}_{}_vs_{}", day, blue, red)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

impl Fixture {
    pub fn new(day: u32, match_no: u32, blue: &str, red: &str) -> Self {
        let now = Utc::now();
        Fixture {
            id: None,
            match_id: match_id(day, blue, red),
            match_day: day,
            match_no,
            date: None,
            team_blue: blue.to_string(),
            team_red: red.to_string(),
            score_blue: 0,
            score_red: 0,
            winner: None,
            loser: None,
            is_bye_win: false,
            status: MatchStatus::Scheduled,
            game_details: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the series score and derives winner/loser. Equal scores leave both unset.
    pub fn set_score(&mut self, score_blue: u32, score_red: u32) {
        self.score_blue = score_blue;
        self.score_red = score_red;
        let (winner, loser) = if score_blue > score_red {
            (Some(self.team_blue.clone()), Some(self.team_red.clone()))
        } else if score_red > score_blue {
            (Some(self.team_red.clone()), Some(self.team_blue.clone()))
        } else {
            (None, None)
        };
        self.winner = winner;
        self.loser = loser;
    }
}

// For creating or upserting a fixture
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFixture {
    pub match_day: u32,
    #[serde(default)]
    pub match_no: u32,
    pub date: Option<String>,
    pub team_blue: String,
    pub team_red: String,
    pub score_blue: Option<u32>,
    pub score_red: Option<u32>,
    #[serde(default)]
    pub is_bye_win: bool,
    pub status: Option<MatchStatus>,
    #[serde(default)]
    pub game_details: Vec<GameDetail>,
}

impl CreateFixture {
    pub fn check(&self) -> Result<(), String> {
        if self.team_blue.trim().is_empty() || self.team_red.trim().is_empty() {
            return Err("teamBlue and teamRed are required".to_string());
        }
        if self.team_blue.trim() == self.team_red.trim() {
            return Err(format!("{} cannot play itself", self.team_blue));
        }
        if self.match_day == 0 {
            return Err("matchDay must be 1 or greater".to_string());
        }
        if self.match_no == 0 {
            return Err("matchNo must be 1 or greater".to_string());
        }
        Ok(())
    }

    pub fn into_fixture(self) -> Fixture {
        let mut fixture = Fixture::new(
            self.match_day,
            self.match_no,
            self.team_blue.trim(),
            self.team_red.trim(),
        );
        fixture.date = self.date;
        fixture.is_bye_win = self.is_bye_win;
        fixture.game_details = self.game_details;
        fixture.set_score(self.score_blue.unwrap_or(0), self.score_red.unwrap_or(0));
        fixture.status = self.status.unwrap_or(match (self.score_blue, self.score_red) {
            (Some(_), Some(_)) => MatchStatus::Completed,
            _ => MatchStatus::Scheduled,
        });
        fixture
    }
}

// For PATCH /api/fixtures/:matchDay/:matchNo
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFixture {
    pub score_blue: Option<u32>,
    pub score_red: Option<u32>,
    pub status: Option<MatchStatus>,
    pub date: Option<String>,
    pub is_bye_win: Option<bool>,
    pub game_details: Option<Vec<GameDetail>>,
}

#[derive(Debug, Deserialize)]
pub struct FixtureQuery {
    pub status: Option<MatchStatus>,
}
