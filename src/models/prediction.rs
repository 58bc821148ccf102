use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStrength {
    pub team: String,
    pub win_rate: f64,
    pub game_win_rate: f64,
    pub form_score: f64,
    pub strength: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPrediction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub team1: TeamStrength,
    pub team2: TeamStrength,
    pub team1_win_probability: u32,
    pub team2_win_probability: u32,
    pub predicted_winner: String,
    pub predicted_score: String,
    pub confidence: u32,
}

#[derive(Debug, Deserialize)]
pub struct PredictionQuery {
    pub day: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct MatchupQuery {
    pub team1: Option<String>,
    pub team2: Option<String>,
}
