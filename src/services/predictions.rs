// Team strength and win-probability heuristic.

use crate::models::prediction::{MatchPrediction, TeamStrength};
use crate::models::standings::{FormResult, TeamStanding};
use crate::services::standings::FORM_LENGTH;

const WIN_RATE_WEIGHT: f64 = 0.4;
const GAME_WIN_RATE_WEIGHT: f64 = 0.3;
const FORM_WEIGHT: f64 = 0.3;
const NEUTRAL_RATE: f64 = 50.0;
const POINTS_PER_FORM_WIN: f64 = 20.0;
const CLEAN_SWEEP_CONFIDENCE: u32 = 70;

/// 0-100 score for a team. A team with no record is rated on neutral rates.
pub fn team_strength(team: &str, standing: Option<&TeamStanding>) -> TeamStrength {
    let (win_rate, game_win_rate, form_score) = match standing {
        Some(s) => (
            rate(s.match_wins, s.played),
            rate(s.game_wins, s.game_wins + s.game_losses),
            form_score(&s.form),
        ),
        None => (NEUTRAL_RATE, NEUTRAL_RATE, 0.0),
    };

    TeamStrength {
        team: team.to_string(),
        win_rate,
        game_win_rate,
        form_score,
        strength: WIN_RATE_WEIGHT * win_rate
            + GAME_WIN_RATE_WEIGHT * game_win_rate
            + FORM_WEIGHT * form_score,
    }
}

fn rate(won: u32, total: u32) -> f64 {
    if total == 0 {
        NEUTRAL_RATE
    } else {
        won as f64 / total as f64 * 100.0
    }
}

fn form_score(form: &[FormResult]) -> f64 {
    let recent = &form[form.len().saturating_sub(FORM_LENGTH)..];
    recent.iter().filter(|r| **r == FormResult::W).count() as f64 * POINTS_PER_FORM_WIN
}

/// Win probabilities for `a` and `b`, summing to exactly 100.
///
/// Only the team whose name sorts first is rounded; the other gets the
/// remainder, so swapping the arguments swaps the result.
pub fn win_probabilities(a: &TeamStrength, b: &TeamStrength) -> (u32, u32) {
    let total = a.strength + b.strength;
    if total <= 0.0 {
        return (50, 50);
    }
    let rounded = |s: f64| (s / total * 100.0).round().clamp(0.0, 100.0) as u32;
    if a.team <= b.team {
        let pa = rounded(a.strength);
        (pa, 100 - pa)
    } else {
        let pb = rounded(b.strength);
        (100 - pb, pb)
    }
}

/// Best-of-three scoreline for the favourite at the given confidence.
pub fn predicted_score(confidence: u32) -> &'static str {
    if confidence > CLEAN_SWEEP_CONFIDENCE {
        "2-0"
    } else {
        "2-1"
    }
}

pub fn predict_match(team1: &str, team2: &str, standings: &[TeamStanding]) -> MatchPrediction {
    let lookup = |team: &str| standings.iter().find(|s| s.team == team);
    let s1 = team_strength(team1, lookup(team1));
    let s2 = team_strength(team2, lookup(team2));
    let (p1, p2) = win_probabilities(&s1, &s2);

    let (predicted_winner, confidence) = if p1 >= p2 {
        (team1.to_string(), p1)
    } else {
        (team2.to_string(), p2)
    };

    MatchPrediction {
        day: None,
        date: None,
        team1: s1,
        team2: s2,
        team1_win_probability: p1,
        team2_win_probability: p2,
        predicted_winner,
        predicted_score: predicted_score(confidence).to_string(),
        confidence,
    }
}
