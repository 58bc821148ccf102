use axum::{extract::State, response::Json};

use crate::errors::{AppError, Result};
use crate::extract::AppQuery;
use crate::handlers::table::calculated_standings;
use crate::models::prediction::{MatchPrediction, MatchupQuery, PredictionQuery};
use crate::models::schedule::Schedule;
use crate::models::version::VersionedKind;
use crate::services::{predictions, versions};
use crate::state::AppState;

// GET /api/predictions?day=
pub async fn get_predictions(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PredictionQuery>,
) -> Result<Json<Vec<MatchPrediction>>> {
    let schedule = versions::load_current::<Schedule>(&state.db, VersionedKind::Schedule)
        .await?
        .ok_or_else(|| AppError::not_found("Schedule"))?;

    if let Some(day) = query.day {
        if schedule.day(day).is_none() {
            return Err(AppError::not_found(format!("Day {}", day)));
        }
    }

    let table = calculated_standings(&state.db).await?;

    let mut out = Vec::new();
    for day in schedule
        .schedule
        .iter()
        .filter(|d| query.day.map_or(true, |wanted| d.day == wanted))
    {
        for m in &day.matches {
            let mut prediction = predictions::predict_match(&m.blue, &m.red, &table);
            prediction.day = Some(day.day);
            prediction.date = m.date.clone().or_else(|| Some(day.date.clone())).filter(|d| !d.is_empty());
            out.push(prediction);
        }
    }

    tracing::info!("🔮 Predicted {} matches", out.len());
    Ok(Json(out))
}

// GET /api/predictions/match?team1=&team2=
pub async fn get_match_prediction(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<MatchupQuery>,
) -> Result<Json<MatchPrediction>> {
    let pick = |team: Option<String>| team.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
    let (Some(team1), Some(team2)) = (pick(query.team1), pick(query.team2)) else {
        return Err(AppError::invalid_data("team1 and team2 are required"));
    };

    let table = calculated_standings(&state.db).await?;
    let prediction = predictions::predict_match(&team1, &team2, &table);

    tracing::info!(
        "🔮 {} vs {}: {}-{}",
        team1,
        team2,
        prediction.team1_win_probability,
        prediction.team2_win_probability
    );
    Ok(Json(prediction))
}
