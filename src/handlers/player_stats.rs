use axum::{extract::State, response::Json};
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::{bson::doc, Collection, Database};

use crate::errors::{AppError, Result};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::models::player_stat::{
    CreatePlayerStat, PlayerProfile, PlayerStat, PlayerStatQuery, PlayerTotals, RoleSummary,
    SyncGameStats, TopQuery,
};
use crate::services::player_totals::{self, RankedStat};
use crate::state::AppState;

const DEFAULT_TOP_LIMIT: usize = 10;

fn player_stats(db: &Database) -> Collection<PlayerStat> {
    db.collection("player_stats")
}

// Natural (insertion) order: later lines win team/role in the totals.
async fn load_all(db: &Database) -> Result<Vec<PlayerStat>> {
    let cursor = player_stats(db).find(doc! {}).sort(doc! { "_id": 1 }).await?;
    Ok(cursor.try_collect().await?)
}

fn prepare(lines: Vec<CreatePlayerStat>) -> Result<Vec<PlayerStat>> {
    let now = Utc::now();
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            line.check()
                .map_err(|e| AppError::invalid_data(format!("Line {}: {}", i + 1, e)))?;
            Ok(line.into_stat(now))
        })
        .collect()
}

// GET /api/player-stats
pub async fn get_player_stats(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PlayerStatQuery>,
) -> Result<Json<Vec<PlayerStat>>> {
    let mut filter = doc! {};
    if let Some(match_id) = &query.match_id {
        filter.insert("matchId", match_id);
    }
    if let Some(player_name) = &query.player_name {
        filter.insert("playerName", player_name);
    }

    let cursor = player_stats(&state.db).find(filter).sort(doc! { "_id": 1 }).await?;
    let lines: Vec<PlayerStat> = cursor.try_collect().await?;
    tracing::info!("✅ Fetched {} stat lines", lines.len());
    Ok(Json(lines))
}

// POST /api/player-stats
pub async fn create_player_stat(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePlayerStat>,
) -> Result<Json<PlayerStat>> {
    let mut stat = prepare(vec![payload])?
        .pop()
        .ok_or_else(|| AppError::service("Stat line lost in preparation"))?;
    let inserted = player_stats(&state.db).insert_one(&stat).await?;
    stat.id = inserted.inserted_id.as_object_id();
    tracing::info!("✅ Recorded {} in {} game {}", stat.player_name, stat.match_id, stat.game_number);
    Ok(Json(stat))
}

// GET /api/player-stats/day/:day
pub async fn get_stats_by_day(
    State(state): State<AppState>,
    AppPath(day): AppPath<u32>,
) -> Result<Json<Vec<PlayerStat>>> {
    let cursor = player_stats(&state.db)
        .find(doc! { "matchDay": day })
        .sort(doc! { "matchId": 1, "gameNumber": 1 })
        .await?;
    let lines: Vec<PlayerStat> = cursor.try_collect().await?;
    tracing::info!("✅ Fetched {} stat lines for day {}", lines.len(), day);
    Ok(Json(lines))
}

// GET /api/player-stats/totals
pub async fn get_player_totals(State(state): State<AppState>) -> Result<Json<Vec<PlayerTotals>>> {
    let lines = load_all(&state.db).await?;
    let totals = player_totals::aggregate_player_totals(&lines);
    tracing::info!("📊 Aggregated {} lines into {} players", lines.len(), totals.len());
    Ok(Json(totals))
}

// GET /api/player-stats/top/:stat
pub async fn get_top_players(
    State(state): State<AppState>,
    AppPath(stat): AppPath<String>,
    AppQuery(query): AppQuery<TopQuery>,
) -> Result<Json<Vec<PlayerTotals>>> {
    let ranked = RankedStat::parse(&stat).ok_or_else(|| {
        AppError::invalid_data(format!(
            "Unknown stat '{}'. Use one of: {}",
            stat,
            RankedStat::NAMES.join(", ")
        ))
    })?;
    let limit = query.limit.unwrap_or(DEFAULT_TOP_LIMIT).max(1);

    let lines = load_all(&state.db).await?;
    let totals = player_totals::aggregate_player_totals(&lines);
    Ok(Json(player_totals::top_players(totals, ranked, limit)))
}

// GET /api/player-stats/player/:name
pub async fn get_player_profile(
    State(state): State<AppState>,
    AppPath(name): AppPath<String>,
) -> Result<Json<PlayerProfile>> {
    let cursor = player_stats(&state.db)
        .find(doc! { "playerName": &name })
        .sort(doc! { "_id": 1 })
        .await?;
    let games: Vec<PlayerStat> = cursor.try_collect().await?;

    let totals = player_totals::aggregate_player_totals(&games)
        .into_iter()
        .next()
        .ok_or_else(|| AppError::not_found(format!("Stats for {}", name)))?;

    Ok(Json(PlayerProfile { totals, games }))
}

// POST /api/player-stats/sync
//
// Replaces every line of one game, so re-submitting a corrected scoreboard is safe.
pub async fn sync_game_stats(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SyncGameStats>,
) -> Result<Json<Vec<PlayerStat>>> {
    if payload.match_id.trim().is_empty() {
        return Err(AppError::invalid_data("matchId is required"));
    }
    let match_id = payload.match_id.trim().to_string();

    let lines: Vec<CreatePlayerStat> = payload
        .players
        .into_iter()
        .map(|mut line| {
            line.match_id = match_id.clone();
            line.game_number = payload.game_number;
            line
        })
        .collect();
    let mut stats = prepare(lines)?;

    let collection = player_stats(&state.db);
    let removed = collection
        .delete_many(doc! { "matchId": &match_id, "gameNumber": payload.game_number })
        .await?;

    if !stats.is_empty() {
        let inserted = collection.insert_many(&stats).await?;
        for (i, stat) in stats.iter_mut().enumerate() {
            stat.id = inserted.inserted_ids.get(&i).and_then(|id| id.as_object_id());
        }
    }

    tracing::info!(
        "🔁 Synced {} game {}: {} lines replaced by {}",
        match_id,
        payload.game_number,
        removed.deleted_count,
        stats.len()
    );
    Ok(Json(stats))
}

// POST /api/player-stats/bulk
pub async fn bulk_create_player_stats(
    State(state): State<AppState>,
    AppJson(payload): AppJson<Vec<CreatePlayerStat>>,
) -> Result<Json<serde_json::Value>> {
    if payload.is_empty() {
        return Err(AppError::invalid_data("No stat lines provided"));
    }
    let stats = prepare(payload)?;
    let inserted = player_stats(&state.db).insert_many(&stats).await?;

    tracing::info!("✅ Bulk inserted {} stat lines", inserted.inserted_ids.len());
    Ok(Json(serde_json::json!({
        "inserted": inserted.inserted_ids.len(),
    })))
}

// GET /api/player-stats/roles
pub async fn get_role_summary(State(state): State<AppState>) -> Result<Json<Vec<RoleSummary>>> {
    let lines = load_all(&state.db).await?;
    let totals = player_totals::aggregate_player_totals(&lines);
    Ok(Json(player_totals::summarize_roles(&totals)))
}
