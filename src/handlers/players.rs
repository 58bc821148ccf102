use axum::{extract::State, http::StatusCode, response::Json};
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::{bson::doc, Collection, Database};
use validator::Validate;

use crate::errors::{AppError, Result};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::handlers::parse_id;
use crate::models::player::{CreatePlayer, Player, PlayerQuery, UpdatePlayer};
use crate::state::AppState;

fn players(db: &Database) -> Collection<Player> {
    db.collection("players")
}

// GET /api/players
pub async fn get_players(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PlayerQuery>,
) -> Result<Json<Vec<Player>>> {
    let mut filter = doc! {};
    if let Some(team) = &query.team {
        filter.insert("team", team);
    }

    let cursor = players(&state.db)
        .find(filter)
        .sort(doc! { "team": 1, "name": 1 })
        .await?;
    let roster: Vec<Player> = cursor.try_collect().await?;

    tracing::info!("✅ Fetched {} players", roster.len());
    Ok(Json(roster))
}

// GET /api/players/:id
pub async fn get_player_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<Json<Player>> {
    let id = parse_id(&id, "player")?;
    players(&state.db)
        .find_one(doc! { "_id": id })
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Player"))
}

// POST /api/players
pub async fn create_player(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePlayer>,
) -> Result<Json<Player>> {
    payload.validate()?;

    let now = Utc::now();
    let mut player = Player {
        id: None,
        name: payload.name.trim().to_string(),
        grade: payload.grade.trim().to_string(),
        team: payload.team.trim().to_string(),
        in_game_name: payload.in_game_name.trim().to_string(),
        open_id: payload.open_id.trim().to_string(),
        previous_igns: Vec::new(),
        created_at: now,
        updated_at: now,
    };

    let inserted = players(&state.db).insert_one(&player).await?;
    player.id = inserted.inserted_id.as_object_id();

    tracing::info!("✅ Added {} to {}", player.name, player.team);
    Ok(Json(player))
}

// PUT /api/players/:id
pub async fn update_player(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
    AppJson(payload): AppJson<UpdatePlayer>,
) -> Result<Json<Player>> {
    let id = parse_id(&id, "player")?;
    let collection = players(&state.db);
    let mut player = collection
        .find_one(doc! { "_id": id })
        .await?
        .ok_or_else(|| AppError::not_found("Player"))?;

    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err(AppError::invalid_data("name cannot be blank"));
        }
        player.name = name.trim().to_string();
    }
    if let Some(team) = payload.team {
        if team.trim().is_empty() {
            return Err(AppError::invalid_data("team cannot be blank"));
        }
        player.team = team.trim().to_string();
    }
    if let Some(grade) = payload.grade {
        player.grade = grade.trim().to_string();
    }
    if let Some(open_id) = payload.open_id {
        player.open_id = open_id.trim().to_string();
    }
    if let Some(ign) = payload.in_game_name {
        player.rename_in_game(&ign);
    }
    player.updated_at = Utc::now();

    collection.replace_one(doc! { "_id": id }, &player).await?;

    tracing::info!("✅ Updated player {} ({})", player.name, id);
    Ok(Json(player))
}

// DELETE /api/players/:id
pub async fn delete_player(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<StatusCode> {
    let id = parse_id(&id, "player")?;
    let result = players(&state.db).delete_one(doc! { "_id": id }).await?;
    if result.deleted_count == 0 {
        tracing::warn!("❌ Player not found: {}", id);
        return Err(AppError::not_found("Player"));
    }
    tracing::info!("🗑️ Deleted player {}", id);
    Ok(StatusCode::NO_CONTENT)
}
