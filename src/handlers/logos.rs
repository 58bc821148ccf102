use axum::{extract::State, http::StatusCode, response::Json};
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson},
    options::ReturnDocument,
    Collection, Database,
};

use crate::errors::{AppError, Result};
use crate::extract::{AppJson, AppPath};
use crate::handlers::parse_id;
use crate::models::asset::{SaveTeamLogo, TeamLogo};
use crate::state::AppState;

fn logos(db: &Database) -> Collection<TeamLogo> {
    db.collection("logos")
}

// GET /api/logos
pub async fn get_logos(State(state): State<AppState>) -> Result<Json<Vec<TeamLogo>>> {
    let cursor = logos(&state.db).find(doc! {}).sort(doc! { "teamName": 1 }).await?;
    let all: Vec<TeamLogo> = cursor.try_collect().await?;
    Ok(Json(all))
}

// GET /api/logos/:team
pub async fn get_logo_by_team(
    State(state): State<AppState>,
    AppPath(team): AppPath<String>,
) -> Result<Json<TeamLogo>> {
    logos(&state.db)
        .find_one(doc! { "teamName": &team })
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("Logo for {}", team)))
}

// POST /api/logos
pub async fn save_logo(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SaveTeamLogo>,
) -> Result<Json<TeamLogo>> {
    let team_name = payload.team_name.trim();
    if team_name.is_empty() || payload.logo_url.trim().is_empty() {
        return Err(AppError::invalid_data("teamName and logoUrl are required"));
    }

    let update = doc! {
        "$set": {
            "logoUrl": payload.logo_url.trim(),
            "updatedAt": to_bson(&Utc::now())?,
        }
    };
    let logo = logos(&state.db)
        .find_one_and_update(doc! { "teamName": team_name }, update)
        .upsert(true)
        .return_document(ReturnDocument::After)
        .await?
        .ok_or_else(|| AppError::service(format!("Upsert of logo for {} returned nothing", team_name)))?;

    tracing::info!("✅ Saved logo for {}", logo.team_name);
    Ok(Json(logo))
}

// DELETE /api/logos/:id
pub async fn delete_logo(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<StatusCode> {
    let id = parse_id(&id, "logo")?;
    let result = logos(&state.db).delete_one(doc! { "_id": id }).await?;
    if result.deleted_count == 0 {
        return Err(AppError::not_found("Logo"));
    }
    tracing::info!("🗑️ Deleted logo {}", id);
    Ok(StatusCode::NO_CONTENT)
}
