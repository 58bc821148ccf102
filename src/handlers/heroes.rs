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
use crate::models::asset::{Hero, SaveHero};
use crate::state::AppState;

fn heroes(db: &Database) -> Collection<Hero> {
    db.collection("heroes")
}

fn resolve(payload: &SaveHero) -> Result<String> {
    if payload.image_url.trim().is_empty() {
        return Err(AppError::invalid_data("imageUrl is required"));
    }
    payload
        .resolved_name()
        .ok_or_else(|| AppError::invalid_data("name or fileName is required"))
}

async fn upsert_hero(db: &Database, name: String, image_url: &str) -> Result<Hero> {
    let update = doc! {
        "$set": {
            "imageUrl": image_url.trim(),
            "updatedAt": to_bson(&Utc::now())?,
        }
    };
    heroes(db)
        .find_one_and_update(doc! { "name": &name }, update)
        .upsert(true)
        .return_document(ReturnDocument::After)
        .await?
        .ok_or_else(|| AppError::service(format!("Upsert of hero {} returned nothing", name)))
}

// GET /api/heroes
pub async fn get_heroes(State(state): State<AppState>) -> Result<Json<Vec<Hero>>> {
    let cursor = heroes(&state.db).find(doc! {}).sort(doc! { "name": 1 }).await?;
    let all: Vec<Hero> = cursor.try_collect().await?;
    tracing::info!("✅ Fetched {} heroes", all.len());
    Ok(Json(all))
}

// POST /api/heroes
pub async fn save_hero(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SaveHero>,
) -> Result<Json<Hero>> {
    let name = resolve(&payload)?;
    let hero = upsert_hero(&state.db, name, &payload.image_url).await?;
    tracing::info!("✅ Saved hero {}", hero.name);
    Ok(Json(hero))
}

// POST /api/heroes/bulk
pub async fn bulk_save_heroes(
    State(state): State<AppState>,
    AppJson(payload): AppJson<Vec<SaveHero>>,
) -> Result<Json<Vec<Hero>>> {
    if payload.is_empty() {
        return Err(AppError::invalid_data("No heroes provided"));
    }
    // Validate everything before the first write.
    let names = payload
        .iter()
        .enumerate()
        .map(|(i, item)| {
            resolve(item).map_err(|e| AppError::invalid_data(format!("Hero {}: {}", i + 1, e)))
        })
        .collect::<Result<Vec<String>>>()?;

    let mut saved = Vec::with_capacity(names.len());
    for (name, item) in names.into_iter().zip(&payload) {
        saved.push(upsert_hero(&state.db, name, &item.image_url).await?);
    }

    tracing::info!("✅ Bulk saved {} heroes", saved.len());
    Ok(Json(saved))
}

// DELETE /api/heroes/:id
pub async fn delete_hero(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<StatusCode> {
    let id = parse_id(&id, "hero")?;
    let result = heroes(&state.db).delete_one(doc! { "_id": id }).await?;
    if result.deleted_count == 0 {
        return Err(AppError::not_found("Hero"));
    }
    tracing::info!("🗑️ Deleted hero {}", id);
    Ok(StatusCode::NO_CONTENT)
}
