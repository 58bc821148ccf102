use std::collections::HashSet;

use axum::{extract::State, http::StatusCode, response::Json};
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, to_document, Bson},
    options::ReturnDocument,
    Collection, Database,
};

use crate::errors::{AppError, Result};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::handlers::parse_id;
use crate::models::fixture::{CreateFixture, Fixture, FixtureQuery, MatchStatus, UpdateFixture};
use crate::state::AppState;

pub(crate) const FIXTURES_COLLECTION: &str = "fixtures";

fn fixtures(db: &Database) -> Collection<Fixture> {
    db.collection(FIXTURES_COLLECTION)
}

/// Writes a fixture keyed by its match id, keeping the original `createdAt`.
pub(crate) async fn upsert_fixture(db: &Database, fixture: Fixture) -> Result<Fixture> {
    let mut fields = to_document(&fixture)?;
    fields.remove("_id");
    let created_at = fields.remove("createdAt").unwrap_or(Bson::Null);

    let update = doc! {
        "$set": fields,
        "$setOnInsert": { "createdAt": created_at },
    };

    fixtures(db)
        .find_one_and_update(doc! { "matchId": &fixture.match_id }, update)
        .upsert(true)
        .return_document(ReturnDocument::After)
        .await?
        .ok_or_else(|| AppError::service(format!("Upsert of {} returned nothing", fixture.match_id)))
}

pub(crate) async fn delete_by_match_ids(db: &Database, match_ids: &[String]) -> Result<u64> {
    if match_ids.is_empty() {
        return Ok(0);
    }
    let result = fixtures(db)
        .delete_many(doc! { "matchId": { "$in": match_ids.to_vec() } })
        .await?;
    Ok(result.deleted_count)
}

/// Completed results in play order, the input the standings fold expects.
pub(crate) async fn load_completed(db: &Database) -> Result<Vec<Fixture>> {
    let cursor = fixtures(db)
        .find(doc! { "status": MatchStatus::Completed.as_str() })
        .sort(doc! { "matchDay": 1, "matchNo": 1, "_id": 1 })
        .await?;
    let results: Vec<Fixture> = cursor.try_collect().await?;
    tracing::debug!("loaded {} completed results", results.len());
    Ok(results)
}

// GET /api/fixtures
pub async fn get_fixtures(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<FixtureQuery>,
) -> Result<Json<Vec<Fixture>>> {
    let mut filter = doc! {};
    if let Some(status) = query.status {
        filter.insert("status", status.as_str());
    }
    tracing::debug!("   → Database filter: {:?}", filter);

    let cursor = fixtures(&state.db)
        .find(filter)
        .sort(doc! { "matchDay": 1, "matchNo": 1 })
        .await?;
    let all: Vec<Fixture> = cursor.try_collect().await?;

    tracing::info!("✅ Fetched {} fixtures", all.len());
    Ok(Json(all))
}

// POST /api/fixtures
pub async fn create_fixture(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateFixture>,
) -> Result<Json<Fixture>> {
    payload.check().map_err(AppError::invalid_data)?;
    let stored = upsert_fixture(&state.db, payload.into_fixture()).await?;
    tracing::info!(
        "✅ Saved {} ({}-{}, {})",
        stored.match_id,
        stored.score_blue,
        stored.score_red,
        stored.status.as_str()
    );
    Ok(Json(stored))
}

// GET /api/fixtures/day/:day
pub async fn get_fixtures_by_day(
    State(state): State<AppState>,
    AppPath(day): AppPath<u32>,
) -> Result<Json<Vec<Fixture>>> {
    let cursor = fixtures(&state.db)
        .find(doc! { "matchDay": day })
        .sort(doc! { "matchNo": 1 })
        .await?;
    let day_fixtures: Vec<Fixture> = cursor.try_collect().await?;
    tracing::info!("✅ Fetched {} fixtures for day {}", day_fixtures.len(), day);
    Ok(Json(day_fixtures))
}

// GET /api/fixtures/completed
pub async fn get_completed_fixtures(State(state): State<AppState>) -> Result<Json<Vec<Fixture>>> {
    Ok(Json(load_completed(&state.db).await?))
}

// PATCH /api/fixtures/:matchDay/:matchNo
pub async fn update_fixture(
    State(state): State<AppState>,
    AppPath((match_day, match_no)): AppPath<(u32, u32)>,
    AppJson(payload): AppJson<UpdateFixture>,
) -> Result<Json<Fixture>> {
    let collection = fixtures(&state.db);
    let filter = doc! { "matchDay": match_day, "matchNo": match_no };
    let mut fixture = collection
        .find_one(filter)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Fixture {} of day {}", match_no, match_day)))?;

    let scored = payload.score_blue.is_some() || payload.score_red.is_some();
    if scored {
        fixture.set_score(
            payload.score_blue.unwrap_or(fixture.score_blue),
            payload.score_red.unwrap_or(fixture.score_red),
        );
    }
    match payload.status {
        Some(status) => fixture.status = status,
        None if scored => fixture.status = MatchStatus::Completed,
        None => {}
    }
    if let Some(date) = payload.date {
        fixture.date = Some(date);
    }
    if let Some(is_bye_win) = payload.is_bye_win {
        fixture.is_bye_win = is_bye_win;
    }
    if let Some(details) = payload.game_details {
        fixture.game_details = details;
    }
    fixture.updated_at = Utc::now();

    let id = fixture.id.ok_or_else(|| AppError::service("Stored fixture without ID"))?;
    collection.replace_one(doc! { "_id": id }, &fixture).await?;

    tracing::info!("✅ Updated {} to {}-{}", fixture.match_id, fixture.score_blue, fixture.score_red);
    Ok(Json(fixture))
}

// POST /api/fixtures/bulk
pub async fn bulk_upsert_fixtures(
    State(state): State<AppState>,
    AppJson(payload): AppJson<Vec<CreateFixture>>,
) -> Result<Json<Vec<Fixture>>> {
    if payload.is_empty() {
        return Err(AppError::invalid_data("No fixtures provided"));
    }

    // Validate everything before the first write.
    let mut seen = HashSet::new();
    let mut batch = Vec::with_capacity(payload.len());
    for (i, item) in payload.into_iter().enumerate() {
        item.check()
            .map_err(|e| AppError::invalid_data(format!("Fixture {}: {}", i + 1, e)))?;
        let fixture = item.into_fixture();
        if !seen.insert(fixture.match_id.clone()) {
            return Err(AppError::invalid_data(format!("Duplicate match {}", fixture.match_id)));
        }
        batch.push(fixture);
    }

    let mut stored = Vec::with_capacity(batch.len());
    for fixture in batch {
        stored.push(upsert_fixture(&state.db, fixture).await?);
    }

    tracing::info!("✅ Bulk saved {} fixtures", stored.len());
    Ok(Json(stored))
}

// DELETE /api/fixtures/:id
pub async fn delete_fixture(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<StatusCode> {
    let id = parse_id(&id, "fixture")?;
    let result = fixtures(&state.db).delete_one(doc! { "_id": id }).await?;
    if result.deleted_count == 0 {
        return Err(AppError::not_found("Fixture"));
    }
    tracing::info!("🗑️ Deleted fixture {}", id);
    Ok(StatusCode::NO_CONTENT)
}
