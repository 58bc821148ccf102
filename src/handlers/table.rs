use axum::{extract::State, http::StatusCode, response::Json};
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, to_bson},
    Collection, Database,
};

use crate::errors::{AppError, Result};
use crate::extract::{AppJson, AppPath};
use crate::handlers::{fixtures, parse_id};
use crate::models::standings::{SaveStandings, StandingsDocument, StandingsSource, TeamStanding};
use crate::models::version::VersionedKind;
use crate::services::{standings, versions};
use crate::state::AppState;

fn tables(db: &Database) -> Collection<StandingsDocument> {
    db.collection(VersionedKind::Standings.collection())
}

async fn find_table(db: &Database, id: ObjectId) -> Result<StandingsDocument> {
    tables(db)
        .find_one(doc! { "_id": id })
        .await?
        .ok_or_else(|| AppError::not_found("Standings"))
}

fn check_rows(rows: &mut [TeamStanding]) -> Result<()> {
    if rows.iter().any(|r| r.team.trim().is_empty()) {
        return Err(AppError::invalid_data("Every standings row needs a team"));
    }
    for row in rows.iter_mut() {
        row.game_diff = row.game_wins as i64 - row.game_losses as i64;
    }
    standings::rank_standings(rows);
    Ok(())
}

/// Current table computed from completed results. Never stored.
pub(crate) async fn calculated_standings(db: &Database) -> Result<Vec<TeamStanding>> {
    let results = fixtures::load_completed(db).await?;
    Ok(standings::compute_standings(&results))
}

// GET /api/table
pub async fn get_tables(State(state): State<AppState>) -> Result<Json<Vec<StandingsDocument>>> {
    let cursor = tables(&state.db).find(doc! {}).sort(doc! { "_id": -1 }).await?;
    let all: Vec<StandingsDocument> = cursor.try_collect().await?;
    tracing::info!("✅ Fetched {} standings documents", all.len());
    Ok(Json(all))
}

// GET /api/table/latest
pub async fn get_latest_table(State(state): State<AppState>) -> Result<Json<StandingsDocument>> {
    versions::load_current::<StandingsDocument>(&state.db, VersionedKind::Standings)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Standings"))
}

// POST /api/table
pub async fn create_table(
    State(state): State<AppState>,
    AppJson(mut payload): AppJson<SaveStandings>,
) -> Result<Json<StandingsDocument>> {
    check_rows(&mut payload.standings)?;

    let now = Utc::now();
    let mut table = StandingsDocument {
        id: None,
        standings: payload.standings,
        source: StandingsSource::Manual,
        created_at: now,
        updated_at: now,
    };
    let inserted = tables(&state.db).insert_one(&table).await?;
    let id = inserted
        .inserted_id
        .as_object_id()
        .ok_or_else(|| AppError::service("Failed to get inserted ID"))?;
    versions::set_current(&state.db, VersionedKind::Standings, id).await?;
    table.id = Some(id);

    tracing::info!("✅ Saved manual standings with {} teams", table.standings.len());
    Ok(Json(table))
}

// PUT /api/table/:id
pub async fn update_table(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
    AppJson(mut payload): AppJson<SaveStandings>,
) -> Result<Json<StandingsDocument>> {
    let id = parse_id(&id, "standings")?;
    check_rows(&mut payload.standings)?;

    let update = doc! {
        "$set": {
            "standings": to_bson(&payload.standings)?,
            "source": to_bson(&StandingsSource::Manual)?,
            "updatedAt": to_bson(&Utc::now())?,
        }
    };
    let result = tables(&state.db).update_one(doc! { "_id": id }, update).await?;
    if result.matched_count == 0 {
        return Err(AppError::not_found("Standings"));
    }

    tracing::info!("✅ Updated standings {}", id);
    Ok(Json(find_table(&state.db, id).await?))
}

// DELETE /api/table/:id
pub async fn delete_table(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<StatusCode> {
    let id = parse_id(&id, "standings")?;
    let result = tables(&state.db).delete_one(doc! { "_id": id }).await?;
    if result.deleted_count == 0 {
        return Err(AppError::not_found("Standings"));
    }
    versions::repoint_after_delete(&state.db, VersionedKind::Standings, id).await?;
    tracing::info!("🗑️ Deleted standings {}", id);
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/table/calculated
pub async fn get_calculated_table(State(state): State<AppState>) -> Result<Json<Vec<TeamStanding>>> {
    let rows = calculated_standings(&state.db).await?;
    tracing::info!("📊 Calculated standings for {} teams", rows.len());
    Ok(Json(rows))
}

// POST /api/table/sync-from-fixtures
//
// Rewrites the one fixtures-sourced document, so repeated syncs never stack up.
pub async fn sync_from_fixtures(State(state): State<AppState>) -> Result<Json<StandingsDocument>> {
    let rows = calculated_standings(&state.db).await?;
    let now = Utc::now();

    let update = doc! {
        "$set": {
            "standings": to_bson(&rows)?,
            "updatedAt": to_bson(&now)?,
        },
        // `source` comes from the filter on insert.
        "$setOnInsert": {
            "createdAt": to_bson(&now)?,
        },
    };
    let table = tables(&state.db)
        .find_one_and_update(doc! { "source": to_bson(&StandingsSource::Fixtures)? }, update)
        .upsert(true)
        .return_document(mongodb::options::ReturnDocument::After)
        .await?
        .ok_or_else(|| AppError::service("Standings sync returned nothing"))?;

    let id = table.id.ok_or_else(|| AppError::service("Synced standings without ID"))?;
    versions::set_current(&state.db, VersionedKind::Standings, id).await?;

    tracing::info!("🔁 Synced standings from fixtures ({} teams)", table.standings.len());
    Ok(Json(table))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_rows_get_diff_and_rank() {
        let mut rows = vec![
            TeamStanding { team: "B".into(), points: 3, game_wins: 2, game_losses: 1, ..Default::default() },
            TeamStanding { team: "A".into(), points: 6, game_wins: 4, game_losses: 0, ..Default::default() },
        ];
        check_rows(&mut rows).unwrap();
        assert_eq!(rows[0].team, "A");
        assert_eq!(rows[0].game_diff, 4);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[1].rank, 2);
    }

    #[test]
    fn blank_team_rejected() {
        let mut rows = vec![TeamStanding::new(" ")];
        assert!(check_rows(&mut rows).is_err());
    }
}
