use std::collections::HashSet;

use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{NaiveDate, Utc};
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, to_bson},
    Collection, Database,
};

use crate::errors::{AppError, Result};
use crate::extract::{AppJson, AppPath};
use crate::handlers::{fixtures, parse_id};
use crate::models::fixture::{match_id, Fixture, MatchStatus};
use crate::models::schedule::{
    GenerateSchedule, MatchScoreUpdate, ResetDay, ResetMatch, SaveSchedule, Schedule, ScheduleDay,
};
use crate::models::version::VersionedKind;
use crate::services::{draw, versions};
use crate::state::AppState;

fn schedules(db: &Database) -> Collection<Schedule> {
    db.collection(VersionedKind::Schedule.collection())
}

async fn find_schedule(db: &Database, id: ObjectId) -> Result<Schedule> {
    schedules(db)
        .find_one(doc! { "_id": id })
        .await?
        .ok_or_else(|| AppError::not_found("Schedule"))
}

fn check_days(days: &[ScheduleDay]) -> Result<()> {
    let mut seen = HashSet::new();
    for day in days {
        if day.day == 0 {
            return Err(AppError::invalid_data("Day numbers start at 1"));
        }
        if !seen.insert(day.day) {
            return Err(AppError::invalid_data(format!("Day {} appears more than once", day.day)));
        }
    }
    Ok(())
}

async fn insert_current(db: &Database, teams: Vec<String>, days: Vec<ScheduleDay>) -> Result<Schedule> {
    let now = Utc::now();
    let mut schedule = Schedule {
        id: None,
        teams,
        schedule: days,
        created_at: now,
        updated_at: now,
    };
    let inserted = schedules(db).insert_one(&schedule).await?;
    let id = inserted
        .inserted_id
        .as_object_id()
        .ok_or_else(|| AppError::service("Failed to get inserted ID"))?;
    versions::set_current(db, VersionedKind::Schedule, id).await?;
    schedule.id = Some(id);
    Ok(schedule)
}

async fn save(db: &Database, schedule: &mut Schedule) -> Result<()> {
    let id = schedule.id.ok_or_else(|| AppError::service("Schedule without ID"))?;
    schedule.updated_at = Utc::now();
    let result = schedules(db).replace_one(doc! { "_id": id }, &*schedule).await?;
    if result.matched_count == 0 {
        return Err(AppError::not_found("Schedule"));
    }
    Ok(())
}

// GET /api/schedules
pub async fn get_schedules(State(state): State<AppState>) -> Result<Json<Vec<Schedule>>> {
    let cursor = schedules(&state.db).find(doc! {}).sort(doc! { "_id": -1 }).await?;
    let all: Vec<Schedule> = cursor.try_collect().await?;
    tracing::info!("✅ Fetched {} schedules", all.len());
    Ok(Json(all))
}

// POST /api/schedules
pub async fn create_schedule(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SaveSchedule>,
) -> Result<Json<Schedule>> {
    if payload.schedule.is_empty() {
        return Err(AppError::invalid_data("schedule must contain at least one day"));
    }
    check_days(&payload.schedule)?;

    let schedule = insert_current(&state.db, payload.teams, payload.schedule).await?;
    tracing::info!("✅ Created schedule with {} days", schedule.schedule.len());
    Ok(Json(schedule))
}

// GET /api/schedules/latest
pub async fn get_latest_schedule(State(state): State<AppState>) -> Result<Json<Schedule>> {
    versions::load_current::<Schedule>(&state.db, VersionedKind::Schedule)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Schedule"))
}

// GET /api/schedules/:id
pub async fn get_schedule_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<Json<Schedule>> {
    let id = parse_id(&id, "schedule")?;
    Ok(Json(find_schedule(&state.db, id).await?))
}

// POST /api/schedules/generate
pub async fn generate_schedule(
    State(state): State<AppState>,
    AppJson(payload): AppJson<GenerateSchedule>,
) -> Result<Json<Schedule>> {
    let start = payload
        .start_date
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map_err(|_| AppError::invalid_data(format!("startDate must be YYYY-MM-DD, got '{}'", s)))
        })
        .transpose()?;
    let days_between = payload.days_between.unwrap_or(draw::DEFAULT_DAYS_BETWEEN);
    if !(1..=draw::MAX_DAYS_BETWEEN).contains(&days_between) {
        return Err(AppError::invalid_data(format!(
            "daysBetween must be between 1 and {}, got {}",
            draw::MAX_DAYS_BETWEEN,
            days_between
        )));
    }

    // ThreadRng is not Send; finish with it before the first await.
    let rounds = draw::generate_draw(&payload.teams, &mut rand::thread_rng())?;
    let days = draw::schedule_days(&rounds, start, days_between)?;
    let teams: Vec<String> = payload.teams.iter().map(|t| t.trim().to_string()).collect();

    tracing::info!(
        "🎲 Drew {} teams into {} days (save: {})",
        teams.len(),
        days.len(),
        payload.save
    );

    if payload.save {
        return Ok(Json(insert_current(&state.db, teams, days).await?));
    }

    let now = Utc::now();
    Ok(Json(Schedule {
        id: None,
        teams,
        schedule: days,
        created_at: now,
        updated_at: now,
    }))
}

// PUT /api/schedules/:id
pub async fn update_schedule(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
    AppJson(payload): AppJson<SaveSchedule>,
) -> Result<Json<Schedule>> {
    let id = parse_id(&id, "schedule")?;
    check_days(&payload.schedule)?;

    let update = doc! {
        "$set": {
            "teams": to_bson(&payload.teams)?,
            "schedule": to_bson(&payload.schedule)?,
            "updatedAt": to_bson(&Utc::now())?,
        }
    };
    let result = schedules(&state.db).update_one(doc! { "_id": id }, update).await?;
    if result.matched_count == 0 {
        tracing::warn!("❌ Schedule not found: {}", id);
        return Err(AppError::not_found("Schedule"));
    }

    tracing::info!("✅ Rewrote schedule {}", id);
    Ok(Json(find_schedule(&state.db, id).await?))
}

// PATCH /api/schedules/:id/match-score
pub async fn update_match_score(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
    AppJson(payload): AppJson<MatchScoreUpdate>,
) -> Result<Json<Schedule>> {
    let id = parse_id(&id, "schedule")?;
    let mut schedule = find_schedule(&state.db, id).await?;

    let status = payload.status.unwrap_or(MatchStatus::Completed);
    let fixture = {
        let day = schedule
            .day_mut(payload.day)
            .ok_or_else(|| AppError::not_found(format!("Day {}", payload.day)))?;
        let day_date = day.date.clone();
        let m = day
            .matches
            .get_mut(payload.match_index)
            .ok_or_else(|| AppError::not_found(format!("Match {} on day {}", payload.match_index, payload.day)))?;

        m.team1_score = Some(payload.team1_score);
        m.team2_score = Some(payload.team2_score);
        m.status = Some(status);

        let mut fixture = Fixture::new(payload.day, payload.match_index as u32 + 1, &m.blue, &m.red);
        fixture.date = m.date.clone().or(Some(day_date)).filter(|d| !d.is_empty());
        fixture.set_score(payload.team1_score, payload.team2_score);
        fixture.status = status;
        fixture
    };

    save(&state.db, &mut schedule).await?;
    fixtures::upsert_fixture(&state.db, fixture).await?;

    tracing::info!(
        "✅ Day {} match {} scored {}-{} ({})",
        payload.day,
        payload.match_index,
        payload.team1_score,
        payload.team2_score,
        status.as_str()
    );
    Ok(Json(schedule))
}

// PATCH /api/schedules/:id/reset-match
pub async fn reset_match(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
    AppJson(payload): AppJson<ResetMatch>,
) -> Result<Json<Schedule>> {
    let id = parse_id(&id, "schedule")?;
    let mut schedule = find_schedule(&state.db, id).await?;

    let cleared_id = {
        let day = schedule
            .day_mut(payload.day)
            .ok_or_else(|| AppError::not_found(format!("Day {}", payload.day)))?;
        let m = day
            .matches
            .get_mut(payload.match_index)
            .ok_or_else(|| AppError::not_found(format!("Match {} on day {}", payload.match_index, payload.day)))?;
        m.reset();
        match_id(payload.day, &m.blue, &m.red)
    };

    save(&state.db, &mut schedule).await?;
    let removed = fixtures::delete_by_match_ids(&state.db, &[cleared_id]).await?;

    tracing::info!("🔄 Reset day {} match {} ({} result removed)", payload.day, payload.match_index, removed);
    Ok(Json(schedule))
}

// PATCH /api/schedules/:id/reset-day
pub async fn reset_day(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
    AppJson(payload): AppJson<ResetDay>,
) -> Result<Json<Schedule>> {
    let id = parse_id(&id, "schedule")?;
    let mut schedule = find_schedule(&state.db, id).await?;

    let cleared: Vec<String> = {
        let day = schedule
            .day_mut(payload.day)
            .ok_or_else(|| AppError::not_found(format!("Day {}", payload.day)))?;
        day.matches
            .iter_mut()
            .map(|m| {
                m.reset();
                match_id(payload.day, &m.blue, &m.red)
            })
            .collect()
    };

    save(&state.db, &mut schedule).await?;
    let removed = fixtures::delete_by_match_ids(&state.db, &cleared).await?;

    tracing::info!("🔄 Reset day {} ({} results removed)", payload.day, removed);
    Ok(Json(schedule))
}

// DELETE /api/schedules/:id
pub async fn delete_schedule(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<StatusCode> {
    let id = parse_id(&id, "schedule")?;
    let result = schedules(&state.db).delete_one(doc! { "_id": id }).await?;
    if result.deleted_count == 0 {
        tracing::warn!("❌ Schedule not found: {}", id);
        return Err(AppError::not_found("Schedule"));
    }

    versions::repoint_after_delete(&state.db, VersionedKind::Schedule, id).await?;
    tracing::info!("🗑️ Deleted schedule {}", id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_days_are_rejected() {
        let day = |n| ScheduleDay { day: n, date: String::new(), matches: Vec::new() };
        assert!(check_days(&[day(1), day(2)]).is_ok());
        assert!(matches!(check_days(&[day(1), day(1)]), Err(AppError::ValidationError(_))));
    }
}
