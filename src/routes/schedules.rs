use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::{handlers::schedules, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(schedules::get_schedules).post(schedules::create_schedule))
        .route("/latest", get(schedules::get_latest_schedule))
        // Round-robin draw; only persisted when `save` is set
        .route("/generate", post(schedules::generate_schedule))
        .route(
            "/:id",
            get(schedules::get_schedule_by_id)
                .put(schedules::update_schedule)
                .delete(schedules::delete_schedule),
        )
        .route("/:id/match-score", patch(schedules::update_match_score))
        .route("/:id/reset-match", patch(schedules::reset_match))
        .route("/:id/reset-day", patch(schedules::reset_day))
}
